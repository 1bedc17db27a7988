//! Name generators and the algorithms shared by all of them.
//!
//! This module provides:
//! - The `NameGenerator` interface (`predict` / `train` / `name`)
//! - Sampling and log-likelihood scoring written once against that interface
//! - A uniform baseline (`UniformGenerator`)
//! - Fixed-order n-gram models (`NGramGenerator`)

/// Generator interface, sampling and evaluation.
pub mod generator;

/// Fixed-order character n-gram model.
///
/// Handles padded context counting, next-character prediction with floor
/// probabilities, merging of partial models and persistence.
pub mod ngram_model;

/// Next-character probability distributions and weighted sampling.
pub mod prediction;

/// Per-context counting record used by the n-gram model.
pub mod state;

/// Uniform baseline generator.
pub mod uniform;

use log::debug;

use crate::dataset::Alphabet;
use crate::error::Result;

pub use generator::{NameGenerator, evaluate_batch, generate, generate_names, generate_with_limit};
pub use ngram_model::NGramGenerator;
pub use prediction::{FLOOR_PROBABILITY, Prediction};
pub use uniform::UniformGenerator;

/// A generator that can be moved across threads.
pub type BoxedGenerator = Box<dyn NameGenerator + Send>;

/// The uniform baseline followed by one n-gram generator per order.
///
/// # Errors
/// Returns `InvalidArgument` if an order is 0.
pub fn build_generators(alphabet: &Alphabet, orders: &[usize]) -> Result<Vec<BoxedGenerator>> {
	let mut generators: Vec<BoxedGenerator> = Vec::with_capacity(orders.len() + 1);
	generators.push(Box::new(UniformGenerator::new(alphabet.clone())));
	for &k in orders {
		generators.push(Box::new(NGramGenerator::new(alphabet.clone(), k)?));
	}
	debug!("Built {} generators", generators.len());
	Ok(generators)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::NameGenError;

	#[test]
	fn uniform_comes_first() {
		let alphabet: Alphabet = "ab>".chars().collect();
		let names: Vec<String> = build_generators(&alphabet, &[1, 3])
			.unwrap()
			.iter()
			.map(|g| g.name())
			.collect();
		assert_eq!(names, ["Uniform", "N-Gram(k=1)", "N-Gram(k=3)"]);
	}

	#[test]
	fn order_zero_fails() {
		let alphabet: Alphabet = "ab>".chars().collect();
		assert!(matches!(build_generators(&alphabet, &[2, 0]), Err(NameGenError::InvalidArgument(_))));
	}
}
