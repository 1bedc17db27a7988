use crate::dataset::Alphabet;
use crate::model::generator::NameGenerator;
use crate::model::prediction::Prediction;

/// Baseline generator: every character is equally likely, always.
///
/// Training is a no-op. N-gram models are compared against this one.
#[derive(Clone, Debug)]
pub struct UniformGenerator {
	alphabet: Alphabet,
}

impl UniformGenerator {
	pub fn new(alphabet: Alphabet) -> Self {
		Self { alphabet }
	}
}

impl NameGenerator for UniformGenerator {
	fn predict(&self, prefixes: &[&str]) -> Vec<Prediction> {
		prefixes.iter().map(|_| Prediction::uniform(&self.alphabet)).collect()
	}

	fn train(&mut self, _names: &[&str]) {}

	fn name(&self) -> String {
		"Uniform".to_owned()
	}

	fn alphabet(&self) -> &Alphabet {
		&self.alphabet
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::generator::evaluate_batch;

	fn generator() -> UniformGenerator {
		UniformGenerator::new("abcd>".chars().collect())
	}

	#[test]
	fn every_prefix_gets_the_same_flat_distribution() {
		let generator = generator();
		let predictions = generator.predict(&["", "a", "dcba", "zzz"]);
		assert_eq!(predictions.len(), 4);
		for prediction in predictions {
			assert_eq!(prediction.len(), 5);
			assert!(prediction.iter().all(|(_, p)| p == 0.2));
		}
	}

	#[test]
	fn training_changes_nothing() {
		let mut generator = generator();
		let before = generator.predict(&["a"]);
		generator.train(&["aaaa>", "ab>"]);
		assert_eq!(generator.predict(&["a"]), before);
	}

	#[test]
	fn log_likelihood_is_log_of_one_over_alphabet_size() {
		let score = evaluate_batch(&generator(), &["abc>", "d>"]);
		assert!((score - (0.2f64).ln()).abs() < 1e-12);
	}
}
