use log::debug;
use rand::Rng;

use crate::dataset::{Alphabet, END_TOKEN};
use crate::error::Result;
use crate::model::prediction::{FLOOR_PROBABILITY, Prediction};

/// Common interface of every name generator.
///
/// A generator only has to know how to predict the next character and how
/// to learn from names. Sampling and scoring are shared free functions
/// ([`generate`], [`evaluate_batch`]) written against this trait.
pub trait NameGenerator {
	/// Next-character distribution for each prefix of the batch.
	///
	/// A prefix is the (possibly empty) sequence of characters generated or
	/// observed so far. Every returned distribution covers the whole alphabet
	/// with strictly positive probabilities.
	fn predict(&self, prefixes: &[&str]) -> Vec<Prediction>;

	/// Learns from a batch of end-token terminated names.
	///
	/// Repeated calls accumulate.
	fn train(&mut self, names: &[&str]);

	/// Same end state as [`NameGenerator::train`], possibly computed on
	/// several threads.
	fn train_parallel(&mut self, names: &[&str]) -> Result<()> {
		self.train(names);
		Ok(())
	}

	/// Human-readable identifier, for reporting only.
	fn name(&self) -> String;

	fn alphabet(&self) -> &Alphabet;

	fn end_token(&self) -> char {
		END_TOKEN
	}
}

/// Samples one name, character by character, until the end token is drawn.
///
/// There is no length cap: termination relies on the probability mass the
/// model puts on the end token. See [`generate_with_limit`] for a bounded
/// variant.
pub fn generate<G, R>(generator: &G, rng: &mut R) -> String
where
	G: NameGenerator + ?Sized,
	R: Rng + ?Sized,
{
	sample_name(generator, None, rng)
}

/// Same as [`generate`] but stops after `max_length` characters.
///
/// The cap is a deployment guard for services answering untrusted
/// requests. A truncated name is returned as is.
pub fn generate_with_limit<G, R>(generator: &G, max_length: usize, rng: &mut R) -> String
where
	G: NameGenerator + ?Sized,
	R: Rng + ?Sized,
{
	sample_name(generator, Some(max_length), rng)
}

/// Samples `count` names with [`generate`].
pub fn generate_names<G, R>(generator: &G, count: usize, rng: &mut R) -> Vec<String>
where
	G: NameGenerator + ?Sized,
	R: Rng + ?Sized,
{
	(0..count).map(|_| generate(generator, rng)).collect()
}

fn sample_name<G, R>(generator: &G, max_length: Option<usize>, rng: &mut R) -> String
where
	G: NameGenerator + ?Sized,
	R: Rng + ?Sized,
{
	let end_token = generator.end_token();
	let mut name = String::new();
	let mut length = 0usize;

	loop {
		if max_length.is_some_and(|max| length >= max) {
			debug!("{}: generation stopped at {length} characters", generator.name());
			break;
		}

		let next_char = generator
			.predict(&[name.as_str()])
			.first()
			.and_then(|prediction| prediction.sample(rng));

		match next_char {
			Some(c) if c != end_token => {
				name.push(c);
				length += 1;
			}
			_ => break,
		}
	}

	name
}

/// Average log-likelihood per character of a batch of sequences.
///
/// Every position of every sequence is scored against the prediction made
/// from the characters before it; a character missing from the prediction
/// counts as [`FLOOR_PROBABILITY`]. Scoring does not touch the generator.
///
/// Returns negative infinity when nothing was scored (empty batch).
pub fn evaluate_batch<G>(generator: &G, batch: &[&str]) -> f64
where
	G: NameGenerator + ?Sized,
{
	let mut total_log_likelihood = 0.0;
	let mut total_tokens = 0usize;

	for sequence in batch {
		let mut prefix = String::with_capacity(sequence.len());
		for c in sequence.chars() {
			let probability = generator
				.predict(&[prefix.as_str()])
				.first()
				.and_then(|prediction| prediction.probability(c))
				.unwrap_or(FLOOR_PROBABILITY);

			total_log_likelihood += probability.ln();
			total_tokens += 1;
			prefix.push(c);
		}
	}

	if total_tokens == 0 {
		return f64::NEG_INFINITY;
	}
	total_log_likelihood / total_tokens as f64
}
