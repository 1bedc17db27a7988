use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::dataset::Alphabet;
use crate::error::{NameGenError, Result};
use crate::model::prediction::{FLOOR_PROBABILITY, Prediction};

/// Counts observed after one n-gram context.
///
/// A `ContextCounts` corresponds to a fixed k-character context (`key`) and
/// stores how often each next character followed it during training.
///
/// ## Invariants
/// - `total` always equals the sum of `counts`
/// - Each count is strictly positive
/// - Counts only ever grow
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ContextCounts {
	/// The k-character context (padded with `PAD_TOKEN` at the start of a name).
	key: String,
	/// Occurrences indexed by the next character.
	/// Example: { 'e' => 42, 'a' => 3 }
	counts: HashMap<char, u64>,
	/// Number of times the context was observed.
	total: u64,
}

impl ContextCounts {
	/// Creates a new empty record for the given context.
	pub fn new(key: &str) -> Self {
		Self {
			key: key.to_owned(),
			counts: HashMap::new(),
			total: 0,
		}
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn total(&self) -> u64 {
		self.total
	}

	/// How many times `next_char` followed this context (0 if never).
	pub fn count(&self, next_char: char) -> u64 {
		self.counts.get(&next_char).copied().unwrap_or(0)
	}

	/// Records one occurrence of `next_char` after this context.
	pub fn observe(&mut self, next_char: char) {
		*self.counts.entry(next_char).or_insert(0) += 1;
		self.total += 1;
	}

	/// Relative frequencies, with the floor probability for every alphabet
	/// character never seen after this context, renormalized to sum to 1.
	pub fn prediction(&self, alphabet: &Alphabet) -> Prediction {
		let total = self.total as f64;
		let mut weights: BTreeMap<char, f64> = self
			.counts
			.iter()
			.map(|(&c, &count)| (c, count as f64 / total))
			.collect();

		for &c in alphabet {
			weights.entry(c).or_insert(FLOOR_PROBABILITY);
		}

		Prediction::normalized(weights)
	}

	/// Adds the counts of another record for the same context.
	///
	/// # Errors
	/// Returns `ContextMismatch` if the keys differ.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.key != other.key {
			return Err(NameGenError::ContextMismatch {
				expected: self.key.clone(),
				found: other.key.clone(),
			});
		}

		for (&next_char, &count) in &other.counts {
			*self.counts.entry(next_char).or_insert(0) += count;
		}
		self.total += other.total;

		Ok(())
	}
}
