use std::collections::BTreeMap;

use rand::Rng;

use crate::dataset::Alphabet;

/// Minimum probability given to a character a model never saw in a context.
///
/// Keeps every distribution full-support so log-likelihoods stay finite.
pub const FLOOR_PROBABILITY: f64 = 1e-10;

/// Next-character probability distribution.
///
/// Keys are kept ordered so that weighted sampling from a seeded random
/// source is reproducible.
///
/// ## Invariants
/// - Every probability is strictly positive
/// - Probabilities sum to 1 (within floating point tolerance)
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
	probabilities: BTreeMap<char, f64>,
}

impl Prediction {
	/// Same probability for every character of the alphabet.
	pub fn uniform(alphabet: &Alphabet) -> Self {
		let probability = 1.0 / alphabet.len() as f64;
		Self {
			probabilities: alphabet.iter().map(|&c| (c, probability)).collect(),
		}
	}

	/// Builds a distribution from raw weights, scaled so that they sum to 1.
	///
	/// The caller guarantees the weights are positive and not all zero.
	pub(crate) fn normalized(weights: BTreeMap<char, f64>) -> Self {
		let total: f64 = weights.values().sum();
		Self {
			probabilities: weights.into_iter().map(|(c, w)| (c, w / total)).collect(),
		}
	}

	/// Probability of `c`, `None` if `c` is not part of the distribution.
	pub fn probability(&self, c: char) -> Option<f64> {
		self.probabilities.get(&c).copied()
	}

	/// Sum of all probabilities, 1 up to rounding.
	pub fn total(&self) -> f64 {
		self.probabilities.values().sum()
	}

	pub fn len(&self) -> usize {
		self.probabilities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.probabilities.is_empty()
	}

	/// Iterates over `(character, probability)` in character order.
	pub fn iter(&self) -> impl Iterator<Item = (char, f64)> + '_ {
		self.probabilities.iter().map(|(&c, &p)| (c, p))
	}

	/// The `n` most likely characters, highest probability first.
	///
	/// Ties are broken by character order.
	pub fn top(&self, n: usize) -> Vec<(char, f64)> {
		let mut sorted: Vec<(char, f64)> = self.iter().collect();
		sorted.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
		sorted.truncate(n);
		sorted
	}

	/// Draws a character with probability proportional to its weight.
	///
	/// This method performs:
	/// - a single uniform draw in `[0, total)`
	/// - a cumulative subtraction to select a bucket
	///
	/// Returns `None` only for an empty distribution.
	pub fn sample<R>(&self, rng: &mut R) -> Option<char>
	where
		R: Rng + ?Sized,
	{
		let total = self.total();
		if self.probabilities.is_empty() || total <= 0.0 {
			return None;
		}

		let mut r = rng.random_range(0.0..total);

		let mut fallback = None;
		for (&c, &p) in &self.probabilities {
			if r < p {
				return Some(c);
			}
			r -= p;
			fallback = Some(c);
		}

		// Rounding can leave a tiny remainder after the last bucket
		fallback
	}
}
