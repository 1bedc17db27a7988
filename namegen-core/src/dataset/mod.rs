//! Corpus loading, train/test splitting and batching.

/// Loaded list of names and its alphabet.
pub mod corpus;

/// Random train/test partition.
pub mod split;

/// Lazy, optionally shuffled batches.
pub mod batch;

use rand::Rng;

use crate::error::Result;

pub use batch::{Batches, batches};
pub use corpus::{Alphabet, Corpus, END_TOKEN, PAD_TOKEN};
pub use split::{Split, split};

/// Which part of the dataset to draw batches from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Subset {
	Train,
	Test,
	/// The whole corpus, ignoring the split.
	All,
}

/// A corpus together with its train/test split.
///
/// The split is drawn once, when the dataset is built. Building another
/// dataset from the same corpus draws a new split unless the random source
/// is seeded identically.
#[derive(Clone, Debug)]
pub struct NameDataset {
	corpus: Corpus,
	split: Split,
}

impl NameDataset {
	/// Splits `corpus` with the given test fraction.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `test_fraction` is not in `[0, 1)`.
	pub fn new<R>(corpus: Corpus, test_fraction: f64, rng: &mut R) -> Result<Self>
	where
		R: Rng + ?Sized,
	{
		let split = split(corpus.names(), test_fraction, rng)?;
		Ok(Self { corpus, split })
	}

	pub fn corpus(&self) -> &Corpus {
		&self.corpus
	}

	pub fn alphabet(&self) -> &Alphabet {
		self.corpus.alphabet()
	}

	pub fn end_token(&self) -> char {
		self.corpus.end_token()
	}

	pub fn train(&self) -> &[String] {
		&self.split.train
	}

	pub fn test(&self) -> &[String] {
		&self.split.test
	}

	/// Names belonging to `subset`.
	pub fn subset(&self, subset: Subset) -> &[String] {
		match subset {
			Subset::Train => &self.split.train,
			Subset::Test => &self.split.test,
			Subset::All => self.corpus.names(),
		}
	}

	/// Lazy batches over `subset`; see [`batches`].
	pub fn batches<R>(&self, subset: Subset, batch_size: usize, shuffle: bool, rng: &mut R) -> Result<Batches<'_>>
	where
		R: Rng + ?Sized,
	{
		batches(self.subset(subset), batch_size, shuffle, rng)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn dataset(seed: u64) -> NameDataset {
		let names = ["anna", "bob", "carl", "dora", "emil", "fred", "gina", "hugo", "ida", "jan"];
		let corpus = Corpus::from_lines(names).unwrap();
		NameDataset::new(corpus, 0.3, &mut StdRng::seed_from_u64(seed)).unwrap()
	}

	#[test]
	fn subsets_cover_the_corpus() {
		let dataset = dataset(4);
		assert_eq!(dataset.test().len(), 3);
		assert_eq!(dataset.train().len(), 7);
		assert_eq!(dataset.subset(Subset::All).len(), 10);
	}

	#[test]
	fn batches_are_drawn_from_the_requested_subset() {
		let dataset = dataset(4);
		let mut rng = StdRng::seed_from_u64(8);
		let drawn: Vec<&str> = dataset.batches(Subset::Test, 2, true, &mut rng).unwrap().flatten().collect();
		assert_eq!(drawn.len(), 3);
		assert!(drawn.iter().all(|name| dataset.test().iter().any(|t| t == name)));
	}

	#[test]
	fn same_seed_gives_same_split() {
		assert_eq!(dataset(21).test(), dataset(21).test());
	}
}
