use std::collections::HashMap;
use std::path::Path;
use std::thread;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use super::generator::NameGenerator;
use super::prediction::Prediction;
use super::state::ContextCounts;

use crate::dataset::{Alphabet, PAD_TOKEN};
use crate::error::{NameGenError, Result};
use crate::io::{read_bytes, write_bytes};

/// Smallest number of names worth a worker thread.
const MIN_CHUNK_SIZE: usize = 256;

/// Number of chunks `len` names are split into for parallel training.
///
/// At most one chunk per CPU, and no chunk smaller than `MIN_CHUNK_SIZE`
/// unless everything fits in a single one.
fn chunk_count(len: usize, cpus: usize) -> usize {
	if len == 0 {
		return 0;
	}
	len.div_ceil(MIN_CHUNK_SIZE).clamp(1, cpus.max(1))
}

/// Unwraps every worker result, failing as a whole if any worker panicked.
fn join_partials(results: Vec<thread::Result<NGramGenerator>>) -> Result<Vec<NGramGenerator>> {
	let total = results.len();
	let mut partials = Vec::with_capacity(total);
	for result in results {
		match result {
			Ok(partial) => partials.push(partial),
			Err(_) => {
				let failed = total - partials.len();
				warn!("Discarding parallel training: a worker panicked");
				return Err(NameGenError::WorkerPanicked(format!(
					"{failed} of {total} chunk(s) not merged"
				)));
			}
		}
	}
	Ok(partials)
}

/// Fixed-order character n-gram generator.
///
/// The `NGramGenerator` stores, for every context of `k` characters seen
/// during training, how often each next character followed it.
///
/// # Responsibilities
/// - Count context → next-character transitions from end-token terminated names
/// - Turn the counts of a context into a next-character distribution
/// - Merge with another generator of the same order `k`
/// - Save and load its counts
///
/// # Invariants
/// - `k` is always >= 1
/// - Each key of `contexts` is exactly `k` characters long
/// - Counts only grow: contexts are never removed
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct NGramGenerator {
	/// Number of characters in a context
	k: usize, // must be >= 1

	alphabet: Alphabet,

	/// Mapping from a context (length k) to its counts
	contexts: HashMap<String, ContextCounts>,
}

impl NGramGenerator {
	/// Creates a new, untrained generator of order `k`.
	///
	/// # Errors
	/// Returns `InvalidArgument` if `k < 1`.
	pub fn new(alphabet: Alphabet, k: usize) -> Result<Self> {
		if k < 1 {
			return Err(NameGenError::InvalidArgument("n-gram order k must be >= 1".to_owned()));
		}
		Ok(Self {
			k,
			alphabet,
			contexts: HashMap::new(),
		})
	}

	/// Untrained generator sharing the order and alphabet of `self`.
	fn empty_like(&self) -> Self {
		Self {
			k: self.k,
			alphabet: self.alphabet.clone(),
			contexts: HashMap::new(),
		}
	}

	pub fn order(&self) -> usize {
		self.k
	}

	/// Number of distinct contexts seen so far.
	pub fn context_len(&self) -> usize {
		self.contexts.len()
	}

	/// Counts recorded for `context`, `None` if it was never seen.
	pub fn counts(&self, context: &str) -> Option<&ContextCounts> {
		self.contexts.get(context)
	}

	/// `k` pad characters followed by `s`.
	fn padded(&self, s: &str) -> Vec<char> {
		std::iter::repeat_n(PAD_TOKEN, self.k).chain(s.chars()).collect()
	}

	/// Lookup context for a prefix: the last `k` characters of the padded prefix.
	pub fn context_for(&self, prefix: &str) -> String {
		let padded = self.padded(prefix);
		padded[padded.len() - self.k..].iter().collect()
	}

	/// Counts every (context, next character) window of a padded name.
	fn add_name(&mut self, name: &str) {
		let padded = self.padded(name);

		for i in 0..padded.len() - self.k {
			let context: String = padded[i..i + self.k].iter().collect();
			let next_char = padded[i + self.k];

			self.contexts
				.entry(context)
				.or_insert_with_key(|key| ContextCounts::new(key))
				.observe(next_char);
		}
	}

	/// Merges another generator into this one.
	///
	/// # Notes
	/// - Both generators must have the same order `k`.
	/// - Counts for matching contexts and characters are summed, so merging
	///   is associative and commutative.
	///
	/// # Errors
	/// Returns `OrderMismatch` if the orders differ.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.k != other.k {
			return Err(NameGenError::OrderMismatch {
				expected: self.k,
				found: other.k,
			});
		}

		for (key, counts) in &other.contexts {
			if let Some(existing) = self.contexts.get_mut(key) {
				existing.merge(counts)?;
			} else {
				self.contexts.insert(key.clone(), counts.clone());
			}
		}
		self.alphabet.extend(other.alphabet.iter().copied());

		Ok(())
	}

	/// Serializes the generator with `postcard`.
	pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
		let bytes = postcard::to_stdvec(self)?;
		write_bytes(&path, &bytes)?;
		debug!("{}: saved {} bytes to {}", self.name(), bytes.len(), path.as_ref().display());
		Ok(())
	}

	/// Loads a generator previously written by [`NGramGenerator::save`].
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let bytes = read_bytes(&path)?;
		let generator: Self = postcard::from_bytes(&bytes)?;
		if generator.k < 1 {
			return Err(NameGenError::InvalidArgument(format!(
				"{} holds an n-gram model of order 0",
				path.as_ref().display()
			)));
		}
		Ok(generator)
	}
}

impl NameGenerator for NGramGenerator {
	/// Seen context: relative frequencies with floored, renormalized unseen
	/// characters. Unseen context: the uniform distribution, no back-off.
	fn predict(&self, prefixes: &[&str]) -> Vec<Prediction> {
		prefixes
			.iter()
			.map(|prefix| match self.contexts.get(&self.context_for(prefix)) {
				Some(counts) => counts.prediction(&self.alphabet),
				None => Prediction::uniform(&self.alphabet),
			})
			.collect()
	}

	fn train(&mut self, names: &[&str]) {
		for name in names {
			self.add_name(name);
		}
		debug!(
			"{}: trained on {} names, {} contexts",
			self.name(),
			names.len(),
			self.contexts.len()
		);
	}

	/// One scoped worker thread per chunk of names, partial counts merged
	/// once every worker has finished. Small batches are trained in place.
	fn train_parallel(&mut self, names: &[&str]) -> Result<()> {
		let chunks = chunk_count(names.len(), num_cpus::get());
		if chunks <= 1 {
			self.train(names);
			return Ok(());
		}
		let chunk_size = names.len().div_ceil(chunks);

		let results: Vec<thread::Result<Self>> = thread::scope(|scope| {
			let handles: Vec<_> = names
				.chunks(chunk_size)
				.map(|chunk| {
					let mut partial = self.empty_like();
					scope.spawn(move || {
						for name in chunk {
							partial.add_name(name);
						}
						partial
					})
				})
				.collect();
			handles.into_iter().map(|handle| handle.join()).collect()
		});

		let partials = join_partials(results)?;
		for partial in &partials {
			self.merge(partial)?;
		}

		info!(
			"{}: trained on {} names in {} chunks, {} contexts",
			self.name(),
			names.len(),
			partials.len(),
			self.contexts.len()
		);
		Ok(())
	}

	fn name(&self) -> String {
		format!("N-Gram(k={})", self.k)
	}

	fn alphabet(&self) -> &Alphabet {
		&self.alphabet
	}
}
