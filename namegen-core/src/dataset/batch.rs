use std::iter::FusedIterator;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{NameGenError, Result};

/// Lazy sequence of batches over a subset of names.
///
/// The traversal order is fixed when the iterator is created (shuffled or
/// not); each batch is only materialized when `next` is called. Calling
/// [`batches`] again yields a fresh, independently shuffled sequence.
#[derive(Clone, Debug)]
pub struct Batches<'a> {
	names: &'a [String],
	order: Vec<usize>,
	batch_size: usize,
	position: usize,
}

/// Splits `names` into consecutive runs of `batch_size` names.
///
/// Produces `ceil(len / batch_size)` batches; the last one may be shorter.
/// An empty subset produces no batch at all.
///
/// # Errors
/// Returns `InvalidArgument` if `batch_size` is 0.
pub fn batches<'a, R>(names: &'a [String], batch_size: usize, shuffle: bool, rng: &mut R) -> Result<Batches<'a>>
where
	R: Rng + ?Sized,
{
	if batch_size == 0 {
		return Err(NameGenError::InvalidArgument("batch size must be > 0".to_owned()));
	}

	let mut order: Vec<usize> = (0..names.len()).collect();
	if shuffle {
		order.shuffle(rng);
	}

	Ok(Batches {
		names,
		order,
		batch_size,
		position: 0,
	})
}

impl<'a> Iterator for Batches<'a> {
	type Item = Vec<&'a str>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.position >= self.order.len() {
			return None;
		}

		let end = (self.position + self.batch_size).min(self.order.len());
		let batch = self.order[self.position..end]
			.iter()
			.map(|&i| self.names[i].as_str())
			.collect();
		self.position = end;
		Some(batch)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		let remaining = (self.order.len() - self.position).div_ceil(self.batch_size);
		(remaining, Some(remaining))
	}
}

impl ExactSizeIterator for Batches<'_> {}

impl FusedIterator for Batches<'_> {}
