use log::debug;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{NameGenError, Result};

/// Disjoint train/test partition of a list of names.
///
/// ## Invariants
/// - `train.len() + test.len()` equals the size of the partitioned list
/// - Every name of the partitioned list lands in exactly one side
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Split {
	pub train: Vec<String>,
	pub test: Vec<String>,
}

/// Checks that a test fraction lies in `[0, 1)`.
pub fn check_test_fraction(test_fraction: f64) -> Result<()> {
	if !(0.0..1.0).contains(&test_fraction) {
		return Err(NameGenError::InvalidArgument(format!(
			"test fraction must be in [0, 1), got {test_fraction}"
		)));
	}
	Ok(())
}

/// Randomly partitions `names` into train and test subsets.
///
/// `floor(len * test_fraction)` names go to the test side, the rest to the
/// train side. Both sides keep the shuffled order.
///
/// # Errors
/// Returns `InvalidArgument` if `test_fraction` is not in `[0, 1)`.
pub fn split<R>(names: &[String], test_fraction: f64, rng: &mut R) -> Result<Split>
where
	R: Rng + ?Sized,
{
	check_test_fraction(test_fraction)?;

	let test_size = (names.len() as f64 * test_fraction).floor() as usize;

	let mut indices: Vec<usize> = (0..names.len()).collect();
	indices.shuffle(rng);

	let (test_indices, train_indices) = indices.split_at(test_size);
	let pick = |indices: &[usize]| -> Vec<String> { indices.iter().map(|&i| names[i].clone()).collect() };

	let split = Split {
		train: pick(train_indices),
		test: pick(test_indices),
	};
	debug!("Split {} names into {} train / {} test", names.len(), split.train.len(), split.test.len());
	Ok(split)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use std::collections::HashSet;

	fn names(n: usize) -> Vec<String> {
		(0..n).map(|i| format!("name{i}>")).collect()
	}

	#[test]
	fn sizes_follow_the_floor_rule() {
		let mut rng = StdRng::seed_from_u64(7);
		for (n, fraction, expected) in [(10, 0.25, 2), (10, 0.0, 0), (7, 0.5, 3), (3, 0.99, 2), (0, 0.5, 0)] {
			let split = split(&names(n), fraction, &mut rng).unwrap();
			assert_eq!(split.test.len(), expected, "n={n} fraction={fraction}");
			assert_eq!(split.train.len() + split.test.len(), n);
		}
	}

	#[test]
	fn partition_is_disjoint_and_exhaustive() {
		let all = names(50);
		let split = split(&all, 0.3, &mut StdRng::seed_from_u64(1)).unwrap();

		let train: HashSet<&String> = split.train.iter().collect();
		let test: HashSet<&String> = split.test.iter().collect();
		assert!(train.is_disjoint(&test));

		let union: HashSet<&String> = train.union(&test).copied().collect();
		let expected: HashSet<&String> = all.iter().collect();
		assert_eq!(union, expected);
	}

	#[test]
	fn seeded_split_is_reproducible() {
		let all = names(40);
		let a = split(&all, 0.2, &mut StdRng::seed_from_u64(99)).unwrap();
		let b = split(&all, 0.2, &mut StdRng::seed_from_u64(99)).unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn out_of_range_fractions_are_rejected() {
		let mut rng = StdRng::seed_from_u64(0);
		for fraction in [-0.1, 1.0, 1.5, f64::NAN] {
			let err = split(&names(5), fraction, &mut rng).unwrap_err();
			assert!(matches!(err, NameGenError::InvalidArgument(_)));
		}
	}
}
