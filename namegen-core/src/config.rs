use std::path::Path;

use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::dataset::split::check_test_fraction;
use crate::error::{NameGenError, Result};
use crate::io::read_string;

/// Parameters of a training and evaluation run.
///
/// Every field has a default, so a partial (or empty) JSON config is
/// accepted, e.g. `{"orders": [2, 3], "seed": 7}`. [`TrainingConfig::from_json`]
/// and [`TrainingConfig::load`] validate what they read.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TrainingConfig {
	/// Fraction of the corpus held out for testing, in `[0, 1)`.
	pub test_fraction: f64,

	/// Number of names per batch (> 0).
	pub batch_size: usize,

	/// Whether batches are drawn in a fresh random order on every sweep.
	pub shuffle: bool,

	/// One n-gram generator is built for each order (each >= 1).
	pub orders: Vec<usize>,

	/// Seed of the random source. `None` draws one from the OS.
	pub seed: Option<u64>,

	/// Number of names sampled per generator when reporting.
	pub sample_count: usize,

	/// Optional cap on generated name length.
	pub max_name_length: Option<usize>,

	/// Train n-gram models on worker threads.
	pub parallel: bool,
}

impl Default for TrainingConfig {
	fn default() -> Self {
		Self {
			test_fraction: 0.1,
			batch_size: 100,
			shuffle: true,
			orders: vec![1, 2, 3, 4],
			seed: None,
			sample_count: 5,
			max_name_length: None,
			parallel: false,
		}
	}
}

impl TrainingConfig {
	/// Checks every parameter range.
	///
	/// # Errors
	/// Returns `InvalidArgument` describing the first invalid parameter.
	pub fn validate(&self) -> Result<()> {
		check_test_fraction(self.test_fraction)?;
		if self.batch_size == 0 {
			return Err(NameGenError::InvalidArgument("batch size must be > 0".to_owned()));
		}
		if self.orders.is_empty() {
			return Err(NameGenError::InvalidArgument("at least one n-gram order is required".to_owned()));
		}
		if let Some(k) = self.orders.iter().find(|&&k| k < 1) {
			return Err(NameGenError::InvalidArgument(format!("n-gram order must be >= 1, got {k}")));
		}
		if self.max_name_length == Some(0) {
			return Err(NameGenError::InvalidArgument("max name length must be > 0".to_owned()));
		}
		Ok(())
	}

	/// Parses and validates a JSON config. Missing fields take their default.
	pub fn from_json(json: &str) -> Result<Self> {
		let config: Self = serde_json::from_str(json)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads a JSON config file, see [`TrainingConfig::from_json`].
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let config = Self::from_json(&read_string(&path)?)?;
		info!("Loaded config from {}", path.as_ref().display());
		Ok(config)
	}

	/// Random source for the run: seeded if `seed` is set.
	pub fn rng(&self) -> StdRng {
		match self.seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::Rng;

	#[test]
	fn defaults_are_valid() {
		TrainingConfig::default().validate().unwrap();
	}

	#[test]
	fn invalid_parameters_are_reported() {
		let cases = [
			TrainingConfig { test_fraction: 1.0, ..Default::default() },
			TrainingConfig { batch_size: 0, ..Default::default() },
			TrainingConfig { orders: vec![], ..Default::default() },
			TrainingConfig { orders: vec![1, 0], ..Default::default() },
			TrainingConfig { max_name_length: Some(0), ..Default::default() },
		];
		for config in cases {
			assert!(matches!(config.validate(), Err(NameGenError::InvalidArgument(_))), "{config:?}");
		}
	}

	#[test]
	fn empty_json_gives_the_defaults() {
		assert_eq!(TrainingConfig::from_json("{}").unwrap(), TrainingConfig::default());
	}

	#[test]
	fn partial_json_overrides_only_its_fields() {
		let config = TrainingConfig::from_json(r#"{"orders": [2, 5], "seed": 7, "parallel": true}"#).unwrap();
		assert_eq!(
			config,
			TrainingConfig {
				orders: vec![2, 5],
				seed: Some(7),
				parallel: true,
				..Default::default()
			}
		);
	}

	#[test]
	fn json_is_validated() {
		assert!(matches!(
			TrainingConfig::from_json(r#"{"batch_size": 0}"#),
			Err(NameGenError::InvalidArgument(_))
		));
		assert!(matches!(TrainingConfig::from_json("{not json"), Err(NameGenError::Json(_))));
	}

	#[test]
	fn config_file_is_loaded() {
		let path = std::env::temp_dir().join(format!("namegen-config-{}.json", std::process::id()));
		std::fs::write(&path, r#"{"test_fraction": 0.25, "batch_size": 32}"#).unwrap();
		let config = TrainingConfig::load(&path).unwrap();
		std::fs::remove_file(&path).unwrap();

		assert_eq!(config.test_fraction, 0.25);
		assert_eq!(config.batch_size, 32);
		assert_eq!(config.orders, vec![1, 2, 3, 4]);
	}

	#[test]
	fn seeded_rng_is_reproducible() {
		let config = TrainingConfig { seed: Some(12), ..Default::default() };
		let a: u64 = config.rng().random();
		let b: u64 = config.rng().random();
		assert_eq!(a, b);
	}
}
