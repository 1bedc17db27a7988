//! Character-level name generation library.
//!
//! This crate provides a small statistical name generation system including:
//! - Corpus loading, train/test splitting and lazy batching
//! - A uniform baseline and fixed-order character n-gram generators
//! - Weighted sampling of new names and log-likelihood scoring
//! - Run configuration and training helpers
//!
//! All randomness goes through an explicit `rand::Rng` handle, so a seeded
//! random source makes splitting, batching and generation reproducible.

/// Corpus, train/test split and batches.
pub mod dataset;

/// Name generators and the shared sampling/scoring algorithms.
pub mod model;

/// Run parameters.
pub mod config;

/// Error type of the library.
pub mod error;

/// Training sweeps over a dataset.
pub mod training;

/// I/O utilities (file loading, path helpers).
pub mod io;

pub use config::TrainingConfig;
pub use dataset::{Alphabet, Corpus, END_TOKEN, NameDataset, PAD_TOKEN, Subset};
pub use error::{NameGenError, Result};
pub use model::{
	BoxedGenerator, FLOOR_PROBABILITY, NGramGenerator, NameGenerator, Prediction, UniformGenerator, build_generators,
	evaluate_batch, generate, generate_names, generate_with_limit,
};
