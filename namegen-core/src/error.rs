use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by the name generation library.
///
/// Characters missing from a prediction are never an error: evaluation
/// substitutes the floor probability instead. Empty corpora and empty
/// subsets are boundary cases and simply produce empty results.
#[derive(Error, Debug)]
pub enum NameGenError {
	/// A parameter is outside of its valid range (batch size, split fraction, order...)
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	/// A corpus line contains a reserved token
	#[error("Name {name:?} contains the reserved token {token:?}")]
	ReservedCharacter { name: String, token: char },

	/// Two n-gram models of different orders cannot be merged
	#[error("Order mismatch: expected k={expected}, found k={found}")]
	OrderMismatch { expected: usize, found: usize },

	/// Two context records with different keys cannot be merged
	#[error("Context mismatch: {expected:?} != {found:?}")]
	ContextMismatch { expected: String, found: String },

	/// I/O error with file context
	#[error("I/O error for {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// A training worker thread panicked; no partial counts were merged
	#[error("Training worker panicked: {0}")]
	WorkerPanicked(String),

	/// Config (de)serialization error
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// Model (de)serialization error
	#[error("Serialization error: {0}")]
	Serialization(#[from] postcard::Error),
}

/// Result type alias for name generation operations.
pub type Result<T> = std::result::Result<T, NameGenError>;
