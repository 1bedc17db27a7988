use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{NameGenError, Result};

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_lines<P: AsRef<Path>>(filename: P) -> Result<Vec<String>> {
	Ok(read_string(filename)?.lines().map(str::to_owned).collect())
}

/// Reads a whole text file.
pub(crate) fn read_string<P: AsRef<Path>>(filename: P) -> Result<String> {
	let path = filename.as_ref();
	fs::read_to_string(path).map_err(|source| NameGenError::Io {
		path: path.to_path_buf(),
		source,
	})
}

/// Reads a whole binary file.
pub(crate) fn read_bytes<P: AsRef<Path>>(filename: P) -> Result<Vec<u8>> {
	let path = filename.as_ref();
	fs::read(path).map_err(|source| NameGenError::Io {
		path: path.to_path_buf(),
		source,
	})
}

/// Writes a whole binary file, creating the parent directory if needed.
pub(crate) fn write_bytes<P: AsRef<Path>>(filename: P, bytes: &[u8]) -> Result<()> {
	let path = filename.as_ref();
	let io_error = |source| NameGenError::Io {
		path: path.to_path_buf(),
		source,
	};

	if let Some(parent) = path.parent() {
		if !parent.as_os_str().is_empty() {
			fs::create_dir_all(parent).map_err(io_error)?;
		}
	}
	fs::write(path, bytes).map_err(io_error)
}

/// Builds an output path based on a directory, a file stem and an extension.
///
/// Example:
/// `models` + `"ngram-3"` + `"bin"` → `models/ngram-3.bin`
pub fn build_output_path<P: AsRef<Path>>(dir: P, stem: &str, extension: &str) -> PathBuf {
	let mut output = dir.as_ref().to_path_buf();
	output.push(stem);
	output.set_extension(extension);
	output
}
