use std::collections::BTreeSet;
use std::path::Path;

use log::{debug, info};

use crate::error::{NameGenError, Result};
use crate::io::read_lines;

/// Character marking the end of every name.
pub const END_TOKEN: char = '>';

/// Character used to left-pad n-gram contexts.
pub const PAD_TOKEN: char = '<';

/// Ordered set of characters known to the models (end token included).
pub type Alphabet = BTreeSet<char>;

/// The loaded list of names.
///
/// ## Invariants
/// - Every name is lower-case and ends with exactly one `END_TOKEN`
/// - Neither `END_TOKEN` nor `PAD_TOKEN` appears anywhere else in a name
/// - Every character of every name belongs to `alphabet`
#[derive(Clone, Debug)]
pub struct Corpus {
	names: Vec<String>,
	alphabet: Alphabet,
}

impl Corpus {
	/// Builds a corpus from raw lines.
	///
	/// Lines are trimmed and lower-cased, blank lines are skipped and the
	/// end token is appended to each name.
	///
	/// # Errors
	/// Returns `ReservedCharacter` if a line contains `END_TOKEN` or `PAD_TOKEN`.
	pub fn from_lines<I, S>(lines: I) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut names = Vec::new();
		let mut alphabet = Alphabet::new();
		alphabet.insert(END_TOKEN);

		let mut skipped = 0usize;
		for line in lines {
			let name = line.as_ref().trim().to_lowercase();
			if name.is_empty() {
				skipped += 1;
				continue;
			}
			for token in [END_TOKEN, PAD_TOKEN] {
				if name.contains(token) {
					return Err(NameGenError::ReservedCharacter { name, token });
				}
			}

			alphabet.extend(name.chars());
			names.push(format!("{name}{END_TOKEN}"));
		}

		if skipped > 0 {
			debug!("Skipped {skipped} blank line(s)");
		}

		Ok(Self { names, alphabet })
	}

	/// Loads a newline-separated list of names from disk.
	pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
		let corpus = Self::from_lines(read_lines(&path)?)?;
		info!(
			"Loaded {} names ({} characters) from {}",
			corpus.len(),
			corpus.alphabet.len(),
			path.as_ref().display()
		);
		Ok(corpus)
	}

	/// All names, each terminated by the end token.
	pub fn names(&self) -> &[String] {
		&self.names
	}

	/// Distinct characters across the corpus plus the end token.
	pub fn alphabet(&self) -> &Alphabet {
		&self.alphabet
	}

	pub fn end_token(&self) -> char {
		END_TOKEN
	}

	pub fn len(&self) -> usize {
		self.names.len()
	}

	pub fn is_empty(&self) -> bool {
		self.names.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn names_are_normalized_and_terminated() {
		let corpus = Corpus::from_lines(["  John", "MARY\r", "", "   "]).unwrap();
		assert_eq!(corpus.names(), &["john>".to_owned(), "mary>".to_owned()]);
	}

	#[test]
	fn alphabet_covers_every_name_and_end_token() {
		let corpus = Corpus::from_lines(["ab", "ac"]).unwrap();
		let expected: Alphabet = ['a', 'b', 'c', END_TOKEN].into_iter().collect();
		assert_eq!(corpus.alphabet(), &expected);
		for name in corpus.names() {
			assert!(name.chars().all(|c| corpus.alphabet().contains(&c)));
		}
	}

	#[test]
	fn empty_input_gives_empty_corpus_with_end_token() {
		let corpus = Corpus::from_lines(Vec::<String>::new()).unwrap();
		assert!(corpus.is_empty());
		assert_eq!(corpus.alphabet().len(), 1);
		assert_eq!(corpus.end_token(), END_TOKEN);
	}

	#[test]
	fn reserved_tokens_are_rejected() {
		let err = Corpus::from_lines(["jo>hn"]).unwrap_err();
		assert!(matches!(err, NameGenError::ReservedCharacter { token: END_TOKEN, .. }));

		let err = Corpus::from_lines(["<mary"]).unwrap_err();
		assert!(matches!(err, NameGenError::ReservedCharacter { token: PAD_TOKEN, .. }));
	}
}
