use std::path::PathBuf;

use thiserror::Error;

/// Errors reported by the Markov model and the generation driver.
///
/// Querying a kgram that was never observed is *not* an error: frequency
/// queries answer `0` and sampling answers `NO_CHARACTER`.
#[derive(Error, Debug)]
pub enum ModelError {
	/// A model needs at least one character of context.
	#[error("order must be >= 1")]
	InvalidOrder,

	/// The kgram does not have exactly `order` characters.
	#[error("kgram has {actual} characters, model order is {expected}")]
	KgramLength { expected: usize, actual: usize },

	/// Two models of different orders cannot be merged.
	#[error("order mismatch: expected {expected}, got {actual}")]
	OrderMismatch { expected: usize, actual: usize },

	/// Generation needs to produce at least one character.
	#[error("generation length must be >= 1")]
	InvalidLength,

	/// Nothing has been trained yet.
	#[error("no kgram available for generation")]
	EmptyModel,

	#[error("path not found: {}", .0.display())]
	NotFound(PathBuf),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}
