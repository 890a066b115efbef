use crate::error::ModelError;

/// Strategy used to select the starting kgram of a generated passage.
///
/// # Variants
/// - `Text`: the first `order` characters of the first trained text.
/// - `Random`: an observed kgram picked with the model's generator.
/// - `Custom(Vec<u8>)`: the given kgram, which must have `order` characters.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum StartSeed {
	#[default]
	Text,
	Random,
	Custom(Vec<u8>),
}

/// Parameters of a single generation run.
///
/// # Invariants
/// - `max_length` is always >= 1
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationInput {
	/// Maximum number of characters appended after the starting kgram.
	max_length: usize,

	/// How the starting kgram is chosen.
	pub start_seed: StartSeed,
}

impl Default for GenerationInput {
	fn default() -> Self {
		Self {
			max_length: 100,
			start_seed: StartSeed::Text,
		}
	}
}

impl GenerationInput {
	/// Creates generation parameters.
	///
	/// # Errors
	/// Returns `ModelError::InvalidLength` if `max_length == 0`.
	pub fn new(max_length: usize, start_seed: StartSeed) -> Result<Self, ModelError> {
		let mut input = Self { start_seed, ..Self::default() };
		input.set_max_length(max_length)?;
		Ok(input)
	}

	/// Returns the maximum number of generated characters.
	pub fn max_length(&self) -> usize {
		self.max_length
	}

	/// Sets the maximum number of generated characters.
	///
	/// # Errors
	/// Returns `ModelError::InvalidLength` if `max_length == 0`.
	pub fn set_max_length(&mut self, max_length: usize) -> Result<(), ModelError> {
		if max_length == 0 {
			return Err(ModelError::InvalidLength);
		}
		self.max_length = max_length;
		Ok(())
	}
}
