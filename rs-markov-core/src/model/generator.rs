use crate::error::ModelError;
use crate::io;
use crate::model::generation_input::{GenerationInput, StartSeed};
use crate::model::markov_model::{MarkovModel, NO_CHARACTER};
use log::{debug, trace};
use std::path::Path;

/// High-level driver: trains a `MarkovModel` from text and generates passages.
///
/// # Responsibilities
/// - Train the model from files, directories, or in-memory text
/// - Remember where the first trained text started (`StartSeed::Text`)
/// - Generate text by repeated sampling until the end marker or a length cap
#[derive(Clone, Debug)]
pub struct Generator {
	model: MarkovModel,

	/// First `order` characters of the first text long enough to train on.
	text_seed: Option<Vec<u8>>,

	/// Names (without extension) of the files trained so far.
	trained_files: Vec<String>,
}

impl Generator {
	/// Creates a generator around an empty model.
	///
	/// # Errors
	/// Returns `ModelError::InvalidOrder` if `order == 0`.
	pub fn new(order: usize, seed: i64) -> Result<Self, ModelError> {
		Ok(Self::from_model(MarkovModel::new(order, seed)?))
	}

	/// Wraps an existing model.
	///
	/// `StartSeed::Text` falls back to a random kgram until a text is trained.
	pub fn from_model(model: MarkovModel) -> Self {
		Self {
			model,
			text_seed: None,
			trained_files: Vec::new(),
		}
	}

	/// Creates a generator trained on a file, or on a directory of `.txt` files.
	///
	/// # Behavior
	/// - A file path is trained on directly, whatever its extension.
	/// - For a directory, every `.txt` file directly inside it is trained on,
	///   in name order (subdirectories are ignored).
	/// - Both `"folder"` and `"folder/"` are accepted, `"."` is the current directory.
	///
	/// # Errors
	/// - `ModelError::InvalidOrder` if `order == 0`.
	/// - `ModelError::NotFound` if the path does not exist.
	/// - `ModelError::Io` if a file cannot be read.
	pub fn load<P: AsRef<Path>>(filepath: P, order: usize, seed: i64) -> Result<Self, ModelError> {
		let mut generator = Self::new(order, seed)?;

		let path = match filepath.as_ref().to_str() {
			Some(s) => io::normalize_folder(s),
			None => filepath.as_ref().to_path_buf(),
		};

		if path.is_dir() {
			for file in io::list_files(&path, "txt")? {
				generator.train_file(path.join(&file))?;
			}
		} else if path.is_file() {
			generator.train_file(&path)?;
		} else {
			return Err(ModelError::NotFound(path));
		}

		Ok(generator)
	}

	/// Returns the underlying model.
	pub fn model(&self) -> &MarkovModel {
		&self.model
	}

	/// Returns the underlying model, for queries that advance its generator.
	pub fn model_mut(&mut self) -> &mut MarkovModel {
		&mut self.model
	}

	/// Returns the names of the files trained so far, in training order.
	pub fn trained_files(&self) -> &[String] {
		&self.trained_files
	}

	/// Trains the model on in-memory text. Counts accumulate.
	pub fn train_text(&mut self, text: &[u8]) {
		if self.text_seed.is_none() {
			let order = self.model.order();
			let head: Vec<u8> = text.iter().copied().filter(|&c| c != NO_CHARACTER).take(order).collect();
			if head.len() == order {
				self.text_seed = Some(head);
			}
		}
		self.model.train(text);
	}

	/// Trains the model on the content of a file.
	///
	/// # Errors
	/// Returns `ModelError::Io` if the file cannot be read.
	pub fn train_file<P: AsRef<Path>>(&mut self, filepath: P) -> Result<(), ModelError> {
		let text = io::read_text(&filepath)?;
		let name = io::get_filename(&filepath)?;
		debug!("training on {} ({} bytes)", filepath.as_ref().display(), text.len());
		self.train_named(&name, &text);
		Ok(())
	}

	/// Trains the model on text read elsewhere and records `name` as trained.
	pub fn train_named(&mut self, name: &str, text: &[u8]) {
		self.train_text(text);
		self.trained_files.push(name.to_owned());
	}

	/// Generates a passage.
	///
	/// The output starts with the starting kgram chosen by `input.start_seed`,
	/// then characters are sampled from the last `order` characters until
	/// `NO_CHARACTER` is drawn or `input.max_length()` characters were added.
	///
	/// # Errors
	/// - `ModelError::EmptyModel` if nothing was trained.
	/// - `ModelError::KgramLength` if a custom seed does not have `order` characters.
	pub fn generate(&mut self, input: &GenerationInput) -> Result<Vec<u8>, ModelError> {
		if self.model.is_empty() {
			return Err(ModelError::EmptyModel);
		}
		let order = self.model.order();

		let mut output = match &input.start_seed {
			StartSeed::Text => self
				.text_seed
				.clone()
				.or_else(|| self.model.random_kgram())
				.ok_or(ModelError::EmptyModel)?,
			StartSeed::Random => self.model.random_kgram().ok_or(ModelError::EmptyModel)?,
			StartSeed::Custom(kgram) => {
				if kgram.len() != order {
					return Err(ModelError::KgramLength {
						expected: order,
						actual: kgram.len(),
					});
				}
				kgram.clone()
			}
		};

		for _ in 0..input.max_length() {
			let next = self.model.sample_next(&output[output.len() - order..]);
			if next == NO_CHARACTER {
				trace!("end of sequence after {} characters", output.len());
				break;
			}
			output.push(next);
		}

		Ok(output)
	}

	/// Same as `generate`, decoded as latin-1 text.
	pub fn generate_string(&mut self, input: &GenerationInput) -> Result<String, ModelError> {
		Ok(io::latin1_to_string(&self.generate(input)?))
	}
}
