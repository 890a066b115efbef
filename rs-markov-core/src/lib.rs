//! Character-level Markov text generation library.
//!
//! This crate provides:
//! - An order-k Markov model over 8-bit characters
//! - Deterministic training and seeded weighted sampling
//! - A generator driving passages out of a trained model
//! - I/O helpers for raw text files

/// Markov model and generation logic.
pub mod model;

/// Error type shared by the model and the generator.
pub mod error;

/// I/O utilities (file loading, path helpers, latin-1 conversions).
pub mod io;

pub use error::ModelError;
pub use model::generation_input::{GenerationInput, StartSeed};
pub use model::generator::Generator;
pub use model::markov_model::{ALPHABET_SIZE, MarkovModel, NO_CHARACTER};
