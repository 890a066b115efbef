//! Order-k character Markov model and the text generator built on top of it.
//!
//! - Fixed-order model over 8-bit characters (`MarkovModel`)
//! - Per-kgram successor counts (`FrequencyVector`, internal)
//! - Generation configuration (`GenerationInput`)
//! - A high-level generation interface (`Generator`)

/// High-level interface for training from files and generating passages.
pub mod generator;

/// Validated generation parameters and start seed strategies.
pub mod generation_input;

/// Order-k model: training, frequency queries, weighted sampling, merging.
pub mod markov_model;

/// Successor counts of a single kgram.
///
/// This module is not exposed publicly.
mod frequency;
