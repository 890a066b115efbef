use super::frequency::FrequencyVector;
use crate::error::ModelError;
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;

/// Reserved code marking the end of a sequence (or the absence of a successor).
pub const NO_CHARACTER: u8 = 0;

/// Number of character codes tracked per kgram, the sentinel included.
pub const ALPHABET_SIZE: usize = 256;

/// Order-k character-level Markov model.
///
/// Maps every kgram (`order` consecutive characters) seen during training to
/// the counts of the characters that followed it, and samples successors in
/// proportion to those counts.
///
/// # Responsibilities
/// - Count kgram → successor transitions over 8-bit text
/// - Answer frequency queries for a kgram, or a kgram and a successor
/// - Sample the next character with a generator owned by the instance
/// - Merge with another model of the same order
///
/// # Invariants
/// - `order` is always >= 1
/// - Every key in `table` has exactly `order` characters, none of them `NO_CHARACTER`
/// - Every stored vector has a total >= 1
///
/// # Concurrency
/// Sampling advances the generator and needs `&mut self`. Sharing a model
/// between threads requires external mutual exclusion (e.g. a `Mutex`).
#[derive(Clone, Debug)]
pub struct MarkovModel {
	/// Number of characters in a kgram.
	order: usize,

	/// Successor counts for every observed kgram.
	table: HashMap<Box<[u8]>, FrequencyVector>,

	/// Source of randomness for sampling, seeded at construction.
	generator: StdRng,
}

impl MarkovModel {
	/// Creates an empty model of the given order, seeded with `seed`.
	///
	/// Any `i64` is accepted; negative seeds are reinterpreted bit for bit.
	/// Two models built with the same order and seed, fed the same calls,
	/// produce the same samples.
	///
	/// # Errors
	/// Returns `ModelError::InvalidOrder` if `order == 0`.
	pub fn new(order: usize, seed: i64) -> Result<Self, ModelError> {
		if order == 0 {
			return Err(ModelError::InvalidOrder);
		}
		Ok(Self {
			order,
			table: HashMap::new(),
			generator: StdRng::seed_from_u64(seed as u64),
		})
	}

	/// Returns the order (kgram length) of the model.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Number of distinct kgrams observed so far.
	pub fn len(&self) -> usize {
		self.table.len()
	}

	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}

	/// Counts every kgram of `text` together with the character that follows it.
	///
	/// A sentinel (`NO_CHARACTER`) is conceptually appended to the text, so the
	/// last kgram is recorded as being followed by "end of sequence".
	/// NUL bytes inside `text` are not characters and are dropped before the
	/// kgrams are formed.
	///
	/// Counts accumulate across calls; nothing is ever reset.
	///
	/// # Notes
	/// - Texts shorter than `order` contribute nothing.
	pub fn train(&mut self, text: &[u8]) {
		let chars: Vec<u8> = text.iter().copied().filter(|&c| c != NO_CHARACTER).collect();
		if chars.len() < self.order {
			debug!("text of {} characters is shorter than order {}, skipped", chars.len(), self.order);
			return;
		}

		let windows = chars.len() - self.order + 1;
		for i in 0..windows {
			let kgram = &chars[i..i + self.order];
			// Past the end of the text sits the appended sentinel
			let successor = chars.get(i + self.order).copied().unwrap_or(NO_CHARACTER);

			match self.table.get_mut(kgram) {
				Some(vector) => vector.add(successor),
				None => {
					let mut vector = FrequencyVector::new();
					vector.add(successor);
					self.table.insert(kgram.into(), vector);
				}
			}
		}

		debug!("trained {} windows, {} distinct kgrams", windows, self.table.len());
	}

	/// Returns how many times `kgram` appeared in the training text.
	///
	/// Unobserved kgrams answer `0`.
	///
	/// # Errors
	/// Returns `ModelError::KgramLength` if `kgram` does not have `order` characters.
	pub fn frequency(&self, kgram: &[u8]) -> Result<usize, ModelError> {
		self.check_kgram(kgram)?;
		Ok(self.table.get(kgram).map_or(0, FrequencyVector::total))
	}

	/// Returns how many times `character` immediately followed `kgram`.
	///
	/// Passing `NO_CHARACTER` counts how often `kgram` ended a text.
	/// Unobserved kgrams answer `0`.
	///
	/// # Errors
	/// Returns `ModelError::KgramLength` if `kgram` does not have `order` characters.
	pub fn frequency_of(&self, kgram: &[u8], character: u8) -> Result<usize, ModelError> {
		self.check_kgram(kgram)?;
		Ok(self.table.get(kgram).map_or(0, |vector| vector.count(character)))
	}

	/// Samples the character following `kgram`.
	///
	/// Each successor is drawn with probability proportional to how often it
	/// followed `kgram` during training. The result may be `NO_CHARACTER`,
	/// which callers should read as "end of generation".
	///
	/// Returns `NO_CHARACTER` if `kgram` has the wrong length or was never
	/// observed.
	pub fn sample_next(&mut self, kgram: &[u8]) -> u8 {
		if kgram.len() != self.order {
			return NO_CHARACTER;
		}
		let Some(vector) = self.table.get(kgram) else {
			return NO_CHARACTER;
		};
		if vector.total() == 0 {
			return NO_CHARACTER;
		}

		let r = self.generator.random_range(0..vector.total());
		vector.pick(r).unwrap_or(NO_CHARACTER)
	}

	/// Returns every observed kgram, sorted.
	pub fn kgrams(&self) -> Vec<&[u8]> {
		let mut kgrams: Vec<&[u8]> = self.table.keys().map(|key| &**key).collect();
		kgrams.sort_unstable();
		kgrams
	}

	/// Picks one observed kgram uniformly, using the model's generator.
	///
	/// The candidates are taken in sorted order so the pick only depends on
	/// the seed and the training history.
	/// Returns `None` if nothing was trained.
	pub fn random_kgram(&mut self) -> Option<Vec<u8>> {
		if self.table.is_empty() {
			return None;
		}
		let mut kgrams: Vec<&[u8]> = self.table.keys().map(|key| &**key).collect();
		kgrams.sort_unstable();
		let index = self.generator.random_range(0..kgrams.len());
		Some(kgrams[index].to_vec())
	}

	/// Merges another model into this one.
	///
	/// Counts of matching kgrams are summed, the others are copied.
	/// The generator of `self` is left untouched.
	///
	/// # Errors
	/// Returns `ModelError::OrderMismatch` if the orders differ.
	pub fn merge(&mut self, other: &Self) -> Result<(), ModelError> {
		if self.order != other.order {
			return Err(ModelError::OrderMismatch {
				expected: self.order,
				actual: other.order,
			});
		}

		for (kgram, vector) in &other.table {
			if let Some(existing) = self.table.get_mut(kgram) {
				existing.merge(vector);
			} else {
				self.table.insert(kgram.clone(), vector.clone());
			}
		}

		Ok(())
	}

	fn check_kgram(&self, kgram: &[u8]) -> Result<(), ModelError> {
		if kgram.len() != self.order {
			return Err(ModelError::KgramLength {
				expected: self.order,
				actual: kgram.len(),
			});
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn order_zero_is_rejected() {
		assert!(matches!(MarkovModel::new(0, 42), Err(ModelError::InvalidOrder)));
	}

	#[test]
	fn order_one_two_characters() {
		let mut model = MarkovModel::new(1, 42).unwrap();
		model.train(b"ab");

		assert_eq!(model.frequency(b"a").unwrap(), 1);
		assert_eq!(model.frequency_of(b"a", b'b').unwrap(), 1);
		assert_eq!(model.frequency_of(b"a", b'c').unwrap(), 0);
		assert_eq!(model.frequency(b"b").unwrap(), 1);
		assert_eq!(model.frequency_of(b"b", NO_CHARACTER).unwrap(), 1);

		for _ in 0..20 {
			assert_eq!(model.sample_next(b"a"), b'b');
			assert_eq!(model.sample_next(b"b"), NO_CHARACTER);
		}
	}

	#[test]
	fn order_two_repeated_kgram() {
		let mut model = MarkovModel::new(2, 7).unwrap();
		model.train(b"abab");

		assert_eq!(model.frequency(b"ab").unwrap(), 2);
		assert_eq!(model.frequency_of(b"ab", b'a').unwrap(), 1);
		assert_eq!(model.frequency_of(b"ab", NO_CHARACTER).unwrap(), 1);
		assert_eq!(model.frequency(b"ba").unwrap(), 1);
		assert_eq!(model.frequency_of(b"ba", b'b').unwrap(), 1);
		assert_eq!(model.len(), 2);
	}

	#[test]
	fn wrong_length_is_an_invalid_argument() {
		let mut model = MarkovModel::new(2, 1).unwrap();
		model.train(b"hello");

		assert!(matches!(
			model.frequency(b"h"),
			Err(ModelError::KgramLength { expected: 2, actual: 1 })
		));
		assert!(matches!(
			model.frequency_of(b"hel", b'l'),
			Err(ModelError::KgramLength { expected: 2, actual: 3 })
		));
		assert_eq!(model.sample_next(b"hel"), NO_CHARACTER);
		assert_eq!(model.sample_next(b""), NO_CHARACTER);
	}

	#[test]
	fn unobserved_kgram_has_no_data() {
		let mut model = MarkovModel::new(2, 1).unwrap();
		model.train(b"hello");

		assert_eq!(model.frequency(b"zz").unwrap(), 0);
		assert_eq!(model.frequency_of(b"zz", b'a').unwrap(), 0);
		assert_eq!(model.sample_next(b"zz"), NO_CHARACTER);
	}

	#[test]
	fn short_text_adds_nothing() {
		let mut model = MarkovModel::new(3, 1).unwrap();
		model.train(b"ab");
		model.train(b"");
		assert!(model.is_empty());
	}

	#[test]
	fn text_of_exactly_order_characters_ends_with_the_sentinel() {
		let mut model = MarkovModel::new(3, 1).unwrap();
		model.train(b"abc");
		assert_eq!(model.frequency(b"abc").unwrap(), 1);
		assert_eq!(model.frequency_of(b"abc", NO_CHARACTER).unwrap(), 1);
	}

	#[test]
	fn embedded_nul_bytes_are_ignored() {
		let mut model = MarkovModel::new(2, 1).unwrap();
		model.train(b"a\0b\0c");

		assert_eq!(model.kgrams(), vec![&b"ab"[..], &b"bc"[..]]);
		assert_eq!(model.frequency_of(b"ab", b'c').unwrap(), 1);
		assert_eq!(model.frequency_of(b"bc", NO_CHARACTER).unwrap(), 1);
	}

	#[test]
	fn high_codes_are_regular_characters() {
		let mut model = MarkovModel::new(1, 3).unwrap();
		model.train(&[0xff, 0xe9]);
		assert_eq!(model.frequency_of(&[0xff], 0xe9).unwrap(), 1);
		assert_eq!(model.sample_next(&[0xff]), 0xe9);
	}

	#[test]
	fn total_matches_sum_of_successors() {
		let mut model = MarkovModel::new(2, 9).unwrap();
		model.train(b"the cat sat on the mat, the end");

		for kgram in model.kgrams() {
			let sum: usize = (0..=u8::MAX).map(|c| model.frequency_of(kgram, c).unwrap()).sum();
			assert_eq!(model.frequency(kgram).unwrap(), sum);
			assert!(sum >= 1);
		}
	}

	#[test]
	fn random_kgram_is_observed_and_deterministic() {
		let mut first = MarkovModel::new(2, 5).unwrap();
		let mut second = MarkovModel::new(2, 5).unwrap();
		first.train(b"abcdefgh");
		second.train(b"abcdefgh");

		for _ in 0..10 {
			let kgram = first.random_kgram().unwrap();
			assert!(first.frequency(&kgram).unwrap() >= 1);
			assert_eq!(Some(kgram), second.random_kgram());
		}
		assert_eq!(MarkovModel::new(2, 5).unwrap().random_kgram(), None);
	}

	#[test]
	fn negative_seeds_are_accepted_and_deterministic() {
		let text = b"she sells sea shells by the sea shore";
		let mut first = MarkovModel::new(2, -42).unwrap();
		let mut second = MarkovModel::new(2, -42).unwrap();
		first.train(text);
		second.train(text);

		for _ in 0..50 {
			assert_eq!(first.sample_next(b"se"), second.sample_next(b"se"));
		}
		assert_eq!(MarkovModel::new(1, i64::MIN).unwrap().order(), 1);
	}

	#[test]
	fn merge_requires_same_order() {
		let mut left = MarkovModel::new(2, 1).unwrap();
		let right = MarkovModel::new(3, 1).unwrap();
		assert!(matches!(
			left.merge(&right),
			Err(ModelError::OrderMismatch { expected: 2, actual: 3 })
		));
	}
}
