use super::markov_model::ALPHABET_SIZE;

/// Successor counts observed after one kgram.
///
/// Conceptually, this is a node in a Markov chain where the 256 outgoing
/// edges (one per character code, the sentinel included) are weighted by
/// their number of observations.
///
/// ## Invariants
/// - `total` is always the sum of `counts`
/// - A vector stored in a model has `total >= 1`
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct FrequencyVector {
	/// Occurrences indexed by successor character code.
	counts: Box<[usize; ALPHABET_SIZE]>,
	/// Cached sum of `counts`, keeps `frequency` queries O(1).
	total: usize,
}

impl FrequencyVector {
	/// Creates an all-zero vector.
	pub fn new() -> Self {
		Self {
			counts: Box::new([0; ALPHABET_SIZE]),
			total: 0,
		}
	}

	/// Records one occurrence of `successor`.
	pub fn add(&mut self, successor: u8) {
		self.counts[usize::from(successor)] += 1;
		self.total += 1;
	}

	/// Number of times `character` followed the kgram.
	pub fn count(&self, character: u8) -> usize {
		self.counts[usize::from(character)]
	}

	/// Number of times the kgram was seen.
	pub fn total(&self) -> usize {
		self.total
	}

	/// Maps a draw `r` in `[0, total)` to a character code.
	///
	/// Codes are visited in ascending order and each count is subtracted
	/// from `r`; the code at which `r` would drop below zero is the answer.
	/// Every `r` in range selects exactly one code.
	///
	/// Returns `None` when `r >= total`.
	pub fn pick(&self, mut r: usize) -> Option<u8> {
		for (code, &occurrence) in (0..=u8::MAX).zip(self.counts.iter()) {
			if r < occurrence {
				return Some(code);
			}
			r -= occurrence;
		}
		None
	}

	/// Adds the counts of `other` into this vector.
	pub fn merge(&mut self, other: &Self) {
		for (count, occurrence) in self.counts.iter_mut().zip(other.counts.iter()) {
			*count += occurrence;
		}
		self.total += other.total;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn add_keeps_total_in_sync() {
		let mut vector = FrequencyVector::new();
		vector.add(b'a');
		vector.add(b'a');
		vector.add(0);

		assert_eq!(vector.count(b'a'), 2);
		assert_eq!(vector.count(0), 1);
		assert_eq!(vector.count(b'z'), 0);
		assert_eq!(vector.total(), 3);
	}

	#[test]
	fn pick_walks_codes_in_ascending_order() {
		let mut vector = FrequencyVector::new();
		vector.add(b'c');
		vector.add(b'a');
		vector.add(b'a');
		vector.add(b'c');
		vector.add(b'c');

		// cumulative: 'a' -> [0, 2), 'c' -> [2, 5)
		assert_eq!(vector.pick(0), Some(b'a'));
		assert_eq!(vector.pick(1), Some(b'a'));
		assert_eq!(vector.pick(2), Some(b'c'));
		assert_eq!(vector.pick(4), Some(b'c'));
		assert_eq!(vector.pick(5), None);
	}

	#[test]
	fn pick_can_return_the_sentinel_and_the_last_code() {
		let mut vector = FrequencyVector::new();
		vector.add(0);
		vector.add(u8::MAX);

		assert_eq!(vector.pick(0), Some(0));
		assert_eq!(vector.pick(1), Some(u8::MAX));
	}

	#[test]
	fn empty_vector_picks_nothing() {
		assert_eq!(FrequencyVector::new().pick(0), None);
	}

	#[test]
	fn merge_sums_counts() {
		let mut left = FrequencyVector::new();
		left.add(b'x');
		let mut right = FrequencyVector::new();
		right.add(b'x');
		right.add(b'y');

		left.merge(&right);
		assert_eq!(left.count(b'x'), 2);
		assert_eq!(left.count(b'y'), 1);
		assert_eq!(left.total(), 3);
	}
}
