//! Enumeration of token orders for orderless queries.
//!
//! Orders are produced with Heap's algorithm. Every step is a single swap, so the number of
//! well-ordered pairs can be maintained incrementally instead of being recounted.

/// One ordering of `0..n`, tagged with how many index pairs are still in their original order.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Permutation {
	pub order: Vec<usize>,
	/// `n (n - 1) / 2` minus the number of inversions.
	pub ordered_pairs: usize,
}
impl Permutation {
	pub fn max_ordered_pairs(n: usize) -> usize {
		n * n.saturating_sub(1) / 2
	}

	/// Closeness to the identity order in `[0, 1]`; always 1.0 for fewer than two tokens.
	pub fn closeness(&self) -> f64 {
		let max = Self::max_ordered_pairs(self.order.len());

		if max == 0 { 1.0 } else { self.ordered_pairs as f64 / max as f64 }
	}
}

/// Lazy, finite sequence of every permutation of `0..n`, identity first.
#[derive(Debug)]
pub struct Permutations {
	values: Vec<usize>,
	counters: Vec<usize>,
	cursor: usize,
	ordered_pairs: i64,
	started: bool,
}
impl Permutations {
	pub fn new(n: usize) -> Self {
		Self {
			values: (0..n).collect(),
			counters: vec![0; n],
			cursor: 1,
			ordered_pairs: Permutation::max_ordered_pairs(n) as i64,
			started: false,
		}
	}

	fn current(&self) -> Permutation {
		Permutation { order: self.values.clone(), ordered_pairs: self.ordered_pairs as usize }
	}

	/// Swaps positions `i < j`, adjusting the ordered pair count for every pair the swap touches.
	fn swap(&mut self, i: usize, j: usize) {
		let v = &self.values;
		let mut delta = if v[i] < v[j] { -1 } else { 1 };

		for &mid in &v[i + 1..j] {
			let flipped = i64::from(mid < v[j]) + i64::from(v[i] < mid);

			delta += 2 - 2 * flipped;
		}

		self.ordered_pairs += delta;
		self.values.swap(i, j);
	}

	fn advance(&mut self) -> bool {
		let n = self.values.len();

		while self.cursor < n {
			let k = self.cursor;

			if self.counters[k] < k {
				if k % 2 == 0 {
					self.swap(0, k);
				} else {
					self.swap(self.counters[k], k);
				}

				self.counters[k] += 1;
				self.cursor = 1;

				return true;
			}

			self.counters[k] = 0;
			self.cursor += 1;
		}

		false
	}
}
impl Iterator for Permutations {
	type Item = Permutation;

	fn next(&mut self) -> Option<Self::Item> {
		if !self.started {
			self.started = true;

			return Some(self.current());
		}

		self.advance().then(|| self.current())
	}
}
