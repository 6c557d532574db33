//! Bounded top-K selection over a stream of scored items.
//!
//! Items live in a binary min-heap so the weakest retained score sits at the root; admission of a
//! new item is decided against the root alone. Draining heap-sorts the array in place.

use crate::{Error, Result};

/// Hard ceiling on retained items, whatever the caller asks for.
pub const MAX_CAPACITY: usize = 50_000;

#[derive(Clone, Debug, PartialEq)]
pub struct Ranked<T> {
	pub score: f64,
	pub payload: T,
}

#[derive(Debug)]
pub struct Selector<T> {
	capacity: usize,
	items: Vec<Ranked<T>>,
}
impl<T> Selector<T> {
	pub fn create(capacity: usize) -> Result<Self> {
		let capacity = capacity.min(MAX_CAPACITY);
		let mut items = Vec::new();

		items
			.try_reserve_exact(capacity)
			.map_err(|source| Error::Capacity { requested: capacity, source })?;

		Ok(Self { capacity, items })
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	/// Smallest retained score.
	pub fn min_score(&self) -> Option<f64> {
		self.items.first().map(|item| item.score)
	}

	/// Whether `insert` would keep an item with `score`; lets callers skip building payloads.
	pub fn would_accept(&self, score: f64) -> bool {
		if self.items.len() < self.capacity {
			return true;
		}

		self.min_score().is_some_and(|min| score > min)
	}

	pub fn insert(&mut self, score: f64, payload: T) {
		if !self.would_accept(score) {
			return;
		}

		let item = Ranked { score, payload };

		if self.items.len() < self.capacity {
			self.items.push(item);

			let last = self.items.len() - 1;

			self.sift_up(last);
		} else {
			self.items[0] = item;

			let len = self.items.len();

			self.sift_down(0, len);
		}
	}

	/// Consumes the selector and returns the retained items, highest score first.
	pub fn drain_sorted_descending(mut self) -> Vec<Ranked<T>> {
		for end in (1..self.items.len()).rev() {
			self.items.swap(0, end);
			self.sift_down(0, end);
		}

		self.items
	}

	fn sift_up(&mut self, mut index: usize) {
		while index > 0 {
			let parent = (index - 1) / 2;

			if self.items[parent].score <= self.items[index].score {
				break;
			}

			self.items.swap(parent, index);

			index = parent;
		}
	}

	/// Restores the heap below `index`, considering only the first `len` items.
	fn sift_down(&mut self, mut index: usize, len: usize) {
		loop {
			let mut child = 2 * index + 1;

			if child >= len {
				break;
			}
			if child + 1 < len && self.items[child].score > self.items[child + 1].score {
				child += 1;
			}
			if self.items[index].score <= self.items[child].score {
				break;
			}

			self.items.swap(index, child);

			index = child;
		}
	}
}
