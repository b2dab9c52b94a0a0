use crate::world::chunk::{ArcLock, Chunk, Coordinate};
use std::{
	collections::HashMap,
	sync::{Arc, RwLock, Weak},
};

/// A storage bin for all the chunks which are currently shared.
/// This cache stores weak references (not strong references),
/// so a chunk is dropped as soon as the last request holding it completes.
///
/// It is possible for a coordinate to be present in the cache after its chunk was dropped,
/// such entries are treated as absent and pruned when next replaced.
#[derive(Default)]
pub struct Cache {
	loaded_chunks: HashMap<Coordinate, Weak<RwLock<Chunk>>>,
}

impl Cache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, coordinate: Coordinate, chunk: &ArcLock) {
		let _ = self.loaded_chunks.insert(coordinate, Arc::downgrade(chunk));
	}

	/// Removes the entry for `coordinate`, but only if it still refers to `chunk`.
	pub fn remove(&mut self, coordinate: &Coordinate, chunk: &ArcLock) {
		if self.contains(coordinate, chunk) {
			let _ = self.loaded_chunks.remove(coordinate);
		}
	}

	/// Returns true if the entry for `coordinate` refers to `chunk`.
	pub fn contains(&self, coordinate: &Coordinate, chunk: &ArcLock) -> bool {
		match self.loaded_chunks.get(coordinate) {
			Some(weak) => std::ptr::eq(weak.as_ptr(), Arc::as_ptr(chunk)),
			None => false,
		}
	}

	pub fn find(&self, coordinate: &Coordinate) -> Option<ArcLock> {
		profiling::scope!(
			"find-chunk",
			&format!("<{}, {}>", coordinate.x, coordinate.y)
		);
		self.loaded_chunks.get(coordinate).and_then(Weak::upgrade)
	}

	/// Drops entries whose chunks are no longer held by anyone.
	pub fn prune(&mut self) -> usize {
		let before = self.loaded_chunks.len();
		self.loaded_chunks.retain(|_, weak| weak.strong_count() > 0);
		before - self.loaded_chunks.len()
	}
}
