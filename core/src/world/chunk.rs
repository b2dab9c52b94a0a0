//! Contains the dense chunk grid, the mapping of local block points to slots in that grid,
//! and the weak cache of chunks which are currently shared between connections.

use nalgebra::{Point2, Point3};
use std::sync::{Arc, RwLock};

/// Blocks along the world x-axis in a chunk.
pub const SIZE_X: usize = 16;
/// Blocks along the vertical (world y) axis in a chunk. Always the tallest axis.
pub const SIZE_Y: usize = 256;
/// Blocks along the world z-axis in a chunk.
pub const SIZE_Z: usize = 16;
/// The number of block slots in every chunk.
pub const VOLUME: usize = SIZE_X * SIZE_Y * SIZE_Z;

// Local points are sent as u8 triples.
const _: () = assert!(SIZE_X <= 256 && SIZE_Y <= 256 && SIZE_Z <= 256);
const _: () = assert!(SIZE_Y > SIZE_X && SIZE_Y > SIZE_Z);

/// The horizontal grid position `(cx, cz)` of a chunk, stored as `Point2 { x: cx, y: cz }`.
pub type Coordinate = Point2<i64>;

/// The largest magnitude either axis of a [`Coordinate`] may have.
/// Every block of a chunk in this range has a world position which fits in an `i64`.
pub const MAX_COORDINATE: i64 = i64::MAX / (if SIZE_X > SIZE_Z { SIZE_X } else { SIZE_Z }) as i64;

/// Returns true if both axes of `coordinate` are within [`MAX_COORDINATE`] of the origin.
pub fn is_in_range(coordinate: &Coordinate) -> bool {
	let range = -MAX_COORDINATE..=MAX_COORDINATE;
	range.contains(&coordinate.x) && range.contains(&coordinate.y)
}

/// A chunk shared between threads.
/// Readers may hold the lock together, anything which replaces the chunk's contents
/// must hold the write lock for the whole replacement.
pub type ArcLock = Arc<RwLock<Chunk>>;

/// Returns the slot of a local point in a chunk's block list, or None if the point is outside the chunk.
///
/// z varies fastest, then x, with y outermost.
pub fn offset(point: &Point3<usize>) -> Option<usize> {
	if point.x >= SIZE_X || point.y >= SIZE_Y || point.z >= SIZE_Z {
		return None;
	}
	Some(point.z + point.x * SIZE_Z + point.y * SIZE_X * SIZE_Z)
}

/// The inverse of [`offset`].
pub fn local_point(offset: usize) -> Option<Point3<usize>> {
	if offset >= VOLUME {
		return None;
	}
	let layer = SIZE_X * SIZE_Z;
	let y = offset / layer;
	let x = (offset % layer) / SIZE_Z;
	let z = offset % SIZE_Z;
	Some(Point3::new(x, y, z))
}

mod chunk;
pub use chunk::*;

pub mod cache;

#[cfg(test)]
mod addressing {
	use super::*;
	use std::collections::HashSet;

	#[test]
	fn offset_is_bijective() {
		let mut seen = HashSet::with_capacity(VOLUME);
		for y in 0..SIZE_Y {
			for x in 0..SIZE_X {
				for z in 0..SIZE_Z {
					let point = Point3::new(x, y, z);
					let slot = offset(&point).unwrap();
					assert!(slot < VOLUME);
					assert!(seen.insert(slot), "{:?} collides at slot {}", point, slot);
					assert_eq!(local_point(slot), Some(point));
				}
			}
		}
		assert_eq!(seen.len(), VOLUME);
	}

	#[test]
	fn z_varies_fastest() {
		assert_eq!(offset(&Point3::new(0, 0, 1)), Some(1));
		assert_eq!(offset(&Point3::new(1, 0, 0)), Some(SIZE_Z));
		assert_eq!(offset(&Point3::new(0, 1, 0)), Some(SIZE_X * SIZE_Z));
	}

	#[test]
	fn out_of_bounds() {
		assert_eq!(offset(&Point3::new(SIZE_X, 0, 0)), None);
		assert_eq!(offset(&Point3::new(0, SIZE_Y, 0)), None);
		assert_eq!(offset(&Point3::new(0, 0, SIZE_Z)), None);
		assert_eq!(local_point(VOLUME), None);
	}

	#[test]
	fn coordinate_range() {
		assert!(is_in_range(&Point2::new(0, 0)));
		assert!(is_in_range(&Point2::new(MAX_COORDINATE, -MAX_COORDINATE)));
		assert!(!is_in_range(&Point2::new(MAX_COORDINATE + 1, 0)));
		assert!(!is_in_range(&Point2::new(0, i64::MIN)));
		assert!(!is_in_range(&Point2::new(i64::MAX, 0)));
	}
}
