use crate::world::chunk::{self, Coordinate};
use nalgebra::{Point2, Point3};

const SIZE_X: i64 = chunk::SIZE_X as i64;
const SIZE_Y: i64 = chunk::SIZE_Y as i64;
const SIZE_Z: i64 = chunk::SIZE_Z as i64;

/// A world-space block position split into the chunk that contains it
/// and the local offset inside that chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
	chunk: Coordinate,
	offset: Point3<usize>,
}

impl Point {
	/// Splits a world block position. Returns None if `y` is outside of the chunk height.
	///
	/// Horizontal axes use floored division, so `x = -1` belongs to chunk `-1` at offset `SIZE_X - 1`.
	pub fn from_world(world: &Point3<i64>) -> Option<Self> {
		if world.y < 0 || world.y >= SIZE_Y {
			return None;
		}
		Some(Self {
			chunk: chunk_coordinate(world),
			offset: Point3::new(
				world.x.rem_euclid(SIZE_X) as usize,
				world.y as usize,
				world.z.rem_euclid(SIZE_Z) as usize,
			),
		})
	}

	pub fn chunk(&self) -> &Coordinate {
		&self.chunk
	}

	pub fn offset(&self) -> &Point3<usize> {
		&self.offset
	}
}

/// The coordinate of the chunk containing a world block position.
pub fn chunk_coordinate(world: &Point3<i64>) -> Coordinate {
	Point2::new(world.x.div_euclid(SIZE_X), world.z.div_euclid(SIZE_Z))
}

/// The world block position of a local point in the chunk at `coordinate`.
/// Returns None if the position does not fit in an `i64`.
pub fn world_point(coordinate: &Coordinate, local: &Point3<usize>) -> Option<Point3<i64>> {
	Some(Point3::new(
		coordinate.x.checked_mul(SIZE_X)?.checked_add(local.x as i64)?,
		local.y as i64,
		coordinate.y.checked_mul(SIZE_Z)?.checked_add(local.z as i64)?,
	))
}

/// The inclusive horizontal extent of a chunk in world block positions.
/// The full height of the world is always included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
	pub min_x: i64,
	pub max_x: i64,
	pub min_z: i64,
	pub max_z: i64,
}

impl Bounds {
	/// Returns None if the chunk at `coordinate` has blocks beyond the range of an `i64`,
	/// which is never the case for coordinates accepted by [`chunk::is_in_range`].
	pub fn of(coordinate: &Coordinate) -> Option<Self> {
		let min_x = coordinate.x.checked_mul(SIZE_X)?;
		let min_z = coordinate.y.checked_mul(SIZE_Z)?;
		Some(Self {
			min_x,
			max_x: min_x.checked_add(SIZE_X - 1)?,
			min_z,
			max_z: min_z.checked_add(SIZE_Z - 1)?,
		})
	}
}
