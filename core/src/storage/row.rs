use crate::{
	block::{Block, LookupId},
	storage::{Error, Result},
	world::{
		chunk::Coordinate,
		point::{world_point, Point},
	},
};
use nalgebra::Point3;

/// One row of the `world_blocks` table: a single non-air block at an absolute world position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredBlock {
	pub x: i64,
	pub y: i64,
	pub z: i64,
	pub block_id: i64,
}

impl StoredBlock {
	/// Returns None if the block's world position does not fit in an `i64`.
	pub fn new(coordinate: &Coordinate, local: &Point3<usize>, block: Block) -> Option<Self> {
		let world = world_point(coordinate, local)?;
		Some(Self {
			x: world.x,
			y: world.y,
			z: world.z,
			block_id: i64::from(block.id()),
		})
	}

	pub(crate) fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
		Ok(Self {
			x: row.get(0)?,
			y: row.get(1)?,
			z: row.get(2)?,
			block_id: row.get(3)?,
		})
	}

	fn invalid(&self) -> Error {
		Error::InvalidRow {
			x: self.x,
			y: self.y,
			z: self.z,
			block_id: self.block_id,
		}
	}

	/// Splits the row into its chunk-relative point and block.
	/// Rows outside the world height, or whose id is air or does not fit a [`LookupId`], are invalid.
	pub fn to_local(&self) -> Result<(Point, Block)> {
		let point =
			Point::from_world(&Point3::new(self.x, self.y, self.z)).ok_or_else(|| self.invalid())?;
		let id = LookupId::try_from(self.block_id).map_err(|_| self.invalid())?;
		let block = Block::new(id);
		if block.is_air() {
			return Err(self.invalid());
		}
		Ok((point, block))
	}
}
