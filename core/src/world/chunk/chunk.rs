use crate::{
	block::Block,
	world::chunk::{self, Coordinate},
};
use nalgebra::Point3;

/// A `SIZE_X * SIZE_Y * SIZE_Z` column of blocks in the world.
///
/// Every slot is always present, empty slots hold [`Block::AIR`].
/// Chunks built by a generator or reconstructed from storage are plain values,
/// sharing one between threads goes through [`ArcLock`](chunk::ArcLock).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
	/// The coordinate of the chunk in the world.
	coordinate: Coordinate,
	blocks: Vec<Block>,
}

impl Chunk {
	/// Creates a chunk filled with air.
	pub fn new(coordinate: Coordinate) -> Self {
		Self {
			coordinate,
			blocks: vec![Block::AIR; chunk::VOLUME],
		}
	}

	pub fn coordinate(&self) -> &Coordinate {
		&self.coordinate
	}

	/// Every block slot, ordered by [`chunk::offset`].
	pub fn blocks(&self) -> &[Block] {
		&self.blocks
	}

	/// The block at a local point, or None if the point lies outside the chunk.
	pub fn block(&self, point: &Point3<usize>) -> Option<Block> {
		chunk::offset(point).map(|offset| self.blocks[offset])
	}

	/// Replaces the block at a local point, returning the previous block.
	/// Returns None (and changes nothing) if the point lies outside the chunk.
	pub fn set_block(&mut self, point: &Point3<usize>, block: Block) -> Option<Block> {
		let offset = chunk::offset(point)?;
		Some(std::mem::replace(&mut self.blocks[offset], block))
	}

	/// Iterates over the local point and block of every non-air slot.
	pub fn non_air_blocks(&self) -> impl Iterator<Item = (Point3<usize>, Block)> + '_ {
		self.blocks
			.iter()
			.enumerate()
			.filter(|(_, block)| !block.is_air())
			.filter_map(|(offset, block)| chunk::local_point(offset).map(|point| (point, *block)))
	}

	pub fn count_non_air(&self) -> usize {
		self.blocks.iter().filter(|block| !block.is_air()).count()
	}
}
