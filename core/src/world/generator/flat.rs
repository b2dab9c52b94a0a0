use crate::{
	block::Block,
	world::{
		chunk::{self, Chunk, Coordinate},
		generator::Generator,
		Error,
	},
};
use nalgebra::Point3;

/// Fills every chunk with the same horizontal layers of blocks, listed from `y = 0` upward.
/// Air layers are allowed and simply leave that height empty.
#[derive(Debug, Clone, Default)]
pub struct Flat {
	layers: Vec<Block>,
}

impl Flat {
	pub fn new(layers: Vec<Block>) -> Result<Self, Error> {
		if layers.len() > chunk::SIZE_Y {
			return Err(Error::TooManyLayers(layers.len()));
		}
		Ok(Self { layers })
	}

	/// A flat world of `height` solid layers of `block`.
	pub fn uniform(block: Block, height: usize) -> Result<Self, Error> {
		Self::new(vec![block; height])
	}
}

impl Generator for Flat {
	fn generate_chunk(&self, coordinate: Coordinate) -> Chunk {
		let mut chunk = Chunk::new(coordinate);
		for (y, &block) in self.layers.iter().enumerate() {
			if block.is_air() {
				continue;
			}
			for x in 0..chunk::SIZE_X {
				for z in 0..chunk::SIZE_Z {
					let previous = chunk.set_block(&Point3::new(x, y, z), block);
					debug_assert!(previous.is_some());
				}
			}
		}
		chunk
	}
}
