//! Procedural chunk generators.
//!
//! A generator is a pure function of its settings and a chunk coordinate,
//! the same generator always produces identical chunks for the same coordinate.

use crate::{
	block::Block,
	world::{
		chunk::{Chunk, Coordinate},
		Error,
	},
};
use serde::{Deserialize, Serialize};

mod flat;
pub use flat::*;

mod heightmap;
pub use heightmap::*;

mod perlin;
pub use perlin::*;

pub trait Generator: Send + Sync {
	fn generate_chunk(&self, coordinate: Coordinate) -> Chunk;
}

/// Generates the chunk at `coordinate` with the [`Perlin`] generator and the default [`TerrainParams`].
pub fn generate_chunk(seed: u32, coordinate: Coordinate) -> Chunk {
	Perlin::with_default_params(seed).generate_chunk(coordinate)
}

/// Which generator a world uses, as saved in its settings.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Kind {
	Perlin(TerrainParams),
	Flat { layers: Vec<Block> },
}

impl Default for Kind {
	fn default() -> Self {
		Self::Perlin(TerrainParams::default())
	}
}

impl Kind {
	pub fn build(&self, seed: u32) -> Result<Box<dyn Generator>, Error> {
		Ok(match self {
			Self::Perlin(params) => Box::new(Perlin::new(seed, params.clone())?),
			Self::Flat { layers } => Box::new(Flat::new(layers.clone())?),
		})
	}
}
