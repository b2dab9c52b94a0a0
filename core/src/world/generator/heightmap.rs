use crate::{
	block::Block,
	world::{
		chunk::{self, Coordinate},
		Error,
	},
};
use noise::NoiseFn;
use serde::{Deserialize, Serialize};

/// Controls how noise values become terrain heights.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TerrainParams {
	/// The surface height when noise is at its minimum.
	#[serde(default = "TerrainParams::default_base_height")]
	pub base_height: usize,
	/// How far above `base_height` the surface can rise.
	#[serde(default = "TerrainParams::default_amplitude")]
	pub amplitude: usize,
	/// The block which fills each column up to its surface.
	#[serde(default = "TerrainParams::default_ground")]
	pub ground: Block,
}

impl Default for TerrainParams {
	fn default() -> Self {
		Self {
			base_height: Self::default_base_height(),
			amplitude: Self::default_amplitude(),
			ground: Self::default_ground(),
		}
	}
}

impl TerrainParams {
	fn default_base_height() -> usize {
		64
	}

	fn default_amplitude() -> usize {
		16
	}

	fn default_ground() -> Block {
		Block::GRASS
	}

	/// The highest surface these parameters can produce.
	pub fn max_height(&self) -> usize {
		self.base_height.saturating_add(self.amplitude)
	}

	pub fn validate(&self) -> Result<(), Error> {
		if self.max_height() >= chunk::SIZE_Y {
			return Err(Error::InvalidTerrain {
				max: self.max_height(),
				limit: chunk::SIZE_Y,
			});
		}
		if self.ground.is_air() {
			return Err(Error::AirGround);
		}
		Ok(())
	}

	/// Maps a noise value in `[-1, 1]` to a surface height in `[0, SIZE_Y)`.
	/// Values outside of the noise range are clamped first.
	pub fn height_of(&self, noise: f64) -> usize {
		let noise = noise.clamp(-1.0, 1.0);
		let rise = ((noise + 1.0) / 2.0 * self.amplitude as f64).round() as usize;
		self.base_height
			.saturating_add(rise)
			.min(chunk::SIZE_Y - 1)
	}
}

/// The terrain surface height of every column in one chunk.
/// Only exists while a chunk is being generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heightmap {
	heights: Vec<usize>,
}

impl Heightmap {
	/// Samples `noise` at each column, using coordinates relative to the chunk grid
	/// (`cx + x / SIZE_X`, `cz + z / SIZE_Z`) so neighboring chunks line up at their edges.
	pub fn sample<N>(noise: &N, coordinate: &Coordinate, params: &TerrainParams) -> Self
	where
		N: NoiseFn<f64, 2>,
	{
		let mut heights = Vec::with_capacity(chunk::SIZE_X * chunk::SIZE_Z);
		for x in 0..chunk::SIZE_X {
			for z in 0..chunk::SIZE_Z {
				let px = coordinate.x as f64 + (x as f64 / chunk::SIZE_X as f64);
				let pz = coordinate.y as f64 + (z as f64 / chunk::SIZE_Z as f64);
				heights.push(params.height_of(noise.get([px, pz])));
			}
		}
		Self { heights }
	}

	fn index(x: usize, z: usize) -> usize {
		x * chunk::SIZE_Z + z
	}

	/// The surface height of the column at local `(x, z)`.
	pub fn height(&self, x: usize, z: usize) -> Option<usize> {
		if x >= chunk::SIZE_X || z >= chunk::SIZE_Z {
			return None;
		}
		self.heights.get(Self::index(x, z)).copied()
	}

	/// Iterates over `(x, z, height)` for every column.
	pub fn columns(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
		self.heights
			.iter()
			.enumerate()
			.map(|(i, height)| (i / chunk::SIZE_Z, i % chunk::SIZE_Z, *height))
	}
}
