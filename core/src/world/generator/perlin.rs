use crate::world::{
	chunk::{self, Chunk, Coordinate},
	generator::{Generator, Heightmap, TerrainParams},
	Error,
};
use nalgebra::Point3;
use noise::{Fbm, MultiFractal};

/// Rolling terrain whose surface height follows fractal perlin noise.
///
/// Each column is filled with the ground block from `y = 0` up to and including its surface,
/// everything above is air.
pub struct Perlin {
	params: TerrainParams,
	noise: Fbm<noise::Perlin>,
}

impl Perlin {
	const OCTAVES: usize = 3;
	const LACUNARITY: f64 = 2.0;
	const PERSISTENCE: f64 = 0.5;

	pub fn new(seed: u32, params: TerrainParams) -> Result<Self, Error> {
		params.validate()?;
		Ok(Self::build(seed, params))
	}

	pub fn with_default_params(seed: u32) -> Self {
		Self::build(seed, TerrainParams::default())
	}

	fn build(seed: u32, params: TerrainParams) -> Self {
		let noise = Fbm::<noise::Perlin>::new(seed)
			.set_octaves(Self::OCTAVES)
			.set_frequency(1.0)
			.set_lacunarity(Self::LACUNARITY)
			.set_persistence(Self::PERSISTENCE);
		Self { params, noise }
	}

	pub fn heightmap(&self, coordinate: &Coordinate) -> Heightmap {
		Heightmap::sample(&self.noise, coordinate, &self.params)
	}
}

impl Generator for Perlin {
	fn generate_chunk(&self, coordinate: Coordinate) -> Chunk {
		profiling::scope!(
			"generate-chunk",
			&format!("<{}, {}>", coordinate.x, coordinate.y)
		);
		let heightmap = self.heightmap(&coordinate);
		let mut chunk = Chunk::new(coordinate);
		for (x, z, height) in heightmap.columns() {
			for y in 0..=height.min(chunk::SIZE_Y - 1) {
				let previous = chunk.set_block(&Point3::new(x, y, z), self.params.ground);
				debug_assert!(previous.is_some());
			}
		}
		chunk
	}
}

#[cfg(test)]
mod perlin {
	use super::*;
	use crate::block::Block;
	use nalgebra::Point2;

	#[test]
	fn deterministic() {
		let coordinate = Point2::new(-3, 12);
		let first = Perlin::with_default_params(42).generate_chunk(coordinate);
		let second = Perlin::with_default_params(42).generate_chunk(coordinate);
		assert_eq!(first, second);
	}

	#[test]
	fn heights_within_bounds() {
		let generator = Perlin::with_default_params(9);
		for cx in -4..4 {
			for cz in -4..4 {
				let heightmap = generator.heightmap(&Point2::new(cx, cz));
				for (_, _, height) in heightmap.columns() {
					assert!(height < chunk::SIZE_Y);
					assert!((64..=80).contains(&height));
				}
			}
		}
	}

	#[test]
	fn columns_filled_to_surface() {
		let generator = Perlin::with_default_params(3);
		let coordinate = Point2::new(1, 1);
		let heightmap = generator.heightmap(&coordinate);
		let chunk = generator.generate_chunk(coordinate);
		for (x, z, height) in heightmap.columns() {
			for y in 0..chunk::SIZE_Y {
				let expected = if y <= height { Block::GRASS } else { Block::AIR };
				assert_eq!(chunk.block(&Point3::new(x, y, z)), Some(expected));
			}
		}
	}

	#[test]
	fn reference_scenario() {
		let coordinate = Point2::new(0, 0);
		let generator = Perlin::with_default_params(1);
		let chunk = generator.generate_chunk(coordinate);
		for x in 0..chunk::SIZE_X {
			for z in 0..chunk::SIZE_Z {
				assert_eq!(chunk.block(&Point3::new(x, 0, z)), Some(Block::GRASS));
				assert_eq!(
					chunk.block(&Point3::new(x, chunk::SIZE_Y - 1, z)),
					Some(Block::AIR)
				);
			}
		}
		let expected: usize = generator
			.heightmap(&coordinate)
			.columns()
			.map(|(_, _, height)| height + 1)
			.sum();
		assert_eq!(chunk.count_non_air(), expected);
	}

	#[test]
	fn seeds_differ() {
		let coordinate = Point2::new(5, 5);
		let a = Perlin::with_default_params(1).heightmap(&coordinate);
		let b = Perlin::with_default_params(2).heightmap(&coordinate);
		assert_ne!(a, b);
	}

	/// Surface heights of chunk <0, 0> for seed 1, indexed `[x][z]`.
	/// Changing these means every existing world generates differently.
	#[rustfmt::skip]
	const ORIGIN_HEIGHTS: [[usize; chunk::SIZE_Z]; chunk::SIZE_X] = [
		[72, 72, 71, 70, 71, 72, 73, 73, 72, 72, 73, 74, 73, 73, 73, 73],
		[75, 75, 73, 71, 71, 72, 73, 73, 72, 72, 73, 73, 73, 73, 73, 74],
		[76, 77, 74, 72, 72, 72, 73, 73, 73, 73, 73, 73, 73, 74, 74, 75],
		[76, 77, 76, 74, 74, 74, 74, 74, 74, 74, 73, 73, 73, 74, 75, 75],
		[76, 77, 77, 76, 76, 75, 74, 73, 73, 73, 72, 72, 72, 73, 74, 74],
		[76, 77, 78, 77, 77, 76, 74, 72, 72, 72, 71, 70, 71, 72, 72, 73],
		[77, 79, 80, 79, 78, 76, 74, 73, 72, 71, 70, 70, 70, 71, 72, 72],
		[78, 80, 80, 80, 78, 76, 75, 74, 73, 72, 71, 71, 71, 71, 72, 72],
		[78, 80, 80, 80, 80, 78, 77, 76, 75, 74, 72, 71, 71, 71, 71, 72],
		[79, 80, 80, 80, 80, 79, 78, 78, 77, 75, 73, 72, 71, 71, 70, 70],
		[79, 80, 80, 80, 80, 79, 79, 78, 77, 77, 75, 73, 72, 71, 69, 69],
		[78, 80, 79, 79, 79, 79, 78, 78, 78, 78, 76, 74, 73, 71, 69, 68],
		[76, 77, 77, 77, 78, 78, 78, 78, 78, 78, 77, 74, 72, 71, 69, 69],
		[73, 74, 75, 75, 76, 77, 77, 77, 78, 78, 76, 73, 71, 70, 69, 69],
		[71, 72, 73, 73, 73, 74, 75, 75, 76, 75, 73, 71, 70, 69, 69, 69],
		[71, 72, 73, 72, 71, 71, 72, 73, 73, 72, 71, 70, 70, 69, 69, 69],
	];

	/// Surface heights of chunk <-1, 2> for seed 1, indexed `[x][z]`.
	/// Changing these means every existing world generates differently.
	#[rustfmt::skip]
	const OFFSET_HEIGHTS: [[usize; chunk::SIZE_Z]; chunk::SIZE_X] = [
		[72, 73, 74, 77, 79, 80, 80, 79, 78, 79, 78, 77, 76, 74, 73, 73],
		[73, 74, 74, 75, 77, 78, 78, 78, 78, 78, 77, 75, 74, 73, 72, 72],
		[74, 74, 74, 74, 76, 77, 77, 77, 77, 77, 76, 74, 72, 72, 72, 72],
		[73, 73, 73, 74, 76, 76, 76, 76, 76, 76, 75, 73, 72, 71, 72, 72],
		[71, 71, 72, 73, 75, 76, 76, 75, 75, 75, 75, 73, 72, 71, 71, 71],
		[69, 69, 70, 72, 75, 76, 75, 74, 74, 74, 74, 73, 71, 70, 70, 70],
		[67, 67, 69, 72, 73, 74, 74, 73, 73, 72, 72, 72, 71, 71, 71, 70],
		[66, 67, 69, 70, 71, 72, 73, 73, 72, 71, 70, 70, 70, 71, 71, 71],
		[66, 67, 68, 68, 69, 70, 72, 73, 72, 70, 69, 69, 69, 70, 72, 72],
		[66, 67, 68, 68, 68, 69, 71, 72, 72, 70, 68, 68, 69, 70, 72, 72],
		[67, 68, 68, 68, 68, 69, 70, 71, 71, 70, 69, 68, 69, 71, 72, 73],
		[67, 68, 69, 69, 69, 69, 69, 69, 70, 69, 68, 68, 69, 72, 73, 73],
		[68, 69, 70, 70, 69, 69, 68, 68, 68, 68, 67, 67, 69, 71, 74, 74],
		[69, 70, 71, 70, 70, 69, 68, 68, 68, 67, 67, 67, 69, 71, 73, 74],
		[71, 71, 71, 70, 70, 70, 70, 69, 68, 67, 67, 68, 69, 71, 72, 72],
		[72, 71, 71, 71, 72, 73, 73, 72, 70, 68, 68, 69, 70, 72, 72, 71],
	];

	fn assert_heights(coordinate: Coordinate, expected: &[[usize; chunk::SIZE_Z]; chunk::SIZE_X]) {
		let generator = Perlin::with_default_params(1);
		for (x, z, height) in generator.heightmap(&coordinate).columns() {
			assert_eq!(height, expected[x][z], "column <{}, {}> of <{}, {}>", x, z, coordinate.x, coordinate.y);
		}
	}

	#[test]
	fn stable_terrain_origin() {
		assert_heights(Point2::new(0, 0), &ORIGIN_HEIGHTS);
		let chunk = generate_chunk_at(Point2::new(0, 0));
		assert_eq!(chunk.count_non_air(), 19236);
	}

	#[test]
	fn stable_terrain_offset() {
		assert_heights(Point2::new(-1, 2), &OFFSET_HEIGHTS);
		let chunk = generate_chunk_at(Point2::new(-1, 2));
		assert_eq!(chunk.count_non_air(), 18579);
	}

	fn generate_chunk_at(coordinate: Coordinate) -> Chunk {
		Perlin::with_default_params(1).generate_chunk(coordinate)
	}

	#[test]
	fn lattice_columns_sit_at_midpoint() {
		// Perlin noise is zero on integer lattice points, which is where column <0, 0> samples.
		for seed in [0, 1, 77, 123_456] {
			for (cx, cz) in [(0, 0), (-5, 3), (1000, -1000)] {
				let heightmap = Perlin::with_default_params(seed).heightmap(&Point2::new(cx, cz));
				assert_eq!(heightmap.height(0, 0), Some(72));
			}
		}
	}
}
