//! The chunked voxel world: chunk data and addressing, terrain generation,
//! and the [`Database`] which serves chunks from storage or the generator.

use crate::storage;

/// The log category for world loading & generation.
static LOG: &'static str = "world";

pub mod chunk;
pub mod generator;
pub mod point;

mod database;
pub use database::*;

mod settings;
pub use settings::*;

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error(transparent)]
	Storage(#[from] storage::Error),
	#[error("terrain can reach height {max}, but chunks are only {limit} blocks tall")]
	InvalidTerrain { max: usize, limit: usize },
	#[error("terrain cannot be made of air")]
	AirGround,
	#[error("flat generator has {0} layers, more than fit in a chunk")]
	TooManyLayers(usize),
	#[error("chunk <{}, {}> is outside of the world", .0.x, .0.y)]
	CoordinateOutOfRange(chunk::Coordinate),
	#[error("failed to load world settings: {0:#}")]
	Settings(anyhow::Error),

	#[error("failed to read chunk <{}, {}>", .0.x, .0.y)]
	FailedToReadChunk(chunk::Coordinate),
	#[error("failed to write chunk <{}, {}>", .0.x, .0.y)]
	FailedToWriteChunk(chunk::Coordinate),
	#[error("failed to read the chunk cache")]
	FailedToReadCache,
	#[error("failed to write the chunk cache")]
	FailedToWriteCache,
}

impl Error {
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Storage(error) if error.is_timeout())
	}
}
