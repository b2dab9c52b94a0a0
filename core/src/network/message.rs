use crate::{
	block::{Block, LookupId},
	network::Error,
	world::{
		self,
		chunk::{Chunk, Coordinate},
	},
};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum Request {
	Chunk(ChunkRequest),
}

/// Asks for the contents of one chunk, generating it if the world has never seen it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRequest {
	pub coordinate: Coordinate,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum Response {
	Chunk(ChunkData),
	Failure(Failure),
}

/// A sparse representation of a [`Chunk`].
/// Only non-air blocks are sent, the client assumes air everywhere else.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ChunkData {
	coordinate: Coordinate,
	blocks: Vec<(Point3<u8>, LookupId)>,
}

impl ChunkData {
	pub fn coordinate(&self) -> &Coordinate {
		&self.coordinate
	}

	pub fn blocks(&self) -> &[(Point3<u8>, LookupId)] {
		&self.blocks
	}

	/// Rebuilds the full chunk.
	/// Returns None if any block lies outside of the chunk bounds.
	pub fn to_chunk(&self) -> Option<Chunk> {
		let mut chunk = Chunk::new(self.coordinate);
		for &(point, block_id) in self.blocks.iter() {
			let point = point.map(|axis| axis as usize);
			chunk.set_block(&point, Block::new(block_id))?;
		}
		Some(chunk)
	}
}

impl From<&Chunk> for ChunkData {
	fn from(chunk: &Chunk) -> Self {
		profiling::scope!(
			"ChunkData::from",
			&format!("<{}, {}>", chunk.coordinate().x, chunk.coordinate().y)
		);
		let blocks = chunk
			.non_air_blocks()
			// Chunk dimensions never exceed 256, so every local axis fits in a u8.
			.map(|(point, block)| (point.map(|axis| axis as u8), block.id()))
			.collect();
		Self {
			coordinate: *chunk.coordinate(),
			blocks,
		}
	}
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
	/// The request did not finish in time, it may succeed if sent again.
	Timeout,
	/// The world could not be read or written.
	Storage,
	/// The request can never succeed, such as a chunk outside of the world.
	InvalidRequest,
	Internal,
}

/// Sent in place of a response when the request could not be completed.
/// The connection stays open.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Failure {
	pub kind: FailureKind,
	pub reason: String,
}

impl From<&Error> for Failure {
	fn from(error: &Error) -> Self {
		let kind = match error {
			_ if error.is_timeout() => FailureKind::Timeout,
			Error::World(world::Error::Storage(_)) => FailureKind::Storage,
			Error::World(world::Error::CoordinateOutOfRange(_)) => FailureKind::InvalidRequest,
			_ => FailureKind::Internal,
		};
		Self {
			kind,
			reason: error.to_string(),
		}
	}
}
