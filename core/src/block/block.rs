use serde::{Deserialize, Serialize};

/// The numerical identifier of a block type.
/// This is the value persisted per-voxel and sent over the network.
pub type LookupId = u32;

/// A single voxel in a chunk.
///
/// Blocks carry no position, their position is implied by the slot they occupy in a
/// [`Chunk`](crate::world::chunk::Chunk). The default block is [`AIR`](Block::AIR).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Block {
	id: LookupId,
}

impl Block {
	/// The absence of a block. Never persisted.
	pub const AIR: Self = Self::new(0);
	/// The ground block placed by terrain generation.
	pub const GRASS: Self = Self::new(1);

	pub const fn new(id: LookupId) -> Self {
		Self { id }
	}

	pub fn id(&self) -> LookupId {
		self.id
	}

	pub fn is_air(&self) -> bool {
		self.id == Self::AIR.id
	}
}

impl From<LookupId> for Block {
	fn from(id: LookupId) -> Self {
		Self::new(id)
	}
}

impl std::fmt::Display for Block {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match *self {
			Self::AIR => write!(f, "Block(air)"),
			Self::GRASS => write!(f, "Block(grass)"),
			Self { id } => write!(f, "Block({})", id),
		}
	}
}
