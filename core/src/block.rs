//! The block (voxel) type identifiers stored in chunks.

mod block;
pub use block::*;
