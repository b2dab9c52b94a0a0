//! An infinite voxel world built from 16x256x16 chunks of blocks.
//!
//! Terrain is generated on demand from layered Perlin noise, so the same seed always produces
//! the same world. Every generated or edited chunk is kept sparsely in a SQLite database
//! (only non-air blocks are stored), and the [`network`] server hands chunks out to clients.
//!
//! Library Notes:
//! - [noise](https://crates.io/crates/noise) for fractal Perlin terrain
//! - [rusqlite](https://crates.io/crates/rusqlite) for block storage
//! - [profiling](https://crates.io/crates/profiling) scopes around generation and storage

pub mod block;
pub mod network;
pub mod storage;
pub mod utility;
pub mod world;
