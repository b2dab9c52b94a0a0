//! Durable storage of the non-air blocks of every chunk in a single `world_blocks` table.
//!
//! Rows hold absolute world block positions, so one table serves the whole world and
//! air is implied for every position without a row.

/// The log category for block storage.
static LOG: &'static str = "storage";

mod error;
pub use error::*;

mod row;
pub use row::*;

mod store;
pub use store::*;
