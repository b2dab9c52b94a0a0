use crate::world::chunk::Coordinate;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("block storage at {0:?} is unavailable")]
	Unavailable(PathBuf, #[source] rusqlite::Error),
	#[error("block storage transaction failed for chunk <{}, {}>", .0.x, .0.y)]
	Transaction(Coordinate, #[source] rusqlite::Error),
	#[error("timed out waiting for block storage while accessing chunk <{}, {}>", .0.x, .0.y)]
	Timeout(Coordinate),
	#[error("stored block ({x}, {y}, {z}) has an invalid position or block id {block_id}")]
	InvalidRow {
		x: i64,
		y: i64,
		z: i64,
		block_id: i64,
	},
	#[error("chunk <{}, {}> is outside of the world", .0.x, .0.y)]
	CoordinateOutOfRange(Coordinate),
	#[error("block storage connection is poisoned")]
	FailedToLockConnection,
}

impl Error {
	/// Sorts a failed statement into a connectivity, timeout, or transaction failure.
	pub(crate) fn from_sqlite(path: &Path, coordinate: Coordinate, error: rusqlite::Error) -> Self {
		use rusqlite::ErrorCode::*;
		match &error {
			rusqlite::Error::SqliteFailure(failure, _) => match failure.code {
				DatabaseBusy | DatabaseLocked => Self::Timeout(coordinate),
				CannotOpen | NotADatabase | SystemIoFailure | DatabaseCorrupt => {
					Self::Unavailable(path.to_owned(), error)
				}
				_ => Self::Transaction(coordinate, error),
			},
			_ => Self::Transaction(coordinate, error),
		}
	}

	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Timeout(_))
	}
}

#[cfg(test)]
mod error {
	use super::*;
	use nalgebra::Point2;

	fn failure(code: std::os::raw::c_int) -> rusqlite::Error {
		rusqlite::Error::SqliteFailure(rusqlite::ffi::Error::new(code), None)
	}

	#[test]
	fn busy_is_timeout() {
		let error = Error::from_sqlite(
			Path::new("world.sqlite3"),
			Point2::new(1, 2),
			failure(rusqlite::ffi::SQLITE_BUSY),
		);
		assert!(error.is_timeout());
	}

	#[test]
	fn cannot_open_is_unavailable() {
		let error = Error::from_sqlite(
			Path::new("world.sqlite3"),
			Point2::new(0, 0),
			failure(rusqlite::ffi::SQLITE_CANTOPEN),
		);
		assert!(matches!(error, Error::Unavailable(_, _)));
	}

	#[test]
	fn constraint_is_transaction() {
		let error = Error::from_sqlite(
			Path::new("world.sqlite3"),
			Point2::new(0, 0),
			failure(rusqlite::ffi::SQLITE_CONSTRAINT),
		);
		assert!(matches!(error, Error::Transaction(_, _)));
	}
}
