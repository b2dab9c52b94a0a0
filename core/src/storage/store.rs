use crate::{
	storage::{Error, Result, StoredBlock, LOG},
	world::{
		chunk::{Chunk, Coordinate},
		point::Bounds,
	},
};
use rusqlite::{params, Connection};
use std::{
	path::{Path, PathBuf},
	sync::{Mutex, MutexGuard},
	time::Duration,
};

static SCHEMA: &'static str = "
	CREATE TABLE IF NOT EXISTS world_blocks (
		x INTEGER NOT NULL,
		y INTEGER NOT NULL,
		z INTEGER NOT NULL,
		block_id INTEGER NOT NULL
	);
	CREATE INDEX IF NOT EXISTS world_blocks_column ON world_blocks (x, z);
";

static DELETE_CHUNK: &'static str =
	"DELETE FROM world_blocks WHERE x BETWEEN ?1 AND ?2 AND z BETWEEN ?3 AND ?4";
static INSERT_BLOCK: &'static str =
	"INSERT INTO world_blocks (x, y, z, block_id) VALUES (?1, ?2, ?3, ?4)";
static SELECT_CHUNK: &'static str =
	"SELECT x, y, z, block_id FROM world_blocks WHERE x BETWEEN ?1 AND ?2 AND z BETWEEN ?3 AND ?4";
static COUNT_CHUNK: &'static str =
	"SELECT COUNT(*) FROM world_blocks WHERE x BETWEEN ?1 AND ?2 AND z BETWEEN ?3 AND ?4";

#[derive(Debug, Clone)]
pub struct Options {
	/// How long a statement waits on a database locked by another connection
	/// before failing with [`Error::Timeout`].
	pub busy_timeout: Duration,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			busy_timeout: Duration::from_secs(5),
		}
	}
}

/// The persisted blocks of every chunk in the world.
///
/// Each chunk is written as a whole, replacing whatever was stored for it before.
/// The store does not arbitrate between two writers of the same chunk,
/// callers serialize those through the chunk's [`ArcLock`](crate::world::chunk::ArcLock).
pub struct Store {
	path: PathBuf,
	connection: Mutex<Connection>,
}

impl Store {
	pub fn open(path: &Path, options: &Options) -> Result<Self> {
		log::info!(target: LOG, "Opening block storage at {}", path.display());
		let connection =
			Connection::open(path).map_err(|error| Error::Unavailable(path.to_owned(), error))?;
		Self::initialize(path.to_owned(), connection, options)
	}

	pub fn open_in_memory() -> Result<Self> {
		let path = PathBuf::from(":memory:");
		let connection =
			Connection::open_in_memory().map_err(|error| Error::Unavailable(path.clone(), error))?;
		Self::initialize(path, connection, &Options::default())
	}

	fn initialize(path: PathBuf, connection: Connection, options: &Options) -> Result<Self> {
		connection
			.busy_timeout(options.busy_timeout)
			.and_then(|_| connection.execute_batch(SCHEMA))
			.map_err(|error| Error::Unavailable(path.clone(), error))?;
		Ok(Self {
			path,
			connection: Mutex::new(connection),
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	fn bounds(coordinate: &Coordinate) -> Result<Bounds> {
		Bounds::of(coordinate).ok_or(Error::CoordinateOutOfRange(*coordinate))
	}

	fn connection(&self) -> Result<MutexGuard<'_, Connection>> {
		self.connection
			.lock()
			.map_err(|_| Error::FailedToLockConnection)
	}

	/// Replaces everything stored for the chunk's coordinate with the chunk's non-air blocks.
	///
	/// The delete and every insert happen in one transaction.
	/// If any of them fail, nothing is committed and the previously stored blocks remain.
	pub fn write_chunk(&self, chunk: &Chunk) -> Result<()> {
		let coordinate = *chunk.coordinate();
		profiling::scope!(
			"write-chunk",
			&format!("<{}, {}>", coordinate.x, coordinate.y)
		);
		let bounds = Self::bounds(&coordinate)?;
		let rows = chunk
			.non_air_blocks()
			.map(|(point, block)| StoredBlock::new(&coordinate, &point, block))
			.collect::<Option<Vec<_>>>()
			.ok_or(Error::CoordinateOutOfRange(coordinate))?;

		let mut connection = self.connection()?;
		Self::replace(&mut connection, &bounds, &rows)
			.map_err(|error| Error::from_sqlite(&self.path, coordinate, error))?;

		log::debug!(
			target: LOG,
			"Stored {} blocks for chunk <{}, {}>",
			rows.len(),
			coordinate.x,
			coordinate.y
		);
		Ok(())
	}

	fn replace(
		connection: &mut Connection,
		bounds: &Bounds,
		rows: &[StoredBlock],
	) -> rusqlite::Result<()> {
		// Dropping the transaction without committing rolls it back.
		let transaction = connection.transaction()?;
		transaction.execute(
			DELETE_CHUNK,
			params![bounds.min_x, bounds.max_x, bounds.min_z, bounds.max_z],
		)?;
		{
			let mut insert = transaction.prepare_cached(INSERT_BLOCK)?;
			for row in rows.iter() {
				insert.execute(params![row.x, row.y, row.z, row.block_id])?;
			}
		}
		transaction.commit()
	}

	/// Rebuilds the chunk at `coordinate` from its stored blocks.
	/// Returns None if nothing is stored for the chunk, which means it has never been generated.
	pub fn read_chunk(&self, coordinate: &Coordinate) -> Result<Option<Chunk>> {
		profiling::scope!(
			"read-chunk",
			&format!("<{}, {}>", coordinate.x, coordinate.y)
		);
		let bounds = Self::bounds(coordinate)?;
		let rows = {
			let connection = self.connection()?;
			Self::select(&connection, &bounds)
				.map_err(|error| Error::from_sqlite(&self.path, *coordinate, error))?
		};
		if rows.is_empty() {
			return Ok(None);
		}

		let mut chunk = Chunk::new(*coordinate);
		for row in rows.iter() {
			let (point, block) = row.to_local()?;
			let previous = chunk.set_block(point.offset(), block);
			debug_assert!(previous.is_some(), "stored row {:?} is outside its chunk", row);
		}
		log::debug!(
			target: LOG,
			"Read {} blocks for chunk <{}, {}>",
			rows.len(),
			coordinate.x,
			coordinate.y
		);
		Ok(Some(chunk))
	}

	fn select(connection: &Connection, bounds: &Bounds) -> rusqlite::Result<Vec<StoredBlock>> {
		let mut statement = connection.prepare_cached(SELECT_CHUNK)?;
		let rows = statement
			.query_map(
				params![bounds.min_x, bounds.max_x, bounds.min_z, bounds.max_z],
				StoredBlock::from_row,
			)?
			.collect::<rusqlite::Result<Vec<_>>>();
		rows
	}

	/// The number of blocks stored inside the chunk at `coordinate`.
	pub fn count_blocks(&self, coordinate: &Coordinate) -> Result<usize> {
		let bounds = Self::bounds(coordinate)?;
		let connection = self.connection()?;
		let count = connection
			.query_row(
				COUNT_CHUNK,
				params![bounds.min_x, bounds.max_x, bounds.min_z, bounds.max_z],
				|row| row.get::<_, i64>(0),
			)
			.map_err(|error| Error::from_sqlite(&self.path, *coordinate, error))?;
		Ok(count as usize)
	}

	#[cfg(test)]
	pub(crate) fn execute_batch(&self, sql: &str) -> rusqlite::Result<()> {
		self.connection
			.lock()
			.expect("connection poisoned")
			.execute_batch(sql)
	}
}

#[cfg(test)]
mod store {
	use super::*;
	use crate::{
		block::Block,
		world::generator::{self, Flat, Generator, Perlin},
	};
	use nalgebra::{Point2, Point3};

	fn flat(coordinate: Coordinate, height: usize) -> Chunk {
		Flat::uniform(Block::new(4), height)
			.unwrap()
			.generate_chunk(coordinate)
	}

	#[test]
	fn read_missing() {
		let store = Store::open_in_memory().unwrap();
		assert_eq!(store.read_chunk(&Point2::new(0, 0)).unwrap(), None);
		assert_eq!(store.count_blocks(&Point2::new(0, 0)).unwrap(), 0);
	}

	#[test]
	fn round_trip() {
		let store = Store::open_in_memory().unwrap();
		for coordinate in [Point2::new(0, 0), Point2::new(-3, 7), Point2::new(5, -1)] {
			let chunk = generator::generate_chunk(11, coordinate);
			store.write_chunk(&chunk).unwrap();
			assert_eq!(store.count_blocks(&coordinate).unwrap(), chunk.count_non_air());
			assert_eq!(store.read_chunk(&coordinate).unwrap(), Some(chunk));
		}
	}

	#[test]
	fn sparse_round_trip() {
		let store = Store::open_in_memory().unwrap();
		let coordinate = Point2::new(2, 2);
		let mut chunk = Chunk::new(coordinate);
		let _ = chunk.set_block(&Point3::new(0, 0, 0), Block::GRASS);
		let _ = chunk.set_block(&Point3::new(15, 255, 15), Block::new(9));
		store.write_chunk(&chunk).unwrap();
		assert_eq!(store.count_blocks(&coordinate).unwrap(), 2);
		let read = store.read_chunk(&coordinate).unwrap().unwrap();
		assert_eq!(read, chunk);
		assert_eq!(read.block(&Point3::new(7, 100, 7)), Some(Block::AIR));
	}

	#[test]
	fn replace_leaves_no_residue() {
		let store = Store::open_in_memory().unwrap();
		let coordinate = Point2::new(0, 0);
		let a = generator::generate_chunk(1, coordinate);
		let b = flat(coordinate, 2);
		store.write_chunk(&a).unwrap();
		store.write_chunk(&b).unwrap();
		assert_eq!(store.count_blocks(&coordinate).unwrap(), b.count_non_air());
		assert_eq!(store.read_chunk(&coordinate).unwrap(), Some(b));
	}

	#[test]
	fn replace_does_not_touch_neighbors() {
		let store = Store::open_in_memory().unwrap();
		let center = Point2::new(0, 0);
		let neighbors = [
			Point2::new(-1, 0),
			Point2::new(1, 0),
			Point2::new(0, -1),
			Point2::new(0, 1),
		];
		for coordinate in neighbors.iter() {
			store.write_chunk(&flat(*coordinate, 3)).unwrap();
		}
		store.write_chunk(&flat(center, 5)).unwrap();
		store.write_chunk(&Chunk::new(center)).unwrap();
		assert_eq!(store.read_chunk(&center).unwrap(), None);
		for coordinate in neighbors.iter() {
			assert_eq!(
				store.count_blocks(coordinate).unwrap(),
				3 * crate::world::chunk::SIZE_X * crate::world::chunk::SIZE_Z
			);
		}
	}

	#[test]
	fn failed_write_keeps_previous() {
		let store = Store::open_in_memory().unwrap();
		let coordinate = Point2::new(0, 0);
		let previous = flat(coordinate, 2);
		store.write_chunk(&previous).unwrap();
		store
			.execute_batch(
				"CREATE TRIGGER reject_high_blocks BEFORE INSERT ON world_blocks
				WHEN NEW.y = 70 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
			)
			.unwrap();

		// Column <0, 0> samples a noise lattice point, so its surface is at y = 72.
		let replacement = Perlin::with_default_params(1).generate_chunk(coordinate);
		let result = store.write_chunk(&replacement);
		assert!(matches!(result, Err(Error::Transaction(_, _))));
		assert_eq!(
			store.count_blocks(&coordinate).unwrap(),
			previous.count_non_air()
		);
		assert_eq!(store.read_chunk(&coordinate).unwrap(), Some(previous));
	}

	#[test]
	fn reference_row_count() {
		let store = Store::open_in_memory().unwrap();
		let coordinate = Point2::new(0, 0);
		let generator = Perlin::with_default_params(1);
		store.write_chunk(&generator.generate_chunk(coordinate)).unwrap();
		let expected: usize = generator
			.heightmap(&coordinate)
			.columns()
			.map(|(_, _, height)| height + 1)
			.sum();
		assert_eq!(store.count_blocks(&coordinate).unwrap(), expected);
	}

	#[test]
	fn invalid_row() {
		let store = Store::open_in_memory().unwrap();
		store
			.execute_batch("INSERT INTO world_blocks (x, y, z, block_id) VALUES (1, 400, 1, 1);")
			.unwrap();
		assert!(matches!(
			store.read_chunk(&Point2::new(0, 0)),
			Err(Error::InvalidRow { y: 400, .. })
		));
	}

	#[test]
	fn persists_across_reopen() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("world.sqlite3");
		let coordinate = Point2::new(4, -4);
		let chunk = generator::generate_chunk(5, coordinate);
		{
			let store = Store::open(&path, &Options::default()).unwrap();
			store.write_chunk(&chunk).unwrap();
		}
		let store = Store::open(&path, &Options::default()).unwrap();
		assert_eq!(store.read_chunk(&coordinate).unwrap(), Some(chunk));
	}

	#[test]
	fn locked_database_times_out() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("world.sqlite3");
		let holder = Store::open(&path, &Options::default()).unwrap();
		let options = Options {
			busy_timeout: Duration::from_millis(50),
		};
		let waiter = Store::open(&path, &options).unwrap();
		holder.execute_batch("BEGIN EXCLUSIVE;").unwrap();
		let result = waiter.write_chunk(&flat(Point2::new(0, 0), 1));
		assert!(matches!(result, Err(Error::Timeout(_))));
		holder.execute_batch("ROLLBACK;").unwrap();
		assert!(waiter.write_chunk(&flat(Point2::new(0, 0), 1)).is_ok());
	}

	#[test]
	fn concurrent_writers() {
		let store = Store::open_in_memory().unwrap();
		let coordinates = (0..8).map(|i| Point2::new(i, -i)).collect::<Vec<_>>();
		std::thread::scope(|scope| {
			for coordinate in coordinates.iter() {
				let store = &store;
				scope.spawn(move || {
					let chunk = generator::generate_chunk(2, *coordinate);
					store.write_chunk(&chunk).unwrap();
				});
			}
		});
		for coordinate in coordinates.iter() {
			let expected = generator::generate_chunk(2, *coordinate);
			assert_eq!(store.read_chunk(coordinate).unwrap(), Some(expected));
		}
	}

	#[test]
	fn out_of_range_leaves_store_usable() {
		let store = Store::open_in_memory().unwrap();
		let outside = Point2::new(i64::MAX, 0);
		assert!(matches!(
			store.read_chunk(&outside),
			Err(Error::CoordinateOutOfRange(_))
		));
		assert!(matches!(
			store.count_blocks(&Point2::new(0, i64::MIN)),
			Err(Error::CoordinateOutOfRange(_))
		));
		assert!(matches!(
			store.write_chunk(&flat(outside, 1)),
			Err(Error::CoordinateOutOfRange(_))
		));

		let chunk = flat(Point2::new(0, 0), 2);
		store.write_chunk(&chunk).unwrap();
		assert_eq!(store.read_chunk(&Point2::new(0, 0)).unwrap(), Some(chunk));
	}
}
