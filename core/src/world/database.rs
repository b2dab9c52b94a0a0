use crate::{
	storage::{self, Store},
	world::{
		chunk::{self, cache::Cache, ArcLock, Chunk, Coordinate},
		generator::Generator,
		Error, Settings, LOG,
	},
};
use nalgebra::Point2;
use std::{
	path::Path,
	sync::{Arc, RwLock},
};

/// The file name of the block storage inside a world directory.
pub static STORAGE_FILE_NAME: &'static str = "world.sqlite3";

/// Serves chunks to any number of threads, loading them from storage or generating
/// (and then storing) them the first time they are requested.
///
/// A chunk requested by several threads at once is loaded exactly once, the other threads wait
/// on its lock and receive the same [`ArcLock`]. A chunk stays in memory only as long as
/// somebody holds it, except for the spawn area which is held by the database itself.
pub struct Database {
	settings: Settings,
	store: Arc<Store>,
	generator: Box<dyn Generator>,
	chunk_cache: RwLock<Cache>,
	/// Chunks which are kept loaded for the lifetime of the world.
	/// This should not be for holding chunks for other owners,
	/// but rather for chunks like the spawn area which are requested all the time.
	world_chunks: Vec<ArcLock>,
}

impl Database {
	/// Opens the world in `root_dir`, creating its settings and storage if they do not exist yet.
	pub fn open(root_dir: &Path, options: &storage::Options) -> Result<Self, Error> {
		let settings = Settings::load_or_create(root_dir).map_err(Error::Settings)?;
		log::info!(
			target: LOG,
			"Opening world at {} (seed {})",
			root_dir.display(),
			settings.seed()
		);
		let store = Store::open(&root_dir.join(STORAGE_FILE_NAME), options)?;
		let database = Self::new(settings, Arc::new(store))?;
		log::info!(
			target: LOG,
			"Serving chunks from {}",
			database.store().path().display()
		);
		Ok(database)
	}

	pub fn new(settings: Settings, store: Arc<Store>) -> Result<Self, Error> {
		let generator = settings.generator().build(settings.seed())?;
		Ok(Self {
			settings,
			store,
			generator,
			chunk_cache: RwLock::new(Cache::new()),
			world_chunks: Vec::new(),
		})
	}

	pub fn settings(&self) -> &Settings {
		&self.settings
	}

	pub fn store(&self) -> &Arc<Store> {
		&self.store
	}

	/// Returns the chunk at `coordinate` if it is currently held by anyone.
	pub fn find_chunk(&self, coordinate: &Coordinate) -> Result<Option<ArcLock>, Error> {
		let cache = self.chunk_cache.read().map_err(|_| Error::FailedToReadCache)?;
		Ok(cache.find(coordinate))
	}

	/// Returns the chunk at `coordinate`, reading it from storage if it is not already loaded.
	/// If storage has nothing for the chunk, it is generated and written to storage first.
	///
	/// The returned chunk is always fully populated.
	pub fn load_or_generate(&self, coordinate: Coordinate) -> Result<ArcLock, Error> {
		if !chunk::is_in_range(&coordinate) {
			return Err(Error::CoordinateOutOfRange(coordinate));
		}
		loop {
			if let Some(arc_chunk) = self.find_chunk(&coordinate)? {
				// Blocks until any thread which is still populating the chunk has finished.
				drop(
					arc_chunk
						.read()
						.map_err(|_| Error::FailedToReadChunk(coordinate))?,
				);
				// A failed load is removed from the cache, in which case this thread tries on its own.
				let cache = self.chunk_cache.read().map_err(|_| Error::FailedToReadCache)?;
				if cache.contains(&coordinate, &arc_chunk) {
					return Ok(arc_chunk);
				}
				continue;
			}
			if let Some(arc_chunk) = self.try_load(coordinate)? {
				return Ok(arc_chunk);
			}
		}
	}

	/// Reserves `coordinate` in the cache and populates it.
	/// Returns None if another thread reserved the coordinate first.
	fn try_load(&self, coordinate: Coordinate) -> Result<Option<ArcLock>, Error> {
		let arc_chunk = Arc::new(RwLock::new(Chunk::new(coordinate)));
		// The chunk is locked before it is visible to other threads,
		// so nobody can read it until it has been populated.
		let mut chunk = arc_chunk
			.write()
			.map_err(|_| Error::FailedToWriteChunk(coordinate))?;
		{
			let mut cache = self.chunk_cache.write().map_err(|_| Error::FailedToWriteCache)?;
			if cache.find(&coordinate).is_some() {
				return Ok(None);
			}
			let pruned = cache.prune();
			if pruned > 0 {
				log::trace!(target: LOG, "Pruned {} released chunks from the cache", pruned);
			}
			cache.insert(coordinate, &arc_chunk);
		}

		match self.populate(&mut chunk) {
			Ok(()) => {
				drop(chunk);
				Ok(Some(arc_chunk))
			}
			Err(error) => {
				log::warn!(
					target: LOG,
					"Failed to load chunk <{}, {}>: {}",
					coordinate.x,
					coordinate.y,
					error
				);
				if let Ok(mut cache) = self.chunk_cache.write() {
					cache.remove(&coordinate, &arc_chunk);
				}
				Err(error)
			}
		}
	}

	fn populate(&self, chunk: &mut Chunk) -> Result<(), Error> {
		let coordinate = *chunk.coordinate();
		if let Some(stored) = self.store.read_chunk(&coordinate)? {
			log::debug!(
				target: LOG,
				"Loaded chunk <{}, {}> from storage",
				coordinate.x,
				coordinate.y
			);
			*chunk = stored;
			return Ok(());
		}

		let generated = self.generator.generate_chunk(coordinate);
		self.store.write_chunk(&generated)?;
		log::debug!(
			target: LOG,
			"Generated chunk <{}, {}> ({} blocks)",
			coordinate.x,
			coordinate.y,
			generated.count_non_air()
		);
		*chunk = generated;
		Ok(())
	}

	/// Discards the contents of the chunk at `coordinate`, in memory and in storage,
	/// and replaces them with freshly generated terrain.
	pub fn regenerate(&self, coordinate: Coordinate) -> Result<ArcLock, Error> {
		let arc_chunk = self.load_or_generate(coordinate)?;
		{
			let mut chunk = arc_chunk
				.write()
				.map_err(|_| Error::FailedToWriteChunk(coordinate))?;
			let generated = self.generator.generate_chunk(coordinate);
			self.store.write_chunk(&generated)?;
			*chunk = generated;
		}
		log::info!(
			target: LOG,
			"Regenerated chunk <{}, {}>",
			coordinate.x,
			coordinate.y
		);
		Ok(arc_chunk)
	}

	/// Loads every chunk within the settings' spawn radius of the origin
	/// and keeps them loaded until the database is dropped.
	pub fn load_spawn(&mut self) -> Result<usize, Error> {
		let radius = self.settings.spawn_radius() as i64;
		let mut chunks = Vec::new();
		for cx in -radius..=radius {
			for cz in -radius..=radius {
				chunks.push(self.load_or_generate(Point2::new(cx, cz))?);
			}
		}
		log::info!(
			target: LOG,
			"Loaded {} spawn chunks (radius {})",
			chunks.len(),
			radius
		);
		self.world_chunks = chunks;
		Ok(self.world_chunks.len())
	}
}
