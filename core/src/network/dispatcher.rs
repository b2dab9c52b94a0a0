use crate::{
	network::{ChunkData, ChunkRequest, Error, Failure, Request, Response, LOG},
	world::{self, Database},
};
use std::{sync::Arc, time::Duration};

/// Turns each [`Request`] into its [`Response`].
///
/// World access blocks on locks and storage, so it runs on tokio's blocking pool.
/// A request which fails is answered with a [`Failure`], it never affects other requests.
pub struct Dispatcher {
	database: Arc<Database>,
	request_timeout: Duration,
}

impl Dispatcher {
	pub fn new(database: Arc<Database>, request_timeout: Duration) -> Self {
		Self {
			database,
			request_timeout,
		}
	}

	pub fn database(&self) -> &Arc<Database> {
		&self.database
	}

	pub async fn dispatch(&self, request: Request) -> Response {
		let result = match request {
			Request::Chunk(request) => self.chunk(request).await.map(Response::Chunk),
		};
		result.unwrap_or_else(|error| {
			log::warn!(target: LOG, "Request failed: {}", error);
			Response::Failure(Failure::from(&error))
		})
	}

	async fn chunk(&self, request: ChunkRequest) -> Result<ChunkData, Error> {
		let coordinate = request.coordinate;
		self.run_blocking(move |database| {
			let arc_chunk = database.load_or_generate(coordinate)?;
			let chunk = arc_chunk
				.read()
				.map_err(|_| world::Error::FailedToReadChunk(coordinate))?;
			Ok(ChunkData::from(&*chunk))
		})
		.await
	}

	async fn run_blocking<T, F>(&self, work: F) -> Result<T, Error>
	where
		T: Send + 'static,
		F: FnOnce(&Database) -> Result<T, world::Error> + Send + 'static,
	{
		let database = self.database.clone();
		let task = tokio::task::spawn_blocking(move || work(&database));
		// An expired worker keeps running until the world lets go of it, its result is discarded.
		match tokio::time::timeout(self.request_timeout, task).await {
			Err(_elapsed) => Err(Error::Timeout(self.request_timeout)),
			Ok(Err(join_error)) => Err(Error::WorkerPanicked(join_error)),
			Ok(Ok(result)) => Ok(result?),
		}
	}
}
