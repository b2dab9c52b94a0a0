use crate::world;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum Error {
	#[error("failed to decode message")]
	Decode(#[source] bincode::Error),
	#[error("failed to encode message")]
	Encode(#[source] bincode::Error),
	#[error("frame of {size} bytes exceeds the limit of {limit} bytes")]
	FrameTooLarge { size: usize, limit: usize },
	#[error(transparent)]
	Io(#[from] std::io::Error),
	#[error("request did not complete within {0:?}")]
	Timeout(Duration),
	#[error("request worker panicked")]
	WorkerPanicked(#[source] tokio::task::JoinError),
	#[error(transparent)]
	World(#[from] world::Error),
}

impl Error {
	/// True if the request ran out of time, either waiting on the dispatcher or on storage.
	pub fn is_timeout(&self) -> bool {
		match self {
			Self::Timeout(_) => true,
			Self::World(error) => error.is_timeout(),
			_ => false,
		}
	}
}
