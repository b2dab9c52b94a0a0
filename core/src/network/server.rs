use crate::{
	network::{connection::Connection, Config, Dispatcher, Error, LOG},
	world::Database,
};
use std::{future::Future, net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;

/// Accepts clients and hands each one to its own task.
pub struct Server {
	listener: TcpListener,
	dispatcher: Arc<Dispatcher>,
}

impl Server {
	pub async fn bind(config: Config, database: Arc<Database>) -> Result<Self, Error> {
		let listener = TcpListener::bind(config.address).await?;
		log::info!(
			target: LOG,
			"Listening on {} (request timeout {:?})",
			listener.local_addr()?,
			config.request_timeout
		);
		Ok(Self {
			listener,
			dispatcher: Arc::new(Dispatcher::new(database, config.request_timeout)),
		})
	}

	/// The address actually bound, which differs from the configured one when binding to port 0.
	pub fn local_addr(&self) -> Result<SocketAddr, Error> {
		Ok(self.listener.local_addr()?)
	}

	/// Accepts connections until `shutdown` completes.
	/// Connections which are already open keep running on their own tasks.
	pub async fn serve<F: Future>(self, shutdown: F) -> Result<(), Error> {
		tokio::pin!(shutdown);
		loop {
			tokio::select! {
				_ = &mut shutdown => {
					log::info!(target: LOG, "Shutting down");
					return Ok(());
				}
				accepted = self.listener.accept() => match accepted {
					Ok((stream, address)) => {
						let connection = Connection::new(stream, address, self.dispatcher.clone());
						let _ = tokio::spawn(connection.run());
					}
					// Failing to accept one client (e.g. out of file descriptors) should not stop the server.
					Err(error) => log::warn!(target: LOG, "Failed to accept connection: {}", error),
				},
			}
		}
	}
}
