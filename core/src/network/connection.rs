use crate::network::{frame, Dispatcher, Error, Request};
use std::{net::SocketAddr, sync::Arc};
use tokio::{io::{BufReader, BufWriter}, net::TcpStream};

/// One client's session. Requests are answered one at a time, in the order they arrive.
pub(crate) struct Connection {
	stream: TcpStream,
	address: SocketAddr,
	dispatcher: Arc<Dispatcher>,
}

impl Connection {
	pub fn new(stream: TcpStream, address: SocketAddr, dispatcher: Arc<Dispatcher>) -> Self {
		Self {
			stream,
			address,
			dispatcher,
		}
	}

	fn log_target(&self) -> String {
		format!("server/connection[{}]", self.address)
	}

	/// Serves the connection until the client disconnects or sends something unreadable.
	pub async fn run(self) {
		let target = self.log_target();
		let log = target.as_str();
		log::info!(target: log, "Connected");
		match self.process().await {
			Ok(count) => log::info!(target: log, "Disconnected after {} requests", count),
			Err(error) => log::warn!(target: log, "Closing connection: {}", error),
		}
	}

	async fn process(self) -> Result<usize, Error> {
		let (reader, writer) = self.stream.into_split();
		let mut reader = BufReader::new(reader);
		let mut writer = BufWriter::new(writer);
		let mut count = 0;
		while let Some(request) = frame::read::<_, Request>(&mut reader).await? {
			let response = self.dispatcher.dispatch(request).await;
			frame::write(&mut writer, &response).await?;
			count += 1;
		}
		Ok(count)
	}
}
