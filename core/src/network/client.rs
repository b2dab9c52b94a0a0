use crate::{
	network::{frame, ChunkRequest, Error, Request, Response},
	world::chunk::Coordinate,
};
use tokio::{
	io::BufStream,
	net::{TcpStream, ToSocketAddrs},
};

/// The requesting end of a connection to a [`Server`](super::Server).
pub struct Client {
	stream: BufStream<TcpStream>,
}

impl Client {
	pub async fn connect<A: ToSocketAddrs>(address: A) -> Result<Self, Error> {
		let stream = TcpStream::connect(address).await?;
		Ok(Self {
			stream: BufStream::new(stream),
		})
	}

	/// Sends one request and waits for its response.
	pub async fn request(&mut self, request: &Request) -> Result<Response, Error> {
		frame::write(&mut self.stream, request).await?;
		match frame::read(&mut self.stream).await? {
			Some(response) => Ok(response),
			None => Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into()),
		}
	}

	pub async fn request_chunk(&mut self, coordinate: Coordinate) -> Result<Response, Error> {
		self.request(&Request::Chunk(ChunkRequest { coordinate }))
			.await
	}

	/// Direct access to the stream, for sending raw bytes.
	pub fn stream_mut(&mut self) -> &mut BufStream<TcpStream> {
		&mut self.stream
	}
}
