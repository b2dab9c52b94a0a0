use std::{net::SocketAddr, time::Duration};

/// How the [`Server`](super::Server) listens and how long it works on one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
	pub address: SocketAddr,
	/// Requests which take longer than this are answered with a timeout failure.
	pub request_timeout: Duration,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			address: SocketAddr::from(([127, 0, 0, 1], 8080)),
			request_timeout: Duration::from_millis(5000),
		}
	}
}
