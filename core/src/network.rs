//! Serving chunks to remote clients.
//!
//! Every message travels as one length-prefixed [`frame`]. A client sends a [`Request`]
//! and waits for the matching [`Response`], requests on one connection are answered in order.

/// The log category for the listener. Connections log to `server/connection[<address>]`.
static LOG: &'static str = "server";

mod client;
pub use client::*;

mod config;
pub use config::*;

mod connection;

mod dispatcher;
pub use dispatcher::*;

mod error;
pub use error::*;

pub mod frame;

mod message;
pub use message::*;

mod server;
pub use server::*;
