//! Length-prefixed framing of messages on a byte stream.
//!
//! A frame is a big-endian `u32` payload length followed by the payload,
//! which is the message encoded with `bincode`.

use crate::network::Error;
use serde::{de::DeserializeOwned, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// The largest payload accepted in either direction.
/// A fully solid chunk encodes to well under 1 MiB.
pub const MAX_PAYLOAD_SIZE: usize = 4 * 1024 * 1024;

pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, Error> {
	let payload = bincode::serialize(message).map_err(Error::Encode)?;
	if payload.len() > MAX_PAYLOAD_SIZE {
		return Err(Error::FrameTooLarge {
			size: payload.len(),
			limit: MAX_PAYLOAD_SIZE,
		});
	}
	Ok(payload)
}

pub fn decode<T: DeserializeOwned>(payload: &[u8]) -> Result<T, Error> {
	bincode::deserialize(payload).map_err(Error::Decode)
}

/// Writes one message as a frame and flushes the writer.
pub async fn write<W, T>(writer: &mut W, message: &T) -> Result<(), Error>
where
	W: AsyncWrite + Unpin,
	T: Serialize,
{
	let payload = encode(message)?;
	writer.write_u32(payload.len() as u32).await?;
	writer.write_all(&payload).await?;
	writer.flush().await?;
	Ok(())
}

/// Reads one frame and decodes its message.
/// Returns None if the stream ended exactly where a new frame would begin,
/// a stream which ends part way through a frame is an error.
pub async fn read<R, T>(reader: &mut R) -> Result<Option<T>, Error>
where
	R: AsyncRead + Unpin,
	T: DeserializeOwned,
{
	let mut header = [0u8; 4];
	header[0] = match reader.read_u8().await {
		Ok(byte) => byte,
		Err(error) if error.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
		Err(error) => return Err(error.into()),
	};
	reader.read_exact(&mut header[1..]).await?;
	let size = u32::from_be_bytes(header) as usize;
	if size > MAX_PAYLOAD_SIZE {
		return Err(Error::FrameTooLarge {
			size,
			limit: MAX_PAYLOAD_SIZE,
		});
	}
	let mut payload = vec![0u8; size];
	reader.read_exact(&mut payload).await?;
	Ok(Some(decode(&payload)?))
}
