//! i3 IPC wire framing.
//!
//! Both i3 and sway speak the same protocol over a Unix stream socket:
//! every message is the 6-byte magic `i3-ipc`, a little-endian u32 payload
//! length, a little-endian u32 message type, and then the payload (JSON in
//! both directions).  Event messages from a subscription carry the event
//! bit in their type field.
//!
//! This module only does framing; interpretation of payloads lives in
//! [`wm`](super::wm).

use std::io::{self, Read, Write};
use std::os::unix::net::UnixStream;

/// The 6-byte magic prefixing every message.
pub const MAGIC: &[u8; 6] = b"i3-ipc";

/// `RUN_COMMAND` message type.
pub const RUN_COMMAND: u32 = 0;
/// `SUBSCRIBE` message type.
pub const SUBSCRIBE: u32 = 2;
/// `GET_OUTPUTS` message type.
pub const GET_OUTPUTS: u32 = 3;

/// High bit marking a message as an asynchronous event.
pub const EVENT_BIT: u32 = 1 << 31;

/// Frame and send one message.
pub fn send_message(stream: &mut UnixStream, msg_type: u32, payload: &[u8]) -> io::Result<()> {
    let mut frame = Vec::with_capacity(MAGIC.len() + 8 + payload.len());
    frame.extend_from_slice(MAGIC);
    frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    frame.extend_from_slice(&msg_type.to_le_bytes());
    frame.extend_from_slice(payload);
    stream.write_all(&frame)
}

/// Receive one message, returning `(type, payload)`.
///
/// Fails with `InvalidData` if the magic does not match — either the peer
/// is not an i3-compatible compositor or the stream lost sync.
pub fn recv_message(stream: &mut UnixStream) -> io::Result<(u32, Vec<u8>)> {
    let mut header = [0u8; 14];
    stream.read_exact(&mut header)?;

    if &header[..6] != MAGIC {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "bad i3-ipc magic in reply",
        ));
    }

    let len = u32::from_le_bytes(header[6..10].try_into().unwrap()) as usize;
    let msg_type = u32::from_le_bytes(header[10..14].try_into().unwrap());

    let mut payload = vec![0u8; len];
    stream.read_exact(&mut payload)?;
    Ok((msg_type, payload))
}

/// Whether a received message type is an event rather than a reply.
pub fn is_event(msg_type: u32) -> bool {
    msg_type & EVENT_BIT != 0
}
