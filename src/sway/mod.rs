//! sway/i3 compositor backend.
//!
//! [`ipc`] implements the i3 IPC wire framing; [`wm`] builds the
//! [`SwayWm`](wm::SwayWm) backend on top of it.

pub mod ipc;
pub mod wm;

pub use wm::{SwayWm, SwayWmError};
