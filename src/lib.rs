//! **swaypoint** — pointer placement and output arrangement for i3/sway
//! desktops.
//!
//! Three one-shot operations share one compositor connection:
//!
//! * `place` resolves a target coordinate on the currently focused output
//!   (near the right edge or at the horizontal center) and issues a
//!   synthetic pointer move plus primary click there.
//! * `arrange` classifies connected outputs into internal panel and
//!   externals and pushes a fixed layout (internal at the origin,
//!   externals chained to its right).
//! * `idle-notify` posts a pre-lock notification and closes it early when
//!   compositor events betray user activity within a bounded window.
//!
//! # Architecture
//!
//! The crate is organised around three seams in [`traits`]:
//!
//! * [`traits::OutputTopology`] — querying the output list.
//! * [`traits::PointerInjector`] — synthetic pointer move/click.
//! * [`traits::OutputConfigurer`] — declarative output settings.
//!
//! [`sway::SwayWm`] implements all three over the i3 IPC socket.  The
//! optional `xtest` feature adds [`x11::XTestInjector`] for plain-X11
//! sessions where the compositor cannot warp the pointer itself.

pub mod config;
pub mod idle;
pub mod layout;
pub mod output;
pub mod placement;
pub mod sway;
pub mod traits;

#[cfg(feature = "xtest")]
pub mod x11;
