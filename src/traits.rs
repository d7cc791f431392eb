//! Core traits that decouple swaypoint from any specific compositor or
//! input-injection mechanism.
//!
//! Every concrete backend (the sway/i3 IPC client, the XTest injector, a
//! test harness, …) implements one or more of these traits.  The
//! orchestrators in [`placement`](crate::placement) and
//! [`layout`](crate::layout) only depend on these abstractions.

use crate::layout::OutputSetting;
use crate::output::Output;

/// Abstraction over the compositor's output-topology query.
pub trait OutputTopology {
    /// The error type produced by this backend.
    type Error: std::error::Error + Send + 'static;

    /// Return every output the compositor knows about.
    ///
    /// An `Ok(vec![])` means the query succeeded but the compositor
    /// reported no outputs; callers decide whether that is fatal.
    fn outputs(&self) -> Result<Vec<Output>, Self::Error>;
}

/// Abstraction over synthetic pointer input.
///
/// The contract is deliberately tiny: absolute move, then click.  An
/// implementation might drive the compositor's seat over IPC, or talk to
/// the XTest extension directly.
pub trait PointerInjector {
    /// The error type produced by this backend.
    type Error: std::error::Error + Send + 'static;

    /// Warp the pointer to absolute virtual-screen coordinates.
    fn move_to(&self, x: i32, y: i32) -> Result<(), Self::Error>;

    /// Press and release a pointer button (1 = primary).
    fn click(&self, button: u8) -> Result<(), Self::Error>;
}

/// Abstraction over the compositor's display-configuration interface.
///
/// One call per output; there is no transaction across calls.  This is a
/// one-shot declarative push, not a controller — the backend applies the
/// setting and reports success or failure, nothing is read back.
pub trait OutputConfigurer {
    /// The error type produced by this backend.
    type Error: std::error::Error + Send + 'static;

    /// Apply a single output setting.
    fn set_output(&self, setting: &OutputSetting) -> Result<(), Self::Error>;
}

//  Blanket impls so one backend can be shared by reference across the
//  orchestrators' type parameters.

impl<T: OutputTopology> OutputTopology for &T {
    type Error = T::Error;

    fn outputs(&self) -> Result<Vec<Output>, Self::Error> {
        (*self).outputs()
    }
}

impl<P: PointerInjector> PointerInjector for &P {
    type Error = P::Error;

    fn move_to(&self, x: i32, y: i32) -> Result<(), Self::Error> {
        (*self).move_to(x, y)
    }

    fn click(&self, button: u8) -> Result<(), Self::Error> {
        (*self).click(button)
    }
}

impl<C: OutputConfigurer> OutputConfigurer for &C {
    type Error = C::Error;

    fn set_output(&self, setting: &OutputSetting) -> Result<(), Self::Error> {
        (*self).set_output(setting)
    }
}
