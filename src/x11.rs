//! X11 XTest pointer injection (feature `xtest`).
//!
//! For plain-X11 sessions (i3 without a Wayland seat) the compositor IPC
//! cannot warp the pointer, so this backend drives the XTest extension
//! directly: `XTestFakeMotionEvent` for absolute motion and
//! `XTestFakeButtonEvent` for the click.  Synthesized events are delivered
//! exactly like physical input.

use crate::traits::PointerInjector;
use std::ffi::CString;
use std::os::raw::{c_int, c_uint};
use ::x11::xlib;
use ::x11::xtest;

/// Passing `-1` as the screen number means "the screen that currently
/// contains the pointer", which is what absolute motion wants.
const SCREEN_DEFAULT: c_int = -1;

/// Errors from the XTest backend.
#[derive(Debug, thiserror::Error)]
#[error("xtest error: {0}")]
pub struct XTestError(String);

/// XTest-backed pointer injector.
///
/// Holds an open display connection for the lifetime of the value.
pub struct XTestInjector {
    display: *mut xlib::Display,
}

impl XTestInjector {
    /// Open a display connection.
    ///
    /// `display_name` is the explicit display address (`":0"`); `None`
    /// falls back to the `DISPLAY` environment variable, which is what
    /// `XOpenDisplay(NULL)` does.
    pub fn open(display_name: Option<&str>) -> Result<Self, XTestError> {
        let name = display_name
            .map(|s| {
                CString::new(s).map_err(|_| XTestError("display name contains NUL".into()))
            })
            .transpose()?;
        let ptr = name
            .as_ref()
            .map(|c| c.as_ptr())
            .unwrap_or(std::ptr::null());

        let display = unsafe { xlib::XOpenDisplay(ptr) };
        if display.is_null() {
            return Err(XTestError(format!(
                "cannot open display {:?}",
                display_name.unwrap_or("$DISPLAY")
            )));
        }
        Ok(Self { display })
    }
}

impl Drop for XTestInjector {
    fn drop(&mut self) {
        unsafe {
            xlib::XCloseDisplay(self.display);
        }
    }
}

impl PointerInjector for XTestInjector {
    type Error = XTestError;

    fn move_to(&self, x: i32, y: i32) -> Result<(), Self::Error> {
        unsafe {
            xtest::XTestFakeMotionEvent(
                self.display,
                SCREEN_DEFAULT,
                x as c_int,
                y as c_int,
                xlib::CurrentTime,
            );
            xlib::XFlush(self.display);
        }
        Ok(())
    }

    fn click(&self, button: u8) -> Result<(), Self::Error> {
        unsafe {
            xtest::XTestFakeButtonEvent(
                self.display,
                button as c_uint,
                xlib::True,
                xlib::CurrentTime,
            );
            xtest::XTestFakeButtonEvent(
                self.display,
                button as c_uint,
                xlib::False,
                xlib::CurrentTime,
            );
            xlib::XFlush(self.display);
        }
        Ok(())
    }
}
