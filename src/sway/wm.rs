//! Compositor backend speaking the i3 IPC protocol.
//!
//! Communicates directly with sway (or i3) through its Unix socket,
//! avoiding any shell command invocation.  The socket path is explicit
//! configuration passed in at construction; [`SwayWm::from_env`] resolves
//! it once from `SWAYSOCK` / `I3SOCK` for callers that want the ambient
//! default.

use crate::layout::{OutputMode, OutputSetting};
use crate::output::Output;
use crate::sway::ipc;
use crate::traits::{OutputConfigurer, OutputTopology, PointerInjector};
use log::debug;
use serde::Deserialize;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

/// sway/i3-backed compositor handle.
///
/// No connection is opened eagerly; each request opens a short-lived IPC
/// connection, mirroring how `swaymsg` behaves.
pub struct SwayWm {
    socket_path: PathBuf,
}

/// Errors that can occur when talking to the compositor.
#[derive(Debug, thiserror::Error)]
#[error("sway IPC error: {0}")]
pub struct SwayWmError(String);

/// One element of a `RUN_COMMAND` reply.
#[derive(Deserialize)]
struct CommandOutcome {
    success: bool,
    error: Option<String>,
}

/// Reply to a `SUBSCRIBE` request.
#[derive(Deserialize)]
struct SubscribeReply {
    success: bool,
}

impl SwayWm {
    /// Create a handle talking to the socket at `socket_path`.
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    /// Resolve the socket path from the environment (`SWAYSOCK`, then
    /// `I3SOCK`).
    pub fn from_env() -> Result<Self, SwayWmError> {
        let path = std::env::var("SWAYSOCK")
            .or_else(|_| std::env::var("I3SOCK"))
            .map_err(|_| SwayWmError("neither SWAYSOCK nor I3SOCK is set".into()))?;
        Ok(Self::new(path))
    }

    /// The socket path this handle talks to.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    fn connect(&self) -> Result<UnixStream, SwayWmError> {
        UnixStream::connect(&self.socket_path).map_err(|e| {
            SwayWmError(format!(
                "connect to {}: {}",
                self.socket_path.display(),
                e
            ))
        })
    }

    /// Send one request and return the raw reply payload.
    fn request(&self, msg_type: u32, payload: &[u8]) -> Result<Vec<u8>, SwayWmError> {
        let mut stream = self.connect()?;
        ipc::send_message(&mut stream, msg_type, payload)
            .map_err(|e| SwayWmError(format!("write: {}", e)))?;
        loop {
            let (reply_type, reply) = ipc::recv_message(&mut stream)
                .map_err(|e| SwayWmError(format!("read: {}", e)))?;
            // A stray event on a fresh connection should not happen, but
            // skipping it costs nothing.
            if !ipc::is_event(reply_type) {
                return Ok(reply);
            }
        }
    }

    /// Dispatch one compositor command and check every outcome.
    fn run_command(&self, command: &str) -> Result<(), SwayWmError> {
        debug!("run_command: {}", command);
        let reply = self.request(ipc::RUN_COMMAND, command.as_bytes())?;
        let outcomes: Vec<CommandOutcome> = serde_json::from_slice(&reply)
            .map_err(|e| SwayWmError(format!("parse command reply: {}", e)))?;
        for outcome in outcomes {
            if !outcome.success {
                return Err(SwayWmError(format!(
                    "command {:?} rejected: {}",
                    command,
                    outcome.error.unwrap_or_else(|| "unknown error".into())
                )));
            }
        }
        Ok(())
    }

    /// Query the full output list.
    fn query_outputs(&self) -> Result<Vec<Output>, SwayWmError> {
        let reply = self.request(ipc::GET_OUTPUTS, b"")?;
        serde_json::from_slice(&reply).map_err(|e| SwayWmError(format!("parse outputs: {}", e)))
    }

    /// Subscribe to the given event names and hand back the stream.
    ///
    /// After a successful subscription every further message on the stream
    /// is an event; the caller owns the read loop (and its deadline).
    pub fn subscribe(&self, events: &[&str]) -> Result<UnixStream, SwayWmError> {
        let mut stream = self.connect()?;
        let payload = serde_json::to_vec(events)
            .map_err(|e| SwayWmError(format!("encode subscribe: {}", e)))?;
        ipc::send_message(&mut stream, ipc::SUBSCRIBE, &payload)
            .map_err(|e| SwayWmError(format!("write: {}", e)))?;
        let (_, reply) = ipc::recv_message(&mut stream)
            .map_err(|e| SwayWmError(format!("read: {}", e)))?;
        let reply: SubscribeReply = serde_json::from_slice(&reply)
            .map_err(|e| SwayWmError(format!("parse subscribe reply: {}", e)))?;
        if !reply.success {
            return Err(SwayWmError("subscribe rejected".into()));
        }
        Ok(stream)
    }

    /// Build the `output …` command string for a setting.
    ///
    /// `right_of` is resolved against `outputs`: the new position is the
    /// anchor's top-right corner.
    fn output_command(
        &self,
        setting: &OutputSetting,
        outputs: &[Output],
    ) -> Result<String, SwayWmError> {
        if setting.off {
            return Ok(format!("output {} disable", setting.name));
        }

        let mut cmd = format!("output {} enable", setting.name);
        if let OutputMode::Fixed { width, height } = setting.mode {
            cmd.push_str(&format!(" mode {}x{}", width, height));
        }

        let position = if let Some(anchor_name) = &setting.right_of {
            let anchor = outputs
                .iter()
                .find(|o| &o.name == anchor_name)
                .ok_or_else(|| {
                    SwayWmError(format!("right_of target {:?} not connected", anchor_name))
                })?;
            Some((
                anchor.rect.x + anchor.rect.width as i32,
                anchor.rect.y,
            ))
        } else {
            setting.position
        };
        if let Some((x, y)) = position {
            cmd.push_str(&format!(" pos {} {}", x, y));
        }
        Ok(cmd)
    }
}

//  Trait implementations

impl OutputTopology for SwayWm {
    type Error = SwayWmError;

    fn outputs(&self) -> Result<Vec<Output>, Self::Error> {
        self.query_outputs()
    }
}

impl PointerInjector for SwayWm {
    type Error = SwayWmError;

    fn move_to(&self, x: i32, y: i32) -> Result<(), Self::Error> {
        self.run_command(&format!("seat - cursor set {} {}", x, y))
    }

    fn click(&self, button: u8) -> Result<(), Self::Error> {
        self.run_command(&format!("seat - cursor press button{}", button))?;
        self.run_command(&format!("seat - cursor release button{}", button))
    }
}

impl OutputConfigurer for SwayWm {
    type Error = SwayWmError;

    fn set_output(&self, setting: &OutputSetting) -> Result<(), Self::Error> {
        // `right_of` needs the anchor's live geometry; disabled settings
        // and absolute positions skip the extra query.
        let outputs = if setting.right_of.is_some() && !setting.off {
            self.query_outputs()?
        } else {
            Vec::new()
        };
        let cmd = self.output_command(setting, &outputs)?;
        self.run_command(&cmd)?;
        // sway has no primary output; focusing the output is the closest
        // equivalent and is what the panel cares about.
        if setting.primary && !setting.off {
            self.run_command(&format!("focus output {}", setting.name))?;
        }
        Ok(())
    }
}
