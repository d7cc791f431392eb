//! Idle-lock notification helper.
//!
//! Posts a desktop notification warning that the screen is about to lock,
//! then watches for user activity for a bounded window and closes the
//! notification early when activity shows up.  If the watch window passes
//! quietly the notification simply expires on its own.
//!
//! Activity is observed through the compositor's event stream: window,
//! workspace, binding, and mode events are all direct consequences of user
//! input.  The watcher is a single spawned thread bounded by a socket read
//! deadline — fire-and-forget, no synchronization beyond the join.

use crate::sway::{ipc, SwayWm};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::os::unix::net::UnixStream;
use std::time::{Duration, Instant};
use zbus::blocking::{Connection, Proxy};
use zbus::zvariant::Value;

const DEST: &str = "org.freedesktop.Notifications";
const PATH: &str = "/org/freedesktop/Notifications";
const IFACE: &str = "org.freedesktop.Notifications";

/// Compositor events that count as user activity.
const ACTIVITY_EVENTS: &[&str] = &["window", "workspace", "binding", "mode"];

/// Idle-notification settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    /// Notification summary line.
    pub summary: String,
    /// Notification body text.
    pub body: String,
    /// Notification expiry (ms); the lock should fire around the same time.
    pub timeout_ms: i32,
    /// How long to watch for activity before giving up (seconds).
    pub watch_secs: u64,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            summary: "Screen locking soon".into(),
            body: "Move the mouse or press a key to stay unlocked.".into(),
            timeout_ms: 10_000,
            watch_secs: 10,
        }
    }
}

/// Error from the idle-notification path.
#[derive(Debug, thiserror::Error)]
#[error("idle notification error: {0}")]
pub struct IdleError(String);

/// Post the notification and run the bounded activity watch.
///
/// Failing to post the notification is fatal; everything after that
/// (subscribing, watching, closing early) is best-effort and only logged.
pub fn run(wm: &SwayWm, config: &IdleConfig) -> Result<(), IdleError> {
    let conn = Connection::session()
        .map_err(|e| IdleError(format!("dbus session connect: {}", e)))?;
    let proxy = Proxy::new(&conn, DEST, PATH, IFACE)
        .map_err(|e| IdleError(format!("notification proxy: {}", e)))?;

    let id = post_notification(&proxy, config)?;
    info!("posted idle notification (id {})", id);

    let stream = match wm.subscribe(ACTIVITY_EVENTS) {
        Ok(stream) => stream,
        Err(e) => {
            warn!("cannot watch for activity ({}), notification left to expire", e);
            return Ok(());
        }
    };

    let watch = Duration::from_secs(config.watch_secs);
    let watcher = std::thread::spawn(move || watch_for_activity(stream, watch));
    let saw_activity = watcher.join().unwrap_or(false);

    if saw_activity {
        info!("activity detected, closing notification {}", id);
        if let Err(e) = close_notification(&proxy, id) {
            warn!("could not close notification {}: {}", id, e);
        }
    } else {
        debug!("no activity within {:?}, notification expires on its own", watch);
    }
    Ok(())
}

/// Send `Notify` and return the server-assigned notification id.
fn post_notification(proxy: &Proxy<'_>, config: &IdleConfig) -> Result<u32, IdleError> {
    let actions: Vec<&str> = vec![];
    let mut hints: HashMap<&str, Value<'_>> = HashMap::new();
    // 0=low, 1=normal, 2=critical
    hints.insert("urgency", Value::from(2u8));

    proxy
        .call(
            "Notify",
            &(
                "swaypoint",
                0u32,
                "system-lock-screen",
                config.summary.as_str(),
                config.body.as_str(),
                actions,
                hints,
                config.timeout_ms,
            ),
        )
        .map_err(|e| IdleError(format!("Notify call: {}", e)))
}

/// Send `CloseNotification` for `id`.
fn close_notification(proxy: &Proxy<'_>, id: u32) -> Result<(), IdleError> {
    proxy
        .call("CloseNotification", &(id,))
        .map_err(|e| IdleError(format!("CloseNotification call: {}", e)))
}

/// Block on the subscribed stream until an event arrives or the window
/// closes.  Returns whether activity was observed.
fn watch_for_activity(mut stream: UnixStream, window: Duration) -> bool {
    let deadline = Instant::now() + window;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return false;
        }
        if stream.set_read_timeout(Some(remaining)).is_err() {
            return false;
        }
        match ipc::recv_message(&mut stream) {
            Ok((msg_type, _)) if ipc::is_event(msg_type) => return true,
            // Replies on a subscribed stream are not activity; keep waiting.
            Ok(_) => continue,
            Err(e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                return false
            }
            Err(e) => {
                warn!("activity stream error: {}", e);
                return false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::net::UnixListener;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    fn tmp_socket_path() -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "swaypoint-idle-test-{}-{}.sock",
            std::process::id(),
            id
        ))
    }

    fn connected_pair(path: &PathBuf) -> (UnixStream, UnixStream) {
        let _ = std::fs::remove_file(path);
        let listener = UnixListener::bind(path).expect("bind");
        let client = UnixStream::connect(path).expect("connect");
        let (server, _) = listener.accept().expect("accept");
        let _ = std::fs::remove_file(path);
        (client, server)
    }

    #[test]
    fn event_counts_as_activity() {
        let path = tmp_socket_path();
        let (client, mut server) = connected_pair(&path);

        let sender = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(50));
            ipc::send_message(&mut server, ipc::EVENT_BIT | 3, b"{}").expect("send");
        });

        assert!(watch_for_activity(client, Duration::from_secs(2)));
        sender.join().unwrap();
    }

    #[test]
    fn quiet_stream_times_out() {
        let path = tmp_socket_path();
        let (client, _server) = connected_pair(&path);

        let start = Instant::now();
        assert!(!watch_for_activity(client, Duration::from_millis(100)));
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[test]
    fn non_event_reply_is_not_activity() {
        let path = tmp_socket_path();
        let (client, mut server) = connected_pair(&path);

        let sender = std::thread::spawn(move || {
            // A plain reply, then silence.
            ipc::send_message(&mut server, ipc::SUBSCRIBE, br#"{"success":true}"#)
                .expect("send");
            std::thread::sleep(Duration::from_millis(300));
        });

        assert!(!watch_for_activity(client, Duration::from_millis(150)));
        sender.join().unwrap();
    }

    #[test]
    fn closed_stream_is_not_activity() {
        let path = tmp_socket_path();
        let (client, mut server) = connected_pair(&path);
        let _ = server.write_all(b"partial");
        drop(server);
        assert!(!watch_for_activity(client, Duration::from_secs(2)));
    }

    #[test]
    fn idle_config_defaults() {
        let cfg = IdleConfig::default();
        assert_eq!(cfg.watch_secs, 10);
        assert_eq!(cfg.timeout_ms, 10_000);
        assert!(!cfg.summary.is_empty());
    }
}
