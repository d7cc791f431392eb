//! Application configuration.
//!
//! Loaded from a JSON file (`$XDG_CONFIG_HOME/swaypoint/config.json` by
//! default).  Every section is optional — a minimal `{}` file is valid and
//! all sections fall back to their compiled-in defaults.
//!
//! # Example
//!
//! ```json
//! {
//!   "placement": {
//!     "panel_row": 667,
//!     "edge_inset": 76,
//!     "breakpoints": [
//!       { "width": 3840, "x": 3820 },
//!       { "width": 2560, "x": 2540 },
//!       { "width": 1920, "x": 1844 }
//!     ]
//!   },
//!   "layout": { "internal_prefixes": ["eDP", "LVDS", "DSI"] },
//!   "idle": { "watch_secs": 10, "timeout_ms": 10000 }
//! }
//! ```

use crate::idle::IdleConfig;
use crate::layout::LayoutConfig;
use crate::placement::PlacementConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Pointer-placement settings (breakpoints, inset, panel row).
    #[serde(default)]
    pub placement: PlacementConfig,

    /// Output-arrangement settings (internal-panel name patterns).
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Idle-notification settings.
    #[serde(default)]
    pub idle: IdleConfig,
}

impl Config {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        Ok(config)
    }
}

/// Error from loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
