//! Output auto-arrangement.
//!
//! Classifies connected outputs into the internal laptop panel and external
//! monitors by name pattern, then pushes a fixed declarative layout:
//! internal at the origin, externals chained to its right.  There is no
//! feedback loop and no retry — each [`OutputSetting`] is applied once and
//! the compositor's verdict is final.

use crate::output::{is_internal_panel, Output};
use crate::traits::{OutputConfigurer, OutputTopology};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

/// Requested mode for one output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Let the compositor pick the output's preferred mode.
    Auto,
    /// A fixed `width x height` mode.
    Fixed { width: u32, height: u32 },
}

/// A single declarative output setting.
///
/// `position` and `right_of` are alternatives: a concrete coordinate, or a
/// placement relative to another output that the backend resolves against
/// live topology at apply time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSetting {
    /// Output name (e.g. `"HDMI-A-1"`).
    pub name: String,
    /// Make this output the primary one.
    pub primary: bool,
    /// Requested mode.
    pub mode: OutputMode,
    /// Absolute position on the virtual desktop.
    pub position: Option<(i32, i32)>,
    /// Place this output directly right of the named one.
    pub right_of: Option<String>,
    /// Disable the output entirely (ignores the placement fields).
    pub off: bool,
}

impl OutputSetting {
    /// An enabled output at its preferred mode with no placement yet.
    fn auto(name: &str) -> Self {
        Self {
            name: name.to_string(),
            primary: false,
            mode: OutputMode::Auto,
            position: None,
            right_of: None,
            off: false,
        }
    }
}

/// Arrangement settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Name prefixes identifying the internal laptop panel.
    pub internal_prefixes: Vec<String>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            internal_prefixes: vec!["eDP".into(), "LVDS".into(), "DSI".into()],
        }
    }
}

/// Build the layout plan for the given topology.
///
/// The first output in the plan sits at the origin and becomes primary;
/// every further output is chained `right_of` its predecessor.  With
/// `external_only` set, the internal panel is disabled and the chain is
/// built from the externals alone (clamshell use); if no external is
/// connected the flag is ignored rather than leaving the user blind.
pub fn plan_layout(
    outputs: &[Output],
    config: &LayoutConfig,
    external_only: bool,
) -> Vec<OutputSetting> {
    let internal: Option<&Output> = outputs
        .iter()
        .find(|o| is_internal_panel(&o.name, &config.internal_prefixes));
    let externals: Vec<&Output> = outputs
        .iter()
        .filter(|o| !is_internal_panel(&o.name, &config.internal_prefixes))
        .collect();

    let mut plan = Vec::new();

    let disable_internal = external_only && internal.is_some() && !externals.is_empty();
    if external_only && externals.is_empty() {
        warn!("--external-only requested but no external output is connected");
    }

    // The chain head: internal panel unless it is being disabled.
    let chain: Vec<&Output> = match internal {
        Some(panel) if !disable_internal => {
            std::iter::once(panel).chain(externals).collect()
        }
        _ => externals,
    };

    if let (Some(panel), true) = (internal, disable_internal) {
        plan.push(OutputSetting {
            off: true,
            ..OutputSetting::auto(&panel.name)
        });
    }

    let mut previous: Option<&str> = None;
    for output in &chain {
        let mut setting = OutputSetting::auto(&output.name);
        match previous {
            None => {
                setting.primary = true;
                setting.position = Some((0, 0));
            }
            Some(prev) => setting.right_of = Some(prev.to_string()),
        }
        plan.push(setting);
        previous = Some(output.name.as_str());
    }

    plan
}

/// Possible errors from the arranger.
#[derive(Debug, thiserror::Error)]
pub enum ArrangeError {
    /// The topology query failed or returned malformed data.
    #[error("topology error: {0}")]
    Topology(String),
    /// The compositor rejected an output command.
    #[error("output configuration error: {0}")]
    Configurer(String),
    /// The query succeeded but the compositor reported no outputs at all.
    #[error("compositor reported no outputs")]
    NoOutputs,
}

/// Orchestrates the one-shot layout push.
///
/// Generic over any [`OutputTopology`] and [`OutputConfigurer`]; in
/// practice both are the same compositor backend.
pub struct LayoutArranger<T, C> {
    topology: T,
    configurer: C,
    config: LayoutConfig,
}

impl<T: OutputTopology, C: OutputConfigurer> LayoutArranger<T, C> {
    /// Create a new arranger over the given backends.
    pub fn new(topology: T, configurer: C, config: LayoutConfig) -> Self {
        Self {
            topology,
            configurer,
            config,
        }
    }

    /// Query the topology, build the plan, and apply every setting.
    ///
    /// Returns the number of settings applied.  The first rejected setting
    /// aborts the push; earlier settings stay applied (there is no
    /// transaction across outputs).
    pub fn arrange(&self, external_only: bool) -> Result<usize, ArrangeError> {
        let outputs = self
            .topology
            .outputs()
            .map_err(|e| ArrangeError::Topology(e.to_string()))?;
        if outputs.is_empty() {
            return Err(ArrangeError::NoOutputs);
        }

        let plan = plan_layout(&outputs, &self.config, external_only);
        for setting in &plan {
            debug!("applying {:?}", setting);
            self.configurer
                .set_output(setting)
                .map_err(|e| ArrangeError::Configurer(e.to_string()))?;
        }
        info!("arranged {} output(s)", plan.len());
        Ok(plan.len())
    }
}
