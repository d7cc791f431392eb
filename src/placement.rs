//! Pointer placement.
//!
//! Resolves a [`TargetPoint`] on the currently focused output and drives a
//! [`PointerInjector`] to warp the pointer there and click.
//!
//! Edge mode places the target a fixed inset from the right edge.  A small
//! breakpoint table pins the exact local x for the monitor widths the
//! target desktop is known to use; any other width falls back to
//! `width − edge_inset`.  Center mode places the target at the horizontal
//! midpoint.  Both modes share a fixed panel row for the y coordinate — the
//! vertical position of the panel widget the click is aimed at.

use crate::output::{focused_output, Output, TargetPoint};
use crate::traits::{OutputTopology, PointerInjector};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The primary pointer button.
pub const PRIMARY_BUTTON: u8 = 1;

/// Coordinate policy for pointer placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementMode {
    /// Near the right edge of the focused output.
    Edge,
    /// At the horizontal midpoint of the focused output.
    Center,
}

impl fmt::Display for PlacementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementMode::Edge => write!(f, "edge"),
            PlacementMode::Center => write!(f, "center"),
        }
    }
}

/// Error for an unrecognised mode string.
#[derive(Debug, thiserror::Error)]
#[error("invalid placement mode: {0:?} (expected \"edge\" or \"center\")")]
pub struct ParseModeError(String);

impl FromStr for PlacementMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "edge" => Ok(PlacementMode::Edge),
            "center" => Ok(PlacementMode::Center),
            _ => Err(ParseModeError(s.to_string())),
        }
    }
}

/// One entry of the edge-mode breakpoint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeBreakpoint {
    /// Output width this entry applies to.
    pub width: u32,
    /// Local x to use for that width.
    pub x: u32,
}

/// Pointer-placement settings.
///
/// The defaults encode one specific desktop-panel layout (panel row 667,
/// per-width right-edge insets); treat them as a starting point and
/// override them from the config file for a different panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Exact-width entries, consulted before the fallback inset.
    pub breakpoints: Vec<EdgeBreakpoint>,
    /// Fallback: edge-mode local x = `width − edge_inset`.
    pub edge_inset: u32,
    /// Local y for both modes (the panel widget's row).
    pub panel_row: u32,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            breakpoints: vec![
                EdgeBreakpoint { width: 3840, x: 3820 },
                EdgeBreakpoint { width: 2560, x: 2540 },
                EdgeBreakpoint { width: 1920, x: 1844 },
            ],
            edge_inset: 76,
            panel_row: 667,
        }
    }
}

impl PlacementConfig {
    /// Edge-mode local x for an output of the given width.
    ///
    /// The breakpoint table is scanned largest-first; an entry only applies
    /// when its x actually fits inside the output.  Everything else gets
    /// the fallback inset, saturating at 0 for degenerate widths.
    pub fn edge_local_x(&self, width: u32) -> u32 {
        let mut table: Vec<&EdgeBreakpoint> = self.breakpoints.iter().collect();
        table.sort_by(|a, b| b.width.cmp(&a.width));
        for bp in table {
            if bp.width == width && bp.x < width {
                return bp.x;
            }
        }
        width.saturating_sub(self.edge_inset)
    }
}

/// Compute the absolute target on `output` for the given mode.
///
/// The local coordinate always stays inside the output rectangle: the
/// panel row is clamped to the bottom edge for outputs shorter than it.
pub fn resolve_target(output: &Output, mode: PlacementMode, config: &PlacementConfig) -> TargetPoint {
    let width = output.rect.width;
    let local_x = match mode {
        PlacementMode::Edge => config.edge_local_x(width),
        PlacementMode::Center => width / 2,
    };
    let local_y = config
        .panel_row
        .min(output.rect.height.saturating_sub(1));
    TargetPoint {
        x: output.rect.x + local_x as i32,
        y: output.rect.y + local_y as i32,
    }
}

/// Possible errors from the placer.
#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    /// The topology query failed or returned malformed data.
    #[error("topology error: {0}")]
    Topology(String),
    /// The synthetic-input dispatch failed.
    #[error("pointer injection error: {0}")]
    Injector(String),
    /// The query succeeded but the compositor reported no outputs at all.
    #[error("compositor reported no outputs")]
    NoOutputs,
}

/// Orchestrates topology lookup, coordinate resolution, and injection.
///
/// Generic over any [`OutputTopology`] and [`PointerInjector`], so the
/// placement logic is independent of the concrete compositor backend.
///
/// # Typical usage
///
/// ```ignore
/// let wm = SwayWm::new(socket_path);
/// let placer = PointerPlacer::new(&wm, &wm, config.placement.clone());
/// placer.place_and_click(PlacementMode::Edge)?;
/// ```
pub struct PointerPlacer<T, P> {
    topology: T,
    injector: P,
    config: PlacementConfig,
}

impl<T: OutputTopology, P: PointerInjector> PointerPlacer<T, P> {
    /// Create a new placer over the given backends.
    pub fn new(topology: T, injector: P, config: PlacementConfig) -> Self {
        Self {
            topology,
            injector,
            config,
        }
    }

    /// Warp the pointer to the resolved target on the focused output and
    /// click the primary button.
    ///
    /// Returns `Ok(None)` without side effects when no output is focused —
    /// a deliberate policy: the pointer is never moved while the focus
    /// state is ambiguous.  An empty topology is a hard failure.
    pub fn place_and_click(&self, mode: PlacementMode) -> Result<Option<TargetPoint>, PlaceError> {
        let outputs = self
            .topology
            .outputs()
            .map_err(|e| PlaceError::Topology(e.to_string()))?;
        if outputs.is_empty() {
            return Err(PlaceError::NoOutputs);
        }

        let Some(output) = focused_output(&outputs) else {
            info!("no focused output, leaving the pointer alone");
            return Ok(None);
        };

        let target = resolve_target(output, mode, &self.config);
        debug!(
            "placing pointer at {} on {} ({}x{} at {},{}), mode {}",
            target,
            output.name,
            output.rect.width,
            output.rect.height,
            output.rect.x,
            output.rect.y,
            mode
        );

        self.injector
            .move_to(target.x, target.y)
            .map_err(|e| PlaceError::Injector(e.to_string()))?;
        self.injector
            .click(PRIMARY_BUTTON)
            .map_err(|e| PlaceError::Injector(e.to_string()))?;
        Ok(Some(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{Output, Rect};
    use crate::traits::mock::MockBackend;

    fn output(name: &str, x: i32, y: i32, width: u32, height: u32, focused: bool) -> Output {
        Output {
            name: name.into(),
            rect: Rect {
                x,
                y,
                width,
                height,
            },
            focused,
            active: true,
        }
    }

    //  Local coordinate resolution

    #[test]
    fn edge_breakpoint_widths() {
        let cfg = PlacementConfig::default();
        assert_eq!(cfg.edge_local_x(3840), 3820);
        assert_eq!(cfg.edge_local_x(2560), 2540);
        assert_eq!(cfg.edge_local_x(1920), 1844);
    }

    #[test]
    fn edge_fallback_is_width_minus_inset() {
        let cfg = PlacementConfig::default();
        for w in [77u32, 1280, 1921, 2000, 3440, 5120] {
            let x = cfg.edge_local_x(w);
            assert_eq!(x, w - 76);
            assert!(x < w);
        }
    }

    #[test]
    fn edge_tiny_width_saturates() {
        let cfg = PlacementConfig::default();
        assert_eq!(cfg.edge_local_x(76), 0);
        assert_eq!(cfg.edge_local_x(10), 0);
    }

    #[test]
    fn edge_breakpoint_must_fit_inside_output() {
        // An entry whose x does not fit is skipped, not clamped.
        let cfg = PlacementConfig {
            breakpoints: vec![EdgeBreakpoint { width: 1000, x: 1200 }],
            ..Default::default()
        };
        assert_eq!(cfg.edge_local_x(1000), 1000 - 76);
    }

    #[test]
    fn center_is_half_width() {
        let cfg = PlacementConfig::default();
        for w in [1u32, 1920, 2560, 2561, 3840] {
            let o = output("X", 0, 0, w, 1440, true);
            let t = resolve_target(&o, PlacementMode::Center, &cfg);
            assert_eq!(t.x, (w / 2) as i32);
        }
    }

    //  Absolute targets

    #[test]
    fn edge_target_on_offset_output() {
        // spec example: HDMI-1 at (1920,0) 2560x1440, edge mode.
        let o = output("HDMI-1", 1920, 0, 2560, 1440, true);
        let t = resolve_target(&o, PlacementMode::Edge, &PlacementConfig::default());
        assert_eq!(t, crate::output::TargetPoint { x: 4460, y: 667 });
    }

    #[test]
    fn center_target_on_offset_output() {
        let o = output("HDMI-1", 1920, 0, 2560, 1440, true);
        let t = resolve_target(&o, PlacementMode::Center, &PlacementConfig::default());
        assert_eq!(t, crate::output::TargetPoint { x: 3200, y: 667 });
    }

    #[test]
    fn target_respects_negative_origin() {
        let o = output("DP-1", -1920, -500, 1920, 1080, true);
        let t = resolve_target(&o, PlacementMode::Edge, &PlacementConfig::default());
        assert_eq!(t.x, -1920 + 1844);
        assert_eq!(t.y, -500 + 667);
    }

    #[test]
    fn panel_row_clamped_to_short_output() {
        let o = output("DP-1", 0, 0, 1920, 600, true);
        let t = resolve_target(&o, PlacementMode::Edge, &PlacementConfig::default());
        assert_eq!(t.y, 599);
    }

    #[test]
    fn target_inside_output_rect() {
        let cfg = PlacementConfig::default();
        for w in [77u32, 1920, 2560, 3440, 3840] {
            for mode in [PlacementMode::Edge, PlacementMode::Center] {
                let o = output("X", 100, 200, w, 1440, true);
                let t = resolve_target(&o, mode, &cfg);
                let lx = t.x - 100;
                let ly = t.y - 200;
                assert!((0..w as i32).contains(&lx), "w={} mode={}", w, mode);
                assert!((0..1440).contains(&ly));
            }
        }
    }

    //  Placer orchestration

    fn focused_backend() -> MockBackend {
        MockBackend {
            outputs: vec![
                output("eDP-1", 0, 0, 1920, 1080, false),
                output("HDMI-1", 1920, 0, 2560, 1440, true),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn place_and_click_moves_then_clicks() {
        let backend = focused_backend();
        let placer = PointerPlacer::new(&backend, &backend, PlacementConfig::default());
        let target = placer.place_and_click(PlacementMode::Edge).unwrap();
        assert_eq!(target, Some(crate::output::TargetPoint { x: 4460, y: 667 }));
        assert_eq!(*backend.moves.borrow(), vec![(4460, 667)]);
        assert_eq!(*backend.clicks.borrow(), vec![PRIMARY_BUTTON]);
    }

    #[test]
    fn no_focused_output_is_silent_noop() {
        let mut backend = focused_backend();
        for o in &mut backend.outputs {
            o.focused = false;
        }
        let placer = PointerPlacer::new(&backend, &backend, PlacementConfig::default());
        let target = placer.place_and_click(PlacementMode::Edge).unwrap();
        assert_eq!(target, None);
        assert!(backend.moves.borrow().is_empty());
        assert!(backend.clicks.borrow().is_empty());
    }

    #[test]
    fn empty_topology_is_an_error() {
        let backend = MockBackend::default();
        let placer = PointerPlacer::new(&backend, &backend, PlacementConfig::default());
        assert!(matches!(
            placer.place_and_click(PlacementMode::Edge),
            Err(PlaceError::NoOutputs)
        ));
    }

    #[test]
    fn topology_failure_propagates() {
        let backend = MockBackend {
            fail_topology: true,
            ..Default::default()
        };
        let placer = PointerPlacer::new(&backend, &backend, PlacementConfig::default());
        assert!(matches!(
            placer.place_and_click(PlacementMode::Center),
            Err(PlaceError::Topology(_))
        ));
    }

    //  Mode parsing

    #[test]
    fn parse_mode_strings() {
        assert_eq!("edge".parse::<PlacementMode>().unwrap(), PlacementMode::Edge);
        assert_eq!(
            " Center ".parse::<PlacementMode>().unwrap(),
            PlacementMode::Center
        );
        assert!("corner".parse::<PlacementMode>().is_err());
    }

    #[test]
    fn mode_display_round_trip() {
        for mode in [PlacementMode::Edge, PlacementMode::Center] {
            assert_eq!(mode.to_string().parse::<PlacementMode>().unwrap(), mode);
        }
    }
}
