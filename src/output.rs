//! Output topology types.
//!
//! This module defines the vocabulary shared by every component:
//! [`Output`] describes one display as reported by the compositor,
//! [`Rect`] is its rectangle in the absolute virtual-screen coordinate
//! space, and [`TargetPoint`] is a computed absolute coordinate.
//!
//! The topology is read-only to this program: the compositor owns it, we
//! only query it.

use serde::Deserialize;
use std::fmt;

/// A rectangle in absolute virtual-screen coordinates.
///
/// `x`/`y` may be negative when an output sits left of or above the
/// primary output's origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Rect {
    /// X position on the virtual desktop (pixels).
    pub x: i32,
    /// Y position on the virtual desktop (pixels).
    pub y: i32,
    /// Horizontal resolution in pixels.
    pub width: u32,
    /// Vertical resolution in pixels.
    pub height: u32,
}

/// One display output as reported by the compositor.
///
/// Deserialized from the subset of the `GET_OUTPUTS` JSON we care about.
/// sway reports `focused`; i3 omits it, so it defaults to `false`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Output {
    /// Unique name the compositor uses for this output (e.g. `"DP-1"`).
    pub name: String,
    /// Position and dimensions on the virtual desktop.
    pub rect: Rect,
    /// Whether this output currently holds the input focus.
    #[serde(default)]
    pub focused: bool,
    /// Whether this output is currently enabled.
    #[serde(default = "default_true")]
    pub active: bool,
}

fn default_true() -> bool {
    true
}

/// An absolute screen coordinate derived from an [`Output`].
///
/// Ephemeral: computed once per invocation, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetPoint {
    pub x: i32,
    pub y: i32,
}

impl fmt::Display for TargetPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Return the output currently marked focused, if any.
///
/// The compositor marks at most one output focused; if it marks several
/// (which would be a compositor bug), the first wins.
pub fn focused_output(outputs: &[Output]) -> Option<&Output> {
    outputs.iter().find(|o| o.focused)
}

/// Whether `name` follows the internal-panel naming convention.
///
/// Laptop panels show up as `eDP-*`, `LVDS-*` or `DSI-*` depending on the
/// connector; everything else is treated as external.
pub fn is_internal_panel(name: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|p| name.starts_with(p.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(name: &str, x: i32, width: u32, focused: bool) -> Output {
        Output {
            name: name.into(),
            rect: Rect {
                x,
                y: 0,
                width,
                height: 1440,
            },
            focused,
            active: true,
        }
    }

    #[test]
    fn deserialize_sway_output_subset() {
        let json = r#"{
            "name": "HDMI-1",
            "make": "Dell",
            "active": true,
            "focused": true,
            "rect": { "x": 1920, "y": 0, "width": 2560, "height": 1440 }
        }"#;
        let o: Output = serde_json::from_str(json).unwrap();
        assert_eq!(o.name, "HDMI-1");
        assert_eq!(o.rect.x, 1920);
        assert_eq!(o.rect.width, 2560);
        assert!(o.focused);
        assert!(o.active);
    }

    #[test]
    fn deserialize_without_focused_defaults_false() {
        // i3 does not report a `focused` field on outputs.
        let json = r#"{
            "name": "eDP-1",
            "rect": { "x": 0, "y": 0, "width": 1920, "height": 1080 }
        }"#;
        let o: Output = serde_json::from_str(json).unwrap();
        assert!(!o.focused);
        assert!(o.active);
    }

    #[test]
    fn focused_output_picks_marked() {
        let outputs = vec![
            output("eDP-1", 0, 1920, false),
            output("HDMI-1", 1920, 2560, true),
        ];
        assert_eq!(
            focused_output(&outputs).map(|o| o.name.as_str()),
            Some("HDMI-1")
        );
    }

    #[test]
    fn focused_output_none_when_unmarked() {
        let outputs = vec![
            output("eDP-1", 0, 1920, false),
            output("HDMI-1", 1920, 2560, false),
        ];
        assert!(focused_output(&outputs).is_none());
    }

    #[test]
    fn internal_panel_classification() {
        let prefixes: Vec<String> = vec!["eDP".into(), "LVDS".into(), "DSI".into()];
        assert!(is_internal_panel("eDP-1", &prefixes));
        assert!(is_internal_panel("LVDS-1", &prefixes));
        assert!(!is_internal_panel("HDMI-A-1", &prefixes));
        assert!(!is_internal_panel("DP-3", &prefixes));
    }

    #[test]
    fn target_point_display() {
        let p = TargetPoint { x: 4460, y: 667 };
        assert_eq!(p.to_string(), "(4460, 667)");
    }
}
