//! Entry point for the **swaypoint** CLI.
//!
//! One-shot execution: resolve the compositor socket and the config file
//! once at startup, run the requested operation, and exit.  Exit code 0
//! covers success and the deliberate "no focused output" no-op; every
//! query or dispatch failure exits non-zero.

use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::{Path, PathBuf};
use swaypoint::config::Config;
use swaypoint::idle;
use swaypoint::layout::LayoutArranger;
use swaypoint::output::TargetPoint;
use swaypoint::placement::{PlacementMode, PointerPlacer};
use swaypoint::sway::SwayWm;

#[derive(Debug, Parser)]
#[command(
    name = "swaypoint",
    version,
    about = "Pointer placement and output arrangement for i3/sway desktops"
)]
struct Args {
    /// Override the compositor socket path (default: $SWAYSOCK / $I3SOCK)
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Override the config file path (default: $XDG_CONFIG_HOME/swaypoint/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Move the pointer on the focused output and click
    Place {
        /// Coordinate policy: "edge" or "center"
        #[arg(long, default_value = "edge")]
        mode: PlacementMode,

        /// Inject via the XTest extension instead of the compositor seat
        #[cfg(feature = "xtest")]
        #[arg(long)]
        xtest: bool,

        /// X display for --xtest (default: $DISPLAY)
        #[cfg(feature = "xtest")]
        #[arg(long)]
        display: Option<String>,
    },

    /// Arrange outputs: internal panel at the origin, externals to its right
    Arrange {
        /// Disable the internal panel and arrange externals only
        #[arg(long)]
        external_only: bool,
    },

    /// Post a pre-lock notification and close it early on activity
    IdleNotify {
        /// Seconds to watch for activity before letting the notification expire
        #[arg(long)]
        watch_secs: Option<u64>,
    },
}

/// Resolve the config directory (`$XDG_CONFIG_HOME/swaypoint`).
fn config_dir() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        format!("{}/.config", home)
    });
    PathBuf::from(base).join("swaypoint")
}

/// Load the config.
///
/// An explicitly passed `--config` path must load; the default location is
/// optional and falls back to compiled-in defaults.
fn load_config(explicit: Option<&Path>) -> Result<Config, swaypoint::config::ConfigError> {
    if let Some(path) = explicit {
        let cfg = Config::load(path)?;
        info!("loaded config from {}", path.display());
        return Ok(cfg);
    }
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            Ok(cfg)
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Ok(Config::default())
        }
    }
}

fn report_placement(target: Option<TargetPoint>) {
    match target {
        Some(target) => info!("clicked at {}", target),
        None => info!("no focused output, nothing done"),
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(args.config.as_deref())?;

    let wm = match &args.socket {
        Some(path) => SwayWm::new(path),
        None => SwayWm::from_env()?,
    };

    match args.cmd {
        #[cfg(feature = "xtest")]
        Cmd::Place {
            mode,
            xtest: true,
            display,
        } => {
            let injector = swaypoint::x11::XTestInjector::open(display.as_deref())?;
            let placer = PointerPlacer::new(&wm, injector, config.placement);
            report_placement(placer.place_and_click(mode)?);
        }
        Cmd::Place { mode, .. } => {
            let placer = PointerPlacer::new(&wm, &wm, config.placement);
            report_placement(placer.place_and_click(mode)?);
        }
        Cmd::Arrange { external_only } => {
            let arranger = LayoutArranger::new(&wm, &wm, config.layout);
            arranger.arrange(external_only)?;
        }
        Cmd::IdleNotify { watch_secs } => {
            let mut idle_config = config.idle;
            if let Some(secs) = watch_secs {
                idle_config.watch_secs = secs;
            }
            idle::run(&wm, &idle_config)?;
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}
