//! Logging initialization.
//!
//! Controlled by environment variables:
//! - `GITSCOPE_LOG`, then `RUST_LOG`: an `EnvFilter` directive (default `warn`)
//! - `GITSCOPE_LOG_FORMAT=json`: JSON events instead of human-readable lines
//! - `GITSCOPE_LOG_FILE`: write to this file instead of stderr
//!
//! The terminal viewer owns the screen, so in that mode nothing is logged
//! unless `GITSCOPE_LOG_FILE` is set.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, Layer, Registry};

const DEFAULT_DIRECTIVE: &str = "warn";

/// Where the process's output goes, which decides where logs may go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Plain command: logs to stderr (or the log file).
    Cli,
    /// Full-screen viewer: logs only to the log file.
    Tui,
}

/// Install the global subscriber for `mode`.
///
/// # Errors
/// Returns an error if the log file cannot be created or a subscriber is
/// already installed.
pub fn init(mode: Mode) -> Result<()> {
    let json = wants_json(std::env::var("GITSCOPE_LOG_FORMAT").ok().as_deref());
    let file = std::env::var_os("GITSCOPE_LOG_FILE")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from);

    let layer = match (file, mode) {
        (Some(path), _) => {
            let file = File::create(&path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            fmt_layer(Mutex::new(file), json, false)
        }
        (None, Mode::Cli) => fmt_layer(std::io::stderr, json, true),
        (None, Mode::Tui) => return Ok(()),
    };

    tracing_subscriber::registry()
        .with(layer)
        .try_init()
        .context("installing tracing subscriber")
}

fn fmt_layer<W>(writer: W, json: bool, ansi: bool) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = tracing_subscriber::fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi);
    if json {
        layer.json().with_filter(env_filter()).boxed()
    } else {
        layer.with_filter(env_filter()).boxed()
    }
}

/// First valid directive among `GITSCOPE_LOG` and `RUST_LOG`, else `warn`.
fn env_filter() -> EnvFilter {
    ["GITSCOPE_LOG", "RUST_LOG"]
        .into_iter()
        .find_map(|var| EnvFilter::try_from_env(var).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

fn wants_json(format: Option<&str>) -> bool {
    format.is_some_and(|f| f.trim().eq_ignore_ascii_case("json"))
}
