//! Viewer configuration (`gitscope.toml`).
//!
//! Every field has a default, and a missing file means all defaults. Unknown
//! keys are rejected so that typos surface instead of being ignored.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gitscope_graph::{BuildOptions, Layout, Palette, Rgb};
use gitscope_view::ViewSettings;
use serde::Deserialize;

/// Looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "gitscope.toml";

/// Largest accepted `lane_height` / `commit_spacing`, in graph units.
pub const MAX_LAYOUT_SPACING: f64 = 100_000.0;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GitscopeConfig {
    /// Lane and commit spacing.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Branch and merge colors.
    #[serde(default)]
    pub palette: PaletteConfig,

    /// Interaction tuning for the viewer.
    #[serde(default)]
    pub view: ViewConfig,
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct LayoutConfig {
    /// Vertical distance between neighbouring lanes.
    pub lane_height: f64,
    /// Horizontal distance between commits on a lane.
    pub commit_spacing: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let layout = Layout::default();
        Self {
            lane_height: layout.lane_height,
            commit_spacing: layout.commit_spacing,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct PaletteConfig {
    pub main: Rgb,
    pub dev: Rgb,
    pub feature: Rgb,
    pub bugfix: Rgb,
    pub other: Rgb,
    /// Color of merge edges.
    pub merge: Rgb,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self::from(Palette::default())
    }
}

impl From<Palette> for PaletteConfig {
    fn from(p: Palette) -> Self {
        Self {
            main: p.main,
            dev: p.dev,
            feature: p.feature,
            bugfix: p.bugfix,
            other: p.other,
            merge: p.merge,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ViewConfig {
    /// Characters of commit text shown while hovering.
    pub label_excerpt_chars: usize,
    /// Max milliseconds between the clicks of a double click.
    pub double_click_ms: u64,
    /// Zoom factor per wheel notch or `+`/`-` press.
    pub zoom_step: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        let settings = ViewSettings::default();
        Self {
            label_excerpt_chars: settings.label_excerpt_chars,
            double_click_ms: u64::try_from(settings.double_click.as_millis()).unwrap_or(400),
            zoom_step: settings.zoom_step,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A config file that could not be read, parsed or validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The path that was being loaded (if available).
    pub path: Option<PathBuf>,
    /// Human-readable message with line-level detail when possible.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(p) = &self.path {
            write!(f, "{}: {}", p.display(), self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl GitscopeConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields all defaults.
    ///
    /// # Errors
    /// Returns `ConfigError` on I/O errors (other than not-found), parse
    /// errors or out-of-range values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError {
                    path: Some(path.to_owned()),
                    message: format!("could not read file: {e}"),
                });
            }
        };
        Self::parse(&contents).map_err(|mut e| {
            e.path = Some(path.to_owned());
            e
        })
    }

    /// Parse and validate configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `ConfigError` on invalid TOML, unknown fields, bad colors or
    /// out-of-range values.
    pub fn parse(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| {
            let mut message = e.message().to_owned();
            if let Some(span) = e.span() {
                let line = toml_str[..span.start]
                    .chars()
                    .filter(|&c| c == '\n')
                    .count()
                    + 1;
                message = format!("line {line}: {message}");
            }
            ConfigError {
                path: None,
                message,
            }
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError {
            path: None,
            message,
        };
        for (key, value) in [
            ("layout.lane_height", self.layout.lane_height),
            ("layout.commit_spacing", self.layout.commit_spacing),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{key} must be a positive number, got {value}")));
            }
            if value > MAX_LAYOUT_SPACING {
                return Err(invalid(format!(
                    "{key} must be at most {MAX_LAYOUT_SPACING}, got {value}"
                )));
            }
        }
        if self.view.label_excerpt_chars == 0 {
            return Err(invalid("view.label_excerpt_chars must be at least 1".into()));
        }
        if !(self.view.zoom_step.is_finite() && self.view.zoom_step > 1.0) {
            return Err(invalid(format!(
                "view.zoom_step must be greater than 1, got {}",
                self.view.zoom_step
            )));
        }
        Ok(())
    }

    pub fn build_options(&self) -> BuildOptions {
        let p = self.palette;
        BuildOptions {
            layout: Layout {
                lane_height: self.layout.lane_height,
                commit_spacing: self.layout.commit_spacing,
            },
            palette: Palette {
                main: p.main,
                dev: p.dev,
                feature: p.feature,
                bugfix: p.bugfix,
                other: p.other,
                merge: p.merge,
            },
        }
    }

    pub fn view_settings(&self) -> ViewSettings {
        ViewSettings {
            build: self.build_options(),
            label_excerpt_chars: self.view.label_excerpt_chars,
            double_click: Duration::from_millis(self.view.double_click_ms),
            zoom_step: self.view.zoom_step,
        }
    }
}

/// Load `path`, or [`DEFAULT_CONFIG_FILE`] when no path was given.
///
/// # Errors
/// See [`GitscopeConfig::load`].
pub fn load_or_default(path: Option<&Path>) -> Result<GitscopeConfig, ConfigError> {
    GitscopeConfig::load(path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE)))
}
