//! Viewport math for the terminal canvas.
//!
//! A viewport is a center point in graph units plus a zoom factor. At
//! scale 1.0 one terminal column spans [`UNITS_PER_COLUMN`] graph units and
//! one row spans [`UNITS_PER_ROW`] (cells are roughly twice as tall as they
//! are wide). Graph `y` grows upward on screen.

use std::time::{Duration, Instant};

use gitscope_graph::model::Bounds;

pub const MIN_SCALE: f64 = 0.05;
pub const MAX_SCALE: f64 = 20.0;
pub const UNITS_PER_COLUMN: f64 = 12.0;
pub const UNITS_PER_ROW: f64 = 24.0;

/// Margin kept around the graph when fitting, in graph units.
pub const FIT_PADDING: f64 = 60.0;

/// How long an animated fit takes.
pub const FIT_ANIMATION: Duration = Duration::from_millis(250);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub center_x: f64,
    pub center_y: f64,
    pub scale: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center_x: 0.0,
            center_y: 0.0,
            scale: 1.0,
        }
    }
}

pub fn clamp_scale(scale: f64) -> f64 {
    if scale.is_finite() {
        scale.clamp(MIN_SCALE, MAX_SCALE)
    } else {
        1.0
    }
}

impl Viewport {
    /// Visible `[min, max]` x range for a canvas `cols` wide.
    pub fn x_bounds(&self, cols: u16) -> [f64; 2] {
        let half = f64::from(cols) * UNITS_PER_COLUMN / self.scale / 2.0;
        [self.center_x - half, self.center_x + half]
    }

    /// Visible `[min, max]` y range for a canvas `rows` tall.
    pub fn y_bounds(&self, rows: u16) -> [f64; 2] {
        let half = f64::from(rows) * UNITS_PER_ROW / self.scale / 2.0;
        [self.center_y - half, self.center_y + half]
    }

    /// Visible graph area of a `cols` × `rows` canvas.
    pub fn visible(&self, cols: u16, rows: u16) -> Bounds {
        let [min_x, max_x] = self.x_bounds(cols);
        let [min_y, max_y] = self.y_bounds(rows);
        Bounds {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn zoom_by(&mut self, factor: f64) {
        self.scale = clamp_scale(self.scale * factor);
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.scale = clamp_scale(scale);
    }

    /// Move the content by whole cells (positive `cols` moves it right,
    /// positive `rows` moves it down).
    pub fn pan_cells(&mut self, cols: i32, rows: i32) {
        self.center_x -= f64::from(cols) * UNITS_PER_COLUMN / self.scale;
        self.center_y += f64::from(rows) * UNITS_PER_ROW / self.scale;
    }

    /// Graph coordinates at the center of cell `(col, row)` of a canvas
    /// `cols` × `rows` cells.
    pub fn to_graph(&self, cols: u16, rows: u16, col: u16, row: u16) -> (f64, f64) {
        let [x0, x1] = self.x_bounds(cols);
        let [y0, y1] = self.y_bounds(rows);
        let fx = (f64::from(col) + 0.5) / f64::from(cols.max(1));
        let fy = (f64::from(row) + 0.5) / f64::from(rows.max(1));
        (x0 + fx * (x1 - x0), y1 - fy * (y1 - y0))
    }

    /// Fractional cell position of graph point `(x, y)`.
    pub fn to_cell(&self, cols: u16, rows: u16, x: f64, y: f64) -> (f64, f64) {
        let [x0, x1] = self.x_bounds(cols);
        let [y0, y1] = self.y_bounds(rows);
        let col = (x - x0) / (x1 - x0) * f64::from(cols) - 0.5;
        let row = (y1 - y) / (y1 - y0) * f64::from(rows) - 0.5;
        (col, row)
    }

    /// Viewport that shows all of `bounds` on a `cols` × `rows` canvas.
    pub fn fitted(bounds: Bounds, cols: u16, rows: u16) -> Self {
        let (center_x, center_y) = bounds.center();
        if cols == 0 || rows == 0 {
            return Self {
                center_x,
                center_y,
                scale: 1.0,
            };
        }
        let width = bounds.width() + 2.0 * FIT_PADDING;
        let height = bounds.height() + 2.0 * FIT_PADDING;
        let sx = f64::from(cols) * UNITS_PER_COLUMN / width;
        let sy = f64::from(rows) * UNITS_PER_ROW / height;
        Self {
            center_x,
            center_y,
            scale: clamp_scale(sx.min(sy)),
        }
    }

    /// Linear blend between two viewports, `t` in `[0, 1]`.
    pub fn lerp(self, to: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        Self {
            center_x: (to.center_x - self.center_x).mul_add(t, self.center_x),
            center_y: (to.center_y - self.center_y).mul_add(t, self.center_y),
            scale: (to.scale - self.scale).mul_add(t, self.scale),
        }
    }
}

// ---------------------------------------------------------------------------
// Animated transition
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    from: Viewport,
    to: Viewport,
    started: Instant,
    duration: Duration,
}

impl Transition {
    pub const fn new(from: Viewport, to: Viewport, started: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration,
        }
    }

    pub const fn target(&self) -> Viewport {
        self.to
    }

    /// Viewport at `now` (ease-out) and whether the transition is over.
    pub fn at(&self, now: Instant) -> (Viewport, bool) {
        let elapsed = now.saturating_duration_since(self.started);
        if self.duration.is_zero() || elapsed >= self.duration {
            return (self.to, true);
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        (self.from.lerp(self.to, eased), false)
    }
}

// ---------------------------------------------------------------------------
// Dashes
// ---------------------------------------------------------------------------

/// Upper bound on dashes drawn for one edge; longer visible runs are drawn
/// solid.
pub const MAX_DASHES: u32 = 2048;

/// Parameter range `[t0, t1]` of the segment `a → b` that lies inside
/// `window` (Liang-Barsky), or `None` if it misses the window entirely.
pub fn clip_range(a: (f64, f64), b: (f64, f64), window: Bounds) -> Option<(f64, f64)> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;
    for (p, q) in [
        (-dx, a.0 - window.min_x),
        (dx, window.max_x - a.0),
        (-dy, a.1 - window.min_y),
        (dy, window.max_y - a.1),
    ] {
        if p.abs() <= f64::EPSILON {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((t0, t1))
}

/// Split the part of segment `(x1, y1) → (x2, y2)` visible in `window` into
/// dashes of length `dash` separated by `gap` (same units as the
/// coordinates). Dash phase is anchored at `(x1, y1)` whatever the window.
pub fn dash_segments(
    (x1, y1): (f64, f64),
    (x2, y2): (f64, f64),
    dash: f64,
    gap: f64,
    window: Bounds,
) -> Vec<((f64, f64), (f64, f64))> {
    let length = (x2 - x1).hypot(y2 - y1);
    if length <= f64::EPSILON || dash <= 0.0 || gap < 0.0 || !length.is_finite() {
        return vec![((x1, y1), (x2, y2))];
    }
    let Some((t0, t1)) = clip_range((x1, y1), (x2, y2), window) else {
        return Vec::new();
    };
    let (ux, uy) = ((x2 - x1) / length, (y2 - y1) / length);
    let at = |s: f64| (ux.mul_add(s, x1), uy.mul_add(s, y1));
    let (from, to) = (t0 * length, t1 * length);

    let period = dash + gap;
    let mut start = (from / period).floor() * period;
    if (to - start) / period > f64::from(MAX_DASHES) {
        return vec![(at(from), at(to))];
    }

    let mut out = Vec::new();
    while start < to {
        let (s, e) = (start.max(from), (start + dash).min(to));
        if e > s {
            out.push((at(s), at(e)));
        }
        let next = start + period;
        if next <= start {
            break;
        }
        start = next;
    }
    out
}
