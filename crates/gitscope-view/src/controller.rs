//! Viewport controller.
//!
//! Owns at most one mounted graph. A new snapshot reference tears the old
//! mount down completely (listeners detached, surface dropped) before the
//! replacement is built and mounted; an empty snapshot leaves the
//! controller unmounted. Hover and pinch state live inside the mount, so a
//! remount always starts clean.

use std::sync::Arc;
use std::time::Duration;

use gitscope_graph::contract::RenderOptions;
use gitscope_graph::model::Graph;
use gitscope_graph::{BuildOptions, NodeId, Snapshot, build};
use tracing::instrument;

use crate::engine::{EventKind, NodePatch, RenderEngine, RenderSurface, SurfaceEvent, TouchPoint};

/// Characters of tooltip text shown as a hover label.
pub const LABEL_EXCERPT_CHARS: usize = 25;

/// Interaction settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewSettings {
    pub build: BuildOptions,
    pub label_excerpt_chars: usize,
    /// Max gap between two clicks of a double click.
    pub double_click: Duration,
    /// Zoom factor per wheel notch or zoom key.
    pub zoom_step: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            build: BuildOptions::default(),
            label_excerpt_chars: LABEL_EXCERPT_CHARS,
            double_click: Duration::from_millis(400),
            zoom_step: 1.1,
        }
    }
}

/// Hover label for a node: the first `chars` characters of its tooltip
/// text followed by an ellipsis. Line breaks become spaces so the label
/// fits on one row.
pub fn hover_excerpt(text: &str, chars: usize) -> String {
    let head: String = text
        .trim()
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .take(chars)
        .collect();
    format!("{head}...")
}

// ---------------------------------------------------------------------------
// Pinch gesture
// ---------------------------------------------------------------------------

/// Two-finger pinch tracking for one mount.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pinch {
    last_distance: Option<f64>,
}

impl Pinch {
    /// Feed a touch-move. Returns the zoom factor to apply, if any.
    ///
    /// Needs at least two contacts. The factor is the ratio of the current
    /// to the previous contact distance; a missing, zero or non-finite
    /// previous distance yields no factor.
    pub fn on_move(&mut self, points: &[TouchPoint]) -> Option<f64> {
        let [a, b, ..] = points else {
            return None;
        };
        let distance = a.distance(*b);
        let factor = self
            .last_distance
            .filter(|prev| prev.is_finite() && *prev > 0.0)
            .map(|prev| distance / prev)
            .filter(|f| f.is_finite() && *f > 0.0);
        self.last_distance = distance.is_finite().then_some(distance);
        factor
    }

    /// Feed a touch-end with `active` contacts remaining.
    pub const fn on_end(&mut self, active: usize) {
        if active < 2 {
            self.last_distance = None;
        }
    }

    pub const fn last_distance(&self) -> Option<f64> {
        self.last_distance
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

struct Mount<S> {
    graph: Graph,
    surface: S,
    hovered: Option<NodeId>,
    pinch: Pinch,
}

/// Mounts graphs on a [`RenderEngine`] and interprets surface events.
pub struct Controller<E: RenderEngine> {
    engine: E,
    settings: ViewSettings,
    options: RenderOptions,
    snapshot: Option<Arc<Snapshot>>,
    mount: Option<Mount<E::Surface>>,
    mounts: u64,
}

impl<E: RenderEngine> Controller<E> {
    pub fn new(engine: E, settings: ViewSettings) -> Self {
        Self {
            engine,
            settings,
            options: RenderOptions::default(),
            snapshot: None,
            mount: None,
            mounts: 0,
        }
    }

    pub const fn settings(&self) -> &ViewSettings {
        &self.settings
    }

    pub const fn is_mounted(&self) -> bool {
        self.mount.is_some()
    }

    /// Number of mounts performed so far.
    pub const fn mount_count(&self) -> u64 {
        self.mounts
    }

    pub const fn snapshot(&self) -> Option<&Arc<Snapshot>> {
        self.snapshot.as_ref()
    }

    pub fn graph(&self) -> Option<&Graph> {
        self.mount.as_ref().map(|m| &m.graph)
    }

    pub fn surface(&self) -> Option<&E::Surface> {
        self.mount.as_ref().map(|m| &m.surface)
    }

    pub fn surface_mut(&mut self) -> Option<&mut E::Surface> {
        self.mount.as_mut().map(|m| &mut m.surface)
    }

    /// Node currently showing a hover label.
    pub fn hovered(&self) -> Option<&NodeId> {
        self.mount.as_ref().and_then(|m| m.hovered.as_ref())
    }

    pub fn pinch(&self) -> Option<&Pinch> {
        self.mount.as_ref().map(|m| &m.pinch)
    }

    pub const fn engine(&self) -> &E {
        &self.engine
    }

    /// Bring the controller in line with `snapshot`.
    ///
    /// The same `Arc` as last time is a no-op. Anything else unmounts the
    /// current graph and, for a non-empty snapshot, builds and mounts a new
    /// one. Returns `true` when the mounted state changed.
    pub fn sync(&mut self, snapshot: Option<Arc<Snapshot>>) -> bool {
        let unchanged = match (&self.snapshot, &snapshot) {
            (None, None) => true,
            (Some(current), Some(next)) => Arc::ptr_eq(current, next),
            _ => false,
        };
        if unchanged {
            return false;
        }

        let was_mounted = self.unmount();
        self.snapshot.clone_from(&snapshot);

        match snapshot {
            Some(snap) if !snap.is_empty() => self.mount(&snap) || was_mounted,
            _ => {
                tracing::debug!("no repository data, nothing mounted");
                was_mounted
            }
        }
    }

    #[instrument(skip_all, fields(branches = snapshot.branches().len()))]
    fn mount(&mut self, snapshot: &Snapshot) -> bool {
        let graph = build(snapshot.branches(), &self.settings.build);
        let dangling = graph.dangling_edges().count();
        if dangling > 0 {
            tracing::debug!(dangling, "graph has edges to missing nodes");
        }

        let mut surface = match self.engine.render(&graph, &self.options) {
            Ok(surface) => surface,
            Err(e) => {
                tracing::warn!(error = %e, "render failed, graph not mounted");
                return false;
            }
        };
        for kind in EventKind::ALL {
            surface.on(kind);
        }

        self.mounts += 1;
        tracing::info!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            mount = self.mounts,
            "graph mounted"
        );
        self.mount = Some(Mount {
            graph,
            surface,
            hovered: None,
            pinch: Pinch::default(),
        });
        true
    }

    /// Tear down the current mount, detaching its listeners first.
    fn unmount(&mut self) -> bool {
        let Some(mut mount) = self.mount.take() else {
            return false;
        };
        mount.surface.detach();
        tracing::debug!(mount = self.mounts, "graph unmounted");
        true
    }

    /// Handle one surface event. Returns `true` if the surface was touched.
    pub fn dispatch(&mut self, event: SurfaceEvent) -> bool {
        let excerpt_chars = self.settings.label_excerpt_chars;
        let Some(mount) = self.mount.as_mut() else {
            return false;
        };

        match event {
            SurfaceEvent::HoverNode(id) => {
                let Some(node) = mount.graph.node(&id).filter(|n| !n.is_marker()) else {
                    return false;
                };
                let label = hover_excerpt(&node.title, excerpt_chars);
                if let Some(previous) = mount.hovered.replace(id.clone())
                    && previous != id
                {
                    mount.surface.update_node(&previous, NodePatch::label(""));
                }
                mount.surface.update_node(&id, NodePatch::label(label));
                true
            }
            SurfaceEvent::BlurNode(id) => {
                if id.is_marker() || !mount.graph.contains(&id) {
                    return false;
                }
                if mount.hovered.as_ref() == Some(&id) {
                    mount.hovered = None;
                }
                mount.surface.update_node(&id, NodePatch::label(""));
                true
            }
            SurfaceEvent::TouchMove(points) => {
                let Some(factor) = mount.pinch.on_move(&points) else {
                    return false;
                };
                let scale = mount.surface.scale() * factor;
                mount.surface.move_to(scale);
                true
            }
            SurfaceEvent::TouchEnd { active } => {
                mount.pinch.on_end(active);
                false
            }
            SurfaceEvent::DoubleClick { on_node: None } => {
                mount.surface.fit(true);
                true
            }
            SurfaceEvent::DoubleClick { on_node: Some(_) } => false,
        }
    }
}

impl<E: RenderEngine> Drop for Controller<E> {
    fn drop(&mut self) {
        self.unmount();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excerpt_truncates_and_appends_ellipsis() {
        let text = "Add lane placement for non-primary branches\nCommit: abc";
        assert_eq!(hover_excerpt(text, 25), "Add lane placement for no...");
        assert_eq!(hover_excerpt("  short\n", 25), "short...");
    }

    #[test]
    fn excerpt_stays_on_one_line() {
        let label = hover_excerpt("fix\nCommit: b2\r\nAuthor: ana", 25);
        assert_eq!(label, "fix Commit: b2  Author: a...");
        assert!(!label.chars().any(char::is_control));
    }

    #[test]
    fn excerpt_counts_chars_not_bytes() {
        assert_eq!(hover_excerpt("ééééé", 3), "ééé...");
    }

    #[test]
    fn pinch_needs_a_previous_distance() {
        let mut p = Pinch::default();
        let first = [TouchPoint::new(0.0, 0.0), TouchPoint::new(0.0, 100.0)];
        assert_eq!(p.on_move(&first), None);
        let spread = [TouchPoint::new(0.0, 0.0), TouchPoint::new(0.0, 150.0)];
        let factor = p.on_move(&spread).unwrap();
        assert!((factor - 1.5).abs() < 1e-9);
    }

    #[test]
    fn pinch_ignores_single_contact() {
        let mut p = Pinch::default();
        assert_eq!(p.on_move(&[TouchPoint::new(1.0, 1.0)]), None);
        assert_eq!(p.last_distance(), None);
    }

    #[test]
    fn pinch_zero_distance_is_skipped() {
        let mut p = Pinch::default();
        let same = [TouchPoint::new(5.0, 5.0), TouchPoint::new(5.0, 5.0)];
        assert_eq!(p.on_move(&same), None);
        // Previous distance was zero: still no factor, and no panic.
        let apart = [TouchPoint::new(0.0, 0.0), TouchPoint::new(10.0, 0.0)];
        assert_eq!(p.on_move(&apart), None);
        let closer = [TouchPoint::new(0.0, 0.0), TouchPoint::new(5.0, 0.0)];
        assert!((p.on_move(&closer).unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn pinch_non_finite_points_are_skipped() {
        let mut p = Pinch::default();
        let ok = [TouchPoint::new(0.0, 0.0), TouchPoint::new(10.0, 0.0)];
        p.on_move(&ok);
        let bad = [TouchPoint::new(f64::NAN, 0.0), TouchPoint::new(10.0, 0.0)];
        assert_eq!(p.on_move(&bad), None);
        assert_eq!(p.last_distance(), None);
    }

    #[test]
    fn pinch_end_resets_below_two_contacts() {
        let mut p = Pinch::default();
        p.on_move(&[TouchPoint::new(0.0, 0.0), TouchPoint::new(0.0, 10.0)]);
        p.on_end(2);
        assert_eq!(p.last_distance(), Some(10.0));
        p.on_end(1);
        assert_eq!(p.last_distance(), None);
    }
}
