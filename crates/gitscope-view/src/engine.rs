//! Rendering engine capability.
//!
//! The controller never draws anything itself. It hands a built graph to a
//! [`RenderEngine`], gets back a [`RenderSurface`] it owns for the lifetime
//! of one mount, and talks to that surface through a handful of calls:
//! attach listeners, fit, patch a node, read and set the zoom.

use gitscope_graph::NodeId;
use gitscope_graph::contract::RenderOptions;
use gitscope_graph::model::Graph;
use thiserror::Error;

/// Errors an engine may report while mounting a graph.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The engine has nowhere to draw.
    #[error("render target unavailable: {0}")]
    TargetUnavailable(String),

    /// The engine refused the graph.
    #[error("render backend error: {message}")]
    Backend {
        /// Freeform description from the engine.
        message: String,
    },
}

/// Kinds of surface events a controller can listen for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    HoverNode,
    BlurNode,
    TouchMove,
    TouchEnd,
    DoubleClick,
}

impl EventKind {
    pub const ALL: [Self; 5] = [
        Self::HoverNode,
        Self::BlurNode,
        Self::TouchMove,
        Self::TouchEnd,
        Self::DoubleClick,
    ];
}

/// A touch contact in surface coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// An event reported by a mounted surface.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceEvent {
    /// Pointer entered a node.
    HoverNode(NodeId),
    /// Pointer left a node.
    BlurNode(NodeId),
    /// Touch contacts moved; carries every active contact.
    TouchMove(Vec<TouchPoint>),
    /// A touch contact lifted; `active` contacts remain.
    TouchEnd { active: usize },
    /// Double click / double tap. `on_node` is `None` on the background.
    DoubleClick { on_node: Option<NodeId> },
}

impl SurfaceEvent {
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::HoverNode(_) => EventKind::HoverNode,
            Self::BlurNode(_) => EventKind::BlurNode,
            Self::TouchMove(_) => EventKind::TouchMove,
            Self::TouchEnd { .. } => EventKind::TouchEnd,
            Self::DoubleClick { .. } => EventKind::DoubleClick,
        }
    }
}

/// A partial node update.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodePatch {
    pub label: Option<String>,
}

impl NodePatch {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }
}

/// Something that can put a graph on screen.
pub trait RenderEngine {
    type Surface: RenderSurface;

    /// Mount `graph`. Node positions are authoritative; the engine must not
    /// re-layout (`options.physics` is always `false`).
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the engine cannot draw this graph.
    fn render(
        &mut self,
        graph: &Graph,
        options: &RenderOptions,
    ) -> Result<Self::Surface, RenderError>;
}

/// One mounted graph.
///
/// Edges whose endpoints are missing must be skipped silently rather than
/// failing the render.
pub trait RenderSurface {
    /// Start reporting events of `kind`. Attaching twice is a no-op.
    fn on(&mut self, kind: EventKind);

    /// Stop reporting all events. Called before the surface is dropped.
    fn detach(&mut self);

    /// Fit the viewport around every node.
    fn fit(&mut self, animate: bool);

    fn update_node(&mut self, id: &NodeId, patch: NodePatch);

    /// Current zoom factor.
    fn scale(&self) -> f64;

    /// Zoom to `scale`, keeping the current center.
    fn move_to(&mut self, scale: f64);
}
