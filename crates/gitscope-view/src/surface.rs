//! Terminal render engine.
//!
//! [`TerminalEngine`] mounts a graph as a [`CanvasSurface`]: a copy of the
//! nodes and resolvable edges plus a [`Viewport`]. The surface owns the
//! standard navigation (drag to pan, wheel to zoom, arrow keys, on-screen
//! buttons) and turns raw pointer input into [`SurfaceEvent`]s for the
//! controller, but only for event kinds someone is listening to.

use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use gitscope_graph::NodeId;
use gitscope_graph::contract::RenderOptions;
use gitscope_graph::model::{Edge, Graph, Node};
use ratatui::layout::{Position, Rect};

use crate::engine::{EventKind, NodePatch, RenderEngine, RenderError, RenderSurface, SurfaceEvent};
use crate::viewport::{FIT_ANIMATION, Transition, Viewport};

/// Cells panned per arrow key or nav button press.
const PAN_COLS: i32 = 6;
const PAN_ROWS: i32 = 3;

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug)]
pub struct TerminalEngine {
    double_click: Duration,
    zoom_step: f64,
}

impl TerminalEngine {
    pub const fn new(double_click: Duration, zoom_step: f64) -> Self {
        Self {
            double_click,
            zoom_step,
        }
    }
}

impl RenderEngine for TerminalEngine {
    type Surface = CanvasSurface;

    fn render(
        &mut self,
        graph: &Graph,
        options: &RenderOptions,
    ) -> Result<Self::Surface, RenderError> {
        if options.physics || options.layout.hierarchical {
            return Err(RenderError::Backend {
                message: "terminal engine only draws fixed positions".into(),
            });
        }
        Ok(CanvasSurface::new(graph, self.double_click, self.zoom_step))
    }
}

// ---------------------------------------------------------------------------
// Navigation buttons
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavButton {
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    ZoomIn,
    ZoomOut,
    Fit,
}

impl NavButton {
    pub const ALL: [Self; 7] = [
        Self::PanLeft,
        Self::PanRight,
        Self::PanUp,
        Self::PanDown,
        Self::ZoomIn,
        Self::ZoomOut,
        Self::Fit,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::PanLeft => " ← ",
            Self::PanRight => " → ",
            Self::PanUp => " ↑ ",
            Self::PanDown => " ↓ ",
            Self::ZoomIn => " + ",
            Self::ZoomOut => " - ",
            Self::Fit => " fit ",
        }
    }
}

// ---------------------------------------------------------------------------
// Surface
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
struct Pointer {
    hovered: Option<NodeId>,
    drag_from: Option<(u16, u16)>,
    last_click: Option<(Instant, (u16, u16))>,
}

/// One graph mounted on the terminal.
#[derive(Debug)]
pub struct CanvasSurface {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index: HashMap<NodeId, usize>,
    viewport: Viewport,
    transition: Option<Transition>,
    /// Fit requested before the canvas size was known.
    pending_fit: bool,
    listeners: BTreeSet<EventKind>,
    canvas: Rect,
    nav: Vec<(NavButton, Rect)>,
    pointer: Pointer,
    double_click: Duration,
    zoom_step: f64,
}

impl CanvasSurface {
    pub fn new(graph: &Graph, double_click: Duration, zoom_step: f64) -> Self {
        let nodes = graph.nodes.clone();
        let edges: Vec<Edge> = graph.resolved_edges().cloned().collect();
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        Self {
            nodes,
            edges,
            index,
            viewport: Viewport::default(),
            transition: None,
            pending_fit: true,
            listeners: BTreeSet::new(),
            canvas: Rect::default(),
            nav: Vec::new(),
            pointer: Pointer::default(),
            double_click,
            zoom_step,
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub const fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    pub const fn hovered(&self) -> Option<&NodeId> {
        self.pointer.hovered.as_ref()
    }

    pub fn is_listening(&self, kind: EventKind) -> bool {
        self.listeners.contains(&kind)
    }

    /// Record where the canvas (inside its border) was drawn this frame.
    pub fn set_canvas_area(&mut self, area: Rect) {
        self.canvas = area;
        if self.pending_fit && area.width > 0 && area.height > 0 {
            self.pending_fit = false;
            if let Some(target) = self.fit_target() {
                self.viewport = target;
            }
        }
    }

    pub fn set_nav_layout(&mut self, nav: Vec<(NavButton, Rect)>) {
        self.nav = nav;
    }

    /// Advance an animated fit.
    pub fn tick(&mut self, now: Instant) {
        if let Some(tr) = self.transition {
            let (vp, done) = tr.at(now);
            self.viewport = vp;
            if done {
                self.transition = None;
            }
        }
    }

    fn fit_target(&self) -> Option<Viewport> {
        let bounds = Graph::bounds_of(&self.nodes)?;
        Some(Viewport::fitted(bounds, self.canvas.width, self.canvas.height))
    }

    fn fit_at(&mut self, animate: bool, now: Instant) {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            self.pending_fit = true;
            return;
        }
        let Some(target) = self.fit_target() else {
            return;
        };
        if animate {
            self.transition = Some(Transition::new(self.viewport, target, now, FIT_ANIMATION));
        } else {
            self.transition = None;
            self.viewport = target;
        }
    }

    // -- navigation -------------------------------------------------------

    fn interrupt(&mut self) {
        self.transition = None;
        self.pending_fit = false;
    }

    pub fn press(&mut self, button: NavButton) {
        match button {
            NavButton::PanLeft => self.pan(PAN_COLS, 0),
            NavButton::PanRight => self.pan(-PAN_COLS, 0),
            NavButton::PanUp => self.pan(0, PAN_ROWS),
            NavButton::PanDown => self.pan(0, -PAN_ROWS),
            NavButton::ZoomIn => self.zoom(self.zoom_step),
            NavButton::ZoomOut => self.zoom(1.0 / self.zoom_step),
            NavButton::Fit => self.fit(true),
        }
    }

    fn pan(&mut self, cols: i32, rows: i32) {
        self.interrupt();
        self.viewport.pan_cells(cols, rows);
    }

    fn zoom(&mut self, factor: f64) {
        self.interrupt();
        self.viewport.zoom_by(factor);
    }

    /// Keyboard navigation. Returns `true` if the key was used.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let button = match code {
            KeyCode::Left | KeyCode::Char('h') => NavButton::PanLeft,
            KeyCode::Right | KeyCode::Char('l') => NavButton::PanRight,
            KeyCode::Up | KeyCode::Char('k') => NavButton::PanUp,
            KeyCode::Down | KeyCode::Char('j') => NavButton::PanDown,
            KeyCode::Char('+' | '=') => NavButton::ZoomIn,
            KeyCode::Char('-' | '_') => NavButton::ZoomOut,
            KeyCode::Char('f' | '0') => NavButton::Fit,
            _ => return false,
        };
        self.press(button);
        true
    }

    // -- pointer ----------------------------------------------------------

    /// Node under cell `(col, row)`, nearest first.
    #[allow(clippy::cast_precision_loss)]
    pub fn node_at(&self, col: u16, row: u16) -> Option<&NodeId> {
        if !self.canvas.contains(Position::new(col, row)) {
            return None;
        }
        let (pc, pr) = (
            f64::from(col - self.canvas.x),
            f64::from(row - self.canvas.y),
        );
        let (w, h) = (self.canvas.width, self.canvas.height);

        self.nodes
            .iter()
            .filter_map(|n| {
                let (nc, nr) = self.viewport.to_cell(w, h, n.x, n.y);
                let dr = (pr - nr).abs();
                let dc = if n.is_marker() {
                    // Marker labels are printed starting at the node.
                    let len = n.label.chars().count().max(1) as f64;
                    if pc >= nc - 0.5 && pc <= nc + len {
                        0.0
                    } else {
                        (pc - nc).abs()
                    }
                } else {
                    (pc - nc).abs()
                };
                (dc <= 1.5 && dr <= 0.75).then_some((dc + dr, &n.id))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, id)| id)
    }

    fn emit(&self, out: &mut Vec<SurfaceEvent>, event: SurfaceEvent) {
        if self.listeners.contains(&event.kind()) {
            out.push(event);
        }
    }

    fn update_hover(&mut self, col: u16, row: u16, out: &mut Vec<SurfaceEvent>) {
        let under = self.node_at(col, row).cloned();
        if under == self.pointer.hovered {
            return;
        }
        if let Some(previous) = self.pointer.hovered.take() {
            self.emit(out, SurfaceEvent::BlurNode(previous));
        }
        if let Some(id) = under {
            self.pointer.hovered = Some(id.clone());
            self.emit(out, SurfaceEvent::HoverNode(id));
        }
    }

    /// Interpret a mouse event at time `now`. Navigation is applied
    /// directly; interaction events are returned for the controller.
    pub fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) -> Vec<SurfaceEvent> {
        let (col, row) = (mouse.column, mouse.row);
        let mut out = Vec::new();

        match mouse.kind {
            MouseEventKind::Moved => self.update_hover(col, row, &mut out),
            MouseEventKind::Down(MouseButton::Left) => {
                let pos = Position::new(col, row);
                if let Some(&(button, _)) = self.nav.iter().find(|(_, r)| r.contains(pos)) {
                    self.press(button);
                    return out;
                }
                if !self.canvas.contains(pos) {
                    return out;
                }
                let repeat = self.pointer.last_click.is_some_and(|(at, (c, r))| {
                    now.saturating_duration_since(at) <= self.double_click
                        && c.abs_diff(col) <= 1
                        && r.abs_diff(row) <= 1
                });
                if repeat {
                    self.pointer.last_click = None;
                    let on_node = self.node_at(col, row).cloned();
                    self.emit(&mut out, SurfaceEvent::DoubleClick { on_node });
                } else {
                    self.pointer.last_click = Some((now, (col, row)));
                }
                self.pointer.drag_from = Some((col, row));
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((c, r)) = self.pointer.drag_from {
                    let dc = i32::from(col) - i32::from(c);
                    let dr = i32::from(row) - i32::from(r);
                    if dc != 0 || dr != 0 {
                        self.pan(dc, dr);
                        self.pointer.drag_from = Some((col, row));
                        self.pointer.last_click = None;
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.pointer.drag_from = None,
            MouseEventKind::ScrollUp => {
                if self.canvas.contains(Position::new(col, row)) {
                    self.zoom(self.zoom_step);
                }
            }
            MouseEventKind::ScrollDown => {
                if self.canvas.contains(Position::new(col, row)) {
                    self.zoom(1.0 / self.zoom_step);
                }
            }
            _ => {}
        }
        out
    }
}

impl RenderSurface for CanvasSurface {
    fn on(&mut self, kind: EventKind) {
        self.listeners.insert(kind);
    }

    fn detach(&mut self) {
        self.listeners.clear();
    }

    fn fit(&mut self, animate: bool) {
        self.fit_at(animate, Instant::now());
    }

    fn update_node(&mut self, id: &NodeId, patch: NodePatch) {
        let Some(&i) = self.index.get(id) else {
            return;
        };
        if let Some(label) = patch.label {
            self.nodes[i].label = label;
        }
    }

    fn scale(&self) -> f64 {
        self.viewport.scale
    }

    fn move_to(&mut self, scale: f64) {
        self.interrupt();
        self.viewport.set_scale(scale);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
