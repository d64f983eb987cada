//! In-memory engine that records every surface call.
//!
//! Used by tests (here and in the root crate) to observe what the
//! controller asks of an engine without a terminal. The call log and the
//! live-listener count are shared between the engine and every surface it
//! creates, so a test can check that listeners never pile up across
//! remounts.

use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};
use std::rc::Rc;

use gitscope_graph::NodeId;
use gitscope_graph::contract::RenderOptions;
use gitscope_graph::model::Graph;

use crate::engine::{EventKind, NodePatch, RenderEngine, RenderError, RenderSurface};

/// One recorded call.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceCall {
    Render { nodes: usize, edges: usize },
    On(EventKind),
    Detach,
    Fit { animate: bool },
    UpdateNode { id: NodeId, label: Option<String> },
    MoveTo(f64),
}

#[derive(Debug, Default)]
pub struct Recorder {
    pub calls: Vec<SurfaceCall>,
    /// Listeners attached across all surfaces and not yet detached.
    pub live_listeners: usize,
}

/// Shared handle to a [`Recorder`].
pub type RecorderHandle = Rc<RefCell<Recorder>>;

#[derive(Debug)]
pub struct RecordingEngine {
    recorder: RecorderHandle,
    fail: bool,
}

impl RecordingEngine {
    pub fn new() -> (Self, RecorderHandle) {
        let recorder = RecorderHandle::default();
        (
            Self {
                recorder: Rc::clone(&recorder),
                fail: false,
            },
            recorder,
        )
    }

    /// An engine whose `render` always fails.
    pub fn failing() -> (Self, RecorderHandle) {
        let (mut engine, recorder) = Self::new();
        engine.fail = true;
        (engine, recorder)
    }
}

impl RenderEngine for RecordingEngine {
    type Surface = RecordingSurface;

    fn render(
        &mut self,
        graph: &Graph,
        options: &RenderOptions,
    ) -> Result<Self::Surface, RenderError> {
        if self.fail {
            return Err(RenderError::TargetUnavailable("recording engine set to fail".into()));
        }
        if options.physics || options.layout.hierarchical {
            return Err(RenderError::Backend {
                message: "positions are fixed; physics and hierarchy must be off".into(),
            });
        }
        self.recorder.borrow_mut().calls.push(SurfaceCall::Render {
            nodes: graph.nodes.len(),
            edges: graph.resolved_edges().count(),
        });
        Ok(RecordingSurface {
            recorder: Rc::clone(&self.recorder),
            listeners: BTreeSet::new(),
            labels: graph
                .nodes
                .iter()
                .map(|n| (n.id.clone(), n.label.clone()))
                .collect(),
            scale: 1.0,
        })
    }
}

#[derive(Debug)]
pub struct RecordingSurface {
    recorder: RecorderHandle,
    listeners: BTreeSet<EventKind>,
    labels: HashMap<NodeId, String>,
    scale: f64,
}

impl RecordingSurface {
    pub fn is_listening(&self, kind: EventKind) -> bool {
        self.listeners.contains(&kind)
    }

    pub fn label(&self, id: &NodeId) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }
}

impl RenderSurface for RecordingSurface {
    fn on(&mut self, kind: EventKind) {
        let mut rec = self.recorder.borrow_mut();
        rec.calls.push(SurfaceCall::On(kind));
        if self.listeners.insert(kind) {
            rec.live_listeners += 1;
        }
    }

    fn detach(&mut self) {
        let mut rec = self.recorder.borrow_mut();
        rec.calls.push(SurfaceCall::Detach);
        rec.live_listeners -= self.listeners.len();
        self.listeners.clear();
    }

    fn fit(&mut self, animate: bool) {
        self.recorder
            .borrow_mut()
            .calls
            .push(SurfaceCall::Fit { animate });
    }

    fn update_node(&mut self, id: &NodeId, patch: NodePatch) {
        if let (Some(label), Some(slot)) = (&patch.label, self.labels.get_mut(id)) {
            slot.clone_from(label);
        }
        self.recorder.borrow_mut().calls.push(SurfaceCall::UpdateNode {
            id: id.clone(),
            label: patch.label,
        });
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn move_to(&mut self, scale: f64) {
        self.scale = scale;
        self.recorder.borrow_mut().calls.push(SurfaceCall::MoveTo(scale));
    }
}
