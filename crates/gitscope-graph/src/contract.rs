//! Renderer data contract.
//!
//! The flat node/edge/options records a rendering engine consumes. Field
//! names follow the vis-network conventions (`from`/`to`, `title`,
//! `dashes`, `arrows`) so the JSON can be handed to such an engine as is.
//! Only resolvable edges are exported.

use std::collections::HashSet;

use serde::Serialize;

use crate::model::{Dashes, Edge, Graph, Node, Shape};

/// Size of commit dots.
pub const COMMIT_DOT_SIZE: u32 = 14;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeRecord {
    pub id: String,
    pub label: String,
    pub title: String,
    pub color: String,
    pub x: f64,
    pub y: f64,
    pub shape: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id.to_string(),
            label: node.label.clone(),
            title: node.title.clone(),
            color: node.color.to_string(),
            x: node.x,
            y: node.y,
            shape: node.shape.as_str(),
            size: (node.shape == Shape::Dot).then_some(COMMIT_DOT_SIZE),
        }
    }
}

/// `dashes` as vis-network spells it: a bool or a `[dash, gap]` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DashesRecord {
    Flag(bool),
    Pattern([u8; 2]),
}

impl From<Dashes> for DashesRecord {
    fn from(d: Dashes) -> Self {
        match d {
            Dashes::Solid => Self::Flag(false),
            Dashes::Dashed => Self::Flag(true),
            Dashes::Pattern(dash, gap) => Self::Pattern([dash, gap]),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EdgeRecord {
    pub from: String,
    pub to: String,
    pub color: String,
    pub dashes: DashesRecord,
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrows: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl From<&Edge> for EdgeRecord {
    fn from(edge: &Edge) -> Self {
        Self {
            from: edge.from.to_string(),
            to: edge.to.to_string(),
            color: edge.color.to_string(),
            dashes: edge.dashes.into(),
            width: edge.width,
            arrows: edge.arrow.then_some("to"),
            title: edge.title.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Render options
// ---------------------------------------------------------------------------

/// Engine options. Node positions are authoritative, so physics and
/// hierarchical layout are always off.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RenderOptions {
    pub physics: bool,
    pub layout: LayoutOptions,
    pub interaction: InteractionOptions,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LayoutOptions {
    pub hierarchical: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct InteractionOptions {
    pub hover: bool,
    pub tooltip_delay: u32,
    pub drag_view: bool,
    pub drag_nodes: bool,
    pub zoom_view: bool,
    pub navigation_buttons: bool,
    pub keyboard: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            physics: false,
            layout: LayoutOptions {
                hierarchical: false,
            },
            interaction: InteractionOptions {
                hover: true,
                tooltip_delay: 50,
                drag_view: true,
                drag_nodes: true,
                zoom_view: true,
                navigation_buttons: true,
                keyboard: true,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// Everything an engine needs for one render.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderDocument {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
    pub options: RenderOptions,
}

impl RenderDocument {
    /// Flatten `graph`. Distinct typed ids can print the same (branch
    /// `branch` commit `x` and the marker of branch `x` are both
    /// `branch-x`); such collisions are logged, since engines keyed by id
    /// will drop or reject one of the nodes.
    pub fn new(graph: &Graph, options: RenderOptions) -> Self {
        let doc = Self {
            nodes: graph.nodes.iter().map(NodeRecord::from).collect(),
            edges: graph.resolved_edges().map(EdgeRecord::from).collect(),
            options,
        };
        for id in doc.duplicate_ids() {
            tracing::warn!(id, "node id is not unique in the exported document");
        }
        doc
    }

    /// Node ids that occur more than once, in first-repeat order.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut repeated = Vec::new();
        for node in &self.nodes {
            let id = node.id.as_str();
            if !seen.insert(id) && !repeated.contains(&id) {
                repeated.push(id);
            }
        }
        repeated
    }
}
