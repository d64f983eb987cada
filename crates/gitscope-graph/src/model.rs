//! Graph model: positioned nodes and styled edges.
//!
//! The model is rebuilt wholesale for every snapshot. Nothing here is
//! mutated incrementally except node labels, which a render surface owns
//! its own copy of.

use std::collections::HashMap;
use std::fmt;

use crate::color::Rgb;

// ---------------------------------------------------------------------------
// NodeId
// ---------------------------------------------------------------------------

/// Node identity.
///
/// Commit nodes are keyed by `(branch, hash)`, so a commit shared by two
/// branches yields two nodes, one per lane.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Commit { branch: String, hash: String },
    Marker { branch: String },
}

impl NodeId {
    pub fn commit(branch: impl Into<String>, hash: impl Into<String>) -> Self {
        Self::Commit {
            branch: branch.into(),
            hash: hash.into(),
        }
    }

    pub fn marker(branch: impl Into<String>) -> Self {
        Self::Marker {
            branch: branch.into(),
        }
    }

    pub fn branch(&self) -> &str {
        match self {
            Self::Commit { branch, .. } | Self::Marker { branch } => branch,
        }
    }

    pub const fn is_marker(&self) -> bool {
        matches!(self, Self::Marker { .. })
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Commit { branch, hash } => write!(f, "{branch}-{hash}"),
            Self::Marker { branch } => write!(f, "branch-{branch}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// Tooltip payload attached to a commit node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tooltip {
    pub message: String,
    pub hash: String,
    pub author: String,
    pub date: String,
    pub branch: String,
}

impl Tooltip {
    /// Multi-line tooltip text. The message comes first so that an excerpt
    /// of the text reads as the commit subject.
    pub fn text(&self) -> String {
        format!(
            "{}\nCommit: {}\nAuthor: {}\nDate: {}\nBranch: {}",
            self.message, self.hash, self.author, self.date, self.branch
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    Dot,
    Box,
}

impl Shape {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dot => "dot",
            Self::Box => "box",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub color: Rgb,
    pub shape: Shape,
    /// Visible label: empty for commits, the branch name for markers.
    pub label: String,
    /// Tooltip text shown on hover.
    pub title: String,
    /// `None` for branch markers.
    pub tooltip: Option<Tooltip>,
}

impl Node {
    pub const fn is_marker(&self) -> bool {
        self.id.is_marker()
    }
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    /// Commit → its parent on the same branch.
    Lineage,
    /// Branch marker → the branch's first commit.
    BranchOrigin,
    /// A later branch's copy of a shared commit → the first branch's copy.
    Merge { source: String, target: String },
}

/// Dash pattern of an edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dashes {
    Solid,
    Dashed,
    Pattern(u8, u8),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: EdgeKind,
    pub color: Rgb,
    pub dashes: Dashes,
    pub width: f64,
    /// Arrow head at `to`.
    pub arrow: bool,
    pub title: Option<String>,
}

impl Edge {
    pub fn lineage(from: NodeId, to: NodeId, color: Rgb) -> Self {
        Self {
            from,
            to,
            kind: EdgeKind::Lineage,
            color,
            dashes: Dashes::Solid,
            width: 2.0,
            arrow: false,
            title: None,
        }
    }

    pub fn branch_origin(from: NodeId, to: NodeId, color: Rgb) -> Self {
        Self {
            from,
            to,
            kind: EdgeKind::BranchOrigin,
            color,
            dashes: Dashes::Dashed,
            width: 2.0,
            arrow: false,
            title: None,
        }
    }

    pub fn merge(hash: &str, source: &str, target: &str, color: Rgb) -> Self {
        Self {
            from: NodeId::commit(source, hash),
            to: NodeId::commit(target, hash),
            kind: EdgeKind::Merge {
                source: source.to_owned(),
                target: target.to_owned(),
            },
            color,
            dashes: Dashes::Pattern(4, 4),
            width: 2.0,
            arrow: true,
            title: Some(format!("Merged {source} → {target}")),
        }
    }

    pub const fn is_merge(&self) -> bool {
        matches!(self.kind, EdgeKind::Merge { .. })
    }
}

// ---------------------------------------------------------------------------
// Graph
// ---------------------------------------------------------------------------

/// Axis-aligned bounding box in graph units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            f64::midpoint(self.min_x, self.max_x),
            f64::midpoint(self.min_y, self.max_y),
        )
    }
}

/// One branch's lane as placed by the builder.
#[derive(Clone, Debug, PartialEq)]
pub struct Lane {
    pub branch: String,
    pub y: f64,
    pub color: Rgb,
    pub is_primary: bool,
    pub commits: usize,
}

/// The built graph: nodes, edges and the lanes they were placed on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub lanes: Vec<Lane>,
    index: HashMap<NodeId, usize>,
}

impl Graph {
    pub(crate) fn from_parts(nodes: Vec<Node>, edges: Vec<Edge>, lanes: Vec<Lane>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        Self {
            nodes,
            edges,
            lanes,
            index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// Edges whose endpoints both exist.
    pub fn resolved_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(|e| self.contains(&e.from) && self.contains(&e.to))
    }

    /// Edges pointing at (or from) a node that is not in the graph, e.g. a
    /// parent hash missing from the branch's own commit list.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(|e| !self.contains(&e.from) || !self.contains(&e.to))
    }

    pub fn merge_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(|e| e.is_merge())
    }

    pub fn primary(&self) -> Option<&Lane> {
        self.lanes.iter().find(|l| l.is_primary)
    }

    /// Bounding box of all nodes, or `None` for an empty graph.
    pub fn bounds(&self) -> Option<Bounds> {
        Self::bounds_of(&self.nodes)
    }

    /// Bounding box of `nodes`, or `None` if there are none.
    pub fn bounds_of(nodes: &[Node]) -> Option<Bounds> {
        let mut nodes = nodes.iter();
        let first = nodes.next()?;
        let init = Bounds {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        Some(nodes.fold(init, |b, n| Bounds {
            min_x: b.min_x.min(n.x),
            min_y: b.min_y.min(n.y),
            max_x: b.max_x.max(n.x),
            max_y: b.max_y.max(n.y),
        }))
    }
}
