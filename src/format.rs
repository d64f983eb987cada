use std::fmt::Write as _;
use std::str::FromStr;

use anyhow::{Result, bail};
use gitscope_graph::contract::{RenderDocument, RenderOptions};
use gitscope_graph::model::{EdgeKind, Graph, NodeId};
use gitscope_graph::{BuildOptions, Snapshot, build};

/// Output format for `gitscope graph`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// The renderer data contract as JSON
    #[default]
    Json,
    /// Human-readable summary of lanes and merges
    Text,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            _ => bail!("Invalid format '{s}'. Use: json or text"),
        }
    }
}

impl OutputFormat {
    /// Build the graph for `snapshot` and render it in this format.
    ///
    /// # Errors
    /// Returns an error if JSON serialization fails.
    pub fn render(self, snapshot: &Snapshot, options: &BuildOptions) -> Result<String> {
        let graph = build(snapshot.branches(), options);
        match self {
            Self::Json => {
                let doc = RenderDocument::new(&graph, RenderOptions::default());
                let mut out = serde_json::to_string_pretty(&doc)
                    .map_err(|e| anyhow::anyhow!("JSON serialization failed: {e}"))?;
                out.push('\n');
                Ok(out)
            }
            Self::Text => Ok(summary(snapshot, &graph)),
        }
    }
}

/// Plain-text overview: lanes, counts and merge edges.
pub fn summary(snapshot: &Snapshot, graph: &Graph) -> String {
    let mut out = String::new();
    if let Some(info) = snapshot.info() {
        let _ = writeln!(out, "{}", info.headline());
    }
    if graph.is_empty() {
        out.push_str("No repository data\n");
        return out;
    }

    if let Some(primary) = graph.primary() {
        let _ = writeln!(out, "primary: {}", primary.branch);
    }
    out.push_str("lanes:\n");
    let width = graph.lanes.iter().map(|l| l.branch.len()).max().unwrap_or(0);
    for lane in &graph.lanes {
        let _ = writeln!(
            out,
            "  {:<width$}  y={:>7}  {:>4} commits  {}",
            lane.branch, lane.y, lane.commits, lane.color
        );
    }

    let merges: Vec<_> = graph.merge_edges().collect();
    let dangling = graph.dangling_edges().count();
    let _ = writeln!(
        out,
        "nodes: {}  edges: {} ({} merge, {} dangling)",
        graph.nodes.len(),
        graph.edges.len(),
        merges.len(),
        dangling
    );

    if !merges.is_empty() {
        out.push_str("merges:\n");
        for edge in merges {
            if let (NodeId::Commit { hash, .. }, EdgeKind::Merge { source, target }) =
                (&edge.from, &edge.kind)
            {
                let _ = writeln!(out, "  {hash}  {source} → {target}");
            }
        }
    }
    out
}
