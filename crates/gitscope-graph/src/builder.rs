//! Graph builder: branches in, positioned nodes and edges out.
//!
//! The build is a pure function of its input. Lanes are assigned in
//! processing order (primary first, then the remaining branches in input
//! order), commits are spread along their lane oldest-first, and any hash
//! found on more than one branch becomes a merge point whose first branch
//! in processing order is the merge target.

use std::collections::HashMap;

use tracing::instrument;

use crate::color::Palette;
use crate::model::{Edge, Graph, Lane, Node, NodeId, Shape, Tooltip};
use crate::snapshot::Branch;

/// Reference vertical spacing between lanes.
pub const LANE_HEIGHT: f64 = 250.0;

/// Reference horizontal spacing between commits.
pub const COMMIT_SPACING: f64 = 120.0;

/// Spacing constants for lane and commit placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub lane_height: f64,
    pub commit_spacing: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            lane_height: LANE_HEIGHT,
            commit_spacing: COMMIT_SPACING,
        }
    }
}

/// Everything a build needs besides the branches.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuildOptions {
    pub layout: Layout,
    pub palette: Palette,
}

// ---------------------------------------------------------------------------
// Primary selection / ordering
// ---------------------------------------------------------------------------

fn is_primary_name(name: &str) -> bool {
    name.eq_ignore_ascii_case("main") || name.eq_ignore_ascii_case("master")
}

/// Index of the primary branch: the first named `main` or `master`
/// (case-insensitive), else the first branch. `None` for empty input.
pub fn select_primary(branches: &[Branch]) -> Option<usize> {
    if branches.is_empty() {
        return None;
    }
    Some(
        branches
            .iter()
            .position(|b| is_primary_name(&b.name))
            .unwrap_or(0),
    )
}

/// Branches in processing order: primary first, the rest in input order.
pub fn processing_order(branches: &[Branch]) -> Vec<&Branch> {
    let Some(primary) = select_primary(branches) else {
        return Vec::new();
    };
    std::iter::once(&branches[primary])
        .chain(
            branches
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != primary)
                .map(|(_, b)| b),
        )
        .collect()
}

/// Vertical offset of the `k`-th non-primary branch (0-indexed).
///
/// Even `k` goes above the axis, odd `k` below, and the distance grows by
/// one lane every two branches: `+1, -1, +2, -2, ...` lane heights.
#[allow(clippy::cast_precision_loss)]
pub fn lane_offset(k: usize, lane_height: f64) -> f64 {
    let sign = if k % 2 == 0 { 1.0 } else { -1.0 };
    let distance = (k + 2) / 2;
    sign * distance as f64 * lane_height
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Build with the reference layout and palette.
pub fn build_default(branches: &[Branch]) -> Graph {
    build(branches, &BuildOptions::default())
}

/// Build the graph for `branches`.
///
/// Callers are expected to skip the build entirely for empty input; an
/// empty slice still yields an empty graph.
#[instrument(skip_all, fields(branches = branches.len()))]
#[allow(clippy::cast_precision_loss)]
pub fn build(branches: &[Branch], options: &BuildOptions) -> Graph {
    let ordered = processing_order(branches);
    let Layout {
        lane_height,
        commit_spacing,
    } = options.layout;
    let palette = &options.palette;

    let mut nodes: Vec<Node> = Vec::new();
    let mut edges: Vec<Edge> = Vec::new();
    let mut lanes: Vec<Lane> = Vec::with_capacity(ordered.len());

    for (position, branch) in ordered.iter().enumerate() {
        let is_primary = position == 0;
        let color = palette.branch_color(&branch.name, is_primary);
        let y = if is_primary {
            0.0
        } else {
            lane_offset(position - 1, lane_height)
        };

        for (i, commit) in branch.commits.iter().enumerate() {
            let id = NodeId::commit(&branch.name, &commit.hash);
            let tooltip = Tooltip {
                message: commit.message.clone(),
                hash: commit.hash.clone(),
                author: commit.author.clone(),
                date: commit.date.clone(),
                branch: branch.name.clone(),
            };

            if let Some(parent) = &commit.parent {
                edges.push(Edge::lineage(
                    id.clone(),
                    NodeId::commit(&branch.name, parent),
                    color,
                ));
            }

            nodes.push(Node {
                id,
                x: i as f64 * commit_spacing,
                y,
                color,
                shape: Shape::Dot,
                label: String::new(),
                title: tooltip.text(),
                tooltip: Some(tooltip),
            });
        }

        let marker = NodeId::marker(&branch.name);
        if let Some(first) = branch.commits.first() {
            edges.push(Edge::branch_origin(
                marker.clone(),
                NodeId::commit(&branch.name, &first.hash),
                color,
            ));
        }
        nodes.push(Node {
            id: marker,
            x: -commit_spacing,
            y,
            color,
            shape: Shape::Box,
            label: branch.name.clone(),
            title: format!("Branch: {}", branch.name),
            tooltip: None,
        });

        lanes.push(Lane {
            branch: branch.name.clone(),
            y,
            color,
            is_primary,
            commits: branch.commits.len(),
        });
    }

    let merges = merge_edges(&ordered, palette);
    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        merges = merges.len(),
        "graph built"
    );
    edges.extend(merges);

    Graph::from_parts(nodes, edges, lanes)
}

/// Group hashes by the branches carrying them (processing order) and link
/// every later branch's copy to the first branch's copy.
fn merge_edges(ordered: &[&Branch], palette: &Palette) -> Vec<Edge> {
    let mut holders: HashMap<&str, Vec<&str>> = HashMap::new();
    // First-seen order of hashes, so output order doesn't depend on hashing.
    let mut hashes: Vec<&str> = Vec::new();

    for branch in ordered {
        for commit in &branch.commits {
            let list = holders.entry(commit.hash.as_str()).or_insert_with(|| {
                hashes.push(commit.hash.as_str());
                Vec::new()
            });
            if list.last() != Some(&branch.name.as_str()) {
                list.push(branch.name.as_str());
            }
        }
    }

    let mut edges = Vec::new();
    for hash in hashes {
        let Some((target, sources)) = holders.get(hash).and_then(|l| l.split_first()) else {
            continue;
        };
        for source in sources {
            edges.push(Edge::merge(hash, source, target, palette.merge));
        }
    }
    edges
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dashes, EdgeKind};
    use crate::snapshot::Commit;

    fn branch(name: &str, hashes: &[(&str, Option<&str>)]) -> Branch {
        Branch::new(
            name,
            hashes
                .iter()
                .map(|(h, p)| {
                    let c = Commit::new(*h);
                    match p {
                        Some(p) => c.with_parent(*p),
                        None => c,
                    }
                })
                .collect(),
        )
    }

    fn names(branches: &[&Branch]) -> Vec<String> {
        branches.iter().map(|b| b.name.clone()).collect()
    }

    #[test]
    fn primary_prefers_main() {
        let bs = vec![branch("feature", &[]), branch("main", &[]), branch("dev", &[])];
        assert_eq!(select_primary(&bs), Some(1));
        assert_eq!(names(&processing_order(&bs)), ["main", "feature", "dev"]);
    }

    #[test]
    fn primary_accepts_master_any_case() {
        let bs = vec![branch("dev", &[]), branch("MASTER", &[])];
        assert_eq!(select_primary(&bs), Some(1));
    }

    #[test]
    fn primary_falls_back_to_first() {
        let bs = vec![branch("alpha", &[]), branch("beta", &[])];
        assert_eq!(select_primary(&bs), Some(0));
        assert_eq!(names(&processing_order(&bs)), ["alpha", "beta"]);
        assert_eq!(select_primary(&[]), None);
    }

    #[test]
    fn lane_offsets_zig_zag() {
        let h = LANE_HEIGHT;
        let offsets: Vec<f64> = (0..4).map(|k| lane_offset(k, h)).collect();
        assert_eq!(offsets, [h, -h, 2.0 * h, -2.0 * h]);
    }

    #[test]
    fn lanes_follow_processing_order() {
        let bs = vec![
            branch("a", &[]),
            branch("b", &[]),
            branch("main", &[]),
            branch("c", &[]),
            branch("d", &[]),
        ];
        let g = build_default(&bs);
        let ys: Vec<(String, f64)> = g.lanes.iter().map(|l| (l.branch.clone(), l.y)).collect();
        assert_eq!(
            ys,
            [
                ("main".to_owned(), 0.0),
                ("a".to_owned(), 250.0),
                ("b".to_owned(), -250.0),
                ("c".to_owned(), 500.0),
                ("d".to_owned(), -500.0),
            ]
        );
    }

    #[test]
    fn commits_spread_along_lane() {
        let bs = vec![branch("main", &[("a", None), ("b", Some("a")), ("c", Some("b"))])];
        let g = build_default(&bs);
        let c = g.node(&NodeId::commit("main", "c")).unwrap();
        assert_eq!((c.x, c.y), (240.0, 0.0));
        let marker = g.node(&NodeId::marker("main")).unwrap();
        assert_eq!((marker.x, marker.y), (-120.0, 0.0));
        assert_eq!(marker.label, "main");
        assert_eq!(marker.shape, Shape::Box);
    }

    #[test]
    fn lineage_edges_point_to_parent() {
        let bs = vec![branch("main", &[("a", None), ("b", Some("a"))])];
        let g = build_default(&bs);
        let lineage: Vec<&Edge> = g.edges.iter().filter(|e| e.kind == EdgeKind::Lineage).collect();
        assert_eq!(lineage.len(), 1);
        assert_eq!(lineage[0].from, NodeId::commit("main", "b"));
        assert_eq!(lineage[0].to, NodeId::commit("main", "a"));
        assert_eq!(lineage[0].dashes, Dashes::Solid);
    }

    #[test]
    fn origin_edge_from_marker_to_first_commit() {
        let bs = vec![branch("main", &[("a", None), ("b", Some("a"))])];
        let g = build_default(&bs);
        let origin: Vec<&Edge> = g
            .edges
            .iter()
            .filter(|e| e.kind == EdgeKind::BranchOrigin)
            .collect();
        assert_eq!(origin.len(), 1);
        assert_eq!(origin[0].from, NodeId::marker("main"));
        assert_eq!(origin[0].to, NodeId::commit("main", "a"));
        assert_eq!(origin[0].dashes, Dashes::Dashed);
    }

    #[test]
    fn empty_branch_has_marker_only() {
        let bs = vec![branch("main", &[("a", None)]), branch("dev", &[])];
        let g = build_default(&bs);
        assert!(g.contains(&NodeId::marker("dev")));
        assert!(!g.edges.iter().any(|e| e.from == NodeId::marker("dev")));
        assert_eq!(g.nodes.len(), 3);
    }

    #[test]
    fn shared_root_makes_one_merge_edge() {
        let bs = vec![branch("A", &[("c1", None)]), branch("B", &[("c1", None)])];
        let g = build_default(&bs);
        let merges: Vec<&Edge> = g.merge_edges().collect();
        assert_eq!(merges.len(), 1);
        assert_eq!(merges[0].from, NodeId::commit("B", "c1"));
        assert_eq!(merges[0].to, NodeId::commit("A", "c1"));
    }

    #[test]
    fn merge_target_is_primary_even_when_listed_later() {
        let bs = vec![
            branch("feature", &[("f1", None), ("a1", Some("f1"))]),
            branch("main", &[("a1", None)]),
        ];
        let g = build_default(&bs);
        let merges: Vec<&Edge> = g.merge_edges().collect();
        assert_eq!(merges.len(), 1);
        assert_eq!(merges[0].from, NodeId::commit("feature", "a1"));
        assert_eq!(merges[0].to, NodeId::commit("main", "a1"));
        assert_eq!(
            merges[0].kind,
            EdgeKind::Merge {
                source: "feature".into(),
                target: "main".into()
            }
        );
    }

    #[test]
    fn three_way_share_targets_first_branch() {
        let bs = vec![
            branch("main", &[("x", None)]),
            branch("dev", &[("x", None)]),
            branch("bugfix", &[("x", None)]),
        ];
        let g = build_default(&bs);
        let merges: Vec<(String, String)> = g
            .merge_edges()
            .map(|e| (e.from.to_string(), e.to.to_string()))
            .collect();
        assert_eq!(
            merges,
            [
                ("dev-x".to_owned(), "main-x".to_owned()),
                ("bugfix-x".to_owned(), "main-x".to_owned()),
            ]
        );
    }

    #[test]
    fn multiple_shared_hashes_are_independent() {
        let bs = vec![
            branch("main", &[("a", None), ("b", Some("a"))]),
            branch("dev", &[("a", None), ("b", Some("a")), ("c", Some("b"))]),
        ];
        let g = build_default(&bs);
        assert_eq!(g.merge_edges().count(), 2);
    }

    #[test]
    fn repeated_hash_within_one_branch_is_not_a_merge() {
        let bs = vec![branch("main", &[("a", None), ("a", None)])];
        let g = build_default(&bs);
        assert_eq!(g.merge_edges().count(), 0);
    }

    #[test]
    fn dangling_parent_still_builds() {
        let bs = vec![branch("main", &[("a", Some("ghost")), ("b", Some("a"))])];
        let g = build_default(&bs);
        assert_eq!(g.nodes.len(), 3);
        let dangling: Vec<&Edge> = g.dangling_edges().collect();
        assert_eq!(dangling.len(), 1);
        assert_eq!(dangling[0].to, NodeId::commit("main", "ghost"));
        assert_eq!(g.resolved_edges().count(), 2);
    }

    #[test]
    fn colors_follow_palette() {
        let p = Palette::default();
        let bs = vec![
            branch("trunk", &[("a", None)]),
            branch("feature", &[]),
            branch("misc", &[]),
        ];
        let g = build_default(&bs);
        assert_eq!(g.node(&NodeId::commit("trunk", "a")).unwrap().color, p.main);
        assert_eq!(g.node(&NodeId::marker("feature")).unwrap().color, p.feature);
        assert_eq!(g.node(&NodeId::marker("misc")).unwrap().color, p.other);
    }

    #[test]
    fn custom_layout_is_honored() {
        let options = BuildOptions {
            layout: Layout {
                lane_height: 100.0,
                commit_spacing: 50.0,
            },
            ..BuildOptions::default()
        };
        let bs = vec![branch("main", &[]), branch("dev", &[("a", None), ("b", Some("a"))])];
        let g = build(&bs, &options);
        let b = g.node(&NodeId::commit("dev", "b")).unwrap();
        assert_eq!((b.x, b.y), (50.0, 100.0));
        assert_eq!(g.node(&NodeId::marker("dev")).unwrap().x, -50.0);
    }

    #[test]
    fn empty_input_builds_nothing() {
        let g = build_default(&[]);
        assert!(g.is_empty());
        assert!(g.edges.is_empty());
    }

    #[test]
    fn commit_tooltip_and_blank_label() {
        let bs = vec![Branch::new(
            "main",
            vec![Commit::new("a1").with_message("init").with_author("ana", "2024-01-01")],
        )];
        let g = build_default(&bs);
        let n = g.node(&NodeId::commit("main", "a1")).unwrap();
        assert_eq!(n.label, "");
        let tip = n.tooltip.as_ref().unwrap();
        assert_eq!(tip.branch, "main");
        assert_eq!(n.title, tip.text());
    }
}
