//! End-to-end scenarios: repository document in, graph out.

#![allow(clippy::all, clippy::pedantic, clippy::nursery)]

use gitscope_graph::model::EdgeKind;
use gitscope_graph::{NodeId, Snapshot, build_default};

#[test]
fn feature_carrying_main_commit_merges_into_main() {
    let doc = r#"{"branches": [
        {"name": "main", "commits": [{"hash": "a1"}]},
        {"name": "feature", "commits": [
            {"hash": "f1", "parent": null},
            {"hash": "a1", "parent": "f1"}
        ]}
    ]}"#;
    let snap = Snapshot::from_json(doc).unwrap();
    let g = build_default(snap.branches());

    let merges: Vec<_> = g.merge_edges().collect();
    assert_eq!(merges.len(), 1);
    assert_eq!(merges[0].from, NodeId::commit("feature", "a1"));
    assert_eq!(merges[0].to, NodeId::commit("main", "a1"));
    assert_eq!(merges[0].title.as_deref(), Some("Merged feature → main"));

    // feature sits one lane above main.
    assert_eq!(g.node(&NodeId::commit("feature", "f1")).unwrap().y, 250.0);
    assert_eq!(g.nodes.len(), 5);
}

#[test]
fn empty_branches_build_nothing() {
    let snap = Snapshot::from_json(r#"{"branches": []}"#).unwrap();
    assert!(snap.is_empty());
    let g = build_default(snap.branches());
    assert_eq!(g.nodes.len(), 0);
    assert_eq!(g.edges.len(), 0);
}

#[test]
fn ghost_parent_leaves_rest_of_graph_intact() {
    let doc = r#"{"branches": [
        {"name": "main", "commits": [
            {"hash": "a", "parent": "ghost"},
            {"hash": "b", "parent": "a"}
        ]},
        {"name": "dev", "commits": [{"hash": "b"}]}
    ]}"#;
    let g = build_default(Snapshot::from_json(doc).unwrap().branches());
    assert_eq!(g.nodes.len(), 5);
    assert_eq!(g.dangling_edges().count(), 1);
    assert_eq!(g.merge_edges().count(), 1);
    assert!(
        g.resolved_edges()
            .any(|e| e.kind == EdgeKind::Lineage && e.from == NodeId::commit("main", "b"))
    );
}

#[test]
fn scanner_export_with_empty_parent_strings() {
    // The scanner writes "" for root commits and lists commits as fetched.
    let doc = r#"{
        "repository_info": {"name": "demo", "default_branch": "master"},
        "branches": [
            {"name": "dev", "head": "d2", "commits": [
                {"hash": "d1", "message": "start dev", "author": "bo", "date": "d", "parent": ""},
                {"hash": "d2", "message": "dev work", "author": "bo", "date": "d", "parent": "d1"}
            ]},
            {"name": "master", "head": "m1", "commits": [
                {"hash": "m1", "message": "root", "author": "al", "date": "d", "parent": ""}
            ]}
        ]
    }"#;
    let g = build_default(Snapshot::from_json(doc).unwrap().branches());
    assert_eq!(g.primary().unwrap().branch, "master");
    assert_eq!(g.edges.iter().filter(|e| e.kind == EdgeKind::Lineage).count(), 1);
    assert_eq!(g.node(&NodeId::marker("dev")).unwrap().y, 250.0);
}
