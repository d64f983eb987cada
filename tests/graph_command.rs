//! End-to-end tests for `gitscope graph` and `gitscope completions`.

mod common;
use common::*;

fn node<'a>(doc: &'a serde_json::Value, id: &str) -> &'a serde_json::Value {
    doc["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .find(|n| n["id"] == id)
        .unwrap_or_else(|| panic!("node {id} missing"))
}

#[test]
fn json_output_is_the_render_contract() {
    let (dir, path) = write_file("repo.json", SAMPLE_SNAPSHOT);
    let stdout = gitscope_ok(dir.path(), &["graph", path.to_str().unwrap()]);
    let doc: serde_json::Value = serde_json::from_str(&stdout).expect("graph should print JSON");

    assert_eq!(doc["nodes"].as_array().unwrap().len(), 6);
    assert_eq!(doc["edges"].as_array().unwrap().len(), 5);
    assert_eq!(doc["options"]["physics"], false);
    assert_eq!(doc["options"]["layout"]["hierarchical"], false);

    // main is primary even though it is listed second.
    let main_b2 = node(&doc, "main-b2");
    assert_eq!(main_b2["y"], 0.0);
    assert_eq!(main_b2["x"], 120.0);
    assert_eq!(main_b2["color"], "#2ecc71");
    assert_eq!(node(&doc, "feature-f1")["y"], 250.0);

    let marker = node(&doc, "branch-feature");
    assert_eq!(marker["shape"], "box");
    assert_eq!(marker["label"], "feature");
    assert_eq!(marker["x"], -120.0);

    let merge = doc["edges"]
        .as_array()
        .unwrap()
        .iter()
        .find(|e| e["arrows"] == "to")
        .expect("merge edge");
    assert_eq!(merge["from"], "feature-b2");
    assert_eq!(merge["to"], "main-b2");
    assert_eq!(merge["dashes"], serde_json::json!([4, 4]));
    assert_eq!(merge["title"], "Merged feature → main");
}

#[test]
fn text_output_summarizes_lanes() {
    let (dir, path) = write_file("repo.json", SAMPLE_SNAPSHOT);
    let stdout = gitscope_ok(
        dir.path(),
        &["graph", path.to_str().unwrap(), "--format", "text"],
    );
    assert!(stdout.starts_with("demo (Rust) ★4 ⑂1\n"), "{stdout}");
    assert!(stdout.contains("primary: main"), "{stdout}");
    assert!(stdout.contains("b2  feature → main"), "{stdout}");
}

#[test]
fn invalid_json_renders_nothing() {
    let (dir, path) = write_file("broken.json", "{\"branches\": [");
    let out = gitscope_in(
        dir.path(),
        &["graph", path.to_str().unwrap(), "--format", "text"],
    );
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "No repository data\n");
    assert!(
        String::from_utf8_lossy(&out.stderr).contains("not valid JSON"),
        "warning should reach stderr"
    );
}

#[test]
fn missing_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = gitscope_in(dir.path(), &["graph", "nope.json"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("reading snapshot"));
}

#[test]
fn unknown_format_is_rejected() {
    let (dir, path) = write_file("repo.json", SAMPLE_SNAPSHOT);
    let out = gitscope_in(
        dir.path(),
        &["graph", path.to_str().unwrap(), "--format", "yaml"],
    );
    assert!(!out.status.success());
}

#[test]
fn completions_are_generated() {
    let dir = tempfile::tempdir().unwrap();
    let stdout = gitscope_ok(dir.path(), &["completions", "bash"]);
    assert!(stdout.contains("gitscope"));
}
