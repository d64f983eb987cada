//! Reading snapshot files.
//!
//! A file that cannot be read is an error. A file that reads but is not
//! valid JSON is logged and treated as "no data", so the viewer shows an
//! empty canvas instead of refusing to start.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gitscope_graph::Snapshot;
use gitscope_view::SnapshotSource;
use tracing::instrument;

/// Read and parse the snapshot at `path`.
///
/// # Errors
/// Returns an error only if the file cannot be read.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    Ok(parse_snapshot(&text))
}

/// Parse snapshot JSON, falling back to an empty snapshot on bad input.
pub fn parse_snapshot(text: &str) -> Snapshot {
    match Snapshot::from_json(text) {
        Ok(snapshot) => {
            tracing::debug!(
                branches = snapshot.branches().len(),
                commits = snapshot.commit_count(),
                "snapshot loaded"
            );
            snapshot
        }
        Err(e) => {
            tracing::warn!(error = %e, "snapshot is not valid JSON, nothing to show");
            Snapshot::default()
        }
    }
}

/// A snapshot file, re-read on every load.
#[derive(Clone, Debug)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Option<Snapshot>> {
        let snapshot = read_snapshot(&self.path)?;
        Ok((!snapshot.is_empty()).then_some(snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_json_is_empty() {
        assert!(parse_snapshot("{not json").is_empty());
        assert!(parse_snapshot("").is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_snapshot(&dir.path().join("none.json")).unwrap_err();
        assert!(err.to_string().contains("reading snapshot"));
    }

    #[test]
    fn file_source_reports_no_data_for_empty_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repo.json");
        std::fs::write(&path, r#"{"branches": []}"#).unwrap();
        let source = FileSource::new(&path);
        assert!(source.load().unwrap().is_none());

        std::fs::write(
            &path,
            r#"{"branches": [{"name": "main", "commits": [{"hash": "a1", "parent": ""}]}]}"#,
        )
        .unwrap();
        let snapshot = source.load().unwrap().unwrap();
        assert_eq!(snapshot.commit_count(), 1);
        assert!(source.describe().ends_with("repo.json"));
    }
}
