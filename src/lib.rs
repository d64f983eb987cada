//! gitscope: commit-graph viewer for repository snapshots.
//!
//! The graph itself is built by `gitscope-graph` and shown by
//! `gitscope-view`; this crate holds the command-line glue around them.

pub mod config;
pub mod format;
pub mod loader;
pub mod telemetry;
