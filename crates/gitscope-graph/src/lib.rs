//! gitscope graph crate: turns a repository snapshot into a positioned
//! commit graph.
//!
//! - [`snapshot`]: the input model (branches, commits, repository info)
//! - [`builder`]: primary selection, lane placement and merge detection
//! - [`model`]: nodes, edges, lanes
//! - [`color`]: branch palette
//! - [`contract`]: flat records handed to a rendering engine
//!
//! Building is pure and deterministic: the same branches always yield the
//! same node identities, positions, colors and edges.

pub mod builder;
pub mod color;
pub mod contract;
pub mod model;
pub mod snapshot;

pub use builder::{BuildOptions, Layout, build, build_default};
pub use color::{Palette, Rgb};
pub use model::{Edge, EdgeKind, Graph, Node, NodeId};
pub use snapshot::{Branch, Commit, RepositoryInfo, Snapshot, SnapshotError};
