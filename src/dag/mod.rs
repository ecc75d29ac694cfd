//! Content-addressed DAG node model and store capabilities.
//!
//! Nodes are immutable once written: any change to a tree produces wholly
//! new nodes reachable under a new root id, while unchanged subtrees keep
//! their original ids. The write and read sides are split into narrow
//! traits so the ingestion engine and the path resolver never depend on a
//! concrete storage backend.

pub mod hasher;
pub mod memory;
pub mod store;

pub use memory::MemoryDagStore;
pub use store::SledDagStore;

use crate::error::DagError;
use crate::types::{ContentId, NodeKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One link of a Directory node, projected for listings.
///
/// `size` is the byte length for files and symlink targets; directories
/// record zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirEntry {
    pub name: String,
    pub id: ContentId,
    pub size: u64,
    pub kind: NodeKind,
}

/// An immutable DAG node. Directory entries preserve the order they were
/// written in (lexicographic by name at ingest time); names are unique
/// within one directory. Symlink targets are raw bytes, stored
/// byte-for-byte: link targets are not required to be valid unicode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DagNode {
    File { data: Vec<u8> },
    Directory { entries: Vec<DirEntry> },
    Symlink { target: Vec<u8> },
}

impl DagNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            DagNode::File { .. } => NodeKind::File,
            DagNode::Directory { .. } => NodeKind::Directory,
            DagNode::Symlink { .. } => NodeKind::Symlink,
        }
    }
}

/// Write capability of the content-addressed store.
///
/// Deterministic and idempotent: the same input always yields the same
/// ContentId, so concurrent writes of identical content are safe.
pub trait DagWriter {
    fn put_file(&self, data: &[u8]) -> Result<ContentId, DagError>;
    fn put_directory(&self, entries: Vec<DirEntry>) -> Result<ContentId, DagError>;
    fn put_symlink(&self, target: &[u8]) -> Result<ContentId, DagError>;
}

/// Read capability of the content-addressed store.
///
/// `get_node` may suspend on a remote block fetch, which makes every call
/// a cancellation point for the caller.
#[async_trait]
pub trait DagReader: Send + Sync {
    async fn get_node(&self, id: &ContentId) -> Result<DagNode, DagError>;
}
