//! ContentId computation for DAG nodes using BLAKE3.
//!
//! Each node kind hashes under its own discriminator with length-prefixed
//! fields (big-endian), so ids are a deterministic function of the node's
//! content alone and identical content always deduplicates.

use crate::dag::{DagNode, DirEntry};
use crate::types::ContentId;
use blake3::Hasher;

/// Compute the ContentId for a file node.
///
/// id = blake3("file" || data_len || data)
pub fn file_id(data: &[u8]) -> ContentId {
    let mut hasher = Hasher::new();
    hasher.update(b"file");
    hasher.update(&(data.len() as u64).to_be_bytes());
    hasher.update(data);
    ContentId::from_bytes(*hasher.finalize().as_bytes())
}

/// Compute the ContentId for a directory node.
///
/// id = blake3("directory" || entry_count || entries), where each entry
/// contributes name_len || name || child_id || size || kind. Entry order
/// is significant; ingestion supplies entries sorted by name.
pub fn directory_id(entries: &[DirEntry]) -> ContentId {
    let mut hasher = Hasher::new();
    hasher.update(b"directory");
    hasher.update(&(entries.len() as u64).to_be_bytes());
    for entry in entries {
        hasher.update(&(entry.name.len() as u64).to_be_bytes());
        hasher.update(entry.name.as_bytes());
        hasher.update(entry.id.as_bytes());
        hasher.update(&entry.size.to_be_bytes());
        hasher.update(&[entry.kind as u8]);
    }
    ContentId::from_bytes(*hasher.finalize().as_bytes())
}

/// Compute the ContentId for a symlink node.
///
/// id = blake3("symlink" || target_len || target)
pub fn symlink_id(target: &[u8]) -> ContentId {
    let mut hasher = Hasher::new();
    hasher.update(b"symlink");
    hasher.update(&(target.len() as u64).to_be_bytes());
    hasher.update(target);
    ContentId::from_bytes(*hasher.finalize().as_bytes())
}

/// ContentId for an arbitrary node.
pub fn node_id(node: &DagNode) -> ContentId {
    match node {
        DagNode::File { data } => file_id(data),
        DagNode::Directory { entries } => directory_id(entries),
        DagNode::Symlink { target } => symlink_id(target),
    }
}
