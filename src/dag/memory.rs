//! In-memory DAG store for tests and offline use.

use crate::dag::{hasher, DagNode, DagReader, DagWriter, DirEntry};
use crate::error::DagError;
use crate::types::ContentId;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// HashMap-backed store implementing both capabilities.
#[derive(Default)]
pub struct MemoryDagStore {
    nodes: RwLock<HashMap<ContentId, DagNode>>,
}

impl MemoryDagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct nodes stored.
    pub fn len(&self) -> usize {
        self.nodes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.read().is_empty()
    }

    fn put(&self, node: DagNode) -> ContentId {
        let id = hasher::node_id(&node);
        // Idempotent: re-writing identical content is a no-op.
        self.nodes.write().entry(id).or_insert(node);
        id
    }
}

impl DagWriter for MemoryDagStore {
    fn put_file(&self, data: &[u8]) -> Result<ContentId, DagError> {
        Ok(self.put(DagNode::File {
            data: data.to_vec(),
        }))
    }

    fn put_directory(&self, entries: Vec<DirEntry>) -> Result<ContentId, DagError> {
        Ok(self.put(DagNode::Directory { entries }))
    }

    fn put_symlink(&self, target: &[u8]) -> Result<ContentId, DagError> {
        Ok(self.put(DagNode::Symlink {
            target: target.to_vec(),
        }))
    }
}

#[async_trait]
impl DagReader for MemoryDagStore {
    async fn get_node(&self, id: &ContentId) -> Result<DagNode, DagError> {
        self.nodes
            .read()
            .get(id)
            .cloned()
            .ok_or(DagError::ContentUnavailable(*id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_is_idempotent() {
        let store = MemoryDagStore::new();
        let id1 = store.put_file(b"same bytes").unwrap();
        let id2 = store.put_file(b"same bytes").unwrap();
        assert_eq!(id1, id2);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_get_round_trips_node() {
        let store = MemoryDagStore::new();
        let id = store.put_symlink(b"../x").unwrap();
        let node = store.get_node(&id).await.unwrap();
        assert_eq!(
            node,
            DagNode::Symlink {
                target: b"../x".to_vec()
            }
        );
    }

    #[tokio::test]
    async fn test_missing_id_is_unavailable() {
        let store = MemoryDagStore::new();
        let missing = crate::dag::hasher::file_id(b"never stored");
        let err = store.get_node(&missing).await.unwrap_err();
        assert!(matches!(err, DagError::ContentUnavailable(id) if id == missing));
    }
}
