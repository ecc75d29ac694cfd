//! Sled-backed DAG store.
//!
//! Blocks are keyed by ContentId and hold bincode-encoded nodes. Content
//! addressing makes writes idempotent and commutative, so concurrent puts
//! of the same bytes from different call sites are safe.

use crate::dag::{hasher, DagNode, DagReader, DagWriter, DirEntry};
use crate::error::DagError;
use crate::types::ContentId;
use async_trait::async_trait;
use std::path::Path;

pub struct SledDagStore {
    db: sled::Db,
}

impl SledDagStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DagError> {
        let db = sled::open(path)
            .map_err(|e| DagError::Storage(format!("failed to open sled database: {}", e)))?;
        Ok(Self { db })
    }

    fn put(&self, node: &DagNode) -> Result<ContentId, DagError> {
        let id = hasher::node_id(node);
        let value = bincode::serialize(node)
            .map_err(|e| DagError::Codec(format!("failed to serialize node: {}", e)))?;
        self.db
            .insert(id.as_bytes(), value)
            .map_err(|e| DagError::Storage(format!("failed to write block: {}", e)))?;
        Ok(id)
    }
}

impl DagWriter for SledDagStore {
    fn put_file(&self, data: &[u8]) -> Result<ContentId, DagError> {
        self.put(&DagNode::File {
            data: data.to_vec(),
        })
    }

    fn put_directory(&self, entries: Vec<DirEntry>) -> Result<ContentId, DagError> {
        self.put(&DagNode::Directory { entries })
    }

    fn put_symlink(&self, target: &[u8]) -> Result<ContentId, DagError> {
        self.put(&DagNode::Symlink {
            target: target.to_vec(),
        })
    }
}

#[async_trait]
impl DagReader for SledDagStore {
    async fn get_node(&self, id: &ContentId) -> Result<DagNode, DagError> {
        match self
            .db
            .get(id.as_bytes())
            .map_err(|e| DagError::Storage(format!("failed to read block: {}", e)))?
        {
            Some(value) => bincode::deserialize(&value)
                .map_err(|e| DagError::Codec(format!("failed to deserialize node: {}", e))),
            None => Err(DagError::ContentUnavailable(*id)),
        }
    }
}
