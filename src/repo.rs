//! Repository and branch state.
//!
//! Branches are mutable pointers into the immutable DAG: the only state
//! mutation in the whole design is rebinding a branch name to a new root
//! id. State is persisted as a versioned bincode file written atomically
//! (temp sibling plus rename), so a concurrent reader never observes a
//! torn update.

use crate::error::{BranchNotFound, RepoError};
use crate::types::ContentId;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Conventional fallback branch name when a caller specifies none.
pub const DEFAULT_BRANCH: &str = "default";

const STATE_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RepoState {
    name: String,
    branches: BTreeMap<String, ContentId>,
}

/// A named repository: a set of branches, each bound to one DAG root.
#[derive(Debug)]
pub struct Repository {
    state: RwLock<RepoState>,
}

impl Repository {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(RepoState {
                name: name.into(),
                branches: BTreeMap::new(),
            }),
        }
    }

    pub fn name(&self) -> String {
        self.state.read().name.clone()
    }

    /// Snapshot of the branch map, atomic with respect to `set_branch`.
    pub fn branches(&self) -> BTreeMap<String, ContentId> {
        self.state.read().branches.clone()
    }

    /// Resolve a branch name to its root id. `None` or an empty name
    /// falls back to [`DEFAULT_BRANCH`]. Absence is an ordinary
    /// recoverable condition (a caller can race a rebind).
    pub fn resolve_branch(&self, name: Option<&str>) -> Result<ContentId, BranchNotFound> {
        let name = match name {
            Some(n) if !n.is_empty() => n,
            _ => DEFAULT_BRANCH,
        };
        self.state
            .read()
            .branches
            .get(name)
            .copied()
            .ok_or_else(|| BranchNotFound(name.to_string()))
    }

    /// Bind a branch name to a root id, overwriting any prior binding.
    /// Readers observe either the old or the new binding, never a
    /// partially updated map.
    pub fn set_branch(&self, name: impl Into<String>, id: ContentId) {
        let name = name.into();
        debug!(branch = %name, root = %id, "set branch");
        self.state.write().branches.insert(name, id);
    }

    /// Load repository state from disk. A missing file yields a fresh
    /// repository with the given name.
    pub fn load(path: &Path, name: &str) -> Result<Self, RepoError> {
        if !path.exists() {
            return Ok(Self::new(name));
        }
        let bytes = fs::read(path).map_err(|source| RepoError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if bytes.len() < 4 {
            return Err(RepoError::Decode("state file too short".to_string()));
        }
        let version = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if version != STATE_VERSION {
            return Err(RepoError::UnsupportedVersion(version));
        }
        let state: RepoState =
            bincode::deserialize(&bytes[4..]).map_err(|e| RepoError::Decode(e.to_string()))?;
        Ok(Self {
            state: RwLock::new(state),
        })
    }

    /// Save repository state atomically: write a temp sibling, then
    /// rename over the target.
    pub fn save(&self, path: &Path) -> Result<(), RepoError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| RepoError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let state = self.state.read().clone();
        let payload =
            bincode::serialize(&state).map_err(|e| RepoError::Decode(e.to_string()))?;
        let mut serialized = Vec::with_capacity(4 + payload.len());
        serialized.extend_from_slice(&STATE_VERSION.to_le_bytes());
        serialized.extend_from_slice(&payload);

        let temp_path = path.with_extension("bin.tmp");
        fs::write(&temp_path, &serialized).map_err(|source| RepoError::Io {
            path: temp_path.clone(),
            source,
        })?;
        fs::rename(&temp_path, path).map_err(|source| {
            let _ = fs::remove_file(&temp_path);
            RepoError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;

        info!(path = %path.display(), "saved repository state");
        Ok(())
    }
}
