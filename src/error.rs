//! Error types for ingestion, resolution, and repository state.

use crate::types::ContentId;
use std::path::PathBuf;
use thiserror::Error;

/// Malformed ignore pattern, reported once at pattern-set construction.
#[derive(Debug, Error)]
#[error("invalid ignore pattern {pattern:?}: {source}")]
pub struct IgnoreError {
    pub pattern: String,
    #[source]
    pub source: glob::PatternError,
}

/// Errors from the content-addressed block store.
#[derive(Debug, Error)]
pub enum DagError {
    /// The node is known to exist but could not be fetched right now.
    /// Distinct from a missing path segment, which is a resolution error.
    #[error("content unavailable: {0}")]
    ContentUnavailable(ContentId),

    #[error("fetch canceled")]
    Canceled,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("codec error: {0}")]
    Codec(String),
}

/// Errors raised while ingesting a local tree into the DAG.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Duplicate child names within one directory level are rejected
    /// rather than silently resolved last-write-wins.
    #[error("duplicate entry {name:?} in directory {dir:?}")]
    DuplicateEntry { dir: PathBuf, name: String },

    /// Entry names become path segments, so non-unicode names are
    /// rejected up front instead of being decoded lossily.
    #[error("non-unicode entry name {name:?} in directory {dir:?}")]
    InvalidName {
        dir: PathBuf,
        name: std::ffi::OsString,
    },

    #[error(transparent)]
    Ignore(#[from] IgnoreError),

    #[error(transparent)]
    Dag(#[from] DagError),
}

/// Errors raised while resolving a path within a DAG root.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("path segment {segment:?} (index {index}) not found")]
    NotFound { segment: String, index: usize },

    /// The walk tried to descend through a non-directory node.
    #[error("path segment {segment:?} (index {index}) is not inside a directory")]
    NotADirectory { segment: String, index: usize },

    #[error("content unavailable while resolving {id}")]
    Unavailable {
        id: ContentId,
        #[source]
        source: DagError,
    },

    #[error("resolution canceled")]
    Canceled,
}

impl ResolveError {
    /// NotFound and NotADirectory are the same recoverable class to
    /// callers: the path does not denote a node.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ResolveError::NotFound { .. } | ResolveError::NotADirectory { .. }
        )
    }
}

/// Branch name absent from the repository. A normal, recoverable
/// condition, not corruption.
#[derive(Debug, Error)]
#[error("branch not found: {0}")]
pub struct BranchNotFound(pub String);

/// Errors loading or saving persisted repository state.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("failed to access repository state at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported repository state version: {0}")]
    UnsupportedVersion(u32),

    #[error("failed to decode repository state: {0}")]
    Decode(String),
}

/// Configuration and logging setup errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Invalid(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}
