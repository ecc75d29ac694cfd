//! Arbor: content-addressed filesystem versioning.
//!
//! Filesystem trees are stored as an immutable Merkle DAG. Branches are
//! named mutable pointers to DAG roots, and paths resolve within a branch
//! to either file content (a Blob) or a directory listing (a Tree).

pub mod config;
pub mod dag;
pub mod error;
pub mod ignore;
pub mod ingest;
pub mod logging;
pub mod repo;
pub mod resolve;
pub mod types;
