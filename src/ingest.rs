//! Ingestion of local filesystem trees into the DAG.
//!
//! A sequential depth-first recursive walk that turns files, directories,
//! and symlinks into immutable DAG nodes through an abstract [`DagWriter`].
//! Children are processed in lexicographic name order so the same tree
//! state always produces the same root id, and unchanged subtrees keep
//! their previous ids across re-ingestions.

use crate::dag::{DagWriter, DirEntry};
use crate::error::IngestError;
use crate::ignore::IgnoreSet;
use crate::types::{ContentId, NodeKind};
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument, trace};

/// Ingest the tree rooted at `root` and return the root node's id.
///
/// `root` may be a directory, a regular file, or a symlink; ingesting a
/// bare file is a valid top-level call. `ignore` filters children by
/// their path relative to `root`: an ignored child contributes no entry
/// and is never recursed into, so ignored content never reaches the DAG.
///
/// The first I/O error aborts the whole call, identifying the offending
/// path; no id returned alongside an error is valid.
#[instrument(skip_all, fields(root = %root.display()))]
pub fn add(
    writer: &dyn DagWriter,
    root: &Path,
    ignore: Option<&IgnoreSet>,
) -> Result<ContentId, IngestError> {
    let start = Instant::now();
    let (id, _, _) = add_path(writer, root, root, ignore)?;
    info!(
        root_id = %id,
        duration_ms = start.elapsed().as_millis(),
        "ingest completed"
    );
    Ok(id)
}

/// Recursive step: ingest one path and return (id, size, kind).
fn add_path(
    writer: &dyn DagWriter,
    root: &Path,
    path: &Path,
    ignore: Option<&IgnoreSet>,
) -> Result<(ContentId, u64, NodeKind), IngestError> {
    // symlink_metadata so links are classified as links, never followed.
    // Following them for tree-walking would risk infinite recursion.
    let meta = fs::symlink_metadata(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file_type = meta.file_type();

    if file_type.is_symlink() {
        let target = fs::read_link(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        // Stored verbatim as raw bytes: no normalization, resolution, or
        // existence check, and no lossy unicode conversion.
        let target = target.as_os_str().as_encoded_bytes().to_vec();
        let id = writer.put_symlink(&target)?;
        trace!(path = %path.display(), "ingested symlink");
        return Ok((id, target.len() as u64, NodeKind::Symlink));
    }

    if file_type.is_file() {
        let data = fs::read(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let size = data.len() as u64;
        let id = writer.put_file(&data)?;
        trace!(path = %path.display(), size, "ingested file");
        return Ok((id, size, NodeKind::File));
    }

    // Directory: list children in a stable lexicographic order.
    let mut names = Vec::new();
    let dir_entries = fs::read_dir(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    for child in dir_entries {
        let child = child.map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        match child.file_name().into_string() {
            Ok(name) => names.push(name),
            // Entry names become path segments, so they must be valid
            // unicode. Rejecting here keeps lookups unambiguous.
            Err(name) => {
                return Err(IngestError::InvalidName {
                    dir: path.to_path_buf(),
                    name,
                })
            }
        }
    }
    names.sort();

    // Duplicate names within one level are an error, never a silent
    // last-write-wins. (Can surface with exotic filesystems or
    // case-folding mounts.)
    for pair in names.windows(2) {
        if pair[0] == pair[1] {
            return Err(IngestError::DuplicateEntry {
                dir: path.to_path_buf(),
                name: pair[0].clone(),
            });
        }
    }

    let mut entries = Vec::with_capacity(names.len());
    for name in names {
        let child_path = path.join(&name);
        if let Some(ignore) = ignore {
            if ignore.matches(&relative_path(root, &child_path)) {
                debug!(path = %child_path.display(), "ignored");
                continue;
            }
        }
        let (id, size, kind) = add_path(writer, root, &child_path, ignore)?;
        entries.push(DirEntry {
            name,
            id,
            size,
            kind,
        });
    }

    // An empty or fully ignored directory is still a valid (empty) node.
    let id = writer.put_directory(entries)?;
    Ok((id, 0, NodeKind::Directory))
}

/// Path relative to the ingestion root, with canonical `/` separators.
fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let rel = rel.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        rel.into_owned()
    } else {
        rel.replace(std::path::MAIN_SEPARATOR, "/")
    }
}
