//! Path resolution within a DAG root.
//!
//! Stateless per call: walk the path segments from a root id, fetching
//! each node through an abstract [`DagReader`], and classify the terminal
//! node as file-like content or a directory listing. Every fetch is an
//! await point, so dropping the returned future aborts the walk promptly
//! (callers supply timeouts; none is implied here).

use crate::dag::{DagNode, DagReader, DirEntry};
use crate::error::{DagError, ResolveError};
use crate::types::ContentId;
use tracing::instrument;

/// Outcome of resolving a path.
///
/// A symlink resolves to a Blob holding the raw target string; the
/// resolver never follows links to another path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    Blob(Vec<u8>),
    Tree(Vec<DirEntry>),
}

/// Walk `segments` from `root` and classify the terminal node.
///
/// An empty path resolves the root itself. Each segment must name an
/// entry of the current directory exactly; descending into a
/// non-directory or looking up an absent name fails with the offending
/// segment and its index.
#[instrument(skip(reader))]
pub async fn resolve(
    reader: &dyn DagReader,
    root: ContentId,
    segments: &[&str],
) -> Result<Resolved, ResolveError> {
    let mut current = fetch(reader, root).await?;

    for (index, segment) in segments.iter().enumerate() {
        let entries = match &current {
            DagNode::Directory { entries } => entries,
            _ => {
                return Err(ResolveError::NotADirectory {
                    segment: (*segment).to_string(),
                    index,
                })
            }
        };
        let next = entries
            .iter()
            .find(|e| e.name == **segment)
            .map(|e| e.id)
            .ok_or_else(|| ResolveError::NotFound {
                segment: (*segment).to_string(),
                index,
            })?;
        current = fetch(reader, next).await?;
    }

    match current {
        DagNode::Directory { entries } => Ok(Resolved::Tree(entries)),
        DagNode::File { data } => Ok(Resolved::Blob(data)),
        DagNode::Symlink { target } => Ok(Resolved::Blob(target)),
    }
}

async fn fetch(reader: &dyn DagReader, id: ContentId) -> Result<DagNode, ResolveError> {
    reader.get_node(&id).await.map_err(|e| match e {
        DagError::Canceled => ResolveError::Canceled,
        other => ResolveError::Unavailable { id, source: other },
    })
}

/// First entry whose name matches `readme*` case-insensitively.
///
/// A display policy layered on top of the resolver, not part of it.
pub fn find_readme(entries: &[DirEntry]) -> Option<&DirEntry> {
    entries.iter().find(|e| {
        e.name
            .get(..6)
            .map_or(false, |prefix| prefix.eq_ignore_ascii_case("readme"))
    })
}

/// Resolve a tree's readme entry (if any) to its blob content.
pub async fn readme(
    reader: &dyn DagReader,
    entries: &[DirEntry],
) -> Result<Option<Vec<u8>>, ResolveError> {
    let Some(entry) = find_readme(entries) else {
        return Ok(None);
    };
    match resolve(reader, entry.id, &[]).await? {
        Resolved::Blob(data) => Ok(Some(data)),
        Resolved::Tree(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag::{DagWriter, MemoryDagStore};
    use crate::types::NodeKind;
    use async_trait::async_trait;

    fn sample_tree(store: &MemoryDagStore) -> ContentId {
        let a = store.put_file(b"hi").unwrap();
        let l = store.put_symlink(b"../x").unwrap();
        let sub = store
            .put_directory(vec![DirEntry {
                name: "inner.txt".to_string(),
                id: a,
                size: 2,
                kind: NodeKind::File,
            }])
            .unwrap();
        store
            .put_directory(vec![
                DirEntry {
                    name: "a.txt".to_string(),
                    id: a,
                    size: 2,
                    kind: NodeKind::File,
                },
                DirEntry {
                    name: "l".to_string(),
                    id: l,
                    size: 4,
                    kind: NodeKind::Symlink,
                },
                DirEntry {
                    name: "sub".to_string(),
                    id: sub,
                    size: 0,
                    kind: NodeKind::Directory,
                },
            ])
            .unwrap()
    }

    #[tokio::test]
    async fn test_empty_path_resolves_root() {
        let store = MemoryDagStore::new();
        let root = sample_tree(&store);

        let Resolved::Tree(entries) = resolve(&store, root, &[]).await.unwrap() else {
            panic!("expected tree");
        };
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["a.txt", "l", "sub"]);
    }

    #[tokio::test]
    async fn test_file_resolves_to_blob() {
        let store = MemoryDagStore::new();
        let root = sample_tree(&store);

        let result = resolve(&store, root, &["a.txt"]).await.unwrap();
        assert_eq!(result, Resolved::Blob(b"hi".to_vec()));
    }

    #[tokio::test]
    async fn test_symlink_resolves_to_raw_target() {
        let store = MemoryDagStore::new();
        let root = sample_tree(&store);

        let result = resolve(&store, root, &["l"]).await.unwrap();
        assert_eq!(result, Resolved::Blob(b"../x".to_vec()));
    }

    #[tokio::test]
    async fn test_nested_lookup() {
        let store = MemoryDagStore::new();
        let root = sample_tree(&store);

        let result = resolve(&store, root, &["sub", "inner.txt"]).await.unwrap();
        assert_eq!(result, Resolved::Blob(b"hi".to_vec()));
    }

    #[tokio::test]
    async fn test_missing_segment_is_not_found() {
        let store = MemoryDagStore::new();
        let root = sample_tree(&store);

        let err = resolve(&store, root, &["missing"]).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(
            err,
            ResolveError::NotFound { ref segment, index: 0 } if segment == "missing"
        ));
    }

    #[tokio::test]
    async fn test_descending_into_file_is_not_found_class() {
        let store = MemoryDagStore::new();
        let root = sample_tree(&store);

        let err = resolve(&store, root, &["a.txt", "deeper"]).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(
            err,
            ResolveError::NotADirectory { ref segment, index: 1 } if segment == "deeper"
        ));
    }

    #[tokio::test]
    async fn test_missing_block_is_unavailable_not_not_found() {
        let store = MemoryDagStore::new();
        let dangling = crate::dag::hasher::file_id(b"never stored");

        let err = resolve(&store, dangling, &[]).await.unwrap_err();
        assert!(!err.is_not_found());
        assert!(matches!(err, ResolveError::Unavailable { id, .. } if id == dangling));
    }

    struct CancelingReader;

    #[async_trait]
    impl DagReader for CancelingReader {
        async fn get_node(&self, _id: &ContentId) -> Result<DagNode, DagError> {
            Err(DagError::Canceled)
        }
    }

    #[tokio::test]
    async fn test_reader_cancellation_propagates() {
        let reader = CancelingReader;
        let root = crate::dag::hasher::file_id(b"x");
        let err = resolve(&reader, root, &["a"]).await.unwrap_err();
        assert!(matches!(err, ResolveError::Canceled));
    }

    #[tokio::test]
    async fn test_readme_detection() {
        let store = MemoryDagStore::new();
        let content = store.put_file(b"# hello").unwrap();
        let entries = vec![
            DirEntry {
                name: "src".to_string(),
                id: content,
                size: 0,
                kind: NodeKind::Directory,
            },
            DirEntry {
                name: "ReadMe.md".to_string(),
                id: content,
                size: 7,
                kind: NodeKind::File,
            },
        ];

        assert_eq!(find_readme(&entries).map(|e| e.name.as_str()), Some("ReadMe.md"));
        let blob = readme(&store, &entries).await.unwrap();
        assert_eq!(blob, Some(b"# hello".to_vec()));
    }

    #[tokio::test]
    async fn test_readme_absent() {
        let store = MemoryDagStore::new();
        let entries = vec![];
        assert!(find_readme(&entries).is_none());
        assert_eq!(readme(&store, &entries).await.unwrap(), None);
    }
}
