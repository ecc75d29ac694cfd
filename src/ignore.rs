//! Ignore patterns for ingestion.
//!
//! Patterns use glob syntax (`*`, `?`). A pattern without a separator is
//! matched against the final path segment, so `*.exe` excludes matching
//! files at any depth. A pattern with a separator is matched against the
//! whole root-relative path, with wildcards stopped at separators; a
//! trailing `/*` additionally covers the whole subtree, so `baz/*` matches
//! `baz/bar` and any deeper descendant of `baz`.

use crate::error::IgnoreError;
use glob::{MatchOptions, Pattern};

/// Wildcards never cross a directory separator.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
struct IgnorePattern {
    pattern: Pattern,
    /// Set when the source pattern ends in `/*`: the directory prefix
    /// whose entire subtree the pattern covers. Compiled, since the
    /// prefix may itself contain wildcards.
    subtree_prefix: Option<Pattern>,
    has_separator: bool,
}

/// Compiled, immutable ignore pattern set. Matching is pure.
#[derive(Debug, Clone, Default)]
pub struct IgnoreSet {
    patterns: Vec<IgnorePattern>,
}

impl IgnoreSet {
    /// Compile a pattern list. Malformed glob syntax is reported here,
    /// never at match time.
    pub fn new<I, S>(patterns: I) -> Result<Self, IgnoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut compiled = Vec::new();
        for raw in patterns {
            let raw = raw.as_ref();
            let pattern = Pattern::new(raw).map_err(|source| IgnoreError {
                pattern: raw.to_string(),
                source,
            })?;
            let subtree_prefix = raw
                .strip_suffix("/*")
                .map(|prefix| {
                    Pattern::new(prefix).map_err(|source| IgnoreError {
                        pattern: raw.to_string(),
                        source,
                    })
                })
                .transpose()?;
            compiled.push(IgnorePattern {
                pattern,
                subtree_prefix,
                has_separator: raw.contains('/'),
            });
        }
        Ok(Self { patterns: compiled })
    }

    /// Whether a root-relative path (with `/` separators) matches any
    /// pattern. First match wins.
    pub fn matches(&self, rel_path: &str) -> bool {
        for p in &self.patterns {
            if p.has_separator {
                if p.pattern.matches_with(rel_path, MATCH_OPTIONS) {
                    return true;
                }
                if let Some(prefix) = &p.subtree_prefix {
                    // The prefix covers the directory itself and every
                    // descendant, so try each leading component run.
                    if prefix.matches_with(rel_path, MATCH_OPTIONS) {
                        return true;
                    }
                    for (i, _) in rel_path.match_indices('/') {
                        if prefix.matches_with(&rel_path[..i], MATCH_OPTIONS) {
                            return true;
                        }
                    }
                }
            } else {
                let base = rel_path.rsplit('/').next().unwrap_or(rel_path);
                if p.pattern.matches_with(base, MATCH_OPTIONS) {
                    return true;
                }
            }
        }
        false
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
