//! Directory walker implementation using jwalk for parallel traversal.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing one or more
//! root directories and collecting the regular files that are candidates
//! for comparison.
//!
//! # Features
//!
//! - Parallel directory reading using jwalk's rayon pool
//! - Deterministic output (children sorted by name)
//! - Depth limit and pruned directories
//! - Case-insensitive file name masks via the `ignore` crate's override globs
//! - Symlinks are never followed
//! - Files reachable from overlapping roots are reported once

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::overrides::{Override, OverrideBuilder};
use jwalk::WalkDir;

use super::{FileEntry, ScanError, WalkerConfig};

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root directories, canonicalized
    roots: Vec<PathBuf>,
    /// Walker configuration
    config: WalkerConfig,
    /// Excluded directories, canonicalized where possible
    exclude: Arc<Vec<PathBuf>>,
    /// Compiled masks, `None` when every file matches
    masks: Option<Override>,
}

impl Walker {
    /// Create a new walker for the given roots.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::NotFound`] or [`ScanError::NotADirectory`] for an
    /// unusable root and [`ScanError::InvalidPattern`] for a bad mask.
    pub fn new(roots: Vec<PathBuf>, config: WalkerConfig) -> Result<Self, ScanError> {
        let roots = roots
            .iter()
            .map(|root| validate_root(root))
            .collect::<Result<Vec<_>, _>>()?;

        let exclude = config
            .exclude
            .iter()
            .map(|dir| dir.canonicalize().unwrap_or_else(|_| dir.clone()))
            .collect();

        let masks = build_masks(&config.masks)?;

        Ok(Self {
            roots,
            config,
            exclude: Arc::new(exclude),
            masks,
        })
    }

    /// Canonical roots that will be walked.
    #[must_use]
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Check if a file name passes the configured masks.
    fn passes_mask(&self, path: &Path) -> bool {
        let Some(masks) = &self.masks else {
            return true;
        };
        let Some(name) = path.file_name() else {
            return false;
        };
        masks.matched(Path::new(name), false).is_whitelist()
    }

    /// Check if a file passes size filters.
    fn passes_size_filter(&self, size: u64) -> bool {
        if size < self.config.min_size {
            return false;
        }
        if let Some(max) = self.config.max_size {
            if size > max {
                return false;
            }
        }
        true
    }

    /// Walk every root, yielding file entries.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. Roots are walked in the order given.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileEntry, ScanError>> + '_ {
        let mut seen: HashSet<PathBuf> = HashSet::new();
        self.roots
            .iter()
            .flat_map(move |root| self.walk_root(root))
            .filter(move |result| match result {
                Ok(entry) => {
                    let fresh = seen.insert(entry.path.clone());
                    if !fresh {
                        log::trace!("Already seen: {}", entry.path.display());
                    }
                    fresh
                }
                Err(_) => true,
            })
    }

    fn walk_root<'a>(
        &'a self,
        root: &'a Path,
    ) -> impl Iterator<Item = Result<FileEntry, ScanError>> + 'a {
        let exclude = Arc::clone(&self.exclude);

        let mut walk_dir = WalkDir::new(root)
            .follow_links(false)
            .skip_hidden(self.config.skip_hidden)
            .process_read_dir(move |_depth, _path, _read_dir_state, children| {
                // Prune excluded directories before jwalk descends into them
                children.retain(|child| match child {
                    Ok(entry) => {
                        !(entry.file_type().is_dir() && is_excluded(&entry.path(), &exclude))
                    }
                    Err(_) => true,
                });
                // Sort children for deterministic output
                children.sort_by(|a, b| match (a, b) {
                    (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                    (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                    (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                    (Err(_), Err(_)) => std::cmp::Ordering::Equal,
                });
            });
        if let Some(depth) = self.config.max_depth {
            // jwalk counts the root's own children as depth 1
            walk_dir = walk_dir.max_depth(depth.saturating_add(1));
        }

        log::debug!("Walking {}", root.display());

        walk_dir.into_iter().filter_map(move |entry_result| match entry_result {
            Ok(entry) => {
                let file_type = entry.file_type();
                if !file_type.is_file() {
                    return None;
                }
                let path = entry.path();
                if !self.passes_mask(&path) {
                    log::trace!("Skipping file due to mask: {}", path.display());
                    return None;
                }
                let metadata = match std::fs::symlink_metadata(&path) {
                    Ok(m) => m,
                    Err(e) => return Some(Err(handle_io_error(&path, e))),
                };
                let size = metadata.len();
                if !self.passes_size_filter(size) {
                    log::trace!(
                        "Skipping file due to size filter ({}): {}",
                        size,
                        path.display()
                    );
                    return None;
                }
                Some(Ok(FileEntry::new(path, size)))
            }
            Err(e) => {
                let path = e
                    .path()
                    .map_or_else(|| root.to_path_buf(), std::borrow::ToOwned::to_owned);
                log::warn!("Walker error for {}: {}", path.display(), e);
                Some(Err(ScanError::Io {
                    path,
                    source: std::io::Error::other(e.to_string()),
                }))
            }
        })
    }
}

fn validate_root(root: &Path) -> Result<PathBuf, ScanError> {
    let canonical = root.canonicalize().map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ScanError::NotFound(root.to_path_buf()),
        std::io::ErrorKind::PermissionDenied => ScanError::PermissionDenied(root.to_path_buf()),
        _ => ScanError::Io {
            path: root.to_path_buf(),
            source: e,
        },
    })?;
    if !canonical.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    Ok(canonical)
}

fn is_excluded(dir: &Path, exclude: &[PathBuf]) -> bool {
    let excluded = exclude.iter().any(|ex| dir == ex);
    if excluded {
        log::debug!("Excluding directory: {}", dir.display());
    }
    excluded
}

fn build_masks(masks: &[String]) -> Result<Option<Override>, ScanError> {
    if masks.is_empty() {
        return Ok(None);
    }
    let invalid = |pattern: &str, e: ignore::Error| ScanError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    };

    let mut builder = OverrideBuilder::new("/");
    builder
        .case_insensitive(true)
        .map_err(|e| invalid("", e))?;
    for mask in masks {
        builder.add(mask).map_err(|e| invalid(mask, e))?;
    }
    let built = builder
        .build()
        .map_err(|e| invalid(&masks.join(","), e))?;
    Ok(Some(built))
}

/// Handle I/O errors during file access.
fn handle_io_error(path: &Path, error: std::io::Error) -> ScanError {
    use std::io::ErrorKind;

    match error.kind() {
        ErrorKind::PermissionDenied => {
            log::warn!("Permission denied: {}", path.display());
            ScanError::PermissionDenied(path.to_path_buf())
        }
        ErrorKind::NotFound => {
            log::debug!("File not found (may have been deleted): {}", path.display());
            ScanError::NotFound(path.to_path_buf())
        }
        _ => {
            log::warn!("I/O error for {}: {}", path.display(), error);
            ScanError::Io {
                path: path.to_path_buf(),
                source: error,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// root/
    ///   a.txt, B.JPG, .hidden
    ///   sub/ c.txt, d.jpg
    ///   sub/deep/ e.txt
    ///   skip/ f.txt
    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("a.txt"), "alpha").unwrap();
        fs::write(root.join("B.JPG"), "bravo").unwrap();
        fs::write(root.join(".hidden"), "hidden").unwrap();
        fs::write(root.join("empty.txt"), "").unwrap();
        fs::create_dir_all(root.join("sub/deep")).unwrap();
        fs::write(root.join("sub/c.txt"), "charlie").unwrap();
        fs::write(root.join("sub/d.jpg"), "delta").unwrap();
        fs::write(root.join("sub/deep/e.txt"), "echo").unwrap();
        fs::create_dir(root.join("skip")).unwrap();
        fs::write(root.join("skip/f.txt"), "foxtrot").unwrap();
        dir
    }

    fn names(walker: &Walker) -> Vec<String> {
        walker
            .walk()
            .filter_map(Result::ok)
            .map(|e| e.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_walker_finds_files_sorted() {
        let dir = create_test_dir();
        let walker = Walker::new(vec![dir.path().to_path_buf()], WalkerConfig::default()).unwrap();

        // Depth-first in byte order; the empty file is skipped by the default min_size of 1
        assert_eq!(
            names(&walker),
            vec![".hidden", "B.JPG", "a.txt", "f.txt", "c.txt", "d.jpg", "e.txt"]
        );
    }

    #[test]
    fn test_walker_depth_zero() {
        let dir = create_test_dir();
        let config = WalkerConfig {
            max_depth: Some(0),
            ..Default::default()
        };
        let walker = Walker::new(vec![dir.path().to_path_buf()], config).unwrap();

        assert_eq!(names(&walker), vec![".hidden", "B.JPG", "a.txt"]);
    }

    #[test]
    fn test_walker_depth_one() {
        let dir = create_test_dir();
        let config = WalkerConfig {
            max_depth: Some(1),
            ..Default::default()
        };
        let walker = Walker::new(vec![dir.path().to_path_buf()], config).unwrap();

        let found = names(&walker);
        assert!(found.contains(&"c.txt".to_string()));
        assert!(!found.contains(&"e.txt".to_string()));
    }

    #[test]
    fn test_walker_excludes_directory() {
        let dir = create_test_dir();
        let config = WalkerConfig {
            exclude: vec![dir.path().join("skip"), dir.path().join("sub/deep")],
            ..Default::default()
        };
        let walker = Walker::new(vec![dir.path().to_path_buf()], config).unwrap();

        let found = names(&walker);
        assert!(!found.contains(&"f.txt".to_string()));
        assert!(!found.contains(&"e.txt".to_string()));
        assert!(found.contains(&"c.txt".to_string()));
    }

    #[test]
    fn test_walker_masks_case_insensitive() {
        let dir = create_test_dir();
        let config = WalkerConfig {
            masks: vec!["*.jpg".to_string()],
            ..Default::default()
        };
        let walker = Walker::new(vec![dir.path().to_path_buf()], config).unwrap();

        assert_eq!(names(&walker), vec!["B.JPG", "d.jpg"]);
    }

    #[test]
    fn test_walker_invalid_mask() {
        let dir = create_test_dir();
        let config = WalkerConfig {
            masks: vec!["[unclosed".to_string()],
            ..Default::default()
        };
        let result = Walker::new(vec![dir.path().to_path_buf()], config);

        assert!(matches!(result, Err(ScanError::InvalidPattern { .. })));
    }

    #[test]
    fn test_walker_skip_hidden() {
        let dir = create_test_dir();
        let config = WalkerConfig {
            skip_hidden: true,
            ..Default::default()
        };
        let walker = Walker::new(vec![dir.path().to_path_buf()], config).unwrap();

        assert!(!names(&walker).contains(&".hidden".to_string()));
    }

    #[test]
    fn test_walker_size_filters() {
        let dir = create_test_dir();
        let config = WalkerConfig {
            min_size: 0,
            max_size: Some(5),
            ..Default::default()
        };
        let walker = Walker::new(vec![dir.path().to_path_buf()], config).unwrap();

        let entries: Vec<FileEntry> = walker.walk().filter_map(Result::ok).collect();
        assert!(entries.iter().all(|e| e.size <= 5));
        assert!(entries.iter().any(|e| e.size == 0));
    }

    #[test]
    fn test_walker_overlapping_roots_reported_once() {
        let dir = create_test_dir();
        let roots = vec![dir.path().to_path_buf(), dir.path().join("sub")];
        let walker = Walker::new(roots, WalkerConfig::default()).unwrap();

        let found = names(&walker);
        assert_eq!(found.iter().filter(|n| *n == "c.txt").count(), 1);
        assert_eq!(walker.roots().len(), 2);
    }

    #[test]
    fn test_walker_handles_nonexistent_path() {
        let result = Walker::new(
            vec![PathBuf::from("/definitely/not/here")],
            WalkerConfig::default(),
        );
        assert!(matches!(result, Err(ScanError::NotFound(_))));
    }

    #[test]
    fn test_walker_rejects_file_root() {
        let dir = create_test_dir();
        let result = Walker::new(vec![dir.path().join("a.txt")], WalkerConfig::default());
        assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_walker_does_not_follow_symlinks() {
        let dir = create_test_dir();
        std::os::unix::fs::symlink(dir.path().join("sub"), dir.path().join("link")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("a.txt"), dir.path().join("a_link.txt"))
            .unwrap();

        let walker = Walker::new(vec![dir.path().to_path_buf()], WalkerConfig::default()).unwrap();
        let found = names(&walker);

        assert_eq!(found.iter().filter(|n| *n == "c.txt").count(), 1);
        assert!(!found.contains(&"a_link.txt".to_string()));
    }
}
