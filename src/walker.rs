//! Directory traversal.
//!
//! Collects the files a run will sort and, once everything has been moved,
//! prunes the folders left empty behind them.

use crate::config::CompiledFilters;
use crate::file_category::Category;
use crate::file_organizer::{OrganizeError, OrganizeResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Files found under a base directory.
#[derive(Debug, Default)]
pub struct Walk {
    /// Regular files to sort, depth-first and sorted by name within a folder.
    pub files: Vec<PathBuf>,
    /// Paths that could not be read or listed, with the reason.
    pub unreadable: Vec<(PathBuf, String)>,
}

impl Walk {
    fn record_failed(&mut self, dir: &Path, failed: Vec<std::io::Error>) {
        for e in failed {
            self.unreadable.push((dir.to_path_buf(), e.to_string()));
        }
    }
}

/// Result type for directory walks.
pub type WalkResult<T> = OrganizeResult<T>;

/// Recursively collects regular files under `base_path`.
///
/// Category folders directly under `base_path` are skipped, so sorting an
/// already sorted folder is a no-op. Symlinks are neither followed nor
/// collected. Filters see paths relative to `base_path`.
///
/// # Errors
///
/// Fails only if `base_path` itself cannot be listed; unreadable
/// subdirectories and entries are reported in [`Walk::unreadable`].
pub fn collect_files(base_path: &Path, filters: &CompiledFilters) -> WalkResult<Walk> {
    let mut walk = Walk::default();
    let listing = sorted_entries(base_path).map_err(|e| OrganizeError::DirectoryReadFailed {
        path: base_path.to_path_buf(),
        source: e,
    })?;
    walk.record_failed(base_path, listing.failed);

    for path in listing.entries {
        if is_category_dir(&path) {
            continue;
        }
        visit(base_path, &path, filters, &mut walk);
    }

    Ok(walk)
}

fn visit(base_path: &Path, path: &Path, filters: &CompiledFilters, walk: &mut Walk) {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            walk.unreadable.push((path.to_path_buf(), e.to_string()));
            return;
        }
    };
    let rel_path = path.strip_prefix(base_path).unwrap_or(path);

    if metadata.is_file() {
        if filters.should_include(rel_path) {
            walk.files.push(path.to_path_buf());
        }
    } else if metadata.is_dir() {
        if !filters.should_descend(rel_path) {
            return;
        }
        match sorted_entries(path) {
            Ok(listing) => {
                walk.record_failed(path, listing.failed);
                for child in listing.entries {
                    visit(base_path, &child, filters, walk);
                }
            }
            Err(e) => walk.unreadable.push((path.to_path_buf(), e.to_string())),
        }
    }
}

/// Directory entries sorted by path, plus the entries that failed to read.
struct Listing {
    entries: Vec<PathBuf>,
    failed: Vec<std::io::Error>,
}

fn sorted_entries(dir: &Path) -> std::io::Result<Listing> {
    let mut listing = Listing {
        entries: Vec::new(),
        failed: Vec::new(),
    };
    for entry in fs::read_dir(dir)? {
        match entry {
            Ok(entry) => listing.entries.push(entry.path()),
            Err(e) => listing.failed.push(e),
        }
    }
    listing.entries.sort();
    Ok(listing)
}

/// True for a real category folder directly under the base.
fn is_category_dir(path: &Path) -> bool {
    let name = file_name(path);
    Category::ALL.iter().any(|c| c.dir_name() == name) && path.is_dir()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Removes every empty directory below `base_path`, deepest first.
///
/// Only directories the walk would descend into are touched: category
/// folders, hidden folders and folders excluded by `filters` are kept along
/// with everything inside them. `base_path` itself is never removed. A
/// folder that only contained empty folders is removed as well. Directories
/// that cannot be listed or removed are left in place.
///
/// Returns the removed directories.
pub fn remove_empty_dirs(base_path: &Path, filters: &CompiledFilters) -> Vec<PathBuf> {
    let mut removed = Vec::new();
    if let Ok(listing) = sorted_entries(base_path) {
        for child in listing.entries {
            if is_category_dir(&child) {
                continue;
            }
            prune(base_path, &child, filters, &mut removed);
        }
    }
    removed
}

/// Returns true if `dir` was removed.
fn prune(
    base_path: &Path,
    dir: &Path,
    filters: &CompiledFilters,
    removed: &mut Vec<PathBuf>,
) -> bool {
    let is_real_dir = fs::symlink_metadata(dir)
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_real_dir {
        return false;
    }

    let rel_path = dir.strip_prefix(base_path).unwrap_or(dir);
    if !filters.should_descend(rel_path) {
        return false;
    }

    let Ok(listing) = sorted_entries(dir) else {
        return false;
    };
    if !listing.failed.is_empty() {
        return false;
    }

    let mut remaining = listing.entries.len();
    for child in &listing.entries {
        if prune(base_path, child, filters, removed) {
            remaining -= 1;
        }
    }

    if remaining == 0 && fs::remove_dir(dir).is_ok() {
        removed.push(dir.to_path_buf());
        return true;
    }
    false
}
