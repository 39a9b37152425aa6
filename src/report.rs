//! Summary of a sorting run.

use crate::file_category::Category;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// A path paired with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathIssue {
    pub path: PathBuf,
    pub reason: String,
}

impl PathIssue {
    pub fn new(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// An archive that was unpacked after being moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnpackedArchive {
    pub archive: PathBuf,
    pub destination: PathBuf,
    pub entries: usize,
}

/// Everything a run did, or in a dry run would do.
#[derive(Debug, Clone, Serialize)]
pub struct SortReport {
    /// RFC 3339 time the run started.
    pub timestamp: String,
    pub base_path: PathBuf,
    pub dry_run: bool,
    /// New file names per category, in processing order.
    pub files: BTreeMap<Category, Vec<String>>,
    pub known_extensions: BTreeSet<String>,
    pub unknown_extensions: BTreeSet<String>,
    pub unpacked: Vec<UnpackedArchive>,
    /// Non-fatal problems: unreadable folders, archives that could not be unpacked.
    pub warnings: Vec<PathIssue>,
    /// Files that could not be moved.
    pub failures: Vec<PathIssue>,
    pub removed_dirs: Vec<PathBuf>,
}

impl SortReport {
    /// Creates an empty report stamped with the current time.
    pub fn new(base_path: &Path, dry_run: bool) -> Self {
        Self {
            timestamp: chrono::Local::now().to_rfc3339(),
            base_path: base_path.to_path_buf(),
            dry_run,
            files: BTreeMap::new(),
            known_extensions: BTreeSet::new(),
            unknown_extensions: BTreeSet::new(),
            unpacked: Vec::new(),
            warnings: Vec::new(),
            failures: Vec::new(),
            removed_dirs: Vec::new(),
        }
    }

    /// Records a sorted file under its category.
    ///
    /// The extension goes into the known or unknown set depending on the
    /// category; files without an extension only add the name.
    pub fn record_file(&mut self, category: Category, new_name: String, extension: Option<&str>) {
        self.files.entry(category).or_default().push(new_name);

        if let Some(ext) = extension {
            if category == Category::Unknown {
                self.unknown_extensions.insert(ext.to_string());
            } else {
                self.known_extensions.insert(ext.to_string());
            }
        }
    }

    pub fn total_files(&self) -> usize {
        self.files.values().map(Vec::len).sum()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// File counts keyed by category directory name.
    pub fn category_counts(&self) -> HashMap<String, usize> {
        self.files
            .iter()
            .map(|(category, names)| (category.dir_name().to_string(), names.len()))
            .collect()
    }

    /// Files recorded under `category`.
    pub fn files_in(&self, category: Category) -> &[String] {
        self.files.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_file_tracks_extensions() {
        let mut report = SortReport::new(Path::new("/tmp/inbox"), false);
        report.record_file(Category::Images, "a.png".to_string(), Some("png"));
        report.record_file(Category::Images, "b.png".to_string(), Some("png"));
        report.record_file(Category::Unknown, "c.xyz".to_string(), Some("xyz"));
        report.record_file(Category::Unknown, "README".to_string(), None);

        assert_eq!(report.total_files(), 4);
        assert_eq!(report.files_in(Category::Images), ["a.png", "b.png"]);
        assert!(report.files_in(Category::Video).is_empty());
        assert_eq!(
            report.known_extensions.iter().collect::<Vec<_>>(),
            vec!["png"]
        );
        assert_eq!(
            report.unknown_extensions.iter().collect::<Vec<_>>(),
            vec!["xyz"]
        );
    }

    #[test]
    fn test_category_counts() {
        let mut report = SortReport::new(Path::new("/tmp/inbox"), true);
        report.record_file(Category::Documents, "a.pdf".to_string(), Some("pdf"));
        report.record_file(Category::Audio, "b.mp3".to_string(), Some("mp3"));
        report.record_file(Category::Audio, "c.ogg".to_string(), Some("ogg"));

        let counts = report.category_counts();
        assert_eq!(counts.get("documents"), Some(&1));
        assert_eq!(counts.get("audio"), Some(&2));
        assert_eq!(counts.get("images"), None);
        assert!(!report.has_failures());
    }

    #[test]
    fn test_serializes_categories_as_lowercase_keys() {
        let mut report = SortReport::new(Path::new("/tmp/inbox"), false);
        report.record_file(Category::Archives, "x.zip".to_string(), Some("zip"));
        report
            .failures
            .push(PathIssue::new("/tmp/inbox/y.txt", "permission denied"));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["files"]["archives"][0], "x.zip");
        assert_eq!(json["known_extensions"][0], "zip");
        assert_eq!(json["failures"][0]["reason"], "permission denied");
        assert_eq!(json["dry_run"], false);
    }
}
