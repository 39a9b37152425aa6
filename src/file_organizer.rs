/// Moving files into category directories.
///
/// This module creates category subdirectories inside the folder being
/// sorted, picks a destination name that does not clobber anything, and
/// renames files into place.
use crate::file_category::Category;
use crate::normalize::join_file_name;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A file that was moved (or, in a dry run, would be moved).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedFile {
    /// The path of the file before sorting.
    pub original_path: PathBuf,
    /// The path of the file after sorting.
    pub new_path: PathBuf,
    /// The category the file was moved to.
    pub category: Category,
}

impl MovedFile {
    /// The file name at the destination.
    pub fn new_name(&self) -> String {
        self.new_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Errors that can occur during file organization operations.
#[derive(Debug)]
pub enum OrganizeError {
    /// The base directory path is invalid or doesn't exist.
    InvalidBasePath {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to list a directory.
    DirectoryReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to create a category directory.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to move a file to its category directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: std::io::Error,
    },
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBasePath { path, source } => {
                write!(f, "Invalid base path {}: {}", path.display(), source)
            }
            Self::DirectoryReadFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidBasePath { source, .. }
            | Self::DirectoryReadFailed { source, .. }
            | Self::DirectoryCreationFailed { source, .. } => Some(source),
            Self::FileMoveFailure { source_error, .. } => Some(source_error),
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Moves files into category subdirectories of a base directory.
pub struct FileOrganizer;

impl FileOrganizer {
    /// Picks a destination in `dir` that is neither on disk nor already claimed.
    ///
    /// Candidates are tried in order: `stem.ext`, `stem_1.ext`, `stem_2.ext`, ...
    ///
    /// # Examples
    ///
    /// ```
    /// use file_sorter::file_organizer::FileOrganizer;
    /// use std::collections::HashSet;
    /// use std::path::{Path, PathBuf};
    ///
    /// let dir = Path::new("/non/existent/images");
    /// let mut claimed = HashSet::new();
    /// claimed.insert(dir.join("photo.png"));
    ///
    /// let dest = FileOrganizer::unique_destination(dir, "photo", Some("png"), &claimed);
    /// assert_eq!(dest, PathBuf::from("/non/existent/images/photo_1.png"));
    /// ```
    pub fn unique_destination(
        dir: &Path,
        stem: &str,
        extension: Option<&str>,
        claimed: &HashSet<PathBuf>,
    ) -> PathBuf {
        let taken = |candidate: &Path| candidate.exists() || claimed.contains(candidate);

        let first = dir.join(join_file_name(stem, extension));
        if !taken(&first) {
            return first;
        }

        let mut counter = 1usize;
        loop {
            let candidate = dir.join(join_file_name(&format!("{}_{}", stem, counter), extension));
            if !taken(&candidate) {
                return candidate;
            }
            counter += 1;
        }
    }

    /// Moves a file into its category directory under a new name.
    ///
    /// If the category directory doesn't exist, it is created automatically.
    /// An existing file at the destination is never overwritten; pick a free
    /// name with [`FileOrganizer::unique_destination`] first.
    ///
    /// # Arguments
    ///
    /// * `base_path` - The root directory where category subdirectories live
    /// * `file_path` - The full path to the file to be moved
    /// * `category` - The category the file belongs to
    /// * `new_name` - The file name to use at the destination
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use file_sorter::file_category::Category;
    /// use file_sorter::file_organizer::FileOrganizer;
    /// use std::path::Path;
    ///
    /// let moved = FileOrganizer::move_to_category(
    ///     Path::new("/path/to/base"),
    ///     Path::new("/path/to/base/Фото 1.PNG"),
    ///     Category::Images,
    ///     "Foto_1.png",
    /// );
    ///
    /// match moved {
    ///     Ok(m) => println!("Moved to {}", m.new_path.display()),
    ///     Err(e) => eprintln!("Organization failed: {}", e),
    /// }
    /// ```
    pub fn move_to_category(
        base_path: &Path,
        file_path: &Path,
        category: Category,
        new_name: &str,
    ) -> OrganizeResult<MovedFile> {
        if !base_path.is_dir() {
            return Err(OrganizeError::InvalidBasePath {
                path: base_path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "base path is not an existing directory",
                ),
            });
        }

        let category_path = Self::ensure_category_dir(base_path, category)?;
        let destination_path = category_path.join(new_name);
        if destination_path.exists() {
            return Err(OrganizeError::FileMoveFailure {
                source: file_path.to_path_buf(),
                destination: destination_path,
                source_error: std::io::Error::new(
                    std::io::ErrorKind::AlreadyExists,
                    "destination already exists",
                ),
            });
        }

        fs::rename(file_path, &destination_path).map_err(|e| OrganizeError::FileMoveFailure {
            source: file_path.to_path_buf(),
            destination: destination_path.clone(),
            source_error: e,
        })?;

        Ok(MovedFile {
            original_path: file_path.to_path_buf(),
            new_path: destination_path,
            category,
        })
    }

    /// Creates `base_path/<category>` if it is missing and returns its path.
    pub fn ensure_category_dir(base_path: &Path, category: Category) -> OrganizeResult<PathBuf> {
        let category_path = base_path.join(category.dir_name());
        if !category_path.is_dir() {
            fs::create_dir(&category_path).map_err(|e| OrganizeError::DirectoryCreationFailed {
                path: category_path.clone(),
                source: e,
            })?;
        }
        Ok(category_path)
    }
}
