/// One sorting run over a folder.
///
/// A run has two phases. [`Sorter::plan`] walks the folder and decides, for
/// every file, its category and collision-free destination without touching
/// the filesystem. [`Sorter::execute`] then performs the moves one by one,
/// unpacks archives and prunes empty folders. A dry run stops after the
/// plan.
use crate::archive;
use crate::config::{CompiledFilters, ConfigError, RunOptions, SorterConfig};
use crate::file_category::{Category, ExtensionMapper};
use crate::file_organizer::{FileOrganizer, MovedFile, OrganizeError, OrganizeResult};
use crate::normalize::split_file_name;
use crate::report::{PathIssue, SortReport, UnpackedArchive};
use crate::walker;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Errors that prevent a run from starting.
#[derive(Debug)]
pub enum SorterError {
    /// The target path is missing or not a directory.
    NotADirectory(PathBuf),
    /// The configuration could not be turned into a mapper or filters.
    Config(ConfigError),
}

impl std::fmt::Display for SorterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SorterError::NotADirectory(path) => write!(
                f,
                "The provided path is not a valid directory: {}",
                path.display()
            ),
            SorterError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for SorterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SorterError::NotADirectory(_) => None,
            SorterError::Config(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SorterError {
    fn from(e: ConfigError) -> Self {
        SorterError::Config(e)
    }
}

/// Where a single file is going.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub category: Category,
    /// Lowercased extension, if the file has one.
    pub extension: Option<String>,
    pub destination: PathBuf,
}

impl PlannedMove {
    /// The normalized file name at the destination.
    pub fn new_name(&self) -> String {
        self.destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// The outcome of walking a folder.
#[derive(Debug, Default)]
pub struct Plan {
    pub moves: Vec<PlannedMove>,
    /// Folders that could not be listed.
    pub warnings: Vec<PathIssue>,
}

/// Sorts one folder.
#[derive(Debug)]
pub struct Sorter {
    base_path: PathBuf,
    mapper: ExtensionMapper,
    filters: CompiledFilters,
    options: RunOptions,
}

impl Sorter {
    /// Prepares a run over `base_path` using `config`.
    ///
    /// # Errors
    ///
    /// Fails if `base_path` is not a directory, if a `[categories]` key is
    /// not a category, or if a filter pattern does not compile.
    pub fn new(base_path: &Path, config: &SorterConfig) -> Result<Self, SorterError> {
        if !base_path.is_dir() {
            return Err(SorterError::NotADirectory(base_path.to_path_buf()));
        }

        Ok(Self {
            base_path: base_path.to_path_buf(),
            mapper: config.extension_mapper()?,
            filters: config.compile_filters()?,
            options: config.options.clone(),
        })
    }

    /// Replaces the run options, e.g. with command-line overrides.
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RunOptions {
        &self.options
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Walks the folder and assigns every file a destination.
    ///
    /// Nothing is written. Destinations are unique both against files
    /// already on disk and against each other.
    pub fn plan(&self) -> OrganizeResult<Plan> {
        let walk = walker::collect_files(&self.base_path, &self.filters)?;
        let mut claimed = HashSet::new();
        let mut moves = Vec::with_capacity(walk.files.len());

        for source in walk.files {
            let (stem, extension) = split_file_name(&source);
            let category = self.mapper.categorize(extension.as_deref());
            let category_dir = self.base_path.join(category.dir_name());
            let destination = FileOrganizer::unique_destination(
                &category_dir,
                &stem,
                extension.as_deref(),
                &claimed,
            );
            claimed.insert(destination.clone());

            moves.push(PlannedMove {
                source,
                category,
                extension,
                destination,
            });
        }

        Ok(Plan {
            moves,
            warnings: walk
                .unreadable
                .into_iter()
                .map(|(path, reason)| PathIssue::new(path, reason))
                .collect(),
        })
    }

    /// Plans and, unless `dry_run` is set, executes a run.
    pub fn run(&self, dry_run: bool) -> OrganizeResult<SortReport> {
        let plan = self.plan()?;
        Ok(self.execute(plan, dry_run, |_| {}))
    }

    /// Executes a plan, calling `on_step` after each file.
    ///
    /// A file that fails to move is recorded in [`SortReport::failures`] and
    /// the run carries on with the next one.
    pub fn execute<F>(&self, plan: Plan, dry_run: bool, mut on_step: F) -> SortReport
    where
        F: FnMut(&PlannedMove),
    {
        let mut report = SortReport::new(&self.base_path, dry_run);
        report.warnings = plan.warnings;

        for planned in &plan.moves {
            if dry_run {
                report.record_file(
                    planned.category,
                    planned.new_name(),
                    planned.extension.as_deref(),
                );
            } else {
                self.apply(planned, &mut report);
            }
            on_step(planned);
        }

        if !dry_run && self.options.remove_empty_dirs {
            report.removed_dirs = walker::remove_empty_dirs(&self.base_path, &self.filters);
        }

        report
    }

    fn apply(&self, planned: &PlannedMove, report: &mut SortReport) {
        let moved = FileOrganizer::move_to_category(
            &self.base_path,
            &planned.source,
            planned.category,
            &planned.new_name(),
        );

        match moved {
            Ok(moved) => {
                report.record_file(
                    moved.category,
                    moved.new_name(),
                    planned.extension.as_deref(),
                );
                if moved.category == Category::Archives && self.options.unpack_archives {
                    self.unpack_archive(&moved, report);
                }
            }
            Err(e) => {
                let reason = match &e {
                    OrganizeError::FileMoveFailure { source_error, .. } => source_error.to_string(),
                    other => other.to_string(),
                };
                report
                    .failures
                    .push(PathIssue::new(planned.source.clone(), reason));
            }
        }
    }

    /// Unpacks a moved archive next to itself, into a new folder named after
    /// its stem (`data`, then `data_1`, ...).
    ///
    /// An existing folder is never unpacked into. On failure the archive
    /// stays where it is, the folder created for it is removed again, and a
    /// warning is recorded.
    fn unpack_archive(&self, moved: &MovedFile, report: &mut SortReport) {
        let archives_dir = moved
            .new_path
            .parent()
            .unwrap_or(&self.base_path)
            .to_path_buf();
        let stem = moved
            .new_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let destination =
            FileOrganizer::unique_destination(&archives_dir, &stem, None, &HashSet::new());

        match archive::unpack(&moved.new_path, &destination) {
            Ok(entries) => report.unpacked.push(UnpackedArchive {
                archive: moved.new_path.clone(),
                destination,
                entries,
            }),
            Err(e) => {
                if destination.is_dir() {
                    let _ = fs::remove_dir_all(&destination);
                }
                report
                    .warnings
                    .push(PathIssue::new(moved.new_path.clone(), e.to_string()));
            }
        }
    }
}
