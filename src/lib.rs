//! file-sorter - sort a folder into category subfolders by extension
//!
//! This library classifies files by extension, normalizes their names
//! (Cyrillic transliteration plus underscore sanitization), moves them into
//! per-category folders, unpacks archives and prunes empty folders. Runs
//! are configured through TOML files and can be simulated with a dry run.

pub mod archive;
pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod normalize;
pub mod output;
pub mod report;
pub mod sorter;
pub mod walker;

pub use config::{CompiledFilters, ConfigError, RunOptions, SorterConfig};
pub use file_category::{Category, ExtensionMapper};
pub use file_organizer::{FileOrganizer, MovedFile, OrganizeError};
pub use normalize::{normalize, transliterate};
pub use report::SortReport;
pub use sorter::{Sorter, SorterError};

pub use cli::{Args, run_cli};
