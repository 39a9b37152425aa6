//! Run configuration.
//!
//! Configuration is read from a TOML file and controls three things: run
//! options, extra extension mappings per category, and filter rules deciding
//! which files are left alone.
//!
//! # Configuration File Format
//!
//! ```toml
//! [options]
//! unpack_archives = true
//! remove_empty_dirs = true
//!
//! [categories]
//! images = ["webp", "gif"]
//! audio = ["flac"]
//!
//! [filters]
//! enable_hidden_files = false
//!
//! [filters.exclude]
//! filenames = [".DS_Store", "Thumbs.db"]
//! patterns = ["*.tmp", "node_modules/**"]
//! extensions = ["bak", "tmp"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//! ```
//!
//! Glob and regex rules are matched against the path relative to the folder
//! being sorted.

use crate::file_category::{Category, ExtensionMapper};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".sorterrc.toml";

/// Errors that can occur during configuration loading and filtering.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// A `[categories]` key that names no category, or names `unknown`.
    UnknownCategory(String),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(
                    f,
                    "Invalid glob pattern '{}': expected *.ext or dir/**",
                    pattern
                )
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::UnknownCategory(name) => write!(
                f,
                "Unknown category '{}': expected one of images, video, documents, audio, archives",
                name
            ),
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration file contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SorterConfig {
    #[serde(default)]
    pub options: RunOptions,

    /// Extra extensions per category directory name.
    #[serde(default)]
    pub categories: BTreeMap<String, Vec<String>>,

    #[serde(default)]
    pub filters: FilterRules,
}

/// Switches for the optional steps of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOptions {
    /// Unpack archives into `archives/<name>/` after moving them.
    #[serde(default = "default_true")]
    pub unpack_archives: bool,

    /// Remove folders left empty once their files are moved out.
    #[serde(default = "default_true")]
    pub remove_empty_dirs: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            unpack_archives: true,
            remove_empty_dirs: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Root-level filter rules configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether to sort hidden files and enter hidden folders. Defaults to false.
    #[serde(default)]
    pub enable_hidden_files: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Rules for including files (whitelist, overrides exclude rules).
    #[serde(default)]
    pub include: IncludeRules,
}

/// Rules for leaving files where they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., ".DS_Store", "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns to exclude (e.g., "*.tmp", "node_modules/**").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File extensions to exclude (e.g., "bak", "tmp", "log").
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules for including files, overriding exclude rules (whitelist).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    /// Glob patterns that override exclude rules.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl SorterConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.sorterrc.toml` in the current directory
    /// 3. Look for `~/.config/file-sorter/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read,
    /// or if any discovered file is not valid TOML.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("file-sorter")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Builds the extension mapper: defaults plus the `[categories]` table.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownCategory` for a key that is not a category
    /// directory name. `unknown` is rejected too, since unmapped extensions
    /// already land there.
    pub fn extension_mapper(&self) -> Result<ExtensionMapper, ConfigError> {
        let mut mapper = ExtensionMapper::default();
        for (name, extensions) in &self.categories {
            let category = Category::from_dir_name(name)
                .filter(|c| *c != Category::Unknown)
                .ok_or_else(|| ConfigError::UnknownCategory(name.clone()))?;
            for ext in extensions {
                mapper.add_extension_mapping(ext, category);
            }
        }
        Ok(mapper)
    }

    /// Compile the filter rules into matchers.
    ///
    /// # Errors
    ///
    /// Returns an error if any regex or glob patterns are invalid.
    pub fn compile_filters(&self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(&self.filters)
    }
}

/// Compiled filter rules, ready for matching.
#[derive(Debug)]
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    fn new(rules: &FilterRules) -> Result<Self, ConfigError> {
        let exclude_patterns = compile_globs(&rules.exclude.patterns)?;
        let include_patterns = compile_globs(&rules.include.patterns)?;

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.iter().cloned().collect(),
            exclude_extensions: rules
                .exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
            include_patterns,
        })
    }

    /// Check if a file should be sorted.
    ///
    /// `rel_path` is the file's path relative to the folder being sorted.
    /// Checks are performed in this order, with early termination:
    /// 1. Include patterns (whitelist) - if matched, always include
    /// 2. Hidden file filter - if hidden and disabled, exclude
    /// 3. Exact filename match - if matched, exclude
    /// 4. File extension match - if matched, exclude
    /// 5. Glob pattern match - if matched, exclude
    /// 6. Regex pattern match - if matched, exclude
    /// 7. Default: include
    pub fn should_include(&self, rel_path: &Path) -> bool {
        let file_name = file_name_of(rel_path);

        if self.matches_any(&self.include_patterns, rel_path) {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name.as_str()) {
            return false;
        }

        if let Some(ext) = rel_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.exclude_extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self.matches_any(&self.exclude_patterns, rel_path) {
            return false;
        }

        !self
            .exclude_regexes
            .iter()
            .any(|regex| regex.is_match(&file_name))
    }

    /// Check if the walker should enter a subdirectory.
    ///
    /// Only the hidden rule, exact names and glob patterns apply to folders.
    pub fn should_descend(&self, rel_dir: &Path) -> bool {
        let dir_name = file_name_of(rel_dir);

        if self.matches_any(&self.include_patterns, rel_dir) {
            return true;
        }

        if !self.enable_hidden_files && dir_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(dir_name.as_str()) {
            return false;
        }

        !self.matches_any(&self.exclude_patterns, rel_dir)
    }

    fn matches_any(&self, patterns: &[Pattern], path: &Path) -> bool {
        patterns.iter().any(|pattern| pattern.matches_path(path))
    }
}

impl Default for CompiledFilters {
    fn default() -> Self {
        // Default rules contain no patterns, so compilation cannot fail.
        Self {
            enable_hidden_files: false,
            exclude_filenames: HashSet::new(),
            exclude_extensions: HashSet::new(),
            exclude_patterns: Vec::new(),
            exclude_regexes: Vec::new(),
            include_patterns: Vec::new(),
        }
    }
}

fn compile_globs(patterns: &[String]) -> Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
        })
        .collect()
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filters_with(rules: FilterRules) -> CompiledFilters {
        SorterConfig {
            filters: rules,
            ..Default::default()
        }
        .compile_filters()
        .unwrap()
    }

    #[test]
    fn test_default_options_enable_everything() {
        let config = SorterConfig::default();
        assert!(config.options.unpack_archives);
        assert!(config.options.remove_empty_dirs);
        assert!(!config.filters.enable_hidden_files);
    }

    #[test]
    fn test_parse_full_config() {
        let config = SorterConfig::from_toml(
            r#"
            [options]
            unpack_archives = false

            [categories]
            images = ["webp", "gif"]
            Audio = ["flac"]

            [filters]
            enable_hidden_files = true

            [filters.exclude]
            extensions = ["bak"]
            "#,
        )
        .unwrap();

        assert!(!config.options.unpack_archives);
        assert!(config.options.remove_empty_dirs);
        assert!(config.filters.enable_hidden_files);
        assert_eq!(config.filters.exclude.extensions, vec!["bak".to_string()]);

        let mapper = config.extension_mapper().unwrap();
        assert_eq!(mapper.categorize(Some("webp")), Category::Images);
        assert_eq!(mapper.categorize(Some("flac")), Category::Audio);
        assert_eq!(mapper.categorize(Some("png")), Category::Images);
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = SorterConfig::from_toml("").unwrap();
        assert!(config.options.unpack_archives);
        assert!(config.categories.is_empty());
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = SorterConfig::from_toml("[options\nunpack_archives = ");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let config = SorterConfig::from_toml("[categories]\nmusic = [\"flac\"]\n").unwrap();
        assert!(matches!(
            config.extension_mapper(),
            Err(ConfigError::UnknownCategory(name)) if name == "music"
        ));

        let config = SorterConfig::from_toml("[categories]\nunknown = [\"exe\"]\n").unwrap();
        assert!(config.extension_mapper().is_err());
    }

    #[test]
    fn test_missing_explicit_config_file() {
        let result = SorterConfig::load(Some(Path::new("/non/existent/config.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_hidden_file_excluded_by_default() {
        let compiled = CompiledFilters::default();

        assert!(!compiled.should_include(Path::new(".DS_Store")));
        assert!(!compiled.should_include(Path::new("sub/.gitignore")));
        assert!(compiled.should_include(Path::new("photo.png")));
        assert!(!compiled.should_descend(Path::new(".git")));
    }

    #[test]
    fn test_hidden_file_included_when_enabled() {
        let compiled = filters_with(FilterRules {
            enable_hidden_files: true,
            ..Default::default()
        });

        assert!(compiled.should_include(Path::new(".DS_Store")));
        assert!(compiled.should_descend(Path::new(".cache")));
    }

    #[test]
    fn test_exclude_exact_filename() {
        let compiled = filters_with(FilterRules {
            enable_hidden_files: true,
            exclude: ExcludeRules {
                filenames: vec!["Thumbs.db".to_string()],
                ..Default::default()
            },
            ..Default::default()
        });

        assert!(!compiled.should_include(Path::new("Thumbs.db")));
        assert!(!compiled.should_include(Path::new("trip/Thumbs.db")));
        assert!(compiled.should_include(Path::new("image.jpg")));
    }

    #[test]
    fn test_exclude_extensions() {
        let compiled = filters_with(FilterRules {
            exclude: ExcludeRules {
                extensions: vec!["bak".to_string(), ".tmp".to_string()],
                ..Default::default()
            },
            ..Default::default()
        });

        assert!(!compiled.should_include(Path::new("file.bak")));
        assert!(!compiled.should_include(Path::new("file.tmp")));
        assert!(!compiled.should_include(Path::new("file.BAK")));
        assert!(compiled.should_include(Path::new("file.txt")));
    }

    #[test]
    fn test_exclude_glob_patterns() {
        let compiled = filters_with(FilterRules {
            exclude: ExcludeRules {
                patterns: vec!["*.cache".to_string(), "node_modules/**".to_string()],
                ..Default::default()
            },
            ..Default::default()
        });

        assert!(!compiled.should_include(Path::new("file.cache")));
        assert!(!compiled.should_include(Path::new("node_modules/package.json")));
        assert!(compiled.should_include(Path::new("file.txt")));
    }

    #[test]
    fn test_glob_pattern_directory_boundary_semantics() {
        let compiled = filters_with(FilterRules {
            exclude: ExcludeRules {
                patterns: vec!["**/logs/**".to_string()],
                ..Default::default()
            },
            ..Default::default()
        });

        assert!(!compiled.should_include(Path::new("logs/file.txt")));
        assert!(!compiled.should_include(Path::new("app/logs/file.txt")));
        assert!(compiled.should_include(Path::new("my_logs/file.txt")));
    }

    #[test]
    fn test_exclude_directory_by_name() {
        let compiled = filters_with(FilterRules {
            exclude: ExcludeRules {
                filenames: vec!["keep".to_string()],
                patterns: vec!["projects/*".to_string()],
                ..Default::default()
            },
            ..Default::default()
        });

        assert!(!compiled.should_descend(Path::new("keep")));
        assert!(!compiled.should_descend(Path::new("projects/site")));
        assert!(compiled.should_descend(Path::new("projects")));
        assert!(compiled.should_descend(Path::new("downloads")));
    }

    #[test]
    fn test_include_overrides_exclude() {
        let compiled = filters_with(FilterRules {
            include: IncludeRules {
                patterns: vec![".important".to_string()],
            },
            ..Default::default()
        });

        assert!(compiled.should_include(Path::new(".important")));
        assert!(!compiled.should_include(Path::new(".other")));
    }

    #[test]
    fn test_exclude_regex() {
        let compiled = filters_with(FilterRules {
            exclude: ExcludeRules {
                regex: vec![r"^test_.*\.txt$".to_string()],
                ..Default::default()
            },
            ..Default::default()
        });

        assert!(!compiled.should_include(Path::new("test_file.txt")));
        assert!(!compiled.should_include(Path::new("nested/test_another.txt")));
        assert!(compiled.should_include(Path::new("file.txt")));
    }

    #[test]
    fn test_invalid_regex_returns_error() {
        let config = SorterConfig {
            filters: FilterRules {
                exclude: ExcludeRules {
                    regex: vec!["[invalid(".to_string()],
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(matches!(
            config.compile_filters(),
            Err(ConfigError::InvalidRegexPattern { .. })
        ));
    }

    #[test]
    fn test_invalid_glob_pattern_returns_error() {
        let config = SorterConfig {
            filters: FilterRules {
                exclude: ExcludeRules {
                    patterns: vec!["[invalid".to_string()],
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(matches!(
            config.compile_filters(),
            Err(ConfigError::InvalidGlobPattern(_))
        ));
    }
}
