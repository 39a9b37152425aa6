/// Extension-based file classification.
///
/// Files are grouped by their extension alone; contents are never read.
///
/// # Examples
///
/// ```
/// use file_sorter::file_category::{Category, ExtensionMapper};
///
/// let mapper = ExtensionMapper::default();
/// assert_eq!(mapper.categorize(Some("png")), Category::Images);
/// assert_eq!(mapper.categorize(Some("MKV")), Category::Video);
/// assert_eq!(mapper.categorize(Some("xyz")), Category::Unknown);
/// ```
use serde::Serialize;
use std::collections::HashMap;

/// The folder a file ends up in.
///
/// Variants are declared in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Pictures and vector graphics.
    Images,
    /// Movie files.
    Video,
    /// Text, office and PDF documents.
    Documents,
    /// Music and voice recordings.
    Audio,
    /// Compressed or bundled files; these are unpacked after the move.
    Archives,
    /// Anything with an unmapped or missing extension.
    Unknown,
}

impl Category {
    /// Every category, in report order.
    pub const ALL: [Category; 6] = [
        Category::Images,
        Category::Video,
        Category::Documents,
        Category::Audio,
        Category::Archives,
        Category::Unknown,
    ];

    /// Returns the directory name for this category.
    ///
    /// # Examples
    ///
    /// ```
    /// use file_sorter::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "images");
    /// assert_eq!(Category::Unknown.dir_name(), "unknown");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Images => "images",
            Category::Video => "video",
            Category::Documents => "documents",
            Category::Audio => "audio",
            Category::Archives => "archives",
            Category::Unknown => "unknown",
        }
    }

    /// Capitalized name used as a report heading.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Images => "Images",
            Category::Video => "Video",
            Category::Documents => "Documents",
            Category::Audio => "Audio",
            Category::Archives => "Archives",
            Category::Unknown => "Unknown",
        }
    }

    /// Parses a directory name back into a category, ignoring case.
    pub fn from_dir_name(name: &str) -> Option<Category> {
        Self::ALL
            .into_iter()
            .find(|category| category.dir_name().eq_ignore_ascii_case(name))
    }
}

/// Default extension table.
const DEFAULT_MAPPINGS: &[(Category, &[&str])] = &[
    (Category::Images, &["jpeg", "png", "jpg", "svg"]),
    (Category::Video, &["avi", "mp4", "mov", "mkv"]),
    (
        Category::Documents,
        &["doc", "docx", "txt", "pdf", "xlsx", "pptx"],
    ),
    (Category::Audio, &["mp3", "ogg", "wav", "amr"]),
    (Category::Archives, &["zip", "rar", "gz", "tar", "tgz"]),
];

/// Maps file extensions to categories.
///
/// Lookups are case-insensitive. Extra mappings can be added on top of the
/// defaults, e.g. from the `[categories]` table of the config file.
#[derive(Debug, Clone)]
pub struct ExtensionMapper {
    extension_map: HashMap<String, Category>,
}

impl ExtensionMapper {
    /// Creates a new `ExtensionMapper` with the standard mappings.
    pub fn new() -> Self {
        let mut mapper = Self {
            extension_map: HashMap::new(),
        };
        for (category, extensions) in DEFAULT_MAPPINGS {
            for ext in extensions.iter() {
                mapper.add_extension_mapping(ext, *category);
            }
        }
        mapper
    }

    /// Adds or replaces a file extension to category mapping.
    ///
    /// A leading dot is ignored, so `".webp"` and `"webp"` are equivalent.
    pub fn add_extension_mapping(&mut self, ext: &str, category: Category) {
        let ext = ext.trim_start_matches('.').to_lowercase();
        self.extension_map.insert(ext, category);
    }

    /// Maps a file extension to a category.
    ///
    /// # Examples
    ///
    /// ```
    /// use file_sorter::file_category::{Category, ExtensionMapper};
    ///
    /// let mapper = ExtensionMapper::default();
    /// assert_eq!(mapper.extension_to_category("pdf"), Some(Category::Documents));
    /// assert_eq!(mapper.extension_to_category("PNG"), Some(Category::Images));
    /// assert_eq!(mapper.extension_to_category("exe"), None);
    /// ```
    pub fn extension_to_category(&self, ext: &str) -> Option<Category> {
        self.extension_map.get(&ext.to_lowercase()).copied()
    }

    /// Determines the category for a file given its extension.
    ///
    /// Files without an extension, or with an unmapped one, are `Unknown`.
    pub fn categorize(&self, ext: Option<&str>) -> Category {
        ext.and_then(|e| self.extension_to_category(e))
            .unwrap_or(Category::Unknown)
    }

    /// Returns whether `ext` has a mapping.
    pub fn is_known(&self, ext: &str) -> bool {
        self.extension_to_category(ext).is_some()
    }
}

impl Default for ExtensionMapper {
    fn default() -> Self {
        Self::new()
    }
}
