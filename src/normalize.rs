//! File name normalization.
//!
//! Names are normalized in two steps: Cyrillic letters are transliterated to
//! Latin, then every character that is not a letter, digit or underscore is
//! replaced with `_`.
//!
//! # Examples
//!
//! ```
//! use file_sorter::normalize::normalize;
//!
//! assert_eq!(normalize("Привіт світ"), "Privit_svit");
//! assert_eq!(normalize("report (final)"), "report__final_");
//! ```

use regex::Regex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

/// Stem used when a name normalizes to nothing.
pub const EMPTY_STEM: &str = "unnamed";

/// Lowercase Cyrillic letters and their Latin spelling.
const CYRILLIC_TO_LATIN: [(char, &str); 36] = [
    ('а', "a"),
    ('б', "b"),
    ('в', "v"),
    ('г', "g"),
    ('д', "d"),
    ('е', "e"),
    ('ё', "e"),
    ('ж', "zh"),
    ('з', "z"),
    ('и', "i"),
    ('й', "y"),
    ('к', "k"),
    ('л', "l"),
    ('м', "m"),
    ('н', "n"),
    ('о', "o"),
    ('п', "p"),
    ('р', "r"),
    ('с', "s"),
    ('т', "t"),
    ('у', "u"),
    ('ф', "f"),
    ('х', "kh"),
    ('ц', "ts"),
    ('ч', "ch"),
    ('ш', "sh"),
    ('щ', "shch"),
    ('ъ', ""),
    ('ы', "y"),
    ('ь', ""),
    ('э', "e"),
    ('ю', "yu"),
    ('я', "ya"),
    ('є', "ye"),
    ('і', "i"),
    ('ї', "yi"),
];

/// Lookup table holding both cases of every letter.
static TRANSLITERATION: LazyLock<HashMap<char, String>> = LazyLock::new(|| {
    let mut table = HashMap::with_capacity(CYRILLIC_TO_LATIN.len() * 2);
    for (cyrillic, latin) in CYRILLIC_TO_LATIN {
        table.insert(cyrillic, latin.to_string());
        for upper in cyrillic.to_uppercase() {
            table.insert(upper, latin.to_uppercase());
        }
    }
    table
});

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W").expect("Invalid non-word regex"));

/// Replaces Cyrillic letters with their Latin equivalents.
///
/// Uppercase letters map to the uppercased spelling, so `Щ` becomes `SHCH`.
/// Anything outside the table is left untouched.
///
/// ```
/// use file_sorter::normalize::transliterate;
///
/// assert_eq!(transliterate("Щука"), "SHCHuka");
/// assert_eq!(transliterate("photo-1"), "photo-1");
/// ```
pub fn transliterate(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match TRANSLITERATION.get(&c) {
            Some(latin) => out.push_str(latin),
            None => out.push(c),
        }
    }
    out
}

/// Transliterates `input` and replaces every non-word character with `_`.
///
/// Runs of separators are not collapsed: `"a  b"` becomes `"a__b"`.
pub fn normalize(input: &str) -> String {
    let transliterated = transliterate(input);
    NON_WORD.replace_all(&transliterated, "_").into_owned()
}

/// Splits a file name into a normalized stem and a lowercased extension.
///
/// The split follows [`Path::file_stem`] and [`Path::extension`], so
/// `.bashrc` has no extension and `backup.tar.gz` has the stem `backup_tar`.
pub fn split_file_name(path: &Path) -> (String, Option<String>) {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .filter(|e| !e.is_empty());

    let mut stem = normalize(&stem);
    if stem.is_empty() {
        stem = EMPTY_STEM.to_string();
    }

    (stem, extension)
}

/// Joins a stem and an optional extension into a file name.
pub fn join_file_name(stem: &str, extension: Option<&str>) -> String {
    match extension {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem.to_string(),
    }
}

/// Returns the normalized file name for `path`.
///
/// ```
/// use file_sorter::normalize::normalized_file_name;
/// use std::path::Path;
///
/// assert_eq!(normalized_file_name(Path::new("Звіт 2024.PDF")), "Zvit_2024.pdf");
/// ```
pub fn normalized_file_name(path: &Path) -> String {
    let (stem, extension) = split_file_name(path);
    join_file_name(&stem, extension.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transliterate_lowercase() {
        assert_eq!(transliterate("абв"), "abv");
        assert_eq!(transliterate("жук"), "zhuk");
        assert_eq!(transliterate("борщ"), "borshch");
    }

    #[test]
    fn test_transliterate_uppercase() {
        assert_eq!(transliterate("Жук"), "ZHuk");
        assert_eq!(transliterate("ЮЯ"), "YUYA");
        assert_eq!(transliterate("Їжак"), "YIzhak");
    }

    #[test]
    fn test_transliterate_drops_hard_and_soft_signs() {
        assert_eq!(transliterate("подъезд"), "podezd");
        assert_eq!(transliterate("сіль"), "sil");
        assert_eq!(transliterate("ЪЬ"), "");
    }

    #[test]
    fn test_transliterate_ukrainian_letters() {
        assert_eq!(transliterate("Євген"), "YEvgen");
        assert_eq!(transliterate("річка"), "richka");
    }

    #[test]
    fn test_transliterate_leaves_other_characters() {
        assert_eq!(transliterate("hello world 42"), "hello world 42");
        assert_eq!(transliterate("café"), "café");
    }

    #[test]
    fn test_table_covers_both_cases() {
        assert_eq!(TRANSLITERATION.len(), CYRILLIC_TO_LATIN.len() * 2);
    }

    #[test]
    fn test_normalize_replaces_punctuation_and_spaces() {
        assert_eq!(normalize("my file (1)"), "my_file__1_");
        assert_eq!(normalize("a-b+c"), "a_b_c");
        assert_eq!(normalize("already_clean_123"), "already_clean_123");
    }

    #[test]
    fn test_normalize_mixed_scripts() {
        assert_eq!(normalize("Фото з відпустки!"), "Foto_z_vidpustki_");
        assert_eq!(normalize("Привет, мир"), "Privet__mir");
    }

    #[test]
    fn test_normalize_keeps_unicode_word_characters() {
        assert_eq!(normalize("naïve"), "naïve");
    }

    #[test]
    fn test_split_file_name() {
        let (stem, ext) = split_file_name(Path::new("Моя пісня.MP3"));
        assert_eq!(stem, "Moya_pisnya");
        assert_eq!(ext.as_deref(), Some("mp3"));
    }

    #[test]
    fn test_split_file_name_double_extension() {
        let (stem, ext) = split_file_name(Path::new("backup.tar.gz"));
        assert_eq!(stem, "backup_tar");
        assert_eq!(ext.as_deref(), Some("gz"));
    }

    #[test]
    fn test_split_file_name_without_extension() {
        let (stem, ext) = split_file_name(Path::new("README"));
        assert_eq!(stem, "README");
        assert_eq!(ext, None);
        assert_eq!(normalized_file_name(Path::new("README")), "README");
    }

    #[test]
    fn test_empty_stem_falls_back() {
        assert_eq!(normalized_file_name(Path::new("ъ.txt")), "unnamed.txt");
    }

    #[test]
    fn test_dot_file_has_no_extension() {
        let (stem, ext) = split_file_name(Path::new(".bashrc"));
        assert_eq!(stem, "_bashrc");
        assert_eq!(ext, None);
    }
}
