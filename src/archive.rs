//! Archive unpacking.
//!
//! Archives are unpacked into a folder next to them once they have been
//! moved into `archives/`. The format is chosen from the extension:
//! `zip`, `tar`, and gzip-compressed tarballs (`gz`, `tgz`). Other archive
//! extensions such as `rar` are reported as unsupported.

use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use zip::ZipArchive;

/// Errors that can occur while unpacking an archive.
#[derive(Debug)]
pub enum ArchiveError {
    /// No unpacker for this extension.
    Unsupported(String),
    /// Reading the archive or writing an entry failed.
    Io(io::Error),
    /// The zip container is malformed.
    Zip(zip::result::ZipError),
}

impl std::fmt::Display for ArchiveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchiveError::Unsupported(ext) if ext.is_empty() => {
                write!(f, "Unsupported archive format: no extension")
            }
            ArchiveError::Unsupported(ext) => write!(f, "Unsupported archive format: .{}", ext),
            ArchiveError::Io(e) => write!(f, "Unable to unpack archive: {}", e),
            ArchiveError::Zip(e) => write!(f, "Unable to unpack zip archive: {}", e),
        }
    }
}

impl std::error::Error for ArchiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ArchiveError::Unsupported(_) => None,
            ArchiveError::Io(e) => Some(e),
            ArchiveError::Zip(e) => Some(e),
        }
    }
}

impl From<io::Error> for ArchiveError {
    fn from(e: io::Error) -> Self {
        ArchiveError::Io(e)
    }
}

impl From<zip::result::ZipError> for ArchiveError {
    fn from(e: zip::result::ZipError) -> Self {
        ArchiveError::Zip(e)
    }
}

/// Result type for archive operations.
pub type ArchiveResult<T> = Result<T, ArchiveError>;

/// Extensions [`unpack`] knows how to handle.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["zip", "tar", "gz", "tgz"];

/// Returns whether [`unpack`] supports files with this extension.
pub fn is_supported(extension: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension.to_lowercase().as_str())
}

/// Unpacks `archive_path` into `destination`, creating it if needed.
///
/// Returns the number of files written. Entries that would land outside
/// `destination` are skipped.
///
/// # Errors
///
/// `ArchiveError::Unsupported` for unknown extensions; `Io` or `Zip` when the
/// archive cannot be read. Entries written before the failure are left in
/// place.
pub fn unpack(archive_path: &Path, destination: &Path) -> ArchiveResult<usize> {
    let extension = archive_path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    if !is_supported(&extension) {
        return Err(ArchiveError::Unsupported(extension));
    }

    fs::create_dir_all(destination)?;
    let file = File::open(archive_path)?;

    match extension.as_str() {
        "zip" => unpack_zip(file, destination),
        "gz" | "tgz" => unpack_tar(GzDecoder::new(file), destination),
        _ => unpack_tar(file, destination),
    }
}

fn unpack_zip(file: File, destination: &Path) -> ArchiveResult<usize> {
    let mut archive = ZipArchive::new(file)?;
    let mut written = 0;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        let Some(rel_path) = entry.enclosed_name() else {
            continue;
        };
        let out_path = destination.join(rel_path);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
        } else {
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut out_file = File::create(&out_path)?;
            io::copy(&mut entry, &mut out_file)?;
            written += 1;
        }
    }

    Ok(written)
}

fn unpack_tar<R: Read>(reader: R, destination: &Path) -> ArchiveResult<usize> {
    let mut archive = tar::Archive::new(reader);
    let mut written = 0;

    for entry in archive.entries()? {
        let mut entry = entry?;
        let is_file = entry.header().entry_type().is_file();
        if entry.unpack_in(destination)? && is_file {
            written += 1;
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).expect("Failed to create zip");
        let mut writer = zip::ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in entries {
            writer.start_file(*name, options).expect("Failed to start entry");
            writer
                .write_all(content.as_bytes())
                .expect("Failed to write entry");
        }
        writer.finish().expect("Failed to finish zip");
    }

    fn tar_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (name, content) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, name, content.as_bytes())
                .expect("Failed to append tar entry");
        }
        builder.into_inner().expect("Failed to finish tar")
    }

    #[test]
    fn test_unpack_zip() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let archive = temp_dir.path().join("bundle.zip");
        write_zip(&archive, &[("a.txt", "alpha"), ("docs/b.txt", "beta")]);

        let dest = temp_dir.path().join("bundle");
        let written = unpack(&archive, &dest).expect("Failed to unpack");

        assert_eq!(written, 2);
        assert_eq!(fs::read_to_string(dest.join("a.txt")).unwrap(), "alpha");
        assert_eq!(fs::read_to_string(dest.join("docs/b.txt")).unwrap(), "beta");
    }

    #[test]
    fn test_unpack_tar() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let archive = temp_dir.path().join("bundle.tar");
        fs::write(&archive, tar_bytes(&[("notes.txt", "hello")])).unwrap();

        let dest = temp_dir.path().join("bundle");
        let written = unpack(&archive, &dest).expect("Failed to unpack");

        assert_eq!(written, 1);
        assert_eq!(fs::read_to_string(dest.join("notes.txt")).unwrap(), "hello");
    }

    #[test]
    fn test_unpack_gzipped_tar() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let archive = temp_dir.path().join("backup_tar.gz");
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(&tar_bytes(&[("data/report.txt", "quarterly")]))
            .unwrap();
        fs::write(&archive, encoder.finish().unwrap()).unwrap();

        let dest = temp_dir.path().join("backup_tar");
        let written = unpack(&archive, &dest).expect("Failed to unpack");

        assert_eq!(written, 1);
        assert_eq!(
            fs::read_to_string(dest.join("data/report.txt")).unwrap(),
            "quarterly"
        );
    }

    #[test]
    fn test_unpack_rar_is_unsupported() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let archive = temp_dir.path().join("old.rar");
        fs::write(&archive, "Rar!").unwrap();

        let result = unpack(&archive, &temp_dir.path().join("old"));
        assert!(matches!(result, Err(ArchiveError::Unsupported(ext)) if ext == "rar"));
        assert!(!temp_dir.path().join("old").exists());
    }

    #[test]
    fn test_unpack_corrupt_zip_fails() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let archive = temp_dir.path().join("broken.zip");
        fs::write(&archive, "definitely not a zip").unwrap();

        let result = unpack(&archive, &temp_dir.path().join("broken"));
        assert!(matches!(result, Err(ArchiveError::Zip(_))));
    }

    #[test]
    fn test_is_supported() {
        assert!(is_supported("zip"));
        assert!(is_supported("TGZ"));
        assert!(!is_supported("rar"));
        assert!(!is_supported(""));
    }
}
