//! ZIP extraction for `.mcpack` archives.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;

use walkdir::WalkDir;
use zip::ZipArchive;

use super::error::{InstallError, InstallResult};
use super::traits::ArchiveExtractor;

/// Extractor for ZIP-structured `.mcpack` archives.
///
/// Entry names that would land outside the destination directory (absolute
/// paths, `..` components) are rejected by the `zip` crate and fail the
/// whole extraction.
#[derive(Debug, Default)]
pub struct ZipExtractor;

impl ZipExtractor {
    /// Create a new ZIP extractor.
    pub fn new() -> Self {
        Self
    }
}

impl ArchiveExtractor for ZipExtractor {
    fn extract(&self, archive_path: &Path, dest_dir: &Path) -> InstallResult<usize> {
        fs::create_dir_all(dest_dir).map_err(|e| InstallError::CreateDirFailed {
            path: dest_dir.to_path_buf(),
            source: e,
        })?;

        let file = File::open(archive_path).map_err(|e| InstallError::ReadFailed {
            path: archive_path.to_path_buf(),
            source: e,
        })?;

        let mut archive =
            ZipArchive::new(BufReader::new(file)).map_err(|e| InstallError::ExtractionFailed {
                path: archive_path.to_path_buf(),
                reason: e.to_string(),
            })?;

        archive
            .extract(dest_dir)
            .map_err(|e| InstallError::ExtractionFailed {
                path: archive_path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(count_files_recursive(dest_dir))
    }
}

/// Count regular files below `dir`.
fn count_files_recursive(dir: &Path) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::FileOptions;
    use zip::ZipWriter;

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options = FileOptions::default();
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_extract_nested_entries() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("pack.mcpack");
        write_zip(
            &archive,
            &[
                ("manifest.json", "{}"),
                ("textures/blocks/stone.png", "png"),
                ("pack_icon.png", "icon"),
            ],
        );

        let dest = temp.path().join("out");
        let count = ZipExtractor::new().extract(&archive, &dest).unwrap();

        assert_eq!(count, 3);
        assert_eq!(
            fs::read_to_string(dest.join("textures/blocks/stone.png")).unwrap(),
            "png"
        );
    }

    #[test]
    fn test_extract_missing_archive() {
        let temp = TempDir::new().unwrap();
        let result = ZipExtractor::new().extract(
            &temp.path().join("missing.mcpack"),
            &temp.path().join("out"),
        );
        assert!(matches!(result, Err(InstallError::ReadFailed { .. })));
    }

    #[test]
    fn test_extract_corrupt_archive() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("broken.mcpack");
        fs::write(&archive, b"this is not a zip file").unwrap();

        let result = ZipExtractor::new().extract(&archive, &temp.path().join("out"));
        assert!(matches!(result, Err(InstallError::ExtractionFailed { .. })));
    }

    #[test]
    fn test_extract_rejects_escaping_entries() {
        let temp = TempDir::new().unwrap();
        let archive = temp.path().join("evil.mcpack");
        write_zip(&archive, &[("../outside.txt", "nope")]);

        let dest = temp.path().join("out");
        let result = ZipExtractor::new().extract(&archive, &dest);

        assert!(result.is_err());
        assert!(!temp.path().join("outside.txt").exists());
    }

    #[test]
    fn test_count_files_recursive() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        fs::create_dir(temp.path().join("sub")).unwrap();
        fs::write(temp.path().join("sub/b.txt"), "b").unwrap();
        fs::create_dir(temp.path().join("empty")).unwrap();

        assert_eq!(count_files_recursive(temp.path()), 2);
    }
}
