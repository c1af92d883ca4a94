//! Zip packaging of the published image set.
//!
//! Backs the editor's "download my images" action: everything under
//! `images/fulls` and `images/thumbs`, flattened into `fulls/` and `thumbs/`
//! entries of a single archive built in memory.

use std::fs::File;
use std::io::{self, Cursor};
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// Build an in-memory zip of the published full and thumbnail directories.
///
/// A directory that does not exist contributes nothing — a freshly
/// initialized site downloads as an empty archive rather than failing.
pub fn published_images(public_root: &Path) -> Result<Vec<u8>, ArchiveError> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (dir, prefix) in [("images/fulls", "fulls"), ("images/thumbs", "thumbs")] {
        let dir = public_root.join(dir);
        if !dir.is_dir() {
            continue;
        }
        for entry in WalkDir::new(&dir).min_depth(1).into_iter().filter_map(Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            writer.start_file(format!("{prefix}/{name}"), options)?;
            io::copy(&mut File::open(entry.path())?, &mut writer)?;
        }
    }

    Ok(writer.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn entry_names(bytes: Vec<u8>) -> Vec<String> {
        let archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_owned).collect();
        names.sort();
        names
    }

    #[test]
    fn archives_fulls_and_thumbs() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("images/fulls")).unwrap();
        fs::create_dir_all(tmp.path().join("images/thumbs")).unwrap();
        fs::write(tmp.path().join("images/fulls/a.jpg"), b"full").unwrap();
        fs::write(tmp.path().join("images/thumbs/a.jpg"), b"thumb").unwrap();

        let bytes = published_images(tmp.path()).unwrap();
        assert_eq!(entry_names(bytes), vec!["fulls/a.jpg", "thumbs/a.jpg"]);
    }

    #[test]
    fn missing_directories_yield_an_empty_archive() {
        let tmp = TempDir::new().unwrap();
        let bytes = published_images(tmp.path()).unwrap();
        assert!(entry_names(bytes).is_empty());
    }

    #[test]
    fn staging_files_are_not_included() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("images/fulls")).unwrap();
        fs::create_dir_all(tmp.path().join("tmp/fulls")).unwrap();
        fs::write(tmp.path().join("images/fulls/keep.jpg"), b"x").unwrap();
        fs::write(tmp.path().join("tmp/fulls/skip.jpg"), b"x").unwrap();

        let bytes = published_images(tmp.path()).unwrap();
        assert_eq!(entry_names(bytes), vec!["fulls/keep.jpg"]);
    }
}
