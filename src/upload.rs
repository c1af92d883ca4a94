//! Upload routing and the staging/published directory reset.
//!
//! Every uploaded file arrives tagged with a field name following the
//! `<area>-<kind>` convention. The router maps that descriptor onto the
//! on-disk image tree and never rejects a file: unknown areas fall back to
//! staging, unknown kinds to the area root, and a descriptor that does not
//! split into exactly two parts lands in a holding directory named after it.
//!
//! ```text
//! public/
//! ├── images/          # published ("main")
//! │   ├── fulls/
//! │   └── thumbs/
//! └── tmp/             # staging ("tmp")
//!     ├── fulls/
//!     └── thumbs/
//! ```
//!
//! Uploads are full-replace, not incremental: before a batch is written, the
//! two directories of the selected [`Mode`] are cleared of files, so the
//! uploaded set fully replaces the previous one.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Declared-size ceiling for one upload request: 500 MiB.
pub const MAX_UPLOAD_BYTES: u64 = 524_288_000;

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level asset category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Area {
    /// `tmp/` — assets for previewing an edit in progress.
    Staging,
    /// `images/` — assets the published page links to.
    Published,
}

impl Area {
    /// `main` selects the published tree; everything else (including `tmp`)
    /// falls back to staging.
    fn parse(part: &str) -> Self {
        match part {
            "main" => Area::Published,
            _ => Area::Staging,
        }
    }

    fn root(self) -> &'static str {
        match self {
            Area::Staging => "tmp",
            Area::Published => "images",
        }
    }
}

/// Asset role within an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Full,
    Thumb,
}

impl Kind {
    /// Unrecognized kinds map to `None` and the file lands at the area root
    /// with no sub-bucket. Deliberate leniency, kept from the original field
    /// convention.
    fn parse(part: &str) -> Option<Self> {
        match part {
            "full" => Some(Kind::Full),
            "thumb" => Some(Kind::Thumb),
            _ => None,
        }
    }

    fn dir(self) -> &'static str {
        match self {
            Kind::Full => "fulls",
            Kind::Thumb => "thumbs",
        }
    }
}

/// Resolve the destination directory, relative to the public root, for an
/// uploaded file tagged with `field`.
///
/// A field name that does not split into exactly two `-`-separated parts is
/// routed to a holding directory under staging, named after the raw field.
pub fn destination_dir(field: &str) -> PathBuf {
    let parts: Vec<&str> = field.split('-').collect();
    if parts.len() != 2 {
        warn!(field, "malformed upload field name, routing to holding directory");
        return Path::new("tmp").join(field);
    }

    let mut dir = PathBuf::from(Area::parse(parts[0]).root());
    if let Some(kind) = Kind::parse(parts[1]) {
        dir.push(kind.dir());
    }
    dir
}

/// Write one uploaded file under the public root, keeping its original
/// filename verbatim.
///
/// The destination directory is created per file, so one file's placement
/// never depends on another's.
pub fn place_file(
    public_root: &Path,
    field: &str,
    filename: &str,
    data: &[u8],
) -> Result<PathBuf, UploadError> {
    let dir = public_root.join(destination_dir(field));
    fs::create_dir_all(&dir)?;
    let dest = dir.join(filename);
    fs::write(&dest, data)?;
    Ok(dest)
}

/// Upload mode selector: which pair of directories gets replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Staging,
    Published,
}

impl Mode {
    /// Strict, unlike [`Area`]: only the two legal selector values are
    /// accepted, anything else is a client error.
    pub fn from_param(param: &str) -> Option<Self> {
        match param {
            "tmp" => Some(Mode::Staging),
            "main" => Some(Mode::Published),
            _ => None,
        }
    }

    /// The two directories this mode owns, in clearing order.
    fn directories(self) -> [&'static str; 2] {
        match self {
            Mode::Staging => ["tmp/thumbs", "tmp/fulls"],
            Mode::Published => ["images/fulls", "images/thumbs"],
        }
    }
}

/// Delete every file in the mode's two directories, sequentially.
///
/// Subdirectory entries are left alone: only regular files are part of an
/// asset set. A listing or deletion failure aborts the whole request.
pub fn clear(public_root: &Path, mode: Mode) -> Result<(), UploadError> {
    for dir in mode.directories() {
        for entry in fs::read_dir(public_root.join(dir))? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                fs::remove_file(entry.path())?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn main_full_goes_to_published_fulls() {
        assert_eq!(destination_dir("main-full"), Path::new("images/fulls"));
    }

    #[test]
    fn main_thumb_goes_to_published_thumbs() {
        assert_eq!(destination_dir("main-thumb"), Path::new("images/thumbs"));
    }

    #[test]
    fn tmp_full_goes_to_staging_fulls() {
        assert_eq!(destination_dir("tmp-full"), Path::new("tmp/fulls"));
    }

    #[test]
    fn tmp_thumb_goes_to_staging_thumbs() {
        assert_eq!(destination_dir("tmp-thumb"), Path::new("tmp/thumbs"));
    }

    #[test]
    fn unknown_area_falls_back_to_staging() {
        assert_eq!(destination_dir("other-full"), Path::new("tmp/fulls"));
    }

    #[test]
    fn unknown_kind_lands_at_area_root() {
        assert_eq!(destination_dir("main-other"), Path::new("images"));
        assert_eq!(destination_dir("tmp-misc"), Path::new("tmp"));
    }

    #[test]
    fn single_part_descriptor_goes_to_holding_directory() {
        assert_eq!(destination_dir("thumbnails"), Path::new("tmp/thumbnails"));
    }

    #[test]
    fn three_part_descriptor_goes_to_holding_directory() {
        assert_eq!(destination_dir("main-full-extra"), Path::new("tmp/main-full-extra"));
    }

    #[test]
    fn place_file_preserves_filename_with_spaces() {
        let tmp = TempDir::new().unwrap();
        let dest = place_file(tmp.path(), "main-full", "my museum.jpg", b"jpeg").unwrap();
        assert_eq!(dest, tmp.path().join("images/fulls/my museum.jpg"));
        assert_eq!(fs::read(dest).unwrap(), b"jpeg");
    }

    #[test]
    fn place_file_overwrites_same_name() {
        let tmp = TempDir::new().unwrap();
        place_file(tmp.path(), "tmp-thumb", "a.png", b"old").unwrap();
        let dest = place_file(tmp.path(), "tmp-thumb", "a.png", b"new").unwrap();
        assert_eq!(fs::read(dest).unwrap(), b"new");
    }

    #[test]
    fn mode_parse_is_strict() {
        assert_eq!(Mode::from_param("tmp"), Some(Mode::Staging));
        assert_eq!(Mode::from_param("main"), Some(Mode::Published));
        assert_eq!(Mode::from_param("images"), None);
        assert_eq!(Mode::from_param(""), None);
    }

    fn seed_layout(root: &Path) {
        for dir in ["images/fulls", "images/thumbs", "tmp/fulls", "tmp/thumbs"] {
            fs::create_dir_all(root.join(dir)).unwrap();
            fs::write(root.join(dir).join("seed.jpg"), b"x").unwrap();
        }
    }

    #[test]
    fn clearing_staging_leaves_published_untouched() {
        let tmp = TempDir::new().unwrap();
        seed_layout(tmp.path());

        clear(tmp.path(), Mode::Staging).unwrap();

        assert!(!tmp.path().join("tmp/fulls/seed.jpg").exists());
        assert!(!tmp.path().join("tmp/thumbs/seed.jpg").exists());
        assert!(tmp.path().join("images/fulls/seed.jpg").exists());
        assert!(tmp.path().join("images/thumbs/seed.jpg").exists());
    }

    #[test]
    fn clearing_published_leaves_staging_untouched() {
        let tmp = TempDir::new().unwrap();
        seed_layout(tmp.path());

        clear(tmp.path(), Mode::Published).unwrap();

        assert!(!tmp.path().join("images/fulls/seed.jpg").exists());
        assert!(!tmp.path().join("images/thumbs/seed.jpg").exists());
        assert!(tmp.path().join("tmp/fulls/seed.jpg").exists());
        assert!(tmp.path().join("tmp/thumbs/seed.jpg").exists());
    }

    #[test]
    fn clearing_skips_subdirectories() {
        let tmp = TempDir::new().unwrap();
        seed_layout(tmp.path());
        fs::create_dir_all(tmp.path().join("tmp/fulls/nested")).unwrap();

        clear(tmp.path(), Mode::Staging).unwrap();
        assert!(tmp.path().join("tmp/fulls/nested").exists());
    }

    #[test]
    fn clearing_missing_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        assert!(clear(tmp.path(), Mode::Staging).is_err());
    }
}
