//! On-disk layout of a site root.
//!
//! Everything the editor persists lives under one directory:
//!
//! ```text
//! <root>/
//! ├── auth.json                # editor credential (hash + salt)
//! ├── site-config.json         # last published site document
//! ├── index.html               # generated published page
//! ├── preview.html             # generated preview page
//! ├── login.html               # editor UI pages (optional overrides)
//! ├── edit.html
//! └── public/                  # served as-is
//!     ├── assets/              # css/js/templates shipped with the site theme
//!     ├── images/{fulls,thumbs}/   # published assets
//!     └── tmp/{fulls,thumbs}/      # staging assets
//! ```
//!
//! [`SitePaths`] is the single place that knows these names; handlers ask it
//! for paths instead of joining strings themselves.

use std::fs;
use std::io;
use std::path::PathBuf;

/// Resolved file locations for one site root.
#[derive(Debug, Clone)]
pub struct SitePaths {
    root: PathBuf,
}

impl SitePaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The public asset tree, served directly.
    pub fn public(&self) -> PathBuf {
        self.root.join("public")
    }

    pub fn auth_file(&self) -> PathBuf {
        self.root.join("auth.json")
    }

    pub fn site_config(&self) -> PathBuf {
        self.root.join("site-config.json")
    }

    /// A generated or hand-placed HTML page at the site root.
    pub fn html_file(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Stock fallback pages shipped with the site theme.
    pub fn template(&self, name: &str) -> PathBuf {
        self.public().join("assets/templates").join(name)
    }

    /// Create the four image directories if missing. Idempotent; runs once
    /// at startup so upload handlers can assume the layout exists.
    pub fn ensure_layout(&self) -> io::Result<()> {
        for dir in ["images/fulls", "images/thumbs", "tmp/fulls", "tmp/thumbs"] {
            fs::create_dir_all(self.public().join(dir))?;
        }
        Ok(())
    }
}
