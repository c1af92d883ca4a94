//! # Gal Editor
//!
//! A self-hosted, single-user editor for photo portfolio sites. One binary
//! serves the published gallery, a password-protected editor UI, and the
//! upload/publish plumbing between them. No database: the filesystem under
//! the site root is the only state.
//!
//! # Architecture: Stage, Then Publish
//!
//! The image tree has two areas with identical shape:
//!
//! ```text
//! public/tmp/{fulls,thumbs}       # staging — previewed, disposable
//! public/images/{fulls,thumbs}    # published — what the live page links to
//! ```
//!
//! An editing session uploads into staging, previews against it, and then
//! re-uploads the final set into the published area. Uploads are
//! full-replace: each accepted batch clears its area first, so the directory
//! contents always correspond to exactly one upload batch.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | In-memory bearer-token store with a 10-hour lifetime |
//! | [`credentials`] | Salted password hash persisted in `auth.json` |
//! | [`upload`] | Field-name routing into the image tree + the per-mode directory reset |
//! | [`site`] | The site-configuration document posted by the editor UI |
//! | [`render`] | Site document → static HTML, via Maud |
//! | [`archive`] | Zip download of the published image set |
//! | [`server`] | Axum router, session middleware, request handlers |
//! | [`config`] | On-disk layout of a site root |
//!
//! # Design Decisions
//!
//! ## Tokens In Memory, Credential On Disk
//!
//! There is exactly one editor credential, so sessions carry no identity —
//! a token is pure proof of a past login. Keeping them in a process-local
//! map (swept lazily on each login) means a restart logs everyone out,
//! which for a single-user tool is a feature, not a bug.
//!
//! ## Lenient Upload Routing
//!
//! The upload field convention (`<area>-<kind>`) is resolved with fallbacks
//! at every level rather than validation errors: unknown area → staging,
//! unknown kind → area root, unsplittable descriptor → a holding directory
//! named after it. A misbehaving client loses tidy placement, never files.
//!
//! ## Maud Over Template Engines
//!
//! The page is generated with [Maud](https://maud.lambda.xyz/): templates
//! are type-checked Rust, interpolated card titles and descriptions are
//! escaped automatically, and there is no template directory to ship or get
//! out of sync.
//!
//! ## Full-Replace Uploads
//!
//! Accepting a batch clears the target area's directories before writing.
//! Combined with a per-mode lock, the published tree is always the result
//! of a single coherent batch — never a mix of two uploads.

pub mod archive;
pub mod config;
pub mod credentials;
pub mod render;
pub mod server;
pub mod session;
pub mod site;
pub mod upload;
