//! HTTP layer: routing, session enforcement, request handlers.
//!
//! Everything behind `/login` requires a valid `?token=` query parameter,
//! checked by a middleware layer on the protected routes. Handlers return
//! `Result<_, AppError>`; the error type maps the failure taxonomy onto
//! status codes and keeps bodies as short plain strings.

use crate::archive;
use crate::config::SitePaths;
use crate::credentials::Credentials;
use crate::render;
use crate::session::SessionStore;
use crate::site::SiteDocument;
use crate::upload::{self, MAX_UPLOAD_BYTES, Mode};

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Query, Request, State},
    http::{HeaderMap, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info};

/// Shared application state.
pub struct AppState {
    pub paths: SitePaths,
    pub sessions: SessionStore,
    pub credentials: Credentials,
    /// One lock per upload mode: clear-then-write must not interleave with
    /// another batch targeting the same directories.
    staging_upload: Mutex<()>,
    published_upload: Mutex<()>,
}

impl AppState {
    pub fn new(paths: SitePaths, credentials: Credentials) -> Arc<Self> {
        Arc::new(Self {
            paths,
            sessions: SessionStore::new(),
            credentials,
            staging_upload: Mutex::new(()),
            published_upload: Mutex::new(()),
        })
    }

    fn upload_lock(&self, mode: Mode) -> &Mutex<()> {
        match mode {
            Mode::Staging => &self.staging_upload,
            Mode::Published => &self.published_upload,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Wrong password.")]
    BadPassword,
    #[error("Invalid session.")]
    InvalidSession,
    #[error("Edit mode not set.")]
    InvalidMode,
    #[error("Exceeded max upload size (500 MB).")]
    UploadTooLarge,
    #[error("Too many files in one field group.")]
    TooManyFiles,
    #[error("{0} not found.")]
    NotFound(&'static str),
    #[error("Malformed site configuration: {0}")]
    MalformedDocument(#[from] serde_json::Error),
    #[error("Upload stream error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
    #[error("Upload failed: {0}")]
    Upload(#[from] upload::UploadError),
    #[error("Archive failed: {0}")]
    Archive(#[from] archive::ArchiveError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadPassword => StatusCode::UNAUTHORIZED,
            AppError::InvalidSession => StatusCode::FORBIDDEN,
            AppError::InvalidMode | AppError::TooManyFiles => StatusCode::BAD_REQUEST,
            AppError::UploadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MalformedDocument(_) | AppError::Multipart(_) => StatusCode::BAD_REQUEST,
            AppError::Upload(_) | AppError::Archive(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            error!("request failed: {self}");
        }

        (status, self.to_string()).into_response()
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/edit", get(edit_page))
        .route("/download-img", get(download_images))
        .route("/download-conf", get(download_config))
        .route("/upload-images", post(upload_images))
        .route("/update", post(update_site))
        .route("/preview", get(preview_page).post(render_preview))
        .layer(middleware::from_fn_with_state(state.clone(), require_session));

    Router::new()
        .route("/", get(index_page))
        .route("/login", get(login_page).post(login))
        .merge(protected)
        .fallback_service(ServeDir::new(state.paths.public()))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES as usize))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct SessionQuery {
    #[serde(default)]
    token: Option<String>,
}

/// Gate for every editor route: a valid `?token=` or 403.
async fn require_session(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SessionQuery>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match &query.token {
        Some(token) if state.sessions.is_valid(token) => Ok(next.run(request).await),
        _ => Err(AppError::InvalidSession),
    }
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    password: String,
}

/// `POST /login`: verify the shared editor password, mint a session token.
///
/// PBKDF2 is deliberately slow, so the derivation runs on the blocking pool
/// instead of stalling the reactor.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<String, AppError> {
    let credentials = state.credentials.clone();
    let ok = tokio::task::spawn_blocking(move || credentials.verify(&body.password))
        .await
        .map_err(io::Error::other)?;

    if ok {
        info!("login succeeded, session issued");
        Ok(state.sessions.issue())
    } else {
        Err(AppError::BadPassword)
    }
}

/// `GET /`: the generated site, or the stock template before first publish.
async fn index_page(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    serve_first(&[
        state.paths.html_file("index.html"),
        state.paths.template("index.html"),
    ])
    .await
}

/// `GET /login`: the login form.
async fn login_page(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    serve_first(&[
        state.paths.html_file("login.html"),
        state.paths.template("login.html"),
    ])
    .await
}

/// `GET /edit`: the editor UI.
async fn edit_page(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    serve_first(&[
        state.paths.html_file("edit.html"),
        state.paths.template("edit.html"),
    ])
    .await
}

/// `GET /preview`: the page generated by the last `POST /preview`.
async fn preview_page(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    serve_first(&[state.paths.html_file("preview.html")]).await
}

/// Serve the first existing file from `candidates` as HTML.
async fn serve_first(candidates: &[PathBuf]) -> Result<Response, AppError> {
    for path in candidates {
        if path.is_file() {
            let body = tokio::fs::read(path).await?;
            return Ok((
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response());
        }
    }
    Err(AppError::NotFound("page"))
}

#[derive(Debug, Deserialize)]
struct UploadQuery {
    #[serde(default)]
    mode: Option<String>,
}

/// Per-field-group file cap for one upload batch.
const MAX_FILES_PER_FIELD: usize = 40;

/// `POST /upload-images?mode={tmp|main}`: replace one mode's asset set.
///
/// Order matters here. The declared size and the mode are validated before
/// any destructive action, and the whole clear-then-write sequence runs
/// under the mode's lock so concurrent batches cannot interleave.
async fn upload_images(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<&'static str, AppError> {
    if let Some(declared) = declared_content_length(&headers) {
        if declared > MAX_UPLOAD_BYTES {
            return Err(AppError::UploadTooLarge);
        }
    }

    let mode = query
        .mode
        .as_deref()
        .and_then(Mode::from_param)
        .ok_or(AppError::InvalidMode)?;

    let _guard = state.upload_lock(mode).lock().await;

    let public = state.paths.public();
    upload::clear(&public, mode)?;

    let mut field_counts: HashMap<String, usize> = HashMap::new();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        // Plain form fields carry no filename and are not uploads.
        let Some(filename) = field.file_name().map(str::to_owned) else {
            continue;
        };

        let count = field_counts.entry(name.clone()).or_insert(0);
        *count += 1;
        if *count > MAX_FILES_PER_FIELD {
            return Err(AppError::TooManyFiles);
        }

        let data = field.bytes().await?;
        upload::place_file(&public, &name, &filename, &data)?;
    }

    Ok("Success")
}

/// The size gate trusts the declared header, not received bytes; a request
/// without a `Content-Length` passes.
fn declared_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// `POST /update`: persist the document and regenerate the published page.
///
/// The raw body is what gets persisted, so document fields the renderer does
/// not know about survive a round-trip through the editor.
async fn update_site(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<&'static str, AppError> {
    let doc: SiteDocument = serde_json::from_str(&body)?;

    fs::write(state.paths.site_config(), &body)?;
    fs::write(
        state.paths.html_file("index.html"),
        render::render_site(&doc, render::PUBLISHED_ROOT),
    )?;

    Ok("Success")
}

/// `POST /preview`: regenerate the preview page against the staging assets.
/// The posted document is not persisted.
async fn render_preview(
    State(state): State<Arc<AppState>>,
    body: String,
) -> Result<&'static str, AppError> {
    let doc: SiteDocument = serde_json::from_str(&body)?;

    fs::write(
        state.paths.html_file("preview.html"),
        render::render_site(&doc, render::STAGING_ROOT),
    )?;

    Ok("Success")
}

/// `GET /download-img`: zip of the published asset set.
async fn download_images(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let bytes = archive::published_images(&state.paths.public())?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"index_images.zip\"",
            ),
        ],
        bytes,
    )
        .into_response())
}

/// `GET /download-conf`: the persisted site-configuration document.
async fn download_config(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let path = state.paths.site_config();
    if !path.is_file() {
        return Err(AppError::NotFound("site-config.json"));
    }
    let body = tokio::fs::read(path).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
