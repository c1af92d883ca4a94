use clap::Parser;
use gal_editor::config::SitePaths;
use gal_editor::credentials::Credentials;
use gal_editor::server::{self, AppState};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tracing as log;
use tracing_subscriber::{EnvFilter, fmt};

/// Self-hosted editor for photo portfolio sites.
#[derive(Parser)]
#[command(name = "gal-editor")]
#[command(about = "Self-hosted editor for photo portfolio sites")]
#[command(long_about = "\
Self-hosted editor for photo portfolio sites

One binary serves the published gallery, a password-protected editor, and
the upload plumbing between them. All state lives under the site root:

  <root>/
  ├── auth.json                # editor credential, created on first startup
  ├── site-config.json         # last published site document
  ├── index.html               # generated published page
  ├── preview.html             # generated preview page
  └── public/                  # static assets + the image tree
      ├── images/{fulls,thumbs}/   # published
      └── tmp/{fulls,thumbs}/      # staging

On first startup the editor password is taken from --password (or the
PASSWORD environment variable) and persisted as a salted hash; after that
the flag is ignored and may be dropped from the environment.")]
#[command(version)]
struct Cli {
    /// Port to listen on
    #[arg(long, default_value_t = 8080, env = "PORT")]
    port: u16,

    /// Site root directory
    #[arg(long, default_value = ".", env = "GAL_ROOT")]
    root: PathBuf,

    /// First-startup editor password; ignored once auth.json exists
    #[arg(long, env = "PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if start().await.is_err() {
        std::process::exit(1);
    }
}

async fn start() -> Result<(), ()> {
    let cli = Cli::parse();

    let paths = SitePaths::new(&cli.root);
    paths.ensure_layout().map_err(|e| {
        log::error!("failed to create the image directory layout: {e}");
    })?;

    let credentials =
        Credentials::load_or_init(&paths.auth_file(), cli.password.as_deref()).map_err(|e| {
            log::error!("failed to load editor credentials: {e}");
        })?;

    let state = AppState::new(paths, credentials);
    let app = server::router(state);

    let listener = TcpListener::bind(("0.0.0.0", cli.port)).await.map_err(|e| {
        log::error!("failed to listen on port {}: {e}", cli.port);
    })?;
    log::info!("listening on 0.0.0.0:{}", cli.port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            log::error!("webserver failed: {e}");
        })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("failed to install Ctrl+C handler");
        log::info!("received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
        log::info!("received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
