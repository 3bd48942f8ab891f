//! Document toolkit server
//!
//! One HTTP service in front of the toolkit crates:
//!
//! - PDF: merge, split, reorder, rotate, encrypt, text, translate, images
//! - Images: batch compression, sequential and mapping-based renaming
//! - MCU results: organise files into folders from a mapping table, status summary
//! - Files: zip, unzip, table -> xlsx
//! - QR codes: single (with per-session history), batch, templates
//!
//! Every tool takes a multipart form and answers with a file download.
//! `GET /` serves a plain HTML page with one form per tool.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use translate_core::{GoogleTranslator, Translator, DEFAULT_ENDPOINT};

mod api;
mod download;
mod error;
mod session;
mod upload;

use session::SessionStore;

/// Command-line arguments for the toolkit server
#[derive(Parser, Debug)]
#[command(name = "toolkit-server")]
#[command(about = "PDF, image, QR and spreadsheet tools over HTTP")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "TOOLKIT_PORT", default_value = "8080")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "TOOLKIT_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Largest accepted request body, in MiB
    #[arg(long, env = "TOOLKIT_MAX_UPLOAD_MB", default_value = "200")]
    max_upload_mb: usize,

    /// Translation endpoint
    #[arg(long, env = "TOOLKIT_TRANSLATE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    translate_endpoint: String,

    /// Pause between translated chunks, in milliseconds
    #[arg(long, env = "TOOLKIT_TRANSLATE_DELAY_MS", default_value = "100")]
    translate_delay_ms: u64,

    /// Timeout for one translation request, in seconds
    #[arg(long, env = "TOOLKIT_TRANSLATE_TIMEOUT_SECS", default_value = "30")]
    translate_timeout_secs: u64,

    /// Idle sessions older than this are dropped, in minutes
    #[arg(long, env = "TOOLKIT_SESSION_TTL_MINUTES", default_value = "120")]
    session_ttl_minutes: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub translator: Arc<dyn Translator>,
    /// Pause between translated chunks
    pub translate_delay: Duration,
}

/// Build the router with every tool mounted
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers(Any);

    Router::new()
        .route("/", get(api::handle_index))
        .route("/health", get(api::handle_health))
        // PDF
        .route("/api/pdf/merge", post(api::pdf::handle_merge))
        .route("/api/pdf/split", post(api::pdf::handle_split))
        .route("/api/pdf/info", post(api::pdf::handle_info))
        .route("/api/pdf/reorder", post(api::pdf::handle_reorder))
        .route("/api/pdf/rotate", post(api::pdf::handle_rotate))
        .route("/api/pdf/encrypt", post(api::pdf::handle_encrypt))
        .route("/api/pdf/extract-text", post(api::pdf::handle_extract_text))
        .route("/api/pdf/translate", post(api::pdf::handle_translate))
        .route("/api/pdf/from-images", post(api::pdf::handle_from_images))
        .route("/api/pdf/to-images", post(api::pdf::handle_to_images))
        .route(
            "/api/pdf/rename/sequential",
            post(api::pdf::handle_rename_sequential),
        )
        .route("/api/pdf/rename/mapping", post(api::pdf::handle_rename_mapping))
        // Images
        .route("/api/images/compress", post(api::images::handle_compress))
        .route(
            "/api/images/rename/sequential",
            post(api::images::handle_rename_sequential),
        )
        .route(
            "/api/images/rename/mapping",
            post(api::images::handle_rename_mapping),
        )
        // MCU
        .route("/api/mcu/organize", post(api::mcu::handle_organize))
        .route("/api/mcu/status-summary", post(api::mcu::handle_status_summary))
        // Files
        .route("/api/files/zip", post(api::files::handle_zip))
        .route("/api/files/unzip", post(api::files::handle_unzip))
        .route("/api/files/to-excel", post(api::files::handle_to_excel))
        // QR
        .route("/api/qr", post(api::qr::handle_generate))
        .route("/api/qr/batch", post(api::qr::handle_batch))
        .route("/api/qr/templates", get(api::qr::handle_list_templates))
        // Sessions
        .route("/api/sessions", post(api::sessions::handle_create))
        .route("/api/sessions/:id", delete(api::sessions::handle_end))
        .route(
            "/api/sessions/:id/template/:index",
            post(api::sessions::handle_select_template),
        )
        .route(
            "/api/sessions/:id/qr-history",
            get(api::sessions::handle_history),
        )
        .route(
            "/api/sessions/:id/qr-history/:index",
            get(api::sessions::handle_history_image),
        )
        // Apply middleware
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting toolkit server on {}:{}", args.host, args.port);

    let translator = GoogleTranslator::new(
        args.translate_endpoint.clone(),
        Duration::from_secs(args.translate_timeout_secs),
    )?;

    let state = AppState {
        sessions: Arc::new(SessionStore::new(Duration::from_secs(
            args.session_ttl_minutes * 60,
        ))),
        translator: Arc::new(translator),
        translate_delay: Duration::from_millis(args.translate_delay_ms),
    };

    let app = app(state, args.max_upload_mb * 1024 * 1024);

    // Start server
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Upload limit: {} MiB", args.max_upload_mb);
    info!("Translation endpoint: {}", args.translate_endpoint);

    axum::serve(listener, app).await?;

    Ok(())
}
