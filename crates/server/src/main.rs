//! Clippings report server.
//!
//! One synchronous generation pipeline behind a small HTTP surface:
//! upload a clippings spreadsheet, download the rendered slide deck.
//! Everything request-scoped lives in memory and dies with the
//! request; the only startup state is the report configuration and
//! the two branding images.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use clipdeck_core::ReportConfig;
use clipdeck_pptx::Branding;

mod api;
mod error;
#[cfg(test)]
mod tests;

use api::{handle_generate_report, handle_generate_report_base64, handle_health};

/// Command-line arguments for the clipdeck server
#[derive(Parser, Debug)]
#[command(name = "clipdeck-server")]
#[command(about = "Clippings report server: spreadsheet in, slide deck out")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Directory holding the branding images (icon.png, banner.png)
    #[arg(long, default_value = "static")]
    branding_dir: String,

    /// Maximum upload size in megabytes
    #[arg(long, default_value = "20")]
    max_upload_mb: usize,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ReportConfig>,
    pub branding: Arc<Branding>,
}

/// Build the router; kept separate so tests can drive it directly.
pub fn app(state: AppState, max_upload_mb: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_health))
        .route("/generate-report", post(handle_generate_report))
        .route("/generate-report/base64", post(handle_generate_report_base64))
        .layer(DefaultBodyLimit::max(max_upload_mb * 1024 * 1024))
        .layer(cors)
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let branding = Branding::load_from_dir(&args.branding_dir);
    if branding.icon_png.is_none() && branding.banner_png.is_none() {
        info!(
            "no branding images under '{}'; decks render without them",
            args.branding_dir
        );
    }

    let state = AppState {
        config: Arc::new(ReportConfig::default()),
        branding: Arc::new(branding),
    };
    let router = app(state, args.max_upload_mb);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Server listening on http://{addr}");

    axum::serve(listener, router).await?;
    Ok(())
}
