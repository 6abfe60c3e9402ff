//! HTTP handlers for report generation.

use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Serialize;
use tracing::{debug, info};

use clipdeck_core::{aggregate, categorize, outline};

use crate::error::ServerError;
use crate::AppState;

/// MIME type of the rendered deck.
pub const PPTX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: "clipdeck-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Handler: POST /generate-report
///
/// Multipart upload in, deck as a binary attachment out.
pub async fn handle_generate_report(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, ServerError> {
    let spreadsheet = spreadsheet_field(multipart).await?;
    info!("generating report from a {} byte upload", spreadsheet.len());
    let deck = generate(&state, spreadsheet).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        state.config.output_filename
    );
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, PPTX_MIME.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        deck,
    )
        .into_response())
}

/// Response envelope for the base64 variant.
#[derive(Serialize)]
pub struct ReportResponse {
    pub success: bool,
    /// Base64-encoded deck bytes.
    pub data: String,
    pub mime_type: &'static str,
    pub filename: String,
}

/// Handler: POST /generate-report/base64
///
/// Same input as the binary variant; the deck comes back inside a
/// JSON envelope.
pub async fn handle_generate_report_base64(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ReportResponse>, ServerError> {
    let spreadsheet = spreadsheet_field(multipart).await?;
    info!(
        "generating base64 report from a {} byte upload",
        spreadsheet.len()
    );
    let deck = generate(&state, spreadsheet).await?;

    Ok(Json(ReportResponse {
        success: true,
        data: BASE64.encode(&deck),
        mime_type: PPTX_MIME,
        filename: state.config.output_filename.clone(),
    }))
}

/// Pull the uploaded spreadsheet out of the multipart form.
async fn spreadsheet_field(mut multipart: Multipart) -> Result<Vec<u8>, ServerError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::InvalidRequest(e.to_string()))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
            if !bytes.is_empty() {
                return Ok(bytes.to_vec());
            }
        }
    }
    Err(ServerError::InvalidRequest(
        "missing 'file' upload field".to_string(),
    ))
}

/// The whole pipeline on a blocking worker: load rows, categorize,
/// chart, outline, render.
async fn generate(state: &AppState, spreadsheet: Vec<u8>) -> Result<Vec<u8>, ServerError> {
    let config = state.config.clone();
    let branding = state.branding.clone();

    let deck = tokio::task::spawn_blocking(move || -> clipdeck_core::Result<Vec<u8>> {
        let clippings = clipdeck_xlsx::load_clippings(&spreadsheet)?;
        debug!("loaded {} clippings", clippings.len());

        let rows = categorize::categorize_clippings(&config, clippings);
        let distribution = aggregate::outlet_distribution(&rows);
        let chart = clipdeck_chart::render_outlet_pie(&distribution)?;

        let outline = outline::from_categorized(&config, rows, chart);
        clipdeck_pptx::render_deck(&outline.pages, &branding)
    })
    .await
    .map_err(|e| ServerError::Internal(e.to_string()))??;

    Ok(deck)
}
