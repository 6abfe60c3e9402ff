//! End-to-end tests driving the HTTP surface.

use std::sync::Arc;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use rust_xlsxwriter::Workbook;

use clipdeck_core::ReportConfig;
use clipdeck_pptx::Branding;

use crate::api::PPTX_MIME;
use crate::{app, AppState};

fn server() -> TestServer {
    let state = AppState {
        config: Arc::new(ReportConfig::default()),
        branding: Arc::new(Branding::none()),
    };
    TestServer::new(app(state, 20)).expect("test server")
}

/// Three clippings: Eventos, Academia, and one excluded Desporto row.
fn sample_workbook() -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let headers = [
        "Meio",
        "Data de publicação",
        "Título",
        "Publicação",
        "Circulação",
        "Tema Principal",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (i, (topic, day)) in [("Eventos", 1), ("Academia", 2), ("Desporto", 3)]
        .iter()
        .enumerate()
    {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, "Online").unwrap();
        sheet
            .write_string(row, 1, format!("2024-05-0{day}").as_str())
            .unwrap();
        sheet
            .write_string(row, 2, format!("Notícia {row}").as_str())
            .unwrap();
        sheet.write_string(row, 3, "Jornal").unwrap();
        sheet.write_number(row, 4, 100.0).unwrap();
        sheet.write_string(row, 5, *topic).unwrap();
    }
    workbook.save_to_buffer().unwrap()
}

fn upload(bytes: Vec<u8>) -> MultipartForm {
    MultipartForm::new().add_part("file", Part::bytes(bytes).file_name("clippings.xlsx"))
}

#[tokio::test]
async fn health_reports_ok() {
    let server = server();
    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "clipdeck-server");
}

#[tokio::test]
async fn upload_returns_a_binary_deck() {
    let server = server();
    let response = server
        .post("/generate-report")
        .multipart(upload(sample_workbook()))
        .await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), PPTX_MIME);
    assert!(response
        .header("content-disposition")
        .to_str()
        .unwrap()
        .contains("relatorio.pptx"));

    let body = response.as_bytes();
    // A deck is a ZIP package.
    assert_eq!(&body[..2], b"PK");
}

#[tokio::test]
async fn base64_variant_wraps_the_deck_in_json() {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;

    let server = server();
    let response = server
        .post("/generate-report/base64")
        .multipart(upload(sample_workbook()))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["mime_type"], PPTX_MIME);
    let deck = BASE64
        .decode(body["data"].as_str().expect("data field"))
        .expect("valid base64");
    assert_eq!(&deck[..2], b"PK");
}

#[tokio::test]
async fn missing_file_field_is_a_bad_request() {
    let server = server();
    let form = MultipartForm::new().add_part("other", Part::bytes(vec![1, 2, 3]));
    let response = server.post("/generate-report").multipart(form).await;
    response.assert_status_bad_request();
    assert!(response.text().contains("file"));
}

#[tokio::test]
async fn unreadable_spreadsheet_is_a_generic_failure() {
    let server = server();
    let response = server
        .post("/generate-report")
        .multipart(upload(b"not a workbook".to_vec()))
        .await;
    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.text().is_empty());
}
