//! Error types for report generation.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning a clippings spreadsheet into a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open or read an input file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// The uploaded workbook could not be read as a spreadsheet.
    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(String),

    /// ZIP archive error (XLSX and PPTX are both ZIP packages).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML parsing or writing error.
    #[error("XML error: {0}")]
    XmlError(String),

    /// Chart rasterization failed.
    #[error("Chart rendering error: {0}")]
    ChartError(String),

    /// Deck assembly failed.
    #[error("Deck rendering error: {0}")]
    RenderError(String),
}
