//! Row-oriented loading of the clippings sheet.
//!
//! First row is the header. Expected columns are matched accent- and
//! case-insensitively; a missing column is synthesized as entirely
//! empty rather than rejected.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;

use clipdeck_core::normalize::labels_match;
use clipdeck_core::{Clipping, Error, Result};

use crate::hyperlinks::sheet_hyperlinks;

const COL_OUTLET: &str = "Meio";
const COL_PUBLISHED: &str = "Data de publicação";
const COL_TITLE: &str = "Título";
const COL_PUBLICATION: &str = "Publicação";
const COL_CIRCULATION: &str = "Circulação";
const COL_PRIMARY_TOPIC: &str = "Tema Principal";
const COL_SECONDARY_TOPIC: &str = "Tema Secundário";
const COL_AUTHOR: &str = "Autor";
const COL_INSTITUTION: &str = "Instituição";
const COL_REACH: &str = "AAV";

/// Column positions resolved from the header row. A column that never
/// appears stays `None` and every row reads it as empty.
#[derive(Debug, Default)]
struct Columns {
    outlet: Option<usize>,
    published: Option<usize>,
    title: Option<usize>,
    publication: Option<usize>,
    circulation: Option<usize>,
    primary_topic: Option<usize>,
    secondary_topic: Option<usize>,
    author: Option<usize>,
    institution: Option<usize>,
    reach: Option<usize>,
}

/// Load all clippings from the first worksheet of an XLSX workbook.
pub fn load_clippings(bytes: &[u8]) -> Result<Vec<Clipping>> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| Error::SpreadsheetError(format!("Failed to open workbook: {e}")))?;
    let range = match workbook.worksheet_range_at(0) {
        Some(result) => result.map_err(|e| Error::SpreadsheetError(e.to_string()))?,
        None => return Ok(Vec::new()),
    };

    let links = sheet_hyperlinks(bytes)?;

    let (start_row, start_col) = range.start().unwrap_or((0, 0));
    let mut rows = range.rows();
    let Some(headers) = rows.next() else {
        return Ok(Vec::new());
    };
    let columns = resolve_columns(headers);

    let mut clippings = Vec::new();
    for (i, row) in rows.enumerate() {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let sheet_row = start_row + 1 + i as u32;
        let link = columns
            .title
            .and_then(|idx| links.get(&(sheet_row, start_col + idx as u32)).cloned());

        clippings.push(Clipping {
            outlet: text_at(row, columns.outlet).unwrap_or_default(),
            published: date_at(row, columns.published),
            title: text_at(row, columns.title).unwrap_or_default(),
            publication: text_at(row, columns.publication).unwrap_or_default(),
            circulation: int_at(row, columns.circulation).unwrap_or(0),
            primary_topic: text_at(row, columns.primary_topic),
            secondary_topic: text_at(row, columns.secondary_topic),
            author: text_at(row, columns.author),
            institution: text_at(row, columns.institution),
            reach: int_at(row, columns.reach),
            link,
        });
    }

    debug!("loaded {} clippings", clippings.len());
    Ok(clippings)
}

/// Map the header row onto column positions; the first matching header
/// wins when a name repeats.
fn resolve_columns(headers: &[Data]) -> Columns {
    let mut columns = Columns::default();
    for (idx, cell) in headers.iter().enumerate() {
        let Some(name) = cell_string(cell) else {
            continue;
        };
        let slot = if labels_match(&name, COL_OUTLET) {
            &mut columns.outlet
        } else if labels_match(&name, COL_PUBLISHED) {
            &mut columns.published
        } else if labels_match(&name, COL_TITLE) {
            &mut columns.title
        } else if labels_match(&name, COL_PUBLICATION) {
            &mut columns.publication
        } else if labels_match(&name, COL_CIRCULATION) {
            &mut columns.circulation
        } else if labels_match(&name, COL_PRIMARY_TOPIC) {
            &mut columns.primary_topic
        } else if labels_match(&name, COL_SECONDARY_TOPIC) {
            &mut columns.secondary_topic
        } else if labels_match(&name, COL_AUTHOR) {
            &mut columns.author
        } else if labels_match(&name, COL_INSTITUTION) {
            &mut columns.institution
        } else if labels_match(&name, COL_REACH) {
            &mut columns.reach
        } else {
            continue;
        };
        slot.get_or_insert(idx);
    }
    columns
}

fn cell_at(row: &[Data], idx: Option<usize>) -> Option<&Data> {
    idx.and_then(|i| row.get(i))
}

fn cell_string(cell: &Data) -> Option<String> {
    match cell {
        Data::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) if f.fract() == 0.0 => Some(format!("{}", *f as i64)),
        Data::Float(f) => Some(f.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTimeIso(s) => Some(s.clone()),
        _ => None,
    }
}

fn text_at(row: &[Data], idx: Option<usize>) -> Option<String> {
    cell_at(row, idx).and_then(cell_string)
}

fn int_at(row: &[Data], idx: Option<usize>) -> Option<i64> {
    match cell_at(row, idx)? {
        Data::Int(i) => Some(*i),
        Data::Float(f) => Some(*f as i64),
        Data::String(s) => s.trim().replace(',', "").parse::<f64>().ok().map(|f| f as i64),
        _ => None,
    }
}

fn date_at(row: &[Data], idx: Option<usize>) -> Option<NaiveDate> {
    match cell_at(row, idx)? {
        Data::DateTime(dt) => dt.as_datetime().map(|ndt| ndt.date()),
        Data::DateTimeIso(s) => parse_date(s),
        Data::String(s) => parse_date(s),
        _ => None,
    }
}

/// Dates arrive either as native datetime cells or as text; accept ISO
/// datetimes, ISO dates, and day-first forms.
fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.date());
    }
    for format in ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Some(date);
        }
    }
    None
}
