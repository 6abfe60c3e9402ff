//! Hyperlink extraction from the sheet XML.
//!
//! Hyperlinks live outside the cell data: the sheet part carries
//! `<hyperlink ref="C5" r:id="rId1"/>` elements and the sheet's
//! relationships part maps each id to its external target.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use clipdeck_core::{Error, Result};

/// External hyperlink targets of the first worksheet, keyed by
/// 0-based (row, column).
pub fn sheet_hyperlinks(bytes: &[u8]) -> Result<HashMap<(u32, u32), String>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::ZipError(format!("Failed to open workbook: {e}")))?;

    let sheet_path = first_sheet_path(&mut archive)?;
    let sheet_xml = read_archive_file(&mut archive, &sheet_path)?;
    let refs = hyperlink_refs(&sheet_xml)?;
    if refs.is_empty() {
        return Ok(HashMap::new());
    }

    let targets = relationship_targets(&mut archive, &sheet_path)?;

    let mut links = HashMap::new();
    for (cell_ref, rel_id) in refs {
        let (Some(target), Some(coords)) = (targets.get(&rel_id), cell_to_row_col(&cell_ref))
        else {
            continue;
        };
        links.insert(coords, target.clone());
    }
    Ok(links)
}

/// Resolve the archive path of the workbook's first sheet.
///
/// The workbook part lists sheets by relationship id; the workbook
/// relationships part maps that id to a path. Falls back to the
/// conventional `sheet1.xml` when either part is missing.
fn first_sheet_path(archive: &mut ZipArchive<Cursor<&[u8]>>) -> Result<String> {
    let fallback = "xl/worksheets/sheet1.xml".to_string();

    let Ok(workbook_xml) = read_archive_file(archive, "xl/workbook.xml") else {
        return Ok(fallback);
    };
    let Some(first_rel_id) = first_sheet_rel_id(&workbook_xml)? else {
        return Ok(fallback);
    };

    let Ok(rels_xml) = read_archive_file(archive, "xl/_rels/workbook.xml.rels") else {
        return Ok(fallback);
    };
    let rels = parse_relationships(&rels_xml)?;
    match rels.get(&first_rel_id) {
        Some(target) if target.starts_with('/') => Ok(target[1..].to_string()),
        Some(target) => Ok(format!("xl/{target}")),
        None => Ok(fallback),
    }
}

/// Relationship id of the first `<sheet>` element in workbook.xml.
fn first_sheet_rel_id(workbook_xml: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(workbook_xml);
    reader.trim_text(true);
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sheet" =>
            {
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"r:id" {
                        return Ok(Some(String::from_utf8_lossy(&attr.value).to_string()));
                    }
                }
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(Error::XmlError(format!("Error parsing workbook: {e}"))),
            _ => {}
        }
    }
}

/// `(cell ref, relationship id)` pairs from the sheet's hyperlink list.
fn hyperlink_refs(sheet_xml: &str) -> Result<Vec<(String, String)>> {
    let mut reader = Reader::from_str(sheet_xml);
    reader.trim_text(true);
    let mut refs = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"hyperlink" =>
            {
                let mut cell_ref = None;
                let mut rel_id = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"ref" => cell_ref = Some(String::from_utf8_lossy(&attr.value).to_string()),
                        b"r:id" => rel_id = Some(String::from_utf8_lossy(&attr.value).to_string()),
                        _ => {}
                    }
                }
                // Internal links carry a location instead of an id; skip them.
                if let (Some(cell_ref), Some(rel_id)) = (cell_ref, rel_id) {
                    refs.push((cell_ref, rel_id));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(format!("Error parsing sheet: {e}"))),
            _ => {}
        }
    }
    Ok(refs)
}

/// Relationship id to target map from the sheet's `.rels` part.
///
/// A sheet without hyperlinks has no `.rels` part at all; that is an
/// empty map, not an error.
fn relationship_targets(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    sheet_path: &str,
) -> Result<HashMap<String, String>> {
    let rels_path = match sheet_path.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None => format!("_rels/{sheet_path}.rels"),
    };
    match read_archive_file(archive, &rels_path) {
        Ok(xml) => parse_relationships(&xml),
        Err(_) => Ok(HashMap::new()),
    }
}

/// Parse a relationships part into an id-to-target map.
fn parse_relationships(rels_xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(rels_xml);
    reader.trim_text(true);
    let mut rels = HashMap::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let mut id = None;
                let mut target = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = Some(String::from_utf8_lossy(&attr.value).to_string()),
                        b"Target" => {
                            target = Some(String::from_utf8_lossy(&attr.value).to_string())
                        }
                        _ => {}
                    }
                }
                if let (Some(id), Some(target)) = (id, target) {
                    rels.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(format!("Error parsing relationships: {e}"))),
            _ => {}
        }
    }
    Ok(rels)
}

/// Read a file from the ZIP archive as a string.
fn read_archive_file(archive: &mut ZipArchive<Cursor<&[u8]>>, path: &str) -> Result<String> {
    let mut file = archive
        .by_name(path)
        .map_err(|e| Error::ZipError(format!("File not found in archive '{path}': {e}")))?;
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::ZipError(format!("Failed to read '{path}': {e}")))?;
    Ok(content)
}

/// Convert an A1-style cell reference into 0-based (row, column).
fn cell_to_row_col(cell_ref: &str) -> Option<(u32, u32)> {
    let split = cell_ref.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cell_ref.split_at(split);
    if letters.is_empty() {
        return None;
    }

    let mut col: u32 = 0;
    for c in letters.chars() {
        let value = c.to_ascii_uppercase() as u32;
        if !(u32::from(b'A')..=u32::from(b'Z')).contains(&value) {
            return None;
        }
        col = col * 26 + (value - u32::from(b'A') + 1);
    }
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row - 1, col - 1))
}

/// Extract the local name from a potentially namespaced XML element name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_refs_convert_to_zero_based_coordinates() {
        assert_eq!(cell_to_row_col("A1"), Some((0, 0)));
        assert_eq!(cell_to_row_col("C5"), Some((4, 2)));
        assert_eq!(cell_to_row_col("AA10"), Some((9, 26)));
        assert_eq!(cell_to_row_col("10"), None);
        assert_eq!(cell_to_row_col("A0"), None);
    }

    #[test]
    fn hyperlink_refs_skip_location_only_links() {
        let sheet = r#"<worksheet xmlns:r="ns">
            <hyperlinks>
                <hyperlink ref="C2" r:id="rId1"/>
                <hyperlink ref="C3" location="Sheet2!A1"/>
            </hyperlinks>
        </worksheet>"#;
        let refs = hyperlink_refs(sheet).unwrap();
        assert_eq!(refs, vec![("C2".to_string(), "rId1".to_string())]);
    }

    #[test]
    fn relationships_parse_into_a_map() {
        let rels = r#"<Relationships>
            <Relationship Id="rId1" Type="t" Target="https://example.com/a" TargetMode="External"/>
        </Relationships>"#;
        let map = parse_relationships(rels).unwrap();
        assert_eq!(map.get("rId1").map(String::as_str), Some("https://example.com/a"));
    }
}
