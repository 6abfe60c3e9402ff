//! Shape XML builders.
//!
//! Each function returns one `p:spTree` child as a string. Dynamic
//! text always goes through [`esc`]; geometry is EMU throughout.

use std::borrow::Cow;

use quick_xml::escape::escape;

use crate::units::font_size;

/// Escape text for XML content and attribute values.
pub fn esc(text: &str) -> Cow<'_, str> {
    escape(text)
}

/// Shape position and extent in EMU.
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Frame {
    pub fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self { x, y, cx, cy }
    }

    fn xfrm(&self) -> String {
        format!(
            r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
            self.x, self.y, self.cx, self.cy
        )
    }
}

/// Character formatting for one run.
#[derive(Debug, Clone, Copy)]
pub struct RunStyle<'a> {
    pub size_pt: u32,
    pub bold: bool,
    pub underline: bool,
    pub typeface: &'a str,
    /// RRGGBB hex, no leading '#'.
    pub color: &'a str,
    /// Relationship id of an external hyperlink on this run.
    pub link_rel: Option<&'a str>,
}

/// One text run with explicit character properties.
pub fn run(text: &str, style: &RunStyle) -> String {
    let mut attrs = format!(r#" lang="pt-PT" sz="{}""#, font_size(style.size_pt));
    if style.bold {
        attrs.push_str(r#" b="1""#);
    }
    if style.underline {
        attrs.push_str(r#" u="sng""#);
    }
    let link = style
        .link_rel
        .map(|id| format!(r#"<a:hlinkClick r:id="{id}"/>"#))
        .unwrap_or_default();
    format!(
        r#"<a:r><a:rPr{attrs}><a:solidFill><a:srgbClr val="{color}"/></a:solidFill><a:latin typeface="{typeface}"/>{link}</a:rPr><a:t>{text}</a:t></a:r>"#,
        color = style.color,
        typeface = esc(style.typeface),
        text = esc(text),
    )
}

/// One paragraph wrapping pre-built runs; `align` is an `algn` value
/// ("ctr", "r") or `None` for the default.
pub fn paragraph(align: Option<&str>, runs: &str) -> String {
    match align {
        Some(a) => format!(r#"<a:p><a:pPr algn="{a}"/>{runs}</a:p>"#),
        None => format!("<a:p>{runs}</a:p>"),
    }
}

/// A plain text box. `click_rel` attaches a whole-shape click action
/// jumping to another slide.
pub fn textbox(
    shape_id: u32,
    name: &str,
    frame: Frame,
    paragraphs: &str,
    click_rel: Option<&str>,
) -> String {
    let click = click_rel
        .map(|id| format!(r#"<a:hlinkClick r:id="{id}" action="ppaction://hlinksldjump"/>"#))
        .unwrap_or_default();
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{shape_id}" name="{name}">{click}</p:cNvPr><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>{xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square"/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#,
        name = esc(name),
        xfrm = frame.xfrm(),
    )
}

/// A filled rectangle with an outline and centered text.
pub fn rectangle(
    shape_id: u32,
    name: &str,
    frame: Frame,
    fill: &str,
    line_color: &str,
    line_width: i64,
    paragraphs: &str,
) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{shape_id}" name="{name}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>{xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:solidFill><a:srgbClr val="{fill}"/></a:solidFill><a:ln w="{line_width}"><a:solidFill><a:srgbClr val="{line_color}"/></a:solidFill></a:ln></p:spPr><p:txBody><a:bodyPr wrap="square" anchor="ctr"/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#,
        name = esc(name),
        xfrm = frame.xfrm(),
    )
}

/// An embedded picture referencing a media relationship.
pub fn picture(shape_id: u32, name: &str, rel_id: &str, frame: Frame) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="{shape_id}" name="{name}"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="{rel_id}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>{xfrm}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
        name = esc(name),
        xfrm = frame.xfrm(),
    )
}

/// One table cell: its paragraph, a uniform border on all four sides,
/// and a solid fill.
pub fn table_cell(paragraph: &str, fill: &str, border_color: &str, border_width: i64) -> String {
    let borders: String = ["lnL", "lnR", "lnT", "lnB"]
        .iter()
        .map(|side| {
            format!(
                r#"<a:{side} w="{border_width}"><a:solidFill><a:srgbClr val="{border_color}"/></a:solidFill></a:{side}>"#
            )
        })
        .collect();
    format!(
        r#"<a:tc><a:txBody><a:bodyPr/><a:lstStyle/>{paragraph}</a:txBody><a:tcPr>{borders}<a:solidFill><a:srgbClr val="{fill}"/></a:solidFill></a:tcPr></a:tc>"#
    )
}

/// One table row of pre-built cells.
pub fn table_row(height: i64, cells: &str) -> String {
    format!(r#"<a:tr h="{height}">{cells}</a:tr>"#)
}

/// A table inside a graphic frame, with evenly distributed columns.
pub fn table_graphic(
    shape_id: u32,
    name: &str,
    frame: Frame,
    column_count: usize,
    rows: &str,
) -> String {
    let column_width = frame.cx / column_count.max(1) as i64;
    let grid: String = (0..column_count)
        .map(|_| format!(r#"<a:gridCol w="{column_width}"/>"#))
        .collect();
    format!(
        r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="{shape_id}" name="{name}"/><p:cNvGraphicFramePr><a:graphicFrameLocks noGrp="1"/></p:cNvGraphicFramePr><p:nvPr/></p:nvGraphicFramePr><p:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></p:xfrm><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl><a:tblPr firstRow="1" bandRow="1"/><a:tblGrid>{grid}</a:tblGrid>{rows}</a:tbl></a:graphicData></a:graphic></p:graphicFrame>"#,
        name = esc(name),
        x = frame.x,
        y = frame.y,
        cx = frame.cx,
        cy = frame.cy,
    )
}
