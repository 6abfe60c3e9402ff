//! Per-page slide assembly.
//!
//! Turns one page descriptor into slide XML plus the relationships
//! that slide needs (layout, media, hyperlinks, slide jumps). Visual
//! constants for the deck live here.

use std::collections::HashMap;

use clipdeck_core::format::group_thousands;
use clipdeck_core::{Clipping, IndexEntry, Page, ReportStats, SectionTarget};

use crate::shapes::{self, Frame, RunStyle};
use crate::templates::{NS_A, NS_P, NS_R, REL_HYPERLINK, REL_IMAGE, REL_SLIDE, REL_SLIDE_LAYOUT};
use crate::units::{inches, SLIDE_HEIGHT, SLIDE_WIDTH};

const BG_COLOR: &str = "404040";
const TEXT_COLOR: &str = "FFFFFF";
const TITLE_TYPEFACE: &str = "Barlow";
const STAT_TYPEFACE: &str = "Impact";

const COVER_TITLE_PT: u32 = 48;
const SECTION_TITLE_PT: u32 = 32;
const TABLE_TITLE_PT: u32 = 25;
const SUBTITLE_PT: u32 = 18;
const INDEX_LINE_PT: u32 = 20;
const STAT_PT: u32 = 20;
const OVERVIEW_HEADER_PT: u32 = 14;
const OVERVIEW_CELL_PT: u32 = 12;
const TABLE_HEADER_PT: u32 = 12;
const TABLE_CELL_PT: u32 = 10;
const FOOTER_PT: u32 = 15;

const CELL_BORDER_WIDTH: i64 = 12_700;

const TABLE_HEADERS: [&str; 5] = [
    "Meio",
    "Data de publicação",
    "Título",
    "Publicação",
    "Circulação",
];
const BYLINE_HEADERS: [&str; 2] = ["Autor", "Instituição"];
const OVERVIEW_HEADERS: [&str; 3] = ["Categoria", "Nº Notícias", "Circulação"];

/// One relationship of a slide part.
#[derive(Debug, Clone)]
pub struct Relationship {
    pub id: String,
    pub rel_type: &'static str,
    pub target: String,
    pub external: bool,
}

/// A rendered slide: its XML and its relationships.
#[derive(Debug)]
pub struct BuiltSlide {
    pub xml: String,
    pub rels: Vec<Relationship>,
}

/// Everything one slide needs from the rest of the deck.
#[derive(Debug)]
pub struct SlideContext<'a> {
    /// Media target of the icon shown on every slide.
    pub icon_target: Option<&'a str>,

    /// Media target of the cover/closing banner.
    pub banner_target: Option<&'a str>,

    /// Media target of the overview pie chart.
    pub chart_target: Option<&'a str>,

    /// Final 1-based slide position of each navigable section.
    pub section_slides: &'a HashMap<SectionTarget, usize>,

    /// Final 1-based number of this slide, shown in the footer.
    pub slide_number: usize,
}

struct SlideParts {
    shapes: String,
    rels: Vec<Relationship>,
    next_shape_id: u32,
}

impl SlideParts {
    fn new() -> Self {
        Self {
            shapes: String::new(),
            rels: vec![Relationship {
                id: "rId1".to_string(),
                rel_type: REL_SLIDE_LAYOUT,
                target: "../slideLayouts/slideLayout1.xml".to_string(),
                external: false,
            }],
            next_shape_id: 2,
        }
    }

    fn add_rel(&mut self, rel_type: &'static str, target: impl Into<String>, external: bool) -> String {
        let id = format!("rId{}", self.rels.len() + 1);
        self.rels.push(Relationship {
            id: id.clone(),
            rel_type,
            target: target.into(),
            external,
        });
        id
    }

    fn shape_id(&mut self) -> u32 {
        let id = self.next_shape_id;
        self.next_shape_id += 1;
        id
    }

    fn push(&mut self, shape: String) {
        self.shapes.push_str(&shape);
    }
}

/// Render one page descriptor into a slide.
pub fn build_slide(page: &Page, ctx: &SlideContext) -> BuiltSlide {
    let mut slide = SlideParts::new();

    match page {
        Page::Cover { title } | Page::Closing { title } => {
            build_branded_title(&mut slide, ctx, title)
        }
        Page::Index { title, entries } => build_index(&mut slide, ctx, title, entries),
        Page::Overview {
            title,
            stats,
            chart_png,
        } => build_overview(&mut slide, ctx, title, stats, chart_png.is_some()),
        Page::SectionIntro {
            category,
            count,
            circulation,
        } => build_section_intro(&mut slide, category, *count, *circulation),
        Page::Table {
            title,
            rows,
            with_byline,
        } => build_table_page(&mut slide, title, rows, *with_byline),
    }

    // The icon and the footer number go on every slide.
    if let Some(target) = ctx.icon_target {
        let rel = slide.add_rel(REL_IMAGE, target, false);
        let id = slide.shape_id();
        slide.push(shapes::picture(
            id,
            "Icon",
            &rel,
            Frame::new(inches(0.2), inches(0.2), inches(0.9), inches(0.9)),
        ));
    }
    add_footer(&mut slide, ctx.slide_number);

    BuiltSlide {
        xml: slide_xml(&slide.shapes),
        rels: slide.rels,
    }
}

fn style(size_pt: u32) -> RunStyle<'static> {
    RunStyle {
        size_pt,
        bold: false,
        underline: false,
        typeface: TITLE_TYPEFACE,
        color: TEXT_COLOR,
        link_rel: None,
    }
}

fn add_title(slide: &mut SlideParts, text: &str, size_pt: u32, frame: Frame, centered: bool) {
    let runs = shapes::run(text, &style(size_pt));
    let align = centered.then_some("ctr");
    let body = shapes::paragraph(align, &runs);
    let id = slide.shape_id();
    slide.push(shapes::textbox(id, "Title", frame, &body, None));
}

/// Cover and closing slides: banner artwork plus a large title.
fn build_branded_title(slide: &mut SlideParts, ctx: &SlideContext, title: &str) {
    if let Some(target) = ctx.banner_target {
        let rel = slide.add_rel(REL_IMAGE, target, false);
        let id = slide.shape_id();
        slide.push(shapes::picture(
            id,
            "Banner",
            &rel,
            Frame::new(inches(-0.69), inches(1.52), inches(10.69), inches(5.98)),
        ));
    }
    add_title(
        slide,
        title,
        COVER_TITLE_PT,
        Frame::new(inches(1.0), inches(0.5), inches(8.0), inches(1.5)),
        true,
    );
}

/// Index slide: one underlined leader line per section, each with a
/// click action jumping to the section's title slide.
fn build_index(slide: &mut SlideParts, ctx: &SlideContext, title: &str, entries: &[IndexEntry]) {
    add_title(
        slide,
        title,
        SECTION_TITLE_PT,
        Frame::new(inches(0.5), inches(0.3), inches(9.0), inches(1.0)),
        false,
    );

    for (i, entry) in entries.iter().enumerate() {
        let click_rel = ctx
            .section_slides
            .get(&entry.target)
            .map(|n| slide.add_rel(REL_SLIDE, format!("slide{n}.xml"), false));

        let line_style = RunStyle {
            underline: true,
            ..style(INDEX_LINE_PT)
        };
        let runs = shapes::run(&entry.line, &line_style);
        let body = shapes::paragraph(None, &runs);
        let frame = Frame::new(
            inches(0.5),
            inches(2.5 + 0.6 * i as f64),
            inches(9.0),
            inches(0.5),
        );
        let id = slide.shape_id();
        slide.push(shapes::textbox(id, "IndexEntry", frame, &body, click_rel.as_deref()));
    }
}

/// Overview slide: per-category table, pie chart, totals block.
fn build_overview(
    slide: &mut SlideParts,
    ctx: &SlideContext,
    title: &str,
    stats: &ReportStats,
    has_chart: bool,
) {
    add_title(
        slide,
        title,
        SECTION_TITLE_PT,
        Frame::new(inches(0.5), inches(0.3), inches(9.0), inches(1.0)),
        false,
    );

    let frame = Frame::new(inches(0.5), inches(1.5), inches(4.5), inches(3.0));
    let row_count = stats.by_category.len() + 1;
    let row_height = frame.cy / row_count as i64;

    let mut rows_xml = String::new();
    let header_style = RunStyle {
        bold: true,
        ..style(OVERVIEW_HEADER_PT)
    };
    let header_cells: String = OVERVIEW_HEADERS
        .iter()
        .map(|h| {
            let p = shapes::paragraph(Some("ctr"), &shapes::run(h, &header_style));
            shapes::table_cell(&p, BG_COLOR, TEXT_COLOR, CELL_BORDER_WIDTH)
        })
        .collect();
    rows_xml.push_str(&shapes::table_row(row_height, &header_cells));

    for (category, category_stats) in &stats.by_category {
        let values = [
            category.clone(),
            category_stats.count.to_string(),
            group_thousands(category_stats.circulation),
        ];
        let cells: String = values
            .iter()
            .map(|v| {
                let p = shapes::paragraph(None, &shapes::run(v, &style(OVERVIEW_CELL_PT)));
                shapes::table_cell(&p, BG_COLOR, TEXT_COLOR, CELL_BORDER_WIDTH)
            })
            .collect();
        rows_xml.push_str(&shapes::table_row(row_height, &cells));
    }

    let id = slide.shape_id();
    slide.push(shapes::table_graphic(id, "Overview table", frame, 3, &rows_xml));

    if has_chart {
        if let Some(target) = ctx.chart_target {
            let rel = slide.add_rel(REL_IMAGE, target, false);
            let id = slide.shape_id();
            slide.push(shapes::picture(
                id,
                "Outlet chart",
                &rel,
                Frame::new(inches(6.0), inches(1.5), inches(3.0), inches(3.0)),
            ));
        }
    }

    let totals = [
        format!("—Total de notícias: {}", stats.total_rows),
        format!("—Circulação total: {}", group_thousands(stats.total_circulation)),
        format!("—AAV total: {}", group_thousands(stats.total_reach)),
    ];
    let body: String = totals
        .iter()
        .map(|line| shapes::paragraph(None, &shapes::run(line, &style(SUBTITLE_PT))))
        .collect();
    let id = slide.shape_id();
    slide.push(shapes::textbox(
        id,
        "Totals",
        Frame::new(inches(0.5), inches(5.3), inches(5.0), inches(1.0)),
        &body,
        None,
    ));
}

/// Section title slide: the category name and two stat boxes.
fn build_section_intro(slide: &mut SlideParts, category: &str, count: usize, circulation: i64) {
    add_title(
        slide,
        category,
        SECTION_TITLE_PT,
        Frame::new(inches(0.5), inches(0.3), inches(9.0), inches(1.0)),
        false,
    );

    let box_width = inches(3.0);
    let box_height = inches(1.5);
    let top = (SLIDE_HEIGHT - box_height) / 2;
    let stat_style = RunStyle {
        typeface: STAT_TYPEFACE,
        ..style(STAT_PT)
    };

    let boxes = [
        (inches(2.0), format!("Total de notícias: {count}")),
        (
            inches(5.5),
            format!("Circulação acumulada: {}", group_thousands(circulation)),
        ),
    ];
    for (left, text) in boxes {
        let body = shapes::paragraph(Some("ctr"), &shapes::run(&text, &stat_style));
        let id = slide.shape_id();
        slide.push(shapes::rectangle(
            id,
            "Stat box",
            Frame::new(left, top, box_width, box_height),
            BG_COLOR,
            BG_COLOR,
            CELL_BORDER_WIDTH,
            &body,
        ));
    }
}

/// Data table slide: centered title and one bordered table; title
/// cells become external hyperlinks when the clipping carries one.
fn build_table_page(slide: &mut SlideParts, title: &str, rows: &[Clipping], with_byline: bool) {
    add_title(
        slide,
        title,
        TABLE_TITLE_PT,
        Frame::new(inches(1.77), inches(0.29), inches(7.05), inches(0.71)),
        true,
    );

    let mut headers: Vec<&str> = TABLE_HEADERS.to_vec();
    if with_byline {
        headers.extend(BYLINE_HEADERS);
    }

    // A near-empty table keeps a compact height.
    let table_height = if rows.len() <= 1 { inches(1.5) } else { inches(5.0) };
    let frame = Frame::new(inches(0.5), inches(1.5), inches(9.0), table_height);
    let row_height = frame.cy / (rows.len() + 1) as i64;

    let header_style = RunStyle {
        bold: true,
        ..style(TABLE_HEADER_PT)
    };
    let mut rows_xml = String::new();
    let header_cells: String = headers
        .iter()
        .map(|h| {
            let p = shapes::paragraph(Some("ctr"), &shapes::run(h, &header_style));
            shapes::table_cell(&p, BG_COLOR, TEXT_COLOR, CELL_BORDER_WIDTH)
        })
        .collect();
    rows_xml.push_str(&shapes::table_row(row_height, &header_cells));

    for clipping in rows {
        let link_rel = clipping
            .link
            .as_deref()
            .filter(|l| !l.is_empty())
            .map(|l| slide.add_rel(REL_HYPERLINK, l.to_string(), true));

        let mut cells = String::new();
        cells.push_str(&plain_cell(&clipping.outlet));
        cells.push_str(&plain_cell(&clipping.published_iso()));

        let title_style = RunStyle {
            underline: link_rel.is_some(),
            link_rel: link_rel.as_deref(),
            ..style(TABLE_CELL_PT)
        };
        let title_paragraph = shapes::paragraph(None, &shapes::run(&clipping.title, &title_style));
        cells.push_str(&shapes::table_cell(
            &title_paragraph,
            BG_COLOR,
            TEXT_COLOR,
            CELL_BORDER_WIDTH,
        ));

        cells.push_str(&plain_cell(&clipping.publication));
        cells.push_str(&plain_cell(&clipping.circulation.to_string()));
        if with_byline {
            cells.push_str(&plain_cell(clipping.author.as_deref().unwrap_or("")));
            cells.push_str(&plain_cell(clipping.institution.as_deref().unwrap_or("")));
        }
        rows_xml.push_str(&shapes::table_row(row_height, &cells));
    }

    let id = slide.shape_id();
    slide.push(shapes::table_graphic(
        id,
        "Clippings table",
        frame,
        headers.len(),
        &rows_xml,
    ));
}

fn plain_cell(text: &str) -> String {
    let p = shapes::paragraph(None, &shapes::run(text, &style(TABLE_CELL_PT)));
    shapes::table_cell(&p, BG_COLOR, TEXT_COLOR, CELL_BORDER_WIDTH)
}

/// Right-aligned page number in the bottom corner.
fn add_footer(slide: &mut SlideParts, number: usize) {
    let body = shapes::paragraph(
        Some("r"),
        &shapes::run(&number.to_string(), &style(FOOTER_PT)),
    );
    let frame = Frame::new(
        SLIDE_WIDTH - inches(1.2),
        SLIDE_HEIGHT - inches(0.5),
        inches(1.0),
        inches(0.3),
    );
    let id = slide.shape_id();
    slide.push(shapes::textbox(id, "Page number", frame, &body, None));
}

/// Wrap a shape list into a complete slide part with the deck
/// background.
fn slide_xml(shapes: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="{BG_COLOR}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{shapes}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#
    )
}
