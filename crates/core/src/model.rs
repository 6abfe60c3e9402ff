//! Domain types for press clippings and report pages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::ReportStats;

/// One press mention loaded from the spreadsheet. Immutable once loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Clipping {
    /// Outlet that carried the mention (press, radio, online, ...).
    pub outlet: String,

    /// Publication date, when the cell held one.
    pub published: Option<NaiveDate>,

    /// Headline of the mention.
    pub title: String,

    /// Name of the publication.
    pub publication: String,

    /// Circulation figure of the publication.
    pub circulation: i64,

    /// Primary topic as typed in the sheet.
    pub primary_topic: Option<String>,

    /// Secondary topic; only some sections use it.
    pub secondary_topic: Option<String>,

    /// Author, carried for opinion pieces.
    pub author: Option<String>,

    /// Author's institution, carried for opinion pieces.
    pub institution: Option<String>,

    /// Audience-reach estimate.
    pub reach: Option<i64>,

    /// Link target attached to the title cell, if any.
    pub link: Option<String>,
}

impl Clipping {
    /// Publication date formatted for table cells; empty when unknown.
    pub fn published_iso(&self) -> String {
        self.published.map(|d| d.to_string()).unwrap_or_default()
    }
}

/// A clipping together with its resolved report category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Categorized {
    pub category: String,
    pub clipping: Clipping,
}

/// Navigation target of an index line, resolved to a concrete slide
/// only at render time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionTarget {
    Overview,
    Category(String),
}

/// One leader line on the index page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Section title as printed.
    pub title: String,

    /// Printed page number; `None` renders the placeholder character.
    pub page_number: Option<usize>,

    /// The complete leader line ("Title.......N").
    pub line: String,

    /// Slide this line jumps to.
    pub target: SectionTarget,
}

/// An immutable slide descriptor. The renderer turns each descriptor
/// into concrete shapes; nothing here depends on visual layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Page {
    /// Opening slide with the report title and branding.
    Cover { title: String },

    /// Index of sections with leader lines and slide jumps.
    Index { title: String, entries: Vec<IndexEntry> },

    /// Aggregate table, outlet pie chart, and report totals.
    Overview {
        title: String,
        stats: ReportStats,
        /// Pre-rendered pie chart; `None` omits the picture.
        chart_png: Option<Vec<u8>>,
    },

    /// A category's title slide with its count and circulation boxes.
    /// This is the page the index links to.
    SectionIntro {
        category: String,
        count: usize,
        circulation: i64,
    },

    /// One table of clippings, at most a page's worth of rows.
    Table {
        title: String,
        rows: Vec<Clipping>,
        /// Adds the author and institution columns.
        with_byline: bool,
    },

    /// Closing slide.
    Closing { title: String },
}
