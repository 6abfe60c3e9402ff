//! Assembly of the full page sequence.
//!
//! Pages are pure data; the renderer turns them into slides in a
//! separate pass. The index is numbered against the sequence as built
//! (cover = 1, overview = 2, ...) and only then spliced in directly
//! after the cover, without renumbering. Footer numbers are assigned
//! by the renderer over the final order, so every page after the index
//! shows a footer one higher than its printed index number; navigation
//! targets are resolved against the final order and always land on the
//! right slide.

use log::debug;

use crate::aggregate::{self, ReportStats};
use crate::categorize;
use crate::config::ReportConfig;
use crate::index::build_index_page;
use crate::model::{Clipping, Page, SectionTarget};
use crate::paginate::paginate_category;

/// A fully assembled report: the ordered page sequence plus the stats
/// behind the overview.
#[derive(Debug, Clone)]
pub struct Outline {
    pub pages: Vec<Page>,
    pub stats: ReportStats,
}

/// Build the complete page sequence for one report.
///
/// `chart_png` is the pre-rendered outlet pie for the overview; pass
/// `None` to omit the picture.
pub fn build_outline(
    config: &ReportConfig,
    clippings: Vec<Clipping>,
    chart_png: Option<Vec<u8>>,
) -> Outline {
    let rows = categorize::categorize_clippings(config, clippings);
    from_categorized(config, rows, chart_png)
}

/// Build the page sequence from rows that already carry their
/// categories. Callers that need the filtered rows for other steps
/// (the outlet chart, for one) categorize once and come in here.
pub fn from_categorized(
    config: &ReportConfig,
    rows: Vec<crate::model::Categorized>,
    chart_png: Option<Vec<u8>>,
) -> Outline {
    let stats = aggregate::aggregate(config, &rows);

    let mut pages = vec![Page::Cover {
        title: config.cover_title.clone(),
    }];
    pages.push(Page::Overview {
        title: config.overview_title.clone(),
        stats: stats.clone(),
        chart_png,
    });

    for (category, _) in &stats.by_category {
        let members: Vec<Clipping> = rows
            .iter()
            .filter(|r| &r.category == category)
            .map(|r| r.clipping.clone())
            .collect();
        pages.extend(paginate_category(config, category, members));
    }
    pages.push(Page::Closing {
        title: config.closing_title.clone(),
    });

    // Page numbers come from the sequence built so far, 1-based.
    let mut sections = vec![(
        config.overview_title.clone(),
        SectionTarget::Overview,
        position_of(&pages, |p| matches!(p, Page::Overview { .. })),
    )];
    for (category, _) in &stats.by_category {
        let number = position_of(&pages, |p| {
            matches!(p, Page::SectionIntro { category: c, .. } if c == category)
        });
        sections.push((
            category.clone(),
            SectionTarget::Category(category.clone()),
            number,
        ));
    }

    let index = build_index_page(config, &sections);
    pages.insert(1, index);

    debug!(
        "assembled {} pages across {} sections",
        pages.len(),
        stats.by_category.len()
    );

    Outline { pages, stats }
}

/// 1-based position of the first page matching the predicate.
fn position_of(pages: &[Page], pred: impl Fn(&Page) -> bool) -> Option<usize> {
    pages.iter().position(|p| pred(p)).map(|i| i + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::IndexEntry;
    use chrono::NaiveDate;

    fn clipping(topic: &str, day: u32) -> Clipping {
        Clipping {
            title: format!("{topic}-{day}"),
            primary_topic: Some(topic.to_string()),
            published: NaiveDate::from_ymd_opt(2024, 6, day),
            circulation: 100,
            ..Clipping::default()
        }
    }

    fn scenario_config() -> ReportConfig {
        ReportConfig {
            category_order: vec!["A".into(), "B".into()],
            excluded_categories: vec!["C".into()],
            topic_renames: Vec::new(),
            byline_categories: Vec::new(),
            ..ReportConfig::default()
        }
    }

    fn index_entries(page: &Page) -> &[IndexEntry] {
        match page {
            Page::Index { entries, .. } => entries,
            other => panic!("expected the index page, got {other:?}"),
        }
    }

    #[test]
    fn sequence_is_cover_index_overview_sections_closing() {
        let config = scenario_config();
        let rows = vec![clipping("A", 1), clipping("B", 2)];
        let outline = build_outline(&config, rows, None);

        assert!(matches!(outline.pages[0], Page::Cover { .. }));
        assert!(matches!(outline.pages[1], Page::Index { .. }));
        assert!(matches!(outline.pages[2], Page::Overview { .. }));
        assert!(matches!(outline.pages.last(), Some(Page::Closing { .. })));
    }

    #[test]
    fn excluded_category_never_reaches_pages_or_totals() {
        let config = scenario_config();
        let mut rows: Vec<Clipping> = (1..=4).map(|d| clipping("A", d)).collect();
        rows.extend((1..=4).map(|d| clipping("B", d)));
        rows.extend((1..=2).map(|d| clipping("C", d)));

        let outline = build_outline(&config, rows, None);
        assert_eq!(outline.stats.total_rows, 8);
        assert_eq!(outline.stats.by_category.len(), 2);
        assert!(!outline.pages.iter().any(|p| matches!(
            p,
            Page::SectionIntro { category, .. } if category == "C"
        )));
        assert!(!outline.pages.iter().any(|p| matches!(
            p,
            Page::Table { rows, .. } if rows.iter().any(|r| r.primary_topic.as_deref() == Some("C"))
        )));
    }

    #[test]
    fn index_numbers_use_the_pre_splice_sequence() {
        let config = scenario_config();
        let rows = vec![clipping("A", 1), clipping("B", 2)];
        let outline = build_outline(&config, rows, None);

        // Pre-splice: cover 1, overview 2, A intro 3, A table 4, B intro 5.
        let entries = index_entries(&outline.pages[1]);
        assert_eq!(entries[0].page_number, Some(2));
        assert_eq!(entries[1].page_number, Some(3));
        assert_eq!(entries[2].page_number, Some(5));

        // Post-splice the overview actually sits at position 3: the
        // printed numbers deliberately stay one behind.
        assert!(matches!(outline.pages[2], Page::Overview { .. }));
    }

    #[test]
    fn index_lists_overview_first_then_sections_in_order() {
        let config = scenario_config();
        let rows = vec![clipping("B", 1), clipping("A", 2)];
        let outline = build_outline(&config, rows, None);
        let titles: Vec<&str> = index_entries(&outline.pages[1])
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, [config.overview_title.as_str(), "A", "B"]);
    }

    #[test]
    fn empty_input_still_produces_a_complete_deck() {
        let config = scenario_config();
        let outline = build_outline(&config, Vec::new(), None);
        assert_eq!(outline.pages.len(), 4);
        assert_eq!(outline.stats.total_rows, 0);
        let entries = index_entries(&outline.pages[1]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].page_number, Some(2));
    }

    #[test]
    fn category_pages_concatenate_to_the_filtered_sorted_set() {
        let config = scenario_config();
        let rows: Vec<Clipping> = (1..=7).map(|d| clipping("A", d)).collect();
        let outline = build_outline(&config, rows, None);

        let concatenated: Vec<String> = outline
            .pages
            .iter()
            .filter_map(|p| match p {
                Page::Table { rows, .. } => Some(rows.iter().map(|r| r.title.clone())),
                _ => None,
            })
            .flatten()
            .collect();
        let expected: Vec<String> = (1..=7).rev().map(|d| format!("A-{d}")).collect();
        assert_eq!(concatenated, expected);
    }
}
