//! Index page construction: leader lines and navigation targets.

use crate::config::ReportConfig;
use crate::model::{IndexEntry, Page, SectionTarget};

/// Build one leader line: title, dot fill, right-aligned page number.
///
/// The fill pads the line to the configured width minus the title and
/// the number's digits, clamped so at least `index_min_fill` dots
/// always separate the two.
pub fn leader_line(config: &ReportConfig, title: &str, page_number: Option<usize>) -> String {
    let number = match page_number {
        Some(n) => n.to_string(),
        None => config.index_placeholder.to_string(),
    };
    let used = title.chars().count() + number.chars().count();
    let fill = config
        .index_line_width
        .saturating_sub(used)
        .max(config.index_min_fill);
    format!("{title}{}{number}", ".".repeat(fill))
}

/// Assemble the index page from `(title, target, page number)` triples,
/// one per section, in display order.
///
/// Page numbers are positions in the sequence as it exists before the
/// index itself is spliced in; they are printed as given, never
/// recomputed afterwards.
pub fn build_index_page(
    config: &ReportConfig,
    sections: &[(String, SectionTarget, Option<usize>)],
) -> Page {
    let entries = sections
        .iter()
        .map(|(title, target, number)| IndexEntry {
            title: title.clone(),
            page_number: *number,
            line: leader_line(config, title, *number),
            target: target.clone(),
        })
        .collect();
    Page::Index {
        title: config.index_title.clone(),
        entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_is_padded_to_the_target_width() {
        let config = ReportConfig::default();
        let line = leader_line(&config, "Eventos", Some(3));
        assert_eq!(line.chars().count(), config.index_line_width);
        assert!(line.starts_with("Eventos"));
        assert!(line.ends_with('3'));
        assert!(line.contains("..."));
    }

    #[test]
    fn width_accounts_for_number_digits() {
        let config = ReportConfig::default();
        let short = leader_line(&config, "A", Some(3));
        let long = leader_line(&config, "A", Some(123));
        assert_eq!(short.chars().count(), long.chars().count());
    }

    #[test]
    fn fill_clamps_at_the_minimum_for_long_titles() {
        let config = ReportConfig::default();
        let title = "T".repeat(config.index_line_width + 5);
        let line = leader_line(&config, &title, Some(12));
        let fill = line.chars().filter(|&c| c == '.').count();
        assert_eq!(fill, config.index_min_fill);
    }

    #[test]
    fn missing_page_number_prints_the_placeholder() {
        let config = ReportConfig::default();
        let line = leader_line(&config, "Eventos", None);
        assert!(line.ends_with('?'));
    }

    #[test]
    fn index_page_carries_one_entry_per_section() {
        let config = ReportConfig::default();
        let sections = vec![
            ("Overview".to_string(), SectionTarget::Overview, Some(2)),
            (
                "Eventos".to_string(),
                SectionTarget::Category("Eventos".into()),
                Some(3),
            ),
        ];
        let page = build_index_page(&config, &sections);
        match page {
            Page::Index { title, entries } => {
                assert_eq!(title, config.index_title);
                assert_eq!(entries.len(), 2);
                assert_eq!(entries[0].page_number, Some(2));
                assert_eq!(entries[1].target, SectionTarget::Category("Eventos".into()));
            }
            other => panic!("expected an index page, got {other:?}"),
        }
    }
}
