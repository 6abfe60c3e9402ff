//! Splitting one category's clippings into slides.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::config::ReportConfig;
use crate::model::{Clipping, Page};
use crate::normalize::is_blank;

/// Pages for one category: a title slide carrying the section totals,
/// then data tables of at most `rows_per_page` rows each.
///
/// When any row of the category carries a secondary topic, the data
/// pages are partitioned by that topic (titled "Category — Subtopic",
/// subtopics in ascending order); rows with a blank secondary topic
/// contribute no subgroup and no page. Section totals are computed
/// before that partition, over every row of the category.
pub fn paginate_category(
    config: &ReportConfig,
    category: &str,
    rows: Vec<Clipping>,
) -> Vec<Page> {
    let count = rows.len();
    let circulation = rows.iter().map(|r| r.circulation).sum();
    let with_byline = config.has_byline(category);

    let mut pages = vec![Page::SectionIntro {
        category: category.to_string(),
        count,
        circulation,
    }];

    let subgrouped = rows
        .iter()
        .any(|r| r.secondary_topic.as_deref().is_some_and(|t| !is_blank(t)));

    if subgrouped {
        let mut groups: BTreeMap<String, Vec<Clipping>> = BTreeMap::new();
        for row in rows {
            if let Some(topic) = row.secondary_topic.clone().filter(|t| !is_blank(t)) {
                groups.entry(topic.trim().to_string()).or_default().push(row);
            }
        }
        for (topic, group) in groups {
            let title = format!("{category} — {topic}");
            push_table_pages(&mut pages, config, &title, group, with_byline);
        }
    } else {
        push_table_pages(&mut pages, config, category, rows, with_byline);
    }

    pages
}

fn push_table_pages(
    pages: &mut Vec<Page>,
    config: &ReportConfig,
    title: &str,
    mut rows: Vec<Clipping>,
    with_byline: bool,
) {
    sort_newest_first(&mut rows);
    for chunk in rows.chunks(config.rows_per_page.max(1)) {
        pages.push(Page::Table {
            title: title.to_string(),
            rows: chunk.to_vec(),
            with_byline,
        });
    }
}

/// Newest first; undated rows sink to the end; ties keep input order.
pub fn sort_newest_first(rows: &mut [Clipping]) {
    rows.sort_by(|a, b| match (a.published, b.published) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dated(title: &str, ymd: (i32, u32, u32)) -> Clipping {
        Clipping {
            title: title.to_string(),
            published: NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2),
            ..Clipping::default()
        }
    }

    fn table_pages(pages: &[Page]) -> Vec<&Page> {
        pages
            .iter()
            .filter(|p| matches!(p, Page::Table { .. }))
            .collect()
    }

    fn table_rows(page: &Page) -> &[Clipping] {
        match page {
            Page::Table { rows, .. } => rows,
            other => panic!("expected a table page, got {other:?}"),
        }
    }

    #[test]
    fn six_rows_fit_one_page_seven_need_two() {
        let config = ReportConfig::default();

        let six: Vec<Clipping> = (0..6).map(|i| dated(&format!("n{i}"), (2024, 1, 1 + i))).collect();
        let pages = paginate_category(&config, "Eventos", six);
        assert_eq!(table_pages(&pages).len(), 1);

        let seven: Vec<Clipping> = (0..7).map(|i| dated(&format!("n{i}"), (2024, 1, 1 + i))).collect();
        let pages = paginate_category(&config, "Eventos", seven);
        let tables = table_pages(&pages);
        assert_eq!(tables.len(), 2);
        assert_eq!(table_rows(tables[0]).len(), 6);
        assert_eq!(table_rows(tables[1]).len(), 1);
    }

    #[test]
    fn first_page_is_the_section_intro() {
        let config = ReportConfig::default();
        let pages = paginate_category(&config, "Eventos", vec![dated("a", (2024, 5, 1))]);
        assert!(matches!(
            &pages[0],
            Page::SectionIntro { category, count: 1, .. } if category == "Eventos"
        ));
    }

    #[test]
    fn rows_are_sorted_newest_first_across_pages() {
        let config = ReportConfig::default();
        let rows = vec![
            dated("old", (2024, 1, 1)),
            dated("new", (2024, 3, 1)),
            dated("mid", (2024, 2, 1)),
        ];
        let pages = paginate_category(&config, "Eventos", rows);
        let titles: Vec<&str> = table_rows(table_pages(&pages)[0])
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, ["new", "mid", "old"]);
    }

    #[test]
    fn equal_dates_keep_input_order() {
        let config = ReportConfig::default();
        let rows = vec![dated("first", (2024, 2, 2)), dated("second", (2024, 2, 2))];
        let pages = paginate_category(&config, "Eventos", rows);
        let titles: Vec<&str> = table_rows(table_pages(&pages)[0])
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, ["first", "second"]);
    }

    #[test]
    fn undated_rows_sort_last() {
        let config = ReportConfig::default();
        let rows = vec![
            Clipping {
                title: "undated".into(),
                ..Clipping::default()
            },
            dated("dated", (2024, 1, 1)),
        ];
        let pages = paginate_category(&config, "Eventos", rows);
        let titles: Vec<&str> = table_rows(table_pages(&pages)[0])
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(titles, ["dated", "undated"]);
    }

    #[test]
    fn secondary_topics_partition_the_category() {
        let config = ReportConfig::default();
        let mut rows = vec![
            dated("b1", (2024, 1, 2)),
            dated("a1", (2024, 1, 1)),
            dated("b2", (2024, 1, 3)),
        ];
        rows[0].secondary_topic = Some("Investigação".into());
        rows[1].secondary_topic = Some("Ensino".into());
        rows[2].secondary_topic = Some("Investigação".into());

        let pages = paginate_category(&config, "Academia", rows);
        let tables = table_pages(&pages);
        assert_eq!(tables.len(), 2);
        // Subtopics in ascending order.
        assert!(matches!(
            tables[0],
            Page::Table { title, .. } if title == "Academia — Ensino"
        ));
        assert!(matches!(
            tables[1],
            Page::Table { title, .. } if title == "Academia — Investigação"
        ));
    }

    #[test]
    fn blank_secondary_topic_gets_no_page_but_counts_in_totals() {
        let config = ReportConfig::default();
        let mut rows = vec![dated("kept", (2024, 1, 1)), dated("skipped", (2024, 1, 2))];
        rows[0].secondary_topic = Some("Ensino".into());
        rows[1].secondary_topic = Some("  ".into());

        let pages = paginate_category(&config, "Academia", rows);
        assert!(matches!(&pages[0], Page::SectionIntro { count: 2, .. }));
        let tables = table_pages(&pages);
        assert_eq!(tables.len(), 1);
        assert_eq!(table_rows(tables[0]).len(), 1);
        assert_eq!(table_rows(tables[0])[0].title, "kept");
    }

    #[test]
    fn byline_flag_follows_the_category() {
        let config = ReportConfig::default();
        let pages = paginate_category(&config, "Artigos de opinião", vec![dated("op", (2024, 1, 1))]);
        assert!(matches!(
            table_pages(&pages)[0],
            Page::Table { with_byline: true, .. }
        ));

        let pages = paginate_category(&config, "Eventos", vec![dated("ev", (2024, 1, 1))]);
        assert!(matches!(
            table_pages(&pages)[0],
            Page::Table { with_byline: false, .. }
        ));
    }

    #[test]
    fn page_concatenation_reproduces_the_sorted_category() {
        let config = ReportConfig {
            rows_per_page: 2,
            ..ReportConfig::default()
        };
        let rows: Vec<Clipping> = (0..5).map(|i| dated(&format!("n{i}"), (2024, 1, 1 + i))).collect();
        let mut expected = rows.clone();
        sort_newest_first(&mut expected);

        let pages = paginate_category(&config, "Eventos", rows);
        let concatenated: Vec<Clipping> = table_pages(&pages)
            .iter()
            .flat_map(|p| table_rows(p).iter().cloned())
            .collect();
        assert_eq!(concatenated, expected);
    }
}
