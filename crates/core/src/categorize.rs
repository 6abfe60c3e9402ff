//! Category resolution: a rename-and-filter projection of the
//! primary topic.

use crate::config::ReportConfig;
use crate::model::{Categorized, Clipping};

/// Resolve the report category for a primary topic.
///
/// Renamed topics map to their section label; every other topic passes
/// through verbatim. A missing topic yields the unnamed category.
pub fn resolve_category(config: &ReportConfig, primary_topic: Option<&str>) -> String {
    let topic = primary_topic.unwrap_or("");
    match config.renamed_topic(topic) {
        Some(renamed) => renamed.to_string(),
        None => topic.to_string(),
    }
}

/// Attach a category to each clipping and drop the excluded ones.
///
/// Dropped rows take no further part in the report: no pages, no
/// totals, no mention anywhere.
pub fn categorize_clippings(config: &ReportConfig, clippings: Vec<Clipping>) -> Vec<Categorized> {
    clippings
        .into_iter()
        .filter_map(|clipping| {
            let category = resolve_category(config, clipping.primary_topic.as_deref());
            if config.is_excluded(&category) {
                None
            } else {
                Some(Categorized { category, clipping })
            }
        })
        .collect()
}
