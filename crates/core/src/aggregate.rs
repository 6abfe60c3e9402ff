//! Aggregate statistics over the filtered clipping set.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::ReportConfig;
use crate::model::Categorized;

/// Count and circulation subtotal for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub count: usize,
    pub circulation: i64,
}

/// Report-wide totals plus the ordered per-category breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStats {
    /// Rows remaining after exclusion filtering.
    pub total_rows: usize,

    /// Circulation summed over all remaining rows.
    pub total_circulation: i64,

    /// Reach summed over rows that carry it; zero when none do.
    pub total_reach: i64,

    /// Categories in display order. Zero-count categories are omitted
    /// rather than listed with zeros.
    pub by_category: Vec<(String, CategoryStats)>,
}

/// Compute report totals and the per-category breakdown.
///
/// Categories appear in the configured display order; rows in
/// categories outside that list count toward the totals but get no
/// line of their own.
pub fn aggregate(config: &ReportConfig, rows: &[Categorized]) -> ReportStats {
    let total_rows = rows.len();
    let total_circulation = rows.iter().map(|r| r.clipping.circulation).sum();
    let total_reach = rows.iter().filter_map(|r| r.clipping.reach).sum();

    let mut by_category = Vec::new();
    for category in &config.category_order {
        let mut count = 0usize;
        let mut circulation = 0i64;
        for row in rows.iter().filter(|r| &r.category == category) {
            count += 1;
            circulation += row.clipping.circulation;
        }
        if count > 0 {
            by_category.push((category.clone(), CategoryStats { count, circulation }));
        }
    }

    ReportStats {
        total_rows,
        total_circulation,
        total_reach,
        by_category,
    }
}

/// Mentions per outlet, most frequent first; ties keep first-seen order.
pub fn outlet_distribution(rows: &[Categorized]) -> Vec<(String, usize)> {
    let mut first_seen: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in rows {
        let outlet = row.clipping.outlet.clone();
        if !counts.contains_key(&outlet) {
            first_seen.push(outlet.clone());
        }
        *counts.entry(outlet).or_insert(0) += 1;
    }

    let mut distribution: Vec<(String, usize)> = first_seen
        .into_iter()
        .map(|outlet| {
            let count = counts[&outlet];
            (outlet, count)
        })
        .collect();
    // Stable sort, so equal counts stay in first-seen order.
    distribution.sort_by(|a, b| b.1.cmp(&a.1));
    distribution
}
