// Strategy filtering and ordering
pub mod query;

pub use query::{FilterQuery, RiskFilter, SortKey, TypeFilter};

use crate::models::StrategyRecord;
use std::cmp::Ordering;

/// Apply search, risk and type predicates, then order by the selected key
///
/// Never mutates `records` and never fails. All sorts are stable, so ties keep
/// their input order and a `None` sort key returns the filtered records as-is.
pub fn filter_and_sort(records: &[StrategyRecord], query: &FilterQuery) -> Vec<StrategyRecord> {
    let needle = if query.search_text.trim().is_empty() {
        String::new()
    } else {
        query.search_text.to_lowercase()
    };

    let mut view: Vec<StrategyRecord> = records
        .iter()
        .filter(|r| matches_search(r, &needle))
        .filter(|r| query.risk.matches(r.risk_level))
        .filter(|r| query.strategy_type.matches(r.strategy_type))
        .cloned()
        .collect();

    match query.sort_by {
        Some(SortKey::Performance) => {
            view.sort_by(|a, b| cmp_returns(b.performance.returns, a.performance.returns))
        }
        Some(SortKey::Name) => view.sort_by_cached_key(|r| name_key(&r.name)),
        Some(SortKey::Risk) => view.sort_by_key(|r| r.risk_level.rank()),
        Some(SortKey::Recent) => view.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        None => {}
    }

    tracing::debug!(
        "Filtered {} of {} strategies (sort: {})",
        view.len(),
        records.len(),
        query.sort_by.map(|k| k.as_str()).unwrap_or("none")
    );

    view
}

/// Case-insensitive substring match on name, description and type.
/// `needle` must already be lowercased; empty matches everything.
fn matches_search(record: &StrategyRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    [
        record.name.as_str(),
        record.description.as_str(),
        record.strategy_type.as_str(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(needle))
}

/// Total order on returns where `-0.0` and `0.0` tie
pub fn cmp_returns(a: f64, b: f64) -> Ordering {
    (a + 0.0).total_cmp(&(b + 0.0))
}

/// Collation key for A-Z ordering: case folded first, raw text breaks ties
pub fn name_key(name: &str) -> (String, String) {
    (name.to_lowercase(), name.to_string())
}
