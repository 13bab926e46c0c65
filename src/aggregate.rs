//! Time-series aggregation over raw sales records.
//!
//! Turns flat sales entries into chart-ready series, either for a single
//! product (preserving backend order) or summed across all products per
//! calendar date. Both functions are pure; callers re-run them whenever the
//! source records change.

use std::collections::BTreeMap;

use crate::models::{AggregatedSeries, ChartPoint, SalesRecord};

/// Build a series for one product, keeping the source order of the records.
///
/// The backend returns per-product sales in chronological order, so no
/// re-sort happens here. Records for other products are filtered out.
pub fn aggregate_by_product(records: &[SalesRecord], product_id: i64) -> AggregatedSeries {
    records
        .iter()
        .filter(|r| r.product_id == product_id)
        .map(|r| ChartPoint {
            label: r.sales_date.clone(),
            quantity: r.sales_quantity,
        })
        .collect()
}

/// Build a cross-product series: quantities summed per calendar date,
/// points sorted ascending by date.
///
/// ISO 8601 date strings compare lexicographically in chronological order,
/// which is what the `BTreeMap` key ordering gives us. Dates are unique
/// after grouping, so there is no tie to break. Empty input yields an
/// empty series.
pub fn aggregate_across_products(records: &[SalesRecord]) -> AggregatedSeries {
    let mut totals: BTreeMap<String, f64> = BTreeMap::new();
    for record in records {
        *totals.entry(record.sales_date.clone()).or_insert(0.0) += record.sales_quantity;
    }

    totals
        .into_iter()
        .map(|(label, quantity)| ChartPoint { label, quantity })
        .collect()
}
