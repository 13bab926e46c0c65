//! Filtering and sorting of raw sales records for the tabular view.
//!
//! Operates on records, not chart points: the sales table shows every entry
//! with its product name, so aggregation would lose information here.

use anyhow::{bail, Result};
use chrono::NaiveDate;

use crate::models::{Product, SalesRecord, SummaryStats};

/// Sort order for the sales table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    DateAsc,
    DateDesc,
    QuantityAsc,
    QuantityDesc,
}

impl SortKey {
    pub fn parse(value: &str) -> Result<SortKey> {
        match value {
            "date-asc" => Ok(SortKey::DateAsc),
            "date-desc" => Ok(SortKey::DateDesc),
            "quantity-asc" => Ok(SortKey::QuantityAsc),
            "quantity-desc" => Ok(SortKey::QuantityDesc),
            other => bail!(
                "Unknown sort key: {}. Use date-asc, date-desc, quantity-asc, or quantity-desc.",
                other
            ),
        }
    }
}

/// Filter and ordering criteria for [`filter_and_sort`].
#[derive(Debug, Clone)]
pub struct SalesFilter {
    /// `None` means all products.
    pub product_id: Option<i64>,
    /// Case-insensitive match on product name/SKU, verbatim match on date.
    pub search: Option<String>,
    pub sort: SortKey,
}

/// Filter sales records by product and search text, then sort.
///
/// The sort is stable: records comparing equal under the chosen key keep
/// their relative input order, so re-filtering does not shuffle ties.
pub fn filter_and_sort(
    records: &[SalesRecord],
    products: &[Product],
    filter: &SalesFilter,
) -> Vec<SalesRecord> {
    let mut filtered: Vec<SalesRecord> = records
        .iter()
        .filter(|record| {
            if let Some(product_id) = filter.product_id {
                if record.product_id != product_id {
                    return false;
                }
            }
            match filter.search.as_deref() {
                Some(text) if !text.is_empty() => matches_search(record, products, text),
                _ => true,
            }
        })
        .cloned()
        .collect();

    match filter.sort {
        SortKey::DateAsc => filtered.sort_by(|a, b| calendar_date(a).cmp(&calendar_date(b))),
        SortKey::DateDesc => filtered.sort_by(|a, b| calendar_date(b).cmp(&calendar_date(a))),
        SortKey::QuantityAsc => filtered.sort_by(|a, b| {
            a.sales_quantity
                .partial_cmp(&b.sales_quantity)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
        SortKey::QuantityDesc => filtered.sort_by(|a, b| {
            b.sales_quantity
                .partial_cmp(&a.sales_quantity)
                .unwrap_or(std::cmp::Ordering::Equal)
        }),
    }

    filtered
}

/// Totals over a filtered record set, backing the summary cards above the
/// table. Average is 0 for an empty set.
pub fn summarize(records: &[SalesRecord]) -> SummaryStats {
    let total: f64 = records.iter().map(|r| r.sales_quantity).sum();
    let count = records.len();
    let average = if count > 0 { total / count as f64 } else { 0.0 };
    SummaryStats {
        total,
        average,
        count,
    }
}

/// Display name for a record's product, `"Unknown"` when the product list
/// does not contain it.
pub fn product_name(products: &[Product], product_id: i64) -> &str {
    products
        .iter()
        .find(|p| p.product_id == product_id)
        .map(|p| p.product_name.as_str())
        .unwrap_or("Unknown")
}

fn matches_search(record: &SalesRecord, products: &[Product], text: &str) -> bool {
    let needle = text.to_lowercase();
    let product = products.iter().find(|p| p.product_id == record.product_id);

    let name_hit = product
        .map(|p| p.product_name.to_lowercase().contains(&needle))
        .unwrap_or(false);
    let sku_hit = product
        .and_then(|p| p.sku.as_ref())
        .map(|sku| sku.to_lowercase().contains(&needle))
        .unwrap_or(false);

    // Date matching is verbatim, not lowercased.
    name_hit || sku_hit || record.sales_date.contains(text)
}

/// Date ordering uses parsed calendar dates, not string comparison.
/// Unparseable dates sort first; the data-access layer validates shape
/// before records reach this module.
fn calendar_date(record: &SalesRecord) -> NaiveDate {
    NaiveDate::parse_from_str(&record.sales_date, "%Y-%m-%d").unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(order: i64, product: i64, date: &str, qty: f64) -> SalesRecord {
        SalesRecord {
            order_id: Some(order),
            product_id: product,
            sales_date: date.to_string(),
            sales_quantity: qty,
        }
    }

    fn product(id: i64, name: &str, sku: Option<&str>) -> Product {
        Product {
            product_id: id,
            product_name: name.to_string(),
            sku: sku.map(str::to_string),
            description: None,
        }
    }

    fn fixture() -> (Vec<SalesRecord>, Vec<Product>) {
        let records = vec![
            record(1, 1, "2024-01-03", 5.0),
            record(2, 2, "2024-01-01", 9.0),
            record(3, 1, "2024-01-02", 2.0),
            record(4, 2, "2024-01-04", 2.0),
        ];
        let products = vec![
            product(1, "Espresso Beans", Some("SKU-ESP")),
            product(2, "Filter Paper", None),
        ];
        (records, products)
    }

    fn filter(product_id: Option<i64>, search: Option<&str>, sort: SortKey) -> SalesFilter {
        SalesFilter {
            product_id,
            search: search.map(str::to_string),
            sort,
        }
    }

    fn order_ids(records: &[SalesRecord]) -> Vec<i64> {
        records.iter().filter_map(|r| r.order_id).collect()
    }

    #[test]
    fn test_product_filter() {
        let (records, products) = fixture();
        let out = filter_and_sort(&records, &products, &filter(Some(1), None, SortKey::DateAsc));
        assert_eq!(order_ids(&out), vec![3, 1]);
        assert!(out.iter().all(|r| r.product_id == 1));
    }

    #[test]
    fn test_search_matches_name_case_insensitive() {
        let (records, products) = fixture();
        let out = filter_and_sort(
            &records,
            &products,
            &filter(None, Some("espresso"), SortKey::DateAsc),
        );
        assert_eq!(order_ids(&out), vec![3, 1]);
    }

    #[test]
    fn test_search_matches_sku_and_date() {
        let (records, products) = fixture();
        let by_sku = filter_and_sort(
            &records,
            &products,
            &filter(None, Some("sku-esp"), SortKey::DateAsc),
        );
        assert_eq!(order_ids(&by_sku), vec![3, 1]);

        let by_date = filter_and_sort(
            &records,
            &products,
            &filter(None, Some("2024-01-04"), SortKey::DateAsc),
        );
        assert_eq!(order_ids(&by_date), vec![4]);
    }

    #[test]
    fn test_search_without_product_match_keeps_date_hits_only() {
        let (mut records, products) = fixture();
        // Record for a product the product list doesn't know.
        records.push(record(5, 99, "2024-01-05", 1.0));
        let out = filter_and_sort(
            &records,
            &products,
            &filter(None, Some("2024-01-05"), SortKey::DateAsc),
        );
        assert_eq!(order_ids(&out), vec![5]);
    }

    #[test]
    fn test_date_sort_asc_desc_reverse_each_other() {
        let (records, products) = fixture();
        let asc = filter_and_sort(&records, &products, &filter(None, None, SortKey::DateAsc));
        let desc = filter_and_sort(&records, &products, &filter(None, None, SortKey::DateDesc));
        let mut reversed = order_ids(&desc);
        reversed.reverse();
        assert_eq!(order_ids(&asc), reversed);
        assert_eq!(order_ids(&asc), vec![2, 3, 1, 4]);
    }

    #[test]
    fn test_quantity_sort_numeric() {
        let (records, products) = fixture();
        let out = filter_and_sort(
            &records,
            &products,
            &filter(None, None, SortKey::QuantityDesc),
        );
        assert_eq!(order_ids(&out), vec![2, 1, 3, 4]);
    }

    #[test]
    fn test_quantity_ties_keep_input_order() {
        let (records, products) = fixture();
        let out = filter_and_sort(
            &records,
            &products,
            &filter(None, None, SortKey::QuantityAsc),
        );
        // Orders 3 and 4 both have quantity 2.0; input order must hold.
        assert_eq!(order_ids(&out), vec![3, 4, 1, 2]);
    }

    #[test]
    fn test_summarize_empty_is_zero() {
        let stats = summarize(&[]);
        assert_eq!(stats.total, 0.0);
        assert_eq!(stats.average, 0.0);
        assert_eq!(stats.count, 0);
    }

    #[test]
    fn test_summarize_totals() {
        let (records, _) = fixture();
        let stats = summarize(&records);
        assert!((stats.total - 18.0).abs() < 1e-9);
        assert!((stats.average - 4.5).abs() < 1e-9);
        assert_eq!(stats.count, 4);
    }

    #[test]
    fn test_product_name_unknown() {
        let (_, products) = fixture();
        assert_eq!(product_name(&products, 1), "Espresso Beans");
        assert_eq!(product_name(&products, 42), "Unknown");
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::parse("date-desc").unwrap(), SortKey::DateDesc);
        assert!(SortKey::parse("newest").is_err());
    }
}
