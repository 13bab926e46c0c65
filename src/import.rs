//! CSV import of sales entries.
//!
//! Reads a local `Date,Quantity` file (the same schema the export command
//! writes), skips dates the product already has entries for, and creates
//! the rest through the backend. `--dry-run` reports the counts without
//! writing anything.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;

use crate::client::{DataAccess, HttpClient, SalesInput};
use crate::config::Config;
use crate::models::SalesRecord;
use crate::session::Session;

pub async fn run_import(
    config: &Config,
    file: &Path,
    product_id: i64,
    dry_run: bool,
) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read import file: {}", file.display()))?;
    let rows = parse_csv(&content)?;

    let session = Session::load(&config.session.path)?;
    let client = HttpClient::new(&config.api)?;
    let existing = client.sales_by_product(&session, product_id).await?;

    let (to_import, skipped) = plan_import(&rows, &existing);

    if dry_run {
        println!(
            "Dry run: would import {} entries, skip {} duplicates.",
            to_import.len(),
            skipped
        );
        return Ok(());
    }

    for (date, quantity) in &to_import {
        client
            .create_sales_entry(
                &session,
                &SalesInput {
                    product_id,
                    sales_date: date.clone(),
                    sales_quantity: *quantity,
                },
            )
            .await
            .with_context(|| format!("Failed to import entry for {}", date))?;
    }

    if skipped > 0 {
        println!(
            "Imported {} entries. Skipped {} duplicates.",
            to_import.len(),
            skipped
        );
    } else {
        println!("Imported {} entries.", to_import.len());
    }
    Ok(())
}

/// Parse `Date,Quantity` CSV text into (date, quantity) rows.
///
/// The header row is required. Dates must be ISO 8601 calendar dates and
/// quantities non-negative numbers; a malformed row fails the whole import
/// rather than being silently dropped.
fn parse_csv(content: &str) -> Result<Vec<(String, f64)>> {
    let mut lines = content.lines();

    match lines.next() {
        Some(header) if header.trim().eq_ignore_ascii_case("date,quantity") => {}
        Some(header) => bail!("Unexpected CSV header: {}. Expected `Date,Quantity`.", header),
        None => bail!("Import file is empty."),
    }

    let mut rows = Vec::new();
    for (index, line) in lines.enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let line_no = index + 2;

        let (date, quantity) = line
            .split_once(',')
            .with_context(|| format!("Line {}: expected `date,quantity`", line_no))?;
        let date = date.trim();
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Line {}: invalid date `{}`", line_no, date))?;
        let quantity: f64 = quantity
            .trim()
            .parse()
            .with_context(|| format!("Line {}: invalid quantity `{}`", line_no, quantity))?;
        if quantity < 0.0 {
            bail!("Line {}: quantity must be non-negative", line_no);
        }

        rows.push((date.to_string(), quantity));
    }
    Ok(rows)
}

/// Split parsed rows into entries to create and a duplicate count.
///
/// A row is a duplicate when the product already has an entry on that date,
/// or when an earlier row in the same file used the date.
fn plan_import(
    rows: &[(String, f64)],
    existing: &[SalesRecord],
) -> (Vec<(String, f64)>, usize) {
    let mut seen: HashSet<&str> = existing.iter().map(|r| r.sales_date.as_str()).collect();

    let mut to_import = Vec::new();
    let mut skipped = 0;
    for (date, quantity) in rows {
        if seen.insert(date.as_str()) {
            to_import.push((date.clone(), *quantity));
        } else {
            skipped += 1;
        }
    }
    (to_import, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing(dates: &[&str]) -> Vec<SalesRecord> {
        dates
            .iter()
            .enumerate()
            .map(|(i, date)| SalesRecord {
                order_id: Some(i as i64 + 1),
                product_id: 1,
                sales_date: date.to_string(),
                sales_quantity: 1.0,
            })
            .collect()
    }

    #[test]
    fn test_parse_csv_round_trips_export_schema() {
        let rows = parse_csv("Date,Quantity\n2024-01-01,15.0\n2024-01-02,7.5").unwrap();
        assert_eq!(
            rows,
            vec![
                ("2024-01-01".to_string(), 15.0),
                ("2024-01-02".to_string(), 7.5)
            ]
        );
    }

    #[test]
    fn test_parse_csv_skips_blank_lines() {
        let rows = parse_csv("Date,Quantity\n\n2024-01-01,1\n\n").unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_parse_csv_rejects_bad_input() {
        assert!(parse_csv("").is_err());
        assert!(parse_csv("date;quantity\n").is_err());
        assert!(parse_csv("Date,Quantity\n01/02/2024,5").is_err());
        assert!(parse_csv("Date,Quantity\n2024-01-01,many").is_err());
        assert!(parse_csv("Date,Quantity\n2024-01-01,-2").is_err());
    }

    #[test]
    fn test_plan_import_skips_existing_dates() {
        let rows = vec![
            ("2024-01-01".to_string(), 5.0),
            ("2024-01-02".to_string(), 6.0),
            ("2024-01-03".to_string(), 7.0),
        ];
        let (to_import, skipped) = plan_import(&rows, &existing(&["2024-01-02"]));
        assert_eq!(to_import.len(), 2);
        assert_eq!(skipped, 1);
        assert!(to_import.iter().all(|(d, _)| d != "2024-01-02"));
    }

    #[test]
    fn test_plan_import_deduplicates_within_file() {
        let rows = vec![
            ("2024-01-01".to_string(), 5.0),
            ("2024-01-01".to_string(), 9.0),
        ];
        let (to_import, skipped) = plan_import(&rows, &[]);
        assert_eq!(to_import, vec![("2024-01-01".to_string(), 5.0)]);
        assert_eq!(skipped, 1);
    }
}
