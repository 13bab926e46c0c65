//! CSV export of chart-ready series.
//!
//! Produces the `Date,Quantity` schema consumed by spreadsheet tools and
//! the round-trip import command. Serialization is pure; the file/stdout
//! plumbing lives in [`write_csv`].

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;

use crate::models::{AggregatedSeries, Granularity};

/// Serialize a series as CSV.
///
/// Header row `Date,Quantity`, one row per point, quantity with exactly one
/// decimal digit, no trailing newline, no quoting (labels never contain
/// commas). The empty series produces only the header. Deterministic for
/// any well-formed input.
pub fn to_csv(series: &AggregatedSeries) -> String {
    let mut out = String::from("Date,Quantity");
    for point in series {
        out.push('\n');
        out.push_str(&point.label);
        out.push(',');
        out.push_str(&format!("{:.1}", point.quantity));
    }
    out
}

/// Download-style filename for an exported forecast:
/// `forecast_{periods}_{granularity}_{isoDate}.csv`.
pub fn csv_filename(periods: i64, granularity: Granularity, date: NaiveDate) -> String {
    format!(
        "forecast_{}_{}_{}.csv",
        periods,
        granularity,
        date.format("%Y-%m-%d")
    )
}

/// Resolve a `--csv` argument into a [`write_csv`] output.
///
/// `-` means stdout, an explicit value is used as given, and an omitted
/// value falls back to the configured export directory joined with
/// `default_name`.
pub fn resolve_target(
    target: Option<&str>,
    export_dir: &Path,
    default_name: &str,
) -> Option<PathBuf> {
    match target {
        Some("-") => None,
        Some(path) => Some(PathBuf::from(path)),
        None => Some(export_dir.join(default_name)),
    }
}

/// Write a series as CSV.
///
/// If `output` is `Some`, writes to that file path (creating parent
/// directories). Otherwise writes to stdout for piping. When the path is
/// an existing directory, `default_name` is appended.
pub fn write_csv(
    series: &AggregatedSeries,
    output: Option<&Path>,
    default_name: &str,
) -> Result<Option<PathBuf>> {
    let csv = to_csv(series);

    match output {
        Some(path) => {
            let path: PathBuf = if path.is_dir() {
                path.join(default_name)
            } else {
                path.to_path_buf()
            };
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, &csv)?;
            eprintln!("Exported {} rows to {}", series.len(), path.display());
            Ok(Some(path))
        }
        None => {
            println!("{}", csv);
            Ok(None)
        }
    }
}
