//! Sales history as a chart-ready series.
//!
//! The CLI counterpart of the dashboard's sales-history chart: one series
//! per product (backend order preserved) or the daily total across all
//! products. Optionally exports the series as CSV.

use anyhow::{bail, Result};

use crate::aggregate;
use crate::client::{DataAccess, HttpClient};
use crate::config::Config;
use crate::export;
use crate::models::AggregatedSeries;
use crate::session::Session;

pub async fn run_history(
    config: &Config,
    product: Option<i64>,
    all_products: bool,
    csv: Option<Option<String>>,
) -> Result<()> {
    let session = Session::load(&config.session.path)?;
    let client = HttpClient::new(&config.api)?;

    let (series, heading) = if all_products {
        let records = client.sales_by_org(&session).await?;
        let series = aggregate::aggregate_across_products(&records);
        (series, "Aggregate daily units across products".to_string())
    } else {
        let product_id = match product {
            Some(id) => id,
            // Same default as the dashboard: the first product in the list.
            None => match client.list_products(&session).await?.first() {
                Some(p) => p.product_id,
                None => bail!("No products yet. Add one with `fcst products add <name>`."),
            },
        };
        let records = client.sales_by_product(&session, product_id).await?;
        let series = aggregate::aggregate_by_product(&records, product_id);
        (series, format!("Daily units for product {}", product_id))
    };

    if let Some(target) = csv {
        let output = export::resolve_target(target.as_deref(), &config.export.dir, "history.csv");
        export::write_csv(&series, output.as_deref(), "history.csv")?;
        return Ok(());
    }

    println!("{}", heading);
    println!();
    print_series(&series);
    Ok(())
}

fn print_series(series: &AggregatedSeries) {
    if series.is_empty() {
        println!("No sales data yet.");
        return;
    }
    println!("{:<12} {:>10}", "DATE", "QUANTITY");
    println!("{}", "-".repeat(23));
    for point in series {
        println!("{:<12} {:>10.1}", point.label, point.quantity);
    }
    println!();
    println!("{} points.", series.len());
}
