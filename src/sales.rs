//! Sales record commands: tabular listing plus create/update/delete.
//!
//! Listing fetches products and sales together, shapes the records through
//! [`crate::query`], and prints the table with a summary footer.

use anyhow::{bail, Result};
use chrono::NaiveDate;

use crate::client::{DataAccess, HttpClient, SalesInput, SalesUpdate};
use crate::config::Config;
use crate::query::{self, SalesFilter, SortKey};
use crate::session::Session;

/// List sales entries, optionally filtered and re-sorted.
///
/// `product` is `all` or a product id. `sort` is one of `date-asc`,
/// `date-desc`, `quantity-asc`, `quantity-desc`.
pub async fn run_list(
    config: &Config,
    product: &str,
    search: Option<String>,
    sort: &str,
) -> Result<()> {
    let product_id = parse_product_filter(product)?;
    let sort = SortKey::parse(sort)?;

    let session = Session::load(&config.session.path)?;
    let client = HttpClient::new(&config.api)?;

    // Independent fetches; both must land before cross-referencing.
    let (products, records) = tokio::try_join!(
        client.list_products(&session),
        client.sales_by_org(&session)
    )?;

    let filter = SalesFilter {
        product_id,
        search,
        sort,
    };
    let filtered = query::filter_and_sort(&records, &products, &filter);

    if filtered.is_empty() {
        if records.is_empty() {
            println!("No sales data yet. Add an entry with `fcst sales add`.");
        } else {
            println!("No sales data found matching your filters.");
        }
        return Ok(());
    }

    println!(
        "{:>8}  {:<28} {:<12} {:>10}",
        "ORDER", "PRODUCT", "DATE", "QUANTITY"
    );
    println!("{}", "-".repeat(62));
    for record in &filtered {
        println!(
            "{:>8}  {:<28} {:<12} {:>10.2}",
            record
                .order_id
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string()),
            query::product_name(&products, record.product_id),
            record.sales_date,
            record.sales_quantity
        );
    }

    let stats = query::summarize(&filtered);
    println!();
    println!(
        "{} entries · total {:.2} · average {:.2} per entry",
        stats.count, stats.total, stats.average
    );
    Ok(())
}

pub async fn run_add(config: &Config, product_id: i64, date: &str, quantity: f64) -> Result<()> {
    validate_date(date)?;
    let session = Session::load(&config.session.path)?;
    let client = HttpClient::new(&config.api)?;
    let record = client
        .create_sales_entry(
            &session,
            &SalesInput {
                product_id,
                sales_date: date.to_string(),
                sales_quantity: quantity,
            },
        )
        .await?;
    match record.order_id {
        Some(order_id) => println!("Created sales entry {} for {}.", order_id, date),
        None => println!("Created sales entry for {}.", date),
    }
    Ok(())
}

pub async fn run_update(config: &Config, order_id: i64, date: &str, quantity: f64) -> Result<()> {
    validate_date(date)?;
    let session = Session::load(&config.session.path)?;
    let client = HttpClient::new(&config.api)?;
    client
        .update_sales_entry(
            &session,
            order_id,
            &SalesUpdate {
                sales_date: date.to_string(),
                sales_quantity: quantity,
            },
        )
        .await?;
    println!("Updated sales entry {}.", order_id);
    Ok(())
}

pub async fn run_delete(config: &Config, order_id: i64) -> Result<()> {
    let session = Session::load(&config.session.path)?;
    let client = HttpClient::new(&config.api)?;
    client.delete_sales_entry(&session, order_id).await?;
    println!("Deleted sales entry {}.", order_id);
    Ok(())
}

fn parse_product_filter(value: &str) -> Result<Option<i64>> {
    if value == "all" {
        return Ok(None);
    }
    match value.parse::<i64>() {
        Ok(id) => Ok(Some(id)),
        Err(_) => bail!("Invalid product filter: {}. Use `all` or a product id.", value),
    }
}

fn validate_date(date: &str) -> Result<()> {
    if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
        bail!("Invalid date: {}. Use YYYY-MM-DD.", date);
    }
    Ok(())
}
