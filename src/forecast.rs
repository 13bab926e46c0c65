//! Forecast commands: fixed-horizon requests and the natural-language
//! endpoint, both rendered through [`crate::present`].

use anyhow::Result;
use chrono::Utc;

use crate::client::{DataAccess, HttpClient};
use crate::config::Config;
use crate::export;
use crate::models::ChatReply;
use crate::present::{self, ForecastView};
use crate::session::Session;

/// Request a forecast over a fixed horizon and print it.
///
/// `csv` exports the series instead of printing the full presentation:
/// `-` writes to stdout, a directory gets the deterministic
/// `forecast_{periods}_{granularity}_{date}.csv` filename, anything else
/// is used as the file path. With the flag given but no value, the file
/// lands in the configured export directory under that filename.
pub async fn run_forecast(
    config: &Config,
    product_id: i64,
    days: i64,
    csv: Option<Option<String>>,
) -> Result<()> {
    let session = Session::load(&config.session.path)?;
    let client = HttpClient::new(&config.api)?;
    let payload = client.forecast(&session, product_id, days).await?;
    let view = present::present(&payload);

    if let Some(target) = csv {
        return export_view(config, &view, target.as_deref());
    }

    print_view(&view);
    Ok(())
}

/// Ask the conversational endpoint; prints either the answer text or a
/// full forecast presentation.
pub async fn run_ask(config: &Config, product_id: i64, query: &str) -> Result<()> {
    let session = Session::load(&config.session.path)?;
    let client = HttpClient::new(&config.api)?;

    match client.ask(&session, product_id, query).await? {
        ChatReply::Conversation(text) => println!("{}", text),
        ChatReply::Forecast(payload) => print_view(&present::present(&payload)),
    }
    Ok(())
}

fn export_view(config: &Config, view: &ForecastView, target: Option<&str>) -> Result<()> {
    let name = export::csv_filename(
        view.periods,
        view.granularity,
        Utc::now().date_naive(),
    );
    let output = export::resolve_target(target, &config.export.dir, &name);
    export::write_csv(&view.series, output.as_deref(), &name)?;
    Ok(())
}

fn print_view(view: &ForecastView) {
    let title = format!(
        "{}-{} Demand Forecast",
        view.periods,
        view.period_label.text(view.periods)
    );
    println!("{} (ARIMA)", title);
    println!("{}", "=".repeat(title.len() + 8));
    println!();

    if view.scalar {
        // One period: a single number reads better than a one-point chart.
        let point = &view.series[0];
        println!("  {:.1} units on {}", point.quantity, point.label);
    } else {
        println!("  {:<12} {:>10}", "DATE", "QUANTITY");
        println!("  {}", "-".repeat(23));
        for point in &view.series {
            println!("  {:<12} {:>10.1}", point.label, point.quantity);
        }
    }

    println!();
    println!(
        "  Total: {:.1} units · Avg per {}: {:.1}",
        view.stats.total,
        view.period_label.singular,
        view.stats.average
    );

    if !view.report.is_empty() {
        println!();
        println!("  {}", view.report);
    }
}
