//! # Forecast Desk CLI (`fcst`)
//!
//! The `fcst` binary is the primary interface for Forecast Desk. It provides
//! commands for authentication, product management, sales entry management,
//! chart-ready sales history, CSV import/export, and demand forecasting
//! against the backend API.
//!
//! ## Usage
//!
//! ```bash
//! fcst --config ./config/fcst.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fcst register` | Register an organization and sign in |
//! | `fcst login` | Sign in and persist the session |
//! | `fcst logout` | Remove the persisted session |
//! | `fcst products list` | List registered products |
//! | `fcst products add <name>` | Create a product |
//! | `fcst sales list` | Filtered, sorted sales table with summary stats |
//! | `fcst sales add/update/delete` | Manage individual sales entries |
//! | `fcst history` | Chart-ready sales series (per product or overall) |
//! | `fcst import <file>` | Import sales entries from a CSV file |
//! | `fcst forecast <product>` | Request an ARIMA demand forecast |
//! | `fcst ask <product> "<question>"` | Natural-language forecasting |
//!
//! ## Examples
//!
//! ```bash
//! # Sign in
//! fcst login acme secret
//!
//! # High-to-low quantities for one product
//! fcst sales list --product 1 --sort quantity-desc
//!
//! # Aggregate history across products, exported as CSV
//! fcst history --all-products --csv ./exports/history.csv
//!
//! # 30-day forecast, CSV to stdout
//! fcst forecast 1 --days 30 --csv -
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use forecast_desk::{auth, config, forecast, history, import, products, sales};

/// Forecast Desk CLI — a dashboard client for demand forecasting.
///
/// All commands accept a `--config` flag pointing to a TOML configuration
/// file; every setting has a default, so the flag is optional.
#[derive(Parser)]
#[command(
    name = "fcst",
    about = "Forecast Desk — a command-line dashboard client for demand forecasting",
    version,
    long_about = "Forecast Desk manages an organization's products and sales records against a \
    forecasting backend, shapes sales history into chart-ready series, and requests ARIMA demand \
    forecasts with an LLM-generated narrative summary."
)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// Defaults to `./config/fcst.toml`. API endpoint, session file, and
    /// export settings are read from this file; a missing file means
    /// defaults (local backend on port 8000).
    #[arg(long, global = true, default_value = "./config/fcst.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand)]
enum Commands {
    /// Register a new organization and sign in.
    ///
    /// Creates the organization on the backend, then signs in and saves
    /// the session so subsequent commands are authenticated.
    Register {
        /// Organization name (also the sign-in username).
        org_name: String,

        /// Organization password.
        password: String,

        /// Industry the organization operates in.
        #[arg(long)]
        industry: Option<String>,

        /// Postal address.
        #[arg(long)]
        address: Option<String>,
    },

    /// Sign in and persist the session.
    ///
    /// Exchanges credentials for a bearer token and saves it (with the
    /// organization identity) at the configured session path.
    Login {
        /// Organization name.
        org_name: String,

        /// Organization password.
        password: String,
    },

    /// Sign out.
    ///
    /// Removes the persisted session file. Safe to run when not signed in.
    Logout,

    /// Manage products.
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },

    /// Manage sales entries.
    ///
    /// Subcommands for listing (with filtering and sorting), creating,
    /// updating, and deleting individual sales records.
    Sales {
        #[command(subcommand)]
        action: SalesAction,
    },

    /// Print sales history as a chart-ready series.
    ///
    /// Per-product series keep the backend's chronological order; the
    /// cross-product series sums quantities per calendar date and sorts
    /// ascending.
    History {
        /// Product id. Defaults to the first product when neither this
        /// nor `--all-products` is given.
        #[arg(long)]
        product: Option<i64>,

        /// Aggregate daily totals across all products.
        #[arg(long)]
        all_products: bool,

        /// Write the series as CSV instead of printing. Use `-` for
        /// stdout; omit the value to write `history.csv` into the
        /// configured export directory.
        #[arg(long, num_args = 0..=1)]
        csv: Option<Option<String>>,
    },

    /// Import sales entries from a CSV file.
    ///
    /// Expects the `Date,Quantity` schema produced by the export commands.
    /// Dates the product already has entries for are skipped and counted.
    Import {
        /// Path to the CSV file.
        file: PathBuf,

        /// Product to attach the imported entries to.
        #[arg(long)]
        product: i64,

        /// Show import/skip counts without writing to the backend.
        #[arg(long)]
        dry_run: bool,
    },

    /// Request a demand forecast for a product.
    ///
    /// Prints the forecast series, summary stats, and the narrative
    /// report. Single-period forecasts are shown as one number rather
    /// than a table.
    Forecast {
        /// Product id.
        product: i64,

        /// Forecast horizon in days.
        #[arg(long, default_value_t = 30)]
        days: i64,

        /// Export the series as CSV instead of printing the presentation.
        /// Use `-` for stdout; a directory gets the
        /// `forecast_{periods}_{granularity}_{date}.csv` filename, and
        /// omitting the value writes it into the configured export
        /// directory.
        #[arg(long, num_args = 0..=1)]
        csv: Option<Option<String>>,
    },

    /// Ask the forecasting assistant a free-form question.
    ///
    /// Forecast-style questions come back as a full forecast presentation;
    /// anything else gets a conversational answer.
    Ask {
        /// Product id the question refers to.
        product: i64,

        /// The question (e.g. "how much demand next quarter?").
        query: String,
    },
}

/// Product management subcommands.
#[derive(Subcommand)]
enum ProductAction {
    /// List the organization's products.
    List,

    /// Create a product.
    Add {
        /// Product name.
        name: String,

        /// Stock keeping unit.
        #[arg(long)]
        sku: Option<String>,

        /// Free-form description.
        #[arg(long)]
        description: Option<String>,
    },
}

/// Sales entry subcommands.
#[derive(Subcommand)]
enum SalesAction {
    /// List sales entries with filtering, search, and sorting.
    List {
        /// Product filter: `all` or a product id.
        #[arg(long, default_value = "all")]
        product: String,

        /// Case-insensitive search on product name/SKU, verbatim on date.
        #[arg(long)]
        search: Option<String>,

        /// Sort key: `date-asc`, `date-desc`, `quantity-asc`, `quantity-desc`.
        #[arg(long, default_value = "date-desc")]
        sort: String,
    },

    /// Create a sales entry.
    Add {
        /// Product id.
        product: i64,

        /// Sales date (YYYY-MM-DD).
        date: String,

        /// Quantity sold.
        quantity: f64,
    },

    /// Update an existing sales entry's date and quantity.
    Update {
        /// Order id of the entry.
        order: i64,

        /// New sales date (YYYY-MM-DD).
        date: String,

        /// New quantity.
        quantity: f64,
    },

    /// Delete a sales entry.
    Delete {
        /// Order id of the entry.
        order: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Register {
            org_name,
            password,
            industry,
            address,
        } => {
            auth::run_register(&cfg, &org_name, &password, industry, address).await?;
        }
        Commands::Login { org_name, password } => {
            auth::run_login(&cfg, &org_name, &password).await?;
        }
        Commands::Logout => {
            auth::run_logout(&cfg)?;
        }
        Commands::Products { action } => match action {
            ProductAction::List => {
                products::run_list(&cfg).await?;
            }
            ProductAction::Add {
                name,
                sku,
                description,
            } => {
                products::run_add(&cfg, &name, sku, description).await?;
            }
        },
        Commands::Sales { action } => match action {
            SalesAction::List {
                product,
                search,
                sort,
            } => {
                sales::run_list(&cfg, &product, search, &sort).await?;
            }
            SalesAction::Add {
                product,
                date,
                quantity,
            } => {
                sales::run_add(&cfg, product, &date, quantity).await?;
            }
            SalesAction::Update {
                order,
                date,
                quantity,
            } => {
                sales::run_update(&cfg, order, &date, quantity).await?;
            }
            SalesAction::Delete { order } => {
                sales::run_delete(&cfg, order).await?;
            }
        },
        Commands::History {
            product,
            all_products,
            csv,
        } => {
            history::run_history(&cfg, product, all_products, csv).await?;
        }
        Commands::Import {
            file,
            product,
            dry_run,
        } => {
            import::run_import(&cfg, &file, product, dry_run).await?;
        }
        Commands::Forecast { product, days, csv } => {
            forecast::run_forecast(&cfg, product, days, csv).await?;
        }
        Commands::Ask { product, query } => {
            forecast::run_ask(&cfg, product, &query).await?;
        }
    }

    Ok(())
}
