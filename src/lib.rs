//! # Forecast Desk
//!
//! A command-line dashboard client for demand forecasting.
//!
//! Forecast Desk talks to a forecasting backend on behalf of an
//! organization: manage products, record and import sales entries, shape
//! sales history into chart-ready series, and request ARIMA demand
//! forecasts with a narrative summary. All forecasting happens on the
//! backend; this crate owns the presentation-side shaping only.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌─────────────────┐
//! │   Backend    │──▶│  DataAccess   │──▶│ aggregate/query │
//! │  (HTTP API)  │   │  (HttpClient) │   │ present/export  │
//! └──────────────┘   └───────────────┘   └────────┬────────┘
//!                                                 │
//!                                                 ▼
//!                                           ┌──────────┐
//!                                           │   CLI    │
//!                                           │  (fcst)  │
//!                                           └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! fcst login acme secret            # sign in, persist the session
//! fcst products list                # registered products
//! fcst sales list --sort date-desc  # tabular sales view
//! fcst history --all-products       # aggregated daily series
//! fcst forecast 1 --days 30         # ARIMA forecast + narrative
//! fcst ask 1 "demand next quarter?" # natural-language forecasting
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`session`] | Persisted authentication state |
//! | [`client`] | Backend HTTP client and `DataAccess` trait |
//! | [`aggregate`] | Sales records → chart-ready series |
//! | [`query`] | Filtering/sorting for the sales table |
//! | [`present`] | Forecast payload → display view |
//! | [`export`] | CSV serialization |

pub mod aggregate;
pub mod auth;
pub mod client;
pub mod config;
pub mod export;
pub mod forecast;
pub mod history;
pub mod import;
pub mod models;
pub mod present;
pub mod products;
pub mod query;
pub mod sales;
pub mod session;
