//! End-to-end pipeline tests over an in-memory backend double:
//! records → aggregation → presentation → CSV export.

use anyhow::{bail, Result};
use async_trait::async_trait;

use forecast_desk::aggregate;
use forecast_desk::client::{
    DataAccess, ProductInput, RegisterInput, SalesInput, SalesUpdate,
};
use forecast_desk::export;
use forecast_desk::models::{
    ChatReply, ForecastPayload, Granularity, Product, SalesRecord,
};
use forecast_desk::present;
use forecast_desk::query::{self, SalesFilter, SortKey};
use forecast_desk::session::Session;

/// Fixture backend holding canned products, sales, and forecasts.
struct FixtureBackend {
    products: Vec<Product>,
    sales: Vec<SalesRecord>,
}

impl FixtureBackend {
    fn new() -> Self {
        let products = vec![
            Product {
                product_id: 1,
                product_name: "Espresso Beans".to_string(),
                sku: Some("SKU-ESP".to_string()),
                description: None,
            },
            Product {
                product_id: 2,
                product_name: "Filter Paper".to_string(),
                sku: None,
                description: None,
            },
        ];
        let sales = vec![
            record(1, 1, "2024-01-01", 10.0),
            record(2, 2, "2024-01-01", 5.0),
            record(3, 1, "2024-01-02", 7.0),
            record(4, 2, "2024-01-03", 2.5),
        ];
        Self { products, sales }
    }
}

fn record(order: i64, product: i64, date: &str, qty: f64) -> SalesRecord {
    SalesRecord {
        order_id: Some(order),
        product_id: product,
        sales_date: date.to_string(),
        sales_quantity: qty,
    }
}

fn session() -> Session {
    Session {
        token: "fixture-token".to_string(),
        org_id: 1,
        org_name: "Acme Coffee".to_string(),
    }
}

#[async_trait]
impl DataAccess for FixtureBackend {
    async fn register(&self, _input: &RegisterInput) -> Result<()> {
        Ok(())
    }

    async fn login(&self, org_name: &str, password: &str) -> Result<Session> {
        if password != "secret" {
            bail!("API error 401 Unauthorized: Invalid credentials");
        }
        Ok(Session {
            token: "fixture-token".to_string(),
            org_id: 1,
            org_name: org_name.to_string(),
        })
    }

    async fn list_products(&self, _session: &Session) -> Result<Vec<Product>> {
        Ok(self.products.clone())
    }

    async fn create_product(&self, _session: &Session, _input: &ProductInput) -> Result<Product> {
        bail!("not used in these tests")
    }

    async fn sales_by_org(&self, _session: &Session) -> Result<Vec<SalesRecord>> {
        Ok(self.sales.clone())
    }

    async fn sales_by_product(
        &self,
        _session: &Session,
        product_id: i64,
    ) -> Result<Vec<SalesRecord>> {
        Ok(self
            .sales
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn create_sales_entry(
        &self,
        _session: &Session,
        _input: &SalesInput,
    ) -> Result<SalesRecord> {
        bail!("not used in these tests")
    }

    async fn update_sales_entry(
        &self,
        _session: &Session,
        _order_id: i64,
        _update: &SalesUpdate,
    ) -> Result<SalesRecord> {
        bail!("not used in these tests")
    }

    async fn delete_sales_entry(&self, _session: &Session, _order_id: i64) -> Result<()> {
        bail!("not used in these tests")
    }

    async fn forecast(
        &self,
        _session: &Session,
        _product_id: i64,
        days: i64,
    ) -> Result<ForecastPayload> {
        let forecast = (1..=days)
            .map(|d| (format!("2024-02-{:02}", d), 10.0 + d as f64))
            .collect();
        Ok(ForecastPayload {
            forecast,
            granularity: Some(Granularity::Daily),
            periods: Some(days),
            report: "Demand trending upward.".to_string(),
        })
    }

    async fn ask(&self, _session: &Session, product_id: i64, query: &str) -> Result<ChatReply> {
        if query.contains("forecast") {
            let payload = self.forecast(&session(), product_id, 1).await?;
            Ok(ChatReply::Forecast(payload))
        } else {
            Ok(ChatReply::Conversation("Happy to help.".to_string()))
        }
    }
}

#[tokio::test]
async fn test_login_produces_explicit_session() {
    let backend = FixtureBackend::new();
    let session = backend.login("acme", "secret").await.unwrap();
    assert_eq!(session.org_id, 1);
    assert_eq!(session.org_name, "acme");

    let err = backend.login("acme", "wrong").await.unwrap_err();
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_overall_history_pipeline() {
    let backend = FixtureBackend::new();
    let records = backend.sales_by_org(&session()).await.unwrap();

    let series = aggregate::aggregate_across_products(&records);
    let labels: Vec<&str> = series.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
    assert_eq!(series[0].quantity, 15.0);
    assert_eq!(series[1].quantity, 7.0);

    let csv = export::to_csv(&series);
    assert_eq!(
        csv,
        "Date,Quantity\n2024-01-01,15.0\n2024-01-02,7.0\n2024-01-03,2.5"
    );
}

#[tokio::test]
async fn test_per_product_history_keeps_backend_order() {
    let backend = FixtureBackend::new();
    let records = backend.sales_by_product(&session(), 1).await.unwrap();
    let series = aggregate::aggregate_by_product(&records, 1);
    assert_eq!(series.len(), 2);
    assert_eq!(series[0].label, "2024-01-01");
    assert_eq!(series[1].label, "2024-01-02");
}

#[tokio::test]
async fn test_sales_table_pipeline() {
    let backend = FixtureBackend::new();
    let sess = session();
    let (products, records) = tokio::try_join!(
        backend.list_products(&sess),
        backend.sales_by_org(&sess)
    )
    .unwrap();

    let filtered = query::filter_and_sort(
        &records,
        &products,
        &SalesFilter {
            product_id: None,
            search: Some("espresso".to_string()),
            sort: SortKey::QuantityDesc,
        },
    );
    let orders: Vec<i64> = filtered.iter().filter_map(|r| r.order_id).collect();
    assert_eq!(orders, vec![1, 3]);

    let stats = query::summarize(&filtered);
    assert_eq!(stats.count, 2);
    assert!((stats.total - 17.0).abs() < 1e-9);
    assert!((stats.average - 8.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_forecast_presentation_pipeline() {
    let backend = FixtureBackend::new();
    let payload = backend.forecast(&session(), 1, 3).await.unwrap();
    let view = present::present(&payload);

    assert!(!view.scalar);
    assert_eq!(view.periods, 3);
    assert_eq!(view.period_label.text(view.periods), "Days");
    assert!((view.stats.total - 36.0).abs() < 1e-9);
    assert!((view.stats.average - 12.0).abs() < 1e-9);

    let csv = export::to_csv(&view.series);
    assert_eq!(
        csv,
        "Date,Quantity\n2024-02-01,11.0\n2024-02-02,12.0\n2024-02-03,13.0"
    );

    let name = export::csv_filename(
        view.periods,
        view.granularity,
        chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
    );
    assert_eq!(name, "forecast_3_daily_2024-01-31.csv");
}

#[tokio::test]
async fn test_ask_branches() {
    let backend = FixtureBackend::new();

    match backend.ask(&session(), 1, "forecast next day").await.unwrap() {
        ChatReply::Forecast(payload) => {
            let view = present::present(&payload);
            assert!(view.scalar);
            assert_eq!(view.period_label.text(view.periods), "Day");
        }
        ChatReply::Conversation(_) => panic!("expected a forecast"),
    }

    match backend.ask(&session(), 1, "what sells best?").await.unwrap() {
        ChatReply::Conversation(text) => assert_eq!(text, "Happy to help."),
        ChatReply::Forecast(_) => panic!("expected a conversation"),
    }
}
