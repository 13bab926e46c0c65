//! HTTP data-access client for the forecasting backend.
//!
//! Defines the [`DataAccess`] trait — the seam between the shaping core and
//! the remote service — and its production implementation [`HttpClient`].
//! Commands depend on the trait so tests can substitute an in-memory double.
//!
//! # Retry Strategy
//!
//! Transient failures use exponential backoff:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)

use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::ApiConfig;
use crate::models::{
    de_granularity, de_opt_ordered_pairs, ChatReply, ForecastPayload, Granularity, Product,
    SalesRecord,
};
use crate::session::Session;

/// New-organization registration input.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterInput {
    pub org_name: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// New-product input.
#[derive(Debug, Clone, Serialize)]
pub struct ProductInput {
    pub org_id: i64,
    pub product_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// New sales entry input.
#[derive(Debug, Clone, Serialize)]
pub struct SalesInput {
    pub product_id: i64,
    pub sales_date: String,
    pub sales_quantity: f64,
}

/// Fields of an existing sales entry that can change.
#[derive(Debug, Clone, Serialize)]
pub struct SalesUpdate {
    pub sales_date: String,
    pub sales_quantity: f64,
}

/// Backend operations the rest of the tool depends on.
///
/// Everything that needs authentication takes the [`Session`] explicitly.
#[async_trait]
pub trait DataAccess: Send + Sync {
    async fn register(&self, input: &RegisterInput) -> Result<()>;
    async fn login(&self, org_name: &str, password: &str) -> Result<Session>;

    async fn list_products(&self, session: &Session) -> Result<Vec<Product>>;
    async fn create_product(&self, session: &Session, input: &ProductInput) -> Result<Product>;

    async fn sales_by_org(&self, session: &Session) -> Result<Vec<SalesRecord>>;
    /// Per-product sales, chronologically ordered by the backend.
    async fn sales_by_product(&self, session: &Session, product_id: i64)
        -> Result<Vec<SalesRecord>>;
    async fn create_sales_entry(&self, session: &Session, input: &SalesInput)
        -> Result<SalesRecord>;
    async fn update_sales_entry(
        &self,
        session: &Session,
        order_id: i64,
        update: &SalesUpdate,
    ) -> Result<SalesRecord>;
    async fn delete_sales_entry(&self, session: &Session, order_id: i64) -> Result<()>;

    async fn forecast(
        &self,
        session: &Session,
        product_id: i64,
        days: i64,
    ) -> Result<ForecastPayload>;
    async fn ask(&self, session: &Session, product_id: i64, query: &str) -> Result<ChatReply>;
}

/// Production [`DataAccess`] implementation over HTTP.
pub struct HttpClient {
    base_url: String,
    client: reqwest::Client,
    max_retries: u32,
}

impl HttpClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            base_url: config.base_url.clone(),
            client,
            max_retries: config.max_retries,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request with retry/backoff and return the successful response.
    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, 8s, ...
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let req = request
                .try_clone()
                .ok_or_else(|| anyhow!("request cannot be retried"))?;

            match req.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response);
                    }

                    // Rate limited or server error — retry
                    if status.as_u16() == 429 || status.is_server_error() {
                        let body = response.text().await.unwrap_or_default();
                        last_err = Some(anyhow!("API error {}: {}", status, detail(&body)));
                        continue;
                    }

                    // Client error (not 429) — don't retry
                    let body = response.text().await.unwrap_or_default();
                    bail!("API error {}: {}", status, detail(&body));
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err.unwrap_or_else(|| anyhow!("Request failed after retries")))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
    ) -> Result<T> {
        let request = self
            .client
            .get(self.url(path))
            .bearer_auth(&session.token);
        let response = self.execute(request).await?;
        Ok(response.json().await?)
    }
}

/// Pull the FastAPI-style `detail` message out of an error body, falling
/// back to the raw body.
fn detail(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    org_id: i64,
    org_name: String,
}

/// Wire shape of the natural-language forecast endpoint.
#[derive(Deserialize)]
struct ChatbotResponse {
    is_forecast_request: bool,
    #[serde(default)]
    conversational_response: Option<String>,
    #[serde(default, deserialize_with = "de_opt_ordered_pairs")]
    forecast: Option<Vec<(String, f64)>>,
    #[serde(default)]
    periods: Option<i64>,
    #[serde(default, deserialize_with = "de_granularity")]
    granularity: Option<Granularity>,
    #[serde(default)]
    report: Option<String>,
}

impl From<ChatbotResponse> for ChatReply {
    fn from(wire: ChatbotResponse) -> Self {
        match wire.forecast {
            Some(forecast) if wire.is_forecast_request => {
                ChatReply::Forecast(ForecastPayload {
                    forecast,
                    granularity: wire.granularity,
                    periods: wire.periods,
                    report: wire.report.unwrap_or_default(),
                })
            }
            _ => ChatReply::Conversation(
                wire.conversational_response
                    .unwrap_or_else(|| "I'm here to help!".to_string()),
            ),
        }
    }
}

#[async_trait]
impl DataAccess for HttpClient {
    async fn register(&self, input: &RegisterInput) -> Result<()> {
        let request = self.client.post(self.url("/auth/register")).json(input);
        self.execute(request).await?;
        Ok(())
    }

    async fn login(&self, org_name: &str, password: &str) -> Result<Session> {
        // OAuth2 password flow: form-urlencoded username/password.
        let request = self
            .client
            .post(self.url("/auth/token"))
            .form(&[("username", org_name), ("password", password)]);
        let response = self.execute(request).await?;
        let token: TokenResponse = response.json().await?;
        Ok(Session {
            token: token.access_token,
            org_id: token.org_id,
            org_name: token.org_name,
        })
    }

    async fn list_products(&self, session: &Session) -> Result<Vec<Product>> {
        self.get_json(session, &format!("/product/by_org/{}", session.org_id))
            .await
    }

    async fn create_product(&self, session: &Session, input: &ProductInput) -> Result<Product> {
        let request = self
            .client
            .post(self.url("/product"))
            .bearer_auth(&session.token)
            .json(input);
        let response = self.execute(request).await?;
        Ok(response.json().await?)
    }

    async fn sales_by_org(&self, session: &Session) -> Result<Vec<SalesRecord>> {
        self.get_json(session, &format!("/sales/by_org/{}", session.org_id))
            .await
    }

    async fn sales_by_product(
        &self,
        session: &Session,
        product_id: i64,
    ) -> Result<Vec<SalesRecord>> {
        self.get_json(session, &format!("/sales/by_product/{}", product_id))
            .await
    }

    async fn create_sales_entry(
        &self,
        session: &Session,
        input: &SalesInput,
    ) -> Result<SalesRecord> {
        let request = self
            .client
            .post(self.url("/sales"))
            .bearer_auth(&session.token)
            .json(input);
        let response = self.execute(request).await?;
        Ok(response.json().await?)
    }

    async fn update_sales_entry(
        &self,
        session: &Session,
        order_id: i64,
        update: &SalesUpdate,
    ) -> Result<SalesRecord> {
        let request = self
            .client
            .put(self.url(&format!("/sales/{}", order_id)))
            .bearer_auth(&session.token)
            .json(update);
        let response = self.execute(request).await?;
        Ok(response.json().await?)
    }

    async fn delete_sales_entry(&self, session: &Session, order_id: i64) -> Result<()> {
        let request = self
            .client
            .delete(self.url(&format!("/sales/{}", order_id)))
            .bearer_auth(&session.token);
        self.execute(request).await?;
        Ok(())
    }

    async fn forecast(
        &self,
        session: &Session,
        product_id: i64,
        days: i64,
    ) -> Result<ForecastPayload> {
        let request = self
            .client
            .get(self.url(&format!("/forecast/{}", product_id)))
            .query(&[("days", days)])
            .bearer_auth(&session.token);
        let response = self.execute(request).await?;
        Ok(response.json().await?)
    }

    async fn ask(&self, session: &Session, product_id: i64, query: &str) -> Result<ChatReply> {
        let request = self
            .client
            .post(self.url("/forecast/forecast"))
            .bearer_auth(&session.token)
            .json(&serde_json::json!({
                "product_id": product_id,
                "query": query,
            }));
        let response = self.execute(request).await?;
        let wire: ChatbotResponse = response.json().await?;
        Ok(wire.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_extraction() {
        assert_eq!(detail(r#"{"detail": "Invalid credentials"}"#), "Invalid credentials");
        assert_eq!(detail("plain text error"), "plain text error");
        assert_eq!(detail(r#"{"error": "other shape"}"#), r#"{"error": "other shape"}"#);
    }

    #[test]
    fn test_chat_reply_forecast_branch() {
        let json = r#"{
            "product_id": 1,
            "is_forecast_request": true,
            "forecast": {"2024-01-01": 5.0, "2024-01-02": 6.0},
            "periods": 2,
            "granularity": "daily",
            "report": "upward trend"
        }"#;
        let wire: ChatbotResponse = serde_json::from_str(json).unwrap();
        match ChatReply::from(wire) {
            ChatReply::Forecast(payload) => {
                assert_eq!(payload.forecast.len(), 2);
                assert_eq!(payload.periods, Some(2));
                assert_eq!(payload.report, "upward trend");
            }
            ChatReply::Conversation(_) => panic!("expected forecast"),
        }
    }

    #[test]
    fn test_chat_reply_conversation_branch() {
        let json = r#"{
            "product_id": 1,
            "is_forecast_request": false,
            "conversational_response": "Your best seller is Espresso Beans."
        }"#;
        let wire: ChatbotResponse = serde_json::from_str(json).unwrap();
        match ChatReply::from(wire) {
            ChatReply::Conversation(text) => {
                assert_eq!(text, "Your best seller is Espresso Beans.");
            }
            ChatReply::Forecast(_) => panic!("expected conversation"),
        }
    }

    #[test]
    fn test_chat_reply_forecast_flag_without_payload_falls_back() {
        let json = r#"{"product_id": 1, "is_forecast_request": true}"#;
        let wire: ChatbotResponse = serde_json::from_str(json).unwrap();
        match ChatReply::from(wire) {
            ChatReply::Conversation(text) => assert_eq!(text, "I'm here to help!"),
            ChatReply::Forecast(_) => panic!("no forecast payload to present"),
        }
    }
}
