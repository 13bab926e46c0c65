//! Core data models used throughout Forecast Desk.
//!
//! These types represent the products, sales records, and forecast payloads
//! that flow between the backend API and the shaping/presentation pipeline.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// A product registered by the organization. Read-only on this side;
/// created and owned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A single sales entry as returned by the backend.
///
/// `order_id` is present only for persisted rows; records built locally
/// (e.g. during a CSV import) have not been assigned one yet. Records are
/// never mutated in place — updates go through the backend and the full
/// set is re-fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(default)]
    pub order_id: Option<i64>,
    pub product_id: i64,
    /// ISO 8601 calendar date, no time component.
    pub sales_date: String,
    pub sales_quantity: f64,
}

/// One point of a chart-ready series: a date or period label plus a quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub quantity: f64,
}

/// An ordered sequence of chart points.
///
/// Labels are unique within a series. Cross-record aggregation produces
/// points sorted ascending by date; per-product series keep the source
/// order of the records they were built from.
pub type AggregatedSeries = Vec<ChartPoint>;

/// Derived totals over a series or record set. Always recomputed from
/// source data, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStats {
    pub total: f64,
    pub average: f64,
    pub count: usize,
}

/// The time-bucket unit of a forecast series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Daily,
    Monthly,
    Yearly,
}

impl Granularity {
    /// Parse the wire string, treating unknown values as absent so the
    /// presenter can fall back to daily.
    pub fn from_wire(value: &str) -> Option<Granularity> {
        match value.to_ascii_lowercase().as_str() {
            "daily" => Some(Granularity::Daily),
            "monthly" => Some(Granularity::Monthly),
            "yearly" => Some(Granularity::Yearly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Daily => "daily",
            Granularity::Monthly => "monthly",
            Granularity::Yearly => "yearly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A forecast result from the backend.
///
/// The `forecast` field is kept as an ordered sequence of (label, quantity)
/// pairs rather than a map: period labels for monthly/yearly granularity are
/// not lexicographically sortable, so the producer's ordering must survive
/// deserialization intact.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastPayload {
    #[serde(deserialize_with = "de_ordered_pairs")]
    pub forecast: Vec<(String, f64)>,
    #[serde(default, deserialize_with = "de_granularity")]
    pub granularity: Option<Granularity>,
    /// Number of forecast periods. The `/forecast/{id}` endpoint calls
    /// this `days`; the chat endpoint calls it `periods`.
    #[serde(default, alias = "days")]
    pub periods: Option<i64>,
    /// Narrative summary generated alongside the numeric forecast.
    #[serde(default)]
    pub report: String,
}

/// Result of the natural-language forecast endpoint: either a full
/// forecast payload or a plain conversational answer.
#[derive(Debug, Clone)]
pub enum ChatReply {
    Forecast(ForecastPayload),
    Conversation(String),
}

/// Deserialize a JSON object into (key, value) pairs preserving document
/// order. A generic map would silently re-order the producer's series.
pub(crate) fn de_ordered_pairs<'de, D>(deserializer: D) -> Result<Vec<(String, f64)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PairsVisitor;

    impl<'de> Visitor<'de> for PairsVisitor {
        type Value = Vec<(String, f64)>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of period labels to quantities")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((label, quantity)) = map.next_entry::<String, f64>()? {
                pairs.push((label, quantity));
            }
            Ok(pairs)
        }
    }

    deserializer.deserialize_map(PairsVisitor)
}

/// Like [`de_ordered_pairs`] but tolerating a missing or null field.
pub(crate) fn de_opt_ordered_pairs<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<(String, f64)>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "de_ordered_pairs")] Vec<(String, f64)>);

    let opt = Option::<Wrapper>::deserialize(deserializer)?;
    Ok(opt.map(|w| w.0))
}

/// Deserialize a granularity string, mapping unknown values to `None`
/// instead of failing. Defaulting to daily happens at the presentation
/// boundary, not here.
pub(crate) fn de_granularity<'de, D>(deserializer: D) -> Result<Option<Granularity>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Granularity::from_wire))
}
