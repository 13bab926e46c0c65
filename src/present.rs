//! Forecast payload presentation.
//!
//! Normalizes a [`ForecastPayload`] into a display series, summary stats,
//! and the period wording for the configured granularity. This is the one
//! place the defaulting rules live: missing granularity means daily, a
//! missing or non-positive period count falls back to the series length,
//! and a zero divisor yields an average of 0 rather than NaN.

use crate::models::{
    AggregatedSeries, ChartPoint, ForecastPayload, Granularity, SummaryStats,
};

/// Human wording for one forecast period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodLabel {
    pub singular: &'static str,
    pub plural: &'static str,
    pub short: &'static str,
}

impl PeriodLabel {
    /// `"Day"` for one period, `"Days"` otherwise.
    pub fn text(&self, periods: i64) -> &'static str {
        if periods == 1 {
            self.singular
        } else {
            self.plural
        }
    }
}

const DAILY: PeriodLabel = PeriodLabel {
    singular: "Day",
    plural: "Days",
    short: "day",
};
const MONTHLY: PeriodLabel = PeriodLabel {
    singular: "Month",
    plural: "Months",
    short: "month",
};
const YEARLY: PeriodLabel = PeriodLabel {
    singular: "Year",
    plural: "Years",
    short: "year",
};

/// Resolve the wording for a granularity. Absent means daily.
pub fn period_label(granularity: Option<Granularity>) -> PeriodLabel {
    match granularity.unwrap_or(Granularity::Daily) {
        Granularity::Daily => DAILY,
        Granularity::Monthly => MONTHLY,
        Granularity::Yearly => YEARLY,
    }
}

/// A forecast shaped for display.
#[derive(Debug, Clone)]
pub struct ForecastView {
    pub series: AggregatedSeries,
    pub stats: SummaryStats,
    pub granularity: Granularity,
    pub period_label: PeriodLabel,
    /// Effective period count: the payload's `periods` when positive,
    /// else the series length.
    pub periods: i64,
    /// Set for single-point series, which render as one big number
    /// instead of a line chart.
    pub scalar: bool,
    pub report: String,
}

/// Shape a forecast payload for display.
///
/// The payload's mapping order is preserved as-is — the producing service
/// emits periods in forecast order, and monthly/yearly labels cannot be
/// re-sorted lexicographically.
pub fn present(payload: &ForecastPayload) -> ForecastView {
    let series: AggregatedSeries = payload
        .forecast
        .iter()
        .map(|(label, quantity)| ChartPoint {
            label: label.clone(),
            quantity: *quantity,
        })
        .collect();

    let granularity = payload.granularity.unwrap_or(Granularity::Daily);

    let divisor = match payload.periods {
        Some(p) if p > 0 => p,
        _ => series.len() as i64,
    };

    let total: f64 = series.iter().map(|p| p.quantity).sum();
    let average = if divisor > 0 {
        total / divisor as f64
    } else {
        0.0
    };

    ForecastView {
        stats: SummaryStats {
            total,
            average,
            count: series.len(),
        },
        granularity,
        period_label: period_label(payload.granularity),
        periods: divisor,
        scalar: series.len() == 1,
        report: payload.report.clone(),
        series,
    }
}
