// crates/adlens-core/src/types.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub use adlens_parser::{BusinessRecord, CoercionPolicy, MarketingRecord, Platform};

/// Grouping dimensions for marketing aggregation. The standard dashboard
/// view groups by date + platform; tactic/state/campaign serve drill-downs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupKey {
    Date,
    Platform,
    Tactic,
    State,
    Campaign,
}

/// Ratio with the display-stability convention: a zero denominator yields
/// 0, never NaN and never an error.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// One aggregated marketing row. Key fields are populated only when the
/// corresponding dimension was part of the grouping key; with an empty key
/// the whole input collapses into a single row of raw sums.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedMarketingRow {
    pub date: Option<NaiveDate>,
    pub platform: Option<Platform>,
    pub tactic: Option<String>,
    pub state: Option<String>,
    pub campaign: Option<String>,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub attributed_revenue: f64,
    pub ctr: f64,
    pub cpc: f64,
    pub cpm: f64,
    pub roas: f64,
}

/// One output row per business date: business fields, marketing sums across
/// all platforms for that date, and the derived business ratios. Column
/// names are a rendering contract; renaming a field is a breaking change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedRow {
    pub date: NaiveDate,
    pub orders: u64,
    pub new_orders: u64,
    pub new_customers: u64,
    pub total_revenue: f64,
    pub gross_profit: f64,
    pub cogs: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub spend: f64,
    pub attributed_revenue: f64,
    pub aov: f64,
    pub profit_margin: f64,
    pub new_customer_rate: f64,
    pub attribution_gap: f64,
    pub attribution_gap_pct: f64,
}

#[cfg(test)]
mod tests {
    use super::ratio;

    #[test]
    fn ratio_is_zero_on_zero_denominator() {
        assert_eq!(ratio(5.0, 0.0), 0.0);
        assert_eq!(ratio(0.0, 0.0), 0.0);
    }

    #[test]
    fn ratio_divides_otherwise() {
        assert!((ratio(40.0, 300.0) - 40.0 / 300.0).abs() < 1e-12);
    }
}
