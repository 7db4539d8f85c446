use chrono::NaiveDate;
use polars::prelude::*;

use crate::types::{AggregatedMarketingRow, CombinedRow};

fn days_since_epoch(date: NaiveDate) -> i32 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).expect("epoch date is valid");
    (date - epoch).num_days() as i32
}

/// The combined per-date table as a DataFrame, ordered by date ascending.
/// Column names match the row struct's field names; rendering code binds
/// to them, so renaming a column is a breaking change.
pub fn combined_frame(rows: &[CombinedRow]) -> Result<DataFrame, PolarsError> {
    let mut sorted: Vec<&CombinedRow> = rows.iter().collect();
    sorted.sort_by_key(|row| row.date);

    let dates: Vec<i32> = sorted.iter().map(|r| days_since_epoch(r.date)).collect();
    let date_series = Series::new("date".into(), dates).cast(&DataType::Date)?;

    let i64_col = |name: &str, values: Vec<i64>| Series::new(name.into(), values).into();
    let f64_col = |name: &str, values: Vec<f64>| Series::new(name.into(), values).into();

    let cols: Vec<Column> = vec![
        date_series.into(),
        i64_col("orders", sorted.iter().map(|r| r.orders as i64).collect()),
        i64_col(
            "new_orders",
            sorted.iter().map(|r| r.new_orders as i64).collect(),
        ),
        i64_col(
            "new_customers",
            sorted.iter().map(|r| r.new_customers as i64).collect(),
        ),
        f64_col(
            "total_revenue",
            sorted.iter().map(|r| r.total_revenue).collect(),
        ),
        f64_col(
            "gross_profit",
            sorted.iter().map(|r| r.gross_profit).collect(),
        ),
        f64_col("cogs", sorted.iter().map(|r| r.cogs).collect()),
        i64_col(
            "impressions",
            sorted.iter().map(|r| r.impressions as i64).collect(),
        ),
        i64_col("clicks", sorted.iter().map(|r| r.clicks as i64).collect()),
        f64_col("spend", sorted.iter().map(|r| r.spend).collect()),
        f64_col(
            "attributed_revenue",
            sorted.iter().map(|r| r.attributed_revenue).collect(),
        ),
        f64_col("aov", sorted.iter().map(|r| r.aov).collect()),
        f64_col(
            "profit_margin",
            sorted.iter().map(|r| r.profit_margin).collect(),
        ),
        f64_col(
            "new_customer_rate",
            sorted.iter().map(|r| r.new_customer_rate).collect(),
        ),
        f64_col(
            "attribution_gap",
            sorted.iter().map(|r| r.attribution_gap).collect(),
        ),
        f64_col(
            "attribution_gap_pct",
            sorted.iter().map(|r| r.attribution_gap_pct).collect(),
        ),
    ];

    DataFrame::new(cols)
}

/// The aggregated marketing table as a DataFrame, ordered by date then
/// platform. Drill-down key columns (tactic/state/campaign) appear only
/// when the aggregation carried them.
pub fn platform_daily_frame(rows: &[AggregatedMarketingRow]) -> Result<DataFrame, PolarsError> {
    let mut sorted: Vec<&AggregatedMarketingRow> = rows.iter().collect();
    sorted.sort_by(|a, b| (a.date, a.platform).cmp(&(b.date, b.platform)));

    let dates: Vec<Option<i32>> = sorted
        .iter()
        .map(|r| r.date.map(days_since_epoch))
        .collect();
    let date_series = Series::new("date".into(), dates).cast(&DataType::Date)?;

    let platforms: Vec<Option<&str>> = sorted
        .iter()
        .map(|r| r.platform.map(|p| p.as_str()))
        .collect();

    let mut cols: Vec<Column> = vec![
        date_series.into(),
        Series::new("platform".into(), platforms).into(),
    ];

    for (name, values) in [
        ("tactic", sorted.iter().map(|r| r.tactic.as_deref()).collect::<Vec<_>>()),
        ("state", sorted.iter().map(|r| r.state.as_deref()).collect()),
        ("campaign", sorted.iter().map(|r| r.campaign.as_deref()).collect()),
    ] {
        if values.iter().any(Option::is_some) {
            cols.push(Series::new(name.into(), values).into());
        }
    }

    cols.push(
        Series::new(
            "impressions".into(),
            sorted
                .iter()
                .map(|r| r.impressions as i64)
                .collect::<Vec<i64>>(),
        )
        .into(),
    );
    cols.push(
        Series::new(
            "clicks".into(),
            sorted.iter().map(|r| r.clicks as i64).collect::<Vec<i64>>(),
        )
        .into(),
    );
    for (name, values) in [
        ("spend", sorted.iter().map(|r| r.spend).collect::<Vec<f64>>()),
        (
            "attributed_revenue",
            sorted.iter().map(|r| r.attributed_revenue).collect(),
        ),
        ("ctr", sorted.iter().map(|r| r.ctr).collect()),
        ("cpc", sorted.iter().map(|r| r.cpc).collect()),
        ("cpm", sorted.iter().map(|r| r.cpm).collect()),
        ("roas", sorted.iter().map(|r| r.roas).collect()),
    ] {
        cols.push(Series::new(name.into(), values).into());
    }

    DataFrame::new(cols)
}
