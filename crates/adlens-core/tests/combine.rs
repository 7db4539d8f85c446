use chrono::NaiveDate;

use adlens_core::aggregate::aggregate_marketing;
use adlens_core::combine::combine;
use adlens_core::types::{BusinessRecord, GroupKey, MarketingRecord, Platform};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn business(day: u32, orders: u64, total_revenue: f64) -> BusinessRecord {
    BusinessRecord {
        date: date(2024, 3, day),
        orders,
        new_orders: orders / 2,
        new_customers: orders / 4,
        total_revenue,
        gross_profit: total_revenue * 0.4,
        cogs: total_revenue * 0.6,
    }
}

fn marketing(day: u32, platform: Platform, spend: f64, attributed_revenue: f64) -> MarketingRecord {
    MarketingRecord {
        date: date(2024, 3, day),
        platform,
        tactic: String::new(),
        state: String::new(),
        campaign: String::new(),
        impressions: 1000,
        clicks: 50,
        spend,
        attributed_revenue,
    }
}

fn daily(records: &[MarketingRecord]) -> Vec<adlens_core::types::AggregatedMarketingRow> {
    aggregate_marketing(records, &[GroupKey::Date])
}

#[test]
fn output_length_equals_distinct_business_dates() {
    let business_rows = vec![business(1, 10, 100.0), business(2, 20, 200.0)];
    let marketing_rows = vec![
        marketing(1, Platform::Facebook, 10.0, 5.0),
        marketing(2, Platform::Google, 10.0, 5.0),
        // Outside the business calendar; must be dropped.
        marketing(9, Platform::TikTok, 99.0, 99.0),
        marketing(10, Platform::TikTok, 99.0, 99.0),
    ];

    let output = combine(&business_rows, &daily(&marketing_rows));
    assert_eq!(output.rows.len(), 2);
    assert_eq!(output.report.matched_dates, 2);
    assert_eq!(output.report.unmatched_marketing_dates, 2);
}

#[test]
fn business_date_without_marketing_gets_zeros() {
    let business_rows = vec![business(5, 10, 250.0)];
    let output = combine(&business_rows, &daily(&[]));

    let row = &output.rows[0];
    assert_eq!(row.date, date(2024, 3, 5));
    assert_eq!(row.impressions, 0);
    assert_eq!(row.clicks, 0);
    assert_eq!(row.spend, 0.0);
    assert_eq!(row.attributed_revenue, 0.0);
    assert_eq!(row.attribution_gap, 250.0);
    assert_eq!(row.attribution_gap_pct, 1.0);
}

#[test]
fn marketing_sums_cross_platforms_per_date() {
    let business_rows = vec![business(1, 10, 1000.0)];
    let marketing_rows = vec![
        marketing(1, Platform::Facebook, 100.0, 50.0),
        marketing(1, Platform::Google, 50.0, 100.0),
    ];

    let output = combine(&business_rows, &daily(&marketing_rows));
    let row = &output.rows[0];
    assert_eq!(row.spend, 150.0);
    assert_eq!(row.attributed_revenue, 150.0);
    assert_eq!(row.attribution_gap, 850.0);
}

#[test]
fn derived_business_ratios() {
    let business_rows = vec![BusinessRecord {
        date: date(2024, 3, 1),
        orders: 50,
        new_orders: 20,
        new_customers: 10,
        total_revenue: 5000.0,
        gross_profit: 1250.0,
        cogs: 3750.0,
    }];

    let output = combine(&business_rows, &daily(&[]));
    let row = &output.rows[0];
    assert!((row.aov - 100.0).abs() < 1e-12);
    assert!((row.profit_margin - 0.25).abs() < 1e-12);
    assert!((row.new_customer_rate - 0.2).abs() < 1e-12);
}

#[test]
fn zero_orders_and_revenue_yield_zero_ratios() {
    let business_rows = vec![business(1, 0, 0.0)];
    let output = combine(&business_rows, &daily(&[]));

    let row = &output.rows[0];
    for value in [
        row.aov,
        row.profit_margin,
        row.new_customer_rate,
        row.attribution_gap_pct,
    ] {
        assert_eq!(value, 0.0);
        assert!(!value.is_nan());
    }
}

#[test]
fn output_is_sorted_by_date_ascending() {
    let business_rows = vec![business(9, 1, 10.0), business(2, 1, 10.0), business(5, 1, 10.0)];
    let output = combine(&business_rows, &daily(&[]));

    let dates: Vec<NaiveDate> = output.rows.iter().map(|r| r.date).collect();
    assert_eq!(
        dates,
        vec![date(2024, 3, 2), date(2024, 3, 5), date(2024, 3, 9)]
    );
}
