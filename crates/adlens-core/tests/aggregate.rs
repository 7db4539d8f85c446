use chrono::NaiveDate;

use adlens_core::aggregate::aggregate_marketing;
use adlens_core::types::{GroupKey, MarketingRecord, Platform};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn record(
    day: u32,
    platform: Platform,
    impressions: u64,
    clicks: u64,
    spend: f64,
    attributed_revenue: f64,
) -> MarketingRecord {
    MarketingRecord {
        date: date(2024, 1, day),
        platform,
        tactic: "Prospecting".to_string(),
        state: "NY".to_string(),
        campaign: "C-1".to_string(),
        impressions,
        clicks,
        spend,
        attributed_revenue,
    }
}

#[test]
fn aggregation_is_sum_then_divide() {
    let records = vec![
        record(1, Platform::Facebook, 100, 10, 0.0, 0.0),
        record(1, Platform::Facebook, 200, 30, 0.0, 0.0),
    ];

    let rows = aggregate_marketing(&records, &[]);
    assert_eq!(rows.len(), 1);

    let expected = 40.0 / 300.0;
    assert!((rows[0].ctr - expected).abs() < 1e-12);
    // Explicitly not the mean of the per-row CTRs (10% and 15%).
    assert!((rows[0].ctr - 0.125).abs() > 1e-3);
}

#[test]
fn empty_group_keys_round_trips_raw_sums() {
    let records = vec![
        record(1, Platform::Facebook, 100, 10, 12.5, 30.0),
        record(2, Platform::Google, 200, 30, 7.5, 10.0),
        record(3, Platform::TikTok, 50, 5, 1.25, 2.5),
    ];

    let rows = aggregate_marketing(&records, &[]);
    assert_eq!(rows.len(), 1);

    let total = &rows[0];
    assert_eq!(total.impressions, 350);
    assert_eq!(total.clicks, 45);
    assert_eq!(total.spend, 12.5 + 7.5 + 1.25);
    assert_eq!(total.attributed_revenue, 30.0 + 10.0 + 2.5);
    assert!(total.date.is_none());
    assert!(total.platform.is_none());
}

#[test]
fn zero_denominators_yield_zero_not_nan() {
    let records = vec![record(1, Platform::Facebook, 0, 0, 0.0, 0.0)];
    let rows = aggregate_marketing(&records, &[GroupKey::Date, GroupKey::Platform]);

    let row = &rows[0];
    for value in [row.ctr, row.cpc, row.cpm, row.roas] {
        assert_eq!(value, 0.0);
        assert!(!value.is_nan());
    }
}

#[test]
fn groups_by_date_and_platform() {
    let records = vec![
        record(1, Platform::Facebook, 100, 10, 10.0, 20.0),
        record(1, Platform::Google, 200, 20, 20.0, 40.0),
        record(2, Platform::Facebook, 300, 30, 30.0, 60.0),
        record(1, Platform::Facebook, 100, 10, 10.0, 20.0),
    ];

    let rows = aggregate_marketing(&records, &[GroupKey::Date, GroupKey::Platform]);
    assert_eq!(rows.len(), 3);

    let fb_jan1 = rows
        .iter()
        .find(|r| r.date == Some(date(2024, 1, 1)) && r.platform == Some(Platform::Facebook))
        .expect("missing Facebook Jan 1 group");
    assert_eq!(fb_jan1.impressions, 200);
    assert_eq!(fb_jan1.clicks, 20);
    assert!(fb_jan1.tactic.is_none());
}

#[test]
fn drill_down_keys_split_groups() {
    let mut a = record(1, Platform::Facebook, 100, 10, 10.0, 20.0);
    a.tactic = "Prospecting".to_string();
    let mut b = record(1, Platform::Facebook, 200, 20, 20.0, 40.0);
    b.tactic = "Retargeting".to_string();

    let rows = aggregate_marketing(
        &[a, b],
        &[GroupKey::Date, GroupKey::Platform, GroupKey::Tactic],
    );
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.tactic.is_some()));
}

#[test]
fn cpm_scales_by_thousand_impressions() {
    let records = vec![record(1, Platform::Google, 2000, 10, 5.0, 0.0)];
    let rows = aggregate_marketing(&records, &[GroupKey::Date]);
    assert!((rows[0].cpm - 2.5).abs() < 1e-12);
}

#[test]
fn tolerates_ctr_above_one() {
    let records = vec![record(1, Platform::TikTok, 100, 250, 1.0, 1.0)];
    let rows = aggregate_marketing(&records, &[GroupKey::Date]);
    assert!(rows[0].ctr > 1.0);
    assert!(!rows[0].ctr.is_nan());
}
