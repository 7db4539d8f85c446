use chrono::NaiveDate;

use adlens_core::config::DatasetConfig;
use adlens_core::error::PipelineError;
use adlens_core::pipeline::{load_sources, run, SourceFile, SourceSet};
use adlens_core::types::{CoercionPolicy, Platform};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn source(name: &str, contents: &str) -> SourceFile {
    SourceFile {
        name: name.to_string(),
        contents: contents.to_string(),
    }
}

const BUSINESS: &str = "\
date,orders,new_orders,new_customers,total_revenue,gross_profit,cogs
2024-01-01,100,40,30,5000,2000,3000
2024-01-02,80,20,15,4000,1500,2500
2024-01-03,90,25,20,4500,1800,2700
";

const FACEBOOK: &str = "\
date,impressions,clicks,spend,attributed_revenue
2024-01-01,10000,300,200,600
2024-01-02,8000,200,150,450
";

const GOOGLE: &str = "\
date,impressions,clicks,spend,attributed_revenue
2024-01-01,5000,150,100,400
2024-01-09,1000,10,5,10
bad-date,1000,10,5,10
";

const EMPTY_MARKETING: &str = "date,impressions,clicks,spend,attributed_revenue\n";

fn standard_set() -> SourceSet {
    SourceSet {
        business: source("business.csv", BUSINESS),
        marketing: vec![
            (Platform::Facebook, source("Facebook.csv", FACEBOOK)),
            (Platform::Google, source("Google.csv", GOOGLE)),
        ],
    }
}

#[test]
fn run_produces_one_row_per_business_date() {
    let output = run(&standard_set(), CoercionPolicy::CoerceToZero).expect("pipeline failed");

    assert_eq!(output.combined.len(), 3);
    let dates: Vec<NaiveDate> = output.combined.iter().map(|r| r.date).collect();
    assert_eq!(
        dates,
        vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]
    );

    let jan1 = &output.combined[0];
    assert_eq!(jan1.spend, 300.0);
    assert_eq!(jan1.attributed_revenue, 1000.0);

    // Jan 3 has business data but no marketing.
    let jan3 = &output.combined[2];
    assert_eq!(jan3.spend, 0.0);
    assert_eq!(jan3.attribution_gap, 4500.0);
}

#[test]
fn platform_daily_is_ordered_by_date_then_platform() {
    let output = run(&standard_set(), CoercionPolicy::CoerceToZero).expect("pipeline failed");

    let keys: Vec<(Option<NaiveDate>, Option<Platform>)> = output
        .platform_daily
        .iter()
        .map(|r| (r.date, r.platform))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn quality_report_counts_rejects_and_unmatched_dates() {
    let output = run(&standard_set(), CoercionPolicy::CoerceToZero).expect("pipeline failed");

    // One bad-date row in the Google export.
    assert_eq!(output.quality.rejected_rows(), 1);
    // Google's 2024-01-09 row falls outside the business calendar.
    assert_eq!(output.quality.join.unmatched_marketing_dates, 1);

    let google = output
        .quality
        .sources
        .iter()
        .find(|s| s.platform == Some(Platform::Google))
        .expect("missing Google source entry");
    assert_eq!(google.clean_rows, 2);
    assert_eq!(google.rejects.count, 1);
}

#[test]
fn empty_marketing_sources_still_render_business_calendar() {
    let set = SourceSet {
        business: source("business.csv", BUSINESS),
        marketing: vec![
            (Platform::Facebook, source("Facebook.csv", EMPTY_MARKETING)),
            (Platform::Google, source("Google.csv", EMPTY_MARKETING)),
        ],
    };

    let output = run(&set, CoercionPolicy::CoerceToZero).expect("pipeline failed");
    assert_eq!(output.combined.len(), 3);
    assert!(output.combined.iter().all(|r| r.spend == 0.0));
    assert!(output
        .combined
        .iter()
        .all(|r| r.attribution_gap == r.total_revenue));
}

#[test]
fn empty_business_source_is_empty_result() {
    let set = SourceSet {
        business: source(
            "business.csv",
            "date,orders,new_orders,new_customers,total_revenue,gross_profit,cogs\n",
        ),
        marketing: vec![(Platform::Facebook, source("Facebook.csv", FACEBOOK))],
    };

    let err = run(&set, CoercionPolicy::CoerceToZero).expect_err("should fail");
    match err {
        PipelineError::EmptyResult { name } => assert_eq!(name, "business.csv"),
        other => panic!("expected EmptyResult, got {other:?}"),
    }
}

#[test]
fn all_business_rows_rejected_is_empty_result() {
    let set = SourceSet {
        business: source(
            "business.csv",
            "date,orders,new_orders,new_customers,total_revenue,gross_profit,cogs\nnot-a-date,1,1,1,1,1,1\n",
        ),
        marketing: vec![],
    };

    let err = run(&set, CoercionPolicy::CoerceToZero).expect_err("should fail");
    assert!(matches!(err, PipelineError::EmptyResult { .. }));
}

#[test]
fn absent_source_file_is_source_missing() {
    let mut config = DatasetConfig::default();
    config.data_dir = "/nonexistent/adlens-test-dataset".into();

    let err = SourceSet::load(&config).expect_err("load should fail");
    match err {
        PipelineError::SourceMissing { name, .. } => assert!(name.contains("business.csv")),
        other => panic!("expected SourceMissing, got {other:?}"),
    }
}

#[test]
fn load_sources_concatenates_platform_tagged_records() {
    let data =
        load_sources(&standard_set(), CoercionPolicy::CoerceToZero).expect("load failed");

    assert_eq!(data.business.len(), 3);
    assert_eq!(data.marketing.len(), 4);
    assert_eq!(
        data.marketing
            .iter()
            .filter(|r| r.platform == Platform::Facebook)
            .count(),
        2
    );
}
