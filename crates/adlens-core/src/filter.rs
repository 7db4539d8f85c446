use chrono::NaiveDate;

use crate::aggregate::aggregate_marketing;
use crate::combine::{combine, JoinReport};
use crate::pipeline::LoadedData;
use crate::types::{AggregatedMarketingRow, CombinedRow, GroupKey, MarketingRecord, Platform};

/// Inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewFilter {
    pub date_range: Option<DateRange>,
    pub platforms: Option<Vec<Platform>>,
}

#[derive(Debug, Clone)]
pub struct ViewOutput {
    pub combined: Vec<CombinedRow>,
    pub platform_daily: Vec<AggregatedMarketingRow>,
    pub report: JoinReport,
}

/// Pure date filter over already-combined rows.
pub fn filter_combined(rows: &[CombinedRow], range: &DateRange) -> Vec<CombinedRow> {
    rows.iter()
        .filter(|row| range.contains(row.date))
        .cloned()
        .collect()
}

/// Builds the dashboard tables for a filter. The platform restriction is
/// applied to raw records before aggregation and the join is re-run:
/// summed ratios are not separable after the fact, so post-filtering a
/// combined table would report the wrong ROAS for a platform subset. The
/// date restriction, by contrast, is separable (every grouping key includes
/// the date) and is applied to the finished rows.
pub fn build_view(data: &LoadedData, filter: &ViewFilter) -> ViewOutput {
    let restricted: Vec<MarketingRecord>;
    let records: &[MarketingRecord] = match &filter.platforms {
        Some(platforms) => {
            restricted = data
                .marketing
                .iter()
                .filter(|record| platforms.contains(&record.platform))
                .cloned()
                .collect();
            &restricted
        }
        None => &data.marketing,
    };

    let mut platform_daily =
        aggregate_marketing(records, &[GroupKey::Date, GroupKey::Platform]);
    platform_daily.sort_by_key(|row| (row.date, row.platform));

    let date_totals = aggregate_marketing(records, &[GroupKey::Date]);
    let combined = combine(&data.business, &date_totals);

    let (combined_rows, platform_daily) = match &filter.date_range {
        Some(range) => (
            filter_combined(&combined.rows, range),
            platform_daily
                .into_iter()
                .filter(|row| row.date.is_some_and(|date| range.contains(date)))
                .collect(),
        ),
        None => (combined.rows, platform_daily),
    };

    ViewOutput {
        combined: combined_rows,
        platform_daily,
        report: combined.report,
    }
}
