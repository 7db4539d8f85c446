use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::types::{ratio, AggregatedMarketingRow, CombinedRow, Platform};

/// Read-only snapshot of the combined tables, handed to reporting and
/// insight collaborators. Nothing downstream can mutate or extend the
/// core tables through it.
#[derive(Debug, Clone, Serialize)]
pub struct SummarySnapshot {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: usize,
    pub total_spend: f64,
    pub total_attributed_revenue: f64,
    pub total_business_revenue: f64,
    pub total_orders: u64,
    pub overall_roas: f64,
    pub overall_ctr: f64,
    pub overall_cpc: f64,
    pub attribution_gap: f64,
    pub attribution_gap_pct: f64,
    pub platforms: Vec<PlatformSummary>,
    pub top_platform_by_roas: Option<Platform>,
    pub bottom_platform_by_roas: Option<Platform>,
    pub period_over_period: Option<PeriodDeltas>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlatformSummary {
    pub platform: Platform,
    pub spend: f64,
    pub attributed_revenue: f64,
    pub impressions: u64,
    pub clicks: u64,
    pub roas: f64,
    pub ctr: f64,
    pub cpc: f64,
}

/// Fractional change of the later half of the range against the earlier
/// half. 0 when the earlier half's value is 0.
#[derive(Debug, Clone, Serialize)]
pub struct PeriodDeltas {
    pub spend_delta: f64,
    pub revenue_delta: f64,
    pub roas_delta: f64,
}

pub fn summarize(
    combined: &[CombinedRow],
    platform_daily: &[AggregatedMarketingRow],
) -> Option<SummarySnapshot> {
    let first = combined.first()?;
    let last = combined.last()?;

    let mut total_spend = 0.0;
    let mut total_attributed = 0.0;
    let mut total_revenue = 0.0;
    let mut total_orders = 0u64;
    let mut total_impressions = 0u64;
    let mut total_clicks = 0u64;
    for row in combined {
        total_spend += row.spend;
        total_attributed += row.attributed_revenue;
        total_revenue += row.total_revenue;
        total_orders += row.orders;
        total_impressions += row.impressions;
        total_clicks += row.clicks;
    }

    let platforms = platform_totals(platform_daily);
    let top = platforms
        .iter()
        .max_by(|a, b| a.roas.total_cmp(&b.roas))
        .map(|s| s.platform);
    let bottom = if platforms.len() >= 2 {
        platforms
            .iter()
            .min_by(|a, b| a.roas.total_cmp(&b.roas))
            .map(|s| s.platform)
    } else {
        None
    };

    let attribution_gap = total_revenue - total_attributed;

    Some(SummarySnapshot {
        start_date: first.date,
        end_date: last.date,
        days: combined.len(),
        total_spend,
        total_attributed_revenue: total_attributed,
        total_business_revenue: total_revenue,
        total_orders,
        overall_roas: ratio(total_attributed, total_spend),
        overall_ctr: ratio(total_clicks as f64, total_impressions as f64),
        overall_cpc: ratio(total_spend, total_clicks as f64),
        attribution_gap,
        attribution_gap_pct: ratio(attribution_gap, total_revenue),
        platforms,
        top_platform_by_roas: top,
        bottom_platform_by_roas: bottom,
        period_over_period: period_deltas(combined),
    })
}

fn platform_totals(platform_daily: &[AggregatedMarketingRow]) -> Vec<PlatformSummary> {
    #[derive(Default)]
    struct Acc {
        spend: f64,
        attributed_revenue: f64,
        impressions: u64,
        clicks: u64,
    }

    let mut order: Vec<Platform> = Vec::new();
    let mut totals: HashMap<Platform, Acc> = HashMap::new();
    for row in platform_daily {
        let Some(platform) = row.platform else {
            continue;
        };
        if !totals.contains_key(&platform) {
            order.push(platform);
        }
        let acc = totals.entry(platform).or_default();
        acc.spend += row.spend;
        acc.attributed_revenue += row.attributed_revenue;
        acc.impressions += row.impressions;
        acc.clicks += row.clicks;
    }

    order
        .into_iter()
        .map(|platform| {
            let acc = &totals[&platform];
            PlatformSummary {
                platform,
                spend: acc.spend,
                attributed_revenue: acc.attributed_revenue,
                impressions: acc.impressions,
                clicks: acc.clicks,
                roas: ratio(acc.attributed_revenue, acc.spend),
                ctr: ratio(acc.clicks as f64, acc.impressions as f64),
                cpc: ratio(acc.spend, acc.clicks as f64),
            }
        })
        .collect()
}

fn period_deltas(combined: &[CombinedRow]) -> Option<PeriodDeltas> {
    if combined.len() < 2 {
        return None;
    }
    let mid = combined.len() / 2;
    let (earlier, later) = combined.split_at(mid);

    let sums = |rows: &[CombinedRow]| {
        let spend: f64 = rows.iter().map(|r| r.spend).sum();
        let revenue: f64 = rows.iter().map(|r| r.attributed_revenue).sum();
        (spend, revenue, ratio(revenue, spend))
    };
    let (earlier_spend, earlier_revenue, earlier_roas) = sums(earlier);
    let (later_spend, later_revenue, later_roas) = sums(later);

    Some(PeriodDeltas {
        spend_delta: ratio(later_spend - earlier_spend, earlier_spend),
        revenue_delta: ratio(later_revenue - earlier_revenue, earlier_revenue),
        roas_delta: ratio(later_roas - earlier_roas, earlier_roas),
    })
}
