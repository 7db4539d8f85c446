use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::warn;

use crate::types::{ratio, AggregatedMarketingRow, BusinessRecord, CombinedRow};

/// Join diagnostics. Unmatched marketing dates are informational, never
/// fatal: business is authoritative for the output's date domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinReport {
    pub matched_dates: usize,
    pub unmatched_marketing_dates: usize,
    pub undated_marketing_rows: usize,
}

#[derive(Debug, Clone)]
pub struct CombineOutput {
    pub rows: Vec<CombinedRow>,
    pub report: JoinReport,
}

#[derive(Debug, Default, Clone, Copy)]
struct MarketingTotals {
    impressions: u64,
    clicks: u64,
    spend: f64,
    attributed_revenue: f64,
}

/// Left outer join keyed on date with business as the driving side: every
/// business date appears exactly once in the output, marketing fields
/// defaulting to 0 where no spend occurred. Marketing dates outside the
/// business calendar are dropped and counted. O(n+m) via a date-keyed map.
pub fn combine(
    business: &[BusinessRecord],
    marketing: &[AggregatedMarketingRow],
) -> CombineOutput {
    let mut by_date: HashMap<NaiveDate, MarketingTotals> = HashMap::new();
    let mut undated = 0usize;
    for row in marketing {
        let Some(date) = row.date else {
            undated += 1;
            continue;
        };
        let totals = by_date.entry(date).or_default();
        totals.impressions += row.impressions;
        totals.clicks += row.clicks;
        totals.spend += row.spend;
        totals.attributed_revenue += row.attributed_revenue;
    }

    let mut rows: Vec<CombinedRow> = Vec::with_capacity(business.len());
    let mut matched = 0usize;
    for record in business {
        let totals = match by_date.remove(&record.date) {
            Some(totals) => {
                matched += 1;
                totals
            }
            None => MarketingTotals::default(),
        };
        rows.push(combine_row(record, totals));
    }
    rows.sort_by_key(|row| row.date);

    let report = JoinReport {
        matched_dates: matched,
        unmatched_marketing_dates: by_date.len(),
        undated_marketing_rows: undated,
    };
    if report.unmatched_marketing_dates > 0 {
        warn!(
            unmatched = report.unmatched_marketing_dates,
            "marketing dates with no business row were dropped"
        );
    }
    if report.undated_marketing_rows > 0 {
        warn!(
            undated = report.undated_marketing_rows,
            "marketing aggregates without a date key cannot join"
        );
    }

    CombineOutput { rows, report }
}

fn combine_row(record: &BusinessRecord, totals: MarketingTotals) -> CombinedRow {
    let orders = record.orders as f64;
    let attribution_gap = record.total_revenue - totals.attributed_revenue;
    CombinedRow {
        date: record.date,
        orders: record.orders,
        new_orders: record.new_orders,
        new_customers: record.new_customers,
        total_revenue: record.total_revenue,
        gross_profit: record.gross_profit,
        cogs: record.cogs,
        impressions: totals.impressions,
        clicks: totals.clicks,
        spend: totals.spend,
        attributed_revenue: totals.attributed_revenue,
        aov: ratio(record.total_revenue, orders),
        profit_margin: ratio(record.gross_profit, record.total_revenue),
        new_customer_rate: ratio(record.new_customers as f64, orders),
        attribution_gap,
        attribution_gap_pct: ratio(attribution_gap, record.total_revenue),
    }
}
