use std::collections::HashMap;

use chrono::NaiveDate;

use crate::types::{ratio, AggregatedMarketingRow, GroupKey, MarketingRecord, Platform};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AggKey {
    date: Option<NaiveDate>,
    platform: Option<Platform>,
    tactic: Option<String>,
    state: Option<String>,
    campaign: Option<String>,
}

impl AggKey {
    fn for_record(record: &MarketingRecord, group_keys: &[GroupKey]) -> Self {
        let has = |key: GroupKey| group_keys.contains(&key);
        Self {
            date: has(GroupKey::Date).then_some(record.date),
            platform: has(GroupKey::Platform).then_some(record.platform),
            tactic: has(GroupKey::Tactic).then(|| record.tactic.clone()),
            state: has(GroupKey::State).then(|| record.state.clone()),
            campaign: has(GroupKey::Campaign).then(|| record.campaign.clone()),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    impressions: u64,
    clicks: u64,
    spend: f64,
    attributed_revenue: f64,
}

impl Totals {
    fn add(&mut self, record: &MarketingRecord) {
        self.impressions += record.impressions;
        self.clicks += record.clicks;
        self.spend += record.spend;
        self.attributed_revenue += record.attributed_revenue;
    }
}

/// Single-pass fold into an accumulator keyed by the grouping tuple.
/// Derived ratios are computed only after summation: the CTR of an
/// aggregate is total clicks over total impressions, never a mean of
/// per-row CTRs. Output preserves first-seen key order.
pub fn aggregate_marketing(
    records: &[MarketingRecord],
    group_keys: &[GroupKey],
) -> Vec<AggregatedMarketingRow> {
    let mut order: Vec<AggKey> = Vec::new();
    let mut totals: HashMap<AggKey, Totals> = HashMap::new();

    for record in records {
        let key = AggKey::for_record(record, group_keys);
        if !totals.contains_key(&key) {
            order.push(key.clone());
        }
        totals.entry(key).or_default().add(record);
    }

    order
        .into_iter()
        .map(|key| {
            let sums = totals[&key];
            finish_row(key, sums)
        })
        .collect()
}

fn finish_row(key: AggKey, sums: Totals) -> AggregatedMarketingRow {
    let impressions = sums.impressions as f64;
    let clicks = sums.clicks as f64;
    AggregatedMarketingRow {
        date: key.date,
        platform: key.platform,
        tactic: key.tactic,
        state: key.state,
        campaign: key.campaign,
        impressions: sums.impressions,
        clicks: sums.clicks,
        spend: sums.spend,
        attributed_revenue: sums.attributed_revenue,
        ctr: ratio(clicks, impressions),
        cpc: ratio(sums.spend, clicks),
        cpm: ratio(sums.spend, impressions) * 1000.0,
        roas: ratio(sums.attributed_revenue, sums.spend),
    }
}
