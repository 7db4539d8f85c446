use serde::Serialize;

use crate::summary::SummarySnapshot;

/// Rule-based narration of a snapshot. This is the insight layer that runs
/// with no external model configured: plain threshold commentary computed
/// entirely from already-aggregated numbers. It reads the snapshot and
/// nothing else.
#[derive(Debug, Clone, Serialize)]
pub struct InsightReport {
    pub performance: String,
    pub recommendations: Vec<String>,
    pub trends: String,
    pub attribution: String,
    pub executive_summary: String,
}

pub fn narrate(snapshot: &SummarySnapshot) -> InsightReport {
    InsightReport {
        performance: performance_insight(snapshot),
        recommendations: recommendations(snapshot),
        trends: trend_insight(snapshot),
        attribution: attribution_insight(snapshot),
        executive_summary: executive_summary(snapshot),
    }
}

fn performance_insight(snapshot: &SummarySnapshot) -> String {
    let roas = snapshot.overall_roas;
    let gap_pct = snapshot.attribution_gap_pct * 100.0;

    let roas_note = if roas > 3.5 {
        format!(
            "Overall ROAS of {roas:.2}x is excellent; marketing spend is converting efficiently."
        )
    } else if roas > 2.5 {
        format!(
            "Overall ROAS of {roas:.2}x is solid, with room to optimize individual channels."
        )
    } else {
        format!(
            "Overall ROAS of {roas:.2}x is below the 2.5x threshold; spend allocation needs review."
        )
    };

    let gap_note = if gap_pct > 50.0 {
        format!(
            " Attribution gap of {gap_pct:.1}% means more than half of revenue is untracked; fixing tracking should be the top priority."
        )
    } else if gap_pct > 30.0 {
        format!(
            " Attribution gap of {gap_pct:.1}% is considerable; better tracking would sharpen the channel picture."
        )
    } else {
        format!(" Attribution gap of {gap_pct:.1}% is within a healthy range.")
    };

    roas_note + &gap_note
}

fn recommendations(snapshot: &SummarySnapshot) -> Vec<String> {
    if snapshot.platforms.is_empty() {
        return vec!["No platform data available to generate recommendations.".to_string()];
    }

    let mut recs = Vec::new();

    if let Some(best) = snapshot
        .top_platform_by_roas
        .and_then(|p| snapshot.platforms.iter().find(|s| s.platform == p))
    {
        if best.roas > 3.0 {
            recs.push(format!(
                "Scale {}: at {:.2}x ROAS it is the strongest channel; shift incremental budget there.",
                best.platform, best.roas
            ));
        }
    }

    if let Some(worst) = snapshot
        .bottom_platform_by_roas
        .and_then(|p| snapshot.platforms.iter().find(|s| s.platform == p))
    {
        if worst.roas < 2.0 {
            recs.push(format!(
                "Review {}: ROAS of {:.2}x lags the other channels; audit creative and targeting before reallocating.",
                worst.platform, worst.roas
            ));
        }
    }

    if snapshot.attribution_gap_pct > 0.4 {
        recs.push(
            "Tighten attribution: a large share of revenue is untracked, which may be hiding channel performance."
                .to_string(),
        );
    } else {
        recs.push(
            "Tracking looks sound; invest in A/B testing creative and landing pages to find new winners."
                .to_string(),
        );
    }

    recs
}

fn trend_insight(snapshot: &SummarySnapshot) -> String {
    let contribution = if snapshot.total_business_revenue > 0.0 {
        snapshot.total_attributed_revenue / snapshot.total_business_revenue * 100.0
    } else {
        0.0
    };
    let mut text = format!(
        "Tracked marketing accounts for {contribution:.1}% of total revenue across {} days.",
        snapshot.days
    );
    if let Some(deltas) = &snapshot.period_over_period {
        text.push_str(&format!(
            " Versus the earlier half of the range, spend moved {:+.1}% and attributed revenue {:+.1}%.",
            deltas.spend_delta * 100.0,
            deltas.revenue_delta * 100.0
        ));
    }
    text
}

fn attribution_insight(snapshot: &SummarySnapshot) -> String {
    let gap_pct = snapshot.attribution_gap_pct * 100.0;
    if snapshot.attribution_gap_pct < 0.2 {
        format!("Only {gap_pct:.1}% of revenue is unattributed, indicating strong tracking.")
    } else {
        format!(
            "{gap_pct:.1}% of revenue is unattributed; improving tracking coverage would clarify channel impact."
        )
    }
}

fn executive_summary(snapshot: &SummarySnapshot) -> String {
    let strength = if snapshot.overall_roas > 3.0 {
        "strong"
    } else {
        "moderate"
    };
    format!(
        "Overall ROAS {:.2}x on {:.0} spend; attribution gap {:.1}%. Marketing shows {strength} returns with clear optimization levers.",
        snapshot.overall_roas,
        snapshot.total_spend,
        snapshot.attribution_gap_pct * 100.0
    )
}
