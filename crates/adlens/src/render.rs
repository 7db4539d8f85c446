use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

use adlens_core::pipeline::DataQualityReport;
use adlens_core::summary::{PlatformSummary, SummarySnapshot};
use adlens_core::types::CombinedRow;

fn money(value: f64) -> String {
    format!("${value:.2}")
}

fn pct(value: f64) -> String {
    format!("{:.1}%", value * 100.0)
}

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn summary_table(snapshot: &SummarySnapshot) -> Table {
    let mut table = base_table();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![
        Cell::new("Date range"),
        Cell::new(format!("{} to {}", snapshot.start_date, snapshot.end_date)),
    ]);
    table.add_row(vec![Cell::new("Days"), Cell::new(snapshot.days)]);
    table.add_row(vec![
        Cell::new("Total spend"),
        Cell::new(money(snapshot.total_spend)),
    ]);
    table.add_row(vec![
        Cell::new("Attributed revenue"),
        Cell::new(money(snapshot.total_attributed_revenue)),
    ]);
    table.add_row(vec![
        Cell::new("Business revenue"),
        Cell::new(money(snapshot.total_business_revenue)),
    ]);
    table.add_row(vec![
        Cell::new("Overall ROAS"),
        Cell::new(format!("{:.2}x", snapshot.overall_roas)),
    ]);
    table.add_row(vec![
        Cell::new("Attribution gap"),
        Cell::new(format!(
            "{} ({})",
            money(snapshot.attribution_gap),
            pct(snapshot.attribution_gap_pct)
        )),
    ]);
    if let Some(deltas) = &snapshot.period_over_period {
        table.add_row(vec![
            Cell::new("Spend vs earlier half"),
            Cell::new(pct(deltas.spend_delta)),
        ]);
        table.add_row(vec![
            Cell::new("Revenue vs earlier half"),
            Cell::new(pct(deltas.revenue_delta)),
        ]);
    }
    table
}

pub fn platform_table(platforms: &[PlatformSummary]) -> Table {
    let mut table = base_table();
    table.set_header(vec![
        "Platform",
        "Spend",
        "Attributed revenue",
        "ROAS",
        "CTR",
        "CPC",
    ]);
    for summary in platforms {
        table.add_row(vec![
            Cell::new(summary.platform),
            Cell::new(money(summary.spend)).set_alignment(CellAlignment::Right),
            Cell::new(money(summary.attributed_revenue)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}x", summary.roas)).set_alignment(CellAlignment::Right),
            Cell::new(pct(summary.ctr)).set_alignment(CellAlignment::Right),
            Cell::new(money(summary.cpc)).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn daily_table(rows: &[CombinedRow], limit: usize) -> Table {
    let mut table = base_table();
    table.set_header(vec![
        "Date",
        "Orders",
        "Revenue",
        "Spend",
        "Attributed",
        "AOV",
        "Margin",
        "Gap",
    ]);
    for row in rows.iter().take(limit) {
        table.add_row(vec![
            Cell::new(row.date),
            Cell::new(row.orders).set_alignment(CellAlignment::Right),
            Cell::new(money(row.total_revenue)).set_alignment(CellAlignment::Right),
            Cell::new(money(row.spend)).set_alignment(CellAlignment::Right),
            Cell::new(money(row.attributed_revenue)).set_alignment(CellAlignment::Right),
            Cell::new(money(row.aov)).set_alignment(CellAlignment::Right),
            Cell::new(pct(row.profit_margin)).set_alignment(CellAlignment::Right),
            Cell::new(pct(row.attribution_gap_pct)).set_alignment(CellAlignment::Right),
        ]);
    }
    if rows.len() > limit {
        table.add_row(vec![Cell::new(format!(
            "... {} more rows",
            rows.len() - limit
        ))]);
    }
    table
}

/// Data-quality notes shown under the report: non-fatal conditions render
/// normally, with a visible note instead of a crash.
pub fn quality_notes(quality: &DataQualityReport) -> Vec<String> {
    let mut notes = Vec::new();

    let rejected = quality.rejected_rows();
    if rejected > 0 {
        let detail: Vec<String> = quality
            .sources
            .iter()
            .filter(|s| s.rejects.count > 0)
            .map(|s| match s.rejects.samples.first() {
                Some(sample) => {
                    format!("{} ({} rows, e.g. {})", s.name, s.rejects.count, sample)
                }
                None => format!("{} ({} rows)", s.name, s.rejects.count),
            })
            .collect();
        notes.push(format!(
            "{rejected} rows were rejected during parsing: {}",
            detail.join(", ")
        ));
    }

    for source in &quality.sources {
        if source.platform.is_some() && source.clean_rows == 0 {
            notes.push(format!("{} contained no usable rows", source.name));
        }
    }

    if quality.join.unmatched_marketing_dates > 0 {
        notes.push(format!(
            "{} marketing dates had no matching business row and were dropped",
            quality.join.unmatched_marketing_dates
        ));
    }

    notes
}
