mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use adlens_core::cache::{run_cached, ResultCache};
use adlens_core::config::DatasetConfig;
use adlens_core::filter::{build_view, DateRange, ViewFilter};
use adlens_core::narrate::narrate;
use adlens_core::pipeline::{load_sources, DataQualityReport, SourceSet};
use adlens_core::summary::summarize;
use adlens_core::types::{AggregatedMarketingRow, CombinedRow, Platform};

#[derive(Parser, Debug)]
#[command(author, version, about = "Marketing KPI pipeline and reporting CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print summary cards plus the platform and daily tables
    Report(ViewArgs),
    /// Print narrated insights for the selected range
    Insights(InsightArgs),
    /// Write the combined daily table to a CSV file
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
struct ViewArgs {
    /// Path to an adlens.toml configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Inclusive start date (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Inclusive end date (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Restrict to these platforms (comma separated, e.g. facebook,google)
    #[arg(long, value_delimiter = ',')]
    platforms: Vec<String>,
}

#[derive(Args, Debug)]
struct InsightArgs {
    #[command(flatten)]
    view: ViewArgs,

    /// Emit the snapshot and insights as JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    view: ViewArgs,

    /// Output CSV path
    #[arg(long, default_value = "combined.csv")]
    output: PathBuf,
}

struct Tables {
    combined: Vec<CombinedRow>,
    platform_daily: Vec<AggregatedMarketingRow>,
    quality: DataQualityReport,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    match cli.command {
        Command::Report(args) => report(&args),
        Command::Insights(args) => insights(&args),
        Command::Export(args) => export(&args),
    }
}

fn report(args: &ViewArgs) -> Result<()> {
    let tables = build_tables(args)?;
    let Some(snapshot) = summarize(&tables.combined, &tables.platform_daily) else {
        println!("No data for the selected range.");
        return Ok(());
    };

    println!("{}", render::summary_table(&snapshot));
    if !snapshot.platforms.is_empty() {
        println!("\nPlatforms\n{}", render::platform_table(&snapshot.platforms));
    }
    println!("\nDaily\n{}", render::daily_table(&tables.combined, 30));

    for note in render::quality_notes(&tables.quality) {
        println!("note: {note}");
    }
    Ok(())
}

fn insights(args: &InsightArgs) -> Result<()> {
    let tables = build_tables(&args.view)?;
    let Some(snapshot) = summarize(&tables.combined, &tables.platform_daily) else {
        println!("No data for the selected range.");
        return Ok(());
    };
    let report = narrate(&snapshot);

    if args.json {
        let payload = serde_json::json!({
            "snapshot": snapshot,
            "insights": report,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Performance\n  {}\n", report.performance);
    println!("Recommendations");
    for (i, rec) in report.recommendations.iter().enumerate() {
        println!("  {}. {rec}", i + 1);
    }
    println!("\nTrends\n  {}\n", report.trends);
    println!("Attribution\n  {}\n", report.attribution);
    println!("Executive summary\n  {}", report.executive_summary);
    Ok(())
}

fn export(args: &ExportArgs) -> Result<()> {
    let tables = build_tables(&args.view)?;

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("failed to open {}", args.output.display()))?;
    for row in &tables.combined {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(rows = tables.combined.len(), path = %args.output.display(), "combined table exported");
    println!(
        "Wrote {} rows to {}",
        tables.combined.len(),
        args.output.display()
    );
    Ok(())
}

fn build_tables(args: &ViewArgs) -> Result<Tables> {
    let config = DatasetConfig::resolve(args.config.as_deref())
        .context("failed to load configuration")?;
    let set = SourceSet::load(&config)?;

    let output = run_cached(ResultCache::global(), &set, config.coercion)?;
    let filter = view_filter(args)?;

    if filter.date_range.is_none() && filter.platforms.is_none() {
        return Ok(Tables {
            combined: output.combined.clone(),
            platform_daily: output.platform_daily.clone(),
            quality: output.quality.clone(),
        });
    }

    // Platform drill-downs re-aggregate from raw records; summed ratios
    // cannot be recovered from the unrestricted tables.
    let data = load_sources(&set, config.coercion)?;
    let view = build_view(&data, &filter);
    Ok(Tables {
        combined: view.combined,
        platform_daily: view.platform_daily,
        quality: DataQualityReport {
            sources: data.sources,
            join: view.report,
        },
    })
}

fn view_filter(args: &ViewArgs) -> Result<ViewFilter> {
    let date_range = match (args.start, args.end) {
        (None, None) => None,
        (start, end) => Some(DateRange {
            start: start.unwrap_or(NaiveDate::MIN),
            end: end.unwrap_or(NaiveDate::MAX),
        }),
    };

    let platforms = if args.platforms.is_empty() {
        None
    } else {
        let parsed: Vec<Platform> = args
            .platforms
            .iter()
            .map(|name| {
                Platform::try_from(name.as_str())
                    .map_err(|err| anyhow::anyhow!("invalid --platforms value: {err}"))
            })
            .collect::<Result<_>>()?;
        Some(parsed)
    };

    Ok(ViewFilter {
        date_range,
        platforms,
    })
}
