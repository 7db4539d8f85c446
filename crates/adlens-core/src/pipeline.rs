use std::path::Path;

use tracing::{info, warn};

use adlens_parser::{parse_business_csv, parse_marketing_csv, RowRejects};

use crate::combine::JoinReport;
use crate::config::DatasetConfig;
use crate::error::{PipelineError, Result};
use crate::filter::{build_view, ViewFilter};
use crate::types::{
    AggregatedMarketingRow, BusinessRecord, CoercionPolicy, CombinedRow, MarketingRecord, Platform,
};

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub contents: String,
}

/// The raw inputs of one pipeline invocation: the business export plus one
/// marketing export per platform.
#[derive(Debug, Clone)]
pub struct SourceSet {
    pub business: SourceFile,
    pub marketing: Vec<(Platform, SourceFile)>,
}

impl SourceSet {
    /// Reads every configured source. Any absent or unreadable file is
    /// fatal to the invocation.
    pub fn load(config: &DatasetConfig) -> Result<Self> {
        let business = read_source(&config.business_path())?;
        let mut marketing = Vec::with_capacity(config.marketing_files.len());
        for source in &config.marketing_files {
            marketing.push((source.platform, read_source(&config.marketing_path(source))?));
        }
        Ok(Self {
            business,
            marketing,
        })
    }
}

fn read_source(path: &Path) -> Result<SourceFile> {
    let contents =
        std::fs::read_to_string(path).map_err(|source| PipelineError::SourceMissing {
            name: path.display().to_string(),
            source,
        })?;
    Ok(SourceFile {
        name: path.display().to_string(),
        contents,
    })
}

/// Per-source data-quality tallies, surfaced to the caller so the UI can
/// show a rejected-row note instead of silently dropping data.
#[derive(Debug, Clone)]
pub struct SourceQuality {
    pub name: String,
    pub platform: Option<Platform>,
    pub clean_rows: usize,
    pub rejects: RowRejects,
}

#[derive(Debug, Clone)]
pub struct DataQualityReport {
    pub sources: Vec<SourceQuality>,
    pub join: JoinReport,
}

impl DataQualityReport {
    pub fn rejected_rows(&self) -> usize {
        self.sources.iter().map(|s| s.rejects.count).sum()
    }
}

/// Clean typed records, ready for aggregation. Marketing rows from every
/// platform are concatenated; each carries its platform tag.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub business: Vec<BusinessRecord>,
    pub marketing: Vec<MarketingRecord>,
    pub sources: Vec<SourceQuality>,
}

pub fn load_sources(set: &SourceSet, policy: CoercionPolicy) -> Result<LoadedData> {
    let parsed_business = parse_business_csv(&set.business.name, &set.business.contents, policy)?;
    if !parsed_business.rejects.is_empty() {
        warn!(
            source = %set.business.name,
            rejected = parsed_business.rejects.count,
            "business rows rejected during parsing"
        );
    }
    if parsed_business.records.is_empty() {
        return Err(PipelineError::EmptyResult {
            name: set.business.name.clone(),
        });
    }

    let mut sources = vec![SourceQuality {
        name: set.business.name.clone(),
        platform: None,
        clean_rows: parsed_business.records.len(),
        rejects: parsed_business.rejects,
    }];

    let mut marketing: Vec<MarketingRecord> = Vec::new();
    for (platform, file) in &set.marketing {
        let parsed = parse_marketing_csv(&file.name, *platform, &file.contents, policy)?;
        if !parsed.rejects.is_empty() {
            warn!(
                source = %file.name,
                rejected = parsed.rejects.count,
                "marketing rows rejected during parsing"
            );
        }
        if parsed.records.is_empty() {
            // Non-fatal: the business calendar still renders, with this
            // platform contributing zeros.
            warn!(source = %file.name, "marketing source has no usable rows");
        }
        sources.push(SourceQuality {
            name: file.name.clone(),
            platform: Some(*platform),
            clean_rows: parsed.records.len(),
            rejects: parsed.rejects,
        });
        marketing.extend(parsed.records);
    }

    info!(
        business_rows = sources[0].clean_rows,
        marketing_rows = marketing.len(),
        "sources loaded"
    );

    Ok(LoadedData {
        business: parsed_business.records,
        marketing,
        sources,
    })
}

/// The full output of one invocation: the combined per-date table (ordered
/// by date ascending), the per-date-per-platform marketing table (ordered
/// by date then platform), and the data-quality report.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub combined: Vec<CombinedRow>,
    pub platform_daily: Vec<AggregatedMarketingRow>,
    pub quality: DataQualityReport,
}

pub fn run(set: &SourceSet, policy: CoercionPolicy) -> Result<PipelineOutput> {
    let data = load_sources(set, policy)?;
    let view = build_view(&data, &ViewFilter::default());
    Ok(PipelineOutput {
        combined: view.combined,
        platform_daily: view.platform_daily,
        quality: DataQualityReport {
            sources: data.sources,
            join: view.report,
        },
    })
}
