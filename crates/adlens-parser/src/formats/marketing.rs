use csv::ReaderBuilder;

use crate::errors::ParseError;
use crate::formats::{parse_count, parse_decimal, parse_row_date, require_column, resolve_column};
use crate::model::{CoercionPolicy, MarketingRecord, ParsedMarketing, Platform};

struct MarketingColumns {
    date: usize,
    impressions: usize,
    clicks: usize,
    spend: usize,
    attributed_revenue: usize,
    tactic: Option<usize>,
    state: Option<usize>,
    campaign: Option<usize>,
}

impl MarketingColumns {
    fn resolve(source_name: &str, headers: &csv::StringRecord) -> Result<Self, ParseError> {
        Ok(Self {
            date: require_column(source_name, headers, &["date", "day"], "date")?,
            impressions: require_column(
                source_name,
                headers,
                &["impressions", "impression"],
                "impressions",
            )?,
            clicks: require_column(source_name, headers, &["clicks", "click"], "clicks")?,
            spend: require_column(source_name, headers, &["spend", "cost"], "spend")?,
            attributed_revenue: require_column(
                source_name,
                headers,
                &["attributed_revenue", "attributed revenue"],
                "attributed_revenue",
            )?,
            tactic: resolve_column(headers, &["tactic"]),
            state: resolve_column(headers, &["state", "region"]),
            campaign: resolve_column(headers, &["campaign", "campaign name", "campaign_name"]),
        })
    }
}

/// Parses one advertising platform's export. Rows with an unparseable date
/// are rejected and tallied; numeric gaps follow the coercion policy. An
/// empty source yields an empty record set, not an error: the business
/// calendar drives the output, so fatality is the pipeline's call.
pub fn parse_marketing_csv(
    source_name: &str,
    platform: Platform,
    content: &str,
    policy: CoercionPolicy,
) -> Result<ParsedMarketing, ParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|source| ParseError::Csv {
            source_name: source_name.to_string(),
            source,
        })?
        .clone();
    if headers.is_empty() || (headers.len() == 1 && headers.get(0) == Some("")) {
        return Err(ParseError::MissingHeader {
            source_name: source_name.to_string(),
        });
    }

    let columns = MarketingColumns::resolve(source_name, &headers)?;

    let mut parsed = ParsedMarketing::default();
    for (row_index, record) in reader.records().enumerate() {
        // 1-based data line, counting the header as line 1.
        let line = row_index + 2;
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                parsed.rejects.record(line, err.to_string());
                continue;
            }
        };

        let field = |index: usize| record.get(index).unwrap_or_default();

        let date = match parse_row_date(field(columns.date)) {
            Ok(date) => date,
            Err(reason) => {
                parsed.rejects.record(line, reason);
                continue;
            }
        };

        let numeric = (
            parse_count(field(columns.impressions), "impressions", policy),
            parse_count(field(columns.clicks), "clicks", policy),
            parse_decimal(field(columns.spend), "spend", policy, false),
            parse_decimal(
                field(columns.attributed_revenue),
                "attributed_revenue",
                policy,
                false,
            ),
        );

        let (impressions, clicks, spend, attributed_revenue) = match numeric {
            (Ok(impressions), Ok(clicks), Ok(spend), Ok(attributed_revenue)) => {
                (impressions, clicks, spend, attributed_revenue)
            }
            (impressions, clicks, spend, attributed_revenue) => {
                let reason = [
                    impressions.err(),
                    clicks.err(),
                    spend.err(),
                    attributed_revenue.err(),
                ]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join("; ");
                parsed.rejects.record(line, reason);
                continue;
            }
        };

        let text = |index: Option<usize>| {
            index
                .and_then(|idx| record.get(idx))
                .map(str::trim)
                .unwrap_or_default()
                .to_string()
        };

        parsed.records.push(MarketingRecord {
            date,
            platform,
            tactic: text(columns.tactic),
            state: text(columns.state),
            campaign: text(columns.campaign),
            impressions,
            clicks,
            spend,
            attributed_revenue,
        });
    }

    Ok(parsed)
}
