use chrono::NaiveDate;
use csv::StringRecord;

use crate::errors::ParseError;
use crate::model::CoercionPolicy;

/// Accepted textual date formats, tried in order. ISO first, then the
/// locale variants seen in real platform exports.
static DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m/%d/%y",
    "%d-%m-%Y",
    "%b %d, %Y",
];

pub(crate) fn parse_row_date(value: &str) -> Result<NaiveDate, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("missing date".to_string());
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, fmt) {
            return Ok(date);
        }
    }
    Err(format!("invalid date '{trimmed}'"))
}

/// Finds a header column by any of its accepted spellings. Matching is
/// case-insensitive and ignores surrounding whitespace.
pub(crate) fn resolve_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let header = header.trim();
        aliases
            .iter()
            .any(|alias| header.eq_ignore_ascii_case(alias))
    })
}

pub(crate) fn require_column(
    source_name: &str,
    headers: &StringRecord,
    aliases: &[&str],
    canonical: &'static str,
) -> Result<usize, ParseError> {
    resolve_column(headers, aliases).ok_or_else(|| ParseError::MissingColumn {
        source_name: source_name.to_string(),
        column: canonical,
    })
}

fn blank_or_na(trimmed: &str) -> bool {
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("na") || trimmed.eq_ignore_ascii_case("nan")
}

/// Parses a non-negative integer counter. Exports sometimes carry counters
/// as decimal text ("1200.0"), so a whole-valued float is accepted.
pub(crate) fn parse_count(
    value: &str,
    column: &'static str,
    policy: CoercionPolicy,
) -> Result<u64, String> {
    let trimmed = value.trim();
    if blank_or_na(trimmed) {
        return match policy {
            CoercionPolicy::CoerceToZero => Ok(0),
            CoercionPolicy::Reject => Err(format!("missing value for '{column}'")),
        };
    }

    if let Ok(parsed) = trimmed.parse::<u64>() {
        return Ok(parsed);
    }

    match trimmed.replace(',', "").parse::<f64>() {
        Ok(parsed) if parsed >= 0.0 && parsed.fract() == 0.0 => Ok(parsed as u64),
        Ok(parsed) if parsed < 0.0 => Err(format!("negative value {parsed} for '{column}'")),
        Ok(parsed) => Err(format!("non-integer value {parsed} for '{column}'")),
        Err(_) => match policy {
            CoercionPolicy::CoerceToZero => Ok(0),
            CoercionPolicy::Reject => Err(format!("non-numeric value '{trimmed}' for '{column}'")),
        },
    }
}

/// Parses a decimal currency field. Leading currency symbols and thousands
/// separators are stripped before parsing.
pub(crate) fn parse_decimal(
    value: &str,
    column: &'static str,
    policy: CoercionPolicy,
    allow_negative: bool,
) -> Result<f64, String> {
    let trimmed = value.trim();
    if blank_or_na(trimmed) {
        return match policy {
            CoercionPolicy::CoerceToZero => Ok(0.0),
            CoercionPolicy::Reject => Err(format!("missing value for '{column}'")),
        };
    }

    let cleaned = trimmed.trim_start_matches('$').replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(parsed) if !parsed.is_finite() => {
            Err(format!("non-finite value '{trimmed}' for '{column}'"))
        }
        Ok(parsed) if parsed < 0.0 && !allow_negative => {
            Err(format!("negative value {parsed} for '{column}'"))
        }
        Ok(parsed) => Ok(parsed),
        Err(_) => match policy {
            CoercionPolicy::CoerceToZero => Ok(0.0),
            CoercionPolicy::Reject => Err(format!("non-numeric value '{trimmed}' for '{column}'")),
        },
    }
}
