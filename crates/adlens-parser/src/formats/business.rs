use std::collections::HashSet;

use csv::ReaderBuilder;

use crate::errors::ParseError;
use crate::formats::{parse_count, parse_decimal, parse_row_date, require_column};
use crate::model::{BusinessRecord, CoercionPolicy, ParsedBusiness};

struct BusinessColumns {
    date: usize,
    orders: usize,
    new_orders: usize,
    new_customers: usize,
    total_revenue: usize,
    gross_profit: usize,
    cogs: usize,
}

impl BusinessColumns {
    fn resolve(source_name: &str, headers: &csv::StringRecord) -> Result<Self, ParseError> {
        Ok(Self {
            date: require_column(source_name, headers, &["date", "day"], "date")?,
            orders: require_column(source_name, headers, &["orders", "# of orders"], "orders")?,
            new_orders: require_column(
                source_name,
                headers,
                &["new_orders", "# of new orders", "new orders"],
                "new_orders",
            )?,
            new_customers: require_column(
                source_name,
                headers,
                &["new_customers", "new customers"],
                "new_customers",
            )?,
            total_revenue: require_column(
                source_name,
                headers,
                &["total_revenue", "total revenue", "revenue"],
                "total_revenue",
            )?,
            gross_profit: require_column(
                source_name,
                headers,
                &["gross_profit", "gross profit"],
                "gross_profit",
            )?,
            cogs: require_column(source_name, headers, &["cogs"], "cogs")?,
        })
    }
}

/// Parses the daily business export. The date is the table's unique key:
/// a repeated date rejects the later row rather than producing two output
/// rows for the same day.
pub fn parse_business_csv(
    source_name: &str,
    content: &str,
    policy: CoercionPolicy,
) -> Result<ParsedBusiness, ParseError> {
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

    let columns = BusinessColumns::resolve(source_name, &headers)?;

    let mut parsed = ParsedBusiness::default();
    let mut seen_dates = HashSet::new();
    for (row_index, record) in reader.records().enumerate() {
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
        if !seen_dates.insert(date) {
            parsed.rejects.record(line, format!("duplicate date {date}"));
            continue;
        }

        let numeric = (
            parse_count(field(columns.orders), "orders", policy),
            parse_count(field(columns.new_orders), "new_orders", policy),
            parse_count(field(columns.new_customers), "new_customers", policy),
            parse_decimal(field(columns.total_revenue), "total_revenue", policy, false),
            parse_decimal(field(columns.gross_profit), "gross_profit", policy, true),
            parse_decimal(field(columns.cogs), "cogs", policy, false),
        );

        match numeric {
            (
                Ok(orders),
                Ok(new_orders),
                Ok(new_customers),
                Ok(total_revenue),
                Ok(gross_profit),
                Ok(cogs),
            ) => parsed.records.push(BusinessRecord {
                date,
                orders,
                new_orders,
                new_customers,
                total_revenue,
                gross_profit,
                cogs,
            }),
            (orders, new_orders, new_customers, total_revenue, gross_profit, cogs) => {
                let reason = [
                    orders.err(),
                    new_orders.err(),
                    new_customers.err(),
                    total_revenue.err(),
                    gross_profit.err(),
                    cogs.err(),
                ]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join("; ");
                parsed.rejects.record(line, reason);
            }
        }
    }

    Ok(parsed)
}
