mod business;
mod common;
mod marketing;

pub use business::parse_business_csv;
pub use marketing::parse_marketing_csv;

pub(crate) use common::{
    parse_count, parse_decimal, parse_row_date, require_column, resolve_column,
};
