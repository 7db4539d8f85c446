// crates/adlens-core/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("source '{name}' is missing or unreadable: {source}")]
    SourceMissing {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("source '{name}' produced no usable rows")]
    EmptyResult { name: String },

    #[error("parse error: {0}")]
    Parse(#[from] adlens_parser::ParseError),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
