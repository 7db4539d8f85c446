use std::fmt;

use thiserror::Error;

/// Cap on how many per-row rejection reasons are retained verbatim. The
/// count keeps growing past the cap; only the samples stop.
const MAX_REJECT_SAMPLES: usize = 8;

#[derive(Debug, Clone)]
pub struct RowReject {
    pub line: usize,
    pub reason: String,
}

impl RowReject {
    pub fn new(line: usize, reason: impl Into<String>) -> Self {
        Self {
            line,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RowReject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// Tally of rows excluded during parsing. Rejection is row-local recovery,
/// never a source-level failure.
#[derive(Debug, Clone, Default)]
pub struct RowRejects {
    pub count: usize,
    pub samples: Vec<RowReject>,
}

impl RowRejects {
    pub fn record(&mut self, line: usize, reason: impl Into<String>) {
        self.count += 1;
        if self.samples.len() < MAX_REJECT_SAMPLES {
            self.samples.push(RowReject::new(line, reason));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{source_name} has no header row")]
    MissingHeader { source_name: String },

    #[error("{source_name} is missing required column '{column}'")]
    MissingColumn {
        source_name: String,
        column: &'static str,
    },

    #[error("{source_name} CSV error: {source}")]
    Csv {
        source_name: String,
        #[source]
        source: csv::Error,
    },
}
