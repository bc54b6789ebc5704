use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A line rejected while reading with `skip_invalid_lines` off.
    #[error("{}:{line_no}: {reason} in {line:?}", path.display())]
    MalformedLine {
        path: PathBuf,
        line_no: usize,
        line: String,
        reason: String,
    },

    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Validation failure recorded on a lap record. Never aborts a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LapError {
    #[error("no finish time for driver {driver}")]
    MissingFinish { driver: String },
    #[error("finish time precedes start time for driver {driver}")]
    FinishBeforeStart { driver: String },
}

impl LapError {
    /// True when both errors report the same failure, whatever driver label they carry.
    pub fn same_kind(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
