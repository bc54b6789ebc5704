use serde::Deserialize;
use std::{fs, path::Path};

use crate::error::{ReportError, Result};

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
    pub start_log: String,
    pub end_log: String,
    pub roster: String,
    /// 1-based rank (in fastest-first order) marked as dropped from qualification.
    pub cutoff_rank: usize,
    pub dropped_status: String,
    pub undetermined_text: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            start_log: "start.log".to_string(),
            end_log: "end.log".to_string(),
            roster: "abbreviations.txt".to_string(),
            cutoff_rank: 16,
            dropped_status: crate::DROPPED_STATUS.to_string(),
            undetermined_text: crate::UNDETERMINED_TEXT.to_string(),
        }
    }
}

impl ReportConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ReportError::Config {
            path: path.to_path_buf(),
            source,
        })
    }
}
