use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use crate::error::LapError;
use crate::types::{DriverInfo, LapTime, Timestamp};

/// One driver's lap, keyed by the 3-letter driver code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LapRecord {
    pub driver_code: String,
    pub start_time: Timestamp,
    pub end_time: Option<Timestamp>,
    pub driver_name: String,
    pub team: String,
    pub errors: Vec<LapError>,
}

impl LapRecord {
    pub fn new(driver_code: impl Into<String>, start_time: Timestamp) -> Self {
        Self {
            driver_code: driver_code.into(),
            start_time,
            end_time: None,
            driver_name: String::new(),
            team: String::new(),
            errors: Vec::new(),
        }
    }

    fn label(&self) -> String {
        if self.driver_name.is_empty() {
            self.driver_code.clone()
        } else {
            format!("{} ({})", self.driver_code, self.driver_name)
        }
    }

    /// Pure lap evaluation: the lap time plus the validation error, if any.
    pub fn evaluate(&self) -> (LapTime, Option<LapError>) {
        match self.end_time {
            None => (
                LapTime::Undetermined,
                Some(LapError::MissingFinish { driver: self.label() }),
            ),
            Some(end) if end < self.start_time => (
                LapTime::Undetermined,
                Some(LapError::FinishBeforeStart { driver: self.label() }),
            ),
            Some(end) => (LapTime::Determined(end - self.start_time), None),
        }
    }

    /// Evaluates the lap and records its validation error in `errors`.
    ///
    /// An error of a kind already recorded is not appended again, so repeated
    /// queries leave `errors` unchanged even if the roster was merged in between.
    pub fn lap_time(&mut self) -> LapTime {
        let (lap, error) = self.evaluate();
        if let Some(err) = error {
            if !self.errors.iter().any(|e| e.same_kind(&err)) {
                debug!("{}", err);
                self.errors.push(err);
            }
        }
        lap
    }
}

/// One record per code in `starts`; codes only present in `ends` are dropped.
pub fn build_records(
    starts: &HashMap<String, Timestamp>,
    ends: &HashMap<String, Timestamp>,
) -> BTreeMap<String, LapRecord> {
    starts
        .iter()
        .map(|(code, start)| {
            let mut record = LapRecord::new(code.clone(), *start);
            record.end_time = ends.get(code).copied();
            (code.clone(), record)
        })
        .collect()
}

/// Fills name/team for records present in the roster. Roster entries for
/// unknown codes are ignored; records missing from the roster stay blank.
pub fn merge_roster(records: &mut BTreeMap<String, LapRecord>, roster: &HashMap<String, DriverInfo>) {
    for (code, record) in records.iter_mut() {
        if let Some(info) = roster.get(code) {
            record.driver_name = info.name.clone();
            record.team = info.team.clone();
        }
    }
}
