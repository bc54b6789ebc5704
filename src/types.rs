use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize, Serializer};

/// Millisecond-precision point in time read from `start.log` / `end.log`.
pub type Timestamp = NaiveDateTime;

/// Requested report order. `Asc` lists the fastest lap first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

/// Result of evaluating a lap. Every determined time orders before `Undetermined`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LapTime {
    Determined(TimeDelta),
    Undetermined,
}

impl LapTime {
    pub fn is_determined(&self) -> bool {
        matches!(self, LapTime::Determined(_))
    }

    /// Renders the lap as `M:SS.mmm`, or `placeholder` when undetermined.
    pub fn render(&self, placeholder: &str) -> String {
        match self {
            LapTime::Determined(d) => {
                let ms = d.num_milliseconds();
                format!("{}:{:02}.{:03}", ms / 60_000, (ms % 60_000) / 1_000, ms % 1_000)
            }
            LapTime::Undetermined => placeholder.to_string(),
        }
    }
}

// Determined laps go out as integer milliseconds, undetermined as null.
impl Serialize for LapTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            LapTime::Determined(d) => serializer.serialize_i64(d.num_milliseconds()),
            LapTime::Undetermined => serializer.serialize_none(),
        }
    }
}

/// Roster entry: full driver name and team for one driver code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DriverInfo {
    pub name: String,
    pub team: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub rank: usize,
    pub name: String,
    pub team: String,
    pub lap_time: LapTime,
    pub status: String,
}
