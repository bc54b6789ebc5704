//! Qualification report for a race event: joins start/end timing logs with
//! the driver roster, ranks laps and marks the qualification cutoff.

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod report;
pub mod types;

pub use config::ReportConfig;
pub use error::{LapError, ReportError, Result};
pub use model::LapRecord;
pub use report::RaceReport;
pub use types::{DriverInfo, LapTime, Order, ReportRow, Timestamp};

pub const DROPPED_STATUS: &str = "DROPPED FROM QUALIFICATION";
pub const UNDETERMINED_TEXT: &str = "lap time cannot be determined";
