use std::{collections::HashMap, fs, path::Path, sync::LazyLock};

use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{ReportError, Result};
use crate::types::{DriverInfo, Timestamp};

/// `<CODE><YYYY-MM-DD_HH:MM:SS.mmm>`, anchored at the start of the line only.
static LOG_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Z]{3})(\d{4}-\d{2}-\d{2}_\d{2}:\d{2}:\d{2}\.\d{3})")
        .expect("log line regex is valid")
});

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H:%M:%S%.3f";

/// How a keyed line file treats lines it cannot parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Skip bad lines when true; fail the whole read on the first one when false.
    pub skip_invalid_lines: bool,
}

impl ParseOptions {
    /// Timing logs: noise lines are ignored.
    pub const LENIENT: Self = Self { skip_invalid_lines: true };
    /// Roster: one bad line rejects the file.
    pub const STRICT: Self = Self { skip_invalid_lines: false };
}

/// Reads `path` line by line into a map keyed by driver code.
/// Blank lines are ignored in both modes; a repeated key keeps its last value.
pub fn read_keyed<T, F>(path: &Path, opts: ParseOptions, mut parse_line: F) -> Result<HashMap<String, T>>
where
    F: FnMut(&str) -> std::result::Result<(String, T), String>,
{
    let text = fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut out = HashMap::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok((key, value)) => {
                out.insert(key, value);
            }
            Err(reason) if opts.skip_invalid_lines => {
                debug!("{}:{}: skipping line ({})", path.display(), idx + 1, reason);
            }
            Err(reason) => {
                return Err(ReportError::MalformedLine {
                    path: path.to_path_buf(),
                    line_no: idx + 1,
                    line: line.to_string(),
                    reason,
                });
            }
        }
    }
    Ok(out)
}

fn parse_log_line(line: &str) -> std::result::Result<(String, Timestamp), String> {
    let caps = LOG_LINE_REGEX
        .captures(line)
        .ok_or_else(|| "not a timing line".to_string())?;
    let ts = Timestamp::parse_from_str(&caps[2], TIMESTAMP_FORMAT)
        .map_err(|e| format!("bad timestamp {}: {}", &caps[2], e))?;
    Ok((caps[1].to_string(), ts))
}

fn parse_roster_line(line: &str) -> std::result::Result<(String, DriverInfo), String> {
    let fields: Vec<&str> = line.split('_').collect();
    match fields.as_slice() {
        [code, name, team] => Ok((
            code.to_string(),
            DriverInfo {
                name: name.to_string(),
                team: team.to_string(),
            },
        )),
        _ => Err(format!("expected 3 underscore-separated fields, got {}", fields.len())),
    }
}

/// Reads a `start.log`/`end.log` style file into code -> timestamp.
///
/// An unreadable file is logged and yields an empty map so the run can
/// continue with whatever else is available.
pub fn read_timestamp_log(path: &Path) -> HashMap<String, Timestamp> {
    match read_keyed(path, ParseOptions::LENIENT, parse_log_line) {
        Ok(map) => {
            info!("read {} timestamps from {}", map.len(), path.display());
            map
        }
        Err(e) => {
            warn!("{}", e);
            HashMap::new()
        }
    }
}

/// Reads `abbreviations.txt` into code -> (name, team). Any malformed line fails the load.
pub fn read_roster(path: &Path) -> Result<HashMap<String, DriverInfo>> {
    let roster = read_keyed(path, ParseOptions::STRICT, parse_roster_line)?;
    info!("read {} roster entries from {}", roster.len(), path.display());
    Ok(roster)
}
