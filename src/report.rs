use std::{collections::BTreeMap, path::Path};

use tracing::info;

use crate::config::ReportConfig;
use crate::error::{LapError, Result};
use crate::model::{build_records, merge_roster, LapRecord};
use crate::parser::{read_roster, read_timestamp_log};
use crate::types::{LapTime, Order, ReportRow};

/// Lap records for one event plus the rules used to rank them.
pub struct RaceReport {
    config: ReportConfig,
    records: BTreeMap<String, LapRecord>,
}

impl RaceReport {
    pub fn new(records: BTreeMap<String, LapRecord>, config: ReportConfig) -> Self {
        Self { config, records }
    }

    /// Loads start/end logs and the roster from `folder`.
    ///
    /// Unreadable logs only shrink the report; an unreadable or malformed
    /// roster is returned as an error.
    pub fn from_folder(folder: &Path, config: ReportConfig) -> Result<Self> {
        let starts = read_timestamp_log(&folder.join(&config.start_log));
        let ends = read_timestamp_log(&folder.join(&config.end_log));
        let mut records = build_records(&starts, &ends);

        let roster = read_roster(&folder.join(&config.roster))?;
        merge_roster(&mut records, &roster);

        info!("built {} lap records from {}", records.len(), folder.display());
        Ok(Self::new(records, config))
    }

    pub fn records(&self) -> &BTreeMap<String, LapRecord> {
        &self.records
    }

    /// Driver codes in fastest-first order; undetermined laps last, ties by code.
    fn rank_ascending(&mut self) -> Vec<(LapTime, String)> {
        let mut ranked: Vec<(LapTime, String)> = self
            .records
            .values_mut()
            .map(|r| (r.lap_time(), r.driver_code.clone()))
            .collect();
        ranked.sort();
        ranked
    }

    /// Ranks every record. `Desc` reverses the determined laps only, so
    /// undetermined laps sort last in either order.
    pub fn rank_drivers(&mut self, order: Order) -> Vec<(LapTime, String)> {
        let mut ranked = self.rank_ascending();
        if order == Order::Desc {
            let determined = ranked.partition_point(|(lap, _)| lap.is_determined());
            ranked[..determined].reverse();
        }
        ranked
    }

    /// Builds the ranked rows. The driver at `cutoff_rank` in fastest-first
    /// order is marked dropped from qualification in both orders.
    pub fn build_report(&mut self, order: Order) -> Vec<ReportRow> {
        let cutoff_code = self
            .config
            .cutoff_rank
            .checked_sub(1)
            .and_then(|idx| self.rank_ascending().get(idx).map(|(_, code)| code.clone()));

        self.rank_drivers(order)
            .into_iter()
            .enumerate()
            .map(|(i, (lap_time, code))| {
                let record = &self.records[&code];
                let status = if cutoff_code.as_ref() == Some(&code) {
                    self.config.dropped_status.clone()
                } else {
                    String::new()
                };
                ReportRow {
                    rank: i + 1,
                    name: record.driver_name.clone(),
                    team: record.team.clone(),
                    lap_time,
                    status,
                }
            })
            .collect()
    }

    /// Renders one report row as a fixed-width text line.
    pub fn render_row(&self, row: &ReportRow) -> String {
        let line = format!(
            "{:>2}. {:<20} | {:<30} | {}",
            row.rank,
            row.name,
            row.team,
            row.lap_time.render(&self.config.undetermined_text)
        );
        if row.status.is_empty() {
            line
        } else {
            format!("{}  {}", line, row.status)
        }
    }

    /// Looks up a driver by exact full name.
    pub fn driver_info(&mut self, driver_name: &str) -> String {
        let placeholder = &self.config.undetermined_text;
        for record in self.records.values_mut() {
            if record.driver_name == driver_name {
                let lap = record.lap_time();
                return format!(
                    "{:<20} | {:<30} | {}",
                    record.driver_name,
                    record.team,
                    lap.render(placeholder)
                );
            }
        }
        format!("Driver {} not found.", driver_name)
    }

    /// Validation errors accumulated so far, paired with their driver code.
    pub fn validation_errors(&self) -> impl Iterator<Item = (&str, &LapError)> {
        self.records
            .values()
            .flat_map(|r| r.errors.iter().map(move |e| (r.driver_code.as_str(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeDelta};

    fn ts(ms: i64) -> crate::types::Timestamp {
        NaiveDate::from_ymd_opt(2018, 5, 24)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
            + TimeDelta::milliseconds(ms)
    }

    /// `n` finished drivers `D00`.. with lap times 60.000s, 60.100s, ...
    fn grid(n: usize) -> BTreeMap<String, LapRecord> {
        (0..n)
            .map(|i| {
                let code = format!("D{:02}", i);
                let mut rec = LapRecord::new(code.clone(), ts(0));
                rec.end_time = Some(ts(60_000 + 100 * i as i64));
                rec.driver_name = format!("Driver {}", i);
                rec.team = "Team".to_string();
                (code, rec)
            })
            .collect()
    }

    fn dropped(rows: &[ReportRow]) -> Vec<(usize, String)> {
        rows.iter()
            .filter(|r| !r.status.is_empty())
            .map(|r| (r.rank, r.name.clone()))
            .collect()
    }

    #[test]
    fn cutoff_marks_same_driver_in_both_orders() {
        let mut report = RaceReport::new(grid(20), ReportConfig::default());
        let asc = report.build_report(Order::Asc);
        let desc = report.build_report(Order::Desc);

        assert_eq!(dropped(&asc), vec![(16, "Driver 15".to_string())]);
        // 20 drivers: 15 rows sit after the cutoff driver in slowest-first order
        assert_eq!(dropped(&desc), vec![(20 - 15, "Driver 15".to_string())]);
        assert_eq!(desc[4].status, "DROPPED FROM QUALIFICATION");
    }

    #[test]
    fn cutoff_follows_driver_when_some_laps_are_undetermined() {
        let mut records = grid(20);
        for code in ["D17", "D18", "D19"] {
            records.get_mut(code).unwrap().end_time = None;
        }
        let mut report = RaceReport::new(records, ReportConfig::default());
        let asc = report.build_report(Order::Asc);
        let desc = report.build_report(Order::Desc);

        assert_eq!(dropped(&asc), vec![(16, "Driver 15".to_string())]);
        // 17 determined laps reversed: only Driver 16 is slower than the cutoff driver
        assert_eq!(dropped(&desc), vec![(2, "Driver 15".to_string())]);
        assert!(desc[17..].iter().all(|r| r.lap_time == LapTime::Undetermined));
    }

    #[test]
    fn no_cutoff_with_fewer_than_sixteen_drivers() {
        let mut report = RaceReport::new(grid(15), ReportConfig::default());
        assert!(dropped(&report.build_report(Order::Asc)).is_empty());
        assert!(dropped(&report.build_report(Order::Desc)).is_empty());
    }

    #[test]
    fn undetermined_laps_rank_last_in_both_orders() {
        let mut records = grid(3);
        records.get_mut("D01").unwrap().end_time = None;
        records.get_mut("D02").unwrap().end_time = Some(ts(-1));
        let mut report = RaceReport::new(records, ReportConfig::default());

        for order in [Order::Asc, Order::Desc] {
            let rows = report.build_report(order);
            assert_eq!(rows[0].name, "Driver 0");
            assert!(rows[1..].iter().all(|r| r.lap_time == LapTime::Undetermined));
            assert_eq!(
                report.render_row(&rows[2]),
                format!("{:>2}. {:<20} | {:<30} | lap time cannot be determined", 3, "Driver 2", "Team")
            );
        }
        // both orders queried each lap, still one message per bad record
        assert_eq!(report.validation_errors().count(), 2);
    }

    #[test]
    fn desc_reverses_determined_laps() {
        let mut report = RaceReport::new(grid(4), ReportConfig::default());
        let names: Vec<_> = report
            .build_report(Order::Desc)
            .into_iter()
            .map(|r| (r.rank, r.name))
            .collect();
        assert_eq!(
            names,
            vec![
                (1, "Driver 3".to_string()),
                (2, "Driver 2".to_string()),
                (3, "Driver 1".to_string()),
                (4, "Driver 0".to_string()),
            ]
        );
    }

    #[test]
    fn equal_laps_tie_break_on_driver_code() {
        let mut records = grid(3);
        for rec in records.values_mut() {
            rec.end_time = Some(ts(61_000));
        }
        let mut report = RaceReport::new(records, ReportConfig::default());
        let codes: Vec<_> = report.rank_drivers(Order::Asc).into_iter().map(|(_, c)| c).collect();
        assert_eq!(codes, vec!["D00", "D01", "D02"]);
    }

    #[test]
    fn custom_cutoff_rank() {
        let config = ReportConfig {
            cutoff_rank: 2,
            ..ReportConfig::default()
        };
        let mut report = RaceReport::new(grid(5), config);
        assert_eq!(dropped(&report.build_report(Order::Asc)), vec![(2, "Driver 1".to_string())]);
        assert_eq!(dropped(&report.build_report(Order::Desc)), vec![(4, "Driver 1".to_string())]);
    }

    #[test]
    fn driver_lookup_is_exact_match() {
        let mut report = RaceReport::new(grid(2), ReportConfig::default());
        assert_eq!(
            report.driver_info("Driver 1"),
            format!("{:<20} | {:<30} | 1:00.100", "Driver 1", "Team")
        );
        assert_eq!(report.driver_info("driver 1"), "Driver driver 1 not found.");
    }
}
