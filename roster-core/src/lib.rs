//! roster-core: shift assignment lookups over spreadsheet rosters
//!
//! Roster cells are loosely typed ("ST/VB", "RR-LW"). This library tokenizes
//! them into person codes and resolves, per date, which shift a person holds.

pub mod cache;
pub mod config;
pub mod error;
pub mod lookup;
pub mod reader;
pub mod resolver;
pub mod schedule;
pub mod tokenizer;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;
use std::sync::Arc;

pub use cache::ScheduleCache;
pub use config::{RosterConfig, ShiftColumn};
pub use error::{ConfigError, ScheduleError};
pub use lookup::{DayAssignment, DayOutcome, WeekDay, WeekView};
pub use resolver::{Assignment, ResolveColumns, RowCells, resolve};
pub use schedule::{Schedule, ScheduleRow};
pub use tokenizer::tokenize;

/// Main lookup interface: a loaded schedule plus the columns to resolve against
#[derive(Debug, Clone)]
pub struct Roster {
    config: RosterConfig,
    schedule: Arc<Schedule>,
    columns: ResolveColumns,
}

impl Roster {
    /// Build a roster over an already loaded schedule
    pub fn new(config: RosterConfig, schedule: Arc<Schedule>) -> Self {
        let columns = ResolveColumns::from_headers(&config, &schedule.columns);
        Self {
            config,
            schedule,
            columns,
        }
    }

    /// Load a roster file
    pub fn open<P: AsRef<Path>>(path: P, config: RosterConfig) -> Result<Self> {
        let path = path.as_ref();
        let workbook = reader::read_workbook(path)?;
        let schedule = Schedule::from_workbook(&workbook, &config)
            .with_context(|| format!("Could not read the roster in {}", path.display()))?;
        Ok(Self::new(config, Arc::new(schedule)))
    }

    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn columns(&self) -> &ResolveColumns {
        &self.columns
    }

    /// Outcomes for `date` and the following day
    pub fn assignments(&self, person: &str, date: NaiveDate) -> [DayAssignment; 2] {
        lookup::assignments_for_dates(&self.schedule, person, date, &self.columns)
    }

    pub fn day(&self, person: &str, date: NaiveDate) -> DayOutcome {
        lookup::day_outcome(&self.schedule, person, date, &self.columns)
    }

    /// Monday-to-Sunday view around `date`
    pub fn week(&self, person: &str, date: NaiveDate) -> WeekView {
        lookup::week_of(&self.schedule, person, date, &self.columns)
    }

    pub fn default_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        lookup::default_date(&self.schedule, today)
    }

    pub fn clamp_date(&self, date: NaiveDate) -> Option<NaiveDate> {
        lookup::clamp_to_range(&self.schedule, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_resolves_against_present_columns() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let schedule = Schedule {
            source: "feb.xlsx".to_string(),
            sheet_name: "Feb".to_string(),
            date_column: "DATE".to_string(),
            columns: vec!["2nd".to_string(), "Off".to_string()],
            rows: vec![ScheduleRow::new(date).with_cell("2nd", "AH").with_cell("Off", "ST")],
        };
        let roster = Roster::new(RosterConfig::default(), Arc::new(schedule));

        assert_eq!(roster.columns().shift.len(), 1);
        assert_eq!(roster.day("AH", date).label(), "2nd Shift");
        assert_eq!(roster.day("ST", date).label(), "Off / Leave");

        let [today, tomorrow] = roster.assignments("AH", date);
        assert_eq!(today.outcome.label(), "2nd Shift");
        assert_eq!(tomorrow.outcome, DayOutcome::NoData);
        assert_eq!(roster.week("AH", date).days.len(), 1);
        assert_eq!(roster.default_date(date), Some(date));
    }
}
