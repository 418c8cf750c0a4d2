//! Date-level lookups built on the resolver: day pairs, weeks and default dates

use crate::resolver::{Assignment, ResolveColumns};
use crate::schedule::Schedule;
use chrono::{NaiveDate, Weekday};
use serde::Serialize;
use std::fmt;

pub const NO_DATA_LABEL: &str = "No data for this date";

/// What a lookup reports for a single date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DayOutcome {
    Assigned { assignment: Assignment },
    /// The schedule has no row for the date
    NoData,
}

impl DayOutcome {
    pub fn label(&self) -> &str {
        match self {
            DayOutcome::Assigned { assignment } => assignment.label(),
            DayOutcome::NoData => NO_DATA_LABEL,
        }
    }

    pub fn assignment(&self) -> Option<&Assignment> {
        match self {
            DayOutcome::Assigned { assignment } => Some(assignment),
            DayOutcome::NoData => None,
        }
    }
}

impl fmt::Display for DayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayAssignment {
    pub date: NaiveDate,
    pub outcome: DayOutcome,
}

/// Outcome for a person on one date
pub fn day_outcome(
    schedule: &Schedule,
    person: &str,
    date: NaiveDate,
    columns: &ResolveColumns,
) -> DayOutcome {
    match schedule.row_for(date) {
        Some(row) => DayOutcome::Assigned {
            assignment: columns.resolve(row, person),
        },
        None => DayOutcome::NoData,
    }
}

/// Outcomes for `base_date` and the day after it
pub fn assignments_for_dates(
    schedule: &Schedule,
    person: &str,
    base_date: NaiveDate,
    columns: &ResolveColumns,
) -> [DayAssignment; 2] {
    let next = base_date.succ_opt();
    let tomorrow = DayAssignment {
        date: next.unwrap_or(base_date),
        outcome: match next {
            Some(date) => day_outcome(schedule, person, date, columns),
            None => DayOutcome::NoData,
        },
    };

    [
        DayAssignment {
            date: base_date,
            outcome: day_outcome(schedule, person, base_date, columns),
        },
        tomorrow,
    ]
}

/// One dated row of the weekly view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekDay {
    pub date: NaiveDate,
    pub assignment: Assignment,
}

/// Monday-to-Sunday view for one person
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekView {
    pub monday: NaiveDate,
    pub sunday: NaiveDate,
    /// Only dates present in the schedule, sorted
    pub days: Vec<WeekDay>,
}

/// Monday and Sunday of the week containing `date`
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let week = date.week(Weekday::Mon);
    (week.first_day(), week.last_day())
}

pub fn week_of(
    schedule: &Schedule,
    person: &str,
    date: NaiveDate,
    columns: &ResolveColumns,
) -> WeekView {
    let (monday, sunday) = week_bounds(date);
    let days = schedule
        .rows_between(monday, sunday)
        .into_iter()
        .map(|row| WeekDay {
            date: row.date,
            assignment: columns.resolve(row, person),
        })
        .collect();

    WeekView {
        monday,
        sunday,
        days,
    }
}

/// `today` when the schedule covers it, otherwise the earliest scheduled date
pub fn default_date(schedule: &Schedule, today: NaiveDate) -> Option<NaiveDate> {
    let (min, max) = schedule.date_range()?;
    if min <= today && today <= max {
        Some(today)
    } else {
        Some(min)
    }
}

/// Pull a requested date into the schedule's date range
pub fn clamp_to_range(schedule: &Schedule, date: NaiveDate) -> Option<NaiveDate> {
    let (min, max) = schedule.date_range()?;
    Some(date.clamp(min, max))
}
