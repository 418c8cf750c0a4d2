//! Output formatters for assignment reports

use crate::OutputFormat;
use anyhow::Result;
use chrono::NaiveDate;
use colored::*;
use roster_core::{Assignment, DayOutcome, Roster, WeekView};
use serde::Serialize;
use std::io::Write;

/// Everything printed for one lookup
#[derive(Debug, Serialize)]
pub struct Report {
    pub person: String,
    pub source: String,
    pub sheet: String,
    pub days: Vec<ReportDay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<ReportWeek>,
}

#[derive(Debug, Serialize)]
pub struct ReportDay {
    pub date: NaiveDate,
    pub label: String,
    pub outcome: DayOutcome,
}

#[derive(Debug, Serialize)]
pub struct ReportWeek {
    pub monday: NaiveDate,
    pub sunday: NaiveDate,
    pub days: Vec<ReportWeekDay>,
}

#[derive(Debug, Serialize)]
pub struct ReportWeekDay {
    pub date: NaiveDate,
    pub label: String,
    pub assignment: Assignment,
}

impl Report {
    pub fn build(
        roster: &Roster,
        person: &str,
        date: NaiveDate,
        with_week: bool,
        source: &str,
    ) -> Self {
        let days = roster
            .assignments(person, date)
            .into_iter()
            .map(|day| ReportDay {
                date: day.date,
                label: day.outcome.label().to_string(),
                outcome: day.outcome,
            })
            .collect();

        Self {
            person: person.to_string(),
            source: source.to_string(),
            sheet: roster.schedule().sheet_name.clone(),
            days,
            week: with_week.then(|| ReportWeek::from(roster.week(person, date))),
        }
    }
}

impl From<WeekView> for ReportWeek {
    fn from(week: WeekView) -> Self {
        Self {
            monday: week.monday,
            sunday: week.sunday,
            days: week
                .days
                .into_iter()
                .map(|day| ReportWeekDay {
                    date: day.date,
                    label: day.assignment.label().to_string(),
                    assignment: day.assignment,
                })
                .collect(),
        }
    }
}

/// Write a report in the requested format
pub fn write_report<W: Write>(out: &mut W, report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Human => write_human(out, report)?,
        OutputFormat::Json => write_json(out, report)?,
    }
    Ok(())
}

/// Write a report with colors
pub fn write_human<W: Write>(out: &mut W, report: &Report) -> std::io::Result<()> {
    writeln!(out, "{}", format!("Assignments for {}", report.person).bold())?;
    for day in &report.days {
        writeln!(
            out,
            "  {} → {}",
            day.date.format("%Y-%m-%d").to_string().bold(),
            paint_outcome(&day.outcome)
        )?;
    }

    if let Some(week) = &report.week {
        writeln!(out)?;
        writeln!(
            out,
            "{}",
            format!(
                "Week of {} – {}",
                week.monday.format("%Y-%m-%d"),
                week.sunday.format("%Y-%m-%d")
            )
            .bold()
            .underline()
        )?;
        if week.days.is_empty() {
            writeln!(out, "  {}", "No scheduled dates this week".bright_black())?;
        }
        for day in &week.days {
            writeln!(
                out,
                "  {} {}  {}",
                day.date.format("%a").to_string().bright_black(),
                day.date.format("%Y-%m-%d"),
                paint_assignment(&day.assignment)
            )?;
        }
    }

    writeln!(out)?;
    writeln!(
        out,
        "{}",
        format!("Source file: {} (sheet '{}')", report.source, report.sheet).bright_black()
    )
}

fn paint_outcome(outcome: &DayOutcome) -> ColoredString {
    match outcome {
        DayOutcome::Assigned { assignment } => paint_assignment(assignment),
        DayOutcome::NoData => outcome.label().red(),
    }
}

fn paint_assignment(assignment: &Assignment) -> ColoredString {
    match assignment {
        Assignment::Shift { label, .. } => label.as_str().green().bold(),
        Assignment::OffOrLeave => assignment.label().yellow(),
        Assignment::NoAssignment => assignment.label().bright_black(),
    }
}

/// Write a report as JSON
pub fn write_json<W: Write>(out: &mut W, report: &Report) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}
