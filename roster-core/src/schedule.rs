//! Schedule model: dated rows of raw shift-cell text taken from a roster sheet

use crate::config::RosterConfig;
use crate::error::ScheduleError;
use crate::reader::{Sheet, Workbook};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

/// One calendar date and the raw text of each non-empty column on it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleRow {
    pub date: NaiveDate,
    pub cells: HashMap<String, String>,
}

impl ScheduleRow {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            cells: HashMap::new(),
        }
    }

    /// Builder-style cell setter
    pub fn with_cell(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.cells.insert(column.into(), value.into());
        self
    }

    /// Raw text for a column, `None` when the cell is empty
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }
}

/// A loaded roster table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    /// File name or label the schedule was loaded from
    pub source: String,
    /// Worksheet the rows were taken from
    pub sheet_name: String,
    /// Header of the date column (often "DATE/SHIFT")
    pub date_column: String,
    /// Remaining headers in sheet order
    pub columns: Vec<String>,
    /// Rows in sheet order
    pub rows: Vec<ScheduleRow>,
}

impl Schedule {
    /// Pick the roster sheet out of a workbook and read its dated rows.
    ///
    /// The roster sheet is the first one whose header row has a column
    /// starting with the configured date prefix. Rows whose date cell cannot
    /// be read as a date are dropped.
    pub fn from_workbook(
        workbook: &Workbook,
        config: &RosterConfig,
    ) -> Result<Self, ScheduleError> {
        for sheet in &workbook.sheets {
            let Some(header_row) = sheet.header_row() else {
                continue;
            };
            let headers = read_headers(sheet, header_row);
            let Some((date_col, date_column)) = headers
                .iter()
                .find(|(_, name)| config.is_date_header(name))
                .cloned()
            else {
                debug!(sheet = %sheet.name, "no date column, skipping sheet");
                continue;
            };

            let schedule = Self::from_sheet(
                &workbook.source,
                sheet,
                header_row,
                &headers,
                date_col,
                date_column,
            );
            let Some((first, last)) = schedule.date_range() else {
                return Err(ScheduleError::EmptySheet(sheet.name.clone()));
            };
            info!(
                source = %schedule.source,
                sheet = %schedule.sheet_name,
                rows = schedule.rows.len(),
                %first,
                %last,
                "loaded schedule"
            );
            return Ok(schedule);
        }

        Err(ScheduleError::NoDateSheet {
            prefix: config.date_column_prefix.trim().to_uppercase(),
        })
    }

    fn from_sheet(
        source: &str,
        sheet: &Sheet,
        header_row: u32,
        headers: &[(u32, String)],
        date_col: u32,
        date_column: String,
    ) -> Self {
        let mut rows = Vec::new();

        for row in sheet.row_indices().into_iter().filter(|r| *r > header_row) {
            let Some(date) = sheet.value(row, date_col).to_date() else {
                debug!(sheet = %sheet.name, row = row + 1, "dropping row without a valid date");
                continue;
            };

            let mut schedule_row = ScheduleRow::new(date);
            for (col, name) in headers.iter().filter(|(col, _)| *col != date_col) {
                if let Some(text) = sheet.value(row, *col).to_text() {
                    // Duplicate headers keep the leftmost column
                    schedule_row.cells.entry(name.clone()).or_insert(text);
                }
            }
            rows.push(schedule_row);
        }

        Self {
            source: source.to_string(),
            sheet_name: sheet.name.clone(),
            date_column,
            columns: headers
                .iter()
                .filter(|(col, _)| *col != date_col)
                .map(|(_, name)| name.clone())
                .collect(),
            rows,
        }
    }

    /// First row for a date; later duplicates are ignored
    pub fn row_for(&self, date: NaiveDate) -> Option<&ScheduleRow> {
        self.rows.iter().find(|row| row.date == date)
    }

    /// Earliest and latest dates in the schedule
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.rows.iter().map(|r| r.date).min()?;
        let max = self.rows.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// Rows dated within `[start, end]`, sorted by date
    pub fn rows_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<&ScheduleRow> {
        let mut rows: Vec<_> = self
            .rows
            .iter()
            .filter(|row| row.date >= start && row.date <= end)
            .collect();
        // Stable sort keeps same-date rows in sheet order
        rows.sort_by_key(|row| row.date);
        rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Trimmed, non-empty header names of a row, in column order
fn read_headers(sheet: &Sheet, header_row: u32) -> Vec<(u32, String)> {
    let mut headers: Vec<(u32, String)> = sheet
        .cells_in_row(header_row)
        .filter_map(|cell| {
            let name = cell.value.to_text()?.trim().to_string();
            (!name.is_empty()).then_some((cell.col, name))
        })
        .collect();
    headers.sort_by_key(|(col, _)| *col);
    headers
}
