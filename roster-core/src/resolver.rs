//! Assignment resolution: which shift (if any) a person holds on a row

use crate::config::{RosterConfig, ShiftColumn};
use crate::schedule::ScheduleRow;
use crate::tokenizer::contains_person;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

pub const OFF_OR_LEAVE_LABEL: &str = "Off / Leave";
pub const NO_ASSIGNMENT_LABEL: &str = "No Assignment";

/// Resolved outcome for one person on one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Assignment {
    /// Listed in a shift column
    Shift { column: String, label: String },
    /// Listed only in an off or leave column
    OffOrLeave,
    /// Not listed anywhere on the row
    NoAssignment,
}

impl Assignment {
    /// Human-readable label
    pub fn label(&self) -> &str {
        match self {
            Assignment::Shift { label, .. } => label,
            Assignment::OffOrLeave => OFF_OR_LEAVE_LABEL,
            Assignment::NoAssignment => NO_ASSIGNMENT_LABEL,
        }
    }

    pub fn is_working(&self) -> bool {
        matches!(self, Assignment::Shift { .. })
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Read access to the raw cells of one schedule row
pub trait RowCells {
    fn cell(&self, column: &str) -> Option<&str>;
}

impl RowCells for ScheduleRow {
    fn cell(&self, column: &str) -> Option<&str> {
        self.get(column)
    }
}

impl RowCells for HashMap<String, String> {
    fn cell(&self, column: &str) -> Option<&str> {
        self.get(column).map(String::as_str)
    }
}

impl RowCells for HashMap<&str, &str> {
    fn cell(&self, column: &str) -> Option<&str> {
        self.get(column).copied()
    }
}

/// Resolve a person's assignment on a row.
///
/// Shift columns are checked in the given priority order and the first one
/// listing the person wins, even if later columns list them too. Only when
/// no shift column matches are the off columns consulted.
pub fn resolve<R: RowCells + ?Sized>(
    row: &R,
    person: &str,
    shift_columns: &[ShiftColumn],
    off_columns: &[String],
) -> Assignment {
    if let Some(column) = shift_columns
        .iter()
        .find(|column| contains_person(row.cell(&column.name), person))
    {
        return Assignment::Shift {
            column: column.name.clone(),
            label: column.display_label(),
        };
    }

    if off_columns
        .iter()
        .any(|column| contains_person(row.cell(column), person))
    {
        return Assignment::OffOrLeave;
    }

    Assignment::NoAssignment
}

/// The configured columns that actually exist in a table, in priority order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveColumns {
    pub shift: Vec<ShiftColumn>,
    pub off: Vec<String>,
}

impl ResolveColumns {
    pub fn from_headers(config: &RosterConfig, headers: &[String]) -> Self {
        let shift = present_shift_columns(config, headers);
        if shift.is_empty() {
            warn!(
                headers = ?headers,
                "none of the configured shift columns are present"
            );
        }
        Self {
            shift,
            off: present_off_columns(config, headers),
        }
    }

    pub fn resolve<R: RowCells + ?Sized>(&self, row: &R, person: &str) -> Assignment {
        resolve(row, person, &self.shift, &self.off)
    }
}

/// Configured shift columns found in `headers`, keeping configured order
pub fn present_shift_columns(config: &RosterConfig, headers: &[String]) -> Vec<ShiftColumn> {
    config
        .shift_columns
        .iter()
        .filter(|column| headers.iter().any(|h| *h == column.name))
        .cloned()
        .collect()
}

/// Configured off/leave columns found in `headers`, keeping configured order
pub fn present_off_columns(config: &RosterConfig, headers: &[String]) -> Vec<String> {
    config
        .off_columns
        .iter()
        .filter(|column| headers.contains(column))
        .cloned()
        .collect()
}
