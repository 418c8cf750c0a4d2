//! Workbook data structures

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{BTreeSet, HashMap};

use super::dates;

/// Represents a complete workbook
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    /// File name or other label the workbook was read from
    pub source: String,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Get all sheet names
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Represents a worksheet
#[derive(Debug, Clone, Default)]
pub struct Sheet {
    pub name: String,
    pub cells: HashMap<(u32, u32), Cell>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: HashMap::new(),
        }
    }

    /// Insert a value; empty values are not stored
    pub fn set_value(&mut self, row: u32, col: u32, value: CellValue) {
        if value.is_empty() {
            return;
        }
        self.cells.insert((row, col), Cell { row, col, value });
    }

    /// Get a cell at the given position
    pub fn get_cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Get the value at the given position, `Empty` if absent
    pub fn value(&self, row: u32, col: u32) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.get_cell(row, col).map(|c| &c.value).unwrap_or(&EMPTY)
    }

    /// Get cells in a specific row
    pub fn cells_in_row(&self, row: u32) -> impl Iterator<Item = &Cell> {
        self.cells.values().filter(move |c| c.row == row)
    }

    /// Indices of rows holding at least one value, ascending
    pub fn row_indices(&self) -> Vec<u32> {
        self.cells
            .keys()
            .map(|(row, _)| *row)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// The first non-empty row, used as the header row
    pub fn header_row(&self) -> Option<u32> {
        self.cells.keys().map(|(row, _)| *row).min()
    }
}

/// Represents a single cell
#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
    pub value: CellValue,
}

/// Cell value types
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    DateTime(NaiveDateTime),
    Error(String),
}

impl CellValue {
    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the cell contains an error
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    /// Raw text of the cell as a person would read it.
    ///
    /// Empty and error cells have no text.
    pub fn to_text(&self) -> Option<String> {
        match self {
            CellValue::Empty | CellValue::Error(_) => None,
            CellValue::Text(s) => Some(s.clone()),
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::Boolean(true) => Some("TRUE".to_string()),
            CellValue::Boolean(false) => Some("FALSE".to_string()),
            CellValue::DateTime(dt) => Some(dates::format_datetime(dt)),
        }
    }

    /// Interpret the cell as a calendar date.
    ///
    /// Numbers are read as Excel serial dates; text must use one of the
    /// accepted date layouts.
    pub fn to_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::DateTime(dt) => Some(dt.date()),
            CellValue::Number(n) => dates::from_excel_serial(*n),
            CellValue::Text(s) => dates::parse_date_text(s),
            _ => None,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
