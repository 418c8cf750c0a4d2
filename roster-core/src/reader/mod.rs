//! Excel/ODS file reader using calamine

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto, open_workbook_auto_from_rs};
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::debug;

pub mod dates;
pub mod workbook;

pub use workbook::{Cell, CellValue, Sheet, Workbook};

/// Read a workbook from a file path
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let path = path.as_ref();
    let excel: Sheets<_> = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let source = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    collect_sheets(excel, source)
}

/// Read a workbook from raw file contents, detecting the format from the bytes
pub fn read_workbook_from_bytes(data: &[u8], source: &str) -> Result<Workbook> {
    let excel = open_workbook_auto_from_rs(Cursor::new(data.to_vec()))
        .with_context(|| format!("Failed to open workbook: {}", source))?;

    collect_sheets(excel, source.to_string())
}

fn collect_sheets<RS: Read + Seek>(mut excel: Sheets<RS>, source: String) -> Result<Workbook> {
    let mut sheets = Vec::new();

    for sheet_name in excel.sheet_names() {
        let range = excel
            .worksheet_range(&sheet_name)
            .with_context(|| format!("Failed to read sheet '{}' of {}", sheet_name, source))?;
        let sheet = parse_sheet(&sheet_name, &range);
        debug!(
            sheet = %sheet_name,
            cells = sheet.cells.len(),
            "read worksheet"
        );
        sheets.push(sheet);
    }

    Ok(Workbook { source, sheets })
}

fn parse_sheet(name: &str, range: &Range<Data>) -> Sheet {
    let mut sheet = Sheet::new(name);

    // Range positions are relative to its first used cell
    let Some((start_row, start_col)) = range.start() else {
        return sheet;
    };

    for (rel_row, rel_col, data) in range.used_cells() {
        sheet.set_value(
            start_row + rel_row as u32,
            start_col + rel_col as u32,
            parse_cell_value(data),
        );
    }

    sheet
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        Data::Empty => CellValue::Empty,
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Number(dt.as_f64())),
        Data::DateTimeIso(s) => dates::parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
