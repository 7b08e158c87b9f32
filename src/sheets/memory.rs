//! In-memory spreadsheet, used by the end-to-end tests in place of Google Sheets.

use super::range::A1Range;
use super::trait_def::{Row, SpreadsheetClient, ValueInputOption};
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

type SheetKey = (String, String);

/// Grids keyed by `(spreadsheet_id, sheet name)`. Reading or writing a sheet
/// that was never created fails, like the real API does.
#[derive(Default)]
pub struct InMemorySpreadsheet {
    sheets: Mutex<HashMap<SheetKey, Vec<Row>>>,
}

impl InMemorySpreadsheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates (or replaces) a sheet with the given content.
    pub fn put_rows(&self, spreadsheet_id: &str, sheet: &str, rows: Vec<Row>) {
        self.sheets
            .lock()
            .unwrap()
            .insert((spreadsheet_id.to_string(), sheet.to_string()), rows);
    }

    /// Whole sheet content with trailing empty cells and rows trimmed.
    pub fn rows(&self, spreadsheet_id: &str, sheet: &str) -> Vec<Row> {
        let sheets = self.sheets.lock().unwrap();
        let grid = sheets
            .get(&(spreadsheet_id.to_string(), sheet.to_string()))
            .cloned()
            .unwrap_or_default();
        trim_rows(grid)
    }

    fn with_sheet<T>(
        &self,
        spreadsheet_id: &str,
        range: &A1Range,
        f: impl FnOnce(&mut Vec<Row>) -> Result<T>,
    ) -> Result<T> {
        let mut sheets = self.sheets.lock().unwrap();
        match sheets.get_mut(&(spreadsheet_id.to_string(), range.sheet.clone())) {
            Some(grid) => f(grid),
            None => bail!("Unable to parse range: {}", range),
        }
    }
}

fn trim_row(mut row: Row) -> Row {
    while row.last().is_some_and(|c| c.is_empty()) {
        row.pop();
    }
    row
}

fn trim_rows(rows: Vec<Row>) -> Vec<Row> {
    let mut rows: Vec<Row> = rows.into_iter().map(trim_row).collect();
    while rows.last().is_some_and(|r| r.is_empty()) {
        rows.pop();
    }
    rows
}

fn set_cell(grid: &mut Vec<Row>, row: usize, col: usize, value: String) {
    if grid.len() <= row {
        grid.resize_with(row + 1, Vec::new);
    }
    let cells = &mut grid[row];
    if cells.len() <= col {
        cells.resize(col + 1, String::new());
    }
    cells[col] = value;
}

fn write_at(grid: &mut Vec<Row>, range: &A1Range, top: usize, rows: Vec<Row>) -> Result<()> {
    for (i, row) in rows.into_iter().enumerate() {
        for (j, value) in row.into_iter().enumerate() {
            let col = range.start_col + j;
            if !range.contains_col(col) {
                bail!("Requested writing outside of range {}", range);
            }
            set_cell(grid, top + i, col, value);
        }
    }
    Ok(())
}

#[async_trait]
impl SpreadsheetClient for InMemorySpreadsheet {
    async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Row>> {
        let range = A1Range::parse(range)?;
        self.with_sheet(spreadsheet_id, &range, |grid| {
            let rows = grid
                .iter()
                .enumerate()
                .filter(|(i, _)| range.contains_row(*i))
                .map(|(_, row)| {
                    row.iter()
                        .enumerate()
                        .filter(|(j, _)| range.contains_col(*j))
                        .map(|(_, cell)| cell.clone())
                        .collect()
                })
                .collect();
            Ok(trim_rows(rows))
        })
    }

    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Row>,
        _input: ValueInputOption,
    ) -> Result<()> {
        let range = A1Range::parse(range)?;
        if let Some(end) = range.end_row {
            if range.start_row + rows.len() > end + 1 {
                bail!("Requested writing outside of range {}", range);
            }
        }
        self.with_sheet(spreadsheet_id, &range, |grid| {
            write_at(grid, &range, range.start_row, rows)
        })
    }

    async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Row>,
        _input: ValueInputOption,
    ) -> Result<()> {
        let range = A1Range::parse(range)?;
        self.with_sheet(spreadsheet_id, &range, |grid| {
            let last_used = grid
                .iter()
                .enumerate()
                .filter(|(i, _)| range.contains_row(*i))
                .filter(|(_, row)| {
                    row.iter()
                        .enumerate()
                        .any(|(j, cell)| range.contains_col(j) && !cell.is_empty())
                })
                .map(|(i, _)| i)
                .last();
            let top = last_used.map_or(range.start_row, |i| i + 1);
            write_at(grid, &range, top, rows)
        })
    }

    async fn clear_values(&self, spreadsheet_id: &str, range: &str) -> Result<()> {
        let range = A1Range::parse(range)?;
        self.with_sheet(spreadsheet_id, &range, |grid| {
            for (i, row) in grid.iter_mut().enumerate() {
                if !range.contains_row(i) {
                    continue;
                }
                for (j, cell) in row.iter_mut().enumerate() {
                    if range.contains_col(j) {
                        cell.clear();
                    }
                }
            }
            Ok(())
        })
    }
}
