//! A1 notation ranges.

use anyhow::{bail, Context, Result};
use std::fmt;

/// A parsed A1 range such as `Votes!A1:Z` or `'Extra tracks'!A2:C`.
///
/// Rows and columns are 0-indexed. An open end (`Votes!A1:Z`) means the range
/// runs to the last row of the sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct A1Range {
    pub sheet: String,
    pub start_col: usize,
    pub start_row: usize,
    pub end_col: Option<usize>,
    pub end_row: Option<usize>,
}

#[derive(Debug, PartialEq)]
struct CellRef {
    col: Option<usize>,
    row: Option<usize>,
}

impl A1Range {
    pub fn parse(range: &str) -> Result<Self> {
        let range = range.trim();
        let (sheet, cells) = split_sheet(range)?;

        let Some(cells) = cells else {
            return Ok(Self {
                sheet,
                start_col: 0,
                start_row: 0,
                end_col: None,
                end_row: None,
            });
        };

        let (start, end) = match cells.split_once(':') {
            Some((start, end)) => (parse_cell(start)?, Some(parse_cell(end)?)),
            None => (parse_cell(cells)?, None),
        };

        let (end_col, end_row) = match end {
            Some(end) => (end.col, end.row),
            // A single cell covers just itself
            None => (start.col.or(Some(0)), start.row.or(Some(0))),
        };

        let parsed = Self {
            sheet,
            start_col: start.col.unwrap_or(0),
            start_row: start.row.unwrap_or(0),
            end_col,
            end_row,
        };

        if parsed.end_col.is_some_and(|c| c < parsed.start_col)
            || parsed.end_row.is_some_and(|r| r < parsed.start_row)
        {
            bail!("Range end precedes its start: {}", range);
        }
        Ok(parsed)
    }

    /// The first row of this range, same columns.
    pub fn first_row(&self) -> Self {
        Self {
            end_row: Some(self.start_row),
            ..self.clone()
        }
    }

    /// Same rows, exactly `width` columns from the start column.
    pub fn with_width(&self, width: usize) -> Self {
        Self {
            end_col: Some(self.start_col + width.max(1) - 1),
            ..self.clone()
        }
    }

    /// Number of columns covered, `None` for open-ended ranges.
    pub fn width(&self) -> Option<usize> {
        self.end_col.map(|end| end - self.start_col + 1)
    }

    pub fn contains_row(&self, row: usize) -> bool {
        row >= self.start_row && self.end_row.map_or(true, |end| row <= end)
    }

    pub fn contains_col(&self, col: usize) -> bool {
        col >= self.start_col && self.end_col.map_or(true, |end| col <= end)
    }
}

impl fmt::Display for A1Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sheet.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            write!(f, "{}", self.sheet)?;
        } else {
            write!(f, "'{}'", self.sheet.replace('\'', "''"))?;
        }
        if self.end_col.is_none() && self.end_row.is_none() {
            // Whole sheet
            return Ok(());
        }
        if let (0, None, Some(row)) = (self.start_col, self.end_col, self.end_row) {
            // Full-width rows
            return write!(f, "!{}:{}", self.start_row + 1, row + 1);
        }
        write!(f, "!{}{}", column_letters(self.start_col), self.start_row + 1)?;
        match (self.end_col, self.end_row) {
            (Some(col), Some(row)) => write!(f, ":{}{}", column_letters(col), row + 1),
            (Some(col), None) => write!(f, ":{}", column_letters(col)),
            (None, Some(row)) => write!(f, ":{}", row + 1),
            (None, None) => Ok(()),
        }
    }
}

fn split_sheet(range: &str) -> Result<(String, Option<&str>)> {
    if let Some(quoted) = range.strip_prefix('\'') {
        // 'It''s a sheet'!A1
        let mut name = String::new();
        let mut chars = quoted.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if c == '\'' {
                if matches!(chars.peek(), Some((_, '\''))) {
                    name.push('\'');
                    chars.next();
                    continue;
                }
                let rest = &quoted[i + 1..];
                return match rest.strip_prefix('!') {
                    Some(cells) => Ok((name, Some(cells))),
                    None if rest.is_empty() => Ok((name, None)),
                    None => bail!("Invalid range: {}", range),
                };
            }
            name.push(c);
        }
        bail!("Unterminated sheet name in range: {}", range);
    }

    match range.split_once('!') {
        Some((sheet, cells)) if !sheet.is_empty() => Ok((sheet.to_string(), Some(cells))),
        Some(_) => bail!("Missing sheet name in range: {}", range),
        None if !range.is_empty() => Ok((range.to_string(), None)),
        None => bail!("Empty range"),
    }
}

fn parse_cell(cell: &str) -> Result<CellRef> {
    let cell = cell.trim();
    let split = cell
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(cell.len());
    let (letters, digits) = cell.split_at(split);

    if letters.is_empty() && digits.is_empty() {
        bail!("Empty cell reference");
    }

    let col = if letters.is_empty() {
        None
    } else {
        Some(column_index(letters))
    };
    let row = if digits.is_empty() {
        None
    } else {
        let row: usize = digits
            .parse()
            .with_context(|| format!("Invalid row in cell reference: {}", cell))?;
        if row == 0 {
            bail!("Rows start at 1: {}", cell);
        }
        Some(row - 1)
    };
    Ok(CellRef { col, row })
}

/// `A` is 0, `Z` is 25, `AA` is 26.
fn column_index(letters: &str) -> usize {
    letters
        .chars()
        .fold(0usize, |acc, c| {
            acc * 26 + (c.to_ascii_uppercase() as usize - 'A' as usize + 1)
        })
        - 1
}

fn column_letters(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}
