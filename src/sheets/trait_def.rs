//! SpreadsheetClient trait definition.

use anyhow::Result;
use async_trait::async_trait;

/// One spreadsheet row, cells in column order (column A is index 0).
pub type Row = Vec<String>;

/// How written cells are interpreted by the spreadsheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueInputOption {
    /// Stored as-is, never parsed.
    Raw,
    /// Parsed as if typed by a user (dates, numbers, formulas).
    UserEntered,
}

impl ValueInputOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueInputOption::Raw => "RAW",
            ValueInputOption::UserEntered => "USER_ENTERED",
        }
    }
}

#[async_trait]
pub trait SpreadsheetClient: Send + Sync {
    /// Rows in `range`. Empty when the range holds no data.
    async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Row>>;

    /// Writes `rows` starting at the top-left cell of `range`.
    async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Row>,
        input: ValueInputOption,
    ) -> Result<()>;

    /// Writes `rows` below the last non-empty row of the table in `range`.
    async fn append_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: Vec<Row>,
        input: ValueInputOption,
    ) -> Result<()>;

    /// Blanks every cell in `range`.
    async fn clear_values(&self, spreadsheet_id: &str, range: &str) -> Result<()>;
}
