//! Spreadsheet access.
//!
//! Ranges use A1 notation (`Votes!A1:Z`); rows come back as strings with
//! trailing empty cells and rows trimmed, as the Sheets API does.

mod google;
mod memory;
mod range;
mod trait_def;

pub use google::GoogleSheetsClient;
pub use memory::InMemorySpreadsheet;
pub use range::A1Range;
pub use trait_def::{Row, SpreadsheetClient, ValueInputOption};
