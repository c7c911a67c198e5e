//! Tabular model for tabtrans
//!
//! Turns noisy spreadsheet grids into uniform tables, cleans them, and reads
//! and writes workbooks.
//!
//! # Examples
//!
//! ## Locating the header row
//!
//! ```
//! use tabtrans_sheet::{infer_header_row, CellValue, HeaderScanOptions, Table};
//!
//! let grid = vec![
//!     vec![CellValue::from("Quarterly report")],
//!     vec![CellValue::from("Name"), CellValue::from("Age")],
//!     vec![CellValue::from("Alice"), CellValue::from("30")],
//!     vec![CellValue::from("Bob"), CellValue::from("25")],
//! ];
//!
//! let header = infer_header_row(&grid, &HeaderScanOptions::default());
//! let table = Table::from_grid(&grid, header);
//!
//! assert_eq!(header, 1);
//! assert_eq!(table.headers(), &["Name", "Age"]);
//! assert_eq!(table.row_count(), 2);
//! ```
//!
//! ## Cleaning
//!
//! ```
//! use tabtrans_sheet::{CellValue, CleanStep, Table};
//!
//! let table = Table::from_parts(
//!     &["Active", "Note"],
//!     vec![
//!         vec![CellValue::from("YES"), CellValue::from("  itâ€™s fine ")],
//!         vec![CellValue::from(""), CellValue::from("")],
//!     ],
//! );
//!
//! let cleaned = CleanStep::ALL.iter().fold(table, |t, step| step.apply(&t));
//!
//! assert_eq!(cleaned.row_count(), 1);
//! assert_eq!(cleaned.get(0, "Active"), Some(&CellValue::from("是")));
//! assert_eq!(cleaned.get(0, "Note"), Some(&CellValue::from("it’s fine")));
//! ```
//!
//! ## Decoding a workbook
//!
//! ```
//! use tabtrans_sheet::{Decoder, WorkbookDecoder};
//!
//! let decoded = WorkbookDecoder::default()
//!     .decode(b"id,name\n1,Widget\n", "items.csv")
//!     .unwrap();
//! assert_eq!(decoded.sheet_names, vec!["Sheet1"]);
//! ```

mod cell;
mod clean;
mod codec;
mod csv;
mod error;
mod garble;
mod header;
mod summary;
mod table;
mod xlsx;

/// Re-export cell value type.
pub use cell::CellValue;
/// Re-export cleaning transforms and the anomaly report.
pub use clean::{
    clean_garble, detect_anomalies, normalize_booleans, remove_empty_rows_and_cols, trim_cells,
    AnomalyReport, CleanStep, ColumnAnomaly, FALSE_TOKEN, TRUE_TOKEN,
};
/// Re-export workbook codec traits and defaults.
pub use codec::{
    DecodedWorkbook, Decoder, Encoder, SheetBlock, WorkbookDecoder, WorkbookFormat, XlsxEncoder,
    DEFAULT_SHEET_NAME,
};
/// Re-export CSV options.
pub use csv::CsvOptions;
/// Re-export sheet error types.
pub use error::{Result, SheetError};
/// Re-export the garble repair primitive.
pub use garble::{fix_garble, GARBLE_REPLACEMENTS};
/// Re-export header inference.
pub use header::{infer_header_row, HeaderScanOptions};
/// Re-export table summary types.
pub use summary::{build_summary, ColumnKind, ColumnProfile, DateRange, NumericStats, TableSummary};
/// Re-export the table model.
pub use table::{Grid, Record, Table};
/// Re-export the worksheet name limit.
pub use xlsx::{cap_sheet_name, MAX_SHEET_NAME_CHARS};
