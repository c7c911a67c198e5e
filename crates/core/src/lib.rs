//! # tabtrans-core
//!
//! Session layer for tabtrans.
//!
//! This crate provides:
//! - Workbook state with an original/result pair per sheet
//! - Undo/redo history of labelled snapshots
//! - Async workbook loading with progress
//! - Export naming rules
//! - Configuration and error types
//!
//! ```
//! use tabtrans_core::{Config, Session};
//! use tabtrans_sheet::{CleanStep, Decoder, WorkbookDecoder};
//!
//! let decoded = WorkbookDecoder::default()
//!     .decode(b"Name,Active\n Alice ,yes\n", "people.csv")
//!     .unwrap();
//!
//! let mut session = Session::new(Config::default());
//! session.open("people.csv", decoded);
//! session.apply_steps(&CleanStep::ALL).unwrap();
//!
//! let (name, _bytes) = session.export_xlsx().unwrap();
//! assert_eq!(name, "people_result.xlsx");
//! assert!(session.undo());
//! ```

/// Configuration loading and defaults.
pub mod config;
/// Error types and result aliases.
pub mod error;
/// Export file and sheet naming.
pub mod export;
/// Snapshot history.
pub mod history;
/// Workbook loading.
pub mod load;
/// Editing sessions.
pub mod session;
/// Per-sheet workbook state.
pub mod workbook;

/// Re-export configuration types.
pub use config::{AnomalyOptions, Config, TranslationOptions, WorkbookOptions, AUTO_LANG};
/// Re-export core error types.
pub use error::{TabError, TabResult};
/// Re-export export naming helpers.
pub use export::{result_file_name, sanitize_sheet_name, SheetLabeler};
/// Re-export history types.
pub use history::{HistoryLog, HistorySnapshot};
/// Re-export loaders.
pub use load::{load_bytes, load_file};
/// Re-export session types.
pub use session::{Session, SessionSnapshot, TranslateReport, TranslateRequest};
/// Re-export workbook state.
pub use workbook::{sheet_score, SheetEntry, WorkbookState};
