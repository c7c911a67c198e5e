//! Workbook decoding and encoding behind narrow traits.

use crate::csv::{read_grid, CsvOptions};
use crate::error::{Result, SheetError};
use crate::table::Grid;
use crate::xlsx::{read_workbook, write_workbook};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sheet name used for single-sheet formats.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

/// Every sheet of a decoded workbook as a raw grid.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DecodedWorkbook {
    /// Sheet names in workbook order
    pub sheet_names: Vec<String>,
    /// Grid per sheet name
    pub grids: IndexMap<String, Grid>,
}

/// A labelled grid handed to an [`Encoder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetBlock {
    pub label: String,
    pub grid: Grid,
}

/// Turns file bytes into grids.
pub trait Decoder {
    /// Decode `bytes`, using `filename_hint` to pick the format.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::UnsupportedFormat`] for unknown extensions and a
    /// decode error when the bytes are unreadable.
    fn decode(&self, bytes: &[u8], filename_hint: &str) -> Result<DecodedWorkbook>;
}

/// Turns labelled grids into file bytes.
pub trait Encoder {
    /// # Errors
    ///
    /// Returns [`SheetError::Encode`] if serialization fails.
    fn encode(&self, blocks: &[SheetBlock]) -> Result<Vec<u8>>;
}

/// Input formats understood by [`WorkbookDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookFormat {
    Xlsx,
    Xls,
    Csv,
}

impl WorkbookFormat {
    /// Detect the format from a file name's extension, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns [`SheetError::UnsupportedFormat`] when the extension is not
    /// `xlsx`, `xls` or `csv`.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let ext = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" => Ok(WorkbookFormat::Xlsx),
            "xls" => Ok(WorkbookFormat::Xls),
            "csv" => Ok(WorkbookFormat::Csv),
            _ => Err(SheetError::UnsupportedFormat { extension: ext }),
        }
    }
}

/// Default decoder: xlsx/xls through calamine, csv through the csv crate.
#[derive(Debug, Clone, Default)]
pub struct WorkbookDecoder {
    pub csv: CsvOptions,
}

impl Decoder for WorkbookDecoder {
    fn decode(&self, bytes: &[u8], filename_hint: &str) -> Result<DecodedWorkbook> {
        match WorkbookFormat::from_file_name(filename_hint)? {
            WorkbookFormat::Xlsx | WorkbookFormat::Xls => {
                let (sheet_names, grids) = read_workbook(bytes)?;
                tracing::debug!(sheets = sheet_names.len(), file = filename_hint, "decoded workbook");
                Ok(DecodedWorkbook { sheet_names, grids })
            }
            WorkbookFormat::Csv => {
                let grid = read_grid(bytes, &self.csv)?;
                tracing::debug!(rows = grid.len(), file = filename_hint, "decoded csv");
                let mut grids = IndexMap::new();
                grids.insert(DEFAULT_SHEET_NAME.to_string(), grid);
                Ok(DecodedWorkbook {
                    sheet_names: vec![DEFAULT_SHEET_NAME.to_string()],
                    grids,
                })
            }
        }
    }
}

/// Default encoder producing an xlsx workbook.
#[derive(Debug, Clone, Copy, Default)]
pub struct XlsxEncoder;

impl Encoder for XlsxEncoder {
    fn encode(&self, blocks: &[SheetBlock]) -> Result<Vec<u8>> {
        write_workbook(
            blocks
                .iter()
                .map(|b| (b.label.as_str(), b.grid.as_slice())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;

    #[test]
    fn test_format_detection() {
        assert_eq!(
            WorkbookFormat::from_file_name("Report.XLSX").unwrap(),
            WorkbookFormat::Xlsx
        );
        assert_eq!(
            WorkbookFormat::from_file_name("a.b.xls").unwrap(),
            WorkbookFormat::Xls
        );
        assert_eq!(
            WorkbookFormat::from_file_name("data.csv").unwrap(),
            WorkbookFormat::Csv
        );
    }

    #[test]
    fn test_unsupported_extension() {
        let err = WorkbookDecoder::default()
            .decode(b"{}", "data.json")
            .unwrap_err();
        assert!(matches!(err, SheetError::UnsupportedFormat { ref extension } if extension == "json"));
        assert!(WorkbookFormat::from_file_name("noext").is_err());
    }

    #[test]
    fn test_csv_decodes_to_single_sheet() {
        let decoded = WorkbookDecoder::default()
            .decode(b"a,b\n1,2\n", "in.csv")
            .unwrap();
        assert_eq!(decoded.sheet_names, vec![DEFAULT_SHEET_NAME]);
        assert_eq!(decoded.grids[DEFAULT_SHEET_NAME][1][0], CellValue::Int(1));
    }

    #[test]
    fn test_encode_then_decode_keeps_block_order() {
        let blocks = vec![
            SheetBlock {
                label: "Data".into(),
                grid: vec![vec![CellValue::from("x")]],
            },
            SheetBlock {
                label: "Data_result".into(),
                grid: vec![vec![CellValue::from("y")]],
            },
        ];
        let bytes = XlsxEncoder.encode(&blocks).unwrap();
        let decoded = WorkbookDecoder::default().decode(&bytes, "out.xlsx").unwrap();
        assert_eq!(decoded.sheet_names, vec!["Data", "Data_result"]);
        assert_eq!(decoded.grids["Data_result"][0][0], CellValue::from("y"));
    }
}
