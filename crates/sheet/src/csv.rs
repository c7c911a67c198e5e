use crate::cell::CellValue;
use crate::error::Result;
use crate::table::Grid;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// CSV reader options
#[derive(Debug, Clone)]
pub struct CsvOptions {
    /// Field delimiter (default: ',')
    pub delimiter: u8,
    /// Quote character (default: '"')
    pub quote: u8,
    /// Whether to use type inference when reading
    pub infer_types: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        CsvOptions {
            delimiter: b',',
            quote: b'"',
            infer_types: true,
        }
    }
}

impl CsvOptions {
    /// Create options for TSV (tab-separated values)
    #[must_use]
    pub fn tsv() -> Self {
        CsvOptions {
            delimiter: b'\t',
            ..Default::default()
        }
    }

    /// Set the delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether to infer types
    #[must_use]
    pub fn with_type_inference(mut self, infer_types: bool) -> Self {
        self.infer_types = infer_types;
        self
    }
}

/// Decode CSV bytes into a grid.
///
/// A leading UTF-8 byte-order mark is skipped, rows may have differing
/// lengths, and invalid UTF-8 is replaced rather than rejected.
///
/// # Errors
///
/// Returns an error if the CSV is structurally malformed.
pub fn read_grid(bytes: &[u8], options: &CsvOptions) -> Result<Grid> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .quote(options.quote)
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut grid = Vec::new();
    for record in reader.byte_records() {
        let record = record?;
        let row = record
            .iter()
            .map(|field| {
                let text = String::from_utf8_lossy(field);
                if options.infer_types {
                    CellValue::parse(&text)
                } else {
                    CellValue::String(text.into_owned())
                }
            })
            .collect();
        grid.push(row);
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_grid_infers_types() {
        let grid = read_grid(b"name,age\nAlice,30\nBob,2.5\n", &CsvOptions::default()).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[1][1], CellValue::Int(30));
        assert_eq!(grid[2][1], CellValue::Float(2.5));
    }

    #[test]
    fn test_bom_and_ragged_rows() {
        let grid = read_grid(
            b"\xEF\xBB\xBFReport\nName,Age\nAlice,30,extra\n",
            &CsvOptions::default(),
        )
        .unwrap();
        assert_eq!(grid[0], vec![CellValue::from("Report")]);
        assert_eq!(grid[1].len(), 2);
        assert_eq!(grid[2].len(), 3);
    }

    #[test]
    fn test_without_inference() {
        let options = CsvOptions::default().with_type_inference(false);
        let grid = read_grid(b"1,,x\n", &options).unwrap();
        assert_eq!(
            grid[0],
            vec![CellValue::from("1"), CellValue::from(""), CellValue::from("x")]
        );
    }

    #[test]
    fn test_tsv() {
        let grid = read_grid(b"a\tb\n1\t2\n", &CsvOptions::tsv()).unwrap();
        assert_eq!(grid[0], vec![CellValue::from("a"), CellValue::from("b")]);
        assert_eq!(grid[1][1], CellValue::Int(2));
    }

    #[test]
    fn test_quoted_fields() {
        let grid = read_grid(b"\"a, b\",\"say \"\"hi\"\"\"\n", &CsvOptions::default()).unwrap();
        assert_eq!(grid[0][0], CellValue::from("a, b"));
        assert_eq!(grid[0][1], CellValue::from("say \"hi\""));
    }
}
