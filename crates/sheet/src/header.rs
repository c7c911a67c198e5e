use crate::cell::CellValue;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Weights used when scoring candidate header rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderScanOptions {
    /// Only the first `max_scan_rows` rows are considered
    pub max_scan_rows: usize,
    /// Points per non-empty cell
    pub density_weight: f64,
    /// Points for a fully distinct row (scaled by the uniqueness ratio)
    pub uniqueness_weight: f64,
    /// Subtracted from rows with at most two non-empty labels
    pub sparse_penalty: f64,
}

impl Default for HeaderScanOptions {
    fn default() -> Self {
        HeaderScanOptions {
            max_scan_rows: 12,
            density_weight: 5.0,
            uniqueness_weight: 10.0,
            sparse_penalty: 6.0,
        }
    }
}

/// Pick the row most likely to hold the column headers.
///
/// Header rows tend to be dense and made of distinct labels, while cover and
/// title rows are sparse or repetitive. Rows with fewer than two non-empty
/// cells never qualify; ties keep the earliest row; `0` is returned when no
/// row qualifies.
#[must_use]
pub fn infer_header_row(grid: &[Vec<CellValue>], options: &HeaderScanOptions) -> usize {
    let mut best: Option<(usize, f64)> = None;

    for (idx, row) in grid.iter().take(options.max_scan_rows).enumerate() {
        let texts: Vec<String> = row
            .iter()
            .filter(|c| !c.is_empty())
            .map(|c| c.as_str().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let non_empty = row.iter().filter(|c| !c.is_empty()).count();
        if non_empty < 2 {
            continue;
        }

        let unique = texts.iter().collect::<HashSet<_>>().len();
        let unique_ratio = if texts.is_empty() {
            0.0
        } else {
            unique as f64 / texts.len() as f64
        };
        let penalty = if texts.len() <= 2 {
            options.sparse_penalty
        } else {
            0.0
        };
        let score = non_empty as f64 * options.density_weight
            + unique_ratio * options.uniqueness_weight
            - penalty;

        if best.map_or(true, |(_, s)| score > s) {
            best = Some((idx, score));
        }
    }

    best.map_or(0, |(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<CellValue> {
        cells.iter().map(|c| CellValue::from(*c)).collect()
    }

    #[test]
    fn test_title_row_loses_to_header() {
        let grid = vec![
            row(&["Report"]),
            row(&["Name", "Age"]),
            row(&["Alice", "30"]),
            row(&["Bob", "25"]),
        ];
        assert_eq!(infer_header_row(&grid, &HeaderScanOptions::default()), 1);
    }

    #[test]
    fn test_dense_row_wins() {
        let grid = vec![
            row(&["Quarterly numbers", "", ""]),
            row(&["", "", ""]),
            row(&["Region", "Sales", "Units", "Owner"]),
            row(&["North", "10", "", ""]),
        ];
        assert_eq!(infer_header_row(&grid, &HeaderScanOptions::default()), 2);
    }

    #[test]
    fn test_repetitive_row_penalized() {
        let grid = vec![
            row(&["Total", "Total", "Total"]),
            row(&["a", "b", "c"]),
        ];
        assert_eq!(infer_header_row(&grid, &HeaderScanOptions::default()), 1);
    }

    #[test]
    fn test_no_qualifying_row_defaults_to_zero() {
        let grid = vec![row(&["only"]), row(&[""]), row(&[])];
        assert_eq!(infer_header_row(&grid, &HeaderScanOptions::default()), 0);
        assert_eq!(infer_header_row(&[], &HeaderScanOptions::default()), 0);
    }

    #[test]
    fn test_scan_window_is_respected() {
        let mut grid: Vec<Vec<CellValue>> = (0..5).map(|_| row(&["x"])).collect();
        grid.push(row(&["a", "b", "c", "d"]));
        let options = HeaderScanOptions {
            max_scan_rows: 5,
            ..HeaderScanOptions::default()
        };
        assert_eq!(infer_header_row(&grid, &options), 0);
        assert_eq!(infer_header_row(&grid, &HeaderScanOptions::default()), 5);
    }
}
