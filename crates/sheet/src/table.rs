use crate::cell::CellValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Raw 2D grid of cells (array-of-arrays), rows may be ragged.
pub type Grid = Vec<Vec<CellValue>>;

/// A single record mapping header -> cell value, in header order.
pub type Record = IndexMap<String, CellValue>;

/// A normalized table: unique, non-empty headers and uniform records.
///
/// Every record holds exactly the keys in `headers`, in header order. Tables
/// own plain data only, so `Clone` produces a complete, alias-free copy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Record>,
}

impl Table {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from a grid, using `header_row_index` as the header row.
    ///
    /// Header cells are trimmed; blanks become `Column<N>` and duplicates get
    /// `_2`, `_3`, ... suffixes. Rows above the header are dropped and short
    /// rows are padded with empty strings.
    ///
    /// # Example
    /// ```
    /// use tabtrans_sheet::{CellValue, Table};
    ///
    /// let grid = vec![
    ///     vec![CellValue::from("Report")],
    ///     vec![CellValue::from("Name"), CellValue::from("Age")],
    ///     vec![CellValue::from("Alice"), CellValue::from("30")],
    /// ];
    /// let table = Table::from_grid(&grid, 1);
    /// assert_eq!(table.headers(), &["Name", "Age"]);
    /// assert_eq!(table.row_count(), 1);
    /// ```
    #[must_use]
    pub fn from_grid(grid: &[Vec<CellValue>], header_row_index: usize) -> Self {
        let header_cells: Vec<String> = grid
            .get(header_row_index)
            .map(|row| row.iter().map(CellValue::as_str).collect())
            .unwrap_or_default();
        let headers = normalize_headers(&header_cells);

        let rows = grid
            .iter()
            .skip(header_row_index.saturating_add(1))
            .map(|row| {
                headers
                    .iter()
                    .enumerate()
                    .map(|(c, h)| {
                        let value = row
                            .get(c)
                            .cloned()
                            .unwrap_or_else(|| CellValue::String(String::new()));
                        (h.clone(), value)
                    })
                    .collect()
            })
            .collect();

        Table { headers, rows }
    }

    /// Build a table from raw header labels and positional rows.
    ///
    /// Headers are normalized the same way as in [`Table::from_grid`].
    #[must_use]
    pub fn from_parts<S: AsRef<str>>(headers: &[S], rows: Vec<Vec<CellValue>>) -> Self {
        let raw: Vec<String> = headers.iter().map(|h| h.as_ref().to_string()).collect();
        let headers = normalize_headers(&raw);
        let rows = rows
            .into_iter()
            .map(|row| {
                let mut cells = row.into_iter();
                headers
                    .iter()
                    .map(|h| {
                        let value = cells
                            .next()
                            .unwrap_or_else(|| CellValue::String(String::new()));
                        (h.clone(), value)
                    })
                    .collect()
            })
            .collect();
        Table { headers, rows }
    }

    /// Convert back to a grid: the header row followed by each record.
    #[must_use]
    pub fn to_grid(&self) -> Grid {
        let mut grid = Vec::with_capacity(self.rows.len() + 1);
        grid.push(
            self.headers
                .iter()
                .map(|h| CellValue::String(h.clone()))
                .collect(),
        );
        for row in &self.rows {
            grid.push(
                self.headers
                    .iter()
                    .map(|h| {
                        row.get(h)
                            .cloned()
                            .unwrap_or_else(|| CellValue::String(String::new()))
                    })
                    .collect(),
            );
        }
        grid
    }

    /// Get the headers in column order
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get the records
    #[must_use]
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Get the number of records
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.headers.len()
    }

    /// Check if the table has no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a cell by record index and header
    #[must_use]
    pub fn get(&self, row: usize, header: &str) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(header))
    }

    /// Get all values of a column, or `None` if the header is unknown
    #[must_use]
    pub fn column(&self, header: &str) -> Option<Vec<&CellValue>> {
        if !self.headers.iter().any(|h| h == header) {
            return None;
        }
        Some(self.rows.iter().filter_map(|r| r.get(header)).collect())
    }

    /// Return a fresh table with `f(value, header)` applied to every cell
    #[must_use]
    pub fn map_cells<F>(&self, f: F) -> Table
    where
        F: Fn(&CellValue, &str) -> CellValue,
    {
        let rows = self
            .rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .map(|h| {
                        let value = row.get(h).unwrap_or(&CellValue::Null);
                        (h.clone(), f(value, h))
                    })
                    .collect()
            })
            .collect();
        Table {
            headers: self.headers.clone(),
            rows,
        }
    }

    /// Return a fresh table keeping only the records matching `keep`
    #[must_use]
    pub fn filter_rows<F>(&self, keep: F) -> Table
    where
        F: Fn(&Record) -> bool,
    {
        Table {
            headers: self.headers.clone(),
            rows: self.rows.iter().filter(|r| keep(r)).cloned().collect(),
        }
    }

    /// Return a fresh table restricted to the given headers, in table order
    #[must_use]
    pub fn select_headers(&self, keep: &[String]) -> Table {
        let headers: Vec<String> = self
            .headers
            .iter()
            .filter(|h| keep.contains(h))
            .cloned()
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                headers
                    .iter()
                    .map(|h| {
                        let value = row
                            .get(h)
                            .cloned()
                            .unwrap_or_else(|| CellValue::String(String::new()));
                        (h.clone(), value)
                    })
                    .collect()
            })
            .collect();
        Table { headers, rows }
    }
}

/// Trim header labels, fill blanks with `Column<N>` and suffix duplicates.
fn normalize_headers(raw: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    raw.iter()
        .enumerate()
        .map(|(idx, label)| {
            let trimmed = label.trim();
            let base = if trimmed.is_empty() {
                format!("Column{}", idx + 1)
            } else {
                trimmed.to_string()
            };
            let mut out = base.clone();
            let mut n = 2;
            while used.contains(&out) {
                out = format!("{base}_{n}");
                n += 1;
            }
            used.insert(out.clone());
            out
        })
        .collect()
}
