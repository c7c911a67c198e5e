use crate::cell::CellValue;
use crate::garble::fix_garble;
use crate::table::Table;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical token for a true value.
pub const TRUE_TOKEN: &str = "是";
/// Canonical token for a false value.
pub const FALSE_TOKEN: &str = "否";

const TRUE_WORDS: &[&str] = &["true", "TRUE", "True", "yes", "YES", "Yes", "是", "1"];
const FALSE_WORDS: &[&str] = &["false", "FALSE", "False", "no", "NO", "No", "否", "0"];

/// Repair mis-decoded text in every string cell.
#[must_use]
pub fn clean_garble(table: &Table) -> Table {
    table.map_cells(|v, _| match v {
        CellValue::String(s) => CellValue::String(fix_garble(s)),
        other => other.clone(),
    })
}

/// Strip leading/trailing whitespace from string cells.
#[must_use]
pub fn trim_cells(table: &Table) -> Table {
    table.map_cells(|v, _| match v {
        CellValue::String(s) => CellValue::String(s.trim().to_string()),
        other => other.clone(),
    })
}

/// Map boolean-like values to `是` / `否`.
#[must_use]
pub fn normalize_booleans(table: &Table) -> Table {
    table.map_cells(|v, _| normalize_boolean(v))
}

fn normalize_boolean(value: &CellValue) -> CellValue {
    let token = match value {
        CellValue::Bool(b) => Some(*b),
        CellValue::Int(1) => Some(true),
        CellValue::Int(0) => Some(false),
        CellValue::Float(f) if *f == 1.0 => Some(true),
        CellValue::Float(f) if *f == 0.0 => Some(false),
        CellValue::String(s) => {
            let s = s.trim();
            if TRUE_WORDS.contains(&s) {
                Some(true)
            } else if FALSE_WORDS.contains(&s) {
                Some(false)
            } else {
                None
            }
        }
        _ => None,
    };
    match token {
        Some(true) => CellValue::String(TRUE_TOKEN.to_string()),
        Some(false) => CellValue::String(FALSE_TOKEN.to_string()),
        None => value.clone(),
    }
}

/// Drop empty rows, then drop columns that are empty in every remaining row.
///
/// Rows go first so that a column is judged against the filtered rows.
#[must_use]
pub fn remove_empty_rows_and_cols(table: &Table) -> Table {
    let rows = table.filter_rows(|row| row.values().any(|v| !v.is_empty()));
    let keep: Vec<String> = rows
        .headers()
        .iter()
        .filter(|h| {
            rows.rows()
                .iter()
                .any(|row| row.get(h.as_str()).is_some_and(|v| !v.is_empty()))
        })
        .cloned()
        .collect();
    rows.select_headers(&keep)
}

/// Per-column statistics gathered by [`detect_anomalies`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnAnomaly {
    pub key: String,
    pub empty_rate: f64,
    pub mixed_type: bool,
}

/// Advisory findings about a table's data quality.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnomalyReport {
    pub columns: Vec<ColumnAnomaly>,
    pub issues: Vec<String>,
}

impl AnomalyReport {
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Flag sparse columns and columns mixing numbers with text.
///
/// Only the first `max_sample` rows are inspected. A column is reported when
/// more than 60% of its sampled cells are empty, or when it holds both
/// numeric-looking and non-numeric values.
#[must_use]
pub fn detect_anomalies(table: &Table, max_sample: usize) -> AnomalyReport {
    let sample = &table.rows()[..table.row_count().min(max_sample)];
    let mut report = AnomalyReport::default();

    for header in table.headers() {
        let mut empty = 0usize;
        let mut has_number = false;
        let mut has_text = false;
        for row in sample {
            match row.get(header) {
                None => empty += 1,
                Some(v) if v.is_empty() => empty += 1,
                Some(v) if v.is_numeric_like() => has_number = true,
                Some(_) => has_text = true,
            }
        }

        let empty_rate = if sample.is_empty() {
            0.0
        } else {
            empty as f64 / sample.len() as f64
        };
        let mixed_type = has_number && has_text;

        if empty_rate > 0.6 {
            report.issues.push(format!(
                "Column \"{header}\" has many empty values (about {:.0}%)",
                empty_rate * 100.0
            ));
        }
        if mixed_type {
            report.issues.push(format!(
                "Column \"{header}\" may have inconsistent formats (numbers mixed with text)"
            ));
        }
        report.columns.push(ColumnAnomaly {
            key: header.clone(),
            empty_rate,
            mixed_type,
        });
    }

    report
}

/// A named cleaning transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanStep {
    Garble,
    Trim,
    Booleans,
    Prune,
}

impl CleanStep {
    /// All steps in their recommended order.
    pub const ALL: [CleanStep; 4] = [
        CleanStep::Garble,
        CleanStep::Trim,
        CleanStep::Booleans,
        CleanStep::Prune,
    ];

    /// Apply this step, producing a fresh table
    #[must_use]
    pub fn apply(self, table: &Table) -> Table {
        match self {
            CleanStep::Garble => clean_garble(table),
            CleanStep::Trim => trim_cells(table),
            CleanStep::Booleans => normalize_booleans(table),
            CleanStep::Prune => remove_empty_rows_and_cols(table),
        }
    }

    /// Human-readable label, used for history entries
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CleanStep::Garble => "Fix garbled text",
            CleanStep::Trim => "Trim whitespace",
            CleanStep::Booleans => "Normalize booleans",
            CleanStep::Prune => "Remove empty rows and columns",
        }
    }
}

impl fmt::Display for CleanStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CleanStep::Garble => "garble",
            CleanStep::Trim => "trim",
            CleanStep::Booleans => "booleans",
            CleanStep::Prune => "prune",
        };
        write!(f, "{name}")
    }
}

impl FromStr for CleanStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "garble" => Ok(CleanStep::Garble),
            "trim" => Ok(CleanStep::Trim),
            "booleans" | "bool" => Ok(CleanStep::Booleans),
            "prune" | "empty" => Ok(CleanStep::Prune),
            other => Err(format!(
                "unknown clean step '{other}' (expected garble, trim, booleans or prune)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: Vec<Vec<CellValue>>) -> Table {
        Table::from_parts(headers, rows)
    }

    #[test]
    fn test_normalize_booleans_examples() {
        let t = table(
            &["v"],
            vec![
                vec![CellValue::from("YES")],
                vec![CellValue::Int(0)],
                vec![CellValue::from("maybe")],
                vec![CellValue::Bool(true)],
                vec![CellValue::Float(1.0)],
                vec![CellValue::Int(2)],
                vec![CellValue::from(" no ")],
            ],
        );
        let out = normalize_booleans(&t);
        let values: Vec<String> = out.rows().iter().map(|r| r["v"].as_str()).collect();
        assert_eq!(values, vec!["是", "否", "maybe", "是", "是", "2", "否"]);
    }

    #[test]
    fn test_trim_only_strings() {
        let t = table(&["a", "b"], vec![vec![CellValue::from("  x "), CellValue::Int(5)]]);
        let out = trim_cells(&t);
        assert_eq!(out.get(0, "a"), Some(&CellValue::from("x")));
        assert_eq!(out.get(0, "b"), Some(&CellValue::Int(5)));
    }

    #[test]
    fn test_clean_garble_cells() {
        let t = table(&["a"], vec![vec![CellValue::from("donâ€™t")]]);
        assert_eq!(clean_garble(&t).get(0, "a"), Some(&CellValue::from("don’t")));
    }

    #[test]
    fn test_remove_empty_rows_then_cols() {
        let t = table(
            &["a", "b", "c"],
            vec![
                vec![CellValue::from("1"), CellValue::from(""), CellValue::from("x")],
                vec![CellValue::Null, CellValue::from("  "), CellValue::from("")],
                vec![CellValue::from("2"), CellValue::Null, CellValue::from("")],
            ],
        );
        let out = remove_empty_rows_and_cols(&t);
        assert_eq!(out.headers(), &["a", "c"]);
        assert_eq!(out.row_count(), 2);
        assert_eq!(out.col_count(), 2);
        assert_eq!(remove_empty_rows_and_cols(&out), out);
    }

    #[test]
    fn test_column_judged_after_row_pruning() {
        let t = table(
            &["a", "b"],
            vec![
                vec![CellValue::from(""), CellValue::from("")],
                vec![CellValue::from("x"), CellValue::from("")],
            ],
        );
        let out = remove_empty_rows_and_cols(&t);
        assert_eq!(out.headers(), &["a"]);
        assert_eq!(out.row_count(), 1);
    }

    #[test]
    fn test_detect_anomalies() {
        let t = table(
            &["id", "notes", "qty"],
            vec![
                vec![CellValue::Int(1), CellValue::from(""), CellValue::from("3")],
                vec![CellValue::Int(2), CellValue::Null, CellValue::from("three")],
                vec![CellValue::Int(3), CellValue::from("ok"), CellValue::Float(4.0)],
            ],
        );
        let report = detect_anomalies(&t, 200);
        assert_eq!(report.columns.len(), 3);
        assert!(!report.columns[0].mixed_type);
        assert!((report.columns[1].empty_rate - 2.0 / 3.0).abs() < 1e-9);
        assert!(report.columns[2].mixed_type);
        assert_eq!(report.issues.len(), 2);
        assert!(report.issues[0].contains("notes"));
        assert!(report.issues[0].contains("67%"));
        assert!(report.issues[1].contains("qty"));
    }

    #[test]
    fn test_detect_anomalies_respects_sample() {
        let mut rows = vec![vec![CellValue::from("x")]; 3];
        rows.push(vec![CellValue::Int(9)]);
        let report = detect_anomalies(&table(&["a"], rows), 3);
        assert!(!report.columns[0].mixed_type);
        assert!(!report.has_issues());
    }

    #[test]
    fn test_step_parsing() {
        assert_eq!("Trim".parse::<CleanStep>().unwrap(), CleanStep::Trim);
        assert_eq!("bool".parse::<CleanStep>().unwrap(), CleanStep::Booleans);
        assert!("shuffle".parse::<CleanStep>().is_err());
        assert_eq!(CleanStep::Prune.to_string(), "prune");
    }
}
