use crate::cell::CellValue;
use crate::clean::{detect_anomalies, AnomalyReport};
use crate::table::Table;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const SUMMARY_SAMPLE: usize = 300;
const ANOMALY_SAMPLE: usize = 200;
const KEY_WORDS: &[&str] = &[
    "名称", "name", "id", "编号", "金额", "amount", "价格", "price", "日期", "date", "时间", "time",
];

/// Inferred kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Number,
    Date,
    Text,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub key: String,
    pub unique_rate: f64,
    pub kind: ColumnKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub key: String,
    pub sum: Option<f64>,
    pub avg: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub key: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

/// Overview of a table: shape, key columns, numeric/date profiles and issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub row_count: usize,
    pub col_count: usize,
    pub columns: Vec<ColumnProfile>,
    pub key_columns: Vec<String>,
    pub numeric_cols: Vec<String>,
    pub date_cols: Vec<String>,
    pub numeric_stats: Vec<NumericStats>,
    pub date_ranges: Vec<DateRange>,
    pub anomaly: AnomalyReport,
    pub summary_text: String,
}

/// Profile a table from its first 300 records.
#[must_use]
pub fn build_summary(table: &Table) -> TableSummary {
    let sample = &table.rows()[..table.row_count().min(SUMMARY_SAMPLE)];

    let columns: Vec<ColumnProfile> = table
        .headers()
        .iter()
        .map(|h| {
            let values: Vec<&CellValue> = sample.iter().filter_map(|r| r.get(h)).collect();
            let distinct: HashSet<String> =
                values.iter().map(|v| v.as_str().trim().to_string()).collect();
            let unique_rate = if values.is_empty() {
                0.0
            } else {
                distinct.len() as f64 / values.len() as f64
            };
            ColumnProfile {
                key: h.clone(),
                unique_rate,
                kind: guess_kind(&values),
            }
        })
        .collect();

    let keyword_hits = columns.iter().filter(|c| {
        let lower = c.key.to_lowercase();
        KEY_WORDS.iter().any(|k| lower.contains(k))
    });
    let id_like = columns.iter().filter(|c| c.unique_rate > 0.85);
    let mut key_columns: Vec<String> = Vec::new();
    for c in keyword_hits.chain(id_like) {
        if key_columns.len() < 6 && !key_columns.contains(&c.key) {
            key_columns.push(c.key.clone());
        }
    }

    let numeric_cols: Vec<String> = columns
        .iter()
        .filter(|c| c.kind == ColumnKind::Number)
        .map(|c| c.key.clone())
        .collect();
    let date_cols: Vec<String> = columns
        .iter()
        .filter(|c| c.kind == ColumnKind::Date)
        .map(|c| c.key.clone())
        .collect();

    let numeric_stats = numeric_cols
        .iter()
        .take(8)
        .map(|k| {
            let nums: Vec<f64> = sample
                .iter()
                .filter_map(|r| r.get(k))
                .filter_map(CellValue::as_float)
                .filter(|f| f.is_finite())
                .collect();
            if nums.is_empty() {
                return NumericStats {
                    key: k.clone(),
                    sum: None,
                    avg: None,
                    min: None,
                    max: None,
                };
            }
            let sum: f64 = nums.iter().sum();
            NumericStats {
                key: k.clone(),
                sum: Some(sum),
                avg: Some(sum / nums.len() as f64),
                min: nums.iter().copied().reduce(f64::min),
                max: nums.iter().copied().reduce(f64::max),
            }
        })
        .collect();

    let date_ranges = date_cols
        .iter()
        .take(6)
        .map(|k| {
            let dates: Vec<NaiveDateTime> = sample
                .iter()
                .filter_map(|r| r.get(k))
                .filter_map(as_date)
                .collect();
            DateRange {
                key: k.clone(),
                start: dates.iter().min().copied(),
                end: dates.iter().max().copied(),
            }
        })
        .collect();

    let anomaly = detect_anomalies(table, ANOMALY_SAMPLE);

    let mut parts = vec![format!(
        "{} rows and {} columns.",
        table.row_count(),
        table.col_count()
    )];
    if !key_columns.is_empty() {
        parts.push(format!("Key columns: {}.", key_columns.join(", ")));
    }
    if !numeric_cols.is_empty() {
        parts.push(format!(
            "{} numeric columns (e.g. {}).",
            numeric_cols.len(),
            first_three(&numeric_cols)
        ));
    }
    if !date_cols.is_empty() {
        parts.push(format!(
            "{} date columns (e.g. {}).",
            date_cols.len(),
            first_three(&date_cols)
        ));
    }
    if anomaly.has_issues() {
        parts.push(format!(
            "Potential issues: {}.",
            anomaly.issues.iter().take(3).cloned().collect::<Vec<_>>().join("; ")
        ));
    }

    TableSummary {
        row_count: table.row_count(),
        col_count: table.col_count(),
        columns,
        key_columns,
        numeric_cols,
        date_cols,
        numeric_stats,
        date_ranges,
        anomaly,
        summary_text: parts.join(" "),
    }
}

fn first_three(names: &[String]) -> String {
    names.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
}

fn guess_kind(values: &[&CellValue]) -> ColumnKind {
    let (mut n_num, mut n_date, mut n_text) = (0usize, 0usize, 0usize);
    for v in values.iter().filter(|v| !v.is_empty()) {
        match v {
            CellValue::Date(_) => n_date += 1,
            v if v.is_numeric_like() => n_num += 1,
            CellValue::String(s) if parse_date_text(s).is_some() => n_date += 1,
            _ => n_text += 1,
        }
    }
    if n_num + n_date + n_text == 0 {
        ColumnKind::Text
    } else if n_num >= n_text && n_num >= n_date {
        ColumnKind::Number
    } else if n_date >= n_text {
        ColumnKind::Date
    } else {
        ColumnKind::Text
    }
}

fn as_date(value: &CellValue) -> Option<NaiveDateTime> {
    match value {
        CellValue::Date(dt) => Some(*dt),
        CellValue::String(s) => parse_date_text(s),
        _ => None,
    }
}

/// Parse common date spellings; requires a date separator so plain words never match.
fn parse_date_text(s: &str) -> Option<NaiveDateTime> {
    const DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
    const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y年%m月%d日", "%m/%d/%Y"];

    let s = s.trim();
    if !s.contains(['-', '/', '年', '月', '日']) {
        return None;
    }
    DATE_TIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(s, f).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
