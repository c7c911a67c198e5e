//! Naming rules for exported workbooks and their sheets.

use std::collections::HashSet;
use tabtrans_sheet::MAX_SHEET_NAME_CHARS;

const FORBIDDEN: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];
const FALLBACK_SHEET: &str = "Sheet";
const FALLBACK_STEM: &str = "result";

fn take_chars(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

/// Make `name` acceptable as a worksheet name.
///
/// Forbidden characters become `_`, blank names become `Sheet`, and the
/// result is capped at 31 characters.
pub fn sanitize_sheet_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if FORBIDDEN.contains(&c) { '_' } else { c })
        .collect();
    if cleaned.trim().is_empty() {
        return FALLBACK_SHEET.to_string();
    }
    take_chars(&cleaned, MAX_SHEET_NAME_CHARS)
}

/// Output file name: the input stem plus `_result.xlsx`.
pub fn result_file_name(file_name: &str) -> String {
    let lower = file_name.to_lowercase();
    let stem = [".xlsx", ".xls", ".csv"]
        .iter()
        .find(|ext| lower.ends_with(*ext))
        .map_or(file_name, |ext| &file_name[..file_name.len() - ext.len()]);
    let stem = if stem.is_empty() { FALLBACK_STEM } else { stem };
    format!("{stem}_result.xlsx")
}

/// Hands out unique worksheet labels for an export.
///
/// Excel compares sheet names case-insensitively, so uniqueness is checked
/// the same way. A colliding label is shortened and suffixed `~2`, `~3`, ...
#[derive(Debug, Clone)]
pub struct SheetLabeler {
    suffix: String,
    used: HashSet<String>,
}

impl SheetLabeler {
    pub fn new(result_suffix: impl Into<String>) -> Self {
        Self {
            suffix: result_suffix.into(),
            used: HashSet::new(),
        }
    }

    /// Label for a sheet's original copy.
    pub fn original_label(&mut self, sheet_name: &str) -> String {
        let label = sanitize_sheet_name(sheet_name);
        self.claim(label)
    }

    /// Label for a sheet's result copy: the base shortened to leave room for the suffix.
    pub fn result_label(&mut self, sheet_name: &str) -> String {
        let base = sanitize_sheet_name(sheet_name);
        let suffix = take_chars(&self.suffix, MAX_SHEET_NAME_CHARS);
        let room = MAX_SHEET_NAME_CHARS - suffix.chars().count();
        let label = format!("{}{}", take_chars(&base, room), suffix);
        self.claim(label)
    }

    fn claim(&mut self, label: String) -> String {
        let mut candidate = label.clone();
        let mut n = 2;
        while self.used.contains(&candidate.to_lowercase()) {
            let marker = format!("~{n}");
            let room = MAX_SHEET_NAME_CHARS - marker.chars().count();
            candidate = format!("{}{marker}", take_chars(&label, room));
            n += 1;
        }
        self.used.insert(candidate.to_lowercase());
        candidate
    }
}
