//! Per-sheet original/result registry for one loaded workbook.

use crate::config::Config;
use crate::export::SheetLabeler;
use indexmap::IndexMap;
use tabtrans_sheet::{
    infer_header_row, CellValue, DecodedWorkbook, Grid, HeaderScanOptions, SheetBlock, Table,
};

/// The two tables tracked for a sheet.
///
/// `result` stays `None` until the sheet is edited or reset.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetEntry {
    pub original: Table,
    pub result: Option<Table>,
}

impl SheetEntry {
    fn from_grid(grid: &Grid, header: &HeaderScanOptions) -> Self {
        let header_row = infer_header_row(grid, header);
        Self {
            original: Table::from_grid(grid, header_row),
            result: None,
        }
    }

    /// The result, or the original when the sheet was never edited.
    pub fn current(&self) -> &Table {
        self.result.as_ref().unwrap_or(&self.original)
    }
}

/// Density score used to pick the initial sheet.
///
/// Counts non-empty cells plus ten points per non-empty row, over the first
/// `scan_rows` rows.
pub fn sheet_score(grid: &[Vec<CellValue>], scan_rows: usize) -> usize {
    grid.iter()
        .take(scan_rows)
        .map(|row| {
            let filled = row.iter().filter(|c| !c.is_empty()).count();
            if filled > 0 {
                filled + 10
            } else {
                0
            }
        })
        .sum()
}

/// Loaded workbook: raw grids, materialized sheets and the active sheet.
///
/// Edits land directly in the registry, so switching sheets never loses the
/// outgoing sheet's result.
#[derive(Debug, Clone, Default)]
pub struct WorkbookState {
    file_name: String,
    sheet_names: Vec<String>,
    grids: IndexMap<String, Grid>,
    entries: IndexMap<String, SheetEntry>,
    active: Option<String>,
    header: HeaderScanOptions,
    density_scan_rows: usize,
    result_suffix: String,
}

impl WorkbookState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current workbook with `decoded`.
    ///
    /// Every sheet is materialized in workbook order and the densest one
    /// becomes active. Ties keep the earlier sheet.
    pub fn load_workbook(&mut self, file_name: &str, decoded: DecodedWorkbook, config: &Config) {
        self.file_name = file_name.to_string();
        self.sheet_names = decoded.sheet_names;
        self.grids = decoded.grids;
        self.entries.clear();
        self.active = None;
        self.header = config.header.clone();
        self.density_scan_rows = config.workbook.density_scan_rows;
        self.result_suffix = config.workbook.result_suffix.clone();

        for name in &self.sheet_names {
            if let Some(grid) = self.grids.get(name) {
                self.entries
                    .insert(name.clone(), SheetEntry::from_grid(grid, &self.header));
            }
        }

        let mut best: Option<(&String, usize)> = None;
        for name in &self.sheet_names {
            let score = self
                .grids
                .get(name)
                .map_or(0, |g| sheet_score(g, self.density_scan_rows));
            if best.map_or(true, |(_, top)| score > top) {
                best = Some((name, score));
            }
        }
        let best = best.map(|(name, score)| {
            tracing::debug!(sheet = %name, score, "selected initial sheet");
            name.clone()
        });

        if let Some(name) = best {
            self.set_active_sheet(&name);
        }
        tracing::info!(
            file = %self.file_name,
            sheets = self.sheet_names.len(),
            active = ?self.active,
            "workbook loaded"
        );
    }

    /// Activate `name`, materializing it from its grid if needed.
    ///
    /// Returns `false` and changes nothing when the sheet does not exist.
    pub fn set_active_sheet(&mut self, name: &str) -> bool {
        if !self.entries.contains_key(name) {
            let Some(grid) = self.grids.get(name) else {
                tracing::debug!(sheet = name, "ignoring switch to unknown sheet");
                return false;
            };
            let entry = SheetEntry::from_grid(grid, &self.header);
            self.entries.insert(name.to_string(), entry);
        }
        self.active = Some(name.to_string());
        true
    }

    /// Store `table` as the active sheet's result. No-op without an active sheet.
    pub fn set_result(&mut self, table: Table) -> bool {
        match self.active_entry_mut() {
            Some(entry) => {
                entry.result = Some(table);
                true
            }
            None => false,
        }
    }

    /// Replace the active result with a fresh copy of the original.
    pub fn reset_result(&mut self) -> bool {
        match self.active_entry_mut() {
            Some(entry) => {
                entry.result = Some(entry.original.clone());
                true
            }
            None => false,
        }
    }

    /// Every materialized sheet's result, in workbook order.
    pub fn results(&self) -> IndexMap<String, Option<Table>> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.result.clone()))
            .collect()
    }

    /// Install previously captured results. Sheets missing from `results`
    /// lose their edits.
    pub fn restore_results(&mut self, results: &IndexMap<String, Option<Table>>) {
        for (name, entry) in &mut self.entries {
            entry.result = results.get(name).cloned().flatten();
        }
    }

    /// Original then result block for every sheet, in workbook order.
    pub fn export_all(&self) -> Vec<SheetBlock> {
        let mut labeler = SheetLabeler::new(self.result_suffix.clone());
        let mut blocks = Vec::with_capacity(self.sheet_names.len() * 2);

        for name in &self.sheet_names {
            let Some(entry) = self.entries.get(name) else {
                continue;
            };
            blocks.push(SheetBlock {
                label: labeler.original_label(name),
                grid: entry.original.to_grid(),
            });
            blocks.push(SheetBlock {
                label: labeler.result_label(name),
                grid: entry.current().to_grid(),
            });
        }
        blocks
    }

    pub fn is_loaded(&self) -> bool {
        !self.sheet_names.is_empty()
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn sheet_names(&self) -> &[String] {
        &self.sheet_names
    }

    pub fn active_sheet_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn entry(&self, name: &str) -> Option<&SheetEntry> {
        self.entries.get(name)
    }

    pub fn grid(&self, name: &str) -> Option<&Grid> {
        self.grids.get(name)
    }

    /// Original table of the active sheet.
    pub fn original(&self) -> Option<&Table> {
        self.active_entry().map(|e| &e.original)
    }

    /// Result table of the active sheet; the original if never edited.
    pub fn result(&self) -> Option<&Table> {
        self.active_entry().map(SheetEntry::current)
    }

    fn active_entry(&self) -> Option<&SheetEntry> {
        self.active.as_ref().and_then(|name| self.entries.get(name))
    }

    fn active_entry_mut(&mut self) -> Option<&mut SheetEntry> {
        let name = self.active.as_ref()?;
        self.entries.get_mut(name)
    }
}
