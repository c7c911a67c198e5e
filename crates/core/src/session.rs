//! Editing session: a loaded workbook plus its undo history.

use crate::config::{Config, TranslationOptions};
use crate::error::{TabError, TabResult};
use crate::export::result_file_name;
use crate::history::HistoryLog;
use crate::workbook::WorkbookState;
use indexmap::IndexMap;
use serde::Serialize;
use tabtrans_sheet::{
    build_summary, detect_anomalies, AnomalyReport, CleanStep, DecodedWorkbook, Encoder,
    SheetBlock, Table, TableSummary, XlsxEncoder,
};
use tabtrans_translate::lang::DEFAULT_SAMPLE_SIZE;
use tabtrans_translate::{
    apply_translations, classify_batch, collect_texts, BatchRequest, BatchStats, KvStore, Lang,
    TranslationEngine,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Editable state captured by the history log: the active sheet and every
/// sheet's result (`None` for sheets never edited).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub active_sheet: Option<String>,
    pub results: IndexMap<String, Option<Table>>,
}

/// What to translate in the active sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslateRequest {
    /// `None` detects the source language from the sheet text
    pub from: Option<Lang>,
    pub to: Lang,
    /// Restrict translation to these headers
    pub columns: Option<Vec<String>>,
}

impl TranslateRequest {
    pub fn from_options(options: &TranslationOptions) -> TabResult<Self> {
        Ok(Self {
            from: options.source_lang()?,
            to: options.target_lang()?,
            columns: None,
        })
    }

    #[must_use]
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = Some(columns);
        self
    }
}

/// Result of [`Session::translate`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslateReport {
    pub from: Lang,
    pub to: Lang,
    pub stats: BatchStats,
    pub cancelled: bool,
}

#[derive(Debug, Default)]
pub struct Session {
    config: Config,
    workbook: WorkbookState,
    history: HistoryLog<SessionSnapshot>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            workbook: WorkbookState::new(),
            history: HistoryLog::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn workbook(&self) -> &WorkbookState {
        &self.workbook
    }

    pub fn history(&self) -> &HistoryLog<SessionSnapshot> {
        &self.history
    }

    /// Load `decoded` as the session's workbook and start a fresh history.
    pub fn open(&mut self, file_name: &str, decoded: DecodedWorkbook) -> Uuid {
        self.workbook.load_workbook(file_name, decoded, &self.config);
        self.history.clear();
        self.record("Open")
    }

    /// Activate another sheet. Unknown sheets are ignored.
    pub fn switch_sheet(&mut self, name: &str) -> bool {
        if self.workbook.active_sheet_name() == Some(name) {
            return true;
        }
        if !self.workbook.set_active_sheet(name) {
            return false;
        }
        self.record(format!("Switch to {name}"));
        true
    }

    pub fn apply_step(&mut self, step: CleanStep) -> TabResult<()> {
        let cleaned = step.apply(self.current()?);
        self.workbook.set_result(cleaned);
        self.record(step.label());
        Ok(())
    }

    /// Apply each step in order, one history entry per step.
    pub fn apply_steps(&mut self, steps: &[CleanStep]) -> TabResult<()> {
        steps.iter().try_for_each(|step| self.apply_step(*step))
    }

    /// Translate the active result in place.
    ///
    /// Partial results are applied when the batch is cancelled.
    pub async fn translate<S, F>(
        &mut self,
        engine: &mut TranslationEngine<S>,
        request: &TranslateRequest,
        cancel: &CancellationToken,
        on_progress: F,
    ) -> TabResult<TranslateReport>
    where
        S: KvStore,
        F: FnMut(usize, usize) + Send,
    {
        let table = self.current()?.clone();
        let columns = request.columns.as_deref();
        let texts = collect_texts(&table, columns);

        let from = request
            .from
            .unwrap_or_else(|| classify_batch(&texts, DEFAULT_SAMPLE_SIZE));
        tracing::debug!(%from, to = %request.to, strings = texts.len(), "translating sheet");

        let batch = BatchRequest {
            texts,
            from,
            to: request.to,
        };
        let outcome = engine.translate_batch(&batch, cancel, on_progress).await;

        let translated = apply_translations(&table, &outcome.map, columns);
        self.workbook.set_result(translated);
        self.record(format!("Translate {from} -> {}", request.to));

        Ok(TranslateReport {
            from,
            to: request.to,
            stats: outcome.stats,
            cancelled: outcome.cancelled,
        })
    }

    /// Restore the active sheet's result to its original.
    pub fn reset(&mut self) -> bool {
        if !self.workbook.reset_result() {
            return false;
        }
        self.record("Reset");
        true
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => self.restore(snapshot),
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => self.restore(snapshot),
            None => false,
        }
    }

    pub fn jump_to(&mut self, id: Uuid) -> bool {
        match self.history.jump_to(id) {
            Some(snapshot) => self.restore(snapshot),
            None => false,
        }
    }

    pub fn anomalies(&self) -> Option<AnomalyReport> {
        self.workbook
            .result()
            .map(|t| detect_anomalies(t, self.config.anomaly.max_sample))
    }

    pub fn summary(&self) -> Option<TableSummary> {
        self.workbook.result().map(build_summary)
    }

    pub fn export_all(&self) -> TabResult<Vec<SheetBlock>> {
        if !self.workbook.is_loaded() {
            return Err(TabError::NoWorkbook);
        }
        Ok(self.workbook.export_all())
    }

    /// Encoded workbook and its file name.
    pub fn export_xlsx(&self) -> TabResult<(String, Vec<u8>)> {
        let blocks = self.export_all()?;
        let bytes = XlsxEncoder.encode(&blocks)?;
        Ok((result_file_name(self.workbook.file_name()), bytes))
    }

    fn current(&self) -> TabResult<&Table> {
        self.workbook.result().ok_or(TabError::NoWorkbook)
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            active_sheet: self.workbook.active_sheet_name().map(str::to_string),
            results: self.workbook.results(),
        }
    }

    fn record(&mut self, label: impl Into<String>) -> Uuid {
        let snapshot = self.snapshot();
        self.history.push(label, &snapshot)
    }

    fn restore(&mut self, snapshot: SessionSnapshot) -> bool {
        if let Some(name) = &snapshot.active_sheet {
            self.workbook.set_active_sheet(name);
        }
        self.workbook.restore_results(&snapshot.results);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabtrans_sheet::{CellValue, Grid};

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|r| r.iter().map(|c| CellValue::from(*c)).collect())
            .collect()
    }

    fn session() -> Session {
        let mut session = Session::new(Config::default());
        session.open(
            "people.csv",
            DecodedWorkbook {
                sheet_names: vec!["Sheet1".to_string()],
                grids: [(
                    "Sheet1".to_string(),
                    grid(&[&["Name", "Active"], &[" Alice ", "yes"], &["", ""]]),
                )]
                .into_iter()
                .collect(),
            },
        );
        session
    }

    #[test]
    fn test_open_records_snapshot() {
        let session = session();
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().items()[0].label, "Open");
        assert!(!session.history().can_undo());
    }

    #[test]
    fn test_steps_undo_redo() {
        let mut session = session();
        session
            .apply_steps(&[CleanStep::Trim, CleanStep::Booleans])
            .unwrap();
        assert_eq!(session.history().len(), 3);
        let result = session.workbook().result().unwrap();
        assert_eq!(result.get(0, "Name"), Some(&CellValue::from("Alice")));
        assert_eq!(result.get(0, "Active"), Some(&CellValue::from("是")));

        assert!(session.undo());
        let result = session.workbook().result().unwrap();
        assert_eq!(result.get(0, "Active"), Some(&CellValue::from("yes")));
        assert_eq!(result.get(0, "Name"), Some(&CellValue::from("Alice")));

        assert!(session.undo());
        assert!(!session.undo());
        assert_eq!(
            session.workbook().result().unwrap().get(0, "Name"),
            Some(&CellValue::from(" Alice "))
        );

        assert!(session.redo());
        assert!(session.redo());
        assert!(!session.redo());
        assert_eq!(
            session.workbook().result().unwrap().get(0, "Active"),
            Some(&CellValue::from("是"))
        );
    }

    #[test]
    fn test_reset_and_jump() {
        let mut session = session();
        let open_id = session.history().active_id().unwrap();
        session.apply_step(CleanStep::Prune).unwrap();
        assert_eq!(session.workbook().result().unwrap().row_count(), 1);

        assert!(session.reset());
        assert_eq!(session.workbook().result().unwrap().row_count(), 2);
        assert_eq!(session.history().items().last().unwrap().label, "Reset");

        assert!(session.jump_to(open_id));
        assert_eq!(session.history().pointer(), Some(0));
        assert!(!session.jump_to(Uuid::new_v4()));
    }

    #[test]
    fn test_unopened_session() {
        let mut session = Session::new(Config::default());
        assert!(matches!(
            session.apply_step(CleanStep::Trim),
            Err(TabError::NoWorkbook)
        ));
        assert!(matches!(session.export_all(), Err(TabError::NoWorkbook)));
        assert!(!session.reset());
        assert!(!session.undo());
        assert!(session.summary().is_none());
    }

    #[test]
    fn test_export_name_and_blocks() {
        let session = session();
        let blocks = session.export_all().unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].label, "Sheet1_result");

        let (name, bytes) = session.export_xlsx().unwrap();
        assert_eq!(name, "people_result.xlsx");
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_anomalies_follow_result() {
        let mut session = session();
        let report = session.anomalies().unwrap();
        assert_eq!(report.columns.len(), 2);
        session.apply_step(CleanStep::Prune).unwrap();
        assert!(session.summary().unwrap().summary_text.starts_with("1 rows"));
    }
}
