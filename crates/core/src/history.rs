//! Linear undo/redo log of labelled state snapshots.

use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

/// A captured state with a label and capture time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySnapshot<T> {
    pub id: Uuid,
    pub label: String,
    pub timestamp: DateTime<Local>,
    pub payload: T,
}

impl<T> HistorySnapshot<T> {
    /// Wall-clock capture time as `HH:MM:SS`.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M:%S").to_string()
    }
}

/// Snapshot list with a cursor.
///
/// `pointer` is `None` only while the log is empty. Pushing after an undo
/// discards the snapshots past the cursor. Payloads are cloned on the way in
/// and on the way out, so callers never share state with the log.
#[derive(Debug, Clone)]
pub struct HistoryLog<T> {
    items: Vec<HistorySnapshot<T>>,
    pointer: Option<usize>,
}

impl<T> Default for HistoryLog<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pointer: None,
        }
    }
}

impl<T: Clone> HistoryLog<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `state` after the cursor and move the cursor to it.
    pub fn push(&mut self, label: impl Into<String>, state: &T) -> Uuid {
        if let Some(p) = self.pointer {
            self.items.truncate(p + 1);
        }
        let snapshot = HistorySnapshot {
            id: Uuid::new_v4(),
            label: label.into(),
            timestamp: Local::now(),
            payload: state.clone(),
        };
        let id = snapshot.id;
        self.items.push(snapshot);
        self.pointer = Some(self.items.len() - 1);
        id
    }

    /// Move the cursor to the snapshot `id`. Unknown ids are ignored.
    pub fn jump_to(&mut self, id: Uuid) -> Option<T> {
        let idx = self.items.iter().position(|s| s.id == id)?;
        self.pointer = Some(idx);
        Some(self.items[idx].payload.clone())
    }

    pub fn undo(&mut self) -> Option<T> {
        let p = self.pointer.filter(|p| *p > 0)? - 1;
        self.pointer = Some(p);
        Some(self.items[p].payload.clone())
    }

    pub fn redo(&mut self) -> Option<T> {
        let p = self.pointer.filter(|p| p + 1 < self.items.len())? + 1;
        self.pointer = Some(p);
        Some(self.items[p].payload.clone())
    }

    pub fn can_undo(&self) -> bool {
        self.pointer.is_some_and(|p| p > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.pointer.is_some_and(|p| p + 1 < self.items.len())
    }

    pub fn items(&self) -> &[HistorySnapshot<T>] {
        &self.items
    }

    pub fn pointer(&self) -> Option<usize> {
        self.pointer
    }

    pub fn active(&self) -> Option<&HistorySnapshot<T>> {
        self.pointer.and_then(|p| self.items.get(p))
    }

    pub fn active_id(&self) -> Option<Uuid> {
        self.active().map(|s| s.id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.pointer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payloads(log: &HistoryLog<&'static str>) -> Vec<&'static str> {
        log.items().iter().map(|s| s.payload).collect()
    }

    #[test]
    fn test_push_after_undo_truncates_branch() {
        let mut log = HistoryLog::new();
        log.push("a", &"A");
        log.push("b", &"B");
        assert_eq!(log.undo(), Some("A"));
        log.push("c", &"C");

        assert_eq!(payloads(&log), vec!["A", "C"]);
        assert_eq!(log.pointer(), Some(1));
        assert!(!log.can_redo());
    }

    #[test]
    fn test_undo_redo_bounds() {
        let mut log: HistoryLog<i32> = HistoryLog::new();
        assert_eq!(log.undo(), None);
        assert_eq!(log.redo(), None);
        assert_eq!(log.pointer(), None);

        log.push("one", &1);
        assert!(!log.can_undo());
        assert_eq!(log.undo(), None);

        log.push("two", &2);
        assert!(log.can_undo());
        assert_eq!(log.undo(), Some(1));
        assert!(log.can_redo());
        assert_eq!(log.redo(), Some(2));
        assert_eq!(log.redo(), None);
        assert_eq!(log.pointer(), Some(1));
    }

    #[test]
    fn test_jump_to() {
        let mut log = HistoryLog::new();
        let first = log.push("first", &"x");
        log.push("second", &"y");
        log.push("third", &"z");

        assert_eq!(log.jump_to(first), Some("x"));
        assert_eq!(log.active_id(), Some(first));
        assert_eq!(log.len(), 3);

        assert_eq!(log.jump_to(Uuid::new_v4()), None);
        assert_eq!(log.pointer(), Some(0));

        log.push("branch", &"w");
        assert_eq!(payloads(&log), vec!["x", "w"]);
    }

    #[test]
    fn test_payload_is_copied() {
        let mut log = HistoryLog::new();
        let mut state = vec![1, 2];
        log.push("init", &state);
        state.push(3);
        log.push("grown", &state);

        let mut restored = log.undo().unwrap();
        restored.push(99);
        assert_eq!(log.items()[0].payload, vec![1, 2]);
    }

    #[test]
    fn test_clear_and_time_label() {
        let mut log = HistoryLog::new();
        log.push("x", &0u8);
        assert_eq!(log.active().unwrap().time_label().len(), 8);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.active_id(), None);
    }
}
