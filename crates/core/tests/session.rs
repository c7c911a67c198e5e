//! End-to-end session flows: load, clean, translate, undo, export.

use async_trait::async_trait;
use std::time::Duration;
use tabtrans_core::{load_bytes, load_file, Config, Session, TranslateRequest};
use tabtrans_sheet::{CellValue, CleanStep, Decoder, WorkbookDecoder};
use tabtrans_translate::{
    EngineConfig, Lang, MemoryStore, ProviderError, ProviderSlot, TranslationCache,
    TranslationEngine, TranslationProvider,
};
use tokio_util::sync::CancellationToken;

/// Translates a tiny fixed vocabulary and fails on anything else.
struct Glossary;

#[async_trait]
impl TranslationProvider for Glossary {
    fn name(&self) -> &str {
        "glossary"
    }

    async fn translate_one(&self, text: &str, _from: Lang, to: Lang) -> Result<String, ProviderError> {
        match (text, to) {
            ("Apple", Lang::Zh) => Ok("苹果".to_string()),
            ("Pear", Lang::Zh) => Ok("梨".to_string()),
            ("The fruit basket is full", Lang::Zh) => Ok("水果篮满了".to_string()),
            _ => Err(ProviderError::Status { code: 500 }),
        }
    }
}

fn engine() -> TranslationEngine<MemoryStore> {
    TranslationEngine::new(
        vec![ProviderSlot::new(Glossary, 1)],
        TranslationCache::new(MemoryStore::new()),
        EngineConfig {
            backoff_unit: Duration::ZERO,
            pause_every: 50,
            pause: Duration::ZERO,
        },
    )
}

const FRUIT_CSV: &[u8] =
    b"Fruit report,,\nItem,Qty,Note\nApple,3,The fruit basket is full\nPear,5,\n";

#[tokio::test]
async fn test_translate_then_undo() {
    let decoded = load_bytes(FRUIT_CSV, "fruit.csv", |_| {}).await.unwrap();
    let mut session = Session::new(Config::default());
    session.open("fruit.csv", decoded);

    let original = session.workbook().original().unwrap().clone();
    assert_eq!(original.headers(), &["Item", "Qty", "Note"]);

    let request = TranslateRequest {
        from: None,
        to: Lang::Zh,
        columns: None,
    };
    let report = session
        .translate(&mut engine(), &request, &CancellationToken::new(), |_, _| {})
        .await
        .unwrap();

    assert_eq!(report.from, Lang::En);
    assert_eq!(report.stats.total, 3);
    assert_eq!(report.stats.api_ok, 3);
    assert!(!report.cancelled);

    let result = session.workbook().result().unwrap();
    assert_eq!(result.get(0, "Item"), Some(&CellValue::from("苹果")));
    assert_eq!(result.get(1, "Item"), Some(&CellValue::from("梨")));
    assert_eq!(result.get(0, "Note"), Some(&CellValue::from("水果篮满了")));
    assert_eq!(result.get(0, "Qty"), original.get(0, "Qty"));
    assert_eq!(session.workbook().original(), Some(&original));

    assert!(session.undo());
    assert_eq!(session.workbook().result(), Some(&original));
}

#[tokio::test]
async fn test_translate_selected_columns() {
    let decoded = load_bytes(FRUIT_CSV, "fruit.csv", |_| {}).await.unwrap();
    let mut session = Session::new(Config::default());
    session.open("fruit.csv", decoded);

    let request = TranslateRequest {
        from: Some(Lang::En),
        to: Lang::Zh,
        columns: None,
    }
    .with_columns(vec!["Item".to_string()]);
    let report = session
        .translate(&mut engine(), &request, &CancellationToken::new(), |_, _| {})
        .await
        .unwrap();

    assert_eq!(report.stats.total, 2);
    let result = session.workbook().result().unwrap();
    assert_eq!(result.get(0, "Item"), Some(&CellValue::from("苹果")));
    assert_eq!(
        result.get(0, "Note"),
        Some(&CellValue::from("The fruit basket is full"))
    );
}

#[tokio::test]
async fn test_failed_strings_keep_source() {
    let decoded = WorkbookDecoder::default()
        .decode(b"Item\nKiwi\nApple\n", "basket.csv")
        .unwrap();
    let mut session = Session::new(Config::default());
    session.open("basket.csv", decoded);

    let request = TranslateRequest {
        from: Some(Lang::En),
        to: Lang::Zh,
        columns: None,
    };
    let report = session
        .translate(&mut engine(), &request, &CancellationToken::new(), |_, _| {})
        .await
        .unwrap();

    assert_eq!(report.stats.api_fail, 1);
    let result = session.workbook().result().unwrap();
    assert_eq!(result.get(0, "Item"), Some(&CellValue::from("Kiwi")));
    assert_eq!(result.get(1, "Item"), Some(&CellValue::from("苹果")));
}

#[tokio::test]
async fn test_history_restores_sheet_selection() {
    let mut session = Session::new(Config::default());
    let decoded = tabtrans_sheet::DecodedWorkbook {
        sheet_names: vec!["Notes".to_string(), "Data".to_string()],
        grids: [
            ("Notes".to_string(), vec![vec![CellValue::from("todo")]]),
            (
                "Data".to_string(),
                vec![
                    vec![CellValue::from("k"), CellValue::from("v")],
                    vec![CellValue::from(" a "), CellValue::from("1")],
                ],
            ),
        ]
        .into_iter()
        .collect(),
    };
    session.open("multi.xlsx", decoded);
    assert_eq!(session.workbook().active_sheet_name(), Some("Data"));

    session.apply_step(CleanStep::Trim).unwrap();
    assert!(session.switch_sheet("Notes"));
    assert!(!session.switch_sheet("Nope"));
    assert_eq!(session.history().len(), 3);

    assert!(session.undo());
    assert_eq!(session.workbook().active_sheet_name(), Some("Data"));
    assert_eq!(
        session.workbook().result().unwrap().get(0, "k"),
        Some(&CellValue::from("a"))
    );
}

#[tokio::test]
async fn test_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Inventory.CSV");
    std::fs::write(&input, "sku,label\n1,  widget \n").unwrap();

    let mut progress = Vec::new();
    let decoded = load_file(&input, |p| progress.push(p)).await.unwrap();
    assert_eq!(progress.last(), Some(&100));

    let mut session = Session::new(Config::default());
    session.open("Inventory.CSV", decoded);
    session.apply_step(CleanStep::Trim).unwrap();

    let (name, bytes) = session.export_xlsx().unwrap();
    assert_eq!(name, "Inventory_result.xlsx");
    let output = dir.path().join(&name);
    std::fs::write(&output, &bytes).unwrap();

    let reloaded = load_file(&output, |_| {}).await.unwrap();
    assert_eq!(reloaded.sheet_names, vec!["Sheet1", "Sheet1_result"]);
    let result_grid = &reloaded.grids["Sheet1_result"];
    assert_eq!(result_grid[1][1], CellValue::from("widget"));
    let original_grid = &reloaded.grids["Sheet1"];
    assert_eq!(original_grid[1][1], CellValue::from("  widget "));
}

#[test]
fn test_history_reverts_every_sheet() {
    let mut session = Session::new(Config::default());
    let decoded = tabtrans_sheet::DecodedWorkbook {
        sheet_names: vec!["Main".to_string(), "Other".to_string()],
        grids: [
            (
                "Main".to_string(),
                vec![
                    vec![CellValue::from("a"), CellValue::from("b")],
                    vec![CellValue::from("1"), CellValue::from("2")],
                    vec![CellValue::from("3"), CellValue::from("4")],
                ],
            ),
            (
                "Other".to_string(),
                vec![
                    vec![CellValue::from("K"), CellValue::from("V")],
                    vec![CellValue::from(" pad "), CellValue::from("x")],
                ],
            ),
        ]
        .into_iter()
        .collect(),
    };
    let open_id = session.open("two.xlsx", decoded);
    assert_eq!(session.workbook().active_sheet_name(), Some("Main"));

    assert!(session.switch_sheet("Other"));
    session.apply_step(CleanStep::Trim).unwrap();
    assert!(session.switch_sheet("Main"));
    let trimmed = session.workbook().entry("Other").unwrap().current().clone();
    assert_eq!(trimmed.get(0, "K"), Some(&CellValue::from("pad")));

    assert!(session.jump_to(open_id));
    assert_eq!(session.workbook().active_sheet_name(), Some("Main"));
    let other = session.workbook().entry("Other").unwrap();
    assert!(other.result.is_none());
    assert_eq!(other.current().get(0, "K"), Some(&CellValue::from(" pad ")));

    let blocks = session.export_all().unwrap();
    assert_eq!(blocks[3].label, "Other_result");
    assert_eq!(blocks[3].grid[1][0], CellValue::from(" pad "));

    // redo walks forward through the other sheet's edit again
    assert!(session.redo());
    assert!(session.redo());
    assert_eq!(session.workbook().active_sheet_name(), Some("Other"));
    assert_eq!(
        session.workbook().result().unwrap().get(0, "K"),
        Some(&CellValue::from("pad"))
    );
}
