//! Async workbook loading with coarse progress reporting.

use crate::error::TabResult;
use std::path::Path;
use tabtrans_sheet::{DecodedWorkbook, Decoder, WorkbookDecoder};

/// Decode `bytes` as the workbook `file_name`.
///
/// `progress` receives percentages: 25 before decoding, 60 to 90 while
/// walking the sheets, 92 before the caller materializes tables, and 100 once
/// loading is done.
pub async fn load_bytes<F>(bytes: &[u8], file_name: &str, mut progress: F) -> TabResult<DecodedWorkbook>
where
    F: FnMut(u8),
{
    progress(25);
    tokio::task::yield_now().await;

    let decoded = WorkbookDecoder::default().decode(bytes, file_name)?;

    let n = decoded.sheet_names.len();
    for (i, name) in decoded.sheet_names.iter().enumerate() {
        let rows = decoded.grids.get(name).map_or(0, Vec::len);
        tracing::debug!(sheet = %name, rows, "read sheet");
        progress((60 + 30 * (i + 1) / n) as u8);
        tokio::task::yield_now().await;
    }

    progress(92);
    tracing::info!(file = file_name, sheets = n, "decoded workbook");
    progress(100);
    Ok(decoded)
}

/// Read and decode a workbook from disk.
pub async fn load_file<F>(path: &Path, progress: F) -> TabResult<DecodedWorkbook>
where
    F: FnMut(u8),
{
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    load_bytes(&bytes, &file_name, progress).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TabError;
    use tabtrans_sheet::SheetError;

    #[tokio::test]
    async fn test_progress_sequence() {
        let mut seen = Vec::new();
        let decoded = load_bytes(b"a,b\n1,2\n", "x.csv", |p| seen.push(p))
            .await
            .unwrap();
        assert_eq!(decoded.sheet_names, vec!["Sheet1"]);
        assert_eq!(seen, vec![25, 90, 92, 100]);
    }

    #[tokio::test]
    async fn test_unsupported_extension() {
        let err = load_bytes(b"{}", "data.json", |_| {}).await.unwrap_err();
        assert!(matches!(
            err,
            TabError::Sheet(SheetError::UnsupportedFormat { .. })
        ));
    }

    #[tokio::test]
    async fn test_load_file_missing() {
        let err = load_file(Path::new("/nonexistent/book.xlsx"), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, TabError::Io(_)));
    }
}
