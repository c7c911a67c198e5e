//! # tabtrans-translate
//!
//! Batch translation of spreadsheet text.
//!
//! Strings are deduplicated, looked up in a durable cache, and sent one at a
//! time to an ordered list of providers with retries and fallback. Failures
//! never abort a batch; an untranslatable string maps to itself.
//!
//! ```no_run
//! use tabtrans_translate::{
//!     BatchRequest, EngineConfig, JsonFileStore, Lang, ProviderSettings, TranslationCache,
//!     TranslationEngine,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), tabtrans_translate::ProviderError> {
//! let cache = TranslationCache::new(JsonFileStore::new("translations.json"));
//! let mut engine =
//!     TranslationEngine::standard(cache, EngineConfig::default(), &ProviderSettings::default())?;
//!
//! let request = BatchRequest {
//!     texts: vec!["cat".into(), "dog".into(), "cat".into()],
//!     from: Lang::En,
//!     to: Lang::Zh,
//! };
//! let outcome = engine
//!     .translate_batch(&request, &CancellationToken::new(), |done, total| {
//!         println!("{done}/{total}");
//!     })
//!     .await;
//! assert_eq!(outcome.stats.total, 2);
//! # Ok(())
//! # }
//! ```

pub mod apply;
pub mod cache;
pub mod engine;
mod error;
pub mod lang;
pub mod provider;

pub use apply::{apply_translations, collect_texts, is_translatable};
pub use cache::{cache_key, JsonFileStore, KvStore, MemoryStore, TranslationCache, CACHE_SLOT};
pub use engine::{
    BatchOutcome, BatchRequest, BatchStats, EngineConfig, ProviderSlot, TranslationEngine,
};
pub use error::{CacheIoError, ProviderError};
pub use lang::{classify_batch, classify_one, classify_simple, Lang, SUPPORTED_LANGS};
pub use provider::{
    LibreTranslateProvider, MyMemoryProvider, ProviderSettings, TranslationProvider,
};
