//! Batch translation with caching, retries and provider fallback.

use crate::cache::{KvStore, TranslationCache};
use crate::error::ProviderError;
use crate::lang::Lang;
use crate::provider::{
    build_client, LibreTranslateProvider, MyMemoryProvider, ProviderSettings, TranslationProvider,
};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Pacing knobs for a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Sleep `backoff_unit * attempt` after each failed attempt. The last
    /// provider does not sleep after its final attempt.
    pub backoff_unit: Duration,
    /// Pause after every `pause_every` processed strings (0 disables). Only
    /// checked after strings that went to a provider.
    pub pause_every: usize,
    pub pause: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backoff_unit: Duration::from_millis(300),
            pause_every: 50,
            pause: Duration::from_millis(800),
        }
    }
}

/// A provider and how many times to try it per string.
#[derive(Clone)]
pub struct ProviderSlot {
    pub provider: Arc<dyn TranslationProvider>,
    pub attempts: u32,
}

impl ProviderSlot {
    pub fn new(provider: impl TranslationProvider + 'static, attempts: u32) -> Self {
        Self {
            provider: Arc::new(provider),
            attempts,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    pub texts: Vec<String>,
    pub from: Lang,
    pub to: Lang,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    /// Distinct non-blank strings in the request
    pub total: usize,
    pub cached: usize,
    pub api_ok: usize,
    pub api_fail: usize,
    pub changed: usize,
    pub unchanged: usize,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    /// Source string -> translation (the source itself when every provider failed)
    pub map: IndexMap<String, String>,
    pub stats: BatchStats,
    pub cancelled: bool,
}

/// Distinct non-blank strings in first-occurrence order.
fn unique_texts(texts: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    texts
        .iter()
        .map(String::as_str)
        .filter(|t| !t.trim().is_empty())
        .filter(|t| seen.insert(*t))
        .collect()
}

pub struct TranslationEngine<S: KvStore> {
    slots: Vec<ProviderSlot>,
    cache: TranslationCache<S>,
    config: EngineConfig,
}

impl<S: KvStore> TranslationEngine<S> {
    pub fn new(slots: Vec<ProviderSlot>, cache: TranslationCache<S>, config: EngineConfig) -> Self {
        Self {
            slots,
            cache,
            config,
        }
    }

    /// MyMemory first, then LibreTranslate as the fallback.
    pub fn standard(
        cache: TranslationCache<S>,
        config: EngineConfig,
        settings: &ProviderSettings,
    ) -> Result<Self, ProviderError> {
        let client = build_client()?;
        let slots = vec![
            ProviderSlot::new(
                MyMemoryProvider::with_base_url(client.clone(), &settings.mymemory_url),
                settings.primary_attempts,
            ),
            ProviderSlot::new(
                LibreTranslateProvider::with_base_url(client, &settings.libretranslate_url),
                settings.fallback_attempts,
            ),
        ];
        Ok(Self::new(slots, cache, config))
    }

    pub fn cache(&mut self) -> &mut TranslationCache<S> {
        &mut self.cache
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Try every provider slot in order until one succeeds.
    async fn run_providers(&self, text: &str, from: Lang, to: Lang) -> Result<String, ProviderError> {
        let mut last_error = None;
        for (i, slot) in self.slots.iter().enumerate() {
            let is_last_slot = i + 1 == self.slots.len();
            for attempt in 1..=slot.attempts {
                match slot.provider.translate_one(text, from, to).await {
                    Ok(out) => return Ok(out),
                    Err(e) => {
                        tracing::debug!(
                            provider = slot.provider.name(),
                            attempt,
                            error = %e,
                            "translation attempt failed"
                        );
                        last_error = Some(e);
                        if !is_last_slot || attempt < slot.attempts {
                            tokio::time::sleep(self.config.backoff_unit * attempt).await;
                        }
                    }
                }
            }
        }
        Err(last_error.unwrap_or(ProviderError::NoProviders))
    }

    /// Translate every distinct non-blank string of `request` once.
    ///
    /// Cached strings skip the providers; fresh successes are cached. A string
    /// every provider fails on maps to itself and is counted in `api_fail`.
    /// That passthrough value is not cached, so the string is retried by the
    /// next batch instead of being remembered as its own translation.
    /// Cancellation is checked before each string and returns the partial
    /// map. `on_progress(done, total)` fires once per processed string.
    pub async fn translate_batch<F>(
        &mut self,
        request: &BatchRequest,
        cancel: &CancellationToken,
        mut on_progress: F,
    ) -> BatchOutcome
    where
        F: FnMut(usize, usize) + Send,
    {
        let (from, to) = (request.from, request.to);
        let unique = unique_texts(&request.texts);
        let total = unique.len();
        let mut outcome = BatchOutcome {
            stats: BatchStats {
                total,
                ..BatchStats::default()
            },
            ..BatchOutcome::default()
        };

        for (idx, text) in unique.into_iter().enumerate() {
            if cancel.is_cancelled() {
                tracing::info!(done = idx, total, "translation batch cancelled");
                outcome.cancelled = true;
                break;
            }

            let (translated, from_provider) = if let Some(hit) = self.cache.get(from, to, text) {
                outcome.stats.cached += 1;
                (hit, false)
            } else {
                let out = match self.run_providers(text, from, to).await {
                    Ok(out) => {
                        outcome.stats.api_ok += 1;
                        self.cache.insert(from, to, text, &out);
                        out
                    }
                    Err(e) => {
                        tracing::warn!(text, error = %e, "all providers failed, keeping source text");
                        outcome.stats.api_fail += 1;
                        outcome.stats.last_error = Some(e.to_string());
                        text.to_string()
                    }
                };
                (out, true)
            };

            if translated == text {
                outcome.stats.unchanged += 1;
            } else {
                outcome.stats.changed += 1;
            }
            outcome.map.insert(text.to_string(), translated);
            let done = idx + 1;
            on_progress(done, total);

            if from_provider && self.config.pause_every > 0 && done % self.config.pause_every == 0 {
                tokio::time::sleep(self.config.pause).await;
            }
        }

        tracing::debug!(stats = ?outcome.stats, "translation batch finished");
        outcome
    }
}
