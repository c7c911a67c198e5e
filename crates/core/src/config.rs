//! Configuration loaded from YAML or JSON, with defaults for every field.

use crate::error::{TabError, TabResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tabtrans_sheet::HeaderScanOptions;
use tabtrans_translate::provider::{LIBRETRANSLATE_URL, MYMEMORY_URL};
use tabtrans_translate::{EngineConfig, Lang, ProviderSettings};

/// Source language value meaning "detect from the data".
pub const AUTO_LANG: &str = "auto";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub header: HeaderScanOptions,
    pub workbook: WorkbookOptions,
    pub anomaly: AnomalyOptions,
    pub translation: TranslationOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookOptions {
    /// Rows inspected when scoring sheets for the initial selection
    pub density_scan_rows: usize,
    /// Appended to each sheet name for its result copy on export
    pub result_suffix: String,
}

impl Default for WorkbookOptions {
    fn default() -> Self {
        Self {
            density_scan_rows: 50,
            result_suffix: "_result".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyOptions {
    pub max_sample: usize,
}

impl Default for AnomalyOptions {
    fn default() -> Self {
        Self { max_sample: 200 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationOptions {
    /// Source language code, or `auto`
    pub from: String,
    pub to: String,
    pub batch_size: usize,
    pub backoff_ms: u64,
    pub pause_ms: u64,
    pub primary_attempts: u32,
    pub fallback_attempts: u32,
    pub mymemory_url: String,
    pub libretranslate_url: String,
    /// Cache file; defaults to the user cache directory
    pub cache_path: Option<PathBuf>,
}

impl Default for TranslationOptions {
    fn default() -> Self {
        Self {
            from: AUTO_LANG.to_string(),
            to: "zh".to_string(),
            batch_size: 50,
            backoff_ms: 300,
            pause_ms: 800,
            primary_attempts: 3,
            fallback_attempts: 1,
            mymemory_url: MYMEMORY_URL.to_string(),
            libretranslate_url: LIBRETRANSLATE_URL.to_string(),
            cache_path: None,
        }
    }
}

impl TranslationOptions {
    /// `None` when the source language should be detected.
    pub fn source_lang(&self) -> TabResult<Option<Lang>> {
        if self.from.trim().eq_ignore_ascii_case(AUTO_LANG) {
            return Ok(None);
        }
        parse_lang(&self.from).map(Some)
    }

    pub fn target_lang(&self) -> TabResult<Lang> {
        parse_lang(&self.to)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            backoff_unit: Duration::from_millis(self.backoff_ms),
            pause_every: self.batch_size,
            pause: Duration::from_millis(self.pause_ms),
        }
    }

    pub fn provider_settings(&self) -> ProviderSettings {
        ProviderSettings {
            mymemory_url: self.mymemory_url.clone(),
            libretranslate_url: self.libretranslate_url.clone(),
            primary_attempts: self.primary_attempts,
            fallback_attempts: self.fallback_attempts,
        }
    }

    /// Configured cache file, else `<user cache dir>/tabtrans/translations.json`.
    pub fn resolved_cache_path(&self) -> Option<PathBuf> {
        self.cache_path.clone().or_else(default_cache_path)
    }
}

fn parse_lang(code: &str) -> TabResult<Lang> {
    match code.parse::<Lang>() {
        Ok(Lang::Unknown) | Err(_) => Err(TabError::config(format!(
            "unsupported language '{code}'"
        ))),
        Ok(lang) => Ok(lang),
    }
}

pub fn default_cache_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join("tabtrans").join("translations.json"))
}

impl Config {
    pub fn from_yaml_str(contents: &str) -> TabResult<Self> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a `.yaml`/`.yml` or `.json` file.
    pub fn from_file(path: &Path) -> TabResult<Self> {
        let contents = fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|os| os.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let config: Config = match ext.as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&contents)?,
            "json" => serde_json::from_str(&contents)?,
            other => {
                return Err(TabError::config(format!(
                    "unsupported config extension: '{other}'"
                )))
            }
        };
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> TabResult<Self> {
        Self::from_yaml_str(&fs::read_to_string(path)?)
    }

    /// Reject values that would make later stages misbehave.
    pub fn validate(&self) -> TabResult<()> {
        self.translation.source_lang()?;
        self.translation.target_lang()?;
        if self.header.max_scan_rows == 0 {
            return Err(TabError::config("header.max_scan_rows must be at least 1"));
        }
        if self.translation.primary_attempts + self.translation.fallback_attempts == 0 {
            return Err(TabError::config(
                "translation needs at least one provider attempt",
            ));
        }
        Ok(())
    }
}
