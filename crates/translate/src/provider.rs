//! HTTP translation backends.

use crate::error::ProviderError;
use crate::lang::Lang;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

pub const MYMEMORY_URL: &str = "https://api.mymemory.translated.net";
pub const LIBRETRANSLATE_URL: &str = "https://libretranslate.de";

const MYMEMORY_TIMEOUT: Duration = Duration::from_secs(15);
const LIBRETRANSLATE_TIMEOUT: Duration = Duration::from_secs(20);

/// A remote service that translates one string at a time.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    async fn translate_one(&self, text: &str, from: Lang, to: Lang)
        -> Result<String, ProviderError>;
}

fn non_empty(text: Option<String>) -> Result<String, ProviderError> {
    match text {
        Some(t) if !t.is_empty() => Ok(t),
        _ => Err(ProviderError::EmptyResult),
    }
}

/// MyMemory public API (`GET /get`).
#[derive(Debug, Clone)]
pub struct MyMemoryProvider {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl MyMemoryProvider {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, MYMEMORY_URL)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: MYMEMORY_TIMEOUT,
        }
    }

    fn lang_code(lang: Lang) -> &'static str {
        match lang {
            Lang::Zh => "zh-CN",
            Lang::Unknown => "autodetect",
            other => other.code(),
        }
    }
}

#[derive(Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: Option<MyMemoryData>,
}

#[derive(Deserialize)]
struct MyMemoryData {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

#[async_trait]
impl TranslationProvider for MyMemoryProvider {
    fn name(&self) -> &str {
        "mymemory"
    }

    async fn translate_one(
        &self,
        text: &str,
        from: Lang,
        to: Lang,
    ) -> Result<String, ProviderError> {
        let langpair = format!("{}|{}", Self::lang_code(from), Self::lang_code(to));
        let response = self
            .client
            .get(format!("{}/get", self.base_url))
            .query(&[("q", text), ("langpair", langpair.as_str())])
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                code: response.status().as_u16(),
            });
        }

        let body: MyMemoryResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        non_empty(body.response_data.and_then(|d| d.translated_text))
    }
}

/// LibreTranslate instance (`POST /translate`).
#[derive(Debug, Clone)]
pub struct LibreTranslateProvider {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl LibreTranslateProvider {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, LIBRETRANSLATE_URL)
    }

    pub fn with_base_url(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: LIBRETRANSLATE_TIMEOUT,
        }
    }

    fn lang_code(lang: Lang) -> &'static str {
        match lang {
            Lang::Unknown => "auto",
            other => other.code(),
        }
    }
}

#[derive(Deserialize)]
struct LibreTranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

#[async_trait]
impl TranslationProvider for LibreTranslateProvider {
    fn name(&self) -> &str {
        "libretranslate"
    }

    async fn translate_one(
        &self,
        text: &str,
        from: Lang,
        to: Lang,
    ) -> Result<String, ProviderError> {
        let body = serde_json::json!({
            "q": text,
            "source": Self::lang_code(from),
            "target": Self::lang_code(to),
            "format": "text",
        });

        let response = self
            .client
            .post(format!("{}/translate", self.base_url))
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Status {
                code: response.status().as_u16(),
            });
        }

        let body: LibreTranslateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))?;
        non_empty(body.translated_text)
    }
}

/// Endpoints and retry budgets for the built-in providers.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub mymemory_url: String,
    pub libretranslate_url: String,
    pub primary_attempts: u32,
    pub fallback_attempts: u32,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            mymemory_url: MYMEMORY_URL.to_string(),
            libretranslate_url: LIBRETRANSLATE_URL.to_string(),
            primary_attempts: 3,
            fallback_attempts: 1,
        }
    }
}

/// Build the shared HTTP client used by the built-in providers.
pub fn build_client() -> Result<Client, ProviderError> {
    Client::builder()
        .build()
        .map_err(|e| ProviderError::Transport(e.to_string()))
}
