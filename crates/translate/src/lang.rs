//! Language identification for single strings and whole batches.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minimum characters before the statistical detector is trusted on one item.
pub const ITEM_MIN_CHARS: usize = 8;
/// Minimum characters for the joined batch sample.
pub const BATCH_MIN_CHARS: usize = 10;
/// Default number of texts sampled by [`classify_batch`].
pub const DEFAULT_SAMPLE_SIZE: usize = 80;

/// A language the translation providers understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    En,
    Zh,
    Ja,
    Ko,
    Fr,
    De,
    Es,
    Pt,
    It,
    Ru,
    Ar,
    Hi,
    Unknown,
}

/// Every language that can be requested as a source or target.
pub const SUPPORTED_LANGS: [Lang; 12] = [
    Lang::En,
    Lang::Zh,
    Lang::Ja,
    Lang::Ko,
    Lang::Fr,
    Lang::De,
    Lang::Es,
    Lang::Pt,
    Lang::It,
    Lang::Ru,
    Lang::Ar,
    Lang::Hi,
];

impl Lang {
    /// Two-letter code, or `"unknown"`.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Zh => "zh",
            Lang::Ja => "ja",
            Lang::Ko => "ko",
            Lang::Fr => "fr",
            Lang::De => "de",
            Lang::Es => "es",
            Lang::Pt => "pt",
            Lang::It => "it",
            Lang::Ru => "ru",
            Lang::Ar => "ar",
            Lang::Hi => "hi",
            Lang::Unknown => "unknown",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Lang::En => "English",
            Lang::Zh => "Chinese",
            Lang::Ja => "Japanese",
            Lang::Ko => "Korean",
            Lang::Fr => "French",
            Lang::De => "German",
            Lang::Es => "Spanish",
            Lang::Pt => "Portuguese",
            Lang::It => "Italian",
            Lang::Ru => "Russian",
            Lang::Ar => "Arabic",
            Lang::Hi => "Hindi",
            Lang::Unknown => "Unknown",
        }
    }

    /// Map an ISO 639-3 code (as reported by the n-gram detector).
    fn from_iso639_3(code: &str) -> Option<Lang> {
        match code {
            "eng" => Some(Lang::En),
            "cmn" | "zho" => Some(Lang::Zh),
            "jpn" => Some(Lang::Ja),
            "kor" => Some(Lang::Ko),
            "fra" | "fre" => Some(Lang::Fr),
            "deu" | "ger" => Some(Lang::De),
            "spa" => Some(Lang::Es),
            "por" => Some(Lang::Pt),
            "ita" => Some(Lang::It),
            "rus" => Some(Lang::Ru),
            "arb" | "ara" => Some(Lang::Ar),
            "hin" => Some(Lang::Hi),
            _ => None,
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        if code == "unknown" {
            return Ok(Lang::Unknown);
        }
        SUPPORTED_LANGS
            .iter()
            .copied()
            .find(|l| l.code() == code)
            .ok_or_else(|| format!("unsupported language '{s}'"))
    }
}

/// More than 55% of the characters are ASCII letters.
#[must_use]
pub fn is_probably_english(text: &str) -> bool {
    let total = text.chars().count();
    if total == 0 {
        return false;
    }
    let letters = text.chars().filter(char::is_ascii_alphabetic).count();
    letters as f64 / total as f64 > 0.55
}

/// Script-based guess: CJK, Hangul and Cyrillic are decisive, Latin means English.
#[must_use]
pub fn classify_simple(text: &str) -> Lang {
    let in_range = |lo: u32, hi: u32| text.chars().any(|c| (lo..=hi).contains(&(c as u32)));

    if text.trim().is_empty() {
        Lang::Unknown
    } else if in_range(0x4E00, 0x9FFF) {
        Lang::Zh
    } else if in_range(0x3040, 0x30FF) {
        Lang::Ja
    } else if in_range(0xAC00, 0xD7AF) {
        Lang::Ko
    } else if in_range(0x0400, 0x04FF) {
        Lang::Ru
    } else if is_probably_english(text) || text.chars().any(|c| c.is_ascii_alphabetic()) {
        Lang::En
    } else {
        Lang::Unknown
    }
}

fn detect_statistical(text: &str, min_chars: usize) -> Option<Lang> {
    if text.chars().count() < min_chars {
        return None;
    }
    whatlang::detect(text).and_then(|info| Lang::from_iso639_3(info.lang().code()))
}

/// Classify a single string.
///
/// Script-decisive results win; otherwise the statistical detector gets a
/// chance to tell Latin-script languages apart.
#[must_use]
pub fn classify_one(text: &str) -> Lang {
    let text = text.trim();
    if text.is_empty() {
        return Lang::Unknown;
    }
    let simple = classify_simple(text);
    if simple != Lang::En && simple != Lang::Unknown {
        return simple;
    }
    detect_statistical(text, ITEM_MIN_CHARS).unwrap_or(simple)
}

/// Pick the dominant language of a batch of strings.
///
/// Samples the first `sample_size` non-empty strings, detects on their joined
/// text, and falls back to a per-item plurality vote. Defaults to English.
#[must_use]
pub fn classify_batch<S: AsRef<str>>(texts: &[S], sample_size: usize) -> Lang {
    let sample: Vec<&str> = texts
        .iter()
        .map(AsRef::as_ref)
        .filter(|s| !s.is_empty())
        .take(sample_size)
        .collect();
    if sample.is_empty() {
        return Lang::En;
    }

    let joined = sample
        .iter()
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(". ");
    if let Some(lang) = detect_statistical(&joined, BATCH_MIN_CHARS) {
        return lang;
    }

    let mut votes: IndexMap<Lang, usize> = IndexMap::new();
    for s in &sample {
        let lang = detect_statistical(s, ITEM_MIN_CHARS).unwrap_or_else(|| classify_simple(s));
        *votes.entry(lang).or_insert(0) += 1;
    }

    let mut winner: Option<(Lang, usize)> = None;
    for (lang, count) in votes {
        if winner.map_or(true, |(_, best)| count > best) {
            winner = Some((lang, count));
        }
    }
    match winner {
        Some((lang, _)) if lang != Lang::Unknown => lang,
        _ => Lang::En,
    }
}
