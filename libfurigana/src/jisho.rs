//! jisho.org word search as a [`WordLookup`] provider.
//!
//! The search API is queried with a blocking `reqwest` client; no async
//! runtime is needed. A same-origin proxy for the same API can be configured
//! and is tried when the first endpoint fails (or first, with `prefer_proxy`).
//!
//! Response shape (only the fields used here):
//!
//! ```json
//! {"data": [{"japanese": [{"word": "日本", "reading": "にほん"}],
//!            "senses": [{"english_definitions": ["Japan"]}]}]}
//! ```
//!
//! Every `japanese` form becomes one [`WordCandidate`] carrying the glosses of
//! its entry's first sense, in response order.

use anyhow::{bail, Context};
use libnihongo_core::{WordCandidate, WordLookup};
use serde::Deserialize;
use std::time::Duration;

use crate::FuriganaConfig;

/// Direct search endpoint; the URL-encoded keyword is appended.
pub const JISHO_SEARCH_URL: &str = "https://jisho.org/api/v1/search/words?keyword=";

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchEntry>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchEntry {
    #[serde(default)]
    japanese: Vec<JapaneseForm>,
    #[serde(default)]
    senses: Vec<Sense>,
}

#[derive(Debug, Default, Deserialize)]
struct JapaneseForm {
    #[serde(default)]
    word: Option<String>,
    #[serde(default)]
    reading: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Sense {
    #[serde(default)]
    english_definitions: Vec<String>,
}

impl SearchResponse {
    fn into_candidates(self) -> Vec<WordCandidate> {
        let mut candidates = Vec::new();
        for entry in self.data {
            let glosses = entry
                .senses
                .into_iter()
                .next()
                .map(|s| s.english_definitions)
                .unwrap_or_default();
            for form in entry.japanese {
                candidates.push(WordCandidate {
                    word: form.word.unwrap_or_default(),
                    reading: form.reading.unwrap_or_default(),
                    glosses: glosses.clone(),
                });
            }
        }
        candidates
    }
}

/// Parse a search API response body into candidates.
pub fn parse_search_response(body: &str) -> anyhow::Result<Vec<WordCandidate>> {
    let response: SearchResponse = serde_json::from_str(body).context("malformed search response")?;
    Ok(response.into_candidates())
}

/// Blocking client for the jisho.org search API.
pub struct JishoLookup {
    client: reqwest::blocking::Client,
    endpoint: String,
    proxy: Option<String>,
    prefer_proxy: bool,
}

impl JishoLookup {
    /// Client for `endpoint` (a URL prefix the keyword is appended to).
    pub fn new<E: Into<String>>(endpoint: E, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            proxy: None,
            prefer_proxy: false,
        })
    }

    pub fn with_proxy<P: Into<String>>(mut self, proxy: P, prefer_proxy: bool) -> Self {
        self.proxy = Some(proxy.into());
        self.prefer_proxy = prefer_proxy;
        self
    }

    pub fn from_config(config: &FuriganaConfig) -> anyhow::Result<Self> {
        let lookup = Self::new(config.lookup_endpoint.clone(), config.base.lookup_timeout())?;
        Ok(match &config.proxy_endpoint {
            Some(proxy) => lookup.with_proxy(proxy.clone(), config.prefer_proxy),
            None => lookup,
        })
    }

    /// Endpoints in the order they are tried.
    pub fn endpoints(&self) -> Vec<&str> {
        let direct = self.endpoint.as_str();
        match self.proxy.as_deref() {
            Some(proxy) if self.prefer_proxy => vec![proxy, direct],
            Some(proxy) => vec![direct, proxy],
            None => vec![direct],
        }
    }

    fn fetch(&self, endpoint: &str, word: &str) -> anyhow::Result<Vec<WordCandidate>> {
        let url = format!("{}{}", endpoint, urlencoding::encode(word));
        let response = self.client.get(&url).send()?;
        if !response.status().is_success() {
            bail!("{} returned {}", endpoint, response.status());
        }
        let body = response.text()?;
        parse_search_response(&body)
    }
}

impl WordLookup for JishoLookup {
    fn search(&self, word: &str) -> anyhow::Result<Vec<WordCandidate>> {
        let mut last_error = None;
        for endpoint in self.endpoints() {
            match self.fetch(endpoint, word) {
                Ok(candidates) => return Ok(candidates),
                Err(err) => {
                    tracing::debug!(endpoint, word, error = %err, "search endpoint failed");
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("no search endpoint configured")))
    }

    fn name(&self) -> &'static str {
        "jisho"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use libnihongo_core::select_best_entry;

    const NIHON: &str = r#"{
        "meta": {"status": 200},
        "data": [
            {
                "slug": "日本",
                "japanese": [{"word": "日本", "reading": "にほん"}, {"word": "日本", "reading": "にっぽん"}],
                "senses": [
                    {"english_definitions": ["Japan"], "parts_of_speech": ["Noun"]},
                    {"english_definitions": ["Nippon"]}
                ]
            },
            {
                "slug": "日本人",
                "japanese": [{"word": "日本人", "reading": "にほんじん"}],
                "senses": [{"english_definitions": ["Japanese person", "Japanese people"]}]
            },
            {
                "slug": "にほん",
                "japanese": [{"reading": "ニホン"}],
                "senses": []
            }
        ]
    }"#;

    #[test]
    fn test_parse_flattens_forms_in_order() {
        let candidates = parse_search_response(NIHON).unwrap();
        assert_eq!(candidates.len(), 4);
        assert_eq!(candidates[0], WordCandidate::new("日本", "にほん", vec!["Japan".into()]));
        assert_eq!(candidates[1].reading, "にっぽん");
        assert_eq!(candidates[2].glosses.len(), 2);
        assert_eq!(candidates[3].word, "");
        assert!(candidates[3].glosses.is_empty());
    }

    #[test]
    fn test_best_entry_from_response() {
        let candidates = parse_search_response(NIHON).unwrap();
        let best = select_best_entry(&candidates, "日本").unwrap();
        let entry = best.to_entry("日本");
        assert_eq!(entry.reading, "にほん");
        assert_eq!(entry.meaning, "Japan");
    }

    #[test]
    fn test_parse_tolerates_missing_fields() {
        assert!(parse_search_response("{}").unwrap().is_empty());
        assert!(parse_search_response(r#"{"data": [{}]}"#).unwrap().is_empty());
        assert!(parse_search_response("not json").is_err());
    }

    #[test]
    fn test_endpoint_order() {
        let lookup = JishoLookup::new(JISHO_SEARCH_URL, Duration::from_millis(100)).unwrap();
        assert_eq!(lookup.endpoints(), vec![JISHO_SEARCH_URL]);

        let proxied = lookup.with_proxy("/api/lookup?keyword=", false);
        assert_eq!(proxied.endpoints(), vec![JISHO_SEARCH_URL, "/api/lookup?keyword="]);

        let preferred = proxied.with_proxy("/api/lookup?keyword=", true);
        assert_eq!(preferred.endpoints(), vec!["/api/lookup?keyword=", JISHO_SEARCH_URL]);
    }

    #[test]
    fn test_unreachable_endpoints_fail() {
        let lookup = JishoLookup::new("http://127.0.0.1:9/search?keyword=", Duration::from_millis(200))
            .unwrap()
            .with_proxy("not a url ", false);
        assert!(lookup.search("日本").is_err());
    }

    // Needs network access.
    #[test]
    #[ignore]
    fn test_search_real_network() {
        let lookup = JishoLookup::new(JISHO_SEARCH_URL, Duration::from_secs(6)).unwrap();
        let candidates = lookup.search("日本").unwrap();
        let best = select_best_entry(&candidates, "日本").unwrap();
        println!("jisho results for '日本': {:?}", best);
        assert_eq!(best.word, "日本");
    }
}
