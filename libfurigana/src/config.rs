use crate::jisho::JISHO_SEARCH_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Front-end configuration that extends the base `Config` from core.
///
/// This configuration includes:
/// - All pipeline options from `libnihongo_core::Config` (flattened via serde)
/// - Dictionary endpoints for the jisho.org provider and its proxy
/// - The location of a local JMdict index
///
/// # Example
///
/// ```rust
/// use libfurigana::FuriganaConfig;
///
/// let config = FuriganaConfig::from_toml_str("prefer_proxy = true\nlookup_timeout_ms = 500\n").unwrap();
/// assert!(config.prefer_proxy);
/// assert_eq!(config.base.lookup_timeout_ms, 500);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FuriganaConfig {
    /// Pipeline configuration (diff budget, lookup timeout, segmenters, overrides)
    #[serde(flatten)]
    pub base: libnihongo_core::Config,

    /// Search URL prefix queried directly; the URL-encoded word is appended.
    pub lookup_endpoint: String,

    /// Same-origin proxy for the search API, tried second (or first with
    /// `prefer_proxy`).
    pub proxy_endpoint: Option<String>,

    /// Try the proxy before the direct endpoint.
    pub prefer_proxy: bool,

    /// Directory holding `jmdict.fst` + `jmdict.bincode`; used instead of the
    /// web API when set.
    pub jmdict_dir: Option<PathBuf>,
}

impl Default for FuriganaConfig {
    fn default() -> Self {
        Self {
            base: libnihongo_core::Config::default(),
            lookup_endpoint: JISHO_SEARCH_URL.to_string(),
            proxy_endpoint: None,
            prefer_proxy: false,
            jmdict_dir: None,
        }
    }
}

impl FuriganaConfig {
    /// Convert into the base config for use with `FuriganaEngine::new()`
    pub fn into_base(self) -> libnihongo_core::Config {
        self.base
    }

    pub fn base(&self) -> &libnihongo_core::Config {
        &self.base
    }

    pub fn base_mut(&mut self) -> &mut libnihongo_core::Config {
        &mut self.base
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn load_toml<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&content)?)
    }
}
