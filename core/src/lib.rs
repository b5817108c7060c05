//! libnihongo-core
//!
//! Japanese text pipeline shared by the furigana front ends: character
//! classification, kana normalisation and romanisation, line segmentation,
//! tokenization, reading overrides, furigana alignment, dictionary lookup
//! caching and token diffs for tracked corrections.
//!
//! Everything here is synchronous. The only I/O boundaries are the injected
//! [`MorphTokenizer`] and [`WordLookup`] providers and resource loading.
//!
//! Public API:
//! - `FuriganaEngine` - Per-document session combining the pieces below
//! - `Token` / `TokenizerStrategy` - Tokenization with a segmenter fallback
//! - `ReadingOverrides` - Replaceable correction tables for readings
//! - `FuriganaSegment` - Reading alignment result for one token
//! - `LookupClient` - Cached, single-flight dictionary lookups
//! - `DiffOperation` - Token-level edit script
//! - `Config` - Configuration loaded from TOML
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod charclass;
pub mod kana;
pub use kana::{to_hiragana, to_katakana};

pub mod romaji;
pub use romaji::{kana_to_romaji, romanize};

pub mod segment;
pub use segment::{segment_line, SegmenterKind};

pub mod tokenizer;
pub use tokenizer::{tokenize_line, Morpheme, MorphTokenizer, Token, TokenizerStrategy};

pub mod overrides;
pub use overrides::ReadingOverrides;

pub mod furigana;
pub use furigana::{split_for_furigana, FuriganaSegment};

pub mod lookup;
pub use lookup::{select_best_entry, DictionaryEntry, LookupClient, WordCandidate, WordLookup};

pub mod diff;
pub use diff::{diff_tokens, DiffKind, DiffOperation};

pub mod engine;
pub use engine::{FuriganaEngine, RenderedToken};

pub mod error;
pub use error::{Error, Result};

/// Language-level configuration for the text pipeline.
///
/// Provider settings (endpoints, index locations) belong in the front-end
/// crate's config, which flattens this one.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Largest `before.len() * after.len()` diffed with the LCS table.
    /// Default: 300 000. Larger inputs use the prefix/suffix trim.
    pub diff_max_cells: usize,

    /// Bounded wait for one dictionary lookup, in milliseconds.
    pub lookup_timeout_ms: u64,

    /// Segmenter used when no morphological tokenizer is configured.
    pub line_segmenter: SegmenterKind,

    /// Segmenter producing diff tokens (`characters` diffs per char).
    pub correction_segmenter: SegmenterKind,

    /// External reading-override tables; the bundled ones when unset.
    pub overrides_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            diff_max_cells: diff::DEFAULT_MAX_CELLS,
            lookup_timeout_ms: 6000,
            line_segmenter: SegmenterKind::JapaneseWords,
            correction_segmenter: SegmenterKind::JapaneseWords,
            overrides_path: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = error::read_to_string(path)?;
        Self::from_toml_str(&content).map_err(|source| Error::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn lookup_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.lookup_timeout_ms)
    }
}
