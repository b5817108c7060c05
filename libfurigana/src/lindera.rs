//! IPADIC morphological tokenizer backed by lindera (feature `lindera`).

use anyhow::anyhow;
use libnihongo_core::tokenizer::NO_READING_SENTINEL;
use libnihongo_core::{Morpheme, MorphTokenizer};
use lindera::dictionary::load_dictionary;
use lindera::mode::Mode;
use lindera::segmenter::Segmenter;
use lindera::tokenizer::Tokenizer;

/// IPADIC detail column holding the katakana reading.
const READING_COLUMN: usize = 7;

pub struct LinderaTokenizer {
    inner: Tokenizer,
}

impl LinderaTokenizer {
    /// Tokenizer over the embedded IPADIC dictionary.
    pub fn new() -> anyhow::Result<Self> {
        let dictionary = load_dictionary("embedded://ipadic").map_err(|e| anyhow!("loading IPADIC: {e}"))?;
        let segmenter = Segmenter::new(Mode::Normal, dictionary, None);
        Ok(Self {
            inner: Tokenizer::new(segmenter),
        })
    }
}

impl MorphTokenizer for LinderaTokenizer {
    fn tokenize(&self, text: &str) -> anyhow::Result<Vec<Morpheme>> {
        let tokens = self.inner.tokenize(text).map_err(|e| anyhow!("{e}"))?;
        Ok(tokens
            .into_iter()
            .map(|mut token| {
                let surface = token.surface.as_ref().to_string();
                let reading = token
                    .details()
                    .get(READING_COLUMN)
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| NO_READING_SENTINEL.to_string());
                Morpheme::new(surface, reading)
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "lindera-ipadic"
    }
}

impl std::fmt::Debug for LinderaTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinderaTokenizer").finish_non_exhaustive()
    }
}
