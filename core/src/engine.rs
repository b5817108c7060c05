// core/src/engine.rs
//
// Session object for the text pipeline: tokenization strategy, reading
// overrides and the dictionary cache, constructed once per document.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::charclass::{has_kana, has_kanji, is_japanese_char, is_japanese_punctuation_only};
use crate::diff::{diff_tokens, DiffOperation};
use crate::furigana::{segments_to_markup, split_for_furigana, FuriganaSegment};
use crate::kana::to_hiragana;
use crate::lookup::{normalize_lookup_key, DictionaryEntry, LookupClient, WordLookup};
use crate::overrides::ReadingOverrides;
use crate::romaji::kana_to_romaji;
use crate::tokenizer::{MorphTokenizer, Token, TokenizerStrategy};
use crate::{Config, Result};

/// A token ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedToken {
    pub text: String,
    /// Dictionary key for kanji tokens.
    pub lookup_key: Option<String>,
    /// Hiragana reading used for the gloss; empty when none is known yet.
    pub reading: String,
    pub segments: Vec<FuriganaSegment>,
}

#[derive(Clone, Copy)]
enum Resolve {
    /// Only use what the cache already holds; prefetch misses.
    Cached,
    /// Wait for the dictionary.
    Blocking,
}

/// Furigana, romaji and corrections for one document session.
#[derive(Debug)]
pub struct FuriganaEngine {
    config: Config,
    strategy: TokenizerStrategy,
    overrides: ReadingOverrides,
    lookup: Option<Arc<LookupClient>>,
}

impl FuriganaEngine {
    /// Engine with the configured segmenter and override tables and no
    /// dictionary.
    pub fn new(config: Config) -> Result<Self> {
        let overrides = match &config.overrides_path {
            Some(path) => ReadingOverrides::load_toml(path)?,
            None => ReadingOverrides::default(),
        };
        Ok(Self {
            strategy: TokenizerStrategy::Segmenter(config.line_segmenter),
            config,
            overrides,
            lookup: None,
        })
    }

    /// Use a morphological tokenizer instead of the line segmenter.
    pub fn with_tokenizer(mut self, tokenizer: Arc<dyn MorphTokenizer>) -> Self {
        self.strategy = TokenizerStrategy::Morphological(tokenizer);
        self
    }

    /// Resolve missing readings through `provider`, cached for the session.
    pub fn with_lookup(mut self, provider: Arc<dyn WordLookup>) -> Self {
        let timeout = Duration::from_millis(self.config.lookup_timeout_ms);
        self.lookup = Some(Arc::new(LookupClient::new(provider, timeout)));
        self
    }

    pub fn with_overrides(mut self, overrides: ReadingOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn strategy(&self) -> &TokenizerStrategy {
        &self.strategy
    }

    pub fn overrides(&self) -> &ReadingOverrides {
        &self.overrides
    }

    pub fn overrides_mut(&mut self) -> &mut ReadingOverrides {
        &mut self.overrides
    }

    pub fn lookup_client(&self) -> Option<&Arc<LookupClient>> {
        self.lookup.as_ref()
    }

    /// Tokens of one line after the override pass.
    pub fn line_tokens(&self, line: &str) -> Vec<Token> {
        self.overrides.apply(self.strategy.tokens(line))
    }

    /// Blocking dictionary lookup; `None` without a provider.
    pub fn lookup(&self, word: &str) -> Option<DictionaryEntry> {
        self.lookup.as_ref()?.lookup(word)
    }

    fn dictionary_reading(&self, word: &str, resolve: Resolve) -> Option<String> {
        let client = self.lookup.as_ref()?;
        let entry = match resolve {
            Resolve::Blocking => client.lookup(word),
            Resolve::Cached => match client.cached(word) {
                Some(entry) => entry,
                None => {
                    client.prefetch(word);
                    None
                }
            },
        };
        entry.map(|e| e.reading).filter(|r| !r.is_empty())
    }

    fn render_token(&self, token: Token, resolve: Resolve) -> RenderedToken {
        if !has_kanji(&token.text) {
            return RenderedToken {
                segments: vec![FuriganaSegment::Plain {
                    text: token.text.clone(),
                }],
                text: token.text,
                lookup_key: None,
                reading: String::new(),
            };
        }

        let lookup_key = normalize_lookup_key(&token.text);
        let reading = if token.has_reading() {
            Some(token.reading)
        } else {
            self.dictionary_reading(&lookup_key, resolve)
        }
        .map(|r| to_hiragana(&r))
        .unwrap_or_default();

        let segments = split_for_furigana(&token.text, &reading);
        RenderedToken {
            text: token.text,
            lookup_key: Some(lookup_key),
            reading,
            segments,
        }
    }

    fn render_with(&self, line: &str, resolve: Resolve) -> Vec<RenderedToken> {
        self.line_tokens(line)
            .into_iter()
            .filter(|t| !t.text.is_empty())
            .map(|t| self.render_token(t, resolve))
            .collect()
    }

    /// Render one line without waiting on the dictionary.
    ///
    /// Kanji tokens with no tokenizer reading use the cached dictionary
    /// reading; on a cache miss a background lookup is started and the token
    /// renders plain until the caller renders again.
    pub fn render_line(&self, line: &str) -> Vec<RenderedToken> {
        self.render_with(line, Resolve::Cached)
    }

    /// Text with every glossed kanji run written as `漢字{かんじ}`.
    ///
    /// Missing readings are resolved through the dictionary, blocking.
    pub fn furigana_markup(&self, text: &str) -> String {
        text.split('\n')
            .map(|line| {
                self.render_with(line, Resolve::Blocking)
                    .iter()
                    .map(|t| segments_to_markup(&t.segments))
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn token_romaji(&self, token: &Token) -> String {
        let raw = token.text.as_str();
        if token.has_reading() {
            return kana_to_romaji(&token.reading);
        }
        if has_kanji(raw) {
            return match self.dictionary_reading(raw, Resolve::Blocking) {
                Some(reading) => kana_to_romaji(&reading),
                None => raw.to_string(),
            };
        }
        if has_kana(raw) {
            return kana_to_romaji(raw);
        }
        raw.to_string()
    }

    /// Romanised transliteration, line by line.
    ///
    /// Consecutive Japanese words are separated by one space; punctuation and
    /// whitespace are not.
    pub fn romaji_for_text(&self, text: &str) -> String {
        text.split('\n')
            .map(|line| {
                let mut out = String::new();
                let mut last_was_word = false;
                for token in self.line_tokens(line) {
                    if token.text.is_empty() {
                        continue;
                    }
                    if token.is_whitespace() {
                        out.push_str(&token.text);
                        last_was_word = false;
                        continue;
                    }
                    let is_word = is_japanese_char(&token.text)
                        && !is_japanese_punctuation_only(&token.text);
                    if last_was_word && is_word {
                        out.push(' ');
                    }
                    out.push_str(&self.token_romaji(&token));
                    last_was_word = is_word;
                }
                out.trim().to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn correction_tokens<'a>(&self, text: &'a str) -> Vec<&'a str> {
        if text.is_empty() {
            return Vec::new();
        }
        self.config
            .correction_segmenter
            .segment(text)
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Tracked-changes script from `base` to `current`.
    ///
    /// Line endings are normalised first; identical texts give an empty script.
    pub fn corrections(&self, base: &str, current: &str) -> Vec<DiffOperation> {
        let before = normalize_line_breaks(base);
        let after = normalize_line_breaks(current);
        if before == after {
            return Vec::new();
        }
        diff_tokens(
            &self.correction_tokens(&before),
            &self.correction_tokens(&after),
            self.config.diff_max_cells,
        )
    }

    pub fn has_tracked_corrections(&self, base: &str, current: &str) -> bool {
        normalize_line_breaks(base) != normalize_line_breaks(current)
    }
}

/// `\r\n` → `\n`.
pub fn normalize_line_breaks(text: &str) -> String {
    text.replace("\r\n", "\n")
}
