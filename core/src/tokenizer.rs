//! Tokens and the morphological tokenizer adapter.
//!
//! A line is cut into runs of tokenizable characters (Japanese and digits) and
//! plain runs (Latin, symbols, spaces). Plain runs become reading-less tokens
//! verbatim; tokenizable runs go through the injected [`MorphTokenizer`].
//! Without a tokenizer the line is segmented with a [`SegmenterKind`] instead.

use crate::charclass::{self, Run};
use crate::segment::SegmenterKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Reading value a dictionary tokenizer reports for unknown words.
pub const NO_READING_SENTINEL: &str = "*";

/// A surface string with its (possibly empty) reading.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    /// Kana reading; empty when unknown or not applicable.
    pub reading: String,
}

impl Token {
    pub fn plain<T: Into<String>>(text: T) -> Self {
        Self {
            text: text.into(),
            reading: String::new(),
        }
    }

    pub fn with_reading<T: Into<String>, R: Into<String>>(text: T, reading: R) -> Self {
        Self {
            text: text.into(),
            reading: reading.into(),
        }
    }

    pub fn has_reading(&self) -> bool {
        !self.reading.is_empty()
    }

    pub fn is_whitespace(&self) -> bool {
        charclass::is_whitespace_only(&self.text)
    }
}

/// One morpheme as reported by a dictionary tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Morpheme {
    pub surface_form: String,
    /// Reading in katakana or hiragana, or [`NO_READING_SENTINEL`].
    pub reading: String,
}

impl Morpheme {
    pub fn new<S: Into<String>, R: Into<String>>(surface_form: S, reading: R) -> Self {
        Self {
            surface_form: surface_form.into(),
            reading: reading.into(),
        }
    }
}

/// A dictionary-based morphological tokenizer.
///
/// Implementations only ever receive runs of tokenizable characters.
pub trait MorphTokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> anyhow::Result<Vec<Morpheme>>;

    fn name(&self) -> &'static str {
        "morph"
    }
}

fn morpheme_to_token(m: Morpheme) -> Token {
    let reading = if m.reading == NO_READING_SENTINEL {
        String::new()
    } else {
        m.reading
    };
    Token {
        text: m.surface_form,
        reading,
    }
}

/// Tokenize one tokenizable run, falling back to a single reading-less token
/// when the tokenizer fails or its surfaces do not cover the run exactly.
fn tokenize_run(run: &str, tokenizer: &dyn MorphTokenizer, out: &mut Vec<Token>) {
    match tokenizer.tokenize(run) {
        Ok(morphemes) => {
            let covered: String = morphemes.iter().map(|m| m.surface_form.as_str()).collect();
            if covered != run {
                tracing::warn!(
                    tokenizer = tokenizer.name(),
                    run,
                    covered = covered.as_str(),
                    "tokenizer surfaces do not reconstruct run"
                );
                out.push(Token::plain(run));
                return;
            }
            out.extend(
                morphemes
                    .into_iter()
                    .filter(|m| !m.surface_form.is_empty())
                    .map(morpheme_to_token),
            );
        }
        Err(err) => {
            tracing::warn!(tokenizer = tokenizer.name(), run, error = %err, "tokenizer failed");
            out.push(Token::plain(run));
        }
    }
}

/// Tokenize a line with an optional morphological tokenizer.
///
/// Returns `None` when no tokenizer is configured; the caller is expected to
/// fall back to segmentation. The returned tokens always concatenate back to
/// `line`.
pub fn tokenize_line(line: &str, tokenizer: Option<&dyn MorphTokenizer>) -> Option<Vec<Token>> {
    let tokenizer = tokenizer?;
    let mut tokens = Vec::new();
    for run in charclass::tokenizable_runs(line) {
        match run {
            Run::Plain(text) => tokens.push(Token::plain(text)),
            Run::Tokenizable(text) => tokenize_run(text, tokenizer, &mut tokens),
        }
    }
    Some(tokens)
}

/// Segment a line into reading-less tokens.
pub fn segment_tokens(line: &str, segmenter: SegmenterKind) -> Vec<Token> {
    segmenter.segment(line).into_iter().map(Token::plain).collect()
}

/// Which tokenization path a session uses; chosen once at construction.
#[derive(Clone)]
pub enum TokenizerStrategy {
    Morphological(Arc<dyn MorphTokenizer>),
    Segmenter(SegmenterKind),
}

impl TokenizerStrategy {
    /// Tokens for one line, before reading overrides.
    pub fn tokens(&self, line: &str) -> Vec<Token> {
        match self {
            TokenizerStrategy::Morphological(tokenizer) => {
                tokenize_line(line, Some(tokenizer.as_ref())).unwrap_or_default()
            }
            TokenizerStrategy::Segmenter(kind) => segment_tokens(line, *kind),
        }
    }

    pub fn is_morphological(&self) -> bool {
        matches!(self, TokenizerStrategy::Morphological(_))
    }
}

impl Default for TokenizerStrategy {
    fn default() -> Self {
        TokenizerStrategy::Segmenter(SegmenterKind::default())
    }
}

impl fmt::Debug for TokenizerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizerStrategy::Morphological(t) => {
                f.debug_tuple("Morphological").field(&t.name()).finish()
            }
            TokenizerStrategy::Segmenter(kind) => f.debug_tuple("Segmenter").field(kind).finish(),
        }
    }
}
