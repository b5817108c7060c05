//! Reading overrides applied after tokenization.
//!
//! General tokenizers mis-read some proper nouns and split some compounds in
//! the wrong place. The correction tables are data: they are loaded from a
//! TOML resource (a bundled default, or a file named in the config) and can be
//! extended at runtime.

use crate::charclass;
use crate::error::{read_to_string, Error, Result};
use crate::tokenizer::Token;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The bundled override resource.
pub const DEFAULT_OVERRIDES_TOML: &str = include_str!("../data/overrides.toml");

fn default_month_reading() -> String {
    "がつ".to_string()
}

/// Correction tables for readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingOverrides {
    /// Reading forced onto digit-run + 月 tokens.
    #[serde(default = "default_month_reading")]
    pub month_reading: String,
    /// Surface → reading for single tokens.
    #[serde(default)]
    pub tokens: AHashMap<String, String>,
    /// Surface of two adjacent tokens → reading of the merged token.
    #[serde(default)]
    pub compounds: AHashMap<String, String>,
}

impl Default for ReadingOverrides {
    /// The bundled table.
    fn default() -> Self {
        // Invalid bundled data degrades to empty tables.
        Self::from_toml_str(DEFAULT_OVERRIDES_TOML).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "bundled reading overrides are invalid");
            Self::empty()
        })
    }
}

impl ReadingOverrides {
    /// Tables with no entries; only the month rule applies.
    pub fn empty() -> Self {
        Self {
            month_reading: default_month_reading(),
            tokens: AHashMap::new(),
            compounds: AHashMap::new(),
        }
    }

    /// Parse override tables from a TOML string.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load override tables from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = read_to_string(path)?;
        let overrides = Self::from_toml_str(&content).map_err(|source| Error::Toml {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(
            path = %path.display(),
            tokens = overrides.tokens.len(),
            compounds = overrides.compounds.len(),
            "loaded reading overrides"
        );
        Ok(overrides)
    }

    pub fn insert_token<S: Into<String>, R: Into<String>>(&mut self, surface: S, reading: R) {
        self.tokens.insert(surface.into(), reading.into());
    }

    pub fn insert_compound<S: Into<String>, R: Into<String>>(&mut self, surface: S, reading: R) {
        self.compounds.insert(surface.into(), reading.into());
    }

    /// Merge adjacent token pairs listed in the compound table.
    fn merge_compounds(&self, tokens: Vec<Token>) -> Vec<Token> {
        let mut merged = Vec::with_capacity(tokens.len());
        let mut iter = tokens.into_iter().peekable();

        while let Some(current) = iter.next() {
            if current.text.is_empty() || current.is_whitespace() {
                merged.push(current);
                continue;
            }
            let reading = iter.peek().and_then(|next| {
                if next.text.is_empty() || next.is_whitespace() {
                    return None;
                }
                let combined = format!("{}{}", current.text, next.text);
                self.compounds
                    .get(&combined)
                    .filter(|r| !r.is_empty())
                    .map(|r| (combined, r.clone()))
            });
            match reading {
                Some((text, reading)) => {
                    iter.next();
                    merged.push(Token { text, reading });
                }
                None => merged.push(current),
            }
        }
        merged
    }

    fn override_token(&self, mut token: Token) -> Token {
        if token.text.is_empty() {
            return token;
        }
        if let Some(reading) = self.tokens.get(&token.text).filter(|r| !r.is_empty()) {
            token.reading = reading.clone();
        } else if charclass::is_month_counter(&token.text) {
            token.reading = self.month_reading.clone();
        }
        token
    }

    /// Apply the compound merge pass, then the per-token pass.
    pub fn apply(&self, tokens: Vec<Token>) -> Vec<Token> {
        self.merge_compounds(tokens)
            .into_iter()
            .map(|t| self.override_token(t))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_resource_parses() {
        let overrides = ReadingOverrides::from_toml_str(DEFAULT_OVERRIDES_TOML).unwrap();
        assert_eq!(overrides.month_reading, "がつ");
        assert_eq!(overrides.tokens.get("日本").map(String::as_str), Some("にほん"));
        assert_eq!(
            overrides.compounds.get("世界大会").map(String::as_str),
            Some("せかいたいかい")
        );
        assert_eq!(ReadingOverrides::default(), overrides);
    }

    #[test]
    fn compound_merge() {
        let overrides = ReadingOverrides::default();
        let tokens = vec![
            Token::with_reading("世界", "セカイ"),
            Token::with_reading("大会", "タイカイ"),
            Token::plain("が"),
        ];
        assert_eq!(
            overrides.apply(tokens),
            vec![
                Token::with_reading("世界大会", "せかいたいかい"),
                Token::plain("が"),
            ]
        );
    }

    #[test]
    fn whitespace_blocks_merge() {
        let overrides = ReadingOverrides::default();
        let tokens = vec![
            Token::with_reading("世界", "セカイ"),
            Token::plain(" "),
            Token::with_reading("大会", "タイカイ"),
        ];
        assert_eq!(overrides.apply(tokens.clone()), tokens);
    }

    #[test]
    fn single_token_override() {
        let overrides = ReadingOverrides::default();
        let out = overrides.apply(vec![Token::with_reading("日本", "ニッポン")]);
        assert_eq!(out, vec![Token::with_reading("日本", "にほん")]);
    }

    #[test]
    fn month_counter_rule() {
        let overrides = ReadingOverrides::empty();
        let out = overrides.apply(vec![
            Token::with_reading("１２月", "ジュウニツキ"),
            Token::plain("3月"),
            Token::plain("月"),
        ]);
        assert_eq!(out[0].reading, "がつ");
        assert_eq!(out[1].reading, "がつ");
        assert_eq!(out[2].reading, "");
    }

    #[test]
    fn runtime_extension() {
        let mut overrides = ReadingOverrides::empty();
        overrides.insert_compound("東京大学", "とうきょうだいがく");
        overrides.insert_token("行方", "ゆくえ");
        let out = overrides.apply(vec![
            Token::plain("東京"),
            Token::plain("大学"),
            Token::plain("行方"),
        ]);
        assert_eq!(
            out,
            vec![
                Token::with_reading("東京大学", "とうきょうだいがく"),
                Token::with_reading("行方", "ゆくえ"),
            ]
        );
    }

    #[test]
    fn merged_tokens_are_not_merged_again() {
        let mut overrides = ReadingOverrides::empty();
        overrides.insert_compound("ab", "x");
        let out = overrides.apply(vec![
            Token::plain("a"),
            Token::plain("b"),
            Token::plain("a"),
            Token::plain("b"),
        ]);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|t| t.text == "ab"));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let overrides = ReadingOverrides::from_toml_str("[tokens]\n\"今日\" = \"きょう\"\n").unwrap();
        assert_eq!(overrides.month_reading, "がつ");
        assert!(overrides.compounds.is_empty());
        assert_eq!(overrides.tokens.len(), 1);
    }
}
