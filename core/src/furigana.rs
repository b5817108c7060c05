//! Furigana alignment: distributing a token's reading over its kanji runs.
//!
//! The token is cut into kana and non-kana runs. Kana runs anchor the reading:
//! each kanji run receives the slice of the reading between the current cursor
//! and the next occurrence of the following kana run. When an anchor cannot be
//! found the kanji run absorbs the rest of the reading, so a bad reading gives
//! an imprecise gloss instead of an error.

use crate::charclass::{has_kana, has_kanji, is_kana, is_small_kana, is_small_tsu};
use crate::kana::to_hiragana;
use serde::{Deserialize, Serialize};

/// One rendered piece of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FuriganaSegment {
    /// Rendered as-is.
    Plain { text: String },
    /// A kana run; no gloss.
    Kana { text: String },
    /// A kanji run with its slice of the reading.
    Kanji {
        text: String,
        reading: String,
        /// Kanji run plus okurigana prefix, used as the lookup / hover key.
        hover_key: String,
    },
}

impl FuriganaSegment {
    pub fn text(&self) -> &str {
        match self {
            FuriganaSegment::Plain { text }
            | FuriganaSegment::Kana { text }
            | FuriganaSegment::Kanji { text, .. } => text,
        }
    }

    /// The gloss of a kanji segment, if any.
    pub fn reading(&self) -> Option<&str> {
        match self {
            FuriganaSegment::Kanji { reading, .. } => Some(reading),
            _ => None,
        }
    }

    pub fn hover_key(&self) -> Option<&str> {
        match self {
            FuriganaSegment::Kanji { hover_key, .. } => Some(hover_key),
            _ => None,
        }
    }
}

/// Alternating maximal runs of kana and non-kana characters.
fn kana_runs(text: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    let mut start = 0;
    let mut prev: Option<bool> = None;
    for (i, ch) in text.char_indices() {
        let kana = is_kana(ch);
        if prev.is_some_and(|p| p != kana) {
            runs.push(&text[start..i]);
            start = i;
        }
        prev = Some(kana);
    }
    if start < text.len() {
        runs.push(&text[start..]);
    }
    runs
}

/// Leading okurigana used to key a kanji run: the first kana, or the first
/// two when they form a geminate (っ + kana) or a glide (kana + small kana).
pub fn okurigana_prefix(kana: &str) -> &str {
    let mut chars = kana.char_indices();
    let Some((_, first)) = chars.next() else {
        return "";
    };
    match chars.next() {
        Some((i, second)) if is_small_tsu(first) || is_small_kana(second) => {
            &kana[..i + second.len_utf8()]
        }
        _ => &kana[..first.len_utf8()],
    }
}

/// Split `token` into furigana segments given its `reading` (kana, any script).
///
/// An empty reading yields a single plain segment. Concatenating the `text`
/// of the result always reproduces `token`.
///
/// ```
/// use libnihongo_core::furigana::{split_for_furigana, FuriganaSegment};
///
/// let segments = split_for_furigana("行き", "イキ");
/// assert_eq!(segments[0].reading(), Some("い"));
/// assert_eq!(segments[1], FuriganaSegment::Kana { text: "き".into() });
/// ```
pub fn split_for_furigana(token: &str, reading: &str) -> Vec<FuriganaSegment> {
    if reading.is_empty() {
        return vec![FuriganaSegment::Plain {
            text: token.to_string(),
        }];
    }

    let runs = kana_runs(token);
    let hira = to_hiragana(reading);
    let mut cursor = 0usize;
    let mut segments = Vec::with_capacity(runs.len());

    for (i, run) in runs.iter().enumerate() {
        if has_kana(run) {
            let run_hira = to_hiragana(run);
            if let Some(found) = hira[cursor..].find(&run_hira) {
                cursor += found + run_hira.len();
            }
            segments.push(FuriganaSegment::Kana {
                text: run.to_string(),
            });
            continue;
        }

        if has_kanji(run) {
            let next_kana = runs[i + 1..].iter().find(|r| has_kana(r));
            let anchor = next_kana.and_then(|k| hira[cursor..].find(&to_hiragana(k)));
            let slice = match anchor {
                Some(found) => {
                    let slice = &hira[cursor..cursor + found];
                    cursor += found;
                    slice
                }
                None => {
                    let slice = &hira[cursor..];
                    cursor = hira.len();
                    slice
                }
            };
            let immediate = runs.get(i + 1).filter(|r| has_kana(r)).copied().unwrap_or("");
            segments.push(FuriganaSegment::Kanji {
                text: run.to_string(),
                reading: slice.to_string(),
                hover_key: format!("{}{}", run, okurigana_prefix(immediate)),
            });
            continue;
        }

        segments.push(FuriganaSegment::Plain {
            text: run.to_string(),
        });
    }

    segments
}

/// Inline markup for a token's segments: `漢字{かんじ}` for glossed kanji runs,
/// plain text otherwise.
pub fn segments_to_markup(segments: &[FuriganaSegment]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            FuriganaSegment::Kanji { text, reading, .. } if !reading.is_empty() => {
                out.push_str(text);
                out.push('{');
                out.push_str(reading);
                out.push('}');
            }
            other => out.push_str(other.text()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kanji(text: &str, reading: &str, hover_key: &str) -> FuriganaSegment {
        FuriganaSegment::Kanji {
            text: text.into(),
            reading: reading.into(),
            hover_key: hover_key.into(),
        }
    }

    fn kana(text: &str) -> FuriganaSegment {
        FuriganaSegment::Kana { text: text.into() }
    }

    fn plain(text: &str) -> FuriganaSegment {
        FuriganaSegment::Plain { text: text.into() }
    }

    fn reconstruct(segments: &[FuriganaSegment]) -> String {
        segments.iter().map(FuriganaSegment::text).collect()
    }

    #[test]
    fn empty_reading_is_plain() {
        assert_eq!(split_for_furigana("東京", ""), vec![plain("東京")]);
    }

    #[test]
    fn whole_kanji_word() {
        assert_eq!(
            split_for_furigana("東京", "トウキョウ"),
            vec![kanji("東京", "とうきょう", "東京")]
        );
    }

    #[test]
    fn trailing_okurigana() {
        assert_eq!(
            split_for_furigana("行き", "いき"),
            vec![kanji("行", "い", "行き"), kana("き")]
        );
    }

    #[test]
    fn interleaved_kana() {
        assert_eq!(
            split_for_furigana("取り扱い", "とりあつかい"),
            vec![
                kanji("取", "と", "取り"),
                kana("り"),
                kanji("扱", "あつか", "扱い"),
                kana("い"),
            ]
        );
    }

    #[test]
    fn leading_kana_and_katakana_text_preserved() {
        assert_eq!(
            split_for_furigana("お茶", "おちゃ"),
            vec![kana("お"), kanji("茶", "ちゃ", "茶")]
        );
        let segments = split_for_furigana("カレー屋", "カレーや");
        assert_eq!(segments, vec![kana("カレー"), kanji("屋", "や", "屋")]);
    }

    #[test]
    fn digits_and_latin_are_plain() {
        assert_eq!(
            split_for_furigana("１２月", "がつ"),
            vec![kanji("１２月", "がつ", "１２月")]
        );
        assert_eq!(
            split_for_furigana("Tシャツ", "ティーシャツ"),
            vec![plain("T"), kana("シャツ")]
        );
    }

    #[test]
    fn okurigana_prefix_rules() {
        assert_eq!(okurigana_prefix(""), "");
        assert_eq!(okurigana_prefix("べる"), "べ");
        assert_eq!(okurigana_prefix("った"), "った");
        assert_eq!(okurigana_prefix("しゃる"), "しゃ");
        assert_eq!(okurigana_prefix("ッテ"), "ッテ");
        assert_eq!(okurigana_prefix("き"), "き");
    }

    #[test]
    fn hover_key_uses_geminate_prefix() {
        let segments = split_for_furigana("行った", "いった");
        assert_eq!(segments[0], kanji("行", "い", "行った"));
    }

    #[test]
    fn short_reading_is_absorbed() {
        let segments = split_for_furigana("食べる", "た");
        assert_eq!(segments, vec![kanji("食", "た", "食べ"), kana("べる")]);
        assert_eq!(reconstruct(&segments), "食べる");
    }

    #[test]
    fn reconstruction_holds_for_mismatched_readings() {
        let cases = [
            ("東京に行きました", "トウキョウニイキマシタ"),
            ("日本語ABC", "にほんご"),
            ("取り扱い説明書", "xyz"),
            ("ー々", "ー"),
            ("", "あ"),
        ];
        for (token, reading) in cases {
            assert_eq!(reconstruct(&split_for_furigana(token, reading)), token);
        }
    }

    #[test]
    fn markup() {
        let segments = split_for_furigana("行き", "いき");
        assert_eq!(segments_to_markup(&segments), "行{い}き");
        assert_eq!(segments_to_markup(&[plain("abc")]), "abc");
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_string(&kana("き")).unwrap();
        assert_eq!(json, r#"{"type":"kana","text":"き"}"#);
    }
}
