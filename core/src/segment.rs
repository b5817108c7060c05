//! Line segmentation into word-ish units.
//!
//! Every strategy returns slices of the input whose concatenation is exactly
//! the input; empty pieces are never produced.

use icu_segmenter::WordSegmenter;
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

thread_local! {
    // Baked ICU data; the CJ dictionary model is selected per script run.
    static WORDS: WordSegmenter = WordSegmenter::new_auto();
}

/// How a line is cut into units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmenterKind {
    /// ICU word boundaries with the Chinese/Japanese dictionary, so kanji
    /// and kana runs split into words rather than single characters.
    #[default]
    JapaneseWords,
    /// UAX #29 word boundaries (`split_word_bounds`); no dictionary.
    UnicodeWords,
    /// Extended grapheme clusters.
    Graphemes,
    /// Runs of whitespace and runs of non-whitespace, alternating.
    Whitespace,
    /// One unit per `char`.
    Characters,
}

impl SegmenterKind {
    /// Split `line` into units according to this strategy.
    pub fn segment<'a>(&self, line: &'a str) -> Vec<&'a str> {
        match self {
            SegmenterKind::JapaneseWords => dictionary_words(line),
            SegmenterKind::UnicodeWords => line.split_word_bounds().collect(),
            SegmenterKind::Graphemes => line.graphemes(true).collect(),
            SegmenterKind::Whitespace => split_whitespace_runs(line),
            SegmenterKind::Characters => line
                .char_indices()
                .map(|(i, c)| &line[i..i + c.len_utf8()])
                .collect(),
        }
    }
}

/// Pieces between consecutive ICU word breakpoints.
fn dictionary_words(line: &str) -> Vec<&str> {
    WORDS.with(|segmenter| {
        let mut pieces = Vec::new();
        let mut start = 0;
        for end in segmenter.segment_str(line) {
            if end > start && end <= line.len() {
                pieces.push(&line[start..end]);
                start = end;
            }
        }
        if start < line.len() {
            pieces.push(&line[start..]);
        }
        pieces
    })
}

/// Split on whitespace while keeping the whitespace runs as their own pieces.
pub fn split_whitespace_runs(line: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;

    for (i, ch) in line.char_indices() {
        let space = ch.is_whitespace();
        match in_space {
            Some(prev) if prev != space => {
                pieces.push(&line[start..i]);
                start = i;
            }
            _ => {}
        }
        in_space = Some(space);
    }
    if start < line.len() {
        pieces.push(&line[start..]);
    }
    pieces
}

/// Segment a line with the default word segmenter.
pub fn segment_line(line: &str) -> Vec<&str> {
    SegmenterKind::default().segment(line)
}
