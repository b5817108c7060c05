//! Character classification for Japanese text.
//!
//! Everything here is a total predicate over `char` or `&str`: no input is
//! rejected and the empty string is never "Japanese", "kana" or "kanji".
//!
//! The string-level patterns are compiled once and kept private; callers only
//! see boolean predicates and the run splitters used by the tokenizer adapter
//! and the lookup key normaliser.

use once_cell::sync::Lazy;
use regex::Regex;

/// Iteration marks, kana blocks, CJK ideographs (incl. extension A and
/// compatibility ideographs) and half-width katakana.
const JAPANESE_CHAR_CLASS: &str = "\u{3005}\u{3006}\u{3007}\u{303B}\u{3040}-\u{309F}\u{30A0}-\u{30FF}\u{3400}-\u{4DBF}\u{4E00}-\u{9FFF}\u{F900}-\u{FAFF}\u{FF66}-\u{FF9D}";

/// Japanese characters plus ASCII and full-width digits.
const TOKENIZABLE_CHAR_CLASS: &str = "\u{3005}\u{3006}\u{3007}\u{303B}\u{3040}-\u{309F}\u{30A0}-\u{30FF}\u{3400}-\u{4DBF}\u{4E00}-\u{9FFF}\u{F900}-\u{FAFF}\u{FF66}-\u{FF9D}0-9\u{FF10}-\u{FF19}";

static JAPANESE_CHAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("[{JAPANESE_CHAR_CLASS}]")).expect("static pattern"));

static JAPANESE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("[{JAPANESE_CHAR_CLASS}]+")).expect("static pattern"));

static JAPANESE_EDGES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        "^[^{JAPANESE_CHAR_CLASS}]+|[^{JAPANESE_CHAR_CLASS}]+$"
    ))
    .expect("static pattern")
});

static TOKENIZABLE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("[{TOKENIZABLE_CHAR_CLASS}]+")).expect("static pattern"));

static JAPANESE_PUNCTUATION_ONLY: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[\u{3001}\u{3002}\u{30FB}\u{300C}\u{300D}]+$").expect("static pattern"));

static MONTH_COUNTER: Lazy<Regex> =
    Lazy::new(|| Regex::new("^[0-9\u{FF10}-\u{FF19}]+月$").expect("static pattern"));

/// CJK Unified Ideographs, including extension A (U+3400–U+9FFF).
pub fn is_kanji(ch: char) -> bool {
    ('\u{3400}'..='\u{9FFF}').contains(&ch)
}

/// True if any character of `text` is a kanji.
pub fn has_kanji(text: &str) -> bool {
    text.chars().any(is_kanji)
}

/// Hiragana, katakana (incl. the prolonged sound mark) or half-width katakana.
pub fn is_kana(ch: char) -> bool {
    matches!(ch, '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}' | '\u{FF66}'..='\u{FF9D}')
}

/// True if any character of `text` is kana.
pub fn has_kana(text: &str) -> bool {
    text.chars().any(is_kana)
}

/// True if `text` is non-empty and made of kana only.
pub fn is_kana_only(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_kana)
}

/// True if `text` contains at least one kanji, kana, iteration mark or
/// prolonged sound mark.
pub fn is_japanese_char(text: &str) -> bool {
    JAPANESE_CHAR.is_match(text)
}

/// True if `text` consists solely of 、。・「」.
pub fn is_japanese_punctuation_only(text: &str) -> bool {
    JAPANESE_PUNCTUATION_ONLY.is_match(text)
}

/// Small vowel and glide kana (ゃゅょぁぃぅぇぉ and katakana forms).
pub fn is_small_kana(ch: char) -> bool {
    matches!(
        ch,
        'ゃ' | 'ゅ' | 'ょ' | 'ぁ' | 'ぃ' | 'ぅ' | 'ぇ' | 'ぉ' | 'ャ' | 'ュ' | 'ョ' | 'ァ' | 'ィ' | 'ゥ' | 'ェ' | 'ォ'
    )
}

/// っ or ッ.
pub fn is_small_tsu(ch: char) -> bool {
    matches!(ch, 'っ' | 'ッ')
}

/// True if `text` is non-empty and whitespace only.
pub fn is_whitespace_only(text: &str) -> bool {
    !text.is_empty() && text.chars().all(char::is_whitespace)
}

/// A digit run followed by 月, e.g. `12月` or `１２月`.
pub fn is_month_counter(text: &str) -> bool {
    MONTH_COUNTER.is_match(text)
}

/// A maximal run of text, tagged by whether it is tokenizable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Run<'a> {
    Tokenizable(&'a str),
    Plain(&'a str),
}

impl<'a> Run<'a> {
    pub fn text(&self) -> &'a str {
        match self {
            Run::Tokenizable(s) | Run::Plain(s) => s,
        }
    }
}

/// Split `text` into alternating tokenizable / plain runs.
///
/// Concatenating the runs reproduces `text`. The empty string yields a single
/// empty plain run.
pub fn tokenizable_runs(text: &str) -> Vec<Run<'_>> {
    if text.is_empty() {
        return vec![Run::Plain("")];
    }
    let mut runs = Vec::new();
    let mut last = 0;
    for m in TOKENIZABLE_RUN.find_iter(text) {
        if m.start() > last {
            runs.push(Run::Plain(&text[last..m.start()]));
        }
        runs.push(Run::Tokenizable(m.as_str()));
        last = m.end();
    }
    if last < text.len() {
        runs.push(Run::Plain(&text[last..]));
    }
    runs
}

/// Strip leading and trailing non-Japanese characters.
pub fn trim_non_japanese(text: &str) -> String {
    JAPANESE_EDGES.replace_all(text, "").into_owned()
}

/// Maximal contiguous runs of Japanese characters, in order.
pub fn japanese_runs(text: &str) -> Vec<&str> {
    JAPANESE_RUN.find_iter(text).map(|m| m.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kanji_range() {
        assert!(is_kanji('漢'));
        assert!(is_kanji('\u{3400}'));
        assert!(!is_kanji('か'));
        assert!(!is_kanji('々'));
        assert!(has_kanji("食べる"));
        assert!(!has_kanji("たべる"));
        assert!(!has_kanji(""));
    }

    #[test]
    fn kana_blocks() {
        assert!(has_kana("ひらがな"));
        assert!(has_kana("カタカナ"));
        assert!(has_kana("ｶﾀｶﾅ"));
        assert!(has_kana("ー"));
        assert!(!has_kana("漢字"));
        assert!(!has_kana(""));
        assert!(is_kana_only("ラーメン"));
        assert!(!is_kana_only("ラーメン屋"));
        assert!(!is_kana_only(""));
    }

    #[test]
    fn japanese_detection() {
        assert!(is_japanese_char("abc日本"));
        assert!(is_japanese_char("々"));
        assert!(is_japanese_char("・"));
        assert!(!is_japanese_char("hello"));
        assert!(!is_japanese_char("123"));
        assert!(!is_japanese_char(""));
    }

    #[test]
    fn punctuation_only() {
        assert!(is_japanese_punctuation_only("、"));
        assert!(is_japanese_punctuation_only("。」"));
        assert!(!is_japanese_punctuation_only("。a"));
        assert!(!is_japanese_punctuation_only(""));
    }

    #[test]
    fn small_kana() {
        assert!(is_small_kana('ゃ'));
        assert!(is_small_kana('ォ'));
        assert!(!is_small_kana('や'));
        assert!(is_small_tsu('っ'));
        assert!(is_small_tsu('ッ'));
        assert!(!is_small_tsu('つ'));
    }

    #[test]
    fn month_counter() {
        assert!(is_month_counter("12月"));
        assert!(is_month_counter("１２月"));
        assert!(!is_month_counter("月"));
        assert!(!is_month_counter("12月に"));
    }

    #[test]
    fn runs_reconstruct_input() {
        let text = "WBCは３月から start!";
        let runs = tokenizable_runs(text);
        let joined: String = runs.iter().map(|r| r.text()).collect();
        assert_eq!(joined, text);
        assert_eq!(
            runs,
            vec![
                Run::Plain("WBC"),
                Run::Tokenizable("は３月から"),
                Run::Plain(" start!"),
            ]
        );
        assert_eq!(tokenizable_runs(""), vec![Run::Plain("")]);
    }

    #[test]
    fn trimming_and_runs() {
        assert_eq!(trim_non_japanese("(食べる)!"), "食べる");
        assert_eq!(trim_non_japanese("abc"), "");
        assert_eq!(japanese_runs("a日本b語c"), vec!["日本", "語"]);
    }
}
