// libnihongo/core/src/romaji.rs
//
// Hepburn-style romanisation of hiragana.
//
// The scan is left to right over chars with a two-char window:
// - っ doubles the first letter of the following mora and emits nothing itself
// - ー repeats the last emitted vowel
// - digraphs (きゃ, しぇ, ふぁ, ...) are matched before single kana
// - ん becomes n' when the next mora starts with a vowel or y
// - anything unmapped is echoed verbatim

use crate::kana::to_hiragana;

/// Two-kana combinations that form a single mora.
static DIGRAPHS: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "きゃ" => "kya", "きゅ" => "kyu", "きょ" => "kyo",
    "ぎゃ" => "gya", "ぎゅ" => "gyu", "ぎょ" => "gyo",
    "しゃ" => "sha", "しゅ" => "shu", "しょ" => "sho",
    "じゃ" => "ja", "じゅ" => "ju", "じょ" => "jo",
    "ちゃ" => "cha", "ちゅ" => "chu", "ちょ" => "cho",
    "にゃ" => "nya", "にゅ" => "nyu", "にょ" => "nyo",
    "ひゃ" => "hya", "ひゅ" => "hyu", "ひょ" => "hyo",
    "びゃ" => "bya", "びゅ" => "byu", "びょ" => "byo",
    "ぴゃ" => "pya", "ぴゅ" => "pyu", "ぴょ" => "pyo",
    "みゃ" => "mya", "みゅ" => "myu", "みょ" => "myo",
    "りゃ" => "rya", "りゅ" => "ryu", "りょ" => "ryo",
    "ふぁ" => "fa", "ふぃ" => "fi", "ふぇ" => "fe", "ふぉ" => "fo",
    "てぃ" => "ti", "でぃ" => "di",
    "つぁ" => "tsa", "つぃ" => "tsi", "つぇ" => "tse", "つぉ" => "tso",
    "うぁ" => "wa", "うぃ" => "wi", "うぇ" => "we", "うぉ" => "wo",
    "しぇ" => "she", "ちぇ" => "che", "じぇ" => "je",
};

/// Single kana, plus the two sentence marks.
static KANA: phf::Map<char, &'static str> = phf::phf_map! {
    'あ' => "a", 'い' => "i", 'う' => "u", 'え' => "e", 'お' => "o",
    'か' => "ka", 'き' => "ki", 'く' => "ku", 'け' => "ke", 'こ' => "ko",
    'さ' => "sa", 'し' => "shi", 'す' => "su", 'せ' => "se", 'そ' => "so",
    'た' => "ta", 'ち' => "chi", 'つ' => "tsu", 'て' => "te", 'と' => "to",
    'な' => "na", 'に' => "ni", 'ぬ' => "nu", 'ね' => "ne", 'の' => "no",
    'は' => "ha", 'ひ' => "hi", 'ふ' => "fu", 'へ' => "he", 'ほ' => "ho",
    'ま' => "ma", 'み' => "mi", 'む' => "mu", 'め' => "me", 'も' => "mo",
    'や' => "ya", 'ゆ' => "yu", 'よ' => "yo",
    'ら' => "ra", 'り' => "ri", 'る' => "ru", 'れ' => "re", 'ろ' => "ro",
    'わ' => "wa", 'を' => "o", 'ん' => "n",
    'が' => "ga", 'ぎ' => "gi", 'ぐ' => "gu", 'げ' => "ge", 'ご' => "go",
    'ざ' => "za", 'じ' => "ji", 'ず' => "zu", 'ぜ' => "ze", 'ぞ' => "zo",
    'だ' => "da", 'ぢ' => "ji", 'づ' => "zu", 'で' => "de", 'ど' => "do",
    'ば' => "ba", 'び' => "bi", 'ぶ' => "bu", 'べ' => "be", 'ぼ' => "bo",
    'ぱ' => "pa", 'ぴ' => "pi", 'ぷ' => "pu", 'ぺ' => "pe", 'ぽ' => "po",
    'ぁ' => "a", 'ぃ' => "i", 'ぅ' => "u", 'ぇ' => "e", 'ぉ' => "o",
    'ゃ' => "ya", 'ゅ' => "yu", 'ょ' => "yo",
    'ゔ' => "vu",
    'ー' => "-",
    '、' => ",",
    '。' => ".",
};

fn digraph_at(chars: &[char], i: usize) -> Option<&'static str> {
    let pair = chars.get(i..i + 2)?;
    let key: String = pair.iter().collect();
    DIGRAPHS.get(key.as_str()).copied()
}

/// Romaji of the mora starting at `i`, digraphs first.
fn mora_at(chars: &[char], i: usize) -> Option<&'static str> {
    digraph_at(chars, i).or_else(|| chars.get(i).and_then(|c| KANA.get(c).copied()))
}

fn is_vowel(ch: char) -> bool {
    matches!(ch, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Romanise a hiragana string.
///
/// Katakana is not converted here; use [`kana_to_romaji`] for mixed input.
///
/// ```
/// use libnihongo_core::romaji::romanize;
///
/// assert_eq!(romanize("がっこう"), "gakkou");
/// assert_eq!(romanize("けんい"), "ken'i");
/// assert_eq!(romanize("らーめん"), "raamen");
/// ```
pub fn romanize(hiragana: &str) -> String {
    let chars: Vec<char> = hiragana.chars().collect();
    let mut out = String::with_capacity(hiragana.len());
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];

        if ch == 'っ' {
            if let Some(first) = mora_at(&chars, i + 1).and_then(|r| r.chars().next()) {
                out.push(first);
            }
            i += 1;
            continue;
        }

        if ch == 'ー' {
            if let Some(vowel) = out.chars().last().filter(|c| is_vowel(*c)) {
                out.push(vowel);
            }
            i += 1;
            continue;
        }

        if let Some(romaji) = digraph_at(&chars, i) {
            out.push_str(romaji);
            i += 2;
            continue;
        }

        if ch == 'ん' {
            let apostrophe = mora_at(&chars, i + 1)
                .and_then(|r| r.chars().next())
                .is_some_and(|c| is_vowel(c) || c == 'y');
            out.push_str(if apostrophe { "n'" } else { "n" });
            i += 1;
            continue;
        }

        match KANA.get(&ch) {
            Some(romaji) => out.push_str(romaji),
            None => out.push(ch),
        }
        i += 1;
    }

    out
}

/// Normalise katakana to hiragana, then romanise.
pub fn kana_to_romaji(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    romanize(&to_hiragana(text))
}
