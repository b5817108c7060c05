//! Katakana ⇄ hiragana normalisation.

/// Map katakana (U+30A1–U+30F6) to hiragana; every other character passes
/// through unchanged.
///
/// ```
/// use libnihongo_core::kana::to_hiragana;
///
/// assert_eq!(to_hiragana("トウキョウ"), "とうきょう");
/// assert_eq!(to_hiragana("ラーメン"), "らーめん");
/// ```
pub fn to_hiragana(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '\u{30A1}'..='\u{30F6}' => char::from_u32(ch as u32 - 0x60).unwrap_or(ch),
            _ => ch,
        })
        .collect()
}

/// Inverse of [`to_hiragana`] for U+3041–U+3096.
pub fn to_katakana(text: &str) -> String {
    text.chars()
        .map(|ch| match ch {
            '\u{3041}'..='\u{3096}' => char::from_u32(ch as u32 + 0x60).unwrap_or(ch),
            _ => ch,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn katakana_to_hiragana() {
        assert_eq!(to_hiragana("カタカナ"), "かたかな");
        assert_eq!(to_hiragana("ヴ"), "ゔ");
        assert_eq!(to_hiragana("ァ"), "ぁ");
    }

    #[test]
    fn passthrough_and_idempotence() {
        assert_eq!(to_hiragana("漢字 abc ー"), "漢字 abc ー");
        assert_eq!(to_hiragana("ひらがな"), "ひらがな");
        let once = to_hiragana("ニホンゴ");
        assert_eq!(to_hiragana(&once), once);
    }

    #[test]
    fn leaves_astral_characters_intact() {
        assert_eq!(to_hiragana("𠮷野家"), "𠮷野家");
        assert_eq!(to_hiragana("😀ア"), "😀あ");
    }

    #[test]
    fn hiragana_to_katakana() {
        assert_eq!(to_katakana("とうきょう"), "トウキョウ");
        assert_eq!(to_katakana(&to_hiragana("ヴァイオリン")), "ヴァイオリン");
    }
}
