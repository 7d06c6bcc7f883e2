//! WinAnsi (cp1252) encoding for the standard-14 fonts.
//!
//! Only printable glyphs are mapped. Control characters and anything outside
//! cp1252 have no code point in the font and therefore no metrics either.

/// Maps a character to its WinAnsi byte, if the font can draw it.
pub fn winansi_byte(ch: char) -> Option<u8> {
    let byte = match ch {
        '\u{0020}'..='\u{007E}' => ch as u8,
        '\u{00A0}'..='\u{00FF}' => ch as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8A,
        '‹' => 0x8B,
        'Œ' => 0x8C,
        'Ž' => 0x8E,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9A,
        '›' => 0x9B,
        'œ' => 0x9C,
        'ž' => 0x9E,
        'Ÿ' => 0x9F,
        _ => return None,
    };
    Some(byte)
}

/// Encodes a whole string. On failure returns the first character without a code point.
pub fn encode_winansi(text: &str) -> Result<Vec<u8>, char> {
    text.chars()
        .map(|ch| winansi_byte(ch).ok_or(ch))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_passes_through() {
        assert_eq!(encode_winansi("CV 2024").unwrap(), b"CV 2024".to_vec());
    }

    #[test]
    fn test_portuguese_diacritics_map_to_latin1() {
        assert_eq!(
            encode_winansi("ação").unwrap(),
            vec![b'a', 0xE7, 0xE3, b'o']
        );
        assert_eq!(winansi_byte('É'), Some(0xC9));
    }

    #[test]
    fn test_typographic_punctuation_uses_cp1252_slots() {
        assert_eq!(winansi_byte('•'), Some(0x95));
        assert_eq!(winansi_byte('—'), Some(0x97));
        assert_eq!(winansi_byte('€'), Some(0x80));
    }

    #[test]
    fn test_unmappable_character_reported() {
        assert_eq!(encode_winansi("ok ✓"), Err('✓'));
        assert_eq!(winansi_byte('\n'), None);
    }
}
