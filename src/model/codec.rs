//! Hex/text codec.
//!
//! Converts raw bytes into display tokens (hex pairs, text glyphs, offset
//! labels) and parses user queries back into byte patterns.
//! Every parse is total: invalid input yields an empty pattern, never an error.

use crate::model::byte_buffer::{classify, ByteClass};
use serde::Deserialize;

/// Smallest supported offset base.
pub const MIN_OFFSET_BASE: u32 = 2;
/// Largest supported offset base.
pub const MAX_OFFSET_BASE: u32 = 36;

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Two-character uppercase hex token for a byte.
pub fn hex_token(byte: u8) -> [char; 2] {
    [
        HEX_DIGITS[(byte >> 4) as usize] as char,
        HEX_DIGITS[(byte & 0x0F) as usize] as char,
    ]
}

/// How space and control characters are drawn in the text column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LowerEncoding {
    /// Every byte shows the `non_printable` glyph.
    #[default]
    Hidden,
    /// Code page 437 pictograms (`☺`, `♥`, `↑`, ...).
    Cp437,
}

/// How `0x7F` and above are drawn in the text column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HigherEncoding {
    /// Every byte shows the `higher` glyph.
    #[default]
    Hidden,
    /// Code page 437 (accented letters, box drawing, Greek).
    Cp437,
    /// Windows-1252. Unassigned and invisible codes fall back to `higher`.
    Windows1252,
}

/// Glyphs substituted for bytes that have no printable representation.
///
/// Every glyph fills exactly one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphSet {
    /// Shown for `0x00`.
    pub null: char,
    /// Shown for space and control characters under [`LowerEncoding::Hidden`].
    pub non_printable: char,
    /// Shown for `0x7F` and above under [`HigherEncoding::Hidden`].
    pub higher: char,
    /// Encoding of space and control characters.
    pub lower_encoding: LowerEncoding,
    /// Encoding of `0x7F` and above.
    pub higher_encoding: HigherEncoding,
}

impl Default for GlyphSet {
    fn default() -> Self {
        Self {
            null: '0',
            non_printable: '.',
            higher: '.',
            lower_encoding: LowerEncoding::Hidden,
            higher_encoding: HigherEncoding::Hidden,
        }
    }
}

impl GlyphSet {
    /// Text-column glyph for a byte.
    pub fn glyph(&self, byte: u8) -> char {
        match classify(byte) {
            ByteClass::Null => self.null,
            ByteClass::Printable => byte as char,
            ByteClass::NonPrintable => match self.lower_encoding {
                LowerEncoding::Hidden => self.non_printable,
                LowerEncoding::Cp437 => cp437_low(byte),
            },
            ByteClass::Higher => match self.higher_encoding {
                HigherEncoding::Hidden => self.higher,
                HigherEncoding::Cp437 => cp437_high(byte),
                HigherEncoding::Windows1252 => windows_1252(byte).unwrap_or(self.higher),
            },
        }
    }
}

/// Code page 437 glyphs for `0x00..=0x1F`. Index 0 is unused: nulls keep
/// their own glyph.
const CP437_LOW: [char; 32] = [
    ' ', '☺', '☻', '♥', '♦', '♣', '♠', '•', '◘', '○', '◙', '♂', '♀', '♪', '♫', '☼',
    '►', '◄', '↕', '‼', '¶', '§', '▬', '↨', '↑', '↓', '→', '←', '∟', '↔', '▲', '▼',
];

/// Code page 437 glyphs for `0x80..=0xFF`.
const CP437_HIGH: [char; 128] = [
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ',
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»',
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐',
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧',
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀',
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩',
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{a0}',
];

/// Windows-1252 assignments for `0x80..=0x9F`.
const WINDOWS_1252_C1: [Option<char>; 32] = [
    Some('€'), None, Some('‚'), Some('ƒ'), Some('„'), Some('…'), Some('†'), Some('‡'),
    Some('ˆ'), Some('‰'), Some('Š'), Some('‹'), Some('Œ'), None, Some('Ž'), None,
    None, Some('‘'), Some('’'), Some('“'), Some('”'), Some('•'), Some('–'), Some('—'),
    Some('˜'), Some('™'), Some('š'), Some('›'), Some('œ'), None, Some('ž'), Some('Ÿ'),
];

fn cp437_low(byte: u8) -> char {
    CP437_LOW.get(usize::from(byte)).copied().unwrap_or(' ')
}

fn cp437_high(byte: u8) -> char {
    match byte {
        0x7F => '⌂',
        0x80..=0xFF => CP437_HIGH[usize::from(byte - 0x80)],
        _ => byte as char,
    }
}

/// Windows-1252 glyph for a byte of `0x7F` or above. `None` for DEL, the
/// five unassigned codes, no-break space and soft hyphen.
fn windows_1252(byte: u8) -> Option<char> {
    match byte {
        0x80..=0x9F => WINDOWS_1252_C1[usize::from(byte - 0x80)],
        0xA0 | 0xAD => None,
        0xA1..=0xFF => Some(char::from(byte)),
        _ => None,
    }
}

/// Parse a hex query into bytes.
///
/// Whitespace is ignored anywhere. An odd number of digits or any non-hex
/// character yields an empty pattern.
pub fn parse_hex_query(input: &str) -> Vec<u8> {
    let digits: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return Vec::new();
    }
    hex::decode(digits).unwrap_or_default()
}

/// Byte pattern of a literal text query (its UTF-8 encoding).
pub fn parse_text_query(input: &str) -> Vec<u8> {
    input.as_bytes().to_vec()
}

/// Format bytes as space separated lowercase hex pairs (`"41 42"`).
pub fn format_hex_pairs(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&hex::encode([*byte]));
    }
    out
}

/// Clamp a requested base into the supported range.
pub fn clamp_offset_base(base: u32) -> u32 {
    base.clamp(MIN_OFFSET_BASE, MAX_OFFSET_BASE)
}

/// Number of digits needed to write `value` in `base`.
pub fn digit_count(mut value: u64, base: u32) -> usize {
    let base = u64::from(clamp_offset_base(base));
    let mut digits = 1;
    while value >= base {
        value /= base;
        digits += 1;
    }
    digits
}

/// Format an offset label in `base`, uppercase, zero-padded to `width`.
pub fn format_offset(value: u64, base: u32, width: usize) -> String {
    let base = clamp_offset_base(base);
    let mut digits = Vec::with_capacity(width.max(1));
    let mut rest = value;
    loop {
        let digit = (rest % u64::from(base)) as u32;
        // from_digit cannot fail: digit < base <= 36
        digits.push(
            char::from_digit(digit, base)
                .unwrap_or('0')
                .to_ascii_uppercase(),
        );
        rest /= u64::from(base);
        if rest == 0 {
            break;
        }
    }
    while digits.len() < width {
        digits.push('0');
    }
    digits.iter().rev().collect()
}

/// Parse an offset typed by the user in `base`. Whitespace is ignored.
pub fn parse_offset(input: &str, base: u32) -> Option<u64> {
    let digits: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(&digits, clamp_offset_base(base)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_token_is_uppercase() {
        assert_eq!(hex_token(0x0A), ['0', 'A']);
        assert_eq!(hex_token(0xFF), ['F', 'F']);
    }

    #[test]
    fn glyphs_follow_classification() {
        let glyphs = GlyphSet::default();
        assert_eq!(glyphs.glyph(b'A'), 'A');
        assert_eq!(glyphs.glyph(0x00), '0');
        assert_eq!(glyphs.glyph(b' '), '.');
        assert_eq!(glyphs.glyph(0xE9), '.');
    }

    #[test]
    fn cp437_encodings_draw_control_and_high_bytes() {
        let glyphs = GlyphSet {
            lower_encoding: LowerEncoding::Cp437,
            higher_encoding: HigherEncoding::Cp437,
            ..GlyphSet::default()
        };
        assert_eq!(glyphs.glyph(0x01), '☺');
        assert_eq!(glyphs.glyph(0x0A), '◙');
        assert_eq!(glyphs.glyph(0x1F), '▼');
        assert_eq!(glyphs.glyph(b' '), ' ');
        assert_eq!(glyphs.glyph(0x7F), '⌂');
        assert_eq!(glyphs.glyph(0x80), 'Ç');
        assert_eq!(glyphs.glyph(0xB3), '│');
        assert_eq!(glyphs.glyph(0xE1), 'ß');
        // Nulls and printable ASCII are untouched.
        assert_eq!(glyphs.glyph(0x00), '0');
        assert_eq!(glyphs.glyph(b'A'), 'A');
    }

    #[test]
    fn windows_1252_falls_back_for_unassigned_codes() {
        let glyphs = GlyphSet {
            higher: '~',
            higher_encoding: HigherEncoding::Windows1252,
            ..GlyphSet::default()
        };
        assert_eq!(glyphs.glyph(0x80), '€');
        assert_eq!(glyphs.glyph(0x99), '™');
        assert_eq!(glyphs.glyph(0xE9), 'é');
        assert_eq!(glyphs.glyph(0x81), '~');
        assert_eq!(glyphs.glyph(0xA0), '~');
        assert_eq!(glyphs.glyph(0x7F), '~');
        // Control characters keep the lower encoding.
        assert_eq!(glyphs.glyph(0x01), '.');
    }

    #[test]
    fn parse_hex_query_strips_whitespace() {
        assert_eq!(parse_hex_query("41 42\t43"), vec![0x41, 0x42, 0x43]);
        assert_eq!(parse_hex_query("dEaD"), vec![0xDE, 0xAD]);
    }

    #[test]
    fn parse_hex_query_rejects_odd_length() {
        assert!(parse_hex_query("414").is_empty());
    }

    #[test]
    fn parse_hex_query_rejects_non_hex() {
        assert!(parse_hex_query("4g").is_empty());
        assert!(parse_hex_query("").is_empty());
    }

    #[test]
    fn text_query_is_utf8() {
        assert_eq!(parse_text_query("AB"), vec![0x41, 0x42]);
        assert_eq!(parse_text_query("é"), vec![0xC3, 0xA9]);
    }

    #[test]
    fn format_hex_pairs_spaces_bytes() {
        assert_eq!(format_hex_pairs(&[0x41, 0xff]), "41 ff");
        assert_eq!(format_hex_pairs(&[]), "");
    }

    #[test]
    fn format_offset_pads_and_uppercases() {
        assert_eq!(format_offset(255, 16, 8), "000000FF");
        assert_eq!(format_offset(8, 8, 4), "0010");
        assert_eq!(format_offset(5, 2, 0), "101");
        assert_eq!(format_offset(35, 36, 2), "0Z");
        assert_eq!(format_offset(0, 10, 0), "0");
    }

    #[test]
    fn digit_count_matches_formatting() {
        assert_eq!(digit_count(0, 16), 1);
        assert_eq!(digit_count(255, 16), 2);
        assert_eq!(digit_count(256, 16), 3);
        assert_eq!(digit_count(7, 2), 3);
    }

    #[test]
    fn parse_offset_uses_base() {
        assert_eq!(parse_offset("ff", 16), Some(255));
        assert_eq!(parse_offset("10", 8), Some(8));
        assert_eq!(parse_offset("zz", 10), None);
        assert_eq!(parse_offset("  ", 16), None);
    }

    #[test]
    fn offset_base_is_clamped() {
        assert_eq!(clamp_offset_base(1), 2);
        assert_eq!(clamp_offset_base(40), 36);
    }
}
