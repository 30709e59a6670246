//! Glyph widths for the standard Helvetica fonts
//!
//! Widths are in 1/1000 em, taken from the Adobe AFM files for the printable
//! ASCII range. Other WinAnsi characters use a few known widths and fall back
//! to the width of a digit.

/// Helvetica widths for 0x20..=0x7E
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // digits
    278, 278, 584, 584, 584, 556, 1015, // : ; < = > ? @
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    278, 278, 278, 469, 556, 333, // [ \ ] ^ _ `
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // a-m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // n-z
    334, 260, 334, 584, // { | } ~
];

/// Helvetica-Bold widths for 0x20..=0x7E
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // digits
    333, 333, 584, 584, 584, 611, 975, // : ; < = > ? @
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // A-M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // N-Z
    333, 278, 333, 584, 556, 333, // [ \ ] ^ _ `
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // a-m
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // n-z
    389, 280, 389, 584, // { | } ~
];

const FALLBACK_WIDTH: u16 = 556;

/// Width of one WinAnsi-encoded byte in 1/1000 em
pub fn glyph_width(byte: u8, bold: bool) -> u16 {
    let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
    match byte {
        0x20..=0x7E => table[(byte - 0x20) as usize],
        // quoteleft, quoteright
        0x91 | 0x92 => {
            if bold {
                278
            } else {
                222
            }
        }
        0x96 => 556,          // endash
        0x97 | 0x85 => 1000,  // emdash, ellipsis
        0x95 => 350,          // bullet
        0xA0 => table[0],     // no-break space
        _ => FALLBACK_WIDTH,
    }
}

/// Width of encoded text in points
pub fn encoded_width(encoded: &[u8], bold: bool, font_size: f64) -> f64 {
    let units: u32 = encoded.iter().map(|b| glyph_width(*b, bold) as u32).sum();
    units as f64 * font_size / 1000.0
}

/// Width of text in points once encoded for the page
pub fn text_width(text: &str, bold: bool, font_size: f64) -> f64 {
    encoded_width(&crate::text::encode_win_ansi(text), bold, font_size)
}
