//! Text encoding, wrapping and text operators

use crate::metrics::{encoded_width, glyph_width};
use lopdf::content::Operation;
use lopdf::{Object, StringFormat};

/// Encode text for a simple font with WinAnsiEncoding
///
/// Characters outside the encoding become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '\u{A0}'..='\u{FF}' => c as u32 as u8,
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
        '\t' => b' ',
        _ => b'?',
    }
}

/// Split text into lines no wider than `max_width` points
///
/// Breaks on whitespace; a single word wider than the line is split by
/// character. Always returns at least one (possibly empty) line.
pub fn wrap_to_width(text: &str, bold: bool, font_size: f64, max_width: f64) -> Vec<String> {
    let space = glyph_width(b' ', bold) as f64 * font_size / 1000.0;
    let width_of = |s: &str| encoded_width(&encode_win_ansi(s), bold, font_size);

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0;

    for word in text.split_whitespace() {
        let word_width = width_of(word);

        if !current.is_empty() && current_width + space + word_width <= max_width {
            current.push(' ');
            current.push_str(word);
            current_width += space + word_width;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if word_width <= max_width {
            current = word.to_string();
            current_width = word_width;
            continue;
        }

        // Hard-break an overlong word
        let mut piece = String::new();
        let mut piece_width = 0.0;
        for c in word.chars() {
            let w = glyph_width(win_ansi_byte(c), bold) as f64 * font_size / 1000.0;
            if !piece.is_empty() && piece_width + w > max_width {
                lines.push(std::mem::take(&mut piece));
                piece_width = 0.0;
            }
            piece.push(c);
            piece_width += w;
        }
        current = piece;
        current_width = piece_width;
    }

    if !current.is_empty() {
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Word spacing that stretches `line` to `target_width` points
///
/// Zero for lines without spaces or already at full width.
pub fn justify_spacing(line: &str, bold: bool, font_size: f64, target_width: f64) -> f64 {
    let gaps = line.chars().filter(|c| *c == ' ').count();
    if gaps == 0 {
        return 0.0;
    }
    let slack = target_width - encoded_width(&encode_win_ansi(line), bold, font_size);
    if slack <= 0.0 {
        0.0
    } else {
        slack / gaps as f64
    }
}

/// Text placement on a page, in PDF points from the bottom-left corner
pub struct TextPlacement<'a> {
    /// Font resource name (e.g. "F1")
    pub font: &'a str,
    pub font_size: f64,
    pub x: f64,
    pub y: f64,
    /// Extra space added to each ASCII space (the `Tw` operator)
    pub word_spacing: f64,
}

pub(crate) fn real(value: f64) -> Object {
    Object::Real(value as _)
}

/// Build the BT ... ET operators that show `encoded` at a placement
pub fn text_operations(encoded: Vec<u8>, placement: &TextPlacement<'_>) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![
                Object::Name(placement.font.as_bytes().to_vec()),
                real(placement.font_size),
            ],
        ),
        Operation::new("Tw", vec![real(placement.word_spacing)]),
        Operation::new("Td", vec![real(placement.x), real(placement.y)]),
        Operation::new("Tj", vec![Object::String(encoded, StringFormat::Literal)]),
        Operation::new("ET", vec![]),
    ];

    // Word spacing is part of the text state and outlives ET
    if placement.word_spacing != 0.0 {
        ops.push(Operation::new("Tw", vec![real(0.0)]));
    }

    ops
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::text_width;

    #[test]
    fn test_encode_ascii_and_latin1() {
        assert_eq!(encode_win_ansi("Ma'am"), b"Ma'am".to_vec());
        assert_eq!(encode_win_ansi("é"), vec![0xE9]);
        assert_eq!(encode_win_ansi("Ma’am"), vec![b'M', b'a', 0x92, b'a', b'm']);
        assert_eq!(encode_win_ansi("ก"), b"?".to_vec());
    }

    #[test]
    fn test_wrap_fits_width() {
        let text = "Sending you Pre-Shipment sample of the following items for your kind approval and records";
        let lines = wrap_to_width(text, false, 10.0, 150.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, false, 10.0) <= 150.0, "{line}");
        }
        assert_eq!(lines.join(" "), text);
    }

    #[test]
    fn test_wrap_empty() {
        assert_eq!(wrap_to_width("", false, 10.0, 100.0), vec![String::new()]);
        assert_eq!(wrap_to_width("   ", false, 10.0, 100.0), vec![String::new()]);
    }

    #[test]
    fn test_wrap_overlong_word() {
        let word = "W".repeat(40);
        let lines = wrap_to_width(&word, false, 10.0, 50.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_justify_spacing() {
        assert_eq!(justify_spacing("single", false, 10.0, 200.0), 0.0);
        let line = "a b c";
        let spacing = justify_spacing(line, false, 10.0, 100.0);
        let natural = text_width(line, false, 10.0);
        assert!((natural + 2.0 * spacing - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_text_operations() {
        let placement = TextPlacement {
            font: "F2",
            font_size: 10.0,
            x: 30.0,
            y: 700.0,
            word_spacing: 0.0,
        };
        let ops = text_operations(b"Hi".to_vec(), &placement);
        let operators: Vec<&str> = ops.iter().map(|op| op.operator.as_str()).collect();
        assert_eq!(operators, vec!["BT", "Tf", "Tw", "Td", "Tj", "ET"]);

        let justified = TextPlacement {
            word_spacing: 1.5,
            ..placement
        };
        let ops = text_operations(b"Hi there".to_vec(), &justified);
        assert_eq!(ops.last().unwrap().operator, "Tw");
    }
}
