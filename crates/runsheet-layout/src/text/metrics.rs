// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Glyph advance widths for the built-in Helvetica faces.
//
// Values are the Adobe core-font AFM widths (1000 units per em) for printable
// ASCII. Text is folded to printable ASCII by `printable` before it is either
// measured or drawn, so every measured string is exactly the drawn string.

use std::borrow::Cow;

use crate::style::{FontFace, TextStyle};

/// Helvetica, code points 0x20..=0x7E.
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];

/// Helvetica-Bold, code points 0x20..=0x7E.
const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    333, 333, 584, 584, 584, 611, 975, // ':'..'@'
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    333, 278, 333, 584, 556, 333, // '['..'`'
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, // 'a'..'m'
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, // 'n'..'z'
    389, 280, 389, 584, // '{'..'~'
];

/// Advance width of one printable-ASCII character in 1/1000 em.
fn glyph_units(face: FontFace, c: char) -> u16 {
    let table = match face {
        FontFace::Regular => &HELVETICA,
        FontFace::Bold => &HELVETICA_BOLD,
    };
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        table[(code - 0x20) as usize]
    } else {
        // Unreachable for `printable` output; '?' width as a safe guess.
        table[('?' as u32 - 0x20) as usize]
    }
}

/// Width in points of `text` drawn in `style`.
pub fn text_width(text: &str, style: &TextStyle) -> f32 {
    let units: u32 = printable(text)
        .chars()
        .map(|c| glyph_units(style.face, c) as u32)
        .sum();
    units as f32 * style.size / 1000.0
}

/// Width in points of a single character.
pub fn char_width(c: char, style: &TextStyle) -> f32 {
    glyph_units(style.face, c) as f32 * style.size / 1000.0
}

/// Fold text to the printable ASCII subset the built-in fonts can show.
///
/// Typographic punctuation maps to its ASCII look-alike, tabs become spaces,
/// and anything else outside the range becomes '?'. Newlines are kept for the
/// wrapper to split on.
pub fn printable(text: &str) -> Cow<'_, str> {
    if text.chars().all(|c| c == '\n' || (' '..='~').contains(&c)) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            ' '..='~' | '\n' => out.push(c),
            '\t' | '\u{00A0}' => out.push(' '),
            '\r' => {}
            '\u{2018}' | '\u{2019}' | '\u{201A}' => out.push('\''),
            '\u{201C}' | '\u{201D}' | '\u{201E}' => out.push('"'),
            '\u{2013}' | '\u{2014}' | '\u{2212}' => out.push('-'),
            '\u{2026}' => out.push_str("..."),
            '\u{2022}' | '\u{00B7}' => out.push('*'),
            '\u{00B0}' => out.push_str("deg"),
            '\u{00B5}' => out.push('u'),
            _ => out.push('?'),
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_scale_with_font_size() {
        let small = TextStyle::regular(10.0);
        let large = TextStyle::regular(20.0);
        let w = text_width("Pulse 88", &small);
        assert!((text_width("Pulse 88", &large) - 2.0 * w).abs() < 1e-4);
    }

    #[test]
    fn known_afm_widths() {
        let style = TextStyle::regular(1000.0);
        assert_eq!(text_width("A", &style), 667.0);
        assert_eq!(text_width("i", &style), 222.0);
        assert_eq!(text_width("W", &style), 944.0);
        let bold = TextStyle::bold(1000.0);
        assert_eq!(text_width("i", &bold), 278.0);
        assert_eq!(text_width("m", &bold), 889.0);
    }

    #[test]
    fn bold_is_never_narrower_for_letters() {
        let regular = TextStyle::regular(12.0);
        let bold = TextStyle::bold(12.0);
        for c in ('a'..='z').chain('A'..='Z') {
            assert!(char_width(c, &bold) >= char_width(c, &regular), "{c}");
        }
    }

    #[test]
    fn printable_folds_typography() {
        assert_eq!(printable("plain"), Cow::Borrowed("plain"));
        assert_eq!(printable("\u{201C}BP\u{201D} \u{2013} 120/80\u{2026}"), "\"BP\" - 120/80...");
        assert_eq!(printable("37.2\u{00B0}C"), "37.2degC");
        assert_eq!(printable("\u{4E2D}"), "?");
        assert_eq!(printable("a\r\nb\tc"), "a\nb c");
    }
}
