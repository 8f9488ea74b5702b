// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Greedy word wrap against measured glyph widths.

use crate::style::TextStyle;
use crate::text::metrics::{printable, text_width};

/// Wrapped lines of one cell plus the height they need.
///
/// Always computed before anything in the row is drawn: the row height is the
/// maximum over its cells.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredCell {
    pub lines: Vec<String>,
    pub height: f32,
}

impl MeasuredCell {
    pub fn measure(text: &str, max_width: f32, style: &TextStyle, line_height: f32) -> Self {
        let lines = wrap(text, max_width, style);
        let height = lines.len().max(1) as f32 * line_height;
        Self { lines, height }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

/// Split `text` into the fewest lines whose measured width fits `max_width`.
///
/// - Empty or whitespace-only text yields a single empty line, so a blank
///   field still reserves one line of height.
/// - Hard newlines start a new paragraph; runs of spaces collapse.
/// - A word wider than `max_width` is broken between characters. A single
///   glyph wider than `max_width` is placed on its own line regardless; that
///   is the only way a line can exceed the width.
pub fn wrap(text: &str, max_width: f32, style: &TextStyle) -> Vec<String> {
    let text = printable(text);
    let text = text.trim();
    if text.is_empty() {
        return vec![String::new()];
    }

    let max_width = max_width.max(0.0);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut words = paragraph.split_whitespace().peekable();
        if words.peek().is_none() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        for word in words {
            if current.is_empty() {
                place_word(word, max_width, style, &mut current, &mut lines);
                continue;
            }

            let candidate = format!("{current} {word}");
            if text_width(&candidate, style) <= max_width {
                current = candidate;
            } else {
                lines.push(std::mem::take(&mut current));
                place_word(word, max_width, style, &mut current, &mut lines);
            }
        }

        if !current.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Start a fresh line with `word`, force-breaking it if it cannot fit.
///
/// Full chunks are pushed to `lines`; the trailing remainder stays in
/// `current` so following words can join it.
fn place_word(
    word: &str,
    max_width: f32,
    style: &TextStyle,
    current: &mut String,
    lines: &mut Vec<String>,
) {
    if text_width(word, style) <= max_width {
        current.push_str(word);
        return;
    }

    for c in word.chars() {
        let mut candidate = current.clone();
        candidate.push(c);
        if !current.is_empty() && text_width(&candidate, style) > max_width {
            lines.push(std::mem::take(current));
            current.push(c);
        } else {
            *current = candidate;
        }
    }
}

/// `text` as a single line no wider than `max_width`, cut short with "..."
/// when it would not fit. Yields an empty string when not even the ellipsis
/// fits.
pub fn fit_line(text: &str, max_width: f32, style: &TextStyle) -> String {
    const ELLIPSIS: &str = "...";
    let text = printable(text).replace('\n', " ");
    if text_width(&text, style) <= max_width {
        return text;
    }
    if text_width(ELLIPSIS, style) > max_width {
        return String::new();
    }

    let mut fitted = ELLIPSIS.to_string();
    for (index, c) in text.char_indices() {
        let candidate = format!("{}{ELLIPSIS}", text[..index + c.len_utf8()].trim_end());
        if text_width(&candidate, style) > max_width {
            break;
        }
        fitted = candidate;
    }
    fitted
}
