//! Greedy word wrap against measured glyph widths.
//!
//! Explicit newlines are hard breaks. Within a source line, words are packed
//! until the next one would overflow `max_width`; a word that is wider than the
//! whole line sits alone on its own line rather than being split.

use unicode_normalization::UnicodeNormalization;

use crate::layout::font_metrics::{Font, MeasurementError, TextMeasurer};

/// One output line of [`wrap_lines`].
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    pub text: String,
    /// True for the last line of a source paragraph (before a hard break or end of text).
    pub ends_paragraph: bool,
}

/// Wraps `text` into lines no wider than `max_width` points.
pub fn wrap(
    text: &str,
    max_width: f32,
    font: Font,
    measurer: &TextMeasurer,
) -> Result<Vec<String>, MeasurementError> {
    Ok(wrap_lines(text, max_width, font, measurer)?
        .into_iter()
        .map(|l| l.text)
        .collect())
}

/// Same as [`wrap`], keeping track of which lines close a paragraph.
///
/// Blank source lines between paragraphs survive as empty lines; leading and
/// trailing blank lines are dropped. Whitespace-only input yields no lines.
pub fn wrap_lines(
    text: &str,
    max_width: f32,
    font: Font,
    measurer: &TextMeasurer,
) -> Result<Vec<WrappedLine>, MeasurementError> {
    let normalized: String = text.nfc().collect();
    let space_w = measurer.width(" ", font)?;
    let mut lines = Vec::new();

    for source_line in normalized.trim().lines() {
        let words: Vec<&str> = source_line.split_whitespace().collect();
        if words.is_empty() {
            lines.push(WrappedLine {
                text: String::new(),
                ends_paragraph: true,
            });
            continue;
        }

        let mut current = String::new();
        let mut current_width = 0.0_f32;

        for word in words {
            let word_w = measurer.width(word, font)?;

            if current.is_empty() {
                current.push_str(word);
                current_width = word_w;
            } else if current_width + space_w + word_w > max_width {
                // Current line is full — flush it and start the next one with this word.
                lines.push(WrappedLine {
                    text: std::mem::take(&mut current),
                    ends_paragraph: false,
                });
                current.push_str(word);
                current_width = word_w;
            } else {
                current.push(' ');
                current.push_str(word);
                current_width += space_w + word_w;
            }
        }

        lines.push(WrappedLine {
            text: current,
            ends_paragraph: true,
        });
    }

    Ok(lines)
}
