//! Column groups: each column is laid out top-down on its own from a shared
//! starting `y`. Columns are not equalised; the group is as tall as its tallest column.

use crate::layout::blocks::{BlockKind, Column};
use crate::layout::font_metrics::{FontFamily, MeasurementError, TextMeasurer};
use crate::layout::style::{resolve, Role, Style};
use crate::layout::wrap::wrap;

/// One line inside a column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLine {
    pub text: String,
    pub style: Style,
    /// Offset from the column's left edge.
    pub x_offset: f32,
    pub bullet: Option<char>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PositionedColumn {
    /// Offset of the column's left edge from the left margin.
    pub x: f32,
    pub lines: Vec<ColumnLine>,
    /// Uniform height of every line in the column.
    pub line_height: f32,
}

/// Width of each of `count` columns sharing `printable_width`, rounded down to whole points.
pub fn column_width(printable_width: f32, gap: f32, count: usize) -> f32 {
    if count == 0 {
        return 0.0;
    }
    ((printable_width - gap * (count - 1) as f32) / count as f32).floor()
}

/// Lays out every column at `column_width`, left to right with `gap` between them.
pub fn balance(
    columns: &[Column],
    column_width: f32,
    gap: f32,
    family: FontFamily,
    measurer: &TextMeasurer,
) -> Result<Vec<PositionedColumn>, MeasurementError> {
    let title_style = resolve(BlockKind::ThreeColumns, Role::ColumnTitle);
    let item_style = resolve(BlockKind::ThreeColumns, Role::ColumnItem);
    let line_height = title_style.line_height.max(item_style.line_height);

    columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let mut lines = Vec::new();

            for text in wrap(&column.title, column_width, title_style.font(family), measurer)? {
                lines.push(ColumnLine {
                    text,
                    style: title_style,
                    x_offset: 0.0,
                    bullet: None,
                });
            }

            let item_width = (column_width - item_style.left_indent).max(1.0);
            for item in &column.items {
                let wrapped = wrap(item, item_width, item_style.font(family), measurer)?;
                for (n, text) in wrapped.into_iter().enumerate() {
                    lines.push(ColumnLine {
                        text,
                        style: item_style,
                        x_offset: item_style.left_indent,
                        bullet: if n == 0 { item_style.bullet_glyph } else { None },
                    });
                }
            }

            Ok(PositionedColumn {
                x: i as f32 * (column_width + gap),
                lines,
                line_height,
            })
        })
        .collect()
}
