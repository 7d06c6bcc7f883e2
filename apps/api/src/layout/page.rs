//! Page geometry and the positioned output of pagination.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::layout::style::Style;
use crate::layout::LayoutError;

/// Converts millimetres to PDF points (1/72 inch).
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * 72.0 / 25.4
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    A4,
    Letter,
}

impl PageSize {
    /// (width, height) in points, portrait.
    pub fn dimensions_pt(self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            other => Err(format!("unknown page size '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// Physical page layout in points. `y` grows downward from the top edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margins: Margins,
    /// Horizontal gap between the columns of a column group.
    pub column_gap: f32,
}

pub const DEFAULT_COLUMN_GAP: f32 = 12.0;

impl PageGeometry {
    pub fn new(size: PageSize, margin_mm: f32) -> Self {
        let (width, height) = size.dimensions_pt();
        Self {
            width,
            height,
            margins: Margins::uniform(mm_to_pt(margin_mm)),
            column_gap: DEFAULT_COLUMN_GAP,
        }
    }

    pub fn printable_width(&self) -> f32 {
        self.width - self.margins.left - self.margins.right
    }

    pub fn printable_height(&self) -> f32 {
        self.height - self.margins.top - self.margins.bottom
    }

    /// First usable `y` on a page.
    pub fn top(&self) -> f32 {
        self.margins.top
    }

    /// Last usable `y` on a page.
    pub fn bottom(&self) -> f32 {
        self.height - self.margins.bottom
    }

    /// The `x` that right-aligned text hugs.
    pub fn right_edge(&self) -> f32 {
        self.width - self.margins.right
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if !ok(self.printable_width()) || !ok(self.printable_height()) {
            return Err(LayoutError::InvalidGeometry(format!(
                "printable area {:.1}x{:.1}pt on a {:.1}x{:.1}pt page",
                self.printable_width(),
                self.printable_height(),
                self.width,
                self.height
            )));
        }
        if !(self.column_gap.is_finite() && self.column_gap >= 0.0) {
            return Err(LayoutError::InvalidGeometry(format!(
                "column gap {}",
                self.column_gap
            )));
        }
        Ok(())
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::new(PageSize::A4, 20.0)
    }
}

/// Horizontal placement rule of a positioned line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Align {
    /// Text starts at `x`.
    Left,
    /// Text ends at `x`.
    Right,
    /// Text starts at `x` and is stretched to `width` through word spacing.
    Justify { width: f32 },
}

/// The atomic drawable unit handed from pagination to rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedLine {
    pub text: String,
    pub x: f32,
    /// Top of the line box, measured from the top edge of the page.
    pub y: f32,
    /// 1-based page number.
    pub page: usize,
    pub style: Style,
    pub align: Align,
    /// Glyph drawn in front of the first line of a list item.
    pub bullet: Option<char>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub number: usize,
    pub margins: Margins,
    pub lines: Vec<PositionedLine>,
}
