// Rendering: turns positioned pages into drawing calls on a page surface.
// Positions arrive top-down from the paginator; surfaces decide how to map
// them onto their own coordinate system.

pub mod pdf;

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

use crate::layout::font_metrics::{Font, FontFamily, MeasurementError, TextMeasurer};
use crate::layout::page::{Align, Page, PageGeometry, PositionedLine};
use crate::layout::style::Color;

pub use pdf::PdfSurface;

/// Distance between a bullet glyph and the text it introduces.
pub const BULLET_GAP: f32 = 8.0;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Measurement(#[from] MeasurementError),

    #[error("character {0:?} has no WinAnsi code point")]
    Unencodable(char),

    #[error("failed to compress page content: {0}")]
    Compress(#[from] std::io::Error),
}

/// One run of text to draw. `baseline` is measured from the top edge of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawText<'a> {
    pub text: &'a str,
    pub x: f32,
    pub baseline: f32,
    pub font: Font,
    pub color: Color,
    /// Extra space added to every ASCII space, in points.
    pub word_spacing: f32,
}

/// A drawing target that receives pages in order.
pub trait PageSurface {
    fn begin_page(&mut self, number: usize, width: f32, height: f32);

    fn draw_text(&mut self, text: &DrawText<'_>) -> Result<(), RenderError>;

    fn end_page(&mut self) -> Result<(), RenderError>;
}

pub struct Renderer<'a> {
    geometry: PageGeometry,
    family: FontFamily,
    measurer: &'a TextMeasurer,
}

impl<'a> Renderer<'a> {
    pub fn new(geometry: PageGeometry, family: FontFamily, measurer: &'a TextMeasurer) -> Self {
        Self {
            geometry,
            family,
            measurer,
        }
    }

    pub fn render<S: PageSurface>(&self, pages: &[Page], surface: &mut S) -> Result<(), RenderError> {
        for page in pages {
            surface.begin_page(page.number, self.geometry.width, self.geometry.height);
            for line in &page.lines {
                self.draw_line(line, surface)?;
            }
            surface.end_page()?;
        }
        Ok(())
    }

    fn draw_line<S: PageSurface>(&self, line: &PositionedLine, surface: &mut S) -> Result<(), RenderError> {
        let font = line.style.font(self.family);
        let baseline = baseline(line);
        let text: String = line.text.nfc().collect();

        if let Some(glyph) = line.bullet {
            let mut buf = [0u8; 4];
            let glyph = glyph.encode_utf8(&mut buf);
            let glyph_width = self.measurer.width(glyph, font)?;
            surface.draw_text(&DrawText {
                text: glyph,
                x: line.x - BULLET_GAP - glyph_width / 2.0,
                baseline,
                font,
                color: line.style.color,
                word_spacing: 0.0,
            })?;
        }

        let (x, word_spacing) = match line.align {
            Align::Left => (line.x, 0.0),
            Align::Right => (line.x - self.measurer.width(&text, font)?, 0.0),
            Align::Justify { width } => (line.x, self.word_spacing(&text, width, font)?),
        };

        surface.draw_text(&DrawText {
            text: &text,
            x,
            baseline,
            font,
            color: line.style.color,
            word_spacing,
        })
    }

    /// Spacing that stretches `text` to `width`. Falls back to natural spacing
    /// when the gaps would grow wider than one em.
    fn word_spacing(&self, text: &str, width: f32, font: Font) -> Result<f32, RenderError> {
        let gaps = text.matches(' ').count();
        if gaps == 0 {
            return Ok(0.0);
        }
        let slack = width - self.measurer.width(text, font)?;
        let spacing = slack / gaps as f32;
        if spacing <= 0.0 || spacing > font.size {
            return Ok(0.0);
        }
        Ok(spacing)
    }
}

/// Baseline of a line, vertically centred in its line box.
fn baseline(line: &PositionedLine) -> f32 {
    line.y + line.style.line_height * 0.5 + line.style.font_size * 0.35
}

/// Renders already paginated `pages` into PDF bytes.
pub fn render_pdf(
    pages: &[Page],
    geometry: PageGeometry,
    family: FontFamily,
    measurer: &TextMeasurer,
    title: &str,
) -> Result<Vec<u8>, RenderError> {
    let mut surface = PdfSurface::new();
    Renderer::new(geometry, family, measurer).render(pages, &mut surface)?;
    tracing::debug!(pages = surface.page_count(), title, "PDF assembled");
    surface.finish(title)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
