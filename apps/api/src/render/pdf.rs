//! PDF backend built on `pdf-writer`.
//!
//! Text uses the standard Type1 fonts with WinAnsiEncoding, so nothing is
//! embedded. Page content streams are Flate-compressed.

use std::collections::BTreeMap;
use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::layout::encoding::encode_winansi;
use crate::layout::font_metrics::FontFace;
use crate::render::{DrawText, PageSurface, RenderError};

const PRODUCER: &str = "docexport";

struct FinishedPage {
    width: f32,
    height: f32,
    content: Vec<u8>,
    fonts: Vec<FontFace>,
}

struct OpenPage {
    width: f32,
    height: f32,
    content: Content,
    fonts: Vec<FontFace>,
}

/// Collects pages in memory and serialises the document on [`PdfSurface::finish`].
#[derive(Default)]
pub struct PdfSurface {
    pages: Vec<FinishedPage>,
    current: Option<OpenPage>,
    /// Resource name of every face used anywhere in the document.
    font_names: BTreeMap<FontFace, String>,
}

impl PdfSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn font_name(&mut self, face: FontFace) -> String {
        let next = self.font_names.len() + 1;
        self.font_names
            .entry(face)
            .or_insert_with(|| format!("F{next}"))
            .clone()
    }

    /// Writes catalog, page tree, fonts, pages and document info.
    pub fn finish(mut self, title: &str) -> Result<Vec<u8>, RenderError> {
        if self.current.is_some() {
            self.end_page()?;
        }

        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let page_tree_id = alloc.bump();
        let info_id = alloc.bump();

        let font_ids: BTreeMap<FontFace, Ref> = self
            .font_names
            .keys()
            .map(|face| (*face, alloc.bump()))
            .collect();
        let page_ids: Vec<(Ref, Ref)> = self
            .pages
            .iter()
            .map(|_| (alloc.bump(), alloc.bump()))
            .collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_ids.iter().map(|(page_id, _)| *page_id))
            .count(page_ids.len() as i32);

        for (face, id) in &font_ids {
            pdf.type1_font(*id)
                .base_font(Name(face.base_font().as_bytes()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        for (page, (page_id, content_id)) in self.pages.iter().zip(&page_ids) {
            let mut writer = pdf.page(*page_id);
            writer
                .media_box(Rect::new(0.0, 0.0, page.width, page.height))
                .parent(page_tree_id)
                .contents(*content_id);
            let mut resources = writer.resources();
            let mut fonts = resources.fonts();
            for face in &page.fonts {
                if let (Some(name), Some(id)) = (self.font_names.get(face), font_ids.get(face)) {
                    fonts.pair(Name(name.as_bytes()), *id);
                }
            }
            fonts.finish();
            resources.finish();
            writer.finish();

            pdf.stream(*content_id, &page.content)
                .filter(Filter::FlateDecode);
        }

        let mut info = pdf.document_info(info_id);
        info.title(TextStr(title)).producer(TextStr(PRODUCER));
        info.finish();

        Ok(pdf.finish())
    }
}

impl PageSurface for PdfSurface {
    fn begin_page(&mut self, _number: usize, width: f32, height: f32) {
        self.current = Some(OpenPage {
            width,
            height,
            content: Content::new(),
            fonts: Vec::new(),
        });
    }

    fn draw_text(&mut self, text: &DrawText<'_>) -> Result<(), RenderError> {
        let bytes = encode_winansi(text.text).map_err(RenderError::Unencodable)?;
        let name = self.font_name(text.font.face);
        let Some(page) = self.current.as_mut() else {
            return Ok(());
        };
        if !page.fonts.contains(&text.font.face) {
            page.fonts.push(text.font.face);
        }

        let (r, g, b) = text.color.to_unit();
        let content = &mut page.content;
        content.set_fill_rgb(r, g, b);
        content.begin_text();
        content.set_font(Name(name.as_bytes()), text.font.size);
        content.set_word_spacing(text.word_spacing);
        content.next_line(text.x, page.height - text.baseline);
        content.show(Str(&bytes));
        content.end_text();
        Ok(())
    }

    fn end_page(&mut self) -> Result<(), RenderError> {
        let Some(page) = self.current.take() else {
            return Ok(());
        };
        let raw = page.content.finish();
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw)?;
        self.pages.push(FinishedPage {
            width: page.width,
            height: page.height,
            content: encoder.finish()?,
            fonts: page.fonts,
        });
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
