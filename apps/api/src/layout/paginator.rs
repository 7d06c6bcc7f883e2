//! Pagination — walks the block sequence in order and assigns every line a page
//! and a vertical position.
//!
//! # Rules
//! - A block that does not fit the rest of the page moves to a fresh page.
//! - Headings and subheadings travel with the first line of the content below
//!   them; consecutive headers chain (heading + subheading + first bullet line).
//! - Content directly under a header on the current page splits between lines
//!   instead of moving, so the header is never left alone.
//! - A block taller than a whole page starts on a fresh page and splits between
//!   lines, never inside one.
//! - Spacers only move the cursor: elided at the top of a page, clamped at the
//!   bottom so they never cause a break on their own.
//! - Space before a block is dropped at the top of a page; space after never
//!   forces a break.

use unicode_normalization::UnicodeNormalization;

use crate::layout::blocks::{Block, BlockKind, Column};
use crate::layout::columns::{balance, column_width};
use crate::layout::font_metrics::{FontFamily, MeasurementError, TextMeasurer};
use crate::layout::page::{Align, Page, PageGeometry, PositionedLine};
use crate::layout::style::{resolve, Role, Style};
use crate::layout::wrap::{wrap, wrap_lines};
use crate::layout::LayoutError;

/// Slack for float comparisons against the bottom margin.
const EPSILON: f32 = 0.01;

const CONTACT_SEPARATOR: &str = " | ";

// ────────────────────────────────────────────────────────────────────────────
// Laid-out blocks
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Span {
    text: String,
    /// Offset from the left margin.
    x: f32,
    style: Style,
    align: Align,
    bullet: Option<char>,
}

/// One line box. Pages may only break between rows.
#[derive(Debug, Clone)]
struct Row {
    height: f32,
    spans: Vec<Span>,
}

impl Row {
    fn single(text: String, x: f32, style: Style, align: Align, bullet: Option<char>) -> Self {
        let spans = if text.is_empty() {
            Vec::new()
        } else {
            vec![Span {
                text,
                x,
                style,
                align,
                bullet,
            }]
        };
        Row {
            height: style.line_height,
            spans,
        }
    }
}

#[derive(Debug, Clone)]
struct LaidBlock {
    kind: BlockKind,
    space_before: f32,
    space_after: f32,
    rows: Vec<Row>,
}

impl LaidBlock {
    fn new(kind: BlockKind, style: &Style, rows: Vec<Row>) -> Self {
        Self {
            kind,
            space_before: style.space_before,
            space_after: style.space_after,
            rows,
        }
    }

    fn body_height(&self) -> f32 {
        self.rows.iter().map(|r| r.height).sum()
    }

    fn first_row_height(&self) -> f32 {
        self.rows.first().map_or(0.0, |r| r.height)
    }
}

#[derive(Debug, Clone)]
enum Item {
    Content(LaidBlock),
    Gap(f32),
}

// ────────────────────────────────────────────────────────────────────────────
// Paginator
// ────────────────────────────────────────────────────────────────────────────

/// Turns blocks into positioned pages for one page geometry and font family.
///
/// The cursor lives in a per-call [`PageCursor`]; a `Paginator` itself holds
/// only configuration.
pub struct Paginator<'a> {
    geometry: PageGeometry,
    family: FontFamily,
    measurer: &'a TextMeasurer,
}

impl<'a> Paginator<'a> {
    pub fn new(geometry: PageGeometry, family: FontFamily, measurer: &'a TextMeasurer) -> Self {
        Self {
            geometry,
            family,
            measurer,
        }
    }

    /// Lays out `blocks` in input order. Always returns at least one page.
    pub fn paginate(&self, blocks: &[Block]) -> Result<Vec<Page>, LayoutError> {
        self.geometry.validate()?;

        let items = blocks
            .iter()
            .filter(|b| !b.is_blank())
            .map(|b| self.layout_block(b))
            .collect::<Result<Vec<_>, _>>()?;

        let mut cursor = PageCursor::new(self.geometry);
        for (i, item) in items.iter().enumerate() {
            match item {
                Item::Gap(size) => {
                    // Under a header the gap may only use what the rest of the chain leaves free.
                    let reserve = if cursor.under_header {
                        keep_chain_height(&items[i + 1..], false)
                    } else {
                        None
                    };
                    cursor.advance_gap(*size, reserve);
                }
                Item::Content(block) => {
                    let chain = if block.kind.keeps_with_next() {
                        keep_chain_height(&items[i..], cursor.at_top())
                    } else {
                        None
                    };
                    let needed = chain
                        .unwrap_or_else(|| cursor.leading_space(block) + block.body_height());
                    cursor.place(block, needed);
                }
            }
        }

        Ok(cursor.finish())
    }

    // ── block layout ────────────────────────────────────────────────────────

    fn layout_block(&self, block: &Block) -> Result<Item, MeasurementError> {
        let kind = block.kind();
        let laid = match block {
            Block::Spacer { size } => return Ok(Item::Gap(*size)),
            Block::Title { text }
            | Block::Subtitle { text }
            | Block::Heading { text }
            | Block::Subheading { text } => self.text_block(kind, text, false)?,
            Block::Paragraph { text } => self.text_block(kind, text, true)?,
            Block::Bullet { text } => self.bullet_block(text)?,
            Block::ContactLine { text } => self.contact_block(text)?,
            Block::RightAlign { lines } => self.right_aligned_block(lines)?,
            Block::ThreeColumns { columns } => self.column_block(columns)?,
        };
        Ok(Item::Content(laid))
    }

    fn text_block(
        &self,
        kind: BlockKind,
        text: &str,
        justify: bool,
    ) -> Result<LaidBlock, MeasurementError> {
        let style = resolve(kind, Role::Body);
        let width = self.geometry.printable_width() - style.left_indent;
        let rows = wrap_lines(text, width, style.font(self.family), self.measurer)?
            .into_iter()
            .map(|line| {
                let align = if justify && !line.ends_paragraph {
                    Align::Justify { width }
                } else {
                    Align::Left
                };
                Row::single(line.text, style.left_indent, style, align, None)
            })
            .collect();
        Ok(LaidBlock::new(kind, &style, rows))
    }

    fn bullet_block(&self, text: &str) -> Result<LaidBlock, MeasurementError> {
        let style = resolve(BlockKind::Bullet, Role::Body);
        let width = self.geometry.printable_width() - style.left_indent;
        let rows = wrap(text, width, style.font(self.family), self.measurer)?
            .into_iter()
            .enumerate()
            .map(|(n, line)| {
                let bullet = if n == 0 { style.bullet_glyph } else { None };
                Row::single(line, style.left_indent, style, Align::Left, bullet)
            })
            .collect();
        Ok(LaidBlock::new(BlockKind::Bullet, &style, rows))
    }

    /// Segments are packed left to right; a segment that would overflow starts a new row.
    fn contact_block(&self, text: &str) -> Result<LaidBlock, MeasurementError> {
        let label_style = resolve(BlockKind::ContactLine, Role::Label);
        let value_style = resolve(BlockKind::ContactLine, Role::Value);
        let sep_style = resolve(BlockKind::ContactLine, Role::Separator);
        let max_width = self.geometry.printable_width();
        let sep_width = self
            .measurer
            .width(CONTACT_SEPARATOR, sep_style.font(self.family))?;

        let normalized: String = text.nfc().collect();
        let mut rows = Vec::new();
        let mut spans: Vec<Span> = Vec::new();
        let mut x = 0.0_f32;

        let segments = normalized
            .split('|')
            .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|s| !s.is_empty());
        for segment in segments {
            let segment = segment.as_str();
            let mut pieces: Vec<(String, Style, f32)> = Vec::new();
            match split_label(segment) {
                Some((label, value)) => {
                    let label = format!("{label}:");
                    let label_font = label_style.font(self.family);
                    let advance = self.measurer.width(&format!("{label} "), label_font)?;
                    pieces.push((label, label_style, advance));
                    let value_w = self.measurer.width(value, value_style.font(self.family))?;
                    pieces.push((value.to_string(), value_style, value_w));
                }
                None => {
                    let w = self.measurer.width(segment, value_style.font(self.family))?;
                    pieces.push((segment.to_string(), value_style, w));
                }
            }
            let segment_width: f32 = pieces.iter().map(|(_, _, w)| w).sum();

            if !spans.is_empty() && x + sep_width + segment_width > max_width {
                rows.push(Row {
                    height: label_style.line_height,
                    spans: std::mem::take(&mut spans),
                });
                x = 0.0;
            }
            if !spans.is_empty() {
                spans.push(Span {
                    text: CONTACT_SEPARATOR.trim().to_string(),
                    x: x + self.measurer.width(" ", sep_style.font(self.family))?,
                    style: sep_style,
                    align: Align::Left,
                    bullet: None,
                });
                x += sep_width;
            }
            for (text, style, advance) in pieces {
                spans.push(Span {
                    text,
                    x,
                    style,
                    align: Align::Left,
                    bullet: None,
                });
                x += advance;
            }
        }
        if !spans.is_empty() {
            rows.push(Row {
                height: label_style.line_height,
                spans,
            });
        }

        Ok(LaidBlock::new(BlockKind::ContactLine, &label_style, rows))
    }

    /// Every line is anchored to the right margin on its own.
    fn right_aligned_block(&self, lines: &[String]) -> Result<LaidBlock, MeasurementError> {
        let style = resolve(BlockKind::RightAlign, Role::Body);
        let width = self.geometry.printable_width();
        let anchor = self.geometry.right_edge() - self.geometry.margins.left;
        let mut rows = Vec::new();
        for line in lines {
            for wrapped in wrap(line, width, style.font(self.family), self.measurer)? {
                rows.push(Row::single(wrapped, anchor, style, Align::Right, None));
            }
        }
        Ok(LaidBlock::new(BlockKind::RightAlign, &style, rows))
    }

    /// Row `r` of the group holds line `r` of every column that has one.
    fn column_block(&self, columns: &[Column]) -> Result<LaidBlock, MeasurementError> {
        let title_style = resolve(BlockKind::ThreeColumns, Role::ColumnTitle);
        let gap = self.geometry.column_gap;
        let width = column_width(self.geometry.printable_width(), gap, columns.len());
        let laid = balance(columns, width, gap, self.family, self.measurer)?;

        let line_height = laid
            .first()
            .map_or(title_style.line_height, |c| c.line_height);
        let row_count = laid.iter().map(|c| c.lines.len()).max().unwrap_or(0);
        let rows = (0..row_count)
            .map(|r| Row {
                height: line_height,
                spans: laid
                    .iter()
                    .filter_map(|column| {
                        column.lines.get(r).map(|line| Span {
                            text: line.text.clone(),
                            x: column.x + line.x_offset,
                            style: line.style,
                            align: Align::Left,
                            bullet: line.bullet,
                        })
                    })
                    .collect(),
            })
            .collect();

        Ok(LaidBlock::new(BlockKind::ThreeColumns, &title_style, rows))
    }
}

/// Splits `"Email: ana@x.com"` into label and value. URLs (`https://...`) are not labels.
fn split_label(segment: &str) -> Option<(&str, &str)> {
    let (label, value) = segment.split_once(':')?;
    let (label, value) = (label.trim(), value.trim());
    if label.is_empty() || value.is_empty() || value.starts_with("//") {
        return None;
    }
    if label.chars().count() > 24 {
        return None;
    }
    Some((label, value))
}

/// Height needed to keep the header run starting at `items[0]` together with the
/// first line of the content that follows it. `None` when no content follows.
fn keep_chain_height(items: &[Item], at_top: bool) -> Option<f32> {
    let mut total = 0.0_f32;
    let mut first = true;
    for item in items {
        match item {
            Item::Gap(size) => {
                if !first {
                    total += size;
                }
            }
            Item::Content(block) => {
                let before = if first && at_top {
                    0.0
                } else {
                    block.space_before
                };
                first = false;
                if block.kind.keeps_with_next() {
                    total += before + block.body_height() + block.space_after;
                } else {
                    return Some(total + before + block.first_row_height());
                }
            }
        }
    }
    None
}

// ────────────────────────────────────────────────────────────────────────────
// Cursor
// ────────────────────────────────────────────────────────────────────────────

struct PageCursor {
    geometry: PageGeometry,
    pages: Vec<Page>,
    current: Page,
    y: f32,
    has_content: bool,
    /// The last placed block was a header on the current page.
    under_header: bool,
}

impl PageCursor {
    fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: Vec::new(),
            current: Page {
                number: 1,
                margins: geometry.margins,
                lines: Vec::new(),
            },
            y: geometry.top(),
            has_content: false,
            under_header: false,
        }
    }

    fn at_top(&self) -> bool {
        !self.has_content
    }

    fn leading_space(&self, block: &LaidBlock) -> f32 {
        if self.at_top() {
            0.0
        } else {
            block.space_before
        }
    }

    fn fits(&self, height: f32) -> bool {
        self.y + height <= self.geometry.bottom() + EPSILON
    }

    fn new_page(&mut self) {
        let next = Page {
            number: self.current.number + 1,
            margins: self.geometry.margins,
            lines: Vec::new(),
        };
        let finished = std::mem::replace(&mut self.current, next);
        self.pages.push(finished);
        self.y = self.geometry.top();
        self.has_content = false;
        self.under_header = false;
    }

    /// Moves the cursor down by `size`, never past the bottom margin and never
    /// into the `reserve` kept for content that must stay on this page.
    fn advance_gap(&mut self, size: f32, reserve: Option<f32>) {
        if self.at_top() {
            return;
        }
        let bottom = self.geometry.bottom();
        let limit = reserve.map_or(bottom, |r| (bottom - r).max(self.y));
        if self.y < limit {
            self.y = (self.y + size).min(limit);
        }
    }

    fn place(&mut self, block: &LaidBlock, needed: f32) {
        if !self.fits(needed) && !self.at_top() && !self.under_header {
            self.new_page();
        }
        self.y += self.leading_space(block);

        for row in &block.rows {
            if !self.fits(row.height) && !self.at_top() {
                self.new_page();
            }
            self.emit(row);
            self.y += row.height;
            self.has_content = true;
        }

        self.y += block.space_after;
        self.under_header = block.kind.keeps_with_next();
    }

    fn emit(&mut self, row: &Row) {
        for span in &row.spans {
            self.current.lines.push(PositionedLine {
                text: span.text.clone(),
                x: self.geometry.margins.left + span.x,
                y: self.y,
                page: self.current.number,
                style: span.style,
                align: span.align,
                bullet: span.bullet,
            });
        }
    }

    fn finish(mut self) -> Vec<Page> {
        self.pages.push(self.current);
        self.pages
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::page::Margins;
    use crate::layout::style::{ACCENT, MUTED};

    /// 460 × 110pt printable area.
    fn small_page() -> PageGeometry {
        PageGeometry {
            width: 500.0,
            height: 150.0,
            margins: Margins::uniform(20.0),
            column_gap: 12.0,
        }
    }

    fn run(blocks: &[Block], geometry: PageGeometry) -> Vec<Page> {
        let measurer = TextMeasurer::new();
        Paginator::new(geometry, FontFamily::Helvetica, &measurer)
            .paginate(blocks)
            .unwrap()
    }

    fn all_lines(pages: &[Page]) -> Vec<&PositionedLine> {
        pages.iter().flat_map(|p| p.lines.iter()).collect()
    }

    fn page_of<'a>(pages: &'a [Page], text: &str) -> usize {
        all_lines(pages)
            .into_iter()
            .find(|l| l.text == text)
            .unwrap_or_else(|| panic!("{text:?} not laid out"))
            .page
    }

    fn long_text(words: usize) -> String {
        (0..words)
            .map(|i| format!("palavra{i}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn resume(sections: usize) -> Vec<Block> {
        let mut blocks = vec![
            Block::title("MARIA SOUZA"),
            Block::ContactLine {
                text: "Email: maria@exemplo.com | Tel: 11 98888-7777 | São Paulo".to_string(),
            },
        ];
        for s in 0..sections {
            blocks.push(Block::heading(format!("SEÇÃO {s}")));
            blocks.push(Block::subheading(format!("Empresa {s} — Analista")));
            blocks.push(Block::paragraph(long_text(10 + s * 7)));
            for b in 0..(s % 4 + 1) {
                blocks.push(Block::bullet(format!("Resultado {b} da seção {s}, com ganho de {b}0%")));
            }
            blocks.push(Block::Spacer { size: 6.0 });
        }
        blocks
    }

    #[test]
    fn test_concrete_resume_defers_heading_with_first_bullet() {
        let blocks = vec![
            Block::title("MARIA SOUZA"),
            Block::heading("SUMÁRIO"),
            Block::paragraph("Texto longo..."),
            Block::heading("EXPERIÊNCIAS"),
            Block::subheading("Empresa X — Analista"),
            Block::bullet("Aumentei vendas em 20%"),
        ];
        let pages = run(&blocks, small_page());

        assert_eq!(pages.len(), 2);
        assert_eq!(page_of(&pages, "MARIA SOUZA"), 1);
        assert_eq!(page_of(&pages, "SUMÁRIO"), 1);
        assert_eq!(page_of(&pages, "Texto longo..."), 1);
        assert_eq!(page_of(&pages, "EXPERIÊNCIAS"), 2);
        assert_eq!(page_of(&pages, "Empresa X — Analista"), 2);
        assert_eq!(page_of(&pages, "Aumentei vendas em 20%"), 2);

        // The moved heading starts at the top margin of page 2.
        assert_eq!(pages[1].lines[0].text, "EXPERIÊNCIAS");
        assert!((pages[1].lines[0].y - small_page().top()).abs() < 1e-4);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let blocks = resume(6);
        let a = run(&blocks, small_page());
        let b = run(&blocks, small_page());
        assert_eq!(a, b);
    }

    #[test]
    fn test_y_non_decreasing_within_page_and_pages_non_decreasing() {
        for height in [150.0, 260.0, 400.0] {
            let geometry = PageGeometry {
                height,
                ..small_page()
            };
            let pages = run(&resume(8), geometry);
            let lines = all_lines(&pages);
            for pair in lines.windows(2) {
                assert!(pair[1].page >= pair[0].page);
                if pair[1].page == pair[0].page {
                    assert!(pair[1].y >= pair[0].y, "{:?} above {:?}", pair[1].text, pair[0].text);
                }
            }
            for (idx, page) in pages.iter().enumerate() {
                assert_eq!(page.number, idx + 1);
                assert!(page.lines.iter().all(|l| l.page == page.number));
            }
        }
    }

    #[test]
    fn test_every_line_box_stays_inside_the_printable_area() {
        let geometry = small_page();
        let pages = run(&resume(8), geometry);
        for line in all_lines(&pages) {
            assert!(line.y >= geometry.top() - 1e-4);
            assert!(
                line.y + line.style.line_height <= geometry.bottom() + EPSILON,
                "{:?} overflows page {}",
                line.text,
                line.page
            );
        }
    }

    #[test]
    fn test_headers_never_orphaned() {
        for height in [140.0, 150.0, 170.0, 230.0, 330.0] {
            let geometry = PageGeometry {
                height,
                ..small_page()
            };
            let pages = run(&resume(10), geometry);
            let lines = all_lines(&pages);
            for (i, line) in lines.iter().enumerate() {
                let is_header = line.text.starts_with("SEÇÃO") || line.text.starts_with("Empresa");
                if is_header {
                    let next = lines.get(i + 1).expect("content follows every header");
                    assert_eq!(
                        next.page, line.page,
                        "{:?} left alone at the bottom of page {} (height {height})",
                        line.text, line.page
                    );
                }
            }
        }
    }

    #[test]
    fn test_trailing_heading_without_content_uses_plain_fit() {
        let blocks = vec![
            Block::paragraph(long_text(60)),
            Block::heading("ANEXOS"),
        ];
        let pages = run(&blocks, small_page());
        // Nothing follows the heading, so it is placed like any other block.
        assert!(all_lines(&pages).iter().any(|l| l.text == "ANEXOS"));
    }

    #[test]
    fn test_oversized_block_starts_fresh_page_and_splits_between_lines() {
        let geometry = small_page();
        let blocks = vec![
            Block::title("MARIA SOUZA"),
            Block::paragraph(long_text(400)),
        ];
        let pages = run(&blocks, geometry);
        assert!(pages.len() >= 3);
        assert_eq!(pages[0].lines.len(), 1, "title alone on page 1");

        let first_para = &pages[1].lines[0];
        assert!((first_para.y - geometry.top()).abs() < 1e-4);

        let words: Vec<String> = all_lines(&pages)[1..]
            .iter()
            .flat_map(|l| l.text.split(' ').map(str::to_string).collect::<Vec<_>>())
            .collect();
        assert_eq!(words.len(), 400, "no word lost or split across pages");
    }

    #[test]
    fn test_content_under_header_splits_instead_of_moving() {
        let blocks = vec![
            Block::paragraph(long_text(20)),
            Block::heading("EXPERIÊNCIAS"),
            Block::paragraph(long_text(120)),
        ];
        let pages = run(&blocks, small_page());
        let heading_page = page_of(&pages, "EXPERIÊNCIAS");
        let lines = all_lines(&pages);
        let idx = lines.iter().position(|l| l.text == "EXPERIÊNCIAS").unwrap();
        assert_eq!(lines[idx + 1].page, heading_page);
        assert!(lines.last().unwrap().page > heading_page);
    }

    #[test]
    fn test_blank_headings_are_no_ops() {
        let with_blank = vec![
            Block::title("MARIA SOUZA"),
            Block::heading(""),
            Block::subheading("   "),
            Block::paragraph("Resumo profissional."),
        ];
        let without = vec![
            Block::title("MARIA SOUZA"),
            Block::paragraph("Resumo profissional."),
        ];
        assert_eq!(run(&with_blank, small_page()), run(&without, small_page()));
    }

    #[test]
    fn test_spacer_under_heading_does_not_orphan_it() {
        for size in [30.0, 80.0, 200.0, 5000.0] {
            let blocks = vec![
                Block::paragraph(long_text(20)),
                Block::heading("EXPERIÊNCIAS"),
                Block::Spacer { size },
                Block::bullet("Aumentei vendas em 20%"),
            ];
            let pages = run(&blocks, small_page());
            assert_eq!(
                page_of(&pages, "EXPERIÊNCIAS"),
                page_of(&pages, "Aumentei vendas em 20%"),
                "heading separated from its bullet by a {size}pt spacer"
            );
            for line in all_lines(&pages) {
                assert!(line.y + line.style.line_height <= small_page().bottom() + EPSILON);
            }
        }
    }

    #[test]
    fn test_spacer_under_heading_kept_when_room_allows() {
        let blocks = vec![
            Block::title("MARIA SOUZA"),
            Block::heading("EXPERIÊNCIAS"),
            Block::Spacer { size: 10.0 },
            Block::bullet("Aumentei vendas em 20%"),
        ];
        let pages = run(&blocks, small_page());
        assert_eq!(pages.len(), 1);
        let heading = all_lines(&pages)
            .into_iter()
            .find(|l| l.text == "EXPERIÊNCIAS")
            .unwrap();
        let bullet = all_lines(&pages)
            .into_iter()
            .find(|l| l.text == "Aumentei vendas em 20%")
            .unwrap();
        let expected = heading.y + heading.style.line_height + heading.style.space_after + 10.0;
        assert!((bullet.y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_contact_line_whitespace_is_collapsed() {
        let pages = run(
            &[Block::ContactLine {
                text: "Email:\tmaria@exemplo.com |  São   Paulo\n SP".to_string(),
            }],
            small_page(),
        );
        let texts: Vec<&str> = pages[0].lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["Email:", "maria@exemplo.com", "|", "São Paulo SP"]);
    }

    #[test]
    fn test_spacer_elided_at_page_top_and_clamped_at_bottom() {
        let geometry = small_page();
        let pages = run(
            &[Block::Spacer { size: 40.0 }, Block::title("MARIA SOUZA")],
            geometry,
        );
        assert!((pages[0].lines[0].y - geometry.top()).abs() < 1e-4);

        let pages = run(
            &[
                Block::paragraph("Uma linha."),
                Block::Spacer { size: 5000.0 },
            ],
            geometry,
        );
        assert_eq!(pages.len(), 1, "a spacer alone never adds a page");

        let pages = run(
            &[
                Block::paragraph("Uma linha."),
                Block::Spacer { size: 30.0 },
                Block::paragraph("Outra linha."),
            ],
            geometry,
        );
        let first = &pages[0].lines[0];
        let second = &pages[0].lines[1];
        assert!(second.y - first.y >= 30.0);
    }

    #[test]
    fn test_empty_input_yields_one_empty_page() {
        let pages = run(&[], small_page());
        assert_eq!(pages.len(), 1);
        assert!(pages[0].lines.is_empty());
    }

    #[test]
    fn test_paragraph_lines_justified_except_last() {
        let pages = run(&[Block::paragraph(long_text(40))], small_page());
        let lines = &pages[0].lines;
        assert!(lines.len() > 1);
        let (last, rest) = lines.split_last().unwrap();
        assert!(rest.iter().all(|l| matches!(l.align, Align::Justify { .. })));
        assert_eq!(last.align, Align::Left);
    }

    #[test]
    fn test_bullet_glyph_only_on_first_line_with_hanging_indent() {
        let geometry = small_page();
        let pages = run(&[Block::bullet(long_text(40))], geometry);
        let lines = &pages[0].lines;
        assert!(lines.len() > 1);
        assert_eq!(lines[0].bullet, Some('•'));
        assert!(lines[1..].iter().all(|l| l.bullet.is_none()));
        assert!(lines.iter().all(|l| l.x > geometry.margins.left));
        assert!(lines.iter().all(|l| (l.x - lines[0].x).abs() < 1e-4));
    }

    #[test]
    fn test_contact_line_spans_share_a_row() {
        let pages = run(
            &[Block::ContactLine {
                text: "Email: maria@exemplo.com | Tel: 11 98888-7777 | linkedin.com/in/maria"
                    .to_string(),
            }],
            small_page(),
        );
        let lines = &pages[0].lines;
        let texts: Vec<&str> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Email:",
                "maria@exemplo.com",
                "|",
                "Tel:",
                "11 98888-7777",
                "|",
                "linkedin.com/in/maria"
            ]
        );
        assert!(lines.iter().all(|l| l.y == lines[0].y));
        assert!(lines.windows(2).all(|p| p[1].x > p[0].x));
        assert_eq!(lines[1].style.color, ACCENT);
        assert_eq!(lines[2].style.color, MUTED);
    }

    #[test]
    fn test_contact_line_url_is_not_split_as_label() {
        assert_eq!(split_label("https://maria.dev"), None);
        assert_eq!(split_label("GitHub: github.com/maria"), Some(("GitHub", "github.com/maria")));
    }

    #[test]
    fn test_right_aligned_lines_anchor_to_right_edge() {
        let geometry = small_page();
        let pages = run(
            &[Block::RightAlign {
                lines: vec!["São Paulo, 3 de maio de 2024".to_string(), "Brasil".to_string()],
            }],
            geometry,
        );
        for line in &pages[0].lines {
            assert_eq!(line.align, Align::Right);
            assert!((line.x - geometry.right_edge()).abs() < 1e-3);
        }
    }

    #[test]
    fn test_three_columns_rows_share_y_and_group_height_is_tallest_column() {
        let geometry = small_page();
        let columns = [
            Column {
                title: "Técnicas".to_string(),
                items: vec!["SQL".into(), "Python".into(), "Power BI".into()],
            },
            Column {
                title: "Idiomas".to_string(),
                items: vec!["Inglês".into()],
            },
            Column {
                title: "Soft skills".to_string(),
                items: vec![],
            },
        ];
        let pages = run(
            &[Block::ThreeColumns { columns }, Block::paragraph("Depois.")],
            geometry,
        );
        let lines = &pages[0].lines;
        let titles: Vec<&PositionedLine> = lines.iter().take(3).collect();
        assert!(titles.iter().all(|l| l.y == titles[0].y));
        assert!(titles[1].x > titles[0].x && titles[2].x > titles[1].x);

        let item_style = resolve(BlockKind::ThreeColumns, Role::ColumnItem);
        let after = lines.iter().find(|l| l.text == "Depois.").unwrap();
        let expected = titles[0].y + 4.0 * item_style.line_height + item_style.space_after;
        assert!((after.y - expected).abs() < 1e-3);
    }

    #[test]
    fn test_invalid_geometry_rejected() {
        let measurer = TextMeasurer::new();
        let geometry = PageGeometry {
            height: 30.0,
            ..small_page()
        };
        let err = Paginator::new(geometry, FontFamily::Helvetica, &measurer)
            .paginate(&[Block::title("X")])
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidGeometry(_)));
    }

    #[test]
    fn test_unsupported_glyph_surfaces_as_measurement_error() {
        let measurer = TextMeasurer::new();
        let err = Paginator::new(small_page(), FontFamily::Helvetica, &measurer)
            .paginate(&[Block::bullet("Liderei o time 🚀")])
            .unwrap_err();
        assert!(matches!(err, LayoutError::Measurement(_)));
    }
}
