//! Block vocabulary — the semantic units callers compose a document from.
//!
//! The wire form is a JSON object tagged by `type`, e.g.
//! `{"type": "heading", "text": "EXPERIÊNCIAS"}` or `{"type": "spacer", "size": 8}`.

use serde::{Deserialize, Serialize};

/// One semantically-typed unit of document content. Order in the input sequence
/// is the visual order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Block {
    Title { text: String },
    Subtitle { text: String },
    Heading { text: String },
    Subheading { text: String },
    Paragraph { text: String },
    Bullet { text: String },
    /// Pipe-joined segments, e.g. `"Email: ana@x.com | Tel: 11 9999-0000"`.
    ContactLine { text: String },
    RightAlign { lines: Vec<String> },
    ThreeColumns { columns: [Column; 3] },
    /// Vertical gap in points.
    Spacer { size: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// Discriminant of [`Block`], the key of the style table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Title,
    Subtitle,
    Heading,
    Subheading,
    Paragraph,
    Bullet,
    ContactLine,
    RightAlign,
    ThreeColumns,
    Spacer,
}

/// Shorthand constructors for building block sequences in tests.
#[cfg(test)]
impl Block {
    pub fn title(text: impl Into<String>) -> Self {
        Block::Title { text: text.into() }
    }

    pub fn heading(text: impl Into<String>) -> Self {
        Block::Heading { text: text.into() }
    }

    pub fn subheading(text: impl Into<String>) -> Self {
        Block::Subheading { text: text.into() }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Block::Paragraph { text: text.into() }
    }

    pub fn bullet(text: impl Into<String>) -> Self {
        Block::Bullet { text: text.into() }
    }
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self {
            Block::Title { .. } => BlockKind::Title,
            Block::Subtitle { .. } => BlockKind::Subtitle,
            Block::Heading { .. } => BlockKind::Heading,
            Block::Subheading { .. } => BlockKind::Subheading,
            Block::Paragraph { .. } => BlockKind::Paragraph,
            Block::Bullet { .. } => BlockKind::Bullet,
            Block::ContactLine { .. } => BlockKind::ContactLine,
            Block::RightAlign { .. } => BlockKind::RightAlign,
            Block::ThreeColumns { .. } => BlockKind::ThreeColumns,
            Block::Spacer { .. } => BlockKind::Spacer,
        }
    }

    /// True when the block has nothing to draw and must occupy no space.
    ///
    /// Call sites push headings unconditionally, so an empty heading has to
    /// vanish instead of leaving a styled blank line.
    pub fn is_blank(&self) -> bool {
        match self {
            Block::Title { text }
            | Block::Subtitle { text }
            | Block::Heading { text }
            | Block::Subheading { text }
            | Block::Paragraph { text }
            | Block::Bullet { text }
            | Block::ContactLine { text } => text.trim().is_empty(),
            Block::RightAlign { lines } => lines.iter().all(|l| l.trim().is_empty()),
            Block::ThreeColumns { columns } => columns.iter().all(|c| {
                c.title.trim().is_empty() && c.items.iter().all(|i| i.trim().is_empty())
            }),
            Block::Spacer { size } => !(size.is_finite() && *size > 0.0),
        }
    }
}

impl BlockKind {
    /// Section headers must land on the same page as the first line beneath them.
    pub fn keeps_with_next(self) -> bool {
        matches!(self, BlockKind::Heading | BlockKind::Subheading)
    }
}
