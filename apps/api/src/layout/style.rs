//! Style table: block kind (plus the role of a span within the block) → visual style.

use serde::Serialize;

use crate::layout::blocks::BlockKind;
use crate::layout::font_metrics::{Font, FontFace, FontFamily, FontWeight};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Components in the 0.0–1.0 range used by PDF colour operators.
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

pub const INK: Color = Color::rgb(0x1F, 0x29, 0x37);
pub const MUTED: Color = Color::rgb(0x6B, 0x72, 0x80);
pub const ACCENT: Color = Color::rgb(0x1D, 0x4E, 0xD8);

/// Role of a span inside its block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Body,
    /// `Label:` part of a contact-line segment.
    Label,
    /// Value part of a contact-line segment.
    Value,
    /// ` | ` between contact-line segments.
    Separator,
    ColumnTitle,
    ColumnItem,
}

/// Concrete visual style. All lengths are in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Style {
    pub font_size: f32,
    pub weight: FontWeight,
    pub color: Color,
    pub left_indent: f32,
    pub bullet_glyph: Option<char>,
    pub line_height: f32,
    pub space_before: f32,
    pub space_after: f32,
}

impl Style {
    pub fn font(&self, family: FontFamily) -> Font {
        Font::new(FontFace::new(family, self.weight), self.font_size)
    }
}

fn style(font_size: f32, weight: FontWeight, color: Color, line_height: f32) -> Style {
    Style {
        font_size,
        weight,
        color,
        left_indent: 0.0,
        bullet_glyph: None,
        line_height,
        space_before: 0.0,
        space_after: 0.0,
    }
}

/// Resolves the style for a block kind and span role.
///
/// # Panics
/// Panics for a (kind, role) pair with no entry in the table. The layout code
/// only asks for pairs it knows exist, so reaching the panic is a bug.
pub fn resolve(kind: BlockKind, role: Role) -> Style {
    use FontWeight::{Bold, Regular};

    match (kind, role) {
        (BlockKind::Title, Role::Body) => Style {
            space_after: 4.0,
            ..style(20.0, Bold, INK, 24.0)
        },
        (BlockKind::Subtitle, Role::Body) => Style {
            space_after: 6.0,
            ..style(12.0, Regular, MUTED, 16.0)
        },
        (BlockKind::Heading, Role::Body) => Style {
            space_before: 10.0,
            space_after: 4.0,
            ..style(12.5, Bold, ACCENT, 16.0)
        },
        (BlockKind::Subheading, Role::Body) => Style {
            space_before: 6.0,
            space_after: 2.0,
            ..style(11.0, Bold, INK, 14.5)
        },
        (BlockKind::Paragraph, Role::Body) => Style {
            space_after: 4.0,
            ..style(10.0, Regular, INK, 14.0)
        },
        (BlockKind::Bullet, Role::Body) => Style {
            left_indent: 14.0,
            bullet_glyph: Some('•'),
            space_after: 2.0,
            ..style(10.0, Regular, INK, 14.0)
        },
        (BlockKind::ContactLine, Role::Label) => Style {
            space_after: 4.0,
            ..style(9.5, Bold, INK, 13.0)
        },
        (BlockKind::ContactLine, Role::Value) => Style {
            space_after: 4.0,
            ..style(9.5, Regular, ACCENT, 13.0)
        },
        (BlockKind::ContactLine, Role::Separator) => Style {
            space_after: 4.0,
            ..style(9.5, Regular, MUTED, 13.0)
        },
        (BlockKind::RightAlign, Role::Body) => Style {
            space_after: 6.0,
            ..style(10.0, Regular, INK, 13.5)
        },
        // Column titles and items share a line height so the group splits into even rows.
        (BlockKind::ThreeColumns, Role::ColumnTitle) => Style {
            space_before: 4.0,
            space_after: 4.0,
            ..style(10.5, Bold, ACCENT, 14.0)
        },
        (BlockKind::ThreeColumns, Role::ColumnItem) => Style {
            left_indent: 10.0,
            bullet_glyph: Some('•'),
            space_before: 4.0,
            space_after: 4.0,
            ..style(9.5, Regular, INK, 14.0)
        },
        (kind, role) => panic!("no style registered for {kind:?} with role {role:?}"),
    }
}
