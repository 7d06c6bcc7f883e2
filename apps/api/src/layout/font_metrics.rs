//! Static font-metric tables and the shared text measurer.
//!
//! Character widths are in em units (relative to font size), taken from the
//! AFM files of the PDF standard-14 fonts the renderer references. Because the
//! fonts are never embedded, the viewer draws exactly these metrics and the
//! measurements below are exact rather than approximate.
//!
//! Tables cover ASCII 0x20..=0x7E (95 printable characters), index = (char as usize) - 32.
//! A short per-face list covers the WinAnsi extras a CV actually uses; accented
//! Latin letters are measured as their base letter.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

use crate::layout::encoding::winansi_byte;

// ────────────────────────────────────────────────────────────────────────────
// Font identity
// ────────────────────────────────────────────────────────────────────────────

/// The supported typeface families. Both map onto standard-14 PDF fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontFamily {
    /// Proportional sans-serif, the default for every document type.
    Helvetica,
    /// Fixed-pitch fallback for plain ATS exports.
    Courier,
}

impl FromStr for FontFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "helvetica" => Ok(FontFamily::Helvetica),
            "courier" => Ok(FontFamily::Courier),
            other => Err(format!("unknown font family '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    Regular,
    Bold,
}

/// A concrete face: family plus weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FontFace {
    pub family: FontFamily,
    pub weight: FontWeight,
}

impl FontFace {
    pub fn new(family: FontFamily, weight: FontWeight) -> Self {
        Self { family, weight }
    }

    /// PostScript name of the standard-14 font backing this face.
    pub fn base_font(&self) -> &'static str {
        match (self.family, self.weight) {
            (FontFamily::Helvetica, FontWeight::Regular) => "Helvetica",
            (FontFamily::Helvetica, FontWeight::Bold) => "Helvetica-Bold",
            (FontFamily::Courier, FontWeight::Regular) => "Courier",
            (FontFamily::Courier, FontWeight::Bold) => "Courier-Bold",
        }
    }
}

/// A face at a given point size: what every measurement is made against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub face: FontFace,
    pub size: f32,
}

impl Font {
    pub fn new(face: FontFace, size: f32) -> Self {
        Self { face, size }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasurementError {
    #[error("no metrics for {ch:?} in {font}")]
    UnsupportedGlyph { ch: char, font: &'static str },

    #[error("invalid font size {0}")]
    InvalidSize(f32),
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for one face.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Non-ASCII WinAnsi glyphs that do not decompose to an ASCII base letter.
    extras: &'static [(char, f32)],
    /// Fallback for WinAnsi glyphs covered by neither table.
    pub average_char_width: f32,
}

impl FontMetricTable {
    /// Width of a single glyph in em units, or `None` when the font cannot draw it.
    pub fn glyph_width(&self, ch: char) -> Option<f32> {
        let code = ch as usize;
        if (32..=126).contains(&code) {
            return Some(self.widths[code - 32]);
        }
        winansi_byte(ch)?;
        if let Some(&(_, w)) = self.extras.iter().find(|(g, _)| *g == ch) {
            return Some(w);
        }
        // Accented letters share the advance width of their base letter.
        let base = ch.nfd().next().filter(|b| b.is_ascii_graphic());
        Some(
            base.and_then(|b| self.glyph_width(b))
                .unwrap_or(self.average_char_width),
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables
// ────────────────────────────────────────────────────────────────────────────

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    extras: &[
        ('\u{00A0}', 0.278), ('•', 0.350), ('–', 0.556), ('—', 1.000), ('‘', 0.222), ('’', 0.222),
        ('“', 0.333), ('”', 0.333), ('…', 1.000), ('€', 0.556), ('°', 0.400), ('ª', 0.370),
        ('º', 0.365), ('·', 0.278), ('§', 0.556), ('©', 0.737), ('®', 0.737), ('«', 0.556),
        ('»', 0.556), ('¿', 0.611), ('¡', 0.333), ('ß', 0.611), ('Æ', 1.000), ('æ', 0.889),
        ('Ø', 0.778), ('ø', 0.611),
    ],
    average_char_width: 0.556,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    extras: &[
        ('\u{00A0}', 0.278), ('•', 0.350), ('–', 0.556), ('—', 1.000), ('‘', 0.278), ('’', 0.278),
        ('“', 0.500), ('”', 0.500), ('…', 1.000), ('€', 0.556), ('°', 0.400), ('ª', 0.370),
        ('º', 0.365), ('·', 0.278), ('§', 0.556), ('©', 0.737), ('®', 0.737), ('«', 0.556),
        ('»', 0.556), ('¿', 0.611), ('¡', 0.333), ('ß', 0.611), ('Æ', 1.000), ('æ', 0.889),
        ('Ø', 0.778), ('ø', 0.611),
    ],
    average_char_width: 0.584,
};

/// Courier is fixed-pitch: every WinAnsi glyph advances 0.6em in both weights.
static COURIER_TABLE: FontMetricTable = FontMetricTable {
    widths: [0.600; 95],
    extras: &[],
    average_char_width: 0.600,
};

/// Returns the static metric table for a face.
pub fn get_metrics(face: FontFace) -> &'static FontMetricTable {
    match (face.family, face.weight) {
        (FontFamily::Helvetica, FontWeight::Regular) => &HELVETICA_TABLE,
        (FontFamily::Helvetica, FontWeight::Bold) => &HELVETICA_BOLD_TABLE,
        (FontFamily::Courier, _) => &COURIER_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Text measurer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct GlyphKey {
    ch: char,
    face: FontFace,
    size_bits: u32,
}

/// Measures rendered text width in points.
///
/// Glyph widths are memoised per (char, face, size). The cache is append-only
/// and shared by every export running through the same measurer.
#[derive(Default)]
pub struct TextMeasurer {
    cache: RwLock<HashMap<GlyphKey, f32>>,
}

impl TextMeasurer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered width of `text` in points. Input is NFC-normalised first so that
    /// a decomposed accent is measured as part of its composed glyph.
    pub fn width(&self, text: &str, font: Font) -> Result<f32, MeasurementError> {
        if !(font.size.is_finite() && font.size > 0.0) {
            return Err(MeasurementError::InvalidSize(font.size));
        }
        let mut total = 0.0_f32;
        for ch in text.nfc() {
            total += self.glyph_width(ch, font)?;
        }
        Ok(total)
    }

    /// Number of memoised glyph widths.
    pub fn cached_glyphs(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    fn glyph_width(&self, ch: char, font: Font) -> Result<f32, MeasurementError> {
        let key = GlyphKey {
            ch,
            face: font.face,
            size_bits: font.size.to_bits(),
        };
        if let Some(w) = self.cache.read().ok().and_then(|c| c.get(&key).copied()) {
            return Ok(w);
        }

        let em = get_metrics(font.face)
            .glyph_width(ch)
            .ok_or(MeasurementError::UnsupportedGlyph {
                ch,
                font: font.face.base_font(),
            })?;
        let width = em * font.size;

        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key, width);
        }
        Ok(width)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
