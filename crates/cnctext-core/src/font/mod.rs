//! Stroke font glyph table.
//!
//! A [`Font`] maps character codes to [`Glyph`]s made of straight-line
//! strokes in integer glyph units. Fonts are built from [`GlyphRecord`]s,
//! usually produced by the `.chr` [`parser`], and then passed through a
//! [`FixupPipeline`] that corrects known defects of specific fonts.

pub mod fixups;
pub mod parser;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FontError, FontResult};
use crate::transform::{Point, Polyline, Transform};

pub use fixups::{FixupPipeline, GlyphFixup, NarrowMatchingGlyph, ScaleGlyph, SynthesizeGlyph};
pub use parser::parse_chr;

/// Raw glyph definition as read from a font source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphRecord {
    /// Character code
    pub code: u32,
    /// Horizontal advance in glyph units
    pub cell_width: f64,
    /// Strokes in integer glyph units, y up from the baseline
    pub strokes: Vec<Vec<(i32, i32)>>,
}

/// One character's strokes and horizontal advance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Glyph {
    pub cell_width: f64,
    pub strokes: Vec<Polyline>,
}

impl Glyph {
    pub fn new(cell_width: f64, strokes: Vec<Polyline>) -> Self {
        Self {
            cell_width,
            strokes,
        }
    }

    /// Returns a copy of this glyph with its width and strokes scaled.
    pub fn scaled(&self, sx: f64, sy: f64) -> Glyph {
        let xfrm = Transform::new(Some((sx, sy)), None);
        Glyph {
            cell_width: self.cell_width * sx,
            strokes: self.strokes.iter().map(|s| xfrm.apply_all(s)).collect(),
        }
    }

    /// Whether the glyph produces no tool motion
    pub fn is_blank(&self) -> bool {
        self.strokes.iter().all(|s| s.is_empty())
    }
}

impl From<GlyphRecord> for Glyph {
    fn from(record: GlyphRecord) -> Self {
        Glyph {
            cell_width: record.cell_width,
            strokes: record
                .strokes
                .into_iter()
                .map(|s| s.into_iter().map(Point::from).collect())
                .collect(),
        }
    }
}

/// Read-only glyph table with a reference height
#[derive(Debug, Clone, Default)]
pub struct Font {
    characters: BTreeMap<u32, Glyph>,
    /// Height above the baseline; descenders are assumed not to go down too far.
    height: f64,
}

impl Font {
    /// Builds a font from records and applies the default fixups.
    pub fn load<I>(records: I) -> FontResult<Self>
    where
        I: IntoIterator<Item = GlyphRecord>,
    {
        Self::load_with(records, &FixupPipeline::default())
    }

    /// Builds a font from records and applies the given fixups.
    pub fn load_with<I>(records: I, fixups: &FixupPipeline) -> FontResult<Self>
    where
        I: IntoIterator<Item = GlyphRecord>,
    {
        let mut font = Font::default();
        for record in records {
            let top = record
                .strokes
                .iter()
                .flatten()
                .map(|&(_, y)| f64::from(y))
                .fold(font.height, f64::max);
            font.height = top;
            font.characters.insert(record.code, record.into());
        }

        if font.characters.is_empty() {
            return Err(FontError::Empty);
        }
        if font.height <= 0.0 {
            return Err(FontError::NoHeight);
        }

        fixups.run(&mut font)?;
        debug!(
            glyphs = font.characters.len(),
            height = font.height,
            "Loaded stroke font"
        );
        Ok(font)
    }

    /// Parses `.chr` source text and loads it with the default fixups
    pub fn from_chr_str(source: &str) -> FontResult<Self> {
        Self::load(parse_chr(source)?)
    }

    /// Reads and loads a `.chr` font file
    pub fn from_file<P: AsRef<Path>>(path: P) -> FontResult<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        debug!("Reading font from {}", path.as_ref().display());
        Self::from_chr_str(&source)
    }

    pub fn glyph(&self, code: u32) -> Option<&Glyph> {
        self.characters.get(&code)
    }

    pub fn contains(&self, code: u32) -> bool {
        self.characters.contains_key(&code)
    }

    /// Replaces (or adds) the glyph for `code`
    pub fn insert(&mut self, code: u32, glyph: Glyph) {
        self.characters.insert(code, glyph);
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// All character codes, ascending
    pub fn codes(&self) -> impl Iterator<Item = u32> + '_ {
        self.characters.keys().copied()
    }

    /// Narrowest cell width in the font
    pub fn min_cell_width(&self) -> Option<f64> {
        self.characters
            .values()
            .map(|g| g.cell_width)
            .reduce(f64::min)
    }
}
