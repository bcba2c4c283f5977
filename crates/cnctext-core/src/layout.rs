//! Line layout: fitting a line of text into a label box.
//!
//! Layout is two pure steps. [`Line::scaling`] works out the scale factors
//! (and the gap width, for justified lines) that fit the text into the box,
//! and [`Line::galley`] positions every glyph using those factors.
//!
//! A line may contain one gap, written as two or more consecutive spaces.
//! The part before the gap is left-aligned and the part after it ends at the
//! right edge of the box.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GeometryError, LayoutError, LayoutResult};
use crate::font::{Font, Glyph};
use crate::transform::{Polyline, Transform};

/// Gap width before any widening
pub const MIN_GAP_WIDTH: f64 = 2.0;
/// Horizontal stretch limit relative to the vertical scale
pub const MAX_ASPECT_RATIO: f64 = 1.25;
/// Horizontal compression limit relative to the vertical scale
pub const MIN_ASPECT_RATIO: f64 = 0.75;

/// Decimal places kept for label-space coordinates
pub const COORDINATE_DIGITS: i32 = 3;

static GAP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"  +").expect("invalid gap regex"));

/// Available space for one line, in label units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelSize {
    pub width: f64,
    pub height: f64,
}

impl LabelSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Scale factors and gap width chosen for a line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    pub sx: f64,
    pub sy: f64,
    /// `None` when the line has no gap
    pub gap_width: Option<f64>,
}

impl FitResult {
    pub fn aspect(&self) -> f64 {
        self.sx / self.sy
    }
}

/// One glyph positioned on the line
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedGlyph {
    pub x_offset: f64,
    /// Scaled strokes, relative to `x_offset`
    pub strokes: Vec<Polyline>,
}

/// A laid-out line
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Galley {
    pub glyphs: Vec<PlacedGlyph>,
    /// Cursor position after the last glyph
    pub width: f64,
}

impl Galley {
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Label-space polylines with the line's origin at `(base_x, base_y)`.
    ///
    /// Coordinates are rounded to [`COORDINATE_DIGITS`] places. Empty strokes
    /// are skipped.
    pub fn positioned(&self, base_x: f64, base_y: f64) -> impl Iterator<Item = Polyline> + '_ {
        self.glyphs.iter().flat_map(move |glyph| {
            let shift = Transform::identity().translate(glyph.x_offset + base_x, base_y);
            glyph
                .strokes
                .iter()
                .filter(|stroke| !stroke.is_empty())
                .map(move |stroke| {
                    stroke
                        .iter()
                        .map(|&p| shift.apply(p).rounded(COORDINATE_DIGITS))
                        .collect()
                })
        })
    }
}

/// One renderable line of text
#[derive(Debug, Clone)]
pub struct Line<'f> {
    font: &'f Font,
    parts: Vec<String>,
    glyphs: Vec<Vec<&'f Glyph>>,
}

impl<'f> Line<'f> {
    /// Splits `text` at its gap and resolves every character in `font`.
    pub fn new(font: &'f Font, text: &str) -> LayoutResult<Self> {
        let parts: Vec<String> = GAP_RE.split(text).map(str::to_string).collect();
        if parts.len() > 2 {
            return Err(GeometryError::TooManyGaps {
                text: text.to_string(),
            }
            .into());
        }

        let glyphs = parts
            .iter()
            .map(|part| {
                part.chars()
                    .map(|c| {
                        // fonts are indexed by ASCII code only
                        let glyph = if c.is_ascii() {
                            font.glyph(c as u32)
                        } else {
                            None
                        };
                        glyph.ok_or_else(|| LayoutError::MissingGlyph {
                            code: c as u32,
                            text: text.to_string(),
                        })
                    })
                    .collect::<LayoutResult<Vec<_>>>()
            })
            .collect::<LayoutResult<Vec<_>>>()?;

        Ok(Self {
            font,
            parts,
            glyphs,
        })
    }

    pub fn has_gap(&self) -> bool {
        self.parts.len() == 2
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Character codes of each part
    pub fn codes(&self) -> Vec<Vec<u32>> {
        self.parts
            .iter()
            .map(|p| p.chars().map(|c| c as u32).collect())
            .collect()
    }

    /// The line text with the gap normalized to two spaces
    pub fn text(&self) -> String {
        self.parts.join("  ")
    }

    /// Total cell width of all glyphs, gap excluded
    pub fn width(&self) -> f64 {
        self.glyphs.iter().flatten().map(|g| g.cell_width).sum()
    }

    /// Scale factors that fit this line into `size`.
    ///
    /// Fails when the box would squeeze the glyphs below
    /// [`MIN_ASPECT_RATIO`]. Stretch beyond [`MAX_ASPECT_RATIO`] is clamped;
    /// a gapped line then takes up the lost width in its gap so the right part
    /// still ends at the box edge.
    pub fn scaling(&self, size: LabelSize) -> LayoutResult<FitResult> {
        let width = self.width();
        if width <= 0.0 {
            return Err(GeometryError::EmptyLine { text: self.text() }.into());
        }

        let mut gap_width = self.has_gap().then_some(MIN_GAP_WIDTH);
        let available = size.width - gap_width.unwrap_or(0.0);

        let mut sx = available / width;
        let sy = size.height / self.font.height();
        let aspect = sx / sy;

        if aspect < MIN_ASPECT_RATIO {
            return Err(GeometryError::AspectTooNarrow {
                aspect,
                text: self.text(),
            }
            .into());
        }

        if aspect > MAX_ASPECT_RATIO {
            sx = sy * MAX_ASPECT_RATIO;
            if gap_width.is_some() {
                gap_width = Some(size.width - width * sx);
            }
        }

        debug!(
            text = %self.text(),
            sx,
            sy,
            ?gap_width,
            "Fitted line"
        );
        Ok(FitResult { sx, sy, gap_width })
    }

    /// Positions every glyph using `fit`.
    pub fn galley(&self, fit: &FitResult) -> Galley {
        let mut glyphs = Vec::with_capacity(self.glyphs.iter().map(Vec::len).sum());
        let mut x = 0.0;

        for (index, part) in self.glyphs.iter().enumerate() {
            for glyph in part {
                let scaled = glyph.scaled(fit.sx, fit.sy);
                glyphs.push(PlacedGlyph {
                    x_offset: x,
                    strokes: scaled.strokes,
                });
                x += scaled.cell_width;
            }

            if index == 0 && self.has_gap() {
                x += fit.gap_width.unwrap_or(MIN_GAP_WIDTH);
            }
        }

        Galley { glyphs, width: x }
    }
}
