//! Post-load glyph fixups.
//!
//! Some fonts ship with glyphs that look wrong once engraved (a slash as wide
//! as a digit, an overlong hyphen, no space at all). Rather than hard-coding
//! those corrections into font loading, each one is a [`GlyphFixup`] rule and
//! a [`FixupPipeline`] applies them in order, once, after ingestion.

use std::fmt;

use tracing::debug;

use super::{Font, Glyph};
use crate::error::{FontError, FontResult};

/// A single correction applied to a freshly loaded font
pub trait GlyphFixup: fmt::Debug + Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    /// Whether the rule should run against this font
    fn applies(&self, font: &Font) -> bool;

    /// Apply the rule
    fn apply(&self, font: &mut Font) -> FontResult<()>;
}

/// Adds a blank glyph when a code is missing, sized relative to the
/// narrowest glyph in the font.
#[derive(Debug, Clone)]
pub struct SynthesizeGlyph {
    pub code: u32,
    pub width_ratio: f64,
}

impl GlyphFixup for SynthesizeGlyph {
    fn name(&self) -> &str {
        "synthesize-glyph"
    }

    fn applies(&self, font: &Font) -> bool {
        !font.contains(self.code)
    }

    fn apply(&self, font: &mut Font) -> FontResult<()> {
        let min_width = font.min_cell_width().ok_or(FontError::Empty)?;
        font.insert(self.code, Glyph::new(min_width * self.width_ratio, Vec::new()));
        Ok(())
    }
}

/// Scales a glyph horizontally when it is exactly as wide as a reference
/// glyph.
#[derive(Debug, Clone)]
pub struct NarrowMatchingGlyph {
    pub code: u32,
    pub reference: u32,
    pub factor: f64,
}

impl GlyphFixup for NarrowMatchingGlyph {
    fn name(&self) -> &str {
        "narrow-matching-glyph"
    }

    fn applies(&self, font: &Font) -> bool {
        match (font.glyph(self.code), font.glyph(self.reference)) {
            (Some(glyph), Some(reference)) => glyph.cell_width == reference.cell_width,
            _ => false,
        }
    }

    fn apply(&self, font: &mut Font) -> FontResult<()> {
        if let Some(glyph) = font.glyph(self.code) {
            let narrowed = glyph.scaled(self.factor, 1.0);
            font.insert(self.code, narrowed);
        }
        Ok(())
    }
}

/// Unconditionally rescales one glyph
#[derive(Debug, Clone)]
pub struct ScaleGlyph {
    pub code: u32,
    pub sx: f64,
    pub sy: f64,
}

impl GlyphFixup for ScaleGlyph {
    fn name(&self) -> &str {
        "scale-glyph"
    }

    fn applies(&self, font: &Font) -> bool {
        font.contains(self.code)
    }

    fn apply(&self, font: &mut Font) -> FontResult<()> {
        if let Some(glyph) = font.glyph(self.code) {
            let scaled = glyph.scaled(self.sx, self.sy);
            font.insert(self.code, scaled);
        }
        Ok(())
    }
}

/// Ordered list of fixups
#[derive(Debug)]
pub struct FixupPipeline {
    rules: Vec<Box<dyn GlyphFixup>>,
}

impl FixupPipeline {
    /// A pipeline that changes nothing
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append a rule; rules run in insertion order
    pub fn with(mut self, rule: impl GlyphFixup + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every applicable rule against `font`
    pub fn run(&self, font: &mut Font) -> FontResult<()> {
        for rule in &self.rules {
            if rule.applies(font) {
                debug!("Applying font fixup {:?}", rule);
                rule.apply(font)?;
            } else {
                debug!("Skipping font fixup {}", rule.name());
            }
        }
        Ok(())
    }
}

impl Default for FixupPipeline {
    /// Space synthesis, then slash narrowing, then hyphen shortening.
    fn default() -> Self {
        Self::empty()
            .with(SynthesizeGlyph {
                code: 0x20,
                width_ratio: 2.0 / 3.0,
            })
            .with(NarrowMatchingGlyph {
                code: 0x2f,
                reference: 0x30,
                factor: 0.5,
            })
            .with(ScaleGlyph {
                code: 0x2d,
                sx: 0.75,
                sy: 1.0,
            })
    }
}
