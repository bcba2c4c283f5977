//! # CNCtext Core
//!
//! Stroke fonts and text layout for engraving labels with a CNC machine.
//!
//! - **Transform**: scale/translate operator for glyph coordinates
//! - **Font**: glyph table built from `.chr` stroke font files, with a
//!   pipeline of load-time fixups
//! - **Layout**: fits one line of text (optionally split by a gap) into a
//!   label box and positions every stroke
//!
//! ```
//! use cnctext_core::{Font, LabelSize, Line};
//!
//! let font = Font::from_chr_str("CHR_2B 26 ;13,18 13,0 ;4,9 22,9").unwrap();
//! let line = Line::new(&font, "++  +").unwrap();
//! let fit = line.scaling(LabelSize::new(22.5, 2.8)).unwrap();
//! let galley = line.galley(&fit);
//! assert_eq!(galley.len(), 3);
//! ```

pub mod error;
pub mod font;
pub mod layout;
pub mod transform;

pub use error::{
    ConfigError, ConfigResult, Error, FontError, FontResult, GeometryError, LayoutError,
    LayoutResult, Result,
};
pub use font::{FixupPipeline, Font, Glyph, GlyphFixup, GlyphRecord};
pub use layout::{
    FitResult, Galley, LabelSize, Line, PlacedGlyph, MAX_ASPECT_RATIO, MIN_ASPECT_RATIO,
    MIN_GAP_WIDTH,
};
pub use transform::{Point, Polyline, Transform};
