//! Error handling for CNCtext
//!
//! Provides error types for every layer of text engraving:
//! - Geometry errors (a line cannot be fitted or is malformed)
//! - Layout errors (geometry plus glyph lookup failures)
//! - Font errors (font file parsing and loading)
//! - Configuration errors (invalid machine or label settings)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Geometry error type
///
/// Raised when a line of text cannot be fitted into its box or is
/// structurally invalid. Always carries the offending text.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// The box is too narrow for the glyphs at this height
    #[error("GeometryError: Bad aspect ratio; font too narrow: \"{text}\"")]
    AspectTooNarrow {
        /// The horizontal/vertical scale ratio that was rejected.
        aspect: f64,
        /// The line text, parts joined by two spaces.
        text: String,
    },

    /// More than one gap in a single line
    #[error("GeometryError: Line must not have more than one gap: \"{text}\"")]
    TooManyGaps {
        /// The raw line text.
        text: String,
    },

    /// The line has no glyph width to scale
    #[error("GeometryError: Line has no width: \"{text}\"")]
    EmptyLine {
        /// The line text.
        text: String,
    },
}

impl GeometryError {
    /// The text of the line that caused the error
    pub fn text(&self) -> &str {
        match self {
            Self::AspectTooNarrow { text, .. }
            | Self::TooManyGaps { text }
            | Self::EmptyLine { text } => text,
        }
    }
}

/// Layout error type
///
/// Represents failures while turning a text line into a galley.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Geometry error
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Character not present in the font
    #[error("No glyph for character code {code:#04x} in \"{text}\"")]
    MissingGlyph {
        /// The character code that was looked up.
        code: u32,
        /// The line text.
        text: String,
    },
}

/// Font error type
///
/// Represents errors related to reading and loading stroke fonts.
#[derive(Error, Debug)]
pub enum FontError {
    /// Malformed font definition
    #[error("Font parse error at line {line}: {reason}")]
    Parse {
        /// 1-based line number in the font source.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// No glyphs at all
    #[error("Font contains no glyphs")]
    Empty,

    /// No stroke point lies above the baseline
    #[error("Font has no height above the baseline")]
    NoHeight,

    /// I/O error while reading a font file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration error type
///
/// Represents invalid machine, label or coordinate system settings.
/// Always detected before any output is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Coordinate system outside G54..G59
    #[error("Invalid coordinate system G{0}: must be one of G54..G59")]
    InvalidCoordinateSystem(u8),

    /// Label has no text lines
    #[error("Label has no text lines")]
    NoLines,

    /// Label has more lines than allowed
    #[error("Label has {count} lines, at most {max} allowed")]
    TooManyLines {
        /// Number of lines given.
        count: usize,
        /// Maximum number of lines.
        max: usize,
    },

    /// More labels than available coordinate systems
    #[error("{count} labels given but only {available} coordinate systems available")]
    TooManyLabels {
        /// Number of labels given.
        count: usize,
        /// Number of coordinate systems configured.
        available: usize,
    },

    /// Options that cannot be combined
    #[error("Incompatible options: {0}")]
    Incompatible(String),

    /// A value outside its valid range
    #[error("Value out of range for '{key}': {value}")]
    OutOfRange {
        /// Setting name.
        key: String,
        /// Offending value.
        value: String,
    },
}

/// Main error type for CNCtext
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Layout error
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Font error
    #[error(transparent)]
    Font(#[from] FontError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<GeometryError> for Error {
    fn from(err: GeometryError) -> Self {
        Error::Layout(LayoutError::Geometry(err))
    }
}

impl Error {
    /// Check if this is a geometry error
    pub fn is_geometry_error(&self) -> bool {
        matches!(self, Error::Layout(LayoutError::Geometry(_)))
    }

    /// Check if this is a glyph lookup error
    pub fn is_missing_glyph(&self) -> bool {
        matches!(self, Error::Layout(LayoutError::MissingGlyph { .. }))
    }

    /// Check if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

/// Result type alias for layout operations.
pub type LayoutResult<T> = std::result::Result<T, LayoutError>;

/// Result type alias for font operations.
pub type FontResult<T> = std::result::Result<T, FontError>;

/// Result type alias for configuration checks.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry_error_display() {
        let err = GeometryError::AspectTooNarrow {
            aspect: 0.5,
            text: "ABCDEFGH  12".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "GeometryError: Bad aspect ratio; font too narrow: \"ABCDEFGH  12\""
        );
        assert_eq!(err.text(), "ABCDEFGH  12");

        let err = GeometryError::TooManyGaps {
            text: "a  b  c".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "GeometryError: Line must not have more than one gap: \"a  b  c\""
        );
    }

    #[test]
    fn test_layout_error_display() {
        let err = LayoutError::MissingGlyph {
            code: 0x41,
            text: "ABC".to_string(),
        };
        assert_eq!(err.to_string(), "No glyph for character code 0x41 in \"ABC\"");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidCoordinateSystem(60);
        assert_eq!(
            err.to_string(),
            "Invalid coordinate system G60: must be one of G54..G59"
        );

        let err = ConfigError::TooManyLines { count: 3, max: 2 };
        assert_eq!(err.to_string(), "Label has 3 lines, at most 2 allowed");
    }

    #[test]
    fn test_font_error_display() {
        let err = FontError::Parse {
            line: 7,
            reason: "expected ';'".to_string(),
        };
        assert_eq!(err.to_string(), "Font parse error at line 7: expected ';'");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = GeometryError::EmptyLine {
            text: String::new(),
        }
        .into();
        assert!(err.is_geometry_error());
        assert!(!err.is_config_error());

        let err: Error = ConfigError::NoLines.into();
        assert!(err.is_config_error());

        let err: Error = LayoutError::MissingGlyph {
            code: 0xe9,
            text: "caf\u{e9}".to_string(),
        }
        .into();
        assert!(err.is_missing_glyph());
        assert!(!err.is_geometry_error());
    }
}
