//! # CNCtext
//!
//! Engraves short text labels on a GRBL-controlled CNC machine using single
//! stroke fonts.
//!
//! ## Architecture
//!
//! 1. **cnctext-core** - stroke fonts, transforms, line fitting and layout
//! 2. **cnctext-engraver** - G-code emission and label program assembly
//! 3. **cnctext-settings** - configuration files and validation
//! 4. **cnctext** - command line driver that ties them together

pub mod cli;

pub use cnctext_core::{
    ConfigError, Error, FitResult, FixupPipeline, Font, FontError, Galley, GeometryError, Glyph,
    GlyphFixup, GlyphRecord, LabelSize, LayoutError, Line, Point, Result, Transform,
};
pub use cnctext_engraver::{
    CoordinateRange, CoordinateSystem, EngraverParameters, GrblEmitter, LabelParameters,
    ProgramGenerator, ToolState,
};
pub use cnctext_settings::{Config, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Log output goes to stderr since stdout carries the generated program.
/// Verbosity follows `RUST_LOG` and defaults to warnings only.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
