//! Label program assembly.
//!
//! A label is one or more lines of text stacked vertically, engraved under
//! its own work coordinate system. Lines are given top to bottom and engraved
//! bottom to top, starting one line spread above the label origin so the
//! bottom line has room for descenders.

use cnctext_core::{ConfigError, ConfigResult, Font, Galley, LabelSize, Line, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::coordinate::CoordinateSystem;
use crate::emitter::{EngraverParameters, GrblEmitter};

/// Label geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelParameters {
    /// Available width for every line (mm)
    pub width: f64,
    /// Cap height of one line (mm)
    pub char_height: f64,
    /// Vertical space below and between lines (mm)
    pub line_spread: f64,
    /// Engrave a single line at twice the height, spread included
    pub double_height: bool,
    /// Maximum number of lines per label
    pub max_lines: usize,
}

impl Default for LabelParameters {
    fn default() -> Self {
        Self {
            width: 22.5,
            char_height: 2.8,
            line_spread: 0.5,
            double_height: false,
            max_lines: 2,
        }
    }
}

impl LabelParameters {
    /// Box available to each line
    pub fn line_size(&self) -> LabelSize {
        let height = if self.double_height {
            2.0 * self.char_height + self.line_spread
        } else {
            self.char_height
        };
        LabelSize::new(self.width, height)
    }

    /// Checks that `count` lines fit these settings
    pub fn check_line_count(&self, count: usize) -> ConfigResult<()> {
        if count == 0 {
            return Err(ConfigError::NoLines);
        }
        if self.double_height && count > 1 {
            return Err(ConfigError::Incompatible(format!(
                "double height allows one line per label, got {}",
                count
            )));
        }
        if count > self.max_lines {
            return Err(ConfigError::TooManyLines {
                count,
                max: self.max_lines,
            });
        }
        Ok(())
    }
}

/// Range of work coordinate systems used for consecutive labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinateRange {
    /// First coordinate system number (54..=59)
    pub start: u8,
    /// Number of coordinate systems available
    pub count: u8,
}

impl Default for CoordinateRange {
    fn default() -> Self {
        Self {
            start: 54,
            count: 1,
        }
    }
}

impl CoordinateRange {
    /// Every coordinate system in the range, in order
    pub fn systems(&self) -> ConfigResult<Vec<CoordinateSystem>> {
        if self.count == 0 {
            return Err(ConfigError::OutOfRange {
                key: "coordinates.count".to_string(),
                value: self.count.to_string(),
            });
        }
        let first = CoordinateSystem::try_from(self.start)?;
        (0..usize::from(self.count))
            .map(|i| first.offset(i))
            .collect()
    }
}

/// Generates complete engraving programs for labels
#[derive(Debug)]
pub struct ProgramGenerator<'f> {
    font: &'f Font,
    label: LabelParameters,
    machine: EngraverParameters,
    coordinates: CoordinateRange,
}

impl<'f> ProgramGenerator<'f> {
    pub fn new(
        font: &'f Font,
        label: LabelParameters,
        machine: EngraverParameters,
        coordinates: CoordinateRange,
    ) -> Self {
        Self {
            font,
            label,
            machine,
            coordinates,
        }
    }

    /// Lays out every line of a label, top to bottom.
    fn layout(&self, lines: &[&str]) -> Result<Vec<Galley>> {
        self.label.check_line_count(lines.len())?;
        let size = self.label.line_size();

        lines
            .iter()
            .map(|text| {
                let line = Line::new(self.font, text)?;
                let fit = line.scaling(size)?;
                Ok(line.galley(&fit))
            })
            .collect()
    }

    /// Instructions for one label under coordinate system `cs`.
    ///
    /// Nothing is emitted unless every line lays out.
    pub fn generate_label(&self, lines: &[&str], cs: CoordinateSystem) -> Result<Vec<String>> {
        let galleys = self.layout(lines)?;
        let size = self.label.line_size();

        let params = EngraverParameters {
            coordinate_system: cs.number(),
            ..self.machine.clone()
        };
        let mut emitter = GrblEmitter::new(params)?;
        emitter.start();

        let mut base_y = self.label.line_spread;
        for galley in galleys.iter().rev() {
            debug!(base_y, glyphs = galley.len(), "Engraving line");
            for stroke in galley.positioned(0.0, base_y) {
                emitter.polyline(&stroke);
            }
            base_y += self.label.line_spread + size.height;
        }

        emitter.stop();
        Ok(emitter.into_lines())
    }

    /// A program for every label, each under the next coordinate system.
    ///
    /// All labels are checked against the coordinate range before any output
    /// is produced.
    pub fn generate<S: AsRef<str>>(&self, labels: &[Vec<S>]) -> Result<String> {
        let systems = self.coordinates.systems()?;
        if labels.len() > systems.len() {
            return Err(ConfigError::TooManyLabels {
                count: labels.len(),
                available: systems.len(),
            }
            .into());
        }
        for label in labels {
            self.label.check_line_count(label.len())?;
        }

        let mut program = String::new();
        for (label, cs) in labels.iter().zip(systems) {
            let lines: Vec<&str> = label.iter().map(AsRef::as_ref).collect();
            info!("Generating label {:?} in {}", lines, cs);
            for instruction in self.generate_label(&lines, cs)? {
                program.push_str(&instruction);
                program.push('\n');
            }
        }
        Ok(program)
    }
}
