//! # CNCtext Engraver
//!
//! Turns laid-out text into GRBL programs.
//!
//! - **Emitter**: stateful writer that converts positioned polylines into
//!   G0/G1 moves with minimal lift, plunge and feed changes
//! - **Program**: stacks the lines of a label, runs one emitter per label and
//!   cycles labels through the G54..G59 work coordinate systems

pub mod coordinate;
pub mod emitter;
pub mod format;
pub mod program;

pub use coordinate::CoordinateSystem;
pub use emitter::{EngraverParameters, GrblEmitter, ToolState};
pub use format::format_number;
pub use program::{CoordinateRange, LabelParameters, ProgramGenerator};
