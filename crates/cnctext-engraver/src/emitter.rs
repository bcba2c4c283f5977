//! GRBL toolpath emitter.
//!
//! Turns positioned polylines into G-code while emitting as few state
//! changes as possible: the tool is only lowered or lifted when its state
//! actually changes, and a feed rate is only written when it differs from the
//! last one sent (the controller keeps the modal `F` value).

use cnctext_core::{ConfigResult, Point};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::coordinate::CoordinateSystem;
use crate::format::format_number;

/// Machine parameters for engraving
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngraverParameters {
    /// Work coordinate system number (54..=59)
    ///
    /// Not read from or written to machine settings; programs take it from
    /// the coordinate range of each label.
    #[serde(skip, default = "default_coordinate_system")]
    pub coordinate_system: u8,
    /// Travel height at program start and end (mm)
    pub z_travel: f64,
    /// Clearance height between strokes (mm)
    pub z_clear: f64,
    /// Engraving depth (mm)
    pub z_engrave: f64,
    /// Feed rate for rapid moves (mm/min)
    pub rapid_feed: u32,
    /// Feed rate for engraving moves (mm/min)
    pub interpolate_feed: u32,
    /// Spindle speed (RPM)
    pub spindle_speed: u32,
}

fn default_coordinate_system() -> u8 {
    CoordinateSystem::default().number()
}

impl Default for EngraverParameters {
    fn default() -> Self {
        Self {
            coordinate_system: default_coordinate_system(),
            z_travel: 5.0,
            z_clear: 0.25,
            z_engrave: -0.075,
            rapid_feed: 100,
            interpolate_feed: 50,
            spindle_speed: 500,
        }
    }
}

/// Vertical tool state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolState {
    /// At clearance or travel height
    Clear,
    /// At engraving depth
    Down,
}

/// Stateful G-code writer for one program
#[derive(Debug)]
pub struct GrblEmitter {
    coordinate_system: CoordinateSystem,
    params: EngraverParameters,
    tool: ToolState,
    feed: Option<u32>,
    last_point: Option<Point>,
    lines: Vec<String>,
}

impl GrblEmitter {
    /// Create an emitter; fails if the coordinate system is not G54..G59.
    pub fn new(params: EngraverParameters) -> ConfigResult<Self> {
        let coordinate_system = CoordinateSystem::try_from(params.coordinate_system)?;
        debug!("Created emitter for {}", coordinate_system);
        Ok(Self {
            coordinate_system,
            params,
            tool: ToolState::Clear,
            feed: None,
            last_point: None,
            lines: Vec::new(),
        })
    }

    pub fn coordinate_system(&self) -> CoordinateSystem {
        self.coordinate_system
    }

    pub fn tool_state(&self) -> ToolState {
        self.tool
    }

    /// Last feed rate written to the program
    pub fn current_feed(&self) -> Option<u32> {
        self.feed
    }

    pub fn last_point(&self) -> Option<Point> {
        self.last_point
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    fn emit(&mut self, line: String) {
        self.lines.push(line);
    }

    /// ` F<feed>` if `feed` is not already active, else nothing
    fn feed_suffix(&mut self, feed: u32) -> String {
        if self.feed == Some(feed) {
            String::new()
        } else {
            self.feed = Some(feed);
            format!(" F{}", feed)
        }
    }

    /// Move to travel height regardless of the current state
    fn away(&mut self) {
        let suffix = self.feed_suffix(self.params.rapid_feed);
        self.emit(format!("G0 Z{}{}", format_number(self.params.z_travel), suffix));
        self.tool = ToolState::Clear;
    }

    /// Lift to clearance height if the tool is down
    fn up(&mut self) {
        if self.tool == ToolState::Down {
            let suffix = self.feed_suffix(self.params.rapid_feed);
            self.emit(format!("G0 Z{}{}", format_number(self.params.z_clear), suffix));
            self.tool = ToolState::Clear;
        }
    }

    /// Plunge to engraving depth if the tool is clear
    fn down(&mut self) {
        if self.tool == ToolState::Clear {
            let suffix = self.feed_suffix(self.params.interpolate_feed);
            self.emit(format!("G1 Z{}{}", format_number(self.params.z_engrave), suffix));
            self.tool = ToolState::Down;
        }
    }

    fn rapid(&mut self, pt: Point) {
        self.up();
        self.emit(format!("G0 X{} Y{}", format_number(pt.x), format_number(pt.y)));
    }

    fn engrave(&mut self, pt: Point) {
        self.down();
        let suffix = self.feed_suffix(self.params.interpolate_feed);
        self.emit(format!(
            "G1 X{} Y{}{}",
            format_number(pt.x),
            format_number(pt.y),
            suffix
        ));
    }

    /// Program preamble: coordinate system, travel height, origin, spindle on.
    pub fn start(&mut self) {
        self.emit(format!("G0 {}", self.coordinate_system));
        self.away();
        let suffix = self.feed_suffix(self.params.rapid_feed);
        self.emit(format!("G0 X0 Y0{}", suffix));
        self.emit(format!("M3 S{}", self.params.spindle_speed));
    }

    /// Program epilogue: travel height, spindle off.
    pub fn stop(&mut self) {
        self.away();
        self.emit("M5".to_string());
    }

    /// Engrave one stroke.
    ///
    /// The tool is repositioned with a rapid move unless the stroke starts
    /// where the previous one ended.
    pub fn polyline(&mut self, points: &[Point]) {
        let Some((&first, rest)) = points.split_first() else {
            return;
        };

        if self.last_point != Some(first) {
            self.rapid(first);
        }
        for &pt in rest {
            self.engrave(pt);
        }

        self.last_point = points.last().copied();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cnctext_core::ConfigError;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn emitter() -> GrblEmitter {
        GrblEmitter::new(EngraverParameters::default()).unwrap()
    }

    fn count(lines: &[String], needle: &str) -> usize {
        lines.iter().filter(|l| l.contains(needle)).count()
    }

    #[test]
    fn test_invalid_coordinate_system() {
        let params = EngraverParameters {
            coordinate_system: 60,
            ..Default::default()
        };
        let err = GrblEmitter::new(params).unwrap_err();
        assert_eq!(err, ConfigError::InvalidCoordinateSystem(60));
    }

    #[test]
    fn test_start_sequence() {
        let mut e = emitter();
        e.start();
        assert_eq!(e.lines(), ["G0 G54", "G0 Z5.0 F100", "G0 X0 Y0", "M3 S500"]);
        assert_eq!(e.tool_state(), ToolState::Clear);
        assert_eq!(e.current_feed(), Some(100));
    }

    #[test]
    fn test_start_uses_configured_coordinate_system() {
        let params = EngraverParameters {
            coordinate_system: 57,
            spindle_speed: 12000,
            ..Default::default()
        };
        let mut e = GrblEmitter::new(params).unwrap();
        e.start();
        assert_eq!(e.lines()[0], "G0 G57");
        assert_eq!(e.lines()[3], "M3 S12000");
    }

    #[test]
    fn test_first_stroke_from_fresh_emitter() {
        let mut e = emitter();
        e.polyline(&pts(&[(0.0, 0.0), (5.0, 5.0)]));
        assert_eq!(
            e.lines(),
            ["G0 X0.0 Y0.0", "G1 Z-0.075 F50", "G1 X5.0 Y5.0"]
        );
        assert_eq!(e.tool_state(), ToolState::Down);
        assert_eq!(e.last_point(), Some(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_empty_polyline_is_noop() {
        let mut e = emitter();
        e.polyline(&[]);
        assert!(e.lines().is_empty());
        assert_eq!(e.last_point(), None);
    }

    #[test]
    fn test_single_point_polyline_only_repositions() {
        let mut e = emitter();
        e.polyline(&pts(&[(1.0, 2.0)]));
        assert_eq!(e.lines(), ["G0 X1.0 Y2.0"]);
        assert_eq!(e.tool_state(), ToolState::Clear);
        assert_eq!(e.last_point(), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_continuous_strokes_skip_reposition() {
        let mut e = emitter();
        e.polyline(&pts(&[(0.0, 0.0), (5.0, 5.0)]));
        e.polyline(&pts(&[(5.0, 5.0), (10.0, 0.0)]));
        assert_eq!(
            e.lines(),
            [
                "G0 X0.0 Y0.0",
                "G1 Z-0.075 F50",
                "G1 X5.0 Y5.0",
                "G1 X10.0 Y0.0"
            ]
        );
        assert_eq!(count(e.lines(), "F50"), 1);
    }

    #[test]
    fn test_disjoint_strokes_lift_and_relower() {
        let mut e = emitter();
        e.polyline(&pts(&[(0.0, 0.0), (5.0, 5.0)]));
        e.polyline(&pts(&[(7.0, 0.0), (7.0, 5.0)]));
        assert_eq!(
            e.lines(),
            [
                "G0 X0.0 Y0.0",
                "G1 Z-0.075 F50",
                "G1 X5.0 Y5.0",
                "G0 Z0.25 F100",
                "G0 X7.0 Y0.0",
                "G1 Z-0.075 F50",
                "G1 X7.0 Y5.0"
            ]
        );
    }

    #[test]
    fn test_lift_suppressed_while_clear() {
        let mut e = emitter();
        e.start();
        let before = e.lines().len();
        e.polyline(&pts(&[(1.0, 1.0)]));
        e.polyline(&pts(&[(2.0, 2.0)]));
        let added = &e.lines()[before..];
        assert_eq!(added, ["G0 X1.0 Y1.0", "G0 X2.0 Y2.0"]);
    }

    #[test]
    fn test_lower_only_on_transition() {
        let mut e = emitter();
        e.polyline(&pts(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0), (0.0, 0.0)]));
        assert_eq!(count(e.lines(), "G1 Z"), 1);
        assert_eq!(count(e.lines(), "G1 X"), 4);
    }

    #[test]
    fn test_feed_not_repeated_when_unchanged() {
        let mut e = emitter();
        e.start();
        e.polyline(&pts(&[(0.0, 0.0), (1.0, 0.0)]));
        e.polyline(&pts(&[(2.0, 0.0), (3.0, 0.0)]));
        e.stop();

        let mut last: Option<&str> = None;
        for line in e.lines() {
            if let Some(pos) = line.find(" F") {
                let feed = &line[pos..];
                assert_ne!(Some(feed), last, "repeated feed on '{}'", line);
                last = Some(feed);
            }
        }
    }

    #[test]
    fn test_equal_feeds_share_memo() {
        let params = EngraverParameters {
            rapid_feed: 80,
            interpolate_feed: 80,
            ..Default::default()
        };
        let mut e = GrblEmitter::new(params).unwrap();
        e.start();
        e.polyline(&pts(&[(0.0, 0.0), (1.0, 0.0)]));
        e.polyline(&pts(&[(2.0, 0.0), (3.0, 0.0)]));
        e.stop();
        assert_eq!(count(e.lines(), " F80"), 1);
    }

    #[test]
    fn test_stop_always_lifts_once() {
        // From clear
        let mut e = emitter();
        e.start();
        e.stop();
        let lines = e.into_lines();
        assert_eq!(&lines[4..], ["G0 Z5.0", "M5"]);

        // From down
        let mut e = emitter();
        e.start();
        e.polyline(&pts(&[(0.0, 0.0), (1.0, 1.0)]));
        let before = e.lines().len();
        e.stop();
        assert_eq!(&e.lines()[before..], ["G0 Z5.0 F100", "M5"]);
        assert_eq!(e.tool_state(), ToolState::Clear);

        // Without start, the feed has never been sent
        let mut e = emitter();
        e.stop();
        assert_eq!(e.lines(), ["G0 Z5.0 F100", "M5"]);
    }

    #[test]
    fn test_clear_to_down_to_clear_transitions() {
        let mut e = emitter();
        assert_eq!(e.tool_state(), ToolState::Clear);
        e.polyline(&pts(&[(0.0, 0.0), (1.0, 0.0)]));
        assert_eq!(e.tool_state(), ToolState::Down);
        e.polyline(&pts(&[(1.0, 0.0), (2.0, 0.0)]));
        assert_eq!(e.tool_state(), ToolState::Down);
        e.polyline(&pts(&[(5.0, 5.0)]));
        assert_eq!(e.tool_state(), ToolState::Clear);
        e.polyline(&pts(&[(5.0, 5.0), (6.0, 6.0)]));
        assert_eq!(e.tool_state(), ToolState::Down);
        e.stop();
        assert_eq!(e.tool_state(), ToolState::Clear);
    }

    #[test]
    fn test_coordinates_rendered_with_three_decimals() {
        let mut e = emitter();
        e.polyline(&pts(&[(1.0 / 3.0, 2.0 / 3.0), (10.12345, -0.0004)]));
        assert_eq!(e.lines()[0], "G0 X0.333 Y0.667");
        assert_eq!(e.lines()[2], "G1 X10.123 Y0.0");
    }
}
