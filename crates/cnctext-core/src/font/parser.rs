//! Parser for `.chr` stroke font definitions.
//!
//! One glyph per line:
//!
//! ```text
//! # plus sign
//! CHR_2B 26 ;13,18 13,0 ;4,9 22,9
//! ```
//!
//! `CHR_` is followed by the character code as two uppercase hex digits, the
//! cell width, and one or more strokes. Each stroke starts with `;` and holds
//! one or more `x,y` points. `#` comments run to the end of the line.

use std::sync::LazyLock;

use regex::Regex;

use super::GlyphRecord;
use crate::error::{FontError, FontResult};

static GLYPH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^CHR_\s*([0-9A-F]{2})\s+(-\s*\d+|\d+)\s*(.*)$").expect("invalid glyph regex")
});

static POINT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(-\s*\d+|\d+)\s*,\s*(-\s*\d+|\d+)").expect("invalid point regex")
});

/// Parse `.chr` source into glyph records, in file order
pub fn parse_chr(source: &str) -> FontResult<Vec<GlyphRecord>> {
    let mut records = Vec::new();

    for (index, raw) in source.lines().enumerate() {
        let line_no = index + 1;
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        }
        .trim();

        if line.is_empty() {
            continue;
        }

        records.push(parse_glyph_line(line, line_no)?);
    }

    if records.is_empty() {
        return Err(FontError::Empty);
    }
    Ok(records)
}

fn parse_glyph_line(line: &str, line_no: usize) -> FontResult<GlyphRecord> {
    let caps = GLYPH_RE.captures(line).ok_or_else(|| FontError::Parse {
        line: line_no,
        reason: format!("expected 'CHR_<code> <width> ;<points>', found '{}'", line),
    })?;

    let code = u32::from_str_radix(&caps[1], 16).map_err(|e| FontError::Parse {
        line: line_no,
        reason: format!("bad character code '{}': {}", &caps[1], e),
    })?;
    let cell_width = parse_number(&caps[2], line_no)?;

    let body = caps[3].trim();
    if !body.starts_with(';') {
        return Err(FontError::Parse {
            line: line_no,
            reason: "glyph must have at least one stroke".to_string(),
        });
    }

    let strokes = body
        .split(';')
        .skip(1)
        .map(|stroke| parse_stroke(stroke, line_no))
        .collect::<FontResult<Vec<_>>>()?;

    Ok(GlyphRecord {
        code,
        cell_width: f64::from(cell_width),
        strokes,
    })
}

fn parse_stroke(stroke: &str, line_no: usize) -> FontResult<Vec<(i32, i32)>> {
    let mut points = Vec::new();
    let mut consumed = 0;

    for caps in POINT_RE.captures_iter(stroke) {
        let whole = caps.get(0).map_or(0..0, |m| m.range());
        if !stroke[consumed..whole.start].trim().is_empty() {
            return Err(unexpected(&stroke[consumed..whole.start], line_no));
        }
        consumed = whole.end;
        points.push((
            parse_number(&caps[1], line_no)?,
            parse_number(&caps[2], line_no)?,
        ));
    }

    if !stroke[consumed..].trim().is_empty() {
        return Err(unexpected(&stroke[consumed..], line_no));
    }
    if points.is_empty() {
        return Err(FontError::Parse {
            line: line_no,
            reason: "stroke has no points".to_string(),
        });
    }
    Ok(points)
}

fn parse_number(token: &str, line_no: usize) -> FontResult<i32> {
    let compact: String = token.chars().filter(|c| !c.is_whitespace()).collect();
    compact.parse::<i32>().map_err(|e| FontError::Parse {
        line: line_no,
        reason: format!("bad number '{}': {}", token, e),
    })
}

fn unexpected(text: &str, line_no: usize) -> FontError {
    FontError::Parse {
        line: line_no,
        reason: format!("unexpected '{}'", text.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_glyph() {
        let records = parse_chr("CHR_2B 26 ;13,18 13,0 ;4,9 22,9\n").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].code, 0x2b);
        assert_eq!(records[0].cell_width, 26.0);
        assert_eq!(
            records[0].strokes,
            vec![vec![(13, 18), (13, 0)], vec![(4, 9), (22, 9)]]
        );
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let src = "# test font\n\nCHR_41 18 ;0,0 9,21 18,0 # the A\n   \nCHR_2D 12 ;2,9 10,9\n";
        let records = parse_chr(src).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].strokes, vec![vec![(0, 0), (9, 21), (18, 0)]]);
        assert_eq!(records[1].code, 0x2d);
    }

    #[test]
    fn test_negative_coordinates_and_spacing() {
        let records = parse_chr("CHR_67 14 ; 0 , 7  0,-5 ;-1,-5 - 3,-7").unwrap();
        assert_eq!(
            records[0].strokes,
            vec![vec![(0, 7), (0, -5)], vec![(-1, -5), (-3, -7)]]
        );
    }

    #[test]
    fn test_missing_stroke_is_error() {
        let err = parse_chr("CHR_20 10").unwrap_err();
        assert!(matches!(err, FontError::Parse { line: 1, .. }));
    }

    #[test]
    fn test_lowercase_code_is_error() {
        let err = parse_chr("CHR_41 10 ;0,0 1,1\nCHR_2b 10 ;0,0 1,1").unwrap_err();
        assert!(matches!(err, FontError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_garbage_inside_stroke_is_error() {
        let err = parse_chr("CHR_41 10 ;0,0 x 1,1").unwrap_err();
        match err {
            FontError::Parse { line, reason } => {
                assert_eq!(line, 1);
                assert!(reason.contains("unexpected 'x'"));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_empty_stroke_is_error() {
        assert!(parse_chr("CHR_41 10 ;0,0 1,1 ;").is_err());
    }

    #[test]
    fn test_empty_source_is_error() {
        assert!(matches!(parse_chr("# nothing\n"), Err(FontError::Empty)));
    }
}
