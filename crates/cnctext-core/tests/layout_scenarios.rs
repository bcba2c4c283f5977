use cnctext_core::{
    Error, Font, GeometryError, LabelSize, LayoutError, Line, MIN_GAP_WIDTH,
};

const PLUS_FONT: &str = "\
# '+' only
CHR_2B 10 ;5,10 5,0 ;0,5 10,5
";

fn plus_font() -> Font {
    Font::from_chr_str(PLUS_FONT).unwrap()
}

#[test]
fn test_gapped_line_places_six_identical_glyphs() {
    let font = plus_font();
    let line = Line::new(&font, "+++  +++").unwrap();
    let fit = line.scaling(LabelSize::new(22.5, 2.8)).unwrap();
    let galley = line.galley(&fit);

    assert_eq!(galley.len(), 6);

    let first = &galley.glyphs[0].strokes;
    for placed in &galley.glyphs {
        assert_eq!(&placed.strokes, first);
    }

    let offsets: Vec<f64> = galley.glyphs.iter().map(|g| g.x_offset).collect();
    let advance = 10.0 * fit.sx;
    for pair in [(0, 1), (1, 2), (3, 4), (4, 5)] {
        assert!((offsets[pair.1] - offsets[pair.0] - advance).abs() < 1e-9);
    }

    let gap = fit.gap_width.unwrap();
    assert_eq!(gap, MIN_GAP_WIDTH);
    assert!((offsets[3] - offsets[2] - advance - gap).abs() < 1e-9);

    // Right part ends at the box edge.
    assert!((galley.width - 22.5).abs() < 1e-9);
}

#[test]
fn test_gapped_line_after_clamp_uses_widened_gap() {
    let font = plus_font();
    let line = Line::new(&font, "+  +").unwrap();
    let fit = line.scaling(LabelSize::new(22.5, 2.8)).unwrap();
    let galley = line.galley(&fit);

    let gap = fit.gap_width.unwrap();
    assert!(gap > MIN_GAP_WIDTH);
    let advance = 10.0 * fit.sx;
    assert!((galley.glyphs[1].x_offset - advance - gap).abs() < 1e-9);
    assert!((galley.width - 22.5).abs() < 1e-9);
}

#[test]
fn test_double_gap_fails_before_layout() {
    let font = plus_font();
    let err = Line::new(&font, "+  +  +").unwrap_err();
    assert!(matches!(
        err,
        LayoutError::Geometry(GeometryError::TooManyGaps { .. })
    ));

    let err: Error = Line::new(&font, "++   +  +").unwrap_err().into();
    assert!(err.is_geometry_error());
}

#[test]
fn test_non_ascii_is_lookup_failure() {
    let font = plus_font();
    let err: Error = Line::new(&font, "+\u{e9}").unwrap_err().into();
    assert!(err.is_missing_glyph());
    assert!(!err.is_geometry_error());

    // a glyph defined at a Latin-1 code is never used for non-ASCII text
    let font = Font::from_chr_str(&format!("{}CHR_E9 10 ;0,0 10,10\n", PLUS_FONT)).unwrap();
    assert!(font.contains(0xe9));
    match Line::new(&font, "+\u{e9}") {
        Err(LayoutError::MissingGlyph { code, .. }) => assert_eq!(code, 0xe9),
        other => panic!("expected a missing glyph, got {:?}", other.map(|l| l.text())),
    }
}

#[test]
fn test_font_file_round_trip() {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PLUS_FONT.as_bytes()).unwrap();

    let font = Font::from_file(file.path()).unwrap();
    assert_eq!(font.height(), 10.0);
    assert!(font.contains(0x2b));
    assert!(font.contains(0x20));
}

#[test]
fn test_missing_font_file() {
    let err = Font::from_file("/nonexistent/font.chr").unwrap_err();
    assert!(matches!(err, cnctext_core::FontError::Io(_)));
}
