//! Number formatting for generated G-code.

/// Decimal places kept in coordinates and heights
pub const DECIMALS: i32 = 3;

/// Formats a coordinate or height.
///
/// The value is rounded to [`DECIMALS`] places and written in its shortest
/// form, always with at least one fractional digit (`5.0`, `-0.075`, `3.417`).
pub fn format_number(value: f64) -> String {
    let factor = 10f64.powi(DECIMALS);
    let mut rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        // drop the sign of negative zero
        rounded = 0.0;
    }

    let text = rounded.to_string();
    if text.contains('.') || !rounded.is_finite() {
        text
    } else {
        format!("{}.0", text)
    }
}
