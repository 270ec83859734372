//! Deterministic number formatting for CSS output.

/// Format a length with at most two decimals and no trailing zeros.
///
/// Negative zero prints as `0`.
pub fn format_number(value: f32) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = (f64::from(value) * 100.0).round() / 100.0;
    if rounded == 0.0 {
        return "0".to_string();
    }
    format!("{}", rounded)
}

/// Format a length in CSS pixels.
pub fn px(value: f32) -> String {
    format!("{}px", format_number(value))
}
