/// Renders a result as its canonical decimal string.
///
/// The digits are the shortest that parse back to the same double. Magnitudes
/// in `[1e-7, 1e21)` are written positionally, anything else in exponent form,
/// the same thresholds ECMAScript uses for `Number.prototype.toString`.
///
/// # Examples
/// ```
/// use scicalc::format::format_number;
///
/// assert_eq!(format_number(120.0), "120");
/// assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
/// assert_eq!(format_number(1e21), "1e21");
/// assert_eq!(format_number(f64::INFINITY), "Infinity");
/// ```
#[must_use]
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        // -0 shows as 0
        return "0".to_string();
    }

    if (1e-7..1e21).contains(&value.abs()) {
        format!("{value}")
    } else {
        format!("{value:e}")
    }
}
