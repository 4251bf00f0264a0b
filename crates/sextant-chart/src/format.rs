//! Numeric label formatting.
//!
//! Formatting is stateless: a [`LabelFormat`] is a small `Copy` value and
//! every call works on its own copy, so no precision setting leaks between
//! callers.

/// Round half away from negative infinity: `floor(x + 0.5)`.
#[inline]
pub fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Thresholds controlling when labels switch to scientific notation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelFormat {
    /// Magnitudes strictly above this use scientific notation.
    pub sci_above: f64,
    /// Non-zero magnitudes strictly below this use scientific notation.
    pub sci_below: f64,
    /// Upper bound on fixed-point fraction digits.
    pub max_digits: usize,
}

impl Default for LabelFormat {
    fn default() -> Self {
        Self {
            sci_above: 10_000.0,
            sci_below: 0.001,
            max_digits: 10,
        }
    }
}

impl LabelFormat {
    /// Whether `value` is rendered in scientific notation.
    pub fn is_scientific(&self, value: f64) -> bool {
        let magnitude = value.abs();
        magnitude > self.sci_above || (magnitude > 0.0 && magnitude < self.sci_below)
    }

    /// Format a tick label.
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return non_finite(value);
        }
        if value == 0.0 {
            return "0".to_string();
        }
        if self.is_scientific(value) {
            format_scientific(value)
        } else {
            format_fixed(value, self.adaptive_digits(value))
        }
    }

    /// Fraction digits for fixed-point output: grows as `|value|` shrinks
    /// below one, `-round(log10|v|) + 1`, clamped to `0..=max_digits`.
    pub fn adaptive_digits(&self, value: f64) -> usize {
        let magnitude = value.abs();
        if magnitude == 0.0 || !magnitude.is_finite() {
            return 0;
        }
        let digits = -round_half_up(magnitude.log10()) + 1.0;
        digits.clamp(0.0, self.max_digits as f64) as usize
    }
}

/// Format with the default [`LabelFormat`].
pub fn format_label(value: f64) -> String {
    LabelFormat::default().format(value)
}

/// Fixed-point rendering with exactly `digits` fraction digits.
pub fn format_fixed(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    let text = format!("{value:.digits$}");
    // "-0.00" reads badly on an axis.
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}

/// Split `value` into a mantissa in `[1, 10)` and a base-10 exponent by
/// repeated division or multiplication by ten.
pub fn decompose(value: f64) -> (f64, i32) {
    if value == 0.0 || !value.is_finite() {
        return (value, 0);
    }
    let mut mantissa = value;
    let mut exponent = 0i32;
    // f64 spans roughly 10^±308; the caps keep subnormals from spinning.
    while mantissa.abs() >= 10.0 && exponent < 400 {
        mantissa /= 10.0;
        exponent += 1;
    }
    while mantissa.abs() < 1.0 && exponent > -400 {
        mantissa *= 10.0;
        exponent -= 1;
    }
    (mantissa, exponent)
}

/// Scientific rendering as `mantissa×10^exp`, mantissa rounded to two
/// decimals with trailing zeros trimmed.
pub fn format_scientific(value: f64) -> String {
    if !value.is_finite() {
        return non_finite(value);
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let (mut mantissa, mut exponent) = decompose(value);
    mantissa = round_half_up(mantissa * 100.0) / 100.0;
    if mantissa.abs() >= 10.0 {
        mantissa /= 10.0;
        exponent += 1;
    }
    let text = format!("{mantissa:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{text}×10^{exponent}")
}

fn non_finite(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value > 0.0 {
        "inf".to_string()
    } else {
        "-inf".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-0.6), -1.0);
    }

    #[test]
    fn test_fixed_precision_grows_below_one() {
        assert_eq!(format_label(5.0), "5");
        assert_eq!(format_label(2.5), "2.5");
        assert_eq!(format_label(0.25), "0.25");
        assert_eq!(format_label(0.05), "0.05");
        assert_eq!(format_label(0.004), "0.004");
        assert_eq!(format_label(-14.0), "-14");
        assert_eq!(format_label(0.0), "0");
    }

    #[test]
    fn test_scientific_thresholds() {
        assert_eq!(format_label(10_000.0), "10000");
        assert_eq!(format_label(25_000.0), "2.5×10^4");
        assert_eq!(format_label(0.0005), "5×10^-4");
        assert_eq!(format_label(-123_456.0), "-1.23×10^5");
    }

    #[test]
    fn test_mantissa_rounding_renormalizes() {
        assert_eq!(format_scientific(99_999.0), "1×10^5");
    }

    #[test]
    fn test_decompose() {
        let (m, e) = decompose(0.00042);
        assert!((m - 4.2).abs() < 1e-9);
        assert_eq!(e, -4);
    }

    #[test]
    fn test_non_finite_labels() {
        assert_eq!(format_label(f64::NAN), "NaN");
        assert_eq!(format_label(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_negative_zero_fixed() {
        assert_eq!(format_fixed(-0.0001, 2), "0.00");
    }
}
