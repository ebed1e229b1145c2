/// Whole number with comma thousands separators, e.g. `1,234,568`.
pub fn thousands(value: f64) -> String {
    if !value.is_finite() {
        return "NaN".to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if rounded < 0.0 {
        out.insert(0, '-');
    }
    out
}

/// Headline metric text for the total-sales card.
pub fn currency(value: f64) -> String {
    format!("AED {}", thousands(value))
}

/// Table cell for a statistic; NaN is shown literally.
pub fn stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.4}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_digits_in_threes() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.4), "999");
        assert_eq!(thousands(1_000.0), "1,000");
        assert_eq!(thousands(1_234_567.6), "1,234,568");
        assert_eq!(thousands(-45_000.0), "-45,000");
        assert_eq!(currency(150.0), "AED 150");
    }

    #[test]
    fn nan_is_spelled_out() {
        assert_eq!(stat(f64::NAN), "NaN");
        assert_eq!(stat(0.5), "0.5000");
        assert_eq!(thousands(f64::NAN), "NaN");
    }
}
