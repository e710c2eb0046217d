/// Round to a fixed number of decimal places
/// The exact binary value is rounded, ties go to the even digit
pub fn round_to(value: f64, decimals: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", decimals, value).parse().unwrap_or(value)
}

/// Truncate toward zero into a whole count
/// Negative and NaN inputs saturate to 0
pub fn truncate_count(value: f64) -> u64 {
    value.trunc() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(99.96, 1), 100.0);
        assert_eq!(round_to(10000.0, 2), 10000.0);
        assert_eq!(round_to(1234.5678, 2), 1234.57);
    }

    #[test]
    fn test_round_to_ties_to_even() {
        assert_eq!(round_to(6.25, 1), 6.2);
        assert_eq!(round_to(6.75, 1), 6.8);
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(2.5, 0), 2.0);
    }

    #[test]
    fn test_round_to_uses_binary_value() {
        // 2.675 and 0.15 are stored just below the halfway point
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(0.15, 1), 0.1);
        // 0.45 just above
        assert_eq!(round_to(0.45, 1), 0.5);
    }

    #[test]
    fn test_truncate_count() {
        assert_eq!(truncate_count(1999.999), 1999);
        assert_eq!(truncate_count(0.9), 0);
        assert_eq!(truncate_count(-3.0), 0);
        assert_eq!(truncate_count(f64::NAN), 0);
    }
}
