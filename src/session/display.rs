//! Number formatting for the readouts

/// Milliseconds in a minute, for converting between ms per beat and BPM
pub const MS_PER_MINUTE: f64 = 60_000.0;

/// Format `value` with five significant places before and after the point
///
/// The integer part decides how many decimals are left: `0.3500`,
/// `60.000`, `1000.0`. Integer parts longer than five digits get none.
pub fn format_reading(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let digits = (value.trunc() as i64).to_string().len();
    let decimals = 5usize.saturating_sub(digits);
    format!("{:.*}", decimals, value)
}

/// Beats per minute for a beat period in milliseconds
pub fn bpm_from_ms(ms: f64) -> f64 {
    MS_PER_MINUTE / ms
}

/// Beat period in milliseconds for a BPM
pub fn ms_from_bpm(bpm: f64) -> f64 {
    MS_PER_MINUTE / bpm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_reading() {
        assert_eq!(format_reading(0.35), "0.3500");
        assert_eq!(format_reading(60.0), "60.000");
        assert_eq!(format_reading(1000.0), "1000.0");
        assert_eq!(format_reading(68.5714), "68.571");
        assert_eq!(format_reading(12345.6), "12346");
        assert_eq!(format_reading(123456.0), "123456");
    }

    #[test]
    fn test_format_reading_negative_counts_sign() {
        assert_eq!(format_reading(-2.5), "-2.500");
    }

    #[test]
    fn test_format_reading_non_finite() {
        assert_eq!(format_reading(f64::INFINITY), "inf");
    }

    #[test]
    fn test_bpm_conversion() {
        assert_eq!(bpm_from_ms(1000.0), 60.0);
        assert_eq!(ms_from_bpm(120.0), 500.0);
        assert_eq!(bpm_from_ms(ms_from_bpm(96.0)), 96.0);
    }
}
