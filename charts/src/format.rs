/// Human readable duration for time axes: `2.7s`, `49ms`, `12µs`.
pub fn format_time(seconds: f64) -> String {
    if seconds >= 1.0 {
        format!("{seconds:.1}s")
    } else if seconds >= 1e-3 {
        format!("{:.0}ms", seconds * 1e3)
    } else if seconds >= 1e-6 {
        format!("{:.0}µs", seconds * 1e6)
    } else {
        format!("{:.2}µs", seconds * 1e6)
    }
}

/// Compact iteration count: `1K`, `2.5K`, `10M`.
pub fn format_count(value: f64) -> String {
    let (scaled, suffix) = if value >= 1e6 {
        (value / 1e6, "M")
    } else if value >= 1e3 {
        (value / 1e3, "K")
    } else {
        (value, "")
    };
    if (scaled - scaled.round()).abs() < 1e-9 {
        format!("{}{suffix}", scaled.round() as u64)
    } else {
        format!("{scaled:.1}{suffix}")
    }
}

/// `10000` -> `10,000`
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_units() {
        assert_eq!(format_time(2.68), "2.7s");
        assert_eq!(format_time(0.049), "49ms");
        assert_eq!(format_time(0.000_012), "12µs");
        assert_eq!(format_time(0.000_000_5), "0.50µs");
    }

    #[test]
    fn counts() {
        assert_eq!(format_count(500.0), "500");
        assert_eq!(format_count(1_000.0), "1K");
        assert_eq!(format_count(2_500.0), "2.5K");
        assert_eq!(format_count(200_000.0), "200K");
        assert_eq!(format_count(10_000_000.0), "10M");
    }

    #[test]
    fn thousands_separator() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1_000), "1,000");
        assert_eq!(format_thousands(10_000_000), "10,000,000");
    }
}
