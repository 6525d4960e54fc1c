//! Shared text-to-number helpers for sizes reported by du/df.

/// Parse a du-style human size ("25G", "1.5M", "736K", "0B") into bytes.
pub fn parse_size(s: &str) -> Option<u64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let split = s.find(|c: char| c.is_ascii_alphabetic()).unwrap_or(s.len());
    let (value, unit) = s.split_at(split);
    let value: f64 = value.trim().parse().ok()?;

    let factor: f64 = match unit.trim().chars().next() {
        None | Some('B') | Some('b') => 1.0,
        Some('K') | Some('k') => 1024.0,
        Some('M') | Some('m') => 1024.0 * 1024.0,
        Some('G') | Some('g') => 1024.0 * 1024.0 * 1024.0,
        Some('T') | Some('t') => 1024.0_f64.powi(4),
        Some('P') | Some('p') => 1024.0_f64.powi(5),
        _ => return None,
    };

    Some((value * factor) as u64)
}

/// Size string to gigabytes, for threshold comparisons.
pub fn size_to_gb(s: &str) -> Option<f64> {
    parse_size(s).map(|b| b as f64 / (1024.0 * 1024.0 * 1024.0))
}

/// Render bytes the way du -h does ("25.0G", "736K", "0B").
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["K", "M", "G", "T", "P"];

    if bytes < 1024 {
        return format!("{bytes}B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{:.1}{}", value, UNITS[unit])
}

/// First field of `du -sh` output (the size column).
pub fn first_du_field(text: &str) -> Option<String> {
    text.lines()
        .next()?
        .split_whitespace()
        .next()
        .map(|s| s.to_string())
}

/// Round to two decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("0B"), Some(0));
        assert_eq!(parse_size("736K"), Some(736 * 1024));
        assert_eq!(parse_size("1.5M"), Some((1.5 * 1024.0 * 1024.0) as u64));
        assert_eq!(parse_size("25G"), Some(25 * 1024 * 1024 * 1024));
        assert_eq!(parse_size("  4.0K"), Some(4096));
        assert_eq!(parse_size("garbage"), None);
        assert_eq!(parse_size(""), None);
    }

    #[test]
    fn test_size_to_gb() {
        assert_eq!(size_to_gb("25G"), Some(25.0));
        assert_eq!(size_to_gb("512M"), Some(0.5));
    }

    #[test]
    fn test_human_size() {
        assert_eq!(human_size(0), "0B");
        assert_eq!(human_size(512), "512B");
        assert_eq!(human_size(2048), "2.0K");
        assert_eq!(human_size(25 * 1024 * 1024 * 1024), "25.0G");
    }

    #[test]
    fn test_first_du_field() {
        assert_eq!(
            first_du_field("1.5G\t/Users/x/Library/Caches\n"),
            Some("1.5G".to_string())
        );
        assert_eq!(first_du_field(""), None);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.006), 1.01);
        assert_eq!(round2(3.14159), 3.14);
    }
}
