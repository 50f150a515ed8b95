//! Timestamp utilities

use chrono::{DateTime, Local, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a timestamp as the notification clock prefix `[HH:MM:SS]`
///
/// Rendered in local time, since the notification log is read next to
/// a wall clock.
pub fn clock_prefix(timestamp: DateTime<Utc>) -> String {
    let local: DateTime<Local> = timestamp.into();
    local.format("[%H:%M:%S]").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // After 2000-01-01, before 2100-01-01
        assert!(timestamp.timestamp() > 946_684_800);
        assert!(timestamp.timestamp() < 4_102_444_800);
    }

    #[test]
    fn test_clock_prefix_shape() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 1, 9, 5, 3).unwrap();
        let prefix = clock_prefix(ts);
        // Local offset shifts the digits; the shape is fixed
        assert_eq!(prefix.len(), 10);
        assert!(prefix.starts_with('['));
        assert!(prefix.ends_with(']'));
        assert_eq!(&prefix[3..4], ":");
        assert_eq!(&prefix[6..7], ":");
    }

    #[test]
    fn test_clock_prefix_zero_pads() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 7).unwrap();
        let prefix = clock_prefix(ts);
        for (i, c) in prefix.chars().enumerate() {
            match i {
                0 | 9 => continue,
                3 | 6 => assert_eq!(c, ':'),
                _ => assert!(c.is_ascii_digit(), "non-digit at {}: {}", i, c),
            }
        }
    }
}
