//! Timestamp representation for storage models.
//!
//! The `Any` driver has no native datetime mapping, so models persist
//! timestamps as RFC 3339 text. The canonical format here is
//! second-precision UTC with a `Z` suffix, which sorts lexicographically in
//! chronological order and round-trips through the model↔entity mapping.

use chrono::{DateTime, SecondsFormat, Utc};

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Lenient parse for values read back from storage; anything unparseable
/// collapses to the epoch rather than failing the row mapping.
pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_round_trip() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 17, 8, 30, 0).unwrap();
        let raw = format_timestamp(&ts);
        assert_eq!(raw, "2024-05-17T08:30:00Z");
        assert_eq!(parse_timestamp(&raw), ts);
    }

    #[test]
    fn test_canonical_format_sorts_chronologically() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        assert!(format_timestamp(&earlier) < format_timestamp(&later));
    }

    #[test]
    fn test_garbage_collapses_to_epoch() {
        assert_eq!(parse_timestamp("not a date"), DateTime::UNIX_EPOCH);
    }
}
