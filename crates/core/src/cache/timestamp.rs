//! Timestamp encoding for SQLite TEXT columns.
//!
//! Every stored timestamp uses the same fixed-width RFC 3339 UTC form
//! (microseconds, `Z` suffix), so `<` in SQL agrees with chronological order.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::Error;

/// Encode a timestamp for storage.
pub fn encode(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decode a stored timestamp.
pub fn decode(raw: &str) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| Error::InvalidTimestamp(format!("{raw}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_encode_fixed_width() {
        let whole = Utc.with_ymd_and_hms(2025, 1, 20, 0, 0, 0).unwrap();
        let fractional = whole + Duration::milliseconds(5);
        assert_eq!(encode(&whole), "2025-01-20T00:00:00.000000Z");
        assert_eq!(encode(&whole).len(), encode(&fractional).len());
    }

    #[test]
    fn test_encoded_order_matches_time_order() {
        let earlier = Utc.with_ymd_and_hms(2025, 1, 20, 9, 59, 59).unwrap() + Duration::microseconds(999_999);
        let later = Utc.with_ymd_and_hms(2025, 1, 20, 10, 0, 0).unwrap();
        assert!(encode(&earlier) < encode(&later));
    }

    #[test]
    fn test_decode_roundtrip() {
        let ts = Utc.with_ymd_and_hms(2025, 6, 1, 12, 30, 0).unwrap() + Duration::microseconds(42);
        assert_eq!(decode(&encode(&ts)).unwrap(), ts);
    }

    #[test]
    fn test_decode_invalid() {
        assert!(matches!(decode("not a time"), Err(Error::InvalidTimestamp(_))));
    }
}
