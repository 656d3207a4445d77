// convert.rs
// Vendor field normalization: binary floats to fixed-point decimals,
// venue-local times to UTC, sentinel handling.

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, TimeZone, Timelike, Utc};
use rust_decimal::Decimal;

use crate::errors::ConvertError;

/// Scale at which vendor floats are pinned after conversion.
const DECIMAL_SCALE: u32 = 8;

/// The venue reports naive local times in US Eastern standard time (UTC-5,
/// no DST adjustment).
const VENUE_UTC_OFFSET_HOURS: i64 = -5;

/// Convert a vendor float to a fixed-point decimal.
///
/// The source value is a binary float, so the conversion is lossy by
/// construction; the result is rounded half-to-even at 8 decimal places.
pub fn to_decimal(value: f64) -> Result<Decimal, ConvertError> {
    Decimal::from_f64_retain(value)
        .map(|d| d.round_dp(DECIMAL_SCALE))
        .ok_or(ConvertError::NonFiniteDecimal(value))
}

/// Interpret a venue-local timestamp and shift it to UTC.
pub fn venue_time_to_utc(time: NaiveDateTime) -> DateTime<Utc> {
    Utc.from_utc_datetime(&(time - Duration::hours(VENUE_UTC_OFFSET_HOURS)))
}

/// The OLE-automation zero date (1899-12-30 00:00:00), which the vendor
/// sends for instruments without an expiry.
pub fn is_zero_date(time: NaiveDateTime) -> bool {
    (time.year(), time.month(), time.day()) == (1899, 12, 30)
        && time.num_seconds_from_midnight() == 0
        && time.nanosecond() == 0
}

/// Map a vendor expiry to the normalized optional form.
pub fn expiry_from_vendor(expiry_date: NaiveDateTime) -> Option<DateTime<Utc>> {
    if is_zero_date(expiry_date) {
        None
    } else {
        Some(venue_time_to_utc(expiry_date))
    }
}

/// Vendor trade ids are textual; the normalized stream carries them numeric.
pub fn parse_trade_id(raw: &str) -> Result<i64, ConvertError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ConvertError::InvalidTradeId(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn naive(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_to_decimal_rounds_float_noise() {
        assert_eq!(to_decimal(0.1).unwrap(), dec!(0.1));
        assert_eq!(to_decimal(10.05).unwrap(), dec!(10.05));
        assert_eq!(to_decimal(0.0).unwrap(), dec!(0));
    }

    #[test]
    fn test_to_decimal_rejects_non_finite() {
        assert!(to_decimal(f64::NAN).is_err());
        assert!(to_decimal(f64::INFINITY).is_err());
    }

    #[test]
    fn test_venue_time_shifts_to_utc() {
        let local = naive(2024, 3, 1, 10, 30, 0);
        let utc = venue_time_to_utc(local);
        assert_eq!(utc, Utc.with_ymd_and_hms(2024, 3, 1, 15, 30, 0).unwrap());
    }

    #[test]
    fn test_zero_date_sentinel() {
        assert!(is_zero_date(naive(1899, 12, 30, 0, 0, 0)));
        assert!(!is_zero_date(naive(1899, 12, 30, 0, 0, 1)));
        assert!(!is_zero_date(naive(2025, 6, 20, 0, 0, 0)));
    }

    #[test]
    fn test_expiry_mapping() {
        assert_eq!(expiry_from_vendor(naive(1899, 12, 30, 0, 0, 0)), None);
        assert!(expiry_from_vendor(naive(2025, 6, 20, 0, 0, 0)).is_some());
    }

    #[test]
    fn test_parse_trade_id() {
        assert_eq!(parse_trade_id("9001").unwrap(), 9001);
        assert_eq!(parse_trade_id(" 42 ").unwrap(), 42);
        assert!(parse_trade_id("abc").is_err());
        assert!(parse_trade_id("").is_err());
    }
}
