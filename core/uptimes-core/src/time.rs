//! Wall-clock timestamps and their storage form.
//!
//! A [`Timestamp`] is a real number of seconds since the Unix epoch. The
//! database stores it as a JSON float. `serde_json` writes the shortest
//! representation of the `f64` and, with `float_roundtrip` enabled, parses
//! it back to the identical bits, so [`encode`] and [`decode`] are lossless.
//!
//! Session keys are derived from the boot timestamp with seven decimal
//! places. Two boots inside the same second still get distinct keys as long
//! as they are at least 100ns apart.

use std::fmt;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

/// Decimal places used when rendering a boot time into a [`SessionKey`].
pub const KEY_PRECISION: usize = 7;

/// Seconds since the Unix epoch, with sub-second precision.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(f64);

impl Timestamp {
    pub const fn from_secs_f64(secs: f64) -> Self {
        Timestamp(secs)
    }

    /// Whole-second timestamps, as reported for OS process start times.
    pub fn from_unix_secs(secs: u64) -> Self {
        Timestamp(secs as f64)
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        let whole = dt.timestamp() as f64;
        let fraction = f64::from(dt.timestamp_subsec_nanos()) / 1_000_000_000.0;
        Timestamp(whole + fraction)
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0
    }

    /// Seconds elapsed from `earlier` to `self`. Negative when `earlier` is later.
    pub fn seconds_since(self, earlier: Timestamp) -> f64 {
        self.0 - earlier.0
    }

    pub fn to_utc(self) -> Option<DateTime<Utc>> {
        if !self.0.is_finite() {
            return None;
        }
        let secs = self.0.floor();
        let nanos = (((self.0 - secs) * 1_000_000_000.0).round() as u32).min(999_999_999);
        DateTime::from_timestamp(secs as i64, nanos)
    }

    pub fn to_local(self) -> Option<DateTime<Local>> {
        self.to_utc().map(|dt| dt.with_timezone(&Local))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.prec$}", self.0, prec = KEY_PRECISION)
    }
}

/// Current wall-clock time.
pub fn now() -> Timestamp {
    Timestamp::from_datetime(Utc::now())
}

/// Storage form of a timestamp.
pub fn encode(timestamp: Timestamp) -> f64 {
    timestamp.0
}

/// Inverse of [`encode`].
pub fn decode(value: f64) -> Timestamp {
    Timestamp(value)
}

/// Stable identifier for one process lifetime, derived from its boot time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionKey(String);

impl SessionKey {
    pub fn from_boot(boot_time: Timestamp) -> Self {
        SessionKey(boot_time.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_key_has_seven_decimals() {
        let key = SessionKey::from_boot(Timestamp::from_secs_f64(1_760_601_600.25));
        assert_eq!(key.as_str(), "1760601600.2500000");
    }

    #[test]
    fn test_boots_within_same_second_get_distinct_keys() {
        let a = SessionKey::from_boot(Timestamp::from_secs_f64(1_760_601_600.1234));
        let b = SessionKey::from_boot(Timestamp::from_secs_f64(1_760_601_600.1244));
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_is_deterministic() {
        let boot = Timestamp::from_secs_f64(1_760_601_600.987_654_3);
        assert_eq!(SessionKey::from_boot(boot), SessionKey::from_boot(boot));
    }

    #[test]
    fn test_encode_decode_round_trip_through_json() {
        let original = Timestamp::from_secs_f64(1_760_601_600.123_456_7);
        let json = serde_json::to_string(&encode(original)).unwrap();
        let restored = decode(serde_json::from_str::<f64>(&json).unwrap());
        assert_eq!(original, restored);
    }

    #[test]
    fn test_from_datetime_keeps_subsecond_fraction() {
        let dt = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap()
            + chrono::Duration::milliseconds(500);
        let ts = Timestamp::from_datetime(dt);
        assert!((ts.as_secs_f64() - (dt.timestamp() as f64 + 0.5)).abs() < 1e-6);
    }

    #[test]
    fn test_to_utc_round_trips_whole_seconds() {
        let dt = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        let ts = Timestamp::from_unix_secs(dt.timestamp() as u64);
        assert_eq!(ts.to_utc(), Some(dt));
    }

    #[test]
    fn test_to_utc_rejects_non_finite() {
        assert!(Timestamp::from_secs_f64(f64::NAN).to_utc().is_none());
        assert!(Timestamp::from_secs_f64(f64::INFINITY).to_local().is_none());
    }

    #[test]
    fn test_now_is_after_2020() {
        assert!(now().as_secs_f64() > 1_577_836_800.0);
    }
}
