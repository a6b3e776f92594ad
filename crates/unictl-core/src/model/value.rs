// ── Value types ──
//
// Small wire-facing types shared by every record: MAC and IP addresses
// with their ordering rules, integers the controller sends either as
// numbers or as strings, and the two epoch encodings it uses.

use std::cmp::Ordering;
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::humanize::{TimeStyle, fmt_time};

// ── Mac ─────────────────────────────────────────────────────────────

/// MAC address, normalized to lowercase colon-separated format (aa:bb:cc:dd:ee:ff).
///
/// Ordering is byte-wise over the normalized text.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Mac(String);

impl Mac {
    /// Create a normalized MAC address from any common format.
    /// Accepts colon-separated, dash-separated, upper or lower case.
    pub fn new(raw: impl AsRef<str>) -> Self {
        let normalized = raw.as_ref().trim().to_lowercase().replace('-', ":");
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Mac {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Mac {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl<'de> Deserialize<'de> for Mac {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(Self::new(raw.unwrap_or_default()))
    }
}

// ── Ip ──────────────────────────────────────────────────────────────

/// An optional IP address as reported by the controller.
///
/// Ordering rules (see [`Ip::less`]): an absent address sorts after every
/// present one; IPv4 sorts before IPv6; equal-length addresses compare
/// byte by byte. Text that does not parse counts as the shortest form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Ip(Option<String>);

impl Ip {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self(None)
        } else {
            Self(Some(trimmed.to_owned()))
        }
    }

    pub fn absent() -> Self {
        Self(None)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    /// 4 bytes for IPv4, 16 for IPv6, empty when the text does not parse.
    pub fn octets(&self) -> Vec<u8> {
        match self.0.as_deref().map(IpAddr::from_str) {
            Some(Ok(IpAddr::V4(v4))) => v4.octets().to_vec(),
            Some(Ok(IpAddr::V6(v6))) => v6.octets().to_vec(),
            _ => Vec::new(),
        }
    }

    /// Strict "sorts before" relation.
    pub fn less(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(_), Some(_)) => {
                let (a, b) = (self.octets(), other.octets());
                if a.len() == b.len() {
                    a < b
                } else {
                    a.len() < b.len()
                }
            }
        }
    }

    /// Three-way comparison derived from [`Ip::less`].
    pub fn compare(&self, other: &Self) -> Ordering {
        if self.less(other) {
            Ordering::Less
        } else if other.less(self) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl fmt::Display for Ip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_deref().unwrap_or(""))
    }
}

impl<'de> Deserialize<'de> for Ip {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map_or_else(Self::absent, Self::new))
    }
}

// ── Number ──────────────────────────────────────────────────────────

/// An integer the controller sends either as a JSON number or a string.
///
/// Empty strings and `null` decode as 0; fractional values truncate
/// toward zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Number(pub i64);

impl Number {
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self(n)
    }
}

struct NumberVisitor;

impl Visitor<'_> for NumberVisitor {
    type Value = Number;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or a string holding one")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Number, E> {
        Ok(Number(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Number, E> {
        i64::try_from(v)
            .map(Number)
            .map_err(|_| E::custom(format!("integer {v} out of range")))
    }

    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Number, E> {
        if v.is_finite() {
            Ok(Number(v.trunc() as i64))
        } else {
            Err(E::custom(format!("non-finite number {v}")))
        }
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Number, E> {
        let v = v.trim();
        if v.is_empty() {
            return Ok(Number(0));
        }
        if let Ok(n) = v.parse::<i64>() {
            return Ok(Number(n));
        }
        match v.parse::<f64>() {
            Ok(f) => self.visit_f64(f),
            Err(_) => Err(E::invalid_value(de::Unexpected::Str(v), &self)),
        }
    }

    fn visit_unit<E: de::Error>(self) -> Result<Number, E> {
        Ok(Number(0))
    }
}

impl<'de> Deserialize<'de> for Number {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumberVisitor)
    }
}

// ── Duration / Timestamp ────────────────────────────────────────────

/// A point in time as whole seconds since the Unix epoch
/// (`first_seen`, `last_seen`). Zero means "never".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "Number", into = "i64")]
pub struct Duration(pub i64);

impl Duration {
    pub fn datetime(self) -> Option<DateTime<Utc>> {
        if self.0 == 0 {
            return None;
        }
        DateTime::from_timestamp(self.0, 0)
    }

    pub fn render(self, style: TimeStyle, now: DateTime<Utc>) -> String {
        fmt_time(self.datetime(), style, now)
    }
}

impl From<Number> for Duration {
    fn from(n: Number) -> Self {
        Self(n.0)
    }
}

impl From<Duration> for i64 {
    fn from(d: Duration) -> Self {
        d.0
    }
}

/// A point in time as milliseconds since the Unix epoch (event `time`).
/// Zero means "unknown".
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(from = "Number", into = "i64")]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn datetime(self) -> Option<DateTime<Utc>> {
        if self.0 == 0 {
            return None;
        }
        DateTime::from_timestamp_millis(self.0)
    }

    pub fn render(self, style: TimeStyle, now: DateTime<Utc>) -> String {
        fmt_time(self.datetime(), style, now)
    }
}

impl From<Number> for Timestamp {
    fn from(n: Number) -> Self {
        Self(n.0)
    }
}

impl From<Timestamp> for i64 {
    fn from(t: Timestamp) -> Self {
        t.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn ip(s: &str) -> Ip {
        Ip::new(s)
    }

    #[test]
    fn mac_address_normalizes_dashes_and_case() {
        let mac = Mac::new("AA-BB-CC-DD-EE-FF");
        assert_eq!(mac.as_str(), "aa:bb:cc:dd:ee:ff");
        let mac: Mac = serde_json::from_str("\"AA:BB:CC:DD:EE:FF\"").unwrap();
        assert_eq!(mac.to_string(), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn mac_null_decodes_empty() {
        let mac: Mac = serde_json::from_str("null").unwrap();
        assert!(mac.is_empty());
    }

    #[test]
    fn ip_compares_numerically_not_textually() {
        assert!(ip("10.0.0.2").less(&ip("10.0.0.10")));
        assert!(!ip("10.0.0.10").less(&ip("10.0.0.2")));
        assert!(!ip("10.0.0.1").less(&ip("10.0.0.1")));
    }

    #[test]
    fn ip_absent_sorts_last() {
        let absent = Ip::absent();
        for present in ["10.0.0.1", "fe80::1", "not-an-ip"] {
            assert!(ip(present).less(&absent));
            assert!(!absent.less(&ip(present)));
        }
        assert!(!absent.less(&Ip::absent()));
        assert_eq!(Ip::new("  "), Ip::absent());
    }

    #[test]
    fn ip_shorter_form_is_less() {
        assert!(ip("255.255.255.255").less(&ip("::1")));
        assert!(!ip("::1").less(&ip("1.1.1.1")));
        assert!(ip("bogus").less(&ip("0.0.0.0")));
    }

    #[test]
    fn ip_less_is_antisymmetric() {
        let samples = [
            Ip::absent(),
            ip("10.0.0.1"),
            ip("10.0.0.2"),
            ip("192.168.1.1"),
            ip("::1"),
            ip("fe80::1"),
            ip("garbage"),
        ];
        for x in &samples {
            for y in &samples {
                assert!(!(x.less(y) && y.less(x)), "{x:?} vs {y:?}");
            }
        }
    }

    #[test]
    fn number_accepts_number_or_string() {
        let a: Number = serde_json::from_str("42").unwrap();
        let b: Number = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get(), 42);
    }

    #[test]
    fn number_lenient_forms() {
        assert_eq!(serde_json::from_str::<Number>("\"\"").unwrap(), Number(0));
        assert_eq!(serde_json::from_str::<Number>("12.9").unwrap(), Number(12));
        assert_eq!(serde_json::from_str::<Number>("\" -7 \"").unwrap(), Number(-7));
        assert_eq!(serde_json::from_str::<Number>("null").unwrap(), Number(0));
        assert!(serde_json::from_str::<Number>("\"abc\"").is_err());
        assert!(serde_json::from_str::<Number>("true").is_err());
    }

    #[test]
    fn epoch_types_decode_from_strings_and_render() {
        let d: Duration = serde_json::from_str("\"1718447400\"").unwrap();
        let t: Timestamp = serde_json::from_str("1718447400000").unwrap();
        assert_eq!(d.datetime(), t.datetime());

        let now = DateTime::from_timestamp(1_718_447_400 + 120, 0).unwrap();
        assert_eq!(d.render(TimeStyle::Relative, now), "2m ago");
        assert_eq!(
            t.render(TimeStyle::Absolute, now),
            "2024-06-15 10:30:00"
        );
        assert_eq!(Duration(0).render(TimeStyle::Relative, now), "never");
        assert_eq!(serde_json::to_string(&d).unwrap(), "1718447400");
    }
}
