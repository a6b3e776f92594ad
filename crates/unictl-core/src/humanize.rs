//! Human-readable byte, rate, duration, and time formatting helpers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// How points in time are rendered in tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum TimeStyle {
    /// `2024-06-15 10:30:00` (UTC)
    Absolute,
    /// `3h ago`
    #[default]
    Relative,
}

/// Format bytes into a compact human-readable string (e.g., "245M", "1.2G").
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn fmt_bytes(bytes: i64) -> String {
    let bytes = bytes.max(0);
    if bytes >= 1_000_000_000 {
        format!("{:.1}G", bytes as f64 / 1_000_000_000.0)
    } else if bytes >= 1_000_000 {
        format!("{}M", bytes / 1_000_000)
    } else if bytes >= 1_000 {
        format!("{}K", bytes / 1_000)
    } else {
        format!("{bytes}B")
    }
}

/// Format a rate in bytes/sec as "245.0 Mbps".
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn fmt_rate(bytes_per_sec: i64) -> String {
    let bits = bytes_per_sec.max(0).saturating_mul(8);
    if bits >= 1_000_000_000 {
        format!("{:.1} Gbps", bits as f64 / 1_000_000_000.0)
    } else if bits >= 1_000_000 {
        format!("{:.1} Mbps", bits as f64 / 1_000_000.0)
    } else if bits >= 1_000 {
        format!("{:.1} Kbps", bits as f64 / 1_000.0)
    } else {
        format!("{bits} bps")
    }
}

/// Format seconds into a compact human duration (e.g., "47d 3h", "4h 23m", "12m").
pub fn fmt_uptime(secs: i64) -> String {
    let secs = secs.max(0);
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Render `at` relative to `now` or as a fixed UTC timestamp.
///
/// `None` (the controller's zero value) renders as `never`.
pub fn fmt_time(at: Option<DateTime<Utc>>, style: TimeStyle, now: DateTime<Utc>) -> String {
    let Some(at) = at else {
        return "never".into();
    };
    match style {
        TimeStyle::Absolute => at.format("%Y-%m-%d %H:%M:%S").to_string(),
        TimeStyle::Relative => fmt_ago((now - at).num_seconds()),
    }
}

fn fmt_ago(secs: i64) -> String {
    if secs < 60 {
        // Clock skew between controller and host can make this negative.
        "just now".into()
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86400)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bytes_scale_by_thousands() {
        assert_eq!(fmt_bytes(999), "999B");
        assert_eq!(fmt_bytes(52_000), "52K");
        assert_eq!(fmt_bytes(245_000_000), "245M");
        assert_eq!(fmt_bytes(1_200_000_000), "1.2G");
        assert_eq!(fmt_bytes(-5), "0B");
    }

    #[test]
    fn rates_are_reported_in_bits() {
        assert_eq!(fmt_rate(0), "0 bps");
        assert_eq!(fmt_rate(125_000), "1.0 Mbps");
    }

    #[test]
    fn uptime_drops_minor_units() {
        assert_eq!(fmt_uptime(12 * 60), "12m");
        assert_eq!(fmt_uptime(4 * 3600 + 23 * 60), "4h 23m");
        assert_eq!(fmt_uptime(47 * 86400 + 3 * 3600 + 59), "47d 3h");
    }

    #[test]
    fn relative_and_absolute_times() {
        let now = DateTime::from_timestamp(1_718_447_400, 0).unwrap();
        let then = DateTime::from_timestamp(1_718_447_400 - 3 * 3600, 0);
        assert_eq!(fmt_time(then, TimeStyle::Relative, now), "3h ago");
        assert_eq!(
            fmt_time(then, TimeStyle::Absolute, now),
            "2024-06-15 07:30:00"
        );
        assert_eq!(fmt_time(Some(now), TimeStyle::Relative, now), "just now");
        assert_eq!(fmt_time(None, TimeStyle::Absolute, now), "never");
    }

    #[test]
    fn time_style_parses_case_insensitively() {
        assert_eq!("Absolute".parse::<TimeStyle>().unwrap(), TimeStyle::Absolute);
        assert_eq!(TimeStyle::Relative.to_string(), "relative");
    }
}
