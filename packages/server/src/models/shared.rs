use serde::{Deserialize, Serialize};

use crate::service::ServiceError;

/// Validate a trimmed title (1-256 Unicode characters).
pub fn validate_title(title: &str) -> Result<(), ServiceError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 256 {
        return Err(ServiceError::InvalidInput(
            "Title must be 1-256 characters".into(),
        ));
    }
    Ok(())
}

/// Serde adapter for `std::time::Duration` as a time-span string.
///
/// The wire form is `[d.]hh:mm:ss[.fffffff]`, e.g. `"00:42:17"` or
/// `"1.02:00:00"`. The fraction is in 100ns ticks. A bare JSON number is
/// accepted on input and read as seconds.
pub mod timespan {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    const TICK_NANOS: u32 = 100;
    const TICKS_PER_SECOND: u32 = 10_000_000;

    pub fn format(duration: &Duration) -> String {
        let total = duration.as_secs();
        let days = total / 86_400;
        let hours = (total % 86_400) / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;
        let ticks = duration.subsec_nanos() / TICK_NANOS;

        let mut out = if days > 0 {
            format!("{days}.{hours:02}:{minutes:02}:{seconds:02}")
        } else {
            format!("{hours:02}:{minutes:02}:{seconds:02}")
        };
        if ticks > 0 {
            out.push_str(&format!(".{ticks:07}"));
        }
        out
    }

    pub fn parse(s: &str) -> Result<Duration, String> {
        let s = s.trim();
        let parts: Vec<&str> = s.split(':').collect();
        let [head, minutes, seconds] = parts.as_slice() else {
            return Err(format!("invalid time span '{s}': expected [d.]hh:mm:ss"));
        };

        let (days, hours) = match head.split_once('.') {
            Some((d, h)) => (parse_part(d, s)?, parse_part(h, s)?),
            None => (0, parse_part(head, s)?),
        };
        let minutes = parse_part(minutes, s)?;
        let (seconds, ticks) = match seconds.split_once('.') {
            Some((sec, frac)) => (parse_part(sec, s)?, parse_fraction(frac, s)?),
            None => (parse_part(seconds, s)?, 0),
        };

        if hours > 23 || minutes > 59 || seconds > 59 {
            return Err(format!("invalid time span '{s}': component out of range"));
        }

        let secs = days * 86_400 + hours * 3600 + minutes * 60 + seconds;
        Ok(Duration::new(secs, ticks * TICK_NANOS))
    }

    fn parse_part(part: &str, whole: &str) -> Result<u64, String> {
        if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("invalid time span '{whole}'"));
        }
        part.parse()
            .map_err(|_| format!("invalid time span '{whole}'"))
    }

    fn parse_fraction(frac: &str, whole: &str) -> Result<u32, String> {
        if frac.is_empty() || frac.len() > 7 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!("invalid time span '{whole}': bad fraction"));
        }
        let padded = format!("{frac:0<7}");
        let ticks: u32 = padded
            .parse()
            .map_err(|_| format!("invalid time span '{whole}'"))?;
        debug_assert!(ticks < TICKS_PER_SECOND);
        Ok(ticks)
    }

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(duration))
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Seconds(f64),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => parse(&s).map_err(serde::de::Error::custom),
            Raw::Seconds(secs) => Duration::try_from_secs_f64(secs)
                .map_err(|e| serde::de::Error::custom(format!("invalid duration: {e}"))),
        }
    }
}

/// Response body for a resolved object locator.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UrlResponse {
    #[schema(example = "http://127.0.0.1:3000/media/episodes/p1/e1/a1.mp3")]
    pub url: String,
}
