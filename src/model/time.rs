//! ADM timecodes (`hh:mm:ss.zzzzz`).

use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::Error;

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// A point in (or span of) programme time with nanosecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Time {
    nanos: i64,
}

impl Time {
    pub const ZERO: Time = Time { nanos: 0 };

    pub const fn from_nanos(nanos: i64) -> Self {
        Self { nanos }
    }

    pub const fn from_millis(millis: i64) -> Self {
        Self { nanos: millis * 1_000_000 }
    }

    pub const fn from_secs(secs: i64) -> Self {
        Self { nanos: secs * NANOS_PER_SECOND }
    }

    pub const fn as_nanos(&self) -> i64 {
        self.nanos
    }

    pub fn as_delta(&self) -> TimeDelta {
        TimeDelta::nanoseconds(self.nanos)
    }
}

impl From<TimeDelta> for Time {
    /// Deltas beyond ±292 years saturate.
    fn from(delta: TimeDelta) -> Self {
        Self { nanos: delta.num_nanoseconds().unwrap_or(if delta < TimeDelta::zero() { i64::MIN } else { i64::MAX }) }
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.nanos < 0 { "-" } else { "" };
        let total = self.nanos.unsigned_abs();
        let secs = total / NANOS_PER_SECOND as u64;
        let frac = (total % NANOS_PER_SECOND as u64) / 10_000;
        write!(
            f,
            "{sign}{:02}:{:02}:{:02}.{:05}",
            secs / 3600,
            (secs / 60) % 60,
            secs % 60,
            frac
        )
    }
}

impl FromStr for Time {
    type Err = Error;

    /// Parses `hh:mm:ss` with an optional fraction of up to nine digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| Error::Parse { input: s.to_owned(), reason };
        let (negative, body) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };

        let mut parts = body.splitn(3, ':');
        let (Some(h), Some(m), Some(rest)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid("expected hh:mm:ss.fffff"));
        };
        let (sec, frac) = rest.split_once('.').unwrap_or((rest, ""));
        if frac.len() > 9 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("bad fractional seconds"));
        }

        let number = |field: &str| {
            if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("non-numeric time field"));
            }
            field.parse::<i64>().map_err(|_| invalid("time out of range"))
        };
        let (hours, minutes, seconds) = (number(h)?, number(m)?, number(sec)?);
        if minutes >= 60 || seconds >= 60 {
            return Err(invalid("minutes and seconds must be below 60"));
        }
        let frac_nanos = if frac.is_empty() {
            0
        } else {
            number(frac)? * 10i64.pow(9 - frac.len() as u32)
        };

        let nanos = hours
            .checked_mul(3600)
            .and_then(|secs| secs.checked_add(minutes * 60 + seconds))
            .and_then(|secs| secs.checked_mul(NANOS_PER_SECOND))
            .and_then(|nanos| nanos.checked_add(frac_nanos))
            .ok_or_else(|| invalid("time out of range"))?;
        Ok(Self { nanos: if negative { -nanos } else { nanos } })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timecode() {
        assert_eq!(Time::ZERO.to_string(), "00:00:00.00000");
        assert_eq!(Time::from_secs(3723).to_string(), "01:02:03.00000");
        assert_eq!(Time::from_millis(10_250).to_string(), "00:00:10.25000");
    }

    #[test]
    fn test_parse_timecode() {
        assert_eq!("00:00:10.00000".parse::<Time>().unwrap(), Time::from_secs(10));
        assert_eq!("01:00:00".parse::<Time>().unwrap(), Time::from_secs(3600));
        assert_eq!("00:00:00.5".parse::<Time>().unwrap(), Time::from_millis(500));
        assert!("00:61:00".parse::<Time>().is_err());
        assert!("garbage".parse::<Time>().is_err());
        assert_eq!("-00:00:01".parse::<Time>().unwrap(), Time::from_secs(-1));
    }

    #[test]
    fn test_parse_rejects_signed_fields() {
        for input in ["00:-5:00", "+1:00:00", "00:00:-1", "-:00:00"] {
            assert!(
                matches!(input.parse::<Time>(), Err(Error::Parse { reason: "non-numeric time field", .. })),
                "{input} should not parse"
            );
        }
    }

    #[test]
    fn test_parse_rejects_overflow() {
        for input in ["9999999999999:00:00", "99999999999999999999:00:00", "2562047:47:17"] {
            assert!(
                matches!(input.parse::<Time>(), Err(Error::Parse { reason: "time out of range", .. })),
                "{input} should be out of range"
            );
        }
        assert!("2562047:47:16".parse::<Time>().is_ok());
    }

    #[test]
    fn test_delta_conversion() {
        let t = Time::from_millis(1500);
        assert_eq!(t.as_delta(), TimeDelta::milliseconds(1500));
        assert_eq!(Time::from(TimeDelta::seconds(2)), Time::from_secs(2));
    }
}
