//! Record timestamps that may or may not carry a zone.
//!
//! The upstream API mixes RFC 3339 instants with bare wall-clock values such
//! as `2025-04-02T23:59:59`. A bare value names a reading on the local clock,
//! so it stays unresolved until a caller supplies the zone to read it in.

use std::fmt;

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::Serialize;

const WALL_CLOCK_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// A point in time from an upstream record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Timestamp {
    /// An instant with a known offset, normalized to UTC.
    Instant(DateTime<Utc>),
    /// A wall-clock reading with no zone.
    WallClock(NaiveDateTime),
}

impl Timestamp {
    /// Parse any of the timestamp shapes the upstream API emits.
    ///
    /// Accepts RFC 3339 strings, zoneless date-times (with `T` or a space)
    /// and plain dates, which read as local midnight.
    ///
    /// # Examples
    ///
    /// ```
    /// use cephas_core::Timestamp;
    ///
    /// assert!(matches!(Timestamp::parse("2025-04-02T08:00:00Z"), Some(Timestamp::Instant(_))));
    /// assert!(matches!(Timestamp::parse("2025-04-02T08:00:00"), Some(Timestamp::WallClock(_))));
    /// assert!(Timestamp::parse("02/04/2025").is_none());
    /// ```
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self::Instant(dt.with_timezone(&Utc)));
        }
        WALL_CLOCK_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .map(|date| date.and_time(NaiveTime::MIN))
            })
            .map(Self::WallClock)
    }

    /// This timestamp in `tz`. Wall-clock readings are taken as readings in
    /// `tz`; one that falls in a DST gap is read as UTC.
    pub fn in_zone<Tz: TimeZone>(&self, tz: &Tz) -> DateTime<Tz> {
        match self {
            Self::Instant(instant) => instant.with_timezone(tz),
            Self::WallClock(naive) => match tz.from_local_datetime(naive) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => dt,
                LocalResult::None => tz.from_utc_datetime(naive),
            },
        }
    }

    /// The calendar date of this timestamp as seen from `tz`.
    pub fn date_in<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        match self {
            Self::Instant(instant) => instant.with_timezone(tz).date_naive(),
            Self::WallClock(naive) => naive.date(),
        }
    }

    /// The instant this timestamp names when read in `tz`.
    pub fn to_utc_in<Tz: TimeZone>(&self, tz: &Tz) -> DateTime<Utc> {
        self.in_zone(tz).with_timezone(&Utc)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::Instant(instant)
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(naive: NaiveDateTime) -> Self {
        Self::WallClock(naive)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instant(instant) => write!(f, "{}", instant.to_rfc3339()),
            Self::WallClock(naive) => write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};

    #[test]
    fn test_parse_shapes() {
        assert!(matches!(
            Timestamp::parse("2025-04-02T23:59:59.123+02:00"),
            Some(Timestamp::Instant(_))
        ));
        assert!(matches!(
            Timestamp::parse("2025-04-02 23:59:59"),
            Some(Timestamp::WallClock(_))
        ));
        let date = Timestamp::parse("2025-04-02").unwrap();
        let april_2 = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
        assert_eq!(date.date_in(&Utc), april_2);
        assert!(Timestamp::parse("soon").is_none());
    }

    #[test]
    fn test_wall_clock_keeps_its_date_in_any_zone() {
        let ts = Timestamp::parse("2025-04-02T23:59:59").unwrap();
        let east = FixedOffset::east_opt(8 * 3600).unwrap();
        let west = FixedOffset::west_opt(5 * 3600).unwrap();
        let expected = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();
        assert_eq!(ts.date_in(&east), expected);
        assert_eq!(ts.date_in(&west), expected);
        assert_eq!(ts.in_zone(&east).hour(), 23);
    }

    #[test]
    fn test_instant_date_follows_zone() {
        let ts = Timestamp::parse("2025-04-01T20:00:00Z").unwrap();
        let east = FixedOffset::east_opt(8 * 3600).unwrap();
        let april_1 = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        assert_eq!(ts.date_in(&east), april_1.succ_opt().unwrap());
        assert_eq!(ts.date_in(&Utc), april_1);
    }

    #[test]
    fn test_wall_clock_resolves_against_zone() {
        let ts = Timestamp::parse("2025-04-02T10:00:00").unwrap();
        let east = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(
            ts.to_utc_in(&east),
            Timestamp::parse("2025-04-02T02:00:00Z")
                .unwrap()
                .to_utc_in(&Utc)
        );
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let instant = Timestamp::parse("2025-04-02T08:00:00Z").unwrap();
        let wall = Timestamp::parse("2025-04-02T08:00:00").unwrap();
        assert_eq!(
            serde_json::to_value(instant).unwrap(),
            serde_json::json!("2025-04-02T08:00:00Z")
        );
        assert_eq!(
            serde_json::to_value(wall).unwrap(),
            serde_json::json!("2025-04-02T08:00:00")
        );
    }
}
