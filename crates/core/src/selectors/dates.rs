//! Calendar helpers shared by the date selectors.
//!
//! Calendar questions ("today", "this week") are answered in the time zone of
//! the `now` the caller passes in, so the panel decides which zone counts as
//! local. Wall-clock record times are read in that same zone.

use chrono::{DateTime, Datelike, Days, NaiveDate, TimeZone, Utc};

use crate::types::Timestamp;

/// Calendar date of `ts` in the zone of `now`.
pub fn local_date<Tz: TimeZone>(ts: &Timestamp, now: &DateTime<Tz>) -> NaiveDate {
    ts.date_in(&now.timezone())
}

/// Whether `ts` falls on the same calendar day as `now`.
pub fn is_same_day<Tz: TimeZone>(ts: &Timestamp, now: &DateTime<Tz>) -> bool {
    local_date(ts, now) == now.date_naive()
}

/// First (Sunday) and last (Saturday) day of the week containing `now`.
pub fn week_range<Tz: TimeZone>(now: &DateTime<Tz>) -> (NaiveDate, NaiveDate) {
    let today = now.date_naive();
    let offset = u64::from(today.weekday().num_days_from_sunday());
    let start = today.checked_sub_days(Days::new(offset)).unwrap_or(today);
    let end = start.checked_add_days(Days::new(6)).unwrap_or(today);
    (start, end)
}

/// Whether `ts` falls between Sunday 00:00 and Saturday 23:59:59.999 of the
/// week containing `now`.
pub fn is_in_week<Tz: TimeZone>(ts: &Timestamp, now: &DateTime<Tz>) -> bool {
    let (start, end) = week_range(now);
    let date = local_date(ts, now);
    start <= date && date <= end
}

/// Whether `ts` is strictly earlier than `now`.
pub fn is_before<Tz: TimeZone>(ts: &Timestamp, now: &DateTime<Tz>) -> bool {
    ts.to_utc_in(&now.timezone()) < now.with_timezone(&Utc)
}

/// Inclusive range check with optional bounds. Wall-clock times are read in
/// the zone of whichever bound they are compared against.
pub fn in_range<Tz: TimeZone>(
    ts: &Timestamp,
    start: Option<&DateTime<Tz>>,
    end: Option<&DateTime<Tz>>,
) -> bool {
    start.is_none_or(|s| ts.to_utc_in(&s.timezone()) >= s.with_timezone(&Utc))
        && end.is_none_or(|e| ts.to_utc_in(&e.timezone()) <= e.with_timezone(&Utc))
}
