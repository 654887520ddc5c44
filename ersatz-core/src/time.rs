//! Gregorian decomposition of a wall-clock second (spec.md §3, "BrokenDownTime").
//!
//! Two lenses are produced from the same scalar `wall_second`: UTC (for
//! WWVB) and local-or-JST (for JJY). Conversion happens once per
//! second-advance, never on the sample-synthesis hot path (spec.md §5).

use chrono::{Datelike, Duration, Local, NaiveDate, TimeZone, Timelike, Utc};

/// The Gregorian fields every JJY/WWVB bit function reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokenDownTime {
    /// Full year, e.g. 2025.
    pub year: i32,
    /// Year of century, 0-99.
    pub year_of_century: u32,
    /// Day of year, 1-366 (source's `tm_yday` read as `tm_yday + 1`).
    pub day_of_year: u32,
    pub hour: u32,
    pub minute: u32,
    /// 0-60; 60 is reserved for a leap second that is never actually emitted.
    pub second: u32,
    /// 0 = Sunday .. 6 = Saturday.
    pub weekday: u32,
    /// DST in effect at this instant, local reckoning. Always `false` under
    /// the UTC and JST lenses (JST observes no DST).
    pub dst: bool,
}

impl BrokenDownTime {
    /// Decomposes `wall_second` (seconds since the Unix epoch) as UTC.
    pub fn from_utc(wall_second: i64) -> Self {
        let dt = Utc.timestamp_opt(wall_second, 0).single().expect("in-range unix second");
        Self::from_chrono(dt.year(), dt.ordinal(), dt.hour(), dt.minute(), dt.second(), dt.weekday().num_days_from_sunday(), false)
    }

    /// Decomposes `wall_second` as JST (UTC + 9h, no DST).
    pub fn from_jst(wall_second: i64) -> Self {
        Self::from_utc(wall_second + 9 * 3600)
    }

    /// Decomposes `wall_second` in the host's local timezone, including its
    /// DST status at that instant.
    pub fn from_local(wall_second: i64) -> Self {
        let utc = Utc.timestamp_opt(wall_second, 0).single().expect("in-range unix second");
        let local = Local.from_utc_datetime(&utc.naive_utc());
        let dst = local_offset_is_dst(local.naive_local());
        Self::from_chrono(
            local.year(),
            local.ordinal(),
            local.hour(),
            local.minute(),
            local.second(),
            local.weekday().num_days_from_sunday(),
            dst,
        )
    }

    fn from_chrono(
        year: i32,
        day_of_year: u32,
        hour: u32,
        minute: u32,
        second: u32,
        weekday: u32,
        dst: bool,
    ) -> Self {
        BrokenDownTime {
            year,
            year_of_century: (year.rem_euclid(100)) as u32,
            day_of_year,
            hour,
            minute,
            second,
            weekday,
            dst,
        }
    }

    /// True iff `year` is a Gregorian leap year (spec.md §4.B, WWVB bit 55).
    pub fn is_leap_year(&self) -> bool {
        is_leap_year(self.year)
    }
}

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && ((year % 100 == 0) == (year % 400 == 0))
}

/// Counts full UTC minutes from the most recent year that is a multiple of
/// 100, up to `t` (spec.md §4.D, `minute_of_century`).
pub fn minute_of_century(t: &BrokenDownTime) -> u64 {
    const MINUTES_PER_DAY: u64 = 1440;
    let first_year = t.year - t.year.rem_euclid(100);
    let mut total = 0u64;
    for y in first_year..t.year {
        total += if is_leap_year(y) { 366 } else { 365 } * MINUTES_PER_DAY;
    }
    total += (t.day_of_year as u64 - 1) * MINUTES_PER_DAY;
    total += t.hour as u64 * 60;
    total += t.minute as u64;
    total
}

/// Whether DST is in effect for the local wall-clock reading `naive` (a
/// `chrono::Local`-interpreted instant), determined by comparing its UTC
/// offset against the offset six months away at the same wall-clock reading.
/// DST always means "clocks set ahead", i.e. a larger UTC offset, in every
/// real-world rule set including the Southern Hemisphere's, so the larger of
/// the two candidate offsets is the DST one; equal offsets mean no DST is
/// observed at all.
fn local_offset_is_dst(naive: chrono::NaiveDateTime) -> bool {
    use chrono::Offset;
    let here = match Local.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => dt,
        chrono::LocalResult::Ambiguous(dt, _) => dt,
        chrono::LocalResult::None => return false,
    };
    let shifted_naive = naive + Duration::days(182);
    let there = match Local.from_local_datetime(&shifted_naive) {
        chrono::LocalResult::Single(dt) => dt,
        chrono::LocalResult::Ambiguous(dt, _) => dt,
        chrono::LocalResult::None => return false,
    };
    here.offset().fix().local_minus_utc() > there.offset().fix().local_minus_utc()
}

/// Whether DST is in effect at local 23:59:59 or 00:00:00 on the UTC
/// calendar date underlying `wall_second` (spec.md §4.B, WWVB bits 57/58).
///
/// `hms` is `(23, 59, 59)` for bit 57 (end-of-day) or `(0, 0, 0)` for bit 58
/// (beginning-of-day).
pub fn local_dst_at_utc_day_boundary(wall_second: i64, hms: (u32, u32, u32)) -> bool {
    let utc_today = Utc
        .timestamp_opt(wall_second, 0)
        .single()
        .expect("in-range unix second")
        .date_naive();
    let boundary = local_boundary_naive(utc_today, hms);
    local_offset_is_dst(boundary)
}

fn local_boundary_naive(date: NaiveDate, (h, m, s): (u32, u32, u32)) -> chrono::NaiveDateTime {
    date.and_hms_opt(h, m, s).expect("valid time-of-day")
}
