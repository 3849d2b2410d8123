//! Time helpers — business timezone conversion and fire-time math
//!
//! All user-facing timestamps are rendered in the business timezone
//! (default Asia/Tashkent) using one display format. The scheduler's
//! next-fire computations work on naive local time in that zone.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;

/// Display format used in the record store and in chat messages.
pub const DISPLAY_FORMAT: &str = "%d.%m.%Y %H:%M";

/// Accepted formats when parsing creation timestamps back out of the store.
/// Rows that match none of them are skipped by range filters and scans.
const ACCEPTED_FORMATS: [&str; 2] = ["%d.%m.%Y %H:%M", "%Y-%m-%d %H:%M:%S"];

/// Current time in the business timezone.
pub fn now_local(tz: Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(&tz)
}

/// Current time rendered for storage/display.
pub fn now_display(tz: Tz) -> String {
    now_local(tz).format(DISPLAY_FORMAT).to_string()
}

/// Timestamp-derived fallback complaint id suffix (`%y%m%d%H%M%S`).
pub fn fallback_id_suffix(tz: Tz) -> String {
    now_local(tz).format("%y%m%d%H%M%S").to_string()
}

/// Parse a stored date cell under the accepted formats.
///
/// Date-only values (`%Y-%m-%d`) are accepted as midnight.
pub fn parse_stored_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for fmt in ACCEPTED_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(|d| {
        d.and_time(NaiveTime::MIN)
    })
}

/// Next Monday 09:00 strictly after `now` (same-day 09:00 counts only if
/// still ahead).
pub fn next_weekly_fire(now: NaiveDateTime) -> NaiveDateTime {
    let nine = NaiveTime::from_hms_opt(9, 0, 0).expect("valid time");
    let mut days_ahead = (7 - now.weekday().num_days_from_monday()) % 7;
    if days_ahead == 0 && now.time() >= nine {
        days_ahead = 7;
    }
    (now + Duration::days(days_ahead as i64)).date().and_time(nine)
}

/// First day of the next month at 09:00.
pub fn next_monthly_fire(now: NaiveDateTime) -> NaiveDateTime {
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .expect("first of month is always valid")
        .and_hms_opt(9, 0, 0)
        .expect("valid time")
}

/// Seconds from `now` until `fire`, clamped at zero. Sub-second remainders
/// round up, so a sleep of this length never ends before `fire`.
pub fn seconds_until(now: NaiveDateTime, fire: NaiveDateTime) -> u64 {
    let left = fire - now;
    if left <= Duration::zero() {
        return 0;
    }
    let whole = left.num_seconds();
    if left > Duration::seconds(whole) {
        (whole + 1) as u64
    } else {
        whole as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn parses_display_and_iso_formats() {
        assert_eq!(
            parse_stored_date("01.02.2025 10:30"),
            Some(dt(2025, 2, 1, 10, 30))
        );
        assert_eq!(
            parse_stored_date("2025-02-01 10:30:00"),
            Some(dt(2025, 2, 1, 10, 30))
        );
        assert_eq!(parse_stored_date("2025-02-01"), Some(dt(2025, 2, 1, 0, 0)));
        assert_eq!(parse_stored_date("yesterday"), None);
        assert_eq!(parse_stored_date(""), None);
    }

    #[test]
    fn weekly_fire_is_next_monday_nine() {
        // Wednesday → following Monday
        assert_eq!(next_weekly_fire(dt(2025, 8, 27, 12, 0)), dt(2025, 9, 1, 9, 0));
        // Monday before 09:00 → same day
        assert_eq!(next_weekly_fire(dt(2025, 9, 1, 7, 0)), dt(2025, 9, 1, 9, 0));
        // Monday at 09:00 sharp → a week later
        assert_eq!(next_weekly_fire(dt(2025, 9, 1, 9, 0)), dt(2025, 9, 8, 9, 0));
    }

    #[test]
    fn monthly_fire_is_first_of_next_month() {
        assert_eq!(next_monthly_fire(dt(2025, 8, 31, 23, 0)), dt(2025, 9, 1, 9, 0));
        assert_eq!(next_monthly_fire(dt(2025, 12, 15, 9, 0)), dt(2026, 1, 1, 9, 0));
        // even on the 1st before 09:00, the fire is next month (prior report
        // already covered this boundary)
        assert_eq!(next_monthly_fire(dt(2025, 9, 1, 8, 0)), dt(2025, 10, 1, 9, 0));
    }

    #[test]
    fn seconds_until_never_negative() {
        assert_eq!(seconds_until(dt(2025, 1, 2, 0, 0), dt(2025, 1, 1, 0, 0)), 0);
        assert_eq!(
            seconds_until(dt(2025, 1, 1, 0, 0), dt(2025, 1, 1, 1, 0)),
            3600
        );
    }

    #[test]
    fn seconds_until_rounds_sub_second_remainders_up() {
        // a truncated sleep here would wake before the fire time and the
        // report loop would compute the same fire twice
        let fire = dt(2025, 9, 1, 9, 0);
        let just_before = NaiveDate::from_ymd_opt(2025, 9, 1)
            .unwrap()
            .and_hms_milli_opt(8, 59, 59, 500)
            .unwrap();
        assert_eq!(seconds_until(just_before, fire), 1);
        assert_eq!(seconds_until(fire, fire), 0);
    }
}
