//! Clock and calendar arithmetic behind the live widget previews.
//!
//! Everything here is a pure function of its inputs. Malformed user input
//! never panics: clock helpers treat an unparsable string as "no progress",
//! and life statistics fall back to [`LifeStats::neutral`].

use crate::widgets::{ClockMode, DisplayFormat, DisplayUnit, ScheduleItem};
use chrono::{DateTime, Local, NaiveDate, Timelike, Utc};

pub const MINUTES_PER_DAY: i32 = 1440;
const MS_PER_DAY: f64 = 86_400_000.0;
const DAYS_PER_YEAR: f64 = 365.25;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TimeError {
    #[error("invalid clock time (use HH:MM): {0}")]
    InvalidClock(String),
    #[error("invalid date (use YYYY-MM-DD): {0}")]
    InvalidDate(String),
    #[error("lifespan must be a positive number of years, got {0}")]
    InvalidLifespan(u32),
}

/// Minutes since midnight for an `"HH:MM"` string. Range is not checked, so
/// `"24:00"` yields 1440. Values that do not fit in an `i32` are `None`.
pub fn parse_clock_minutes(time: &str) -> Option<i32> {
    let (h, m) = time.trim().split_once(':')?;
    let hours: i32 = h.trim().parse().ok()?;
    let minutes: i32 = m.trim().parse().ok()?;
    hours.checked_mul(60)?.checked_add(minutes)
}

pub fn try_clock_minutes(time: &str) -> Result<i32, TimeError> {
    parse_clock_minutes(time).ok_or_else(|| TimeError::InvalidClock(time.to_string()))
}

/// Zero-padded `"HH:MM"`; negative input is treated as midnight.
pub fn format_clock(minutes: i32) -> String {
    let minutes = minutes.max(0);
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Steps a clock string by `delta` minutes, pinned to 00:00..=24:00.
pub fn adjust_clock(time: &str, delta: i32) -> String {
    let current = parse_clock_minutes(time).unwrap_or(0);
    format_clock(current.saturating_add(delta).clamp(0, MINUTES_PER_DAY))
}

/// Local wall-clock minutes since midnight.
pub fn current_minutes() -> i32 {
    let now = Local::now();
    (now.hour() * 60 + now.minute()) as i32
}

/// Fraction of the `start..end` window that has passed at `now_minutes`.
///
/// Zero-length or inverted windows report 0, as does any unparsable bound.
/// Inside the window progress grows monotonically; outside it is pinned at
/// 0 or 1.
pub fn compute_range_progress(start_time: &str, end_time: &str, now_minutes: i32) -> f64 {
    let (Some(start), Some(end)) = (
        parse_clock_minutes(start_time),
        parse_clock_minutes(end_time),
    ) else {
        tracing::debug!(start_time, end_time, "unparsable gauge range, progress 0");
        return 0.0;
    };
    let total = i64::from(end) - i64::from(start);
    if total <= 0 {
        return 0.0;
    }
    let elapsed = (i64::from(now_minutes) - i64::from(start)).clamp(0, total);
    elapsed as f64 / total as f64
}

/// Human label for a duration in minutes: `"45m"`, `"2h"`, `"2h 30m"`.
pub fn minutes_label(total_minutes: i64) -> String {
    let total_minutes = total_minutes.max(0);
    let h = total_minutes / 60;
    let m = total_minutes % 60;
    if h == 0 {
        format!("{}m", m)
    } else if m == 0 {
        format!("{}h", h)
    } else {
        format!("{}h {}m", h, m)
    }
}

/// Text shown inside a time gauge.
pub fn format_gauge(
    progress: f64,
    display_format: DisplayFormat,
    start_time: &str,
    end_time: &str,
) -> String {
    let total = match (
        parse_clock_minutes(start_time),
        parse_clock_minutes(end_time),
    ) {
        (Some(s), Some(e)) => i64::from(e) - i64::from(s),
        _ => 0,
    };
    if total <= 0 {
        return "0%".into();
    }
    let total = total as f64;
    match display_format {
        DisplayFormat::Percent => format!("{}%", (progress * 100.0).round() as i64),
        DisplayFormat::Elapsed => minutes_label((progress * total).round() as i64),
        DisplayFormat::Remaining => minutes_label(((1.0 - progress) * total).round() as i64),
    }
}

/// Screen angle in degrees for a minute-of-day on the circular timetable.
///
/// 0° is the positive x-axis, so midnight/noon lands at -90° (12 o'clock).
/// The 12-hour dial wraps every 720 minutes, the 24-hour dial every 1440.
pub fn minutes_to_angle(minutes: f64, clock_mode: ClockMode) -> f64 {
    let dial = f64::from(clock_mode.dial_minutes());
    (minutes.rem_euclid(dial) / dial) * 360.0 - 90.0
}

/// Items whose half-open `[start, end)` range intersects `[new_start, new_end)`.
///
/// Touching endpoints do not conflict. `exclude_id` skips the item being
/// edited. Items with unparsable times never match.
pub fn find_overlaps<'a>(
    items: &'a [ScheduleItem],
    new_start: &str,
    new_end: &str,
    exclude_id: Option<&str>,
) -> Vec<&'a ScheduleItem> {
    let (Some(start), Some(end)) = (parse_clock_minutes(new_start), parse_clock_minutes(new_end))
    else {
        return Vec::new();
    };
    items
        .iter()
        .filter(|item| exclude_id != Some(item.id.as_str()))
        .filter(|item| {
            match (
                parse_clock_minutes(&item.start_time),
                parse_clock_minutes(&item.end_time),
            ) {
                (Some(s), Some(e)) => start < e && s < end,
                _ => false,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct LifeStats {
    /// Lived fraction, `0.0..=1.0`.
    pub progress: f64,
    pub elapsed: u64,
    pub remaining: u64,
    pub total: u64,
    pub unit_label: &'static str,
}

impl LifeStats {
    /// The zeroed result shown while the birth date is not a valid date yet.
    pub fn neutral() -> Self {
        LifeStats {
            progress: 0.0,
            elapsed: 0,
            remaining: 0,
            total: 0,
            unit_label: "",
        }
    }

    pub fn percent_text(&self) -> String {
        format!("{:.1}%", self.progress * 100.0)
    }
}

pub fn parse_birth_date(birth_date: &str) -> Result<DateTime<Utc>, TimeError> {
    let date = NaiveDate::parse_from_str(birth_date.trim(), "%Y-%m-%d")
        .map_err(|_| TimeError::InvalidDate(birth_date.to_string()))?;
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc())
        .ok_or_else(|| TimeError::InvalidDate(birth_date.to_string()))
}

/// Life statistics at `now`, using average Gregorian unit lengths
/// (year 365.25d, month 30.4375d, week 7d).
pub fn try_life_stats(
    birth_date: &str,
    expected_lifespan_years: u32,
    display_unit: DisplayUnit,
    now: DateTime<Utc>,
) -> Result<LifeStats, TimeError> {
    let birth = parse_birth_date(birth_date)?;
    if expected_lifespan_years == 0 {
        return Err(TimeError::InvalidLifespan(expected_lifespan_years));
    }
    let elapsed_ms = ((now - birth).num_milliseconds() as f64).max(0.0);
    let total_ms = f64::from(expected_lifespan_years) * DAYS_PER_YEAR * MS_PER_DAY;
    let remaining_ms = (total_ms - elapsed_ms).max(0.0);
    let progress = (elapsed_ms / total_ms).clamp(0.0, 1.0);

    let divisor = display_unit.days_per_unit() * MS_PER_DAY;
    Ok(LifeStats {
        progress,
        elapsed: (elapsed_ms / divisor).floor() as u64,
        remaining: (remaining_ms / divisor).floor() as u64,
        total: (total_ms / divisor).floor() as u64,
        unit_label: display_unit.label(),
    })
}

/// Like [`try_life_stats`] but never fails: bad input yields
/// [`LifeStats::neutral`].
pub fn compute_life_stats_at(
    birth_date: &str,
    expected_lifespan_years: u32,
    display_unit: DisplayUnit,
    now: DateTime<Utc>,
) -> LifeStats {
    try_life_stats(birth_date, expected_lifespan_years, display_unit, now).unwrap_or_else(|err| {
        tracing::debug!(%err, "life stats fell back to neutral");
        LifeStats::neutral()
    })
}

pub fn compute_life_stats(
    birth_date: &str,
    expected_lifespan_years: u32,
    display_unit: DisplayUnit,
) -> LifeStats {
    compute_life_stats_at(birth_date, expected_lifespan_years, display_unit, Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn item(id: &str, start: &str, end: &str) -> ScheduleItem {
        ScheduleItem::new(id, start, end, id, "#91D0FF")
    }

    #[test]
    fn parses_clock_strings() {
        assert_eq!(parse_clock_minutes("00:00"), Some(0));
        assert_eq!(parse_clock_minutes("09:30"), Some(570));
        assert_eq!(parse_clock_minutes("24:00"), Some(1440));
        assert_eq!(parse_clock_minutes("930"), None);
        assert_eq!(parse_clock_minutes("aa:bb"), None);
        assert!(try_clock_minutes("").is_err());
    }

    #[test]
    fn adjust_clock_pins_to_day() {
        assert_eq!(adjust_clock("23:45", 30), "24:00");
        assert_eq!(adjust_clock("00:15", -30), "00:00");
        assert_eq!(adjust_clock("09:00", 30), "09:30");
    }

    #[test]
    fn oversized_hours_do_not_overflow() {
        assert_eq!(parse_clock_minutes("99999999:00"), None);
        assert_eq!(parse_clock_minutes("-99999999:00"), None);
        assert_eq!(parse_clock_minutes("35791394:59"), None);
        assert_eq!(parse_clock_minutes("-35791394:00"), Some(-2_147_483_640));
        assert!(try_clock_minutes("99999999:00").is_err());

        assert_eq!(adjust_clock("35791394:07", 30), "24:00");
        assert_eq!(adjust_clock("35791394:07", i32::MAX), "24:00");
        assert_eq!(adjust_clock("-35791394:00", -30), "00:00");
    }

    #[test]
    fn extreme_bounds_soft_fail() {
        assert_eq!(compute_range_progress("-2147483648:00", "00:00", 0), 0.0);
        let wide = compute_range_progress("-35791394:00", "35791393:00", 0);
        assert!((wide - 0.5).abs() < 1e-6);
        assert_eq!(format_gauge(0.5, DisplayFormat::Percent, "-35791394:00", "35791393:00"), "50%");
        assert!(ScheduleItem::new("x", "09:00", "99999999:00", "x", "#fff")
            .validate()
            .is_err());
        let items = [item("a", "09:00", "10:00")];
        assert!(find_overlaps(&items, "09:00", "99999999:00", None).is_empty());
    }

    #[test]
    fn zero_length_range_has_no_progress() {
        for now in [0, 480, 1439] {
            assert_eq!(compute_range_progress("08:00", "08:00", now), 0.0);
        }
        assert_eq!(compute_range_progress("10:00", "08:00", 540), 0.0);
    }

    #[test]
    fn full_day_range_is_half_done_at_noon() {
        assert_eq!(compute_range_progress("00:00", "24:00", 720), 0.5);
    }

    #[test]
    fn progress_is_pinned_outside_window() {
        assert_eq!(compute_range_progress("09:00", "17:00", 60), 0.0);
        assert_eq!(compute_range_progress("09:00", "17:00", 1200), 1.0);
        assert_eq!(compute_range_progress("nope", "17:00", 600), 0.0);
    }

    #[test]
    fn gauge_labels() {
        assert_eq!(format_gauge(0.25, DisplayFormat::Percent, "00:00", "24:00"), "25%");
        assert_eq!(format_gauge(0.5, DisplayFormat::Elapsed, "09:00", "10:30"), "45m");
        assert_eq!(format_gauge(0.0, DisplayFormat::Remaining, "09:00", "11:00"), "2h");
        assert_eq!(format_gauge(0.5, DisplayFormat::Remaining, "00:00", "05:00"), "2h 30m");
        assert_eq!(format_gauge(0.5, DisplayFormat::Elapsed, "10:00", "10:00"), "0%");
    }

    #[test]
    fn angles_start_at_twelve_o_clock() {
        assert_eq!(minutes_to_angle(0.0, ClockMode::TwelveHour), -90.0);
        assert_eq!(minutes_to_angle(180.0, ClockMode::TwelveHour), 0.0);
        assert_eq!(minutes_to_angle(720.0, ClockMode::TwelveHour), -90.0);
        assert_eq!(minutes_to_angle(720.0, ClockMode::TwentyFourHour), 90.0);
        assert_eq!(minutes_to_angle(1440.0, ClockMode::TwentyFourHour), -90.0);
    }

    #[test]
    fn overlaps_are_half_open() {
        let items = vec![item("math", "09:00", "10:00")];
        assert!(find_overlaps(&items, "10:00", "11:00", None).is_empty());
        assert!(find_overlaps(&items, "08:00", "09:00", None).is_empty());
        let hits = find_overlaps(&items, "09:30", "10:30", None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "math");
    }

    #[test]
    fn overlaps_skip_excluded_item() {
        let items = vec![item("math", "09:00", "10:00"), item("gym", "09:30", "10:30")];
        let hits = find_overlaps(&items, "09:15", "09:45", Some("math"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "gym");
    }

    #[test]
    fn invalid_birth_date_is_neutral() {
        let stats = compute_life_stats("not-a-date", 80, DisplayUnit::Year);
        assert_eq!(stats, LifeStats::neutral());
        assert_eq!(stats.percent_text(), "0.0%");
        assert!(matches!(
            try_life_stats("2000-13-40", 80, DisplayUnit::Year, Utc::now()),
            Err(TimeError::InvalidDate(_))
        ));
    }

    #[test]
    fn zero_lifespan_is_neutral() {
        let stats = compute_life_stats("2000-01-01", 0, DisplayUnit::Day);
        assert_eq!(stats, LifeStats::neutral());
    }

    #[test]
    fn life_stats_in_years() {
        let now = Utc.with_ymd_and_hms(2040, 1, 1, 0, 0, 0).unwrap();
        let stats = try_life_stats("2000-01-01", 80, DisplayUnit::Year, now).unwrap();
        assert_eq!(stats.elapsed, 40);
        assert_eq!(stats.total, 80);
        assert_eq!(stats.remaining, 40);
        assert!((stats.progress - 0.5).abs() < 0.001);
        assert_eq!(stats.unit_label, "years");
    }

    #[test]
    fn life_stats_before_birth_and_after_lifespan() {
        let early = Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap();
        let stats = try_life_stats("2000-01-01", 80, DisplayUnit::Week, early).unwrap();
        assert_eq!(stats.progress, 0.0);
        assert_eq!(stats.elapsed, 0);
        assert_eq!(stats.remaining, stats.total);

        let late = Utc.with_ymd_and_hms(2200, 1, 1, 0, 0, 0).unwrap();
        let stats = try_life_stats("2000-01-01", 80, DisplayUnit::Month, late).unwrap();
        assert_eq!(stats.progress, 1.0);
        assert_eq!(stats.remaining, 0);
    }
}
