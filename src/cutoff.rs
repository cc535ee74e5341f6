//! Resolution of cutoff expressions such as `1 week`, `2 months ago`, `yesterday` or
//! `2024-01-31` into a local, timezone-naive timestamp.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime, TimeDelta};

use crate::error::{DashboardError, Result};

const ABSOLUTE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Resolve `expr` relative to `now`. Returns `None` when the expression is not understood.
///
/// Relative durations count backwards: `1 week` means one week before `now`.
pub fn resolve_cutoff(expr: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let expr = expr.trim();
    if expr.is_empty() {
        return None;
    }

    match expr.to_ascii_lowercase().as_str() {
        "now" => return Some(now),
        "today" => return Some(now.date().and_time(chrono::NaiveTime::MIN)),
        "yesterday" => {
            return now
                .date()
                .checked_sub_days(Days::new(1))
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
        }
        _ => {}
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(expr) {
        return Some(dt.with_timezone(&chrono::Local).naive_local());
    }
    for format in ABSOLUTE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(expr, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(expr, format) {
            return Some(date.and_time(chrono::NaiveTime::MIN));
        }
    }

    let delta = parse_relative(expr)?;
    now.checked_sub_signed(delta)
}

fn parse_relative(expr: &str) -> Option<TimeDelta> {
    let lower = expr.to_ascii_lowercase();
    let mut text = lower.trim();
    if let Some(stripped) = text.strip_suffix("ago") {
        text = stripped.trim_end();
    }
    let text = if let Some(rest) = text.strip_prefix("an ") {
        format!("1 {}", rest)
    } else if let Some(rest) = text.strip_prefix("a ") {
        format!("1 {}", rest)
    } else {
        text.to_string()
    };

    let duration = humantime::parse_duration(&text).ok()?;
    TimeDelta::from_std(duration).ok()
}

/// Resolve a cutoff supplied through a command-line flag, naming the flag on failure.
pub fn require_cutoff(flag: &'static str, expr: &str, now: NaiveDateTime) -> Result<NaiveDateTime> {
    resolve_cutoff(expr, now).ok_or_else(|| DashboardError::InvalidCutoff {
        flag,
        value: expr.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 20)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn relative_durations_count_backwards() {
        assert_eq!(resolve_cutoff("1 day", now()), Some(now() - TimeDelta::days(1)));
        assert_eq!(resolve_cutoff("1 week", now()), Some(now() - TimeDelta::weeks(1)));
        assert_eq!(resolve_cutoff("3 hours ago", now()), Some(now() - TimeDelta::hours(3)));
        assert_eq!(resolve_cutoff("a day ago", now()), Some(now() - TimeDelta::days(1)));
        assert_eq!(resolve_cutoff("2d 4h", now()), Some(now() - TimeDelta::hours(52)));
    }

    #[test]
    fn months_are_roughly_thirty_days() {
        let cutoff = resolve_cutoff("2 months", now()).unwrap();
        let days = (now() - cutoff).num_days();
        assert!((60..=61).contains(&days), "got {} days", days);
    }

    #[test]
    fn absolute_dates() {
        assert_eq!(resolve_cutoff("2024-01-31", now()), Some(date(2024, 1, 31)));
        assert_eq!(resolve_cutoff("2024/01/31", now()), Some(date(2024, 1, 31)));
        assert_eq!(
            resolve_cutoff("2024-01-31 08:15", now()),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap().and_hms_opt(8, 15, 0)
        );
        assert_eq!(
            resolve_cutoff("2024-01-31T08:15:30", now()),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap().and_hms_opt(8, 15, 30)
        );
    }

    #[test]
    fn named_days() {
        assert_eq!(resolve_cutoff("now", now()), Some(now()));
        assert_eq!(resolve_cutoff("Today", now()), Some(date(2024, 5, 20)));
        assert_eq!(resolve_cutoff("yesterday", now()), Some(date(2024, 5, 19)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(resolve_cutoff("", now()), None);
        assert_eq!(resolve_cutoff("whenever", now()), None);
        assert_eq!(resolve_cutoff("2024-13-45", now()), None);
        assert_eq!(resolve_cutoff("-1 day", now()), None);
    }

    #[test]
    fn require_cutoff_reports_flag() {
        let err = require_cutoff("--recent-creation-cutoff", "soonish", now()).unwrap_err();
        assert!(matches!(
            err,
            DashboardError::InvalidCutoff { flag: "--recent-creation-cutoff", .. }
        ));
    }
}
