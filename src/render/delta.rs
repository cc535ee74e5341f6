use chrono::TimeDelta;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Human wording for an elapsed time: "a moment", "3 minutes", "an hour", "2 months".
///
/// The sign is ignored; a small clock skew between hosts should not print "-5 seconds".
pub fn natural_delta(delta: TimeDelta) -> String {
    let seconds = delta.num_seconds().abs();
    let days = seconds / DAY;

    if days == 0 {
        return match seconds {
            0 => "a moment".to_string(),
            1 => "a second".to_string(),
            s if s < MINUTE => format!("{} seconds", s),
            s if s < 2 * MINUTE => "a minute".to_string(),
            s if s < HOUR => format!("{} minutes", s / MINUTE),
            s if s < 2 * HOUR => "an hour".to_string(),
            s => format!("{} hours", s / HOUR),
        };
    }

    let months = days * 12 / 365;
    let years = days / 365;
    match (years, days) {
        (0, 1) => "a day".to_string(),
        (0, d) if months == 0 => format!("{} days", d),
        (0, _) if months == 1 => "a month".to_string(),
        (0, _) => format!("{} months", months),
        (1, d) => match (d - 365) * 12 / 365 {
            0 => "a year".to_string(),
            1 => "1 year, 1 month".to_string(),
            m => format!("1 year, {} months", m),
        },
        (y, _) => format!("{} years", y),
    }
}
