//! Calendar days, local moments and countdowns
//!
//! Habits are checked in at day-precision, goals carry an optional target
//! day and deadlines carry a local date and time with minute precision.
//!
//! Nothing in here reads the clock except `today` and `now`: every
//! computation takes the current moment as an argument so that it can be
//! tested against fixed dates.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

/// A date with day-precision
pub type Day = NaiveDate;

/// A local date and time, without timezone
pub type Moment = NaiveDateTime;

/// Canonical serialization of a `Day`
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Canonical serialization of a `Moment`
pub const MOMENT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Accepted spellings of a day, canonical first
///
/// The second one is what browsers produce with `Date.toDateString()`,
/// which older data files use for the last check-in of a habit.
const DAY_FORMATS: &[&str] = &[DAY_FORMAT, "%a %b %d %Y"];

/// Accepted spellings of a moment, canonical first
const MOMENT_FORMATS: &[&str] = &[
    MOMENT_FORMAT,
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;

/// Current local day
pub fn today() -> Day {
    Local::now().date_naive()
}

/// Current local moment
pub fn now() -> Moment {
    Local::now().naive_local()
}

/// Parse a day from any of the accepted formats
pub fn parse_day(s: &str) -> Option<Day> {
    let s = s.trim();
    DAY_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Parse a moment from any of the accepted formats
///
/// A bare day is understood as its midnight.
pub fn parse_moment(s: &str) -> Option<Moment> {
    let s = s.trim();
    MOMENT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| parse_day(s).map(midnight))
}

/// First moment of the day
pub fn midnight(day: Day) -> Moment {
    day.and_hms_opt(0, 0, 0).expect("midnight exists on every day")
}

/// Time left until a deadline, down to the second
///
/// `"Expired"` as soon as the target is reached.
pub fn countdown(target: Moment, now: Moment) -> String {
    let diff = target - now;
    if diff <= Duration::zero() {
        return String::from("Expired");
    }
    let secs = diff.num_seconds();
    format!(
        "{}d {}h {}m {}s",
        secs / DAY,
        secs % DAY / HOUR,
        secs % HOUR / MINUTE,
        secs % MINUTE,
    )
}

/// Time left until a plan goal, down to the minute
///
/// The target is the local midnight of the goal day. Unlike `countdown`
/// the exact instant of the target still counts as running.
pub fn plan_countdown(target: Option<Day>, now: Moment) -> String {
    let target = match target {
        Some(day) => midnight(day),
        None => return String::from("No date set"),
    };
    let diff = target - now;
    if diff < Duration::zero() {
        return String::from("Expired");
    }
    let secs = diff.num_seconds();
    format!(
        "{}d {}h {}m",
        secs / DAY,
        secs % DAY / HOUR,
        secs % HOUR / MINUTE,
    )
}

/// Optional day stored as a string, the empty string standing for "no day"
///
/// Used for goal target days. Unreadable days are dropped rather than
/// rejected: the plan form never validated them.
pub mod day_or_empty {
    use super::{parse_day, Day, DAY_FORMAT};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(day: &Option<Day>, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match day {
            Some(day) => ser.serialize_str(&day.format(DAY_FORMAT).to_string()),
            None => ser.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(de: D) -> Result<Option<Day>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(de)?;
        Ok(raw.as_deref().and_then(parse_day))
    }
}

/// Optional day stored as a string or `null`
///
/// Used for the last check-in of a habit.
pub mod day_or_null {
    use super::{parse_day, Day, DAY_FORMAT};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(day: &Option<Day>, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match day {
            Some(day) => ser.serialize_str(&day.format(DAY_FORMAT).to_string()),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(de: D) -> Result<Option<Day>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(de)? {
            None => Ok(None),
            Some(s) if s.is_empty() => Ok(None),
            Some(s) => parse_day(&s)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("'{}' is not a day", s))),
        }
    }
}

/// Mandatory moment stored as a string
pub mod moment {
    use super::{parse_moment, Moment, MOMENT_FORMAT};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(moment: &Moment, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ser.serialize_str(&moment.format(MOMENT_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(de: D) -> Result<Moment, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(de)?;
        parse_moment(&s).ok_or_else(|| de::Error::custom(format!("'{}' is not a date and time", s)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    macro_rules! day {
        ( $y:tt - $m:tt - $d:tt ) => {
            NaiveDate::from_ymd_opt($y, $m, $d).unwrap()
        };
    }
    macro_rules! at {
        ( $y:tt - $m:tt - $d:tt $h:tt : $min:tt : $s:tt ) => {
            day!($y - $m - $d).and_hms_opt($h, $min, $s).unwrap()
        };
    }

    #[test]
    fn day_formats() {
        assert_eq!(parse_day("2026-10-16"), Some(day!(2026-10-16)));
        assert_eq!(parse_day(" 2026-01-02 "), Some(day!(2026-1-2)));
        assert_eq!(parse_day("Fri Oct 16 2026"), Some(day!(2026-10-16)));
        assert_eq!(parse_day("2026-02-30"), None);
        assert_eq!(parse_day(""), None);
    }

    #[test]
    fn moment_formats() {
        assert_eq!(parse_moment("2026-10-20T18:30"), Some(at!(2026-10-20 18:30:0)));
        assert_eq!(parse_moment("2026-10-20T18:30:15"), Some(at!(2026-10-20 18:30:15)));
        assert_eq!(parse_moment("2026-10-20 08:05"), Some(at!(2026-10-20 8:5:0)));
        assert_eq!(parse_moment("2026-10-20"), Some(at!(2026-10-20 0:0:0)));
        assert_eq!(parse_moment("tomorrow"), None);
    }

    #[test]
    fn deadline_countdown() {
        let now = at!(2026-10-16 12:0:0);
        assert_eq!(countdown(at!(2026-10-18 15:4:5), now), "2d 3h 4m 5s");
        assert_eq!(countdown(at!(2026-10-16 12:0:1), now), "0d 0h 0m 1s");
        assert_eq!(countdown(now, now), "Expired");
        assert_eq!(countdown(at!(2026-10-1 0:0:0), now), "Expired");
    }

    #[test]
    fn goal_countdown() {
        let now = at!(2026-10-16 12:30:0);
        assert_eq!(plan_countdown(None, now), "No date set");
        assert_eq!(plan_countdown(Some(day!(2026-10-18)), now), "1d 11h 30m");
        assert_eq!(plan_countdown(Some(day!(2026-10-16)), now), "Expired");
        let midnight = at!(2026-10-16 0:0:0);
        assert_eq!(plan_countdown(Some(day!(2026-10-16)), midnight), "0d 0h 0m");
    }
}
