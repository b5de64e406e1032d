//! Named deadlines with live countdowns

use serde::{Deserialize, Serialize};

use crate::lib::date::{self, Moment};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deadline {
    pub name: String,
    #[serde(with = "crate::lib::date::moment")]
    pub date: Moment,
}

impl Deadline {
    pub fn countdown(&self, now: Moment) -> String {
        date::countdown(self.date, now)
    }

    pub fn is_upcoming(&self, now: Moment) -> bool {
        self.date > now
    }
}

/// Nearest deadline that is still in the future
///
/// Ties go to the one that was added first.
pub fn next(deadlines: &[Deadline], now: Moment) -> Option<&Deadline> {
    deadlines
        .iter()
        .filter(|d| d.is_upcoming(now))
        .min_by_key(|d| d.date)
}
