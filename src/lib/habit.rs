//! Sequential habit chains
//!
//! A habit climbs a chain of stages, 21 days then 90 then 365, after
//! which it is completed and can only be archived. Progress counts the
//! days done within the current stage and restarts from zero at each
//! promotion.
//!
//! Only one habit at a time may be in its first 21 days: that habit holds
//! the *active chain*, and while it does no other chain can be started
//! and every other habit is locked.
//!
//! There are two ways to move a habit forward, and they disagree:
//!
//! - daily check-ins (`Habits::mark_day`) promote `21 -> 90 -> 365 -> completed`
//!   and always restart progress from zero;
//! - bulk additions (`Habits::add_bulk_days`) go through an extra 180-day stage,
//!   `21 -> 90 -> 180 -> 365 -> completed`, and keep progress at 365 once
//!   completed.
//!
//! Both promote at most one stage per call and drop surplus days.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt, ops};

use crate::lib::{
    date::Day,
    error::{Error, Result},
};

/// Goal reference of a habit that serves no goal of the plan
pub const INDEPENDENT: &str = "independent";

/// Position of a habit in its chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    /// 21 days, the only stage that can hold the active chain
    Days21,
    Days90,
    /// only reachable through bulk additions
    Days180,
    Days365,
    Completed,
}

impl Stage {
    /// Number of days to complete the stage
    pub fn length(self) -> Option<u32> {
        use Stage::*;
        match self {
            Days21 => Some(21),
            Days90 => Some(90),
            Days180 => Some(180),
            Days365 => Some(365),
            Completed => None,
        }
    }

    pub fn from_length(days: u64) -> Option<Self> {
        use Stage::*;
        match days {
            21 => Some(Days21),
            90 => Some(Days90),
            180 => Some(Days180),
            365 => Some(Days365),
            _ => None,
        }
    }

    /// Successor for daily check-ins
    ///
    /// The daily chain has no 180-day stage, a habit that was bulk-promoted
    /// into it still moves on to 365.
    pub fn next_daily(self) -> Self {
        use Stage::*;
        match self {
            Days21 => Days90,
            Days90 | Days180 => Days365,
            Days365 | Completed => Completed,
        }
    }

    /// Successor for bulk additions
    pub fn next_bulk(self) -> Self {
        use Stage::*;
        match self {
            Days21 => Days90,
            Days90 => Days180,
            Days180 => Days365,
            Days365 | Completed => Completed,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.length() {
            Some(days) => write!(f, "{}-day", days),
            None => write!(f, "completed"),
        }
    }
}

/// Stored as the stage length, or the `"completed"` tag
impl Serialize for Stage {
    fn serialize<S>(&self, ser: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.length() {
            Some(days) => ser.serialize_u32(days),
            None => ser.serialize_str("completed"),
        }
    }
}

impl<'de> Deserialize<'de> for Stage {
    fn deserialize<D>(de: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Days(u64),
            Tag(String),
        }
        match Raw::deserialize(de)? {
            Raw::Days(days) => Stage::from_length(days)
                .ok_or_else(|| de::Error::custom(format!("{} is not a stage length", days))),
            Raw::Tag(tag) if tag == "completed" => Ok(Stage::Completed),
            Raw::Tag(tag) => Err(de::Error::custom(format!("'{}' is not a stage", tag))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Habit {
    pub name: String,
    /// text of a plan goal, or `INDEPENDENT`
    #[serde(default = "independent")]
    pub goal: String,
    pub stage: Stage,
    #[serde(default)]
    pub progress: u32,
    #[serde(default, with = "crate::lib::date::day_or_null")]
    pub last_checked: Option<Day>,
}

fn independent() -> String {
    INDEPENDENT.to_string()
}

/// What a check-in or a bulk addition did to a habit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// day consumed without progress
    Missed,
    /// progress within the same stage
    Progressed,
    /// stage completed and the next one entered
    Promoted { from: Stage, to: Stage },
}

impl Outcome {
    /// Whether this was the last promotion of the chain
    pub fn completes_chain(self) -> bool {
        matches!(self, Outcome::Promoted { to: Stage::Completed, .. })
    }
}

impl Habit {
    /// Fresh habit at the start of its 21-day stage
    pub fn new(name: &str, goal: &str) -> Self {
        Self {
            name: name.to_string(),
            goal: goal.to_string(),
            stage: Stage::Days21,
            progress: 0,
            last_checked: None,
        }
    }

    /// In its first 21 days, i.e. holding the active chain
    pub fn is_active(&self) -> bool {
        self.stage == Stage::Days21 && self.progress < 21
    }

    pub fn is_completed(&self) -> bool {
        self.stage == Stage::Completed
    }

    /// Whether a check-in was already recorded on `day`
    pub fn checked_on(&self, day: Day) -> bool {
        self.last_checked == Some(day)
    }

    pub fn is_independent(&self) -> bool {
        self.goal == INDEPENDENT
    }

    fn refuse(&self, action: &'static str) -> Error {
        Error::InvalidState {
            name: self.name.clone(),
            stage: self.stage,
            action,
        }
    }

    fn check_in(&mut self, done: bool, today: Day) -> Result<Outcome> {
        let length = self.stage.length().ok_or_else(|| self.refuse("checked in"))?;
        self.last_checked = Some(today);
        if !done {
            return Ok(Outcome::Missed);
        }
        self.progress = self.progress.saturating_add(1);
        if self.progress < length {
            return Ok(Outcome::Progressed);
        }
        let from = self.stage;
        self.stage = from.next_daily();
        self.progress = 0;
        Ok(Outcome::Promoted { from, to: self.stage })
    }

    fn add_days(&mut self, days: u32) -> Result<Outcome> {
        if days == 0 {
            return Err(Error::invalid("days", "must be a positive number of days"));
        }
        let length = self.stage.length().ok_or_else(|| self.refuse("extended"))?;
        self.progress = self.progress.saturating_add(days);
        if self.progress < length {
            return Ok(Outcome::Progressed);
        }
        let from = self.stage;
        self.stage = from.next_bulk();
        self.progress = if self.stage == Stage::Completed { length } else { 0 };
        Ok(Outcome::Promoted { from, to: self.stage })
    }
}

/// All tracked habits, in creation order
///
/// Every mutation goes through this type so that no two habits can ever
/// hold the active chain together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Habits(Vec<Habit>);

impl ops::Deref for Habits {
    type Target = [Habit];
    fn deref(&self) -> &[Habit] {
        &self.0
    }
}

impl From<Vec<Habit>> for Habits {
    fn from(list: Vec<Habit>) -> Self {
        Self(list)
    }
}

impl Habits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the habit holding the active chain
    pub fn active(&self) -> Option<usize> {
        self.0.iter().position(Habit::is_active)
    }

    /// Number of habits holding the active chain, more than one means the
    /// data was edited by hand
    pub fn count_active(&self) -> usize {
        self.0.iter().filter(|h| h.is_active()).count()
    }

    /// Whether some *other* habit holds the active chain
    pub fn is_locked(&self, index: usize) -> bool {
        self.0
            .iter()
            .enumerate()
            .any(|(i, h)| i != index && h.is_active())
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut Habit> {
        self.0.get_mut(index).ok_or(Error::OutOfRange {
            list: "habit",
            index,
        })
    }

    /// Start a new 21-day chain
    ///
    /// Refused while another habit is still in its first 21 days.
    pub fn start_chain(&mut self, name: &str, goal: &str) -> Result<usize> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid("name", "a habit needs a name"));
        }
        if let Some(i) = self.active() {
            return Err(Error::ChainConflict {
                active: self.0[i].name.clone(),
            });
        }
        self.0.push(Habit::new(name, goal));
        tracing::debug!(habit = name, goal, "chain started");
        Ok(self.0.len() - 1)
    }

    /// Record today's check-in, done or not
    ///
    /// The day is consumed either way. Calling this twice on the same day
    /// counts twice: use `Habit::checked_on` to prevent it.
    pub fn mark_day(&mut self, index: usize, done: bool, today: Day) -> Result<Outcome> {
        if let Some(active) = self.active().filter(|&a| a != index) {
            let active = self.0[active].name.clone();
            let habit = self.get_mut(index)?;
            return Err(Error::Locked {
                name: habit.name.clone(),
                active,
            });
        }
        let habit = self.get_mut(index)?;
        let outcome = habit.check_in(done, today)?;
        tracing::debug!(habit = %habit.name, ?outcome, progress = habit.progress, "checked in");
        Ok(outcome)
    }

    /// Add several days at once, independently of daily check-ins
    pub fn add_bulk_days(&mut self, index: usize, days: u32) -> Result<Outcome> {
        let habit = self.get_mut(index)?;
        let outcome = habit.add_days(days)?;
        tracing::debug!(habit = %habit.name, days, ?outcome, "days added");
        Ok(outcome)
    }

    /// Remove a completed habit for good
    pub fn archive(&mut self, index: usize) -> Result<Habit> {
        let habit = self.get_mut(index)?;
        if !habit.is_completed() {
            return Err(habit.refuse("archived"));
        }
        Ok(self.0.remove(index))
    }
}
