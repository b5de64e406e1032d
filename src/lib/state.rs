//! Everything the user tracks, and the operations that change it
//!
//! Operations never persist nor display anything: each one reports the
//! `Section` it touched, and the caller saves and redraws that section.
//! A refused operation leaves the state exactly as it was.

use std::fmt;

use crate::lib::{
    date::{Day, Moment},
    deadline::Deadline,
    entry::{Amount, EntryKind, Expense, LedgerEntry},
    error::{Error, Result},
    goal::Plan,
    habit::{Habits, Outcome, INDEPENDENT},
    linkage::{self, Link},
    skill::{Level, Skill},
    wealth::{self, Totals, Wealth},
};

/// Independently stored parts of the state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Goals,
    Expenses,
    Entries,
    Skills,
    Habits,
    Deadlines,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Goals,
        Section::Expenses,
        Section::Entries,
        Section::Skills,
        Section::Habits,
        Section::Deadlines,
    ];

    /// Storage key, also the field name in backups
    pub fn key(self) -> &'static str {
        use Section::*;
        match self {
            Goals => "goals",
            Expenses => "expenses",
            Entries => "entries",
            Skills => "skills",
            Habits => "habits",
            Deadlines => "deadlines",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub plan: Plan,
    pub expenses: Vec<Expense>,
    pub entries: Vec<LedgerEntry>,
    pub skills: Vec<Skill>,
    pub habits: Habits,
    pub deadlines: Vec<Deadline>,
}

fn required(field: &'static str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(Error::invalid(field, "must not be empty"))
    } else {
        Ok(value.to_string())
    }
}

fn take<T>(list: &mut Vec<T>, index: usize, name: &'static str) -> Result<T> {
    if index < list.len() {
        Ok(list.remove(index))
    } else {
        Err(Error::OutOfRange { list: name, index })
    }
}

fn nth<'l, T>(list: &'l mut [T], index: usize, name: &'static str) -> Result<&'l mut T> {
    list.get_mut(index)
        .ok_or(Error::OutOfRange { list: name, index })
}

impl AppState {
    /// Replace the whole plan
    pub fn save_plan(&mut self, plan: Plan) -> Section {
        self.plan = plan;
        Section::Goals
    }

    pub fn add_expense(&mut self, name: &str, amount: Amount) -> Result<Section> {
        let name = required("name", name)?;
        if amount.0 < 0.0 {
            return Err(Error::invalid("amount", "an expense cannot be negative"));
        }
        tracing::debug!(%name, amount = amount.0, "expense added");
        self.expenses.push(Expense { name, amount });
        Ok(Section::Expenses)
    }

    pub fn remove_expense(&mut self, index: usize) -> Result<Section> {
        take(&mut self.expenses, index, "expense")?;
        Ok(Section::Expenses)
    }

    pub fn add_entry(
        &mut self,
        name: &str,
        amount: Amount,
        kind: EntryKind,
        category: &str,
    ) -> Result<Section> {
        let name = required("name", name)?;
        tracing::debug!(%name, amount = amount.0, %kind, "entry added");
        self.entries.push(LedgerEntry {
            name,
            amount,
            kind,
            category: category.trim().to_string(),
        });
        Ok(Section::Entries)
    }

    pub fn remove_entry(&mut self, index: usize) -> Result<Section> {
        take(&mut self.entries, index, "entry")?;
        Ok(Section::Entries)
    }

    pub fn add_skill(&mut self, name: &str, category: &str, level: Level) -> Result<Section> {
        required("name", name)?;
        self.skills.push(Skill::new(name, category, level));
        Ok(Section::Skills)
    }

    /// Move the progress of a skill, returns the new percentage
    pub fn bump_skill(&mut self, index: usize, delta: i32) -> Result<(Section, u8)> {
        let progress = nth(&mut self.skills, index, "skill")?.bump(delta);
        Ok((Section::Skills, progress))
    }

    pub fn note_skill(&mut self, index: usize, text: &str, date: String) -> Result<Section> {
        let skill = nth(&mut self.skills, index, "skill")?;
        let text = required("note", text)?;
        skill.note(&text, date);
        Ok(Section::Skills)
    }

    pub fn remove_skill(&mut self, index: usize) -> Result<Section> {
        take(&mut self.skills, index, "skill")?;
        Ok(Section::Skills)
    }

    /// Start a new habit chain toward a goal of the plan, or independently
    pub fn start_habit(&mut self, name: &str, goal: &str) -> Result<Section> {
        let goal = goal.trim();
        if goal != INDEPENDENT && !self.plan.has_goal(goal) {
            return Err(Error::invalid(
                "goal",
                format!("'{}' is neither a goal of the plan nor '{}'", goal, INDEPENDENT),
            ));
        }
        self.habits.start_chain(name, goal)?;
        Ok(Section::Habits)
    }

    pub fn mark_habit(&mut self, index: usize, done: bool, today: Day) -> Result<(Section, Outcome)> {
        let outcome = self.habits.mark_day(index, done, today)?;
        Ok((Section::Habits, outcome))
    }

    pub fn add_habit_days(&mut self, index: usize, days: u32) -> Result<(Section, Outcome)> {
        let outcome = self.habits.add_bulk_days(index, days)?;
        Ok((Section::Habits, outcome))
    }

    pub fn archive_habit(&mut self, index: usize) -> Result<Section> {
        let habit = self.habits.archive(index)?;
        tracing::debug!(habit = %habit.name, "archived");
        Ok(Section::Habits)
    }

    pub fn add_deadline(&mut self, name: &str, date: Moment) -> Result<Section> {
        let name = required("name", name)?;
        self.deadlines.push(Deadline { name, date });
        Ok(Section::Deadlines)
    }

    pub fn remove_deadline(&mut self, index: usize) -> Result<Section> {
        take(&mut self.deadlines, index, "deadline")?;
        Ok(Section::Deadlines)
    }

    pub fn totals(&self) -> Totals {
        Totals::tally(&self.entries, &self.expenses)
    }

    pub fn wealth(&self) -> Wealth {
        wealth::classify(&self.totals())
    }

    pub fn links(&self) -> Vec<Link<'_>> {
        linkage::link(&self.plan, &self.habits)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::{goal::Goal, habit::Stage, wealth::WealthLevel};
    use chrono::NaiveDate;

    fn day(d: u32) -> Day {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    #[test]
    fn refused_operations_change_nothing() {
        let mut state = AppState::default();
        state.add_expense("Rent", Amount(1200.0)).unwrap();
        let before = state.clone();
        assert!(state.add_expense("   ", Amount(5.0)).is_err());
        assert!(state.add_expense("Gift", Amount(-5.0)).is_err());
        assert!(state.remove_expense(3).is_err());
        assert!(state.add_entry("", Amount(1.0), EntryKind::Income, "").is_err());
        assert!(state.bump_skill(0, 5).is_err());
        assert!(state.start_habit("Run", "Unknown goal").is_err());
        assert!(state.mark_habit(0, true, day(1)).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn sections_touched() {
        let mut state = AppState::default();
        assert_eq!(state.save_plan(Plan::default()), Section::Goals);
        assert_eq!(state.add_expense("Food", Amount(300.0)), Ok(Section::Expenses));
        assert_eq!(
            state.add_entry("Salary", Amount(900.0), EntryKind::Income, " job "),
            Ok(Section::Entries)
        );
        assert_eq!(state.entries[0].category, "job");
        assert_eq!(state.add_skill("Rust", "technical", Level::Beginner), Ok(Section::Skills));
        assert_eq!(state.bump_skill(0, 5), Ok((Section::Skills, 5)));
        assert_eq!(state.note_skill(0, " ch. 4 ", "today".to_string()), Ok(Section::Skills));
        assert_eq!(state.skills[0].notes[0].text, "ch. 4");
        assert!(state.note_skill(0, "  ", "today".to_string()).is_err());
        assert_eq!(state.remove_skill(0), Ok(Section::Skills));
        assert_eq!(state.remove_entry(0), Ok(Section::Entries));
        assert_eq!(state.remove_expense(0), Ok(Section::Expenses));
        assert!(state.expenses.is_empty() && state.entries.is_empty() && state.skills.is_empty());
    }

    #[test]
    fn habit_toward_plan_goal() {
        let mut state = AppState::default();
        state.save_plan(Plan {
            mid: Goal::new("Get fit", None, ""),
            ..Plan::default()
        });
        assert_eq!(state.start_habit("Run", "Get fit"), Ok(Section::Habits));
        assert!(matches!(
            state.start_habit("Swim", INDEPENDENT),
            Err(Error::ChainConflict { .. })
        ));
        for d in 1..=21 {
            state.mark_habit(0, true, day(d)).unwrap();
        }
        assert_eq!(state.habits[0].stage, Stage::Days90);
        assert_eq!(state.start_habit("Swim", INDEPENDENT), Ok(Section::Habits));
        let links = state.links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].habits.len(), 1);
        assert!(state.archive_habit(0).is_err());
        let (_, outcome) = state.add_habit_days(0, 90).unwrap();
        assert_eq!(outcome, Outcome::Promoted { from: Stage::Days90, to: Stage::Days180 });
    }

    #[test]
    fn wealth_from_lists() {
        let mut state = AppState::default();
        assert_eq!(state.wealth().level, WealthLevel::Struggle);
        state.add_entry("Salary", Amount(1000.0), EntryKind::Income, "").unwrap();
        state.add_expense("Rent", Amount(1000.0)).unwrap();
        assert_eq!(state.wealth().level, WealthLevel::Stability);
    }

    #[test]
    fn deadlines_by_index() {
        let mut state = AppState::default();
        let at = day(20).and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(state.add_deadline("Visa", at), Ok(Section::Deadlines));
        assert!(state.add_deadline(" ", at).is_err());
        assert_eq!(
            state.remove_deadline(1),
            Err(Error::OutOfRange { list: "deadline", index: 1 })
        );
        assert_eq!(state.remove_deadline(0), Ok(Section::Deadlines));
    }
}
