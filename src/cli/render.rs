//! Terminal views of each section
//!
//! Rendering only reads the state, and can be repeated at will.

use crate::cli::table::{Align, Table};
use crate::lib::{
    date::{self, Day, Moment, DAY_FORMAT, MOMENT_FORMAT},
    deadline,
    entry::{Amount, EntryKind},
    goal::Horizon,
    habit::Habit,
    state::{AppState, Section},
};

/// What a view needs besides the state
pub struct View<'c> {
    pub currency: &'c str,
    pub today: Day,
    pub now: Moment,
}

impl View<'_> {
    fn money(&self, a: Amount) -> String {
        a.with_currency(self.currency)
    }
}

/// Redraw one section
pub fn render(state: &AppState, section: Section, view: &View) -> String {
    match section {
        Section::Goals => goals(state, view),
        Section::Expenses => expenses(state, view),
        Section::Entries => entries(state, view),
        Section::Skills => skills(state),
        Section::Habits => habits(state, view),
        Section::Deadlines => deadlines(state, view),
    }
}

fn goals(state: &AppState, view: &View) -> String {
    let mut table = Table::new(
        "Horizon",
        &[
            ("Goal", Align::Left),
            ("Date", Align::Left),
            ("Left", Align::Right),
            ("Purpose", Align::Left),
        ],
    )
    .with_title("Plan");
    for horizon in Horizon::all() {
        let goal = state.plan.get(horizon);
        table.push(
            horizon.label(),
            vec![
                goal.text.clone(),
                goal.date
                    .map(|d| d.format(DAY_FORMAT).to_string())
                    .unwrap_or_default(),
                date::plan_countdown(goal.date, view.now),
                goal.purpose.clone(),
            ],
        );
    }
    table.to_string()
}

fn expenses(state: &AppState, view: &View) -> String {
    let mut table = Table::new("#", &[("Expense", Align::Left), ("Amount", Align::Right)])
        .with_title("Expenses");
    for (i, e) in state.expenses.iter().enumerate() {
        table.push(i + 1, vec![e.name.clone(), view.money(e.amount)]);
    }
    table.push("", vec!["Total".to_string(), view.money(state.totals().expense)]);
    table.to_string()
}

fn entries(state: &AppState, view: &View) -> String {
    let mut table = Table::new(
        "#",
        &[
            ("Entry", Align::Left),
            ("Type", Align::Left),
            ("Category", Align::Left),
            ("Amount", Align::Right),
        ],
    )
    .with_title("Ledger");
    for (i, e) in state.entries.iter().enumerate() {
        table.push(
            i + 1,
            vec![
                e.name.clone(),
                e.kind.to_string(),
                e.category.clone(),
                view.money(e.amount),
            ],
        );
    }
    let totals = state.totals();
    let mut out = table.to_string();
    for kind in EntryKind::all() {
        out.push_str(&format!("{:>8}: {}\n", kind, view.money(totals.of(kind))));
    }
    out
}

fn progress_bar(percent: u8) -> String {
    let filled = percent as usize / 10;
    format!("{}{} {:>3}%", "█".repeat(filled), "░".repeat(10 - filled), percent)
}

fn skills(state: &AppState) -> String {
    let mut table = Table::new(
        "#",
        &[
            ("Skill", Align::Left),
            ("Category", Align::Left),
            ("Level", Align::Left),
            ("Progress", Align::Left),
        ],
    )
    .with_title("Skills");
    for (i, s) in state.skills.iter().enumerate() {
        let category = if s.category.is_empty() {
            "General".to_string()
        } else {
            s.category.clone()
        };
        table.push(
            i + 1,
            vec![s.name.clone(), category, s.level.to_string(), progress_bar(s.progress)],
        );
    }
    let mut out = table.to_string();
    for (i, s) in state.skills.iter().enumerate() {
        out.push_str(&format!("#{} {}: {}\n", i + 1, s.name, s.suggestion()));
        for note in s.recent_notes() {
            out.push_str(&format!("    {}: {}\n", note.date, note.text));
        }
    }
    out
}

fn habit_status(state: &AppState, i: usize, h: &Habit, today: Day) -> &'static str {
    if h.is_completed() {
        "Completed, can be archived"
    } else if state.habits.is_locked(i) {
        "Locked"
    } else if h.checked_on(today) {
        "Checked today"
    } else {
        "Ready"
    }
}

fn habits(state: &AppState, view: &View) -> String {
    let mut table = Table::new(
        "#",
        &[
            ("Habit", Align::Left),
            ("Goal", Align::Left),
            ("Stage", Align::Left),
            ("Progress", Align::Right),
            ("Status", Align::Left),
        ],
    )
    .with_title("Habit chains");
    // running chains first, completed ones at the bottom
    let ordered = state
        .habits
        .iter()
        .enumerate()
        .filter(|(_, h)| !h.is_completed())
        .chain(state.habits.iter().enumerate().filter(|(_, h)| h.is_completed()));
    for (i, h) in ordered {
        let progress = match h.stage.length() {
            Some(len) => format!("{}/{}", h.progress, len),
            None => "365/365".to_string(),
        };
        table.push(
            i + 1,
            vec![
                h.name.clone(),
                h.goal.clone(),
                h.stage.to_string(),
                progress,
                habit_status(state, i, h, view.today).to_string(),
            ],
        );
    }
    let mut out = table.to_string();
    if let Some(active) = state.habits.active() {
        out.push_str(&format!(
            "'{}' holds the 21-day chain, no new habit until it is through\n",
            state.habits[active].name
        ));
    }
    out
}

fn deadlines(state: &AppState, view: &View) -> String {
    let mut table = Table::new(
        "#",
        &[
            ("Deadline", Align::Left),
            ("Date", Align::Left),
            ("Left", Align::Right),
        ],
    )
    .with_title("Deadlines");
    for (i, d) in state.deadlines.iter().enumerate() {
        table.push(
            i + 1,
            vec![
                d.name.clone(),
                d.date.format(MOMENT_FORMAT).to_string(),
                d.countdown(view.now),
            ],
        );
    }
    let mut out = table.to_string();
    out.push_str(&format!("Next: {}\n", next_deadline(state, view.now)));
    out
}

/// Countdown to the nearest upcoming deadline
pub fn next_deadline(state: &AppState, now: Moment) -> String {
    match deadline::next(&state.deadlines, now) {
        Some(d) => format!("{} in {}", d.name, d.countdown(now)),
        None => "—".to_string(),
    }
}

/// Net worth and wealth level
pub fn wealth(state: &AppState, view: &View) -> String {
    let totals = state.totals();
    let wealth = state.wealth();
    let mut out = String::new();
    out.push_str(&format!("Net worth: {}\n", view.money(totals.net_worth())));
    out.push_str(&format!("{}: {}\n", wealth.level, wealth.label));
    out.push_str(&format!("  {}\n", wealth.description));
    out.push_str(&format!("  Next: {}\n", wealth.next_goal));
    out
}

/// Goals with the habits that serve them
pub fn dashboard(state: &AppState) -> String {
    let links = state.links();
    if links.is_empty() {
        return "No goals defined yet.\n".to_string();
    }
    let mut out = String::new();
    for link in links {
        out.push_str(&format!("{}: {}\n", link.horizon, link.goal.text));
        if link.habits.is_empty() {
            out.push_str("    No habits linked yet.\n");
        }
        for h in link.habits {
            let progress = match h.stage.length() {
                Some(len) => format!("{}/{} days", h.progress, len),
                None => "done".to_string(),
            };
            out.push_str(&format!("    {} ({} stage) {}\n", h.name, h.stage, progress));
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::{
        date::parse_moment,
        goal::{Goal, Plan},
        habit::INDEPENDENT,
    };
    use chrono::NaiveDate;

    fn view() -> View<'static> {
        View {
            currency: "PKR",
            today: NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            now: parse_moment("2026-10-16T12:00").unwrap(),
        }
    }

    #[test]
    fn rendering_does_not_mutate() {
        let mut state = AppState::default();
        state.add_expense("Rent", Amount(45_000.0)).unwrap();
        state.start_habit("Read", INDEPENDENT).unwrap();
        let before = state.clone();
        for section in Section::ALL {
            let first = render(&state, section, &view());
            assert_eq!(first, render(&state, section, &view()));
        }
        assert_eq!(state, before);
    }

    #[test]
    fn habit_statuses() {
        let mut state = AppState::default();
        state.habits = vec![
            Habit { stage: crate::lib::habit::Stage::Days90, ..Habit::new("Walk", INDEPENDENT) },
            Habit::new("Read", INDEPENDENT),
        ]
        .into();
        state.mark_habit(1, true, view().today).unwrap();
        let out = render(&state, Section::Habits, &view());
        assert!(out.contains("Locked"));
        assert!(out.contains("Checked today"));
        assert!(out.contains("1/21"));
        assert!(out.contains("'Read' holds the 21-day chain"));
    }

    #[test]
    fn dashboard_lists_links() {
        let mut state = AppState::default();
        assert_eq!(dashboard(&state), "No goals defined yet.\n");
        state.save_plan(Plan {
            short: Goal::new("Run a 10k", None, ""),
            mid: Goal::new("Learn Spanish", None, ""),
            ..Plan::default()
        });
        state.start_habit("Jog", "Run a 10k").unwrap();
        let out = dashboard(&state);
        assert!(out.contains("Mid-term: Learn Spanish\n    No habits linked yet."));
        assert!(out.contains("Short-term: Run a 10k\n    Jog (21-day stage) 0/21 days"));
    }

    #[test]
    fn money_views() {
        let mut state = AppState::default();
        state.add_expense("Rent", Amount(1000.0)).unwrap();
        state.add_entry("Job", Amount(1000.0), EntryKind::Income, "").unwrap();
        assert!(render(&state, Section::Expenses, &view()).contains("PKR 1,000"));
        let out = wealth(&state, &view());
        assert!(out.starts_with("Net worth: PKR 0\nLevel 1: Financial Stability"));
    }

    #[test]
    fn next_deadline_line() {
        let mut state = AppState::default();
        assert_eq!(next_deadline(&state, view().now), "—");
        state.add_deadline("Visa", parse_moment("2026-10-17T12:00").unwrap()).unwrap();
        assert_eq!(next_deadline(&state, view().now), "Visa in 1d 0h 0m 0s");
    }
}
