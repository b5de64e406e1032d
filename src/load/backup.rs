//! Backup and restore of the whole state as one JSON document
//!
//! A backup holds every section under its storage key, and never the PIN
//! digest. Restoring is forgiving field by field: a field that is absent
//! or does not have the expected shape keeps its current value and is
//! reported as a warning. Only a document that cannot be parsed at all
//! is rejected, before anything is applied.

use serde::Serialize;
use serde_json::{Map, Value};
use std::{fs, path::Path};

use crate::lib::{
    date,
    deadline::Deadline,
    entry::{Expense, LedgerEntry},
    goal::Plan,
    habit::{Habit, Habits},
    skill::Skill,
    state::{AppState, Section},
};
use crate::load::{check_chains, error::Record, normalize_skills};

#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    #[error("not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("expected an object with one field per section")]
    NotAnObject,
    #[error("cannot access '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Serialize)]
struct Snapshot<'s> {
    goals: &'s Plan,
    expenses: &'s [Expense],
    entries: &'s [LedgerEntry],
    habits: &'s [Habit],
    deadlines: &'s [Deadline],
    skills: &'s [Skill],
}

/// Pretty-printed backup document
pub fn export(state: &AppState) -> Result<String, BackupError> {
    let snapshot = Snapshot {
        goals: &state.plan,
        expenses: &state.expenses,
        entries: &state.entries,
        habits: &state.habits,
        deadlines: &state.deadlines,
        skills: &state.skills,
    };
    Ok(serde_json::to_string_pretty(&snapshot)?)
}

/// Conventional file name of a backup taken on `day`
pub fn file_name(day: date::Day) -> String {
    format!("lifeplan-backup-{}.json", day.format(date::DAY_FORMAT))
}

pub fn export_to<P>(state: &AppState, path: P) -> Result<(), BackupError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    fs::write(path, export(state)?).map_err(|source| BackupError::Io {
        path: path.display().to_string(),
        source,
    })?;
    tracing::info!(path = %path.display(), "backup exported");
    Ok(())
}

/// A field of the backup, when it has the expected shape
fn field<T>(
    doc: &Map<String, Value>,
    section: Section,
    origin: &str,
    errs: &mut Record,
) -> Option<T>
where
    T: serde::de::DeserializeOwned,
{
    let raw = match doc.get(section.key()) {
        Some(raw) => raw.clone(),
        None => {
            errs.make("Field missing")
                .nonfatal()
                .field(origin, section.key())
                .hint(format!("current {} were kept", section));
            return None;
        }
    };
    match serde_json::from_value(raw) {
        Ok(v) => Some(v),
        Err(e) => {
            errs.make("Field ignored")
                .nonfatal()
                .field(origin, section.key())
                .text(e)
                .hint(format!("current {} were kept", section));
            None
        }
    }
}

/// Apply a backup document to the state
///
/// Returns the sections that were replaced, which the caller must save.
/// On `Err` the state is untouched.
pub fn import(
    state: &mut AppState,
    text: &str,
    origin: &str,
    errs: &mut Record,
) -> Result<Vec<Section>, BackupError> {
    let doc = match serde_json::from_str::<Value>(text)? {
        Value::Object(doc) => doc,
        _ => return Err(BackupError::NotAnObject),
    };
    let mut applied = Vec::new();
    if let Some(plan) = field::<Plan>(&doc, Section::Goals, origin, errs) {
        state.plan = plan;
        applied.push(Section::Goals);
    }
    if let Some(expenses) = field::<Vec<Expense>>(&doc, Section::Expenses, origin, errs) {
        state.expenses = expenses
            .into_iter()
            .enumerate()
            .filter_map(|(i, e)| {
                if e.amount.0 < 0.0 {
                    errs.make("Expense dropped")
                        .nonfatal()
                        .field(origin, format!("expenses[{}]", i))
                        .text(format!("'{}' has a negative amount", e.name))
                        .hint("expenses cannot be negative");
                    None
                } else {
                    Some(e)
                }
            })
            .collect();
        applied.push(Section::Expenses);
    }
    if let Some(entries) = field(&doc, Section::Entries, origin, errs) {
        state.entries = entries;
        applied.push(Section::Entries);
    }
    if let Some(habits) = field::<Habits>(&doc, Section::Habits, origin, errs) {
        check_chains(&habits, origin, errs);
        state.habits = habits;
        applied.push(Section::Habits);
    }
    if let Some(deadlines) = field(&doc, Section::Deadlines, origin, errs) {
        state.deadlines = deadlines;
        applied.push(Section::Deadlines);
    }
    match doc.get(Section::Skills.key()) {
        Some(raw) => match normalize_skills(raw, origin, errs) {
            Some(skills) => {
                state.skills = skills;
                applied.push(Section::Skills);
            }
            None => {
                errs.make("Field ignored")
                    .nonfatal()
                    .field(origin, Section::Skills.key())
                    .text("expected a list of skills")
                    .hint("current skills were kept");
            }
        },
        None => {
            errs.make("Field missing")
                .nonfatal()
                .field(origin, Section::Skills.key())
                .hint("current skills were kept");
        }
    }
    tracing::info!(origin, applied = applied.len(), "backup imported");
    Ok(applied)
}

pub fn import_from<P>(
    state: &mut AppState,
    path: P,
    errs: &mut Record,
) -> Result<Vec<Section>, BackupError>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| BackupError::Io {
        path: path.display().to_string(),
        source,
    })?;
    import(state, &text, &path.display().to_string(), errs)
}
