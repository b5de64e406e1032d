//! Persistence of the tracked data
//!
//! Data lives in a key-value `Store` of JSON values, one key per section
//! plus the PIN digest. Reading a section is forgiving: whatever cannot
//! be understood is reported as a warning and replaced by an empty
//! section, so that one damaged list never prevents using the others.

pub mod backup;
pub mod error;
pub mod pin;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use crate::lib::{
    habit::Habits,
    skill::Skill,
    state::{AppState, Section},
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cannot access '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("'{}' is not a data file: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("cannot encode '{key}': {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Key-value persistence of JSON values
///
/// Writes are immediate and the last one wins.
pub trait Store {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Several writes that are kept or lost together
    fn set_many(&mut self, values: Vec<(&'static str, Value)>) -> Result<(), StoreError> {
        for (key, value) in values {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// Store that forgets everything when dropped
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: BTreeMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.data.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.data.remove(key);
        Ok(())
    }
}

/// Store kept as a single JSON object in a file
///
/// The whole file is rewritten after every change, through a temporary
/// file in the same directory so that an interrupted write never leaves
/// a truncated data file behind.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    data: Map<String, Value>,
}

impl FileStore {
    /// Open the data file, a missing file is an empty store
    pub fn open<P>(path: P) -> Result<Self, StoreError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref().to_path_buf();
        let data = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => Map::new(),
            Ok(contents) => serde_json::from_str(&contents).map_err(|source| {
                StoreError::Corrupt {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no data file yet, starting empty");
                Map::new()
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        Ok(Self { path, data })
    }

    fn flush(&self) -> Result<(), StoreError> {
        let io = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        let text = serde_json::to_string_pretty(&self.data).map_err(|source| {
            StoreError::Encode {
                key: "store",
                source,
            }
        })?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, text).map_err(io)?;
        fs::rename(&tmp, &self.path).map_err(io)?;
        tracing::trace!(path = %self.path.display(), "data file written");
        Ok(())
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.data.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.data.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.data.remove(key).is_some() {
            self.flush()
        } else {
            Ok(())
        }
    }

    fn set_many(&mut self, values: Vec<(&'static str, Value)>) -> Result<(), StoreError> {
        let before = self.data.clone();
        for (key, value) in values {
            self.data.insert(key.to_string(), value);
        }
        self.flush().map_err(|e| {
            self.data = before;
            e
        })
    }
}

/// Read one section, falling back to its default if absent or unreadable
fn read<T, S>(store: &S, section: Section, errs: &mut error::Record) -> T
where
    T: DeserializeOwned + Default,
    S: Store + ?Sized,
{
    let value = match store.get(section.key()) {
        Some(value) => value,
        None => return T::default(),
    };
    match serde_json::from_value(value) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(key = section.key(), error = %e, "unreadable section");
            errs.make("Unreadable data")
                .nonfatal()
                .field("store", section.key())
                .text(e)
                .hint(format!("{} will start empty and be overwritten on the next change", section));
            T::default()
        }
    }
}

/// Skills are normalized one by one, older records lack progress and notes
pub(crate) fn normalize_skills(
    raw: &Value,
    origin: &str,
    errs: &mut error::Record,
) -> Option<Vec<Skill>> {
    let items = raw.as_array()?;
    let mut skills = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        match Skill::normalize(item) {
            Some(skill) => skills.push(skill),
            None => {
                errs.make("Skill dropped")
                    .nonfatal()
                    .field(origin, format!("skills[{}]", i))
                    .text("a skill needs at least a name");
            }
        }
    }
    Some(skills)
}

/// At most one habit may be in its first 21 days
pub(crate) fn check_chains(habits: &Habits, origin: &str, errs: &mut error::Record) {
    let active = habits.count_active();
    if active > 1 {
        tracing::warn!(origin, active, "several active chains");
        errs.make("Several active chains")
            .nonfatal()
            .field(origin, Section::Habits.key())
            .text(format!("{} habits are in their first 21 days at the same time", active))
            .hint("new chains stay blocked until all of them pass 21 days");
    }
}

/// Build the state from whatever the store holds
pub fn load_state<S>(store: &S, errs: &mut error::Record) -> AppState
where
    S: Store + ?Sized,
{
    let skills = match store.get(Section::Skills.key()) {
        None => Vec::new(),
        Some(raw) => normalize_skills(&raw, "store", errs).unwrap_or_else(|| {
            errs.make("Unreadable data")
                .nonfatal()
                .field("store", Section::Skills.key())
                .text("expected a list of skills");
            Vec::new()
        }),
    };
    let state = AppState {
        plan: read(store, Section::Goals, errs),
        expenses: read(store, Section::Expenses, errs),
        entries: read(store, Section::Entries, errs),
        skills,
        habits: read::<Habits, _>(store, Section::Habits, errs),
        deadlines: read(store, Section::Deadlines, errs),
    };
    check_chains(&state.habits, "store", errs);
    tracing::debug!(
        expenses = state.expenses.len(),
        entries = state.entries.len(),
        skills = state.skills.len(),
        habits = state.habits.len(),
        deadlines = state.deadlines.len(),
        "state loaded"
    );
    state
}

/// JSON value of a section as it is stored and backed up
pub fn encode(state: &AppState, section: Section) -> Result<Value, StoreError> {
    let value = match section {
        Section::Goals => serde_json::to_value(&state.plan),
        Section::Expenses => serde_json::to_value(&state.expenses),
        Section::Entries => serde_json::to_value(&state.entries),
        Section::Skills => serde_json::to_value(&state.skills),
        Section::Habits => serde_json::to_value(&state.habits),
        Section::Deadlines => serde_json::to_value(&state.deadlines),
    };
    value.map_err(|source| StoreError::Encode {
        key: section.key(),
        source,
    })
}

/// Persist one section after it was changed
pub fn save<S>(store: &mut S, state: &AppState, section: Section) -> Result<(), StoreError>
where
    S: Store + ?Sized,
{
    let value = encode(state, section)?;
    store.set(section.key(), value)?;
    tracing::debug!(key = section.key(), "section saved");
    Ok(())
}

/// Persist several sections in a single write
///
/// Every section is encoded before anything is written, so either all of
/// them reach the store or none does.
pub fn save_all<S>(store: &mut S, state: &AppState, sections: &[Section]) -> Result<(), StoreError>
where
    S: Store + ?Sized,
{
    let values = sections
        .iter()
        .map(|&section| Ok((section.key(), encode(state, section)?)))
        .collect::<Result<Vec<_>, StoreError>>()?;
    store.set_many(values)?;
    tracing::debug!(sections = sections.len(), "sections saved");
    Ok(())
}
