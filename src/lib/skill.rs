//! Skills with a percentage of progress and a log of notes

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Self-assessed proficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Level {
    const ALL: [Level; 4] = [
        Level::Beginner,
        Level::Intermediate,
        Level::Advanced,
        Level::Expert,
    ];

    /// Case-insensitive lookup by name
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|l| format!("{:?}", l).eq_ignore_ascii_case(s))
    }
}

impl Default for Level {
    fn default() -> Self {
        Level::Intermediate
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// free-form timestamp, as it was displayed when the note was taken
    pub date: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub category: String,
    pub level: Level,
    /// percentage, always in `0..=100`
    pub progress: u8,
    pub notes: Vec<Note>,
}

/// How many notes are shown for each skill
pub const RECENT_NOTES: usize = 3;

impl Skill {
    pub fn new(name: &str, category: &str, level: Level) -> Self {
        Self {
            name: name.trim().to_string(),
            category: category.trim().to_string(),
            level,
            progress: 0,
            notes: Vec::new(),
        }
    }

    /// Move progress by `delta` percentage points, clamped to `0..=100`
    pub fn bump(&mut self, delta: i32) -> u8 {
        self.progress = (self.progress as i32).saturating_add(delta).clamp(0, 100) as u8;
        self.progress
    }

    pub fn note(&mut self, text: &str, date: String) {
        self.notes.push(Note {
            date,
            text: text.trim().to_string(),
        });
    }

    /// Most recent notes first
    pub fn recent_notes(&self) -> impl Iterator<Item = &Note> {
        self.notes.iter().rev().take(RECENT_NOTES)
    }

    /// Next step to take, depending on the category and the progress
    pub fn suggestion(&self) -> &'static str {
        let steps = match self.category.to_lowercase().as_str() {
            "technical" => &TECHNICAL,
            "soft" => &SOFT,
            "language" => &LANGUAGE,
            "tool" => &TOOL,
            _ => &GENERAL,
        };
        match self.progress {
            0..=33 => steps[0],
            34..=66 => steps[1],
            _ => steps[2],
        }
    }

    /// Build a skill from a stored or imported record, filling in defaults
    ///
    /// Only the name is mandatory. A missing or non-numeric progress is 0,
    /// a numeric one is rounded and clamped; an unknown level is
    /// `Intermediate`; notes that are not a list are dropped, and so are
    /// list items that are not `{date, text}` pairs.
    pub fn normalize(raw: &Value) -> Option<Self> {
        let name = raw.get("name")?.as_str()?.to_string();
        let category = raw
            .get("category")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let level = raw
            .get("level")
            .and_then(Value::as_str)
            .and_then(Level::from_name)
            .unwrap_or_default();
        let progress = raw
            .get("progress")
            .and_then(Value::as_f64)
            .filter(|p| p.is_finite())
            .map(|p| p.round().clamp(0.0, 100.0) as u8)
            .unwrap_or(0);
        let notes = raw
            .get("notes")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|n| serde_json::from_value::<Note>(n.clone()).ok())
                    .collect()
            })
            .unwrap_or_default();
        Some(Self {
            name,
            category,
            level,
            progress,
            notes,
        })
    }
}

type Steps = [&'static str; 3];

const TECHNICAL: Steps = [
    "Complete a beginner course and build a mini project.",
    "Build 2 projects and read official docs; solve 10 coding challenges.",
    "Contribute to open-source and master advanced patterns.",
];
const SOFT: Steps = [
    "Practice a real scenario daily; request feedback.",
    "Join a meetup and role-play; record and review.",
    "Lead a session or mentor someone; refine clarity.",
];
const LANGUAGE: Steps = [
    "Daily vocab + listening for 15 minutes.",
    "2 conversations per week and daily journaling.",
    "Give a short talk; focus on idioms and precision.",
];
const TOOL: Steps = [
    "Learn top shortcuts and workflows.",
    "Automate a task or create a template.",
    "Build a plugin/toolkit and document best practices.",
];
const GENERAL: Steps = [
    "Define a clear outcome and weekly routine.",
    "Create a milestone project and get feedback.",
    "Publish work and perform a retrospective.",
];
