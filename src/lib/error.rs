//! Ways in which an operation on the tracked data can be refused
//!
//! None of these are fatal to the stored data: an operation that fails
//! leaves every collection exactly as it was.

use crate::lib::habit::Stage;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// a 21-day chain is already running
    #[error("'{active}' is still in its 21-day chain")]
    ChainConflict { active: String },
    /// empty name, unreadable amount, unknown kind, ...
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
    /// the habit is not in a stage that allows the action
    #[error("'{name}' is at the {stage} stage and cannot be {action}")]
    InvalidState {
        name: String,
        stage: Stage,
        action: &'static str,
    },
    /// another habit holds the active chain
    #[error("'{name}' is locked while '{active}' runs its 21-day chain")]
    Locked { name: String, active: String },
    /// index-addressed access past the end of a list
    #[error("there is no {list} #{}", .index + 1)]
    OutOfRange { list: &'static str, index: usize },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid<S>(field: &'static str, reason: S) -> Self
    where
        S: ToString,
    {
        Error::InvalidInput {
            field,
            reason: reason.to_string(),
        }
    }

    /// Short name of the kind of refusal
    pub fn label(&self) -> &'static str {
        use Error::*;
        match self {
            ChainConflict { .. } => "Chain conflict",
            InvalidInput { .. } => "Invalid input",
            InvalidState { .. } => "Invalid state",
            Locked { .. } => "Habit locked",
            OutOfRange { .. } => "No such item",
        }
    }

    /// What message to show to help the user get past the refusal
    pub fn fix_hint(&self) -> String {
        use Error::*;
        match self {
            ChainConflict { .. } => {
                "finish your current 21-day habit before starting a new one".to_string()
            }
            InvalidInput { field, .. } => format!("check the {} and try again", field),
            InvalidState { stage: Stage::Completed, .. } => {
                "completed habits can only be archived".to_string()
            }
            InvalidState { .. } => "only completed habits can be archived".to_string(),
            Locked { active, .. } => format!("check in on '{}' first", active),
            OutOfRange { list, .. } => format!("list the {}s to see valid numbers", list),
        }
    }
}
