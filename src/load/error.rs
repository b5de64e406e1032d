//! Pretty-printing facility for error messages
//!
//! Every problem worth telling the user about, from a refused habit
//! check-in to a skipped field of a backup, becomes a labelled report
//! with optional locations, notes and hints. Reports are aggregated in a
//! `Record` and printed together with colored output.
//!
//! # Example
//!
//! ```rust
//! errs.make("Field ignored")
//!     .nonfatal()
//!     .field("backup.json", "skills")
//!     .text("expected a list of skills")
//!     .hint("current skills were kept")
//! ```
//!
//! ```txt
//! --> Warning: Field ignored
//!  |  --> backup.json: skills
//!  |  expected a list of skills
//!  |      ? hint: current skills were kept
//! ```

use std::fmt;

/// Report for a single error
///
/// All messages (`label` passed with `make`, arguments of `hint`
/// and `text`) should fit in a single line.
///
/// ```rust
/// // NO
/// errs.make("Fatal failure\ngeneral message\nspanning several lines\nhint to fix")
///
/// // YES
/// errs.make("Fatal failure")
///     .text("general message")
///     .text("spanning several lines")
///     .hint("hint to fix")
/// ```
#[must_use]
#[derive(Debug)]
pub struct Error {
    /// determines the error label (warning/error) and the color (yellow/red)
    fatal: bool,
    /// name of the error
    label: String,
    items: Vec<Item>,
}

/// Kinds of items that can be added to an error report
#[derive(Debug)]
enum Item {
    /// where the problem was found: a file and a field or index within it
    Field(String, String),
    /// important message
    Text(String),
    /// recommendations for fixes
    Hint(String),
}

/// A collection of errors
///
/// Typically to keep record of all errors detected during one command,
/// but the structure itself makes no assumption regarding the
/// relationship between these errors
#[must_use]
#[derive(Debug, Default)]
pub struct Record {
    contents: Vec<Error>,
}

impl Error {
    /// Create a new error
    pub fn new<S>(msg: S) -> Self
    where
        S: ToString,
    {
        Self {
            fatal: true,
            label: msg.to_string(),
            items: Vec::new(),
        }
    }

    /// Mark as a warning rather that a fatal error
    pub fn nonfatal(&mut self) -> &mut Self {
        self.fatal = false;
        self
    }

    /// Add the location of the problem
    pub fn field<S, T>(&mut self, origin: S, field: T) -> &mut Self
    where
        S: ToString,
        T: ToString,
    {
        self.items
            .push(Item::Field(origin.to_string(), field.to_string()));
        self
    }

    /// Add an important note
    pub fn text<S>(&mut self, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Text(msg.to_string()));
        self
    }

    /// Add a hint on how to fix
    pub fn hint<S>(&mut self, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Hint(msg.to_string()));
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Record {
    /// Initialize a new pool of errors
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if any of the recorded errors are fatal
    pub fn is_fatal(&self) -> bool {
        self.contents.iter().any(|e| e.fatal)
    }

    /// Number of fatal errors
    pub fn count_errors(&self) -> usize {
        self.contents.iter().filter(|e| e.fatal).count()
    }

    /// Number of nonfatal errors
    pub fn count_warnings(&self) -> usize {
        self.contents.len() - self.count_errors()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Add a new error to the pool
    pub fn make<S>(&mut self, msg: S) -> &mut Error
    where
        S: ToString,
    {
        self.contents.push(Error::new(msg));
        self.contents.last_mut().expect("just pushed")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Error> {
        self.contents.iter()
    }
}

const RED: &str = "\x1b[0;91;1m";
const YELLOW: &str = "\x1b[0;93;1m";
const BLUE: &str = "\x1b[0;96;1m";
const WHITE: &str = "\x1b[0;1m";
const NONE: &str = "\x1b[0m";

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (color, header) = if self.fatal {
            (RED, "--> Error")
        } else {
            (YELLOW, "--> Warning")
        };
        writeln!(f, "{}{}:{} {}{}", color, header, WHITE, self.label, NONE)?;
        for item in &self.items {
            match item {
                Item::Field(origin, field) => {
                    writeln!(f, " {}|  {}--> {}{}: {}", color, BLUE, origin, NONE, field)?;
                }
                Item::Text(txt) => {
                    writeln!(f, " {}|  {}{}{}", color, WHITE, txt, NONE)?;
                }
                Item::Hint(txt) => {
                    writeln!(f, " {}|      {}? hint: {}{}", color, BLUE, NONE, txt)?;
                }
            }
        }
        Ok(())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contents.is_empty() {
            return Ok(());
        }
        let fatal = self.is_fatal();
        let count = if fatal {
            self.count_errors()
        } else {
            self.count_warnings()
        };
        let color = if fatal { RED } else { YELLOW };
        let trunc = 10;
        for err in self
            .contents
            .iter()
            .filter(|err| err.fatal == fatal)
            .take(trunc)
        {
            // only print errors with the maximum fatality
            writeln!(f, "{}", err)?;
        }
        if count > trunc {
            writeln!(f, "{} And {} more.", color, count - trunc)?;
        }
        let plural = if count > 1 { "s" } else { "" };
        if fatal {
            writeln!(
                f,
                "{}Fatal: {}{} error{} emitted{}",
                color, WHITE, count, plural, NONE
            )?;
        } else {
            writeln!(
                f,
                "{}Nonfatal: {}{} warning{} emitted{}",
                color, WHITE, count, plural, NONE
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn counts() {
        let mut errs = Record::new();
        assert!(errs.is_empty() && !errs.is_fatal());
        errs.make("Field ignored").nonfatal().text("not a list");
        assert!(!errs.is_fatal());
        errs.make("Invalid backup file").field("b.json", "line 1");
        assert!(errs.is_fatal());
        assert_eq!((errs.count_errors(), errs.count_warnings()), (1, 1));
    }

    #[test]
    fn only_worst_reports_are_printed() {
        let mut errs = Record::new();
        errs.make("Field ignored").nonfatal();
        errs.make("Chain conflict").hint("finish it first");
        let out = errs.to_string();
        assert!(out.contains("Chain conflict"));
        assert!(out.contains("? hint: "));
        assert!(!out.contains("Field ignored"));
        assert!(out.contains("1 error emitted"));
    }

    #[test]
    fn truncated() {
        let mut errs = Record::new();
        for i in 0..12 {
            errs.make(format!("Skipped #{}", i)).nonfatal();
        }
        let out = errs.to_string();
        assert!(out.contains("And 2 more."));
        assert!(out.contains("12 warnings emitted"));
        assert!(!out.contains("Skipped #11"));
    }
}
