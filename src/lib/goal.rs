//! The one-page plan: a goal for each time horizon

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::lib::date::Day;

/// Time frame of a goal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizon {
    Long = 0,
    Mid,
    Short,
}

impl Horizon {
    pub const COUNT: usize = 3;

    /// Long, mid, short: the order in which goals are always listed
    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).filter_map(Self::from_usize)
    }

    pub fn key(self) -> &'static str {
        use Horizon::*;
        match self {
            Long => "long",
            Mid => "mid",
            Short => "short",
        }
    }

    pub fn label(self) -> &'static str {
        use Horizon::*;
        match self {
            Long => "Long-term",
            Mid => "Mid-term",
            Short => "Short-term",
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    #[serde(default)]
    pub text: String,
    #[serde(default, with = "crate::lib::date::day_or_empty")]
    pub date: Option<Day>,
    #[serde(default)]
    pub purpose: String,
}

impl Goal {
    /// Build from form input, trimming text fields
    pub fn new(text: &str, date: Option<Day>, purpose: &str) -> Self {
        Self {
            text: text.trim().to_string(),
            date,
            purpose: purpose.trim().to_string(),
        }
    }

    /// A goal without text is an empty slot of the plan
    pub fn is_defined(&self) -> bool {
        !self.text.is_empty()
    }
}

/// Exactly one goal slot per horizon
///
/// The plan is only ever replaced as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub long: Goal,
    #[serde(default)]
    pub mid: Goal,
    #[serde(default)]
    pub short: Goal,
}

impl Plan {
    pub fn get(&self, horizon: Horizon) -> &Goal {
        match horizon {
            Horizon::Long => &self.long,
            Horizon::Mid => &self.mid,
            Horizon::Short => &self.short,
        }
    }

    pub fn get_mut(&mut self, horizon: Horizon) -> &mut Goal {
        match horizon {
            Horizon::Long => &mut self.long,
            Horizon::Mid => &mut self.mid,
            Horizon::Short => &mut self.short,
        }
    }

    /// Goals that have text, in horizon order
    pub fn defined(&self) -> impl Iterator<Item = (Horizon, &Goal)> {
        Horizon::all()
            .map(move |h| (h, self.get(h)))
            .filter(|(_, g)| g.is_defined())
    }

    /// Whether `text` names one of the defined goals
    pub fn has_goal(&self, text: &str) -> bool {
        self.defined().any(|(_, g)| g.text == text)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn form_input_is_trimmed() {
        let g = Goal::new("  Buy a house ", None, " family ");
        assert_eq!(g.text, "Buy a house");
        assert_eq!(g.purpose, "family");
        assert!(g.is_defined());
        assert!(!Goal::new("   ", None, "").is_defined());
    }

    #[test]
    fn defined_in_horizon_order() {
        let plan = Plan {
            long: Goal::new("Retire early", None, ""),
            mid: Goal::default(),
            short: Goal::new("Run 5k", None, ""),
        };
        let defined = plan.defined().map(|(h, _)| h).collect::<Vec<_>>();
        assert_eq!(defined, vec![Horizon::Long, Horizon::Short]);
        assert!(plan.has_goal("Run 5k"));
        assert!(!plan.has_goal(""));
    }

    #[test]
    fn stored_shape() {
        let plan: Plan = serde_json::from_str(
            r#"{"long":{"text":"A","date":"2030-01-01","purpose":"p"},
                "mid":{"text":"","date":"","purpose":""}}"#,
        )
        .unwrap();
        assert_eq!(plan.long.date, NaiveDate::from_ymd_opt(2030, 1, 1));
        assert_eq!(plan.mid.date, None);
        assert_eq!(plan.short, Goal::default());
        let back = serde_json::to_value(&plan).unwrap();
        assert_eq!(back["mid"]["date"], "");
        assert_eq!(back["long"]["date"], "2030-01-01");
    }
}
