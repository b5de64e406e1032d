//! Money: expenses and ledger entries

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};
use std::{fmt, iter, ops};

/// A sum of money
///
/// The currency is only a display concern and is never stored.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(pub f64);

impl Amount {
    /// Read an amount typed by the user, rejecting anything that is not a finite number
    pub fn parse(s: &str) -> Option<Self> {
        s.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(Amount)
    }

    /// Display with a currency prefix (`PKR 1,250`)
    pub fn with_currency(self, currency: &str) -> String {
        format!("{} {}", currency, self)
    }
}

/// Grouped thousands and at most two decimals: `1,234,567.5`
impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cents = (self.0 * 100.0).round() as i64;
        let sign = if cents < 0 { "-" } else { "" };
        let cents = cents.unsigned_abs();
        let digits = (cents / 100).to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        write!(f, "{}{}", sign, grouped)?;
        match cents % 100 {
            0 => Ok(()),
            frac if frac % 10 == 0 => write!(f, ".{}", frac / 10),
            frac => write!(f, ".{:02}", frac),
        }
    }
}

impl ops::Add for Amount {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Amount(self.0 + other.0)
    }
}

impl ops::Sub for Amount {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Amount(self.0 - other.0)
    }
}

impl ops::AddAssign for Amount {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl iter::Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::default(), |acc, a| acc + a)
    }
}

/// A recurring or one-off spending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub name: String,
    pub amount: Amount,
}

/// The four kinds of ledger entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Income = 0,
    Passive,
    Asset,
    Debt,
}

impl EntryKind {
    pub const COUNT: usize = 4;

    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).filter_map(Self::from_usize)
    }

    /// Name as stored and as typed on the command line
    pub fn name(self) -> &'static str {
        use EntryKind::*;
        match self {
            Income => "income",
            Passive => "passive",
            Asset => "asset",
            Debt => "debt",
        }
    }

    /// Case-insensitive inverse of `name`
    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::all().find(|k| k.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Income, passive income, asset or debt
///
/// Amounts are free: debts and assets may be entered with any sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub name: String,
    pub amount: Amount,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub category: String,
}

#[cfg(test)]
mod test {
    use super::*;

    macro_rules! shows {
        ( $v:expr => $s:expr ) => {
            assert_eq!(Amount($v).to_string(), $s)
        };
    }

    #[test]
    fn grouped_display() {
        shows!(0.0 => "0");
        shows!(999.0 => "999");
        shows!(1000.0 => "1,000");
        shows!(1234567.5 => "1,234,567.5");
        shows!(-42000.25 => "-42,000.25");
        shows!(0.05 => "0.05");
        shows!(12.999 => "13");
        assert_eq!(Amount(1500.0).with_currency("PKR"), "PKR 1,500");
    }

    #[test]
    fn user_amounts() {
        assert_eq!(Amount::parse("12.5"), Some(Amount(12.5)));
        assert_eq!(Amount::parse(" -3 "), Some(Amount(-3.0)));
        assert_eq!(Amount::parse("abc"), None);
        assert_eq!(Amount::parse("inf"), None);
        assert_eq!(Amount::parse("NaN"), None);
        assert_eq!(Amount::parse(""), None);
    }

    #[test]
    fn kinds_by_name() {
        assert_eq!(EntryKind::all().count(), EntryKind::COUNT);
        assert_eq!(EntryKind::from_name("Passive"), Some(EntryKind::Passive));
        assert_eq!(EntryKind::from_name("debt"), Some(EntryKind::Debt));
        assert_eq!(EntryKind::from_name("salary"), None);
    }

    #[test]
    fn entry_shape() {
        let entry: LedgerEntry =
            serde_json::from_str(r#"{"name":"Flat","amount":2500000,"type":"asset"}"#).unwrap();
        assert_eq!(entry.kind, EntryKind::Asset);
        assert_eq!(entry.category, "");
        let back = serde_json::to_value(&entry).unwrap();
        assert_eq!(back["type"], "asset");
        assert!(serde_json::from_str::<LedgerEntry>(
            r#"{"name":"x","amount":1,"type":"windfall"}"#
        )
        .is_err());
    }
}
