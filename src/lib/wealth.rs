//! Net worth and wealth levels
//!
//! The level is decided by comparing total income to total expenses
//! first, and only then looking at passive income and net worth. The
//! rules overlap and the first one that matches wins, which is why a
//! large net worth alone does not lift an income that merely covers the
//! expenses.

use num_derive::FromPrimitive;
use std::fmt;

use crate::lib::entry::{Amount, EntryKind, Expense, LedgerEntry};

/// Net worth from which passive income covering expenses means freedom
pub const FREEDOM_NET_WORTH: f64 = 1_000_000.0;

/// Net worth of a tycoon
pub const TYCOON_NET_WORTH: f64 = 50_000_000.0;

/// Aggregated figures of the ledger
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    pub income: Amount,
    pub passive: Amount,
    pub asset: Amount,
    pub debt: Amount,
    pub expense: Amount,
}

impl Totals {
    pub fn tally(entries: &[LedgerEntry], expenses: &[Expense]) -> Self {
        let mut totals = Self::default();
        for entry in entries {
            *totals.of_mut(entry.kind) += entry.amount;
        }
        totals.expense = expenses.iter().map(|e| e.amount).sum();
        totals
    }

    pub fn of(&self, kind: EntryKind) -> Amount {
        match kind {
            EntryKind::Income => self.income,
            EntryKind::Passive => self.passive,
            EntryKind::Asset => self.asset,
            EntryKind::Debt => self.debt,
        }
    }

    fn of_mut(&mut self, kind: EntryKind) -> &mut Amount {
        match kind {
            EntryKind::Income => &mut self.income,
            EntryKind::Passive => &mut self.passive,
            EntryKind::Asset => &mut self.asset,
            EntryKind::Debt => &mut self.debt,
        }
    }

    /// Assets minus debts
    pub fn net_worth(&self) -> Amount {
        self.asset - self.debt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, FromPrimitive)]
pub enum WealthLevel {
    Struggle = 0,
    Stability,
    Growth,
    Freedom,
    Tycoon,
}

impl fmt::Display for WealthLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level {}", *self as u8)
    }
}

/// A wealth level and the texts that explain it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wealth {
    pub level: WealthLevel,
    pub label: &'static str,
    pub description: &'static str,
    pub next_goal: &'static str,
}

const STRUGGLE: Wealth = Wealth {
    level: WealthLevel::Struggle,
    label: "Financial Struggle",
    description: "Your income is less than your monthly expenses, or you have no income at all. \
                  You are living in a deficit, dependent on others or debt to survive.",
    next_goal: "Move from Level 0 to Level 1 by balancing your income and expenses.",
};

/// Reached when no other rule applies, e.g. income between one and two
/// times the expenses with a modest net worth
const STRUGGLE_FALLBACK: Wealth = Wealth {
    description: "Your income is less than your monthly expenses, or you have no income at all.",
    ..STRUGGLE
};

const STABILITY: Wealth = Wealth {
    level: WealthLevel::Stability,
    label: "Financial Stability",
    description: "Your income equals your expenses. You're surviving, but not saving.",
    next_goal: "Create a surplus and begin saving to move to Level 2.",
};

const GROWTH: Wealth = Wealth {
    level: WealthLevel::Growth,
    label: "Financial Growth",
    description: "Your income is double your expenses. You start saving and investing.",
    next_goal: "Use your savings wisely to generate passive income and progress to Level 3.",
};

const FREEDOM: Wealth = Wealth {
    level: WealthLevel::Freedom,
    label: "Financial Freedom",
    description: "Passive income covers your lifestyle. Net worth is $1 million or more. \
                  You no longer need to work for money.",
    next_goal: "Make this your mid-term life target, to achieve financial freedom.",
};

const TYCOON: Wealth = Wealth {
    level: WealthLevel::Tycoon,
    label: "Business Tycoon",
    description: "Massive wealth and global impact. You create change and influence society.",
    next_goal: "Combine wealth with purpose: use your influence to impact society.",
};

/// Map the totals to exactly one wealth level
pub fn classify(totals: &Totals) -> Wealth {
    let income = totals.income.0;
    let passive = totals.passive.0;
    let expense = totals.expense.0;
    let net_worth = totals.net_worth().0;
    if income < expense || income == 0.0 {
        STRUGGLE
    } else if income == expense {
        STABILITY
    } else if income >= 2.0 * expense {
        if passive >= expense && net_worth >= FREEDOM_NET_WORTH {
            FREEDOM
        } else {
            GROWTH
        }
    } else if net_worth >= TYCOON_NET_WORTH {
        TYCOON
    } else {
        STRUGGLE_FALLBACK
    }
}

#[cfg(test)]
mod test {
    use super::{WealthLevel::*, *};

    macro_rules! level {
        ( income $i:expr, expense $e:expr, passive $p:expr, asset $a:expr, debt $d:expr => $lvl:expr ) => {{
            let totals = Totals {
                income: Amount($i),
                expense: Amount($e),
                passive: Amount($p),
                asset: Amount($a),
                debt: Amount($d),
            };
            assert_eq!(classify(&totals).level, $lvl, "{:?}", totals);
        }};
    }

    #[test]
    fn balanced_is_stability() {
        level!(income 1000.0, expense 1000.0, passive 0.0, asset 0.0, debt 0.0 => Stability);
        level!(income 1000.0, expense 1000.0, passive 5000.0, asset 9e9, debt 0.0 => Stability);
        level!(income 1000.0, expense 1000.0, passive 0.0, asset 0.0, debt 9e9 => Stability);
    }

    #[test]
    fn freedom_boundary() {
        level!(income 2000.0, expense 1000.0, passive 1000.0, asset 1_000_000.0, debt 0.0 => Freedom);
        level!(income 2000.0, expense 1000.0, passive 999.0, asset 1_000_000.0, debt 0.0 => Growth);
        level!(income 2000.0, expense 1000.0, passive 1000.0, asset 1_000_000.0, debt 1.0 => Growth);
        level!(income 1999.0, expense 1000.0, passive 1000.0, asset 1_000_000.0, debt 0.0 => Struggle);
    }

    #[test]
    fn struggle() {
        level!(income 0.0, expense 0.0, passive 0.0, asset 0.0, debt 0.0 => Struggle);
        level!(income 0.0, expense 0.0, passive 0.0, asset 1e9, debt 0.0 => Struggle);
        level!(income 500.0, expense 1000.0, passive 0.0, asset 1e9, debt 0.0 => Struggle);
    }

    #[test]
    fn tycoon_only_between_one_and_two_times() {
        level!(income 1500.0, expense 1000.0, passive 0.0, asset 50_000_000.0, debt 0.0 => Tycoon);
        level!(income 1500.0, expense 1000.0, passive 0.0, asset 50_000_000.0, debt 1.0 => Struggle);
        level!(income 3000.0, expense 1000.0, passive 0.0, asset 60_000_000.0, debt 0.0 => Growth);
    }

    #[test]
    fn negative_inputs_still_classified() {
        level!(income 100.0, expense -50.0, passive 0.0, asset 0.0, debt 0.0 => Growth);
        level!(income -10.0, expense -20.0, passive -20.0, asset 0.0, debt -1e6 => Freedom);
        level!(income -10.0, expense -5.0, passive 0.0, asset 0.0, debt 0.0 => Struggle);
    }

    #[test]
    fn fallback_has_its_own_description() {
        let totals = Totals {
            income: Amount(1500.0),
            expense: Amount(1000.0),
            ..Totals::default()
        };
        let wealth = classify(&totals);
        assert_eq!(wealth.label, STRUGGLE.label);
        assert_ne!(wealth.description, STRUGGLE.description);
        assert_eq!(wealth.level.to_string(), "Level 0");
    }

    #[test]
    fn tally_by_kind() {
        let entry = |amount, kind| LedgerEntry {
            name: "x".to_string(),
            amount: Amount(amount),
            kind,
            category: String::new(),
        };
        let entries = vec![
            entry(3000.0, EntryKind::Income),
            entry(200.0, EntryKind::Passive),
            entry(1000.0, EntryKind::Income),
            entry(50_000.0, EntryKind::Asset),
            entry(20_000.0, EntryKind::Debt),
        ];
        let expenses = vec![
            Expense { name: "rent".to_string(), amount: Amount(1200.0) },
            Expense { name: "food".to_string(), amount: Amount(300.0) },
        ];
        let totals = Totals::tally(&entries, &expenses);
        assert_eq!(totals.of(EntryKind::Income), Amount(4000.0));
        assert_eq!(totals.passive, Amount(200.0));
        assert_eq!(totals.expense, Amount(1500.0));
        assert_eq!(totals.net_worth(), Amount(30_000.0));
        assert_eq!(classify(&totals).level, Growth);
    }
}
