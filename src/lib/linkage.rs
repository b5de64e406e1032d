//! Which habits serve which goal of the plan

use crate::lib::{
    goal::{Goal, Horizon, Plan},
    habit::Habit,
};

/// A defined goal and the habits pointing at it
#[derive(Debug)]
pub struct Link<'s> {
    pub horizon: Horizon,
    pub goal: &'s Goal,
    pub habits: Vec<&'s Habit>,
}

/// One link per defined goal, in horizon order
///
/// A habit is linked when its goal reference is exactly the goal text.
/// Independent habits never appear, completed ones do.
pub fn link<'s>(plan: &'s Plan, habits: &'s [Habit]) -> Vec<Link<'s>> {
    plan.defined()
        .map(|(horizon, goal)| Link {
            horizon,
            goal,
            habits: habits
                .iter()
                .filter(|h| !h.is_independent() && h.goal == goal.text)
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::lib::habit::INDEPENDENT;

    #[test]
    fn exact_text_match() {
        let plan = Plan {
            long: Goal::new("Financial freedom", None, ""),
            mid: Goal::new("Get fit", None, ""),
            short: Goal::default(),
        };
        let habits = vec![
            Habit::new("Run", "Get fit"),
            Habit::new("Budget", "Financial freedom"),
            Habit::new("Stretch", "get fit"),
            Habit::new("Meditate", INDEPENDENT),
            Habit::new("Swim", "Get fit"),
        ];
        let links = link(&plan, &habits);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].horizon, Horizon::Long);
        let names = |l: &Link| l.habits.iter().map(|h| h.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&links[0]), vec!["Budget"]);
        assert_eq!(names(&links[1]), vec!["Run", "Swim"]);
    }

    #[test]
    fn independent_goal_text_is_not_linked() {
        let plan = Plan {
            short: Goal::new(INDEPENDENT, None, ""),
            ..Plan::default()
        };
        let habits = vec![Habit::new("Read", INDEPENDENT)];
        let links = link(&plan, &habits);
        assert_eq!(links.len(), 1);
        assert!(links[0].habits.is_empty());
    }
}
