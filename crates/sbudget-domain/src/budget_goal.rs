//! Monthly spending ceilings keyed by category.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Categories offered on the planning sheet even before a goal is stored.
pub const SUGGESTED_CATEGORIES: [&str; 11] = [
    "Vivienda",
    "Comida",
    "Transporte",
    "Servicios",
    "Entretenimiento",
    "Salud",
    "Educación",
    "Ropa",
    "Mascotas",
    "Deudas",
    "Otros",
];

/// A monthly budget goal. An amount of `0` means no budget is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetGoal {
    pub category: String,
    pub monthly_goal_amount: f64,
}

impl BudgetGoal {
    pub fn new(category: impl Into<String>, monthly_goal_amount: f64) -> Result<Self, BudgetGoalError> {
        let category = category.into();
        if category.trim().is_empty() {
            return Err(BudgetGoalError::EmptyCategory);
        }
        if !monthly_goal_amount.is_finite() || monthly_goal_amount < 0.0 {
            return Err(BudgetGoalError::InvalidAmount(monthly_goal_amount));
        }
        Ok(Self {
            category,
            monthly_goal_amount,
        })
    }

    /// A zero-valued placeholder for a category without a stored goal.
    pub fn unset(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            monthly_goal_amount: 0.0,
        }
    }

    pub fn is_set(&self) -> bool {
        self.monthly_goal_amount > 0.0
    }
}

/// Looks up the goal amount for `category`, defaulting to `0`.
pub fn goal_amount_for(goals: &[BudgetGoal], category: &str) -> f64 {
    goals
        .iter()
        .find(|goal| goal.category == category)
        .map(|goal| goal.monthly_goal_amount)
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, PartialEq)]
pub enum BudgetGoalError {
    EmptyCategory,
    InvalidAmount(f64),
}

impl fmt::Display for BudgetGoalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BudgetGoalError::EmptyCategory => f.write_str("budget goal category cannot be empty"),
            BudgetGoalError::InvalidAmount(amount) => {
                write!(f, "monthly goal must be a non-negative amount, got {amount}")
            }
        }
    }
}

impl std::error::Error for BudgetGoalError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_negative_and_non_finite_amounts() {
        assert!(BudgetGoal::new("Comida", -1.0).is_err());
        assert!(BudgetGoal::new("Comida", f64::NAN).is_err());
        assert!(BudgetGoal::new("  ", 10.0).is_err());
        assert!(BudgetGoal::new("Comida", 0.0).is_ok());
    }

    #[test]
    fn missing_goal_defaults_to_zero() {
        let goals = vec![BudgetGoal::new("Comida", 500.0).unwrap()];
        assert_eq!(goal_amount_for(&goals, "Comida"), 500.0);
        assert_eq!(goal_amount_for(&goals, "Salud"), 0.0);
    }

    #[test]
    fn serializes_with_snake_case_amount_field() {
        let goal = BudgetGoal::new("Comida", 500.0).unwrap();
        let value = serde_json::to_value(&goal).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "category": "Comida", "monthly_goal_amount": 500.0 })
        );
        let back: BudgetGoal = serde_json::from_value(value).unwrap();
        assert_eq!(back, goal);
    }
}
