//! Monthly per-category spend against budget goals.

use std::{collections::HashMap, fmt};

use sbudget_domain::{
    goal_amount_for, BudgetGoal, Month, Transaction, SAVINGS_CATEGORY, SUGGESTED_CATEGORIES,
};

/// Spend above this fraction of the goal is flagged as a warning.
pub const WARNING_RATIO: f64 = 0.8;

/// Traffic-light classification of a category's spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BudgetStatus {
    Ok,
    Warning,
    Danger,
}

impl BudgetStatus {
    /// Classifies `spent` against `goal`. The reserved savings category is always `Ok`.
    pub fn classify(category: &str, spent: f64, goal: f64) -> Self {
        if category == SAVINGS_CATEGORY {
            return BudgetStatus::Ok;
        }
        if (goal == 0.0 && spent > 0.0) || spent > goal {
            BudgetStatus::Danger
        } else if spent > goal * WARNING_RATIO {
            BudgetStatus::Warning
        } else {
            BudgetStatus::Ok
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            BudgetStatus::Ok => "ok",
            BudgetStatus::Warning => "warning",
            BudgetStatus::Danger => "danger",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpend {
    pub category: String,
    pub spent: f64,
    pub goal: f64,
    pub status: BudgetStatus,
    /// Share of the month's total spend, 0–100.
    pub share_percent: f64,
    /// `spent / goal * 100` when a goal is set.
    pub utilization_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BudgetReport {
    pub month: Month,
    pub total_spent: f64,
    /// Sorted by descending spend.
    pub categories: Vec<CategorySpend>,
}

impl BudgetReport {
    pub fn category(&self, name: &str) -> Option<&CategorySpend> {
        self.categories.iter().find(|row| row.category == name)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

pub struct BudgetService;

impl BudgetService {
    /// Groups the month's real spend by category and classifies each against its goal.
    ///
    /// Savings expenditures are charged to the savings pool and never count as
    /// real spend here.
    pub fn month_report(transactions: &[Transaction], goals: &[BudgetGoal], month: Month) -> BudgetReport {
        let mut order: Vec<&str> = Vec::new();
        let mut totals: HashMap<&str, f64> = HashMap::new();
        for txn in transactions
            .iter()
            .filter(|txn| month.contains(txn.date) && !txn.is_savings_expenditure())
        {
            let entry = totals.entry(txn.category.as_str()).or_insert_with(|| {
                order.push(txn.category.as_str());
                0.0
            });
            *entry += txn.amount;
        }

        let total_spent: f64 = order.iter().map(|category| totals[category]).sum();
        let mut categories: Vec<CategorySpend> = order
            .into_iter()
            .map(|category| {
                let spent = totals[category];
                let goal = goal_amount_for(goals, category);
                CategorySpend {
                    category: category.to_string(),
                    spent,
                    goal,
                    status: BudgetStatus::classify(category, spent, goal),
                    share_percent: if total_spent > 0.0 {
                        spent / total_spent * 100.0
                    } else {
                        0.0
                    },
                    utilization_percent: (goal > 0.0).then(|| spent / goal * 100.0),
                }
            })
            .collect();
        categories.sort_by(|a, b| {
            b.spent
                .total_cmp(&a.spent)
                .then_with(|| a.category.cmp(&b.category))
        });

        BudgetReport {
            month,
            total_spent,
            categories,
        }
    }

    /// Merges stored goals with the suggested categories; categories without a
    /// stored goal read as `0`. Stored goals outside the suggestions follow in name order.
    pub fn planning_sheet(goals: &[BudgetGoal]) -> Vec<BudgetGoal> {
        let mut sheet: Vec<BudgetGoal> = SUGGESTED_CATEGORIES
            .iter()
            .map(|category| {
                goals
                    .iter()
                    .find(|goal| goal.category == *category)
                    .cloned()
                    .unwrap_or_else(|| BudgetGoal::unset(*category))
            })
            .collect();
        let mut extra: Vec<BudgetGoal> = goals
            .iter()
            .filter(|goal| !SUGGESTED_CATEGORIES.contains(&goal.category.as_str()))
            .cloned()
            .collect();
        extra.sort_by(|a, b| a.category.cmp(&b.category));
        sheet.extend(extra);
        sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn march() -> Month {
        Month::new(2024, 3).unwrap()
    }

    #[test]
    fn classify_boundaries() {
        assert_eq!(BudgetStatus::classify("Comida", 400.0, 500.0), BudgetStatus::Ok);
        assert_eq!(BudgetStatus::classify("Comida", 400.01, 500.0), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::classify("Comida", 500.0, 500.0), BudgetStatus::Warning);
        assert_eq!(BudgetStatus::classify("Comida", 500.01, 500.0), BudgetStatus::Danger);
        assert_eq!(BudgetStatus::classify("Comida", 0.01, 0.0), BudgetStatus::Danger);
        assert_eq!(BudgetStatus::classify("Comida", 0.0, 0.0), BudgetStatus::Ok);
        assert_eq!(BudgetStatus::classify(SAVINGS_CATEGORY, 900.0, 0.0), BudgetStatus::Ok);
    }

    #[test]
    fn report_only_considers_selected_month() {
        let txns = vec![
            Transaction::expense(100.0, "Comida", date(3, 2)),
            Transaction::expense(999.0, "Comida", date(2, 28)),
            Transaction::expense(50.0, "Salud", date(4, 1)),
        ];
        let report = BudgetService::month_report(&txns, &[], march());
        assert_eq!(report.categories.len(), 1);
        assert_eq!(report.total_spent, 100.0);
        assert_eq!(report.category("Comida").unwrap().status, BudgetStatus::Danger);
    }

    #[test]
    fn rows_sorted_by_descending_spend_with_shares() {
        let goals = vec![
            BudgetGoal::new("Comida", 300.0).unwrap(),
            BudgetGoal::new("Transporte", 100.0).unwrap(),
        ];
        let txns = vec![
            Transaction::expense(25.0, "Transporte", date(3, 1)),
            Transaction::expense(75.0, "Comida", date(3, 3)),
            Transaction::savings(100.0, date(3, 4)),
        ];
        let report = BudgetService::month_report(&txns, &goals, march());
        let names: Vec<_> = report.categories.iter().map(|row| row.category.as_str()).collect();
        assert_eq!(names, vec![SAVINGS_CATEGORY, "Comida", "Transporte"]);
        assert_eq!(report.total_spent, 200.0);
        let comida = report.category("Comida").unwrap();
        assert_eq!(comida.share_percent, 37.5);
        assert_eq!(comida.utilization_percent, Some(25.0));
        assert_eq!(report.category(SAVINGS_CATEGORY).unwrap().utilization_percent, None);
    }

    #[test]
    fn planning_sheet_fills_defaults_and_keeps_custom_goals() {
        let goals = vec![
            BudgetGoal::new("Comida", 500.0).unwrap(),
            BudgetGoal::new("Gimnasio", 30.0).unwrap(),
        ];
        let sheet = BudgetService::planning_sheet(&goals);
        assert_eq!(sheet.len(), SUGGESTED_CATEGORIES.len() + 1);
        assert_eq!(sheet[0], BudgetGoal::unset("Vivienda"));
        assert_eq!(sheet[1].monthly_goal_amount, 500.0);
        assert_eq!(sheet.last().unwrap().category, "Gimnasio");
    }
}
