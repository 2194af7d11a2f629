//! Fan-out of savings contributions across the distribution goals.

use std::collections::BTreeMap;

use tracing::warn;

use sbudget_domain::{total_amount, DistributionEntry, Transaction};

/// Allocation, spend and balance of one savings goal.
#[derive(Debug, Clone, PartialEq)]
pub struct GoalBalance {
    pub goal_name: String,
    pub percentage: u8,
    pub allocated: f64,
    pub spent: f64,
    /// `allocated - spent`; negative when the goal is over-withdrawn.
    pub balance: f64,
}

/// Savings spend whose goal is not part of the current distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct OrphanedSpend {
    pub goal_name: String,
    pub spent: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SavingsReport {
    pub total_contributed: f64,
    pub goals: Vec<GoalBalance>,
    /// Sum of every goal balance.
    pub grand_total: f64,
    pub orphaned_spend: Vec<OrphanedSpend>,
}

impl SavingsReport {
    pub fn goal(&self, goal_name: &str) -> Option<&GoalBalance> {
        self.goals.iter().find(|goal| goal.goal_name == goal_name)
    }

    pub fn total_spent(&self) -> f64 {
        self.goals.iter().map(|goal| goal.spent).sum()
    }

    /// Spend drawn against goals that no longer exist.
    pub fn unallocated_spent(&self) -> f64 {
        self.orphaned_spend.iter().map(|orphan| orphan.spent).sum()
    }

    /// What remains of the pool once orphaned spend is also deducted.
    pub fn net_available(&self) -> f64 {
        self.grand_total - self.unallocated_spent()
    }
}

pub struct SavingsService;

impl SavingsService {
    /// Sums every savings contribution.
    pub fn total_contributed(transactions: &[Transaction]) -> f64 {
        total_amount(transactions.iter().filter(|txn| txn.is_savings_contribution()))
    }

    /// Computes per-goal allocation and balance from the full transaction list.
    ///
    /// Spend referencing a goal outside `distribution` is reported in
    /// `orphaned_spend` and left out of `grand_total`.
    pub fn allocate(transactions: &[Transaction], distribution: &[DistributionEntry]) -> SavingsReport {
        let total_contributed = Self::total_contributed(transactions);

        let mut spent_by_goal: BTreeMap<&str, f64> = BTreeMap::new();
        for txn in transactions {
            if let Some(goal) = txn.savings_goal_id() {
                *spent_by_goal.entry(goal).or_insert(0.0) += txn.amount;
            }
        }

        let goals: Vec<GoalBalance> = distribution
            .iter()
            .map(|entry| {
                let allocated = total_contributed * f64::from(entry.percentage) / 100.0;
                let spent = spent_by_goal
                    .remove(entry.goal_name.as_str())
                    .unwrap_or(0.0);
                GoalBalance {
                    goal_name: entry.goal_name.clone(),
                    percentage: entry.percentage,
                    allocated,
                    spent,
                    balance: allocated - spent,
                }
            })
            .collect();

        let orphaned_spend: Vec<OrphanedSpend> = spent_by_goal
            .into_iter()
            .map(|(goal_name, spent)| {
                warn!(goal = goal_name, spent, "savings spend references an unknown goal");
                OrphanedSpend {
                    goal_name: goal_name.to_string(),
                    spent,
                }
            })
            .collect();

        let grand_total = goals.iter().map(|goal| goal.balance).sum();
        SavingsReport {
            total_contributed,
            goals,
            grand_total,
            orphaned_spend,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sbudget_domain::default_distribution;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn no_contributions_yield_negative_balances_for_spend() {
        let txns = vec![Transaction::savings_expenditure(40.0, "Viajes", day(), "Retiro")];
        let report = SavingsService::allocate(&txns, &default_distribution());
        let retiro = report.goal("Retiro").unwrap();
        assert_eq!(retiro.allocated, 0.0);
        assert_eq!(retiro.balance, -40.0);
        assert_eq!(report.grand_total, -40.0);
    }

    #[test]
    fn empty_distribution_has_zero_grand_total() {
        let txns = vec![Transaction::savings(1000.0, day())];
        let report = SavingsService::allocate(&txns, &[]);
        assert_eq!(report.total_contributed, 1000.0);
        assert_eq!(report.grand_total, 0.0);
        assert!(report.goals.is_empty());
    }

    #[test]
    fn orphaned_spend_is_reported_separately() {
        let txns = vec![
            Transaction::savings(100.0, day()),
            Transaction::savings_expenditure(30.0, "Auto", day(), "Carro Viejo"),
        ];
        let report = SavingsService::allocate(&txns, &default_distribution());
        assert_eq!(report.grand_total, 100.0);
        assert_eq!(
            report.orphaned_spend,
            vec![OrphanedSpend {
                goal_name: "Carro Viejo".into(),
                spent: 30.0
            }]
        );
        assert_eq!(report.net_available(), 70.0);
    }

    #[test]
    fn operational_expenses_do_not_touch_savings() {
        let txns = vec![
            Transaction::savings(200.0, day()),
            Transaction::expense(75.0, "Comida", day()),
        ];
        let report = SavingsService::allocate(&txns, &default_distribution());
        assert_eq!(report.total_spent(), 0.0);
        assert_eq!(report.grand_total, 200.0);
    }
}
