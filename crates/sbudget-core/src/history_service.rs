//! Month-by-month totals for the history view.

use chrono::NaiveDate;

use sbudget_domain::{Month, Transaction};

/// Number of months offered by the history month picker.
pub const HISTORY_MONTHS: usize = 12;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MonthTotals {
    /// Expenses paid from the regular budget.
    pub operational_expenses: f64,
    pub total_saved: f64,
    /// Expenses funded by drawing down savings goals.
    pub savings_used: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthSummary {
    pub month: Month,
    pub totals: MonthTotals,
    /// The month's transactions, newest first.
    pub transactions: Vec<Transaction>,
}

pub struct HistoryService;

impl HistoryService {
    /// Computes the three monthly totals in a single pass over the month's transactions.
    pub fn month_summary(transactions: &[Transaction], month: Month) -> MonthSummary {
        let mut totals = MonthTotals::default();
        let mut in_month = Vec::new();
        for txn in transactions.iter().filter(|txn| month.contains(txn.date)) {
            if txn.is_operational_expense() {
                totals.operational_expenses += txn.amount;
            }
            if txn.is_savings_contribution() {
                totals.total_saved += txn.amount;
            }
            if txn.is_savings_expenditure() {
                totals.savings_used += txn.amount;
            }
            in_month.push(txn.clone());
        }
        sort_newest_first(&mut in_month);
        MonthSummary {
            month,
            totals,
            transactions: in_month,
        }
    }

    /// The months selectable in the history view, newest first.
    pub fn available_months(today: NaiveDate) -> Vec<Month> {
        Month::recent(today, HISTORY_MONTHS)
    }
}

/// Orders transactions by date descending, newest id first within a day.
pub fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use sbudget_domain::TransactionId;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    #[test]
    fn operational_total_skips_savings_funded_expenses() {
        let txns = vec![
            Transaction::expense(80.0, "Comida", date(2)),
            Transaction::savings_expenditure(20.0, "Viajes", date(3), "Viajes/Gustos"),
            Transaction::savings(100.0, date(4)),
            Transaction::expense(500.0, "Comida", NaiveDate::from_ymd_opt(2024, 7, 31).unwrap()),
        ];
        let summary = HistoryService::month_summary(&txns, Month::of(date(1)));
        assert_eq!(summary.totals.operational_expenses, 80.0);
        assert_eq!(summary.totals.total_saved, 100.0);
        assert_eq!(summary.totals.savings_used, 20.0);
        assert_eq!(summary.transactions.len(), 3);
    }

    #[test]
    fn transactions_listed_newest_first() {
        let txns = vec![
            Transaction::expense(1.0, "A", date(1)).with_id(TransactionId(1)),
            Transaction::expense(2.0, "B", date(9)).with_id(TransactionId(2)),
            Transaction::expense(3.0, "C", date(9)).with_id(TransactionId(3)),
        ];
        let summary = HistoryService::month_summary(&txns, Month::of(date(1)));
        let ids: Vec<_> = summary.transactions.iter().filter_map(|t| t.id).collect();
        assert_eq!(ids, vec![TransactionId(3), TransactionId(2), TransactionId(1)]);
    }

    #[test]
    fn empty_month_has_zero_totals() {
        let summary = HistoryService::month_summary(&[], Month::of(date(1)));
        assert_eq!(summary.totals, MonthTotals::default());
        assert!(summary.transactions.is_empty());
    }
}
