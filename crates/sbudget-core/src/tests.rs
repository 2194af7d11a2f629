use chrono::NaiveDate;

use crate::{
    budget_service::{BudgetService, BudgetStatus},
    history_service::HistoryService,
    record_store::RecordStore,
    savings_service::SavingsService,
    storage::MemoryStore,
    CoreError,
};
use sbudget_domain::{
    BudgetGoal, DistributionEntry, Month, SavingsDistribution, Transaction,
};

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

fn three_goals() -> Vec<DistributionEntry> {
    vec![
        DistributionEntry::new("Emergency", 50),
        DistributionEntry::new("Retirement", 30),
        DistributionEntry::new("Travel", 20),
    ]
}

#[test]
fn contribution_is_split_by_percentage() {
    let txns = vec![Transaction::savings(1000.0, june(1))];
    let report = SavingsService::allocate(&txns, &three_goals());

    let allocated: Vec<_> = report.goals.iter().map(|g| (g.goal_name.as_str(), g.allocated)).collect();
    assert_eq!(
        allocated,
        vec![("Emergency", 500.0), ("Retirement", 300.0), ("Travel", 200.0)]
    );
    assert!(report.goals.iter().all(|g| g.balance == g.allocated));
    assert_eq!(report.grand_total, 1000.0);
}

#[test]
fn withdrawal_reduces_only_its_goal() {
    let txns = vec![
        Transaction::savings(1000.0, june(1)),
        Transaction::savings_expenditure(150.0, "Medico", june(2), "Emergency"),
    ];
    let report = SavingsService::allocate(&txns, &three_goals());
    assert_eq!(report.goal("Emergency").unwrap().balance, 350.0);
    assert_eq!(report.goal("Retirement").unwrap().balance, 300.0);
    assert_eq!(report.goal("Travel").unwrap().balance, 200.0);
    assert_eq!(report.grand_total, 850.0);
}

#[test]
fn grand_total_equals_contributed_minus_goal_spend() {
    let amounts = [0.0, 12.5, 99.99, 1000.0, 4321.0];
    for (index, contributed) in amounts.iter().enumerate() {
        let mut txns = Vec::new();
        if *contributed > 0.0 {
            txns.push(Transaction::savings(*contributed, june(1)));
        }
        for (offset, goal) in ["Emergency", "Retirement", "Travel"].iter().enumerate() {
            let spend = (index * 7 + offset * 3) as f64;
            if spend > 0.0 {
                txns.push(Transaction::savings_expenditure(spend, "X", june(2), *goal));
            }
        }
        let report = SavingsService::allocate(&txns, &three_goals());
        let expected = report.total_contributed - report.total_spent();
        assert!(
            (report.grand_total - expected).abs() < 1e-9,
            "grand total {} != {} for contribution {contributed}",
            report.grand_total,
            expected
        );
    }
}

#[test]
fn budget_report_is_idempotent() {
    let goals = vec![BudgetGoal::new("Comida", 500.0).unwrap()];
    let txns = vec![
        Transaction::expense(120.0, "Comida", june(3)),
        Transaction::expense(60.0, "Transporte", june(4)),
        Transaction::savings(80.0, june(5)),
    ];
    let first = BudgetService::month_report(&txns, &goals, Month::of(june(1)));
    let second = BudgetService::month_report(&txns, &goals, Month::of(june(1)));
    assert_eq!(first, second);
}

#[test]
fn zero_goal_with_spend_is_danger() {
    for spent in [0.01, 1.0, 250.0] {
        let txns = vec![Transaction::expense(spent, "Mascotas", june(8))];
        let goals = vec![BudgetGoal::new("Mascotas", 0.0).unwrap()];
        let report = BudgetService::month_report(&txns, &goals, Month::of(june(1)));
        assert_eq!(report.category("Mascotas").unwrap().status, BudgetStatus::Danger);
    }
}

#[test]
fn savings_expenditure_never_counts_as_real_spend() {
    let txns = vec![
        Transaction::expense(100.0, "Viajes", june(3)),
        Transaction::savings_expenditure(900.0, "Viajes", june(4), "Travel"),
    ];
    let goals = vec![BudgetGoal::new("Viajes", 200.0).unwrap()];
    let report = BudgetService::month_report(&txns, &goals, Month::of(june(1)));
    let viajes = report.category("Viajes").unwrap();
    assert_eq!(viajes.spent, 100.0);
    assert_eq!(viajes.status, BudgetStatus::Ok);
    assert_eq!(report.total_spent, 100.0);
}

#[test]
fn comida_warning_then_danger() {
    let goals = vec![BudgetGoal::new("Comida", 500.0).unwrap()];
    let warning = vec![
        Transaction::expense(300.0, "Comida", june(2)),
        Transaction::expense(150.0, "Comida", june(9)),
    ];
    let report = BudgetService::month_report(&warning, &goals, Month::of(june(1)));
    assert_eq!(report.category("Comida").unwrap().spent, 450.0);
    assert_eq!(report.category("Comida").unwrap().status, BudgetStatus::Warning);

    let danger = vec![
        Transaction::expense(300.0, "Comida", june(2)),
        Transaction::expense(220.0, "Comida", june(9)),
    ];
    let report = BudgetService::month_report(&danger, &goals, Month::of(june(1)));
    assert_eq!(report.category("Comida").unwrap().status, BudgetStatus::Danger);
}

#[test]
fn history_month_with_only_savings_activity() {
    let txns = vec![
        Transaction::savings(120.0, june(1)),
        Transaction::savings(80.0, june(15)),
        Transaction::savings_expenditure(50.0, "Regalo", june(20), "Travel"),
    ];
    let summary = HistoryService::month_summary(&txns, Month::of(june(1)));
    assert_eq!(summary.totals.operational_expenses, 0.0);
    assert_eq!(summary.totals.total_saved, 200.0);
    assert_eq!(summary.totals.savings_used, 50.0);
}

#[test]
fn rejected_distribution_leaves_prior_entries() {
    let records = RecordStore::open(MemoryStore::new()).unwrap();
    let before = records.list_distribution().unwrap();

    for total in [99u8, 101] {
        let attempt = SavingsDistribution::new(vec![
            DistributionEntry::new("Casa", 50),
            DistributionEntry::new("Auto", total - 50),
        ]);
        let err: CoreError = attempt.validate().unwrap_err().into();
        assert!(matches!(err, CoreError::DistributionTotal { actual } if actual == total as u32));
    }
    assert_eq!(records.list_distribution().unwrap(), before);
}
