use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sbudget_core::{BudgetService, HistoryService, SavingsService};
use sbudget_domain::{default_distribution, BudgetGoal, Month, Transaction, SUGGESTED_CATEGORIES};

fn build_transactions(count: usize) -> Vec<Transaction> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let goals = default_distribution();
    (0..count)
        .map(|idx| {
            let date = start + Duration::days((idx % 365) as i64);
            let amount = 10.0 + (idx % 90) as f64;
            match idx % 10 {
                0 => Transaction::savings(amount * 5.0, date),
                1 => Transaction::savings_expenditure(
                    amount,
                    "Viajes",
                    date,
                    goals[idx % goals.len()].goal_name.clone(),
                ),
                _ => Transaction::expense(
                    amount,
                    SUGGESTED_CATEGORIES[idx % SUGGESTED_CATEGORIES.len()],
                    date,
                ),
            }
        })
        .collect()
}

fn bench_aggregators(c: &mut Criterion) {
    let transactions = build_transactions(20_000);
    let goals: Vec<BudgetGoal> = SUGGESTED_CATEGORIES
        .iter()
        .map(|category| BudgetGoal::new(*category, 400.0).unwrap())
        .collect();
    let distribution = default_distribution();
    let month = Month::new(2025, 6).unwrap();

    c.bench_function("budget_month_report_20k", |b| {
        b.iter(|| BudgetService::month_report(black_box(&transactions), &goals, month))
    });
    c.bench_function("savings_allocate_20k", |b| {
        b.iter(|| SavingsService::allocate(black_box(&transactions), &distribution))
    });
    c.bench_function("history_month_summary_20k", |b| {
        b.iter(|| HistoryService::month_summary(black_box(&transactions), month))
    });
}

criterion_group!(benches, bench_aggregators);
criterion_main!(benches);
