//! Screens printed by the shell commands.

use sbudget_config::Settings;
use sbudget_core::{BudgetReport, KeyValueStore, MonthSummary, SavingsReport};
use sbudget_domain::{BudgetGoal, DistributionEntry, Month, Transaction, TransactionType};

use super::{
    format::{labels, money, pad, percent, status_label},
    output,
};
use crate::app::{BudgetMode, Session, View};

const CATEGORY_WIDTH: usize = 18;
const AMOUNT_WIDTH: usize = 14;

/// Prints the screen for `view`.
pub fn view<S: KeyValueStore>(session: &Session<S>, view: View) {
    match view {
        View::Dashboard => dashboard(session.state().settings(), &session.dashboard(None)),
        View::Budget(BudgetMode::Menu) => budget_menu(session),
        View::Budget(BudgetMode::Goals) => goals(session.state().settings(), &session.planning_sheet()),
        View::Budget(BudgetMode::Distribution) => distribution(
            session.state().settings(),
            &session.state().snapshot().distribution,
        ),
        View::History { month } => history(session.state().settings(), &session.history(month)),
        View::AddTransaction { editing: None } => {
            output::hint("add <expense|savings> <amount> [category] [--sub <text>] [--note <text>] [--date YYYY-MM-DD] [--goal <savings goal>]");
        }
        View::AddTransaction { editing: Some(id) } => {
            if let Some(txn) = session.state().snapshot().transaction(id) {
                transaction_row(session.state().settings(), txn);
            }
            output::hint(format!(
                "edit {id} [--amount <n>] [--category <name>] [--sub <text>] [--note <text>] [--date YYYY-MM-DD] [--goal <name> | --no-goal]"
            ));
        }
        View::Savings => savings(session.state().settings(), &session.savings()),
        View::Settings => settings(session.state().settings()),
    }
}

pub fn dashboard(settings: &Settings, report: &BudgetReport) {
    let text = labels(settings.language);
    output::section(format!("{} {}", text.dashboard, report.month));
    if report.is_empty() {
        output::info(text.no_data);
        return;
    }
    for row in &report.categories {
        let goal = if row.goal > 0.0 {
            money(settings, row.goal)
        } else {
            "-".to_string()
        };
        output::line(format!(
            "{} {} / {} {:>7}  {}",
            pad(&row.category, CATEGORY_WIDTH),
            pad_left(&money(settings, row.spent), AMOUNT_WIDTH),
            pad_left(&goal, AMOUNT_WIDTH),
            percent(row.share_percent),
            status_label(settings.language, row.status),
        ));
    }
    output::line(format!(
        "{}: {}",
        text.total_spent,
        money(settings, report.total_spent)
    ));
}

fn budget_menu<S: KeyValueStore>(session: &Session<S>) {
    let settings = session.state().settings();
    let snapshot = session.state().snapshot();
    let text = labels(settings.language);
    let configured = snapshot.budget_goals.iter().filter(|goal| goal.is_set()).count();
    output::section(text.goals);
    output::line(format!("{configured} categories with a monthly goal."));
    output::line(format!("{} savings goals.", snapshot.distribution.len()));
    output::hint("view budget goals | view budget distribution");
}

pub fn goals(settings: &Settings, sheet: &[BudgetGoal]) {
    output::section(labels(settings.language).goals);
    for goal in sheet {
        let amount = if goal.is_set() {
            money(settings, goal.monthly_goal_amount)
        } else {
            "-".to_string()
        };
        output::line(format!(
            "{} {}",
            pad(&goal.category, CATEGORY_WIDTH),
            pad_left(&amount, AMOUNT_WIDTH)
        ));
    }
}

pub fn distribution(settings: &Settings, entries: &[DistributionEntry]) {
    output::section(labels(settings.language).distribution);
    for entry in entries {
        output::line(format!(
            "{} {:>3}%",
            pad(&entry.goal_name, CATEGORY_WIDTH + 4),
            entry.percentage
        ));
    }
    let total: u32 = entries.iter().map(|entry| u32::from(entry.percentage)).sum();
    output::line(format!("{} {total:>3}%", pad("Total", CATEGORY_WIDTH + 4)));
}

pub fn savings(settings: &Settings, report: &SavingsReport) {
    let text = labels(settings.language);
    output::section(text.savings);
    output::line(format!(
        "{}: {}",
        text.total_contributed,
        money(settings, report.total_contributed)
    ));
    for goal in &report.goals {
        output::line(format!(
            "{} {:>3}%  {} - {} = {}",
            pad(&goal.goal_name, CATEGORY_WIDTH + 4),
            goal.percentage,
            pad_left(&money(settings, goal.allocated), AMOUNT_WIDTH),
            pad_left(&money(settings, goal.spent), AMOUNT_WIDTH),
            pad_left(&money(settings, goal.balance), AMOUNT_WIDTH),
        ));
    }
    for orphan in &report.orphaned_spend {
        output::warning(format!(
            "{} spent from `{}`, which is no longer a savings goal",
            money(settings, orphan.spent),
            orphan.goal_name
        ));
    }
    output::line(format!(
        "{}: {}",
        text.grand_total,
        money(settings, report.grand_total)
    ));
}

pub fn history(settings: &Settings, summary: &MonthSummary) {
    let text = labels(settings.language);
    output::section(format!("{} {}", text.history, summary.month));
    output::line(format!(
        "{}: {}",
        text.operational,
        money(settings, summary.totals.operational_expenses)
    ));
    output::line(format!(
        "{}: {}",
        text.saved,
        money(settings, summary.totals.total_saved)
    ));
    output::line(format!(
        "{}: {}",
        text.savings_used,
        money(settings, summary.totals.savings_used)
    ));
    transactions(settings, &summary.transactions);
}

pub fn transactions(settings: &Settings, txns: &[Transaction]) {
    let text = labels(settings.language);
    output::section(text.transactions);
    if txns.is_empty() {
        output::info(text.no_data);
        return;
    }
    for txn in txns {
        transaction_row(settings, txn);
    }
}

pub fn transaction_row(settings: &Settings, txn: &Transaction) {
    let id = txn.id.map(|id| format!("#{id}")).unwrap_or_default();
    let category = match &txn.subcategory {
        Some(sub) => format!("{} ({sub})", txn.category),
        None => txn.category.clone(),
    };
    let kind = match (txn.transaction_type(), txn.savings_goal_id()) {
        (TransactionType::Savings, _) => "savings".to_string(),
        (TransactionType::Expense, Some(goal)) => format!("from {goal}"),
        (TransactionType::Expense, None) => "expense".to_string(),
    };
    let mut row = format!(
        "{} {}  {} {}  [{kind}]",
        pad(&id, 6),
        txn.date,
        pad(&category, CATEGORY_WIDTH + 8),
        pad_left(&money(settings, txn.amount), AMOUNT_WIDTH),
    );
    if let Some(note) = &txn.note {
        row.push_str("  ");
        row.push_str(note);
    }
    output::line(row);
}

pub fn settings(settings: &Settings) {
    output::section(labels(settings.language).settings);
    output::line(format!("language          {}", settings.language));
    output::line(format!("currency          {}", settings.currency_symbol));
    output::line(format!(
        "dark-mode         {}",
        if settings.dark_mode { "on" } else { "off" }
    ));
    output::line(format!("retention         {} months", settings.retention_months));
    let exported = settings
        .last_export_date
        .map(|date| date.to_string())
        .unwrap_or_else(|| "never".into());
    output::line(format!("last export       {exported}"));
}

pub fn months(current: Month, months: &[(Month, usize)]) {
    output::section("Months");
    for (month, count) in months {
        let marker = if *month == current { "*" } else { " " };
        output::line(format!("{marker} {month}  {count:>4} transactions"));
    }
}

fn pad_left(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{text}", " ".repeat(width - len))
    }
}
