//! Text rendering of reports for the shell.

use sbudget_config::{Language, Settings};
use sbudget_core::BudgetStatus;

/// Localised labels for report headings.
#[derive(Debug, Clone, Copy)]
pub struct Labels {
    pub dashboard: &'static str,
    pub savings: &'static str,
    pub history: &'static str,
    pub goals: &'static str,
    pub distribution: &'static str,
    pub settings: &'static str,
    pub transactions: &'static str,
    pub total_spent: &'static str,
    pub total_contributed: &'static str,
    pub grand_total: &'static str,
    pub operational: &'static str,
    pub saved: &'static str,
    pub savings_used: &'static str,
    pub no_data: &'static str,
}

const SPANISH: Labels = Labels {
    dashboard: "Resumen del mes",
    savings: "Ahorros",
    history: "Historial",
    goals: "Metas de presupuesto",
    distribution: "Distribución de ahorro",
    settings: "Configuración",
    transactions: "Transacciones",
    total_spent: "Total gastado",
    total_contributed: "Total ahorrado",
    grand_total: "Disponible",
    operational: "Gastos operativos",
    saved: "Ahorrado",
    savings_used: "Ahorro usado",
    no_data: "Sin movimientos",
};

const ENGLISH: Labels = Labels {
    dashboard: "Monthly overview",
    savings: "Savings",
    history: "History",
    goals: "Budget goals",
    distribution: "Savings distribution",
    settings: "Settings",
    transactions: "Transactions",
    total_spent: "Total spent",
    total_contributed: "Total contributed",
    grand_total: "Available",
    operational: "Operational expenses",
    saved: "Saved",
    savings_used: "Savings used",
    no_data: "No activity",
};

pub fn labels(language: Language) -> &'static Labels {
    match language {
        Language::Es => &SPANISH,
        Language::En => &ENGLISH,
    }
}

/// Formats an amount with the configured currency symbol, e.g. `Q1,234.50`
/// or `-Q20.00`.
pub fn money(settings: &Settings, amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = group_thousands(cents / 100);
    format!("{sign}{}{whole}.{:02}", settings.currency_symbol, cents % 100)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

pub fn percent(value: f64) -> String {
    format!("{value:.1}%")
}

pub fn status_label(language: Language, status: BudgetStatus) -> &'static str {
    match (language, status) {
        (Language::Es, BudgetStatus::Ok) => "ok",
        (Language::Es, BudgetStatus::Warning) => "alerta",
        (Language::Es, BudgetStatus::Danger) => "excedido",
        (Language::En, BudgetStatus::Ok) => "ok",
        (Language::En, BudgetStatus::Warning) => "warning",
        (Language::En, BudgetStatus::Danger) => "over budget",
    }
}

/// Pads `text` to `width` characters, counting chars rather than bytes.
pub fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{text}{}", " ".repeat(width - len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_groups_thousands_and_keeps_sign() {
        let settings = Settings::default();
        assert_eq!(money(&settings, 1234.5), "Q1,234.50");
        assert_eq!(money(&settings, 0.0), "Q0.00");
        assert_eq!(money(&settings, -20.0), "-Q20.00");
        assert_eq!(money(&settings, 1_000_000.0), "Q1,000,000.00");
    }

    #[test]
    fn pad_counts_characters() {
        assert_eq!(pad("Educación", 11), "Educación  ");
        assert_eq!(pad("Vivienda", 3), "Vivienda");
    }

    #[test]
    fn labels_follow_language() {
        assert_eq!(labels(Language::En).savings, "Savings");
        assert_eq!(status_label(Language::Es, BudgetStatus::Danger), "excedido");
    }
}
