//! Explicit, immutable application state.
//!
//! Every change produces a new [`AppState`]; collections are shared behind
//! `Arc` so swapping the view or the settings never copies the records.

use std::{fmt, str::FromStr, sync::Arc};

use sbudget_config::Settings;
use sbudget_core::history_service::sort_newest_first;
use sbudget_domain::{BudgetGoal, DistributionEntry, Month, Transaction, TransactionId};

use crate::errors::AppError;

/// Sub-screens of the budget view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BudgetMode {
    #[default]
    Menu,
    Goals,
    Distribution,
}

/// The screen the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Dashboard,
    Budget(BudgetMode),
    History {
        month: Option<Month>,
    },
    AddTransaction {
        editing: Option<TransactionId>,
    },
    Savings,
    Settings,
}

impl View {
    pub const NAMES: [&'static str; 6] = [
        "dashboard",
        "budget",
        "history",
        "add",
        "savings",
        "settings",
    ];
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Dashboard => f.write_str("dashboard"),
            View::Budget(BudgetMode::Menu) => f.write_str("budget"),
            View::Budget(BudgetMode::Goals) => f.write_str("budget/goals"),
            View::Budget(BudgetMode::Distribution) => f.write_str("budget/distribution"),
            View::History { month: Some(month) } => write!(f, "history/{month}"),
            View::History { month: None } => f.write_str("history"),
            View::AddTransaction { editing: Some(id) } => write!(f, "edit/#{id}"),
            View::AddTransaction { editing: None } => f.write_str("add"),
            View::Savings => f.write_str("savings"),
            View::Settings => f.write_str("settings"),
        }
    }
}

impl FromStr for View {
    type Err = AppError;

    /// Parses the shell spelling: `budget goals`, `history 2024-05`, `edit 12`, ...
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parts = input.split(|c: char| c.is_whitespace() || c == '/');
        let head = parts.next().unwrap_or_default().to_ascii_lowercase();
        let arg = parts.find(|part| !part.is_empty());
        let view = match (head.as_str(), arg) {
            ("dashboard" | "home", None) => View::Dashboard,
            ("budget", None | Some("menu")) => View::Budget(BudgetMode::Menu),
            ("budget", Some("goals")) => View::Budget(BudgetMode::Goals),
            ("budget", Some("distribution")) => View::Budget(BudgetMode::Distribution),
            ("history", None) => View::History { month: None },
            ("history", Some(month)) => View::History {
                month: Some(
                    month
                        .parse()
                        .map_err(|err: sbudget_domain::MonthParseError| {
                            AppError::InvalidInput(err.to_string())
                        })?,
                ),
            },
            ("add", None) => View::AddTransaction { editing: None },
            ("edit", Some(id)) => View::AddTransaction {
                editing: Some(parse_transaction_id(id)?),
            },
            ("savings", None) => View::Savings,
            ("settings", None) => View::Settings,
            _ => {
                return Err(AppError::InvalidInput(format!(
                    "unknown view `{}`",
                    input.trim()
                )))
            }
        };
        Ok(view)
    }
}

/// Parses `12` or `#12` into a transaction id.
pub fn parse_transaction_id(raw: &str) -> Result<TransactionId, AppError> {
    raw.trim()
        .trim_start_matches('#')
        .parse()
        .map(TransactionId)
        .map_err(|_| AppError::InvalidInput(format!("`{raw}` is not a transaction id")))
}

/// Records as last loaded from the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Newest first.
    pub transactions: Vec<Transaction>,
    pub budget_goals: Vec<BudgetGoal>,
    pub distribution: Vec<DistributionEntry>,
}

impl Snapshot {
    pub fn new(
        mut transactions: Vec<Transaction>,
        budget_goals: Vec<BudgetGoal>,
        distribution: Vec<DistributionEntry>,
    ) -> Self {
        sort_newest_first(&mut transactions);
        Self {
            transactions,
            budget_goals,
            distribution,
        }
    }

    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.id == Some(id))
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    settings: Arc<Settings>,
    snapshot: Arc<Snapshot>,
    view: View,
    deletion_alert: bool,
}

impl AppState {
    pub fn new(settings: Settings, snapshot: Snapshot) -> Self {
        Self {
            settings: Arc::new(settings),
            snapshot: Arc::new(snapshot),
            view: View::default(),
            deletion_alert: false,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn view(&self) -> View {
        self.view
    }

    /// `true` when old records expire soon and have not been exported recently.
    pub fn deletion_alert(&self) -> bool {
        self.deletion_alert
    }

    pub fn with_view(&self, view: View) -> Self {
        Self {
            view,
            ..self.clone()
        }
    }

    pub fn with_settings(&self, settings: Settings) -> Self {
        Self {
            settings: Arc::new(settings),
            ..self.clone()
        }
    }

    pub fn with_snapshot(&self, snapshot: Snapshot) -> Self {
        Self {
            snapshot: Arc::new(snapshot),
            ..self.clone()
        }
    }

    pub fn with_deletion_alert(&self, deletion_alert: bool) -> Self {
        Self {
            deletion_alert,
            ..self.clone()
        }
    }
}
