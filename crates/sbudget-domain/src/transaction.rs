//! Domain models for expense and savings transactions.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::*;

/// Reserved category carried by savings contributions.
pub const SAVINGS_CATEGORY: &str = "Ahorro";

/// Category applied to expenses entered without one.
pub const DEFAULT_CATEGORY: &str = "General";

/// Store-assigned transaction identifier. Monotonic and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single financial event.
///
/// The savings goal of an expense lives inside [`TransactionKind::Expense`], so a
/// transaction can only reference a goal when it is an expense drawn from savings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TransactionRecord", into = "TransactionRecord")]
pub struct Transaction {
    pub id: Option<TransactionId>,
    pub amount: f64,
    pub category: String,
    pub subcategory: Option<String>,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub kind: TransactionKind,
}

impl Transaction {
    /// Creates an expense charged against the regular monthly budget.
    pub fn expense(amount: f64, category: impl Into<String>, date: NaiveDate) -> Self {
        Self::with_kind(
            amount,
            category,
            date,
            TransactionKind::Expense { savings_goal: None },
        )
    }

    /// Creates an expense funded by drawing down the named savings goal.
    pub fn savings_expenditure(
        amount: f64,
        category: impl Into<String>,
        date: NaiveDate,
        goal_name: impl Into<String>,
    ) -> Self {
        Self::with_kind(
            amount,
            category,
            date,
            TransactionKind::Expense {
                savings_goal: Some(goal_name.into()),
            },
        )
    }

    /// Creates a contribution into the savings pool.
    pub fn savings(amount: f64, date: NaiveDate) -> Self {
        Self::with_kind(amount, SAVINGS_CATEGORY, date, TransactionKind::Savings)
    }

    fn with_kind(
        amount: f64,
        category: impl Into<String>,
        date: NaiveDate,
        kind: TransactionKind,
    ) -> Self {
        Self {
            id: None,
            amount,
            category: category.into(),
            subcategory: None,
            date,
            note: None,
            kind,
        }
    }

    pub fn with_id(mut self, id: TransactionId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn transaction_type(&self) -> TransactionType {
        match self.kind {
            TransactionKind::Expense { .. } => TransactionType::Expense,
            TransactionKind::Savings => TransactionType::Savings,
        }
    }

    pub fn is_savings_contribution(&self) -> bool {
        matches!(self.kind, TransactionKind::Savings)
    }

    /// `true` for expenses funded from a savings goal rather than the monthly budget.
    pub fn is_savings_expenditure(&self) -> bool {
        self.savings_goal_id().is_some()
    }

    /// `true` for expenses paid out of the regular budget.
    pub fn is_operational_expense(&self) -> bool {
        matches!(self.kind, TransactionKind::Expense { savings_goal: None })
    }

    pub fn savings_goal_id(&self) -> Option<&str> {
        match &self.kind {
            TransactionKind::Expense { savings_goal } => savings_goal.as_deref(),
            TransactionKind::Savings => None,
        }
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        let id = self
            .id
            .map(|id| format!("#{id}"))
            .unwrap_or_else(|| "new".into());
        match self.savings_goal_id() {
            Some(goal) => format!("{id} {} {} [{}]", self.date, self.category, goal),
            None => format!("{id} {} {}", self.date, self.category),
        }
    }
}

/// Distinguishes money spent from money moved into the savings pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionKind {
    Expense { savings_goal: Option<String> },
    Savings,
}

/// Flat transaction type as persisted in the `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Expense,
    Savings,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionType::Expense => "expense",
            TransactionType::Savings => "savings",
        };
        f.write_str(label)
    }
}

/// Persisted layout of a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<TransactionId>,
    amount: f64,
    category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subcategory: Option<String>,
    date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    note: Option<String>,
    #[serde(rename = "type")]
    kind: TransactionType,
    #[serde(default)]
    is_savings_expenditure: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    savings_goal_id: Option<String>,
}

impl From<Transaction> for TransactionRecord {
    fn from(txn: Transaction) -> Self {
        let kind = txn.transaction_type();
        let savings_goal_id = match txn.kind {
            TransactionKind::Expense { savings_goal } => savings_goal,
            TransactionKind::Savings => None,
        };
        Self {
            id: txn.id,
            amount: txn.amount,
            category: txn.category,
            subcategory: txn.subcategory,
            date: txn.date,
            note: txn.note,
            kind,
            is_savings_expenditure: savings_goal_id.is_some(),
            savings_goal_id,
        }
    }
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = TransactionRecordError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        let kind = match (
            record.kind,
            record.is_savings_expenditure,
            record.savings_goal_id,
        ) {
            (TransactionType::Savings, false, None) => TransactionKind::Savings,
            (TransactionType::Savings, _, _) => {
                return Err(TransactionRecordError::SavingsWithGoal)
            }
            (TransactionType::Expense, false, None) => {
                TransactionKind::Expense { savings_goal: None }
            }
            (TransactionType::Expense, true, Some(goal)) if !goal.trim().is_empty() => {
                TransactionKind::Expense {
                    savings_goal: Some(goal),
                }
            }
            (TransactionType::Expense, _, _) => {
                return Err(TransactionRecordError::GoalFlagMismatch)
            }
        };
        Ok(Self {
            id: record.id,
            amount: record.amount,
            category: record.category,
            subcategory: record.subcategory,
            date: record.date,
            note: record.note,
            kind,
        })
    }
}

/// Raised when a persisted transaction breaks the savings-goal invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionRecordError {
    SavingsWithGoal,
    GoalFlagMismatch,
}

impl fmt::Display for TransactionRecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionRecordError::SavingsWithGoal => {
                f.write_str("savings contributions cannot draw from a savings goal")
            }
            TransactionRecordError::GoalFlagMismatch => f.write_str(
                "savingsGoalId must be set exactly when isSavingsExpenditure is true",
            ),
        }
    }
}

impl std::error::Error for TransactionRecordError {}
