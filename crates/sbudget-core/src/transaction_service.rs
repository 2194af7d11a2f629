//! Input boundary for transaction entry: raw form values become validated transactions.

use chrono::NaiveDate;

use sbudget_domain::{DistributionEntry, Transaction, DEFAULT_CATEGORY};

use crate::CoreError;

/// What the user is recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftKind {
    Expense,
    Savings,
    SavingsExpenditure { goal_name: String },
}

/// Unvalidated transaction as entered by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionDraft {
    pub amount: String,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub kind: DraftKind,
}

impl TransactionDraft {
    pub fn expense(amount: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            amount: amount.into(),
            category: None,
            subcategory: None,
            date,
            note: None,
            kind: DraftKind::Expense,
        }
    }

    pub fn savings(amount: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            kind: DraftKind::Savings,
            ..Self::expense(amount, date)
        }
    }

    /// Pre-fills a draft with the values of a stored transaction, for editing.
    pub fn from_existing(txn: &Transaction) -> Self {
        let kind = match (txn.is_savings_contribution(), txn.savings_goal_id()) {
            (true, _) => DraftKind::Savings,
            (false, Some(goal)) => DraftKind::SavingsExpenditure {
                goal_name: goal.to_string(),
            },
            (false, None) => DraftKind::Expense,
        };
        Self {
            amount: txn.amount.to_string(),
            category: Some(txn.category.clone()),
            subcategory: txn.subcategory.clone(),
            date: txn.date,
            note: txn.note.clone(),
            kind,
        }
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn subcategory(mut self, subcategory: impl Into<String>) -> Self {
        self.subcategory = Some(subcategory.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Marks the expense as funded by the named savings goal.
    pub fn from_savings(mut self, goal_name: impl Into<String>) -> Self {
        self.kind = DraftKind::SavingsExpenditure {
            goal_name: goal_name.into(),
        };
        self
    }
}

pub struct TransactionService;

impl TransactionService {
    /// Parses a user-entered amount. Non-numeric, non-finite and non-positive
    /// values are rejected.
    pub fn parse_amount(raw: &str) -> Result<f64, CoreError> {
        let trimmed = raw.trim();
        let amount: f64 = trimmed
            .parse()
            .map_err(|_| CoreError::InvalidInput(format!("`{trimmed}` is not a number")))?;
        Self::check_amount(amount)?;
        Ok(amount)
    }

    fn check_amount(amount: f64) -> Result<(), CoreError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(CoreError::InvalidInput(format!(
                "amount must be a positive number, got {amount}"
            )));
        }
        Ok(())
    }

    /// Turns a draft into a transaction ready for the store.
    pub fn build(draft: TransactionDraft, distribution: &[DistributionEntry]) -> Result<Transaction, CoreError> {
        Self::build_keeping_goal(draft, distribution, None)
    }

    /// Like [`build`](Self::build), but `kept_goal` is accepted even when it is
    /// no longer part of the distribution.
    fn build_keeping_goal(
        draft: TransactionDraft,
        distribution: &[DistributionEntry],
        kept_goal: Option<&str>,
    ) -> Result<Transaction, CoreError> {
        let amount = Self::parse_amount(&draft.amount)?;
        let category = non_blank(draft.category);
        let mut txn = match draft.kind {
            DraftKind::Expense => Transaction::expense(
                amount,
                category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
                draft.date,
            ),
            DraftKind::Savings => Transaction::savings(amount, draft.date),
            DraftKind::SavingsExpenditure { goal_name } => {
                let goal_name = goal_name.trim().to_string();
                if kept_goal != Some(goal_name.as_str()) {
                    ensure_known_goal(&goal_name, distribution)?;
                }
                Transaction::savings_expenditure(
                    amount,
                    category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
                    draft.date,
                    goal_name,
                )
            }
        };
        txn.subcategory = non_blank(draft.subcategory);
        txn.note = non_blank(draft.note);
        Ok(txn)
    }

    /// Builds the replacement for `existing` from an edited draft, keeping its id.
    pub fn apply_edit(
        existing: &Transaction,
        draft: TransactionDraft,
        distribution: &[DistributionEntry],
    ) -> Result<Transaction, CoreError> {
        let id = existing
            .id
            .ok_or_else(|| CoreError::InvalidInput("transaction has not been saved yet".into()))?;
        let mut edited = Self::build_keeping_goal(draft, distribution, existing.savings_goal_id())?;
        edited.id = Some(id);
        Ok(edited)
    }

    /// Re-checks a fully formed transaction before an update. A goal that no
    /// longer exists is accepted only when `previous` already referenced it.
    pub fn validate(
        txn: &Transaction,
        previous: Option<&Transaction>,
        distribution: &[DistributionEntry],
    ) -> Result<(), CoreError> {
        Self::check_amount(txn.amount)?;
        if txn.category.trim().is_empty() {
            return Err(CoreError::InvalidInput("category cannot be empty".into()));
        }
        if let Some(goal) = txn.savings_goal_id() {
            let unchanged = previous.and_then(Transaction::savings_goal_id) == Some(goal);
            if !unchanged {
                ensure_known_goal(goal, distribution)?;
            }
        }
        Ok(())
    }
}

fn ensure_known_goal(goal_name: &str, distribution: &[DistributionEntry]) -> Result<(), CoreError> {
    if distribution.iter().any(|entry| entry.goal_name == goal_name) {
        Ok(())
    } else {
        Err(CoreError::InvalidInput(format!(
            "unknown savings goal `{goal_name}`"
        )))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
