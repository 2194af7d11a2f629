//! Durable storage of transactions, budget goals and the savings distribution.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use sbudget_domain::{BudgetGoal, DistributionEntry, Transaction, TransactionId, ValidatedDistribution};

use crate::{
    storage::{KeyValueStore, WriteBatch},
    CoreError,
};

pub const TRANSACTIONS_PREFIX: &str = "transactions/";
pub const BUDGET_GOALS_PREFIX: &str = "budget_goals/";
pub const DISTRIBUTION_PREFIX: &str = "savings_distribution/";
pub const NEXT_TRANSACTION_ID_KEY: &str = "meta/next_transaction_id";

/// Point-in-time copy of every collection, used for exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordSnapshot {
    pub exported_at: DateTime<Utc>,
    pub transactions: Vec<Transaction>,
    pub budget_goals: Vec<BudgetGoal>,
    pub savings_distribution: Vec<DistributionEntry>,
}

/// Typed collections layered over a [`KeyValueStore`].
///
/// The store enforces no business rule of its own; a distribution can only
/// reach it already validated. Updates assume a single writer, so the last
/// write wins.
pub struct RecordStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Opens the collections, seeding the default savings distribution when empty.
    pub fn open(store: S) -> Result<Self, CoreError> {
        let records = Self { store };
        records.seed_distribution()?;
        Ok(records)
    }

    pub fn backend(&self) -> &S {
        &self.store
    }

    fn seed_distribution(&self) -> Result<(), CoreError> {
        if self.store.list_keys(DISTRIBUTION_PREFIX)?.is_empty() {
            self.replace_distribution(&ValidatedDistribution::default())?;
            info!("seeded default savings distribution");
        }
        Ok(())
    }

    /// Persists a new transaction under a fresh id and returns that id.
    /// Any id already present on `txn` is ignored.
    pub fn create_transaction(&self, txn: &Transaction) -> Result<TransactionId, CoreError> {
        let next = self.next_transaction_id()?;
        let id = TransactionId(next);
        let mut record = txn.clone();
        record.id = Some(id);

        let mut batch = WriteBatch::new();
        batch
            .put(transaction_key(id), serde_json::to_value(&record)?)
            .put(NEXT_TRANSACTION_ID_KEY, Value::from(next + 1));
        self.store.apply(batch)?;
        debug!(%id, amount = record.amount, category = %record.category, "transaction created");
        Ok(id)
    }

    pub fn get_transaction(&self, id: TransactionId) -> Result<Option<Transaction>, CoreError> {
        let key = transaction_key(id);
        self.store
            .get(&key)?
            .map(|value| decode(&key, value))
            .transpose()
    }

    /// Lists every transaction in id order.
    pub fn list_transactions(&self) -> Result<Vec<Transaction>, CoreError> {
        self.list_collection(TRANSACTIONS_PREFIX)
    }

    /// Overwrites a stored transaction. Fails with `TransactionNotFound` when
    /// the id is unknown and with `InvalidInput` when the transaction has no id.
    pub fn update_transaction(&self, txn: &Transaction) -> Result<(), CoreError> {
        let id = txn
            .id
            .ok_or_else(|| CoreError::InvalidInput("cannot update a transaction without an id".into()))?;
        let key = transaction_key(id);
        if self.store.get(&key)?.is_none() {
            return Err(CoreError::TransactionNotFound(id));
        }
        self.store.set(&key, serde_json::to_value(txn)?)?;
        debug!(%id, "transaction updated");
        Ok(())
    }

    /// Deletes a transaction. Fails with `TransactionNotFound` when the id is unknown.
    pub fn delete_transaction(&self, id: TransactionId) -> Result<(), CoreError> {
        if !self.store.remove(&transaction_key(id))? {
            return Err(CoreError::TransactionNotFound(id));
        }
        debug!(%id, "transaction deleted");
        Ok(())
    }

    /// Deletes every transaction dated strictly before `cutoff` in one batch.
    pub fn purge_transactions_before(&self, cutoff: NaiveDate) -> Result<usize, CoreError> {
        let mut batch = WriteBatch::new();
        for txn in self.list_transactions()? {
            if let (Some(id), true) = (txn.id, txn.date < cutoff) {
                batch.remove(transaction_key(id));
            }
        }
        let removed = batch.len();
        if removed > 0 {
            self.store.apply(batch)?;
        }
        Ok(removed)
    }

    pub fn list_budget_goals(&self) -> Result<Vec<BudgetGoal>, CoreError> {
        self.list_collection(BUDGET_GOALS_PREFIX)
    }

    /// Inserts or replaces the goal for its category.
    pub fn upsert_budget_goal(&self, goal: &BudgetGoal) -> Result<(), CoreError> {
        self.upsert_budget_goals(std::slice::from_ref(goal))
    }

    /// Upserts several goals in one batch.
    pub fn upsert_budget_goals(&self, goals: &[BudgetGoal]) -> Result<(), CoreError> {
        let mut batch = WriteBatch::new();
        for goal in goals {
            batch.put(budget_goal_key(&goal.category), serde_json::to_value(goal)?);
        }
        self.store.apply(batch)?;
        debug!(count = goals.len(), "budget goals upserted");
        Ok(())
    }

    pub fn list_distribution(&self) -> Result<Vec<DistributionEntry>, CoreError> {
        self.list_collection(DISTRIBUTION_PREFIX)
    }

    /// Replaces the whole distribution: existing entries are cleared and the new
    /// ones inserted in a single batch.
    pub fn replace_distribution(&self, distribution: &ValidatedDistribution) -> Result<(), CoreError> {
        let mut batch = WriteBatch::new();
        for key in self.store.list_keys(DISTRIBUTION_PREFIX)? {
            batch.remove(key);
        }
        for entry in distribution.entries() {
            batch.put(distribution_key(&entry.goal_name), serde_json::to_value(entry)?);
        }
        self.store.apply(batch)?;
        debug!(goals = distribution.entries().len(), "savings distribution replaced");
        Ok(())
    }

    pub fn snapshot(&self, exported_at: DateTime<Utc>) -> Result<RecordSnapshot, CoreError> {
        Ok(RecordSnapshot {
            exported_at,
            transactions: self.list_transactions()?,
            budget_goals: self.list_budget_goals()?,
            savings_distribution: self.list_distribution()?,
        })
    }

    fn next_transaction_id(&self) -> Result<u64, CoreError> {
        let stored = match self.store.get(NEXT_TRANSACTION_ID_KEY)? {
            Some(value) => value.as_u64().ok_or_else(|| {
                CoreError::Serde(format!("`{NEXT_TRANSACTION_ID_KEY}` is not an integer"))
            })?,
            None => 1,
        };
        let after_last = self
            .store
            .list_keys(TRANSACTIONS_PREFIX)?
            .last()
            .and_then(|key| key.strip_prefix(TRANSACTIONS_PREFIX))
            .and_then(|raw| raw.parse::<u64>().ok())
            .map(|last| last + 1)
            .unwrap_or(1);
        Ok(stored.max(after_last))
    }

    fn list_collection<T: DeserializeOwned>(&self, prefix: &str) -> Result<Vec<T>, CoreError> {
        self.store
            .scan(prefix)?
            .into_iter()
            .map(|(key, value)| decode(&key, value))
            .collect()
    }
}

fn transaction_key(id: TransactionId) -> String {
    format!("{TRANSACTIONS_PREFIX}{:020}", id.0)
}

fn budget_goal_key(category: &str) -> String {
    format!("{BUDGET_GOALS_PREFIX}{category}")
}

fn distribution_key(goal_name: &str) -> String {
    format!("{DISTRIBUTION_PREFIX}{goal_name}")
}

fn decode<T: DeserializeOwned>(key: &str, value: Value) -> Result<T, CoreError> {
    serde_json::from_value(value).map_err(|err| CoreError::Serde(format!("`{key}`: {err}")))
}
