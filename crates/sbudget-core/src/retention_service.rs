//! Rolling history window: old transactions are purged, and the user is warned
//! before data they have not exported expires.

use chrono::NaiveDate;
use tracing::info;

use sbudget_domain::{Month, Transaction};

use crate::{record_store::RecordStore, storage::KeyValueStore, CoreError};

pub const DEFAULT_RETENTION_MONTHS: u32 = 12;

/// Upper bound on the window; larger stored values are clamped.
pub const MAX_RETENTION_MONTHS: u32 = 1200;

/// An export older than this no longer silences the deletion alert.
pub const EXPORT_REMINDER_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    months: u32,
}

impl RetentionPolicy {
    /// Keeps `months` calendar months including the current one, clamped to
    /// `1..=MAX_RETENTION_MONTHS`.
    pub fn new(months: u32) -> Self {
        Self {
            months: months.clamp(1, MAX_RETENTION_MONTHS),
        }
    }

    pub fn months(&self) -> u32 {
        self.months
    }

    /// The oldest month still retained on `today`.
    pub fn oldest_month(&self, today: NaiveDate) -> Month {
        let back = i32::try_from(self.months - 1).unwrap_or(i32::MAX);
        Month::of(today).shift(-back)
    }

    /// Transactions dated before this day are expired.
    pub fn cutoff(&self, today: NaiveDate) -> NaiveDate {
        self.oldest_month(today).first_day()
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION_MONTHS)
    }
}

pub struct RetentionService;

impl RetentionService {
    /// Deletes every transaction older than the retention window.
    pub fn purge_expired<S: KeyValueStore>(
        records: &RecordStore<S>,
        policy: RetentionPolicy,
        today: NaiveDate,
    ) -> Result<usize, CoreError> {
        let cutoff = policy.cutoff(today);
        let removed = records.purge_transactions_before(cutoff)?;
        if removed > 0 {
            info!(removed, %cutoff, "purged expired transactions");
        }
        Ok(removed)
    }

    /// Number of transactions that expire at the next month rollover.
    pub fn expiring_next(transactions: &[Transaction], policy: RetentionPolicy, today: NaiveDate) -> usize {
        let oldest = policy.oldest_month(today);
        transactions
            .iter()
            .filter(|txn| oldest.contains(txn.date))
            .count()
    }

    /// `true` when data is about to expire and no recent export covers it.
    pub fn deletion_alert(
        transactions: &[Transaction],
        policy: RetentionPolicy,
        today: NaiveDate,
        last_export: Option<NaiveDate>,
    ) -> bool {
        if Self::expiring_next(transactions, policy, today) == 0 {
            return false;
        }
        match last_export {
            Some(exported) => (today - exported).num_days() > EXPORT_REMINDER_DAYS,
            None => true,
        }
    }
}
