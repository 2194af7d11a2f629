use std::{
    env,
    path::{Path, PathBuf},
    sync::Arc,
};

use sbudget_config::{Settings, SettingsManager, SettingsPatch};
use sbudget_core::{
    BudgetReport, BudgetService, Clock, HistoryService, KeyValueStore, MonthSummary, RecordStore,
    RetentionPolicy, RetentionService, SavingsReport, SavingsService, TransactionDraft,
    TransactionService,
};
use sbudget_domain::{BudgetGoal, DistributionEntry, Month, SavingsDistribution, Transaction, TransactionId};
use sbudget_storage_json::{ExportArchive, ExportInfo, JsonFileStore};
use tracing::{info, warn};

use super::state::{AppState, Snapshot, View};
use crate::errors::{AppError, Result};

/// Overrides the data directory.
pub const HOME_ENV: &str = "SIMPLE_BUDGET_HOME";

const RECORDS_FILE: &str = "records.json";
const EXPORTS_DIR: &str = "exports";

/// Where a session keeps its files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub base: PathBuf,
    pub records_file: PathBuf,
    pub exports_dir: PathBuf,
}

impl DataPaths {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        let base = base.into();
        Self {
            records_file: base.join(RECORDS_FILE),
            exports_dir: base.join(EXPORTS_DIR),
            base,
        }
    }

    /// `$SIMPLE_BUDGET_HOME` when set, otherwise the platform data directory.
    pub fn resolve() -> Self {
        match env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
            Some(home) => Self::new(home),
            None => Self::new(SettingsManager::default_base_dir()),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }
}

/// Orchestrates the record store, the aggregators and the user settings on
/// behalf of one user.
pub struct Session<S: KeyValueStore> {
    records: RecordStore<S>,
    settings_manager: SettingsManager,
    exports: ExportArchive,
    clock: Arc<dyn Clock>,
    state: AppState,
}

pub type FileSession = Session<JsonFileStore>;

impl FileSession {
    /// Opens the file-backed collections under `paths` and starts the session.
    pub fn open(paths: &DataPaths, clock: Arc<dyn Clock>) -> Result<Self> {
        let store = JsonFileStore::open(&paths.records_file)?;
        let settings_manager = SettingsManager::with_base_dir(paths.base.clone())?;
        let exports = ExportArchive::new(&paths.exports_dir)?;
        Session::start(RecordStore::open(store)?, settings_manager, exports, clock)
    }
}

impl<S: KeyValueStore> Session<S> {
    /// Loads settings, purges transactions outside the retention window,
    /// computes the deletion alert and loads the records.
    pub fn start(
        records: RecordStore<S>,
        settings_manager: SettingsManager,
        exports: ExportArchive,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let settings = settings_manager.load()?;
        let today = clock.today();
        let policy = RetentionPolicy::new(settings.retention_months);
        let purged = RetentionService::purge_expired(&records, policy, today)?;

        let mut session = Self {
            records,
            settings_manager,
            exports,
            clock,
            state: AppState::new(settings, Snapshot::default()),
        };
        session.refresh()?;
        info!(
            purged,
            transactions = session.state.snapshot().transactions.len(),
            alert = session.state.deletion_alert(),
            "session started"
        );
        Ok(session)
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today()
    }

    pub fn current_month(&self) -> Month {
        Month::of(self.today())
    }

    /// Reloads every collection from the store and recomputes the deletion alert.
    pub fn refresh(&mut self) -> Result<&AppState> {
        let snapshot = Snapshot::new(
            self.records.list_transactions()?,
            self.records.list_budget_goals()?,
            self.records.list_distribution()?,
        );
        let alert = self.alert_for(&snapshot, self.state.settings());
        self.state = self.state.with_snapshot(snapshot).with_deletion_alert(alert);
        Ok(&self.state)
    }

    fn alert_for(&self, snapshot: &Snapshot, settings: &Settings) -> bool {
        RetentionService::deletion_alert(
            &snapshot.transactions,
            RetentionPolicy::new(settings.retention_months),
            self.today(),
            settings.last_export_date,
        )
    }

    /// Spend per category for `month` (the current month when `None`).
    pub fn dashboard(&self, month: Option<Month>) -> BudgetReport {
        let snapshot = self.state.snapshot();
        BudgetService::month_report(
            &snapshot.transactions,
            &snapshot.budget_goals,
            month.unwrap_or_else(|| self.current_month()),
        )
    }

    pub fn savings(&self) -> SavingsReport {
        let snapshot = self.state.snapshot();
        SavingsService::allocate(&snapshot.transactions, &snapshot.distribution)
    }

    pub fn history(&self, month: Option<Month>) -> MonthSummary {
        HistoryService::month_summary(
            &self.state.snapshot().transactions,
            month.unwrap_or_else(|| self.current_month()),
        )
    }

    /// Months offered by the history picker, newest first.
    pub fn history_months(&self) -> Vec<Month> {
        HistoryService::available_months(self.today())
    }

    /// Goals for every suggested category plus any custom ones.
    pub fn planning_sheet(&self) -> Vec<BudgetGoal> {
        BudgetService::planning_sheet(&self.state.snapshot().budget_goals)
    }

    pub fn add_transaction(&mut self, draft: TransactionDraft) -> Result<TransactionId> {
        let txn = TransactionService::build(draft, &self.state.snapshot().distribution)?;
        let id = self.records.create_transaction(&txn)?;
        info!(%id, kind = %txn.transaction_type(), amount = txn.amount, "transaction recorded");
        self.refresh()?;
        Ok(id)
    }

    /// Rebuilds transaction `id` from an edited draft.
    pub fn edit_transaction(&mut self, id: TransactionId, draft: TransactionDraft) -> Result<()> {
        let existing = self
            .records
            .get_transaction(id)?
            .ok_or(AppError::TransactionNotFound(id))?;
        let edited = TransactionService::apply_edit(&existing, draft, &self.state.snapshot().distribution)?;
        self.update_transaction(&edited)?;
        Ok(())
    }

    /// Overwrites a stored transaction. Returns `false`, and leaves the
    /// records untouched, when it no longer exists.
    pub fn update_transaction(&mut self, txn: &Transaction) -> Result<bool> {
        let id = txn
            .id
            .ok_or_else(|| AppError::InvalidInput("transaction has not been saved yet".into()))?;
        let Some(previous) = self.records.get_transaction(id)? else {
            warn!(%id, "update skipped, transaction no longer exists");
            return Ok(false);
        };
        TransactionService::validate(txn, Some(&previous), &self.state.snapshot().distribution)?;
        match self.records.update_transaction(txn) {
            Ok(()) => {
                info!(%id, "transaction updated");
                self.refresh()?;
                Ok(true)
            }
            Err(err) if err.is_not_found() => {
                warn!(%id, "update skipped, transaction no longer exists");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Deletes a transaction. Returns `false` when it was already gone.
    pub fn delete_transaction(&mut self, id: TransactionId) -> Result<bool> {
        match self.records.delete_transaction(id) {
            Ok(()) => {
                info!(%id, "transaction deleted");
                self.refresh()?;
                Ok(true)
            }
            Err(err) if err.is_not_found() => {
                warn!(%id, "delete skipped, transaction does not exist");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn save_goals(&mut self, goals: &[BudgetGoal]) -> Result<()> {
        self.records.upsert_budget_goals(goals)?;
        info!(count = goals.len(), "budget goals saved");
        self.refresh()?;
        Ok(())
    }

    /// Sets the monthly goal of a single category.
    pub fn set_goal(&mut self, category: &str, amount: f64) -> Result<()> {
        let goal = BudgetGoal::new(category.trim(), amount).map_err(sbudget_core::CoreError::from)?;
        self.save_goals(std::slice::from_ref(&goal))
    }

    /// Replaces the savings distribution. Entries are validated first; on
    /// failure the stored distribution is left as it was.
    pub fn save_distribution(&mut self, entries: Vec<DistributionEntry>) -> Result<()> {
        let validated = SavingsDistribution::new(entries)
            .validate()
            .map_err(sbudget_core::CoreError::from)?;
        self.records.replace_distribution(&validated)?;
        info!(goals = validated.entries().len(), "savings distribution saved");
        self.refresh()?;
        Ok(())
    }

    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Result<&Settings> {
        let merged = self.state.settings().merged(patch)?;
        self.settings_manager.save(&merged)?;
        let alert = self.alert_for(self.state.snapshot(), &merged);
        self.state = self.state.with_settings(merged).with_deletion_alert(alert);
        info!("settings updated");
        Ok(self.state.settings())
    }

    /// Writes a snapshot of every collection to the export archive and
    /// records the export date.
    pub fn export(&mut self, note: Option<&str>) -> Result<ExportInfo> {
        let snapshot = self.records.snapshot(self.clock.now())?;
        let exported = self.exports.export(&snapshot, note)?;
        let patch = SettingsPatch {
            last_export_date: Some(self.today()),
            ..SettingsPatch::default()
        };
        self.update_settings(&patch)?;
        Ok(exported)
    }

    pub fn exports(&self) -> Result<Vec<ExportInfo>> {
        Ok(self.exports.list()?)
    }

    /// Switches the current view. Editing requires the transaction to exist.
    pub fn navigate(&mut self, view: View) -> Result<&AppState> {
        if let View::AddTransaction { editing: Some(id) } = view {
            if self.state.snapshot().transaction(id).is_none() {
                return Err(AppError::TransactionNotFound(id));
            }
        }
        self.state = self.state.with_view(view);
        Ok(&self.state)
    }
}
