//! Client-side state container for income and expense records
//!
//! Every mutating handler follows the same contract: clear the error, send
//! the mutation, refresh the affected collection from the server, report.
//! The refresh replaces the local collection wholesale, so local state is
//! always the last listing the server returned.
//!
//! Operations on one collection are serialized through a fair queue: a
//! mutation and its refresh complete before the next queued operation on that
//! collection starts. Income and expense operations run independently.

use super::analytics;
use super::api::{ApiError, ApiResult, FinanceApi};
use super::record::{Operation, Record, RecordDraft, RecordKind, Transaction};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub incomes: Vec<Record>,
    pub expenses: Vec<Record>,
    pub error: Option<String>,
    pub editing: Option<Record>,
    pending: usize,
}

impl StoreState {
    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    fn records(&self, kind: RecordKind) -> &Vec<Record> {
        match kind {
            RecordKind::Income => &self.incomes,
            RecordKind::Expense => &self.expenses,
        }
    }

    fn records_mut(&mut self, kind: RecordKind) -> &mut Vec<Record> {
        match kind {
            RecordKind::Income => &mut self.incomes,
            RecordKind::Expense => &mut self.expenses,
        }
    }
}

pub struct FinanceStore {
    api: Arc<dyn FinanceApi>,
    state: RwLock<StoreState>,
    income_queue: Mutex<()>,
    expense_queue: Mutex<()>,
}

/// Keeps the loading flag raised while alive.
struct Loading<'a> {
    store: &'a FinanceStore,
}

impl<'a> Loading<'a> {
    fn start(store: &'a FinanceStore) -> Self {
        store.write().pending += 1;
        Self { store }
    }
}

impl Drop for Loading<'_> {
    fn drop(&mut self) {
        let mut state = self.store.write();
        state.pending = state.pending.saturating_sub(1);
    }
}

impl FinanceStore {
    pub fn new(api: Arc<dyn FinanceApi>) -> Self {
        Self {
            api,
            state: RwLock::new(StoreState::default()),
            income_queue: Mutex::new(()),
            expense_queue: Mutex::new(()),
        }
    }

    /// Fetches both collections. Call once when the application starts.
    pub async fn load(&self) -> ApiResult<()> {
        debug!("Loading finance store");
        let (incomes, expenses) = futures::join!(
            self.fetch(RecordKind::Income),
            self.fetch(RecordKind::Expense)
        );
        incomes.and(expenses)
    }

    /// Waits for queued operations to finish, then drops all local state.
    pub async fn shutdown(&self) {
        let _incomes = self.income_queue.lock().await;
        let _expenses = self.expense_queue.lock().await;
        *self.write() = StoreState::default();
        debug!("Finance store shut down");
    }

    fn read(&self) -> RwLockReadGuard<'_, StoreState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn queue(&self, kind: RecordKind) -> &Mutex<()> {
        match kind {
            RecordKind::Income => &self.income_queue,
            RecordKind::Expense => &self.expense_queue,
        }
    }

    fn record_failure(&self, kind: RecordKind, op: Operation, err: &ApiError) {
        let message = err
            .server_message()
            .map(str::to_owned)
            .unwrap_or_else(|| kind.fallback_message(op));
        warn!(error = %err, kind = kind.singular(), ?op, "{message}");
        self.write().error = Some(message);
    }

    /// Re-fetches `kind` and replaces the local collection. Callers hold the
    /// collection's queue.
    async fn refresh(&self, kind: RecordKind) -> ApiResult<()> {
        match self.api.list(kind).await {
            Ok(records) => {
                debug!("Refreshed {} ({} records)", kind.plural(), records.len());
                *self.write().records_mut(kind) = records;
                Ok(())
            }
            Err(err) => {
                self.record_failure(kind, Operation::Fetch, &err);
                Err(err)
            }
        }
    }

    /// Refresh step of a mutation the server has already accepted. A failed
    /// refresh is recorded in the error state and the previous snapshot kept,
    /// but does not turn the mutation into a failure.
    async fn refresh_after_mutation(&self, kind: RecordKind) {
        if self.refresh(kind).await.is_err() {
            debug!("Keeping previous {} snapshot", kind.plural());
        }
    }

    pub async fn fetch(&self, kind: RecordKind) -> ApiResult<()> {
        let _queued = self.queue(kind).lock().await;
        self.refresh(kind).await
    }

    pub async fn add(&self, kind: RecordKind, draft: &RecordDraft) -> ApiResult<()> {
        let _loading = Loading::start(self);
        let _queued = self.queue(kind).lock().await;
        self.clear_error();

        if let Err(err) = self.api.create(kind, draft).await {
            self.record_failure(kind, Operation::Add, &err);
            return Err(err);
        }
        self.refresh_after_mutation(kind).await;
        Ok(())
    }

    pub async fn update(&self, kind: RecordKind, id: &str, draft: &RecordDraft) -> ApiResult<()> {
        let _loading = Loading::start(self);
        let _queued = self.queue(kind).lock().await;
        self.clear_error();

        if let Err(err) = self.api.update(kind, id, draft).await {
            self.record_failure(kind, Operation::Update, &err);
            return Err(err);
        }
        self.refresh_after_mutation(kind).await;
        self.write().editing = None;
        Ok(())
    }

    pub async fn delete(&self, kind: RecordKind, id: &str) -> ApiResult<()> {
        let _queued = self.queue(kind).lock().await;
        self.clear_error();

        if let Err(err) = self.api.delete(kind, id).await {
            self.record_failure(kind, Operation::Delete, &err);
            return Err(err);
        }
        self.refresh_after_mutation(kind).await;
        Ok(())
    }

    pub async fn add_income(&self, draft: &RecordDraft) -> ApiResult<()> {
        self.add(RecordKind::Income, draft).await
    }

    pub async fn add_expense(&self, draft: &RecordDraft) -> ApiResult<()> {
        self.add(RecordKind::Expense, draft).await
    }

    pub async fn update_income(&self, id: &str, draft: &RecordDraft) -> ApiResult<()> {
        self.update(RecordKind::Income, id, draft).await
    }

    pub async fn update_expense(&self, id: &str, draft: &RecordDraft) -> ApiResult<()> {
        self.update(RecordKind::Expense, id, draft).await
    }

    pub async fn delete_income(&self, id: &str) -> ApiResult<()> {
        self.delete(RecordKind::Income, id).await
    }

    pub async fn delete_expense(&self, id: &str) -> ApiResult<()> {
        self.delete(RecordKind::Expense, id).await
    }

    pub async fn get_incomes(&self) -> ApiResult<()> {
        self.fetch(RecordKind::Income).await
    }

    pub async fn get_expenses(&self) -> ApiResult<()> {
        self.fetch(RecordKind::Expense).await
    }

    pub fn records(&self, kind: RecordKind) -> Vec<Record> {
        self.read().records(kind).clone()
    }

    pub fn incomes(&self) -> Vec<Record> {
        self.records(RecordKind::Income)
    }

    pub fn expenses(&self) -> Vec<Record> {
        self.records(RecordKind::Expense)
    }

    pub fn find(&self, kind: RecordKind, id: &str) -> Option<Record> {
        self.read().records(kind).iter().find(|r| r.id == id).cloned()
    }

    pub fn error(&self) -> Option<String> {
        self.read().error.clone()
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.write().error = Some(message.into());
    }

    pub fn clear_error(&self) {
        self.write().error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.read().is_loading()
    }

    pub fn editing(&self) -> Option<Record> {
        self.read().editing.clone()
    }

    pub fn set_editing(&self, record: Option<Record>) {
        self.write().editing = record;
    }

    pub fn snapshot(&self) -> StoreState {
        self.read().clone()
    }

    pub fn total_income(&self) -> f64 {
        analytics::total(&self.read().incomes)
    }

    pub fn total_expenses(&self) -> f64 {
        analytics::total(&self.read().expenses)
    }

    pub fn total_balance(&self) -> f64 {
        let state = self.read();
        analytics::balance(&state.incomes, &state.expenses)
    }

    pub fn transaction_history(&self) -> Vec<Transaction> {
        let state = self.read();
        analytics::recent_history(&state.incomes, &state.expenses)
    }
}
