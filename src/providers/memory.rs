use crate::core::api::{ApiError, ApiResult, FinanceApi};
use crate::core::record::{Endpoint, Record, RecordDraft, RecordKind};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{Mutex, Notify};
use tracing::debug;

#[derive(Default)]
struct Inner {
    collections: HashMap<RecordKind, Vec<Record>>,
    requests: Vec<String>,
    failure: Option<(usize, Option<String>)>,
    pause: Option<Gate>,
}

/// Holds the next request at a checkpoint until released.
#[derive(Clone, Default)]
pub struct Gate {
    reached: Arc<Notify>,
    release: Arc<Notify>,
}

impl Gate {
    /// Resolves once the paused request has arrived.
    pub async fn reached(&self) {
        self.reached.notified().await;
    }

    pub fn release(&self) {
        self.release.notify_one();
    }
}

/// In-process backend with the same semantics as the HTTP API.
///
/// Records are kept in insertion order and listings return them in that
/// order. Failures and pauses can be scripted for the next requests.
pub struct MemoryFinanceApi {
    inner: Mutex<Inner>,
    next_id: AtomicU64,
}

impl MemoryFinanceApi {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Replaces a collection.
    pub async fn seed(&self, kind: RecordKind, records: Vec<Record>) {
        self.inner.lock().await.collections.insert(kind, records);
    }

    pub async fn records(&self, kind: RecordKind) -> Vec<Record> {
        let inner = self.inner.lock().await;
        inner.collections.get(&kind).cloned().unwrap_or_default()
    }

    /// Requests served so far, as `"METHOD path"`.
    pub async fn requests(&self) -> Vec<String> {
        self.inner.lock().await.requests.clone()
    }

    /// Fails the next request. `message` becomes the error body's `message`.
    pub async fn fail_next(&self, message: Option<&str>) {
        self.fail_request(1, message).await;
    }

    /// Fails the `nth` request from now, counting from 1.
    pub async fn fail_request(&self, nth: usize, message: Option<&str>) {
        self.inner.lock().await.failure = Some((nth, message.map(str::to_owned)));
    }

    /// Pauses the next request until the returned gate is released.
    pub async fn pause(&self) -> Gate {
        let gate = Gate::default();
        self.inner.lock().await.pause = Some(gate.clone());
        gate
    }

    async fn begin(&self, kind: RecordKind, endpoint: Endpoint<'_>) -> ApiResult<()> {
        let (gate, failure) = {
            let mut inner = self.inner.lock().await;
            let request = format!("{} {}", endpoint.method(), kind.path(endpoint));
            debug!("{request}");
            inner.requests.push(request);

            let failure = match inner.failure.take() {
                Some((n, message)) if n <= 1 => Some(message),
                Some((n, message)) => {
                    inner.failure = Some((n - 1, message));
                    None
                }
                None => None,
            };
            (inner.pause.take(), failure)
        };

        if let Some(gate) = gate {
            gate.reached.notify_one();
            gate.release.notified().await;
        }

        match failure {
            Some(message) => Err(ApiError::Status {
                status: if message.is_some() { 400 } else { 500 },
                message,
            }),
            None => Ok(()),
        }
    }

    fn not_found(kind: RecordKind, id: &str) -> ApiError {
        ApiError::Status {
            status: 404,
            message: Some(format!("{kind} {id} not found")),
        }
    }
}

impl Default for MemoryFinanceApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FinanceApi for MemoryFinanceApi {
    async fn list(&self, kind: RecordKind) -> ApiResult<Vec<Record>> {
        self.begin(kind, Endpoint::List).await?;
        Ok(self.records(kind).await)
    }

    async fn create(&self, kind: RecordKind, draft: &RecordDraft) -> ApiResult<()> {
        self.begin(kind, Endpoint::Add).await?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = Record {
            id: id.to_string(),
            title: draft.title.clone(),
            amount: draft.amount,
            category: draft.category.clone(),
            description: draft.description.clone(),
            created_at: Utc::now(),
        };
        let mut inner = self.inner.lock().await;
        inner.collections.entry(kind).or_default().push(record);
        Ok(())
    }

    async fn update(&self, kind: RecordKind, id: &str, draft: &RecordDraft) -> ApiResult<()> {
        self.begin(kind, Endpoint::Update(id)).await?;
        let mut inner = self.inner.lock().await;
        let record = inner
            .collections
            .entry(kind)
            .or_default()
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Self::not_found(kind, id))?;
        record.title = draft.title.clone();
        record.amount = draft.amount;
        record.category = draft.category.clone();
        record.description = draft.description.clone();
        Ok(())
    }

    async fn delete(&self, kind: RecordKind, id: &str) -> ApiResult<()> {
        self.begin(kind, Endpoint::Delete(id)).await?;
        let mut inner = self.inner.lock().await;
        let records = inner.collections.entry(kind).or_default();
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(Self::not_found(kind, id));
        }
        Ok(())
    }
}
