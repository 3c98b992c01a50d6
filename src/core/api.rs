//! Remote finance API abstraction

use super::record::{Record, RecordDraft, RecordKind};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("server responded with {status}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status { status: u16, message: Option<String> },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    /// The `message` field of the server's error body, if it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            ApiError::Transport(_) => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[async_trait]
pub trait FinanceApi: Send + Sync {
    async fn list(&self, kind: RecordKind) -> ApiResult<Vec<Record>>;
    async fn create(&self, kind: RecordKind, draft: &RecordDraft) -> ApiResult<()>;
    async fn update(&self, kind: RecordKind, id: &str, draft: &RecordDraft) -> ApiResult<()>;
    async fn delete(&self, kind: RecordKind, id: &str) -> ApiResult<()>;
}
