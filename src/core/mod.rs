//! Records, the remote API seam and the finance store

pub mod analytics;
pub mod api;
pub mod config;
pub mod log;
pub mod record;
pub mod store;

// Re-export main types for cleaner imports
pub use api::{ApiError, ApiResult, FinanceApi};
pub use record::{Record, RecordDraft, RecordKind, RecordPatch, Transaction};
pub use store::{FinanceStore, StoreState};
