pub mod cli;
pub mod core;
pub mod providers;

pub use crate::core::config;

use crate::core::{FinanceStore, RecordDraft, RecordKind, RecordPatch};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    Summary,
    List(RecordKind),
    Add(RecordKind, RecordDraft),
    Update {
        kind: RecordKind,
        id: String,
        patch: RecordPatch,
    },
    Delete {
        kind: RecordKind,
        id: String,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fintrack starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let api = providers::HttpFinanceApi::new(&config.api.base_url)
        .context("Failed to create API client")?;
    let store = FinanceStore::new(Arc::new(api));

    let pb = cli::ui::new_spinner("Loading records...");
    let loaded = store.load().await;
    pb.finish_and_clear();
    if let Err(err) = loaded {
        let message = store.error().unwrap_or_else(|| err.to_string());
        return Err(anyhow::Error::new(err).context(message));
    }

    let currency = config.currency.as_str();
    let result = match command {
        AppCommand::Summary => cli::summary::run(&store, currency),
        AppCommand::List(kind) => cli::records::list(&store, kind, currency),
        AppCommand::Add(kind, draft) => cli::records::add(&store, kind, &draft).await,
        AppCommand::Update { kind, id, patch } => {
            cli::records::update(&store, kind, &id, &patch).await
        }
        AppCommand::Delete { kind, id } => cli::records::delete(&store, kind, &id).await,
    };

    store.shutdown().await;
    result
}
