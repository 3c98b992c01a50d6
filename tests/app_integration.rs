use std::fs;
use std::sync::Arc;
use tracing::info;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fintrack::AppCommand;
use fintrack::core::{FinanceStore, RecordDraft, RecordKind, RecordPatch};
use fintrack::providers::HttpFinanceApi;

mod test_utils {
    use super::*;

    pub const INCOMES_JSON: &str = r#"[
        {
            "_id": "i1",
            "title": "Salary",
            "amount": 100,
            "category": "salary",
            "description": "",
            "createdAt": "2024-06-01T09:00:00.000Z"
        }
    ]"#;

    pub const EXPENSES_JSON: &str = r#"[
        {
            "_id": "e1",
            "title": "Groceries",
            "amount": 40,
            "category": "food",
            "description": "Weekly shop",
            "createdAt": "2024-06-02T17:15:00.000Z"
        }
    ]"#;

    /// Mounts both listing endpoints, each expected to be hit `times` times.
    pub async fn mount_listings(server: &MockServer, incomes: u64, expenses: u64) {
        Mock::given(method("GET"))
            .and(path("/api/v1/get-incomes"))
            .respond_with(ResponseTemplate::new(200).set_body_string(INCOMES_JSON))
            .expect(incomes)
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/get-expenses"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EXPENSES_JSON))
            .expect(expenses)
            .mount(server)
            .await;
    }

    pub fn write_config(base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
        api:
          base_url: {base_url}
        currency: "EUR"
    "#
        );
        fs::write(config_file.path(), &config_content).expect("Failed to write config file");
        config_file
    }
}

#[test_log::test(tokio::test)]
async fn test_summary_flow_with_mock() {
    let mock_server = MockServer::start().await;
    test_utils::mount_listings(&mock_server, 1, 1).await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fintrack::run_command(
        AppCommand::Summary,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Summary command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_add_income_refreshes_incomes() {
    let mock_server = MockServer::start().await;
    // One listing on load plus the refresh after the POST
    test_utils::mount_listings(&mock_server, 2, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/add-income"))
        .and(body_json(serde_json::json!({
            "title": "Bonus",
            "amount": 250.0,
            "category": "salary",
            "description": ""
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"message": "Income Added"}"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let draft = RecordDraft {
        title: "Bonus".to_string(),
        amount: 250.0,
        category: "salary".to_string(),
        description: String::new(),
    };
    let result = fintrack::run_command(
        AppCommand::Add(RecordKind::Income, draft),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Add command failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_update_expense_sends_patched_record() {
    let mock_server = MockServer::start().await;
    test_utils::mount_listings(&mock_server, 1, 2).await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/update-expense/e1"))
        .and(body_json(serde_json::json!({
            "title": "Groceries",
            "amount": 55.0,
            "category": "food",
            "description": "Weekly shop"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fintrack::run_command(
        AppCommand::Update {
            kind: RecordKind::Expense,
            id: "e1".to_string(),
            patch: RecordPatch {
                amount: Some(55.0),
                ..Default::default()
            },
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Update command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_failed_add_surfaces_server_message() {
    let mock_server = MockServer::start().await;
    test_utils::mount_listings(&mock_server, 1, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/v1/add-expense"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"message": "Amount must be a positive number!"}"#),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let draft = RecordDraft {
        title: "Refund".to_string(),
        amount: -5.0,
        category: "other".to_string(),
        description: String::new(),
    };
    let err = fintrack::run_command(
        AppCommand::Add(RecordKind::Expense, draft),
        Some(config_file.path().to_str().unwrap()),
    )
    .await
    .unwrap_err();

    info!(error = %err, "Add failed as expected");
    assert_eq!(err.to_string(), "Amount must be a positive number!");
}

#[test_log::test(tokio::test)]
async fn test_delete_without_message_uses_fallback() {
    let mock_server = MockServer::start().await;
    test_utils::mount_listings(&mock_server, 1, 1).await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/delete-income/i9"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let err = fintrack::run_command(
        AppCommand::Delete {
            kind: RecordKind::Income,
            id: "i9".to_string(),
        },
        Some(config_file.path().to_str().unwrap()),
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "Failed to delete income");
}

#[test_log::test(tokio::test)]
async fn test_unreachable_listing_fails_load() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/get-incomes"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/get-expenses"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&mock_server)
        .await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let err = fintrack::run_command(
        AppCommand::List(RecordKind::Expense),
        Some(config_file.path().to_str().unwrap()),
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "Failed to fetch incomes");
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_fails() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = dir.path().join("missing.yaml");

    let result =
        fintrack::run_command(AppCommand::Summary, Some(config_path.to_str().unwrap())).await;
    assert!(result.is_err());
}

#[test_log::test(tokio::test)]
async fn test_store_derivations_over_http() {
    let mock_server = MockServer::start().await;
    test_utils::mount_listings(&mock_server, 1, 1).await;

    let api = HttpFinanceApi::new(&mock_server.uri()).expect("Failed to create client");
    let store = FinanceStore::new(Arc::new(api));
    store.load().await.expect("Failed to load store");

    assert_eq!(store.total_income(), 100.0);
    assert_eq!(store.total_expenses(), 40.0);
    assert_eq!(store.total_balance(), 60.0);

    let history = store.transaction_history();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].kind, RecordKind::Expense);
    assert_eq!(history[0].record.id, "e1");
    assert_eq!(history[1].record.id, "i1");

    store.shutdown().await;
    assert!(store.incomes().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_add_succeeds_when_refresh_fails() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/get-incomes"))
        .respond_with(ResponseTemplate::new(200).set_body_string(test_utils::INCOMES_JSON))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/get-incomes"))
        .respond_with(ResponseTemplate::new(502))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/get-expenses"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/add-income"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock_server)
        .await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let draft = RecordDraft {
        title: "Dividends".to_string(),
        amount: 80.0,
        category: "investments".to_string(),
        description: String::new(),
    };
    let result = fintrack::run_command(
        AppCommand::Add(RecordKind::Income, draft),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Add command failed with: {:?}", result.err());
}
