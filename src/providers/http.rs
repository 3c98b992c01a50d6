use crate::core::api::{ApiError, ApiResult, FinanceApi};
use crate::core::record::{Endpoint, Record, RecordDraft, RecordKind};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use tracing::{debug, error};

const API_PREFIX: &str = "api/v1";

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// `FinanceApi` backed by the tracker's REST server.
pub struct HttpFinanceApi {
    base_url: String,
    client: Client,
}

impl HttpFinanceApi {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("fintrack/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, API_PREFIX, path)
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.message);
        error!(status = status.as_u16(), response = %body, "Request rejected");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl FinanceApi for HttpFinanceApi {
    async fn list(&self, kind: RecordKind) -> ApiResult<Vec<Record>> {
        let url = self.url(&kind.path(Endpoint::List));
        debug!("Requesting {} from {}", kind.plural(), url);

        let response = self.send(self.client.get(&url)).await?;
        let records: Vec<Record> = response.json().await?;
        debug!("Received {} {}", records.len(), kind.plural());
        Ok(records)
    }

    async fn create(&self, kind: RecordKind, draft: &RecordDraft) -> ApiResult<()> {
        let url = self.url(&kind.path(Endpoint::Add));
        debug!("Posting {} to {}", kind.singular(), url);
        self.send(self.client.post(&url).json(draft)).await?;
        Ok(())
    }

    async fn update(&self, kind: RecordKind, id: &str, draft: &RecordDraft) -> ApiResult<()> {
        let url = self.url(&kind.path(Endpoint::Update(id)));
        debug!("Updating {} at {}", kind.singular(), url);
        self.send(self.client.put(&url).json(draft)).await?;
        Ok(())
    }

    async fn delete(&self, kind: RecordKind, id: &str) -> ApiResult<()> {
        let url = self.url(&kind.path(Endpoint::Delete(id)));
        debug!("Deleting {} at {}", kind.singular(), url);
        self.send(self.client.delete(&url)).await?;
        Ok(())
    }
}
