//! Jobs client — the single point of contact with the document-processing backend.
//!
//! The poller only sees the `JobSource` trait, so tests can script responses
//! without a network.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::errors::FetchError;
use crate::jobs::models::{JobRecord, ResultDocument, UploadReceipt};

/// Anything that can report a job's status and, once completed, its result.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch_status(&self, job_id: &str) -> Result<JobRecord, FetchError>;

    async fn fetch_result(&self, job_id: &str) -> Result<ResultDocument, FetchError>;
}

/// HTTP implementation of `JobSource` over the backend's REST surface.
#[derive(Clone)]
pub struct JobsClient {
    client: Client,
    base_url: String,
}

impl JobsClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST /upload — submits a document and returns the id of the job processing it.
    pub async fn upload(&self, path: &Path) -> Result<UploadReceipt, FetchError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| FetchError::Transport(format!("cannot read {}: {e}", path.display())))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let form = multipart::Form::new().part("file", multipart::Part::bytes(bytes).file_name(file_name));
        let response = self
            .client
            .post(format!("{}/upload", self.base_url))
            .multipart(form)
            .send()
            .await?;

        decode(response).await
    }

    fn job_url(&self, job_id: &str) -> String {
        format!("{}/jobs/{}", self.base_url, job_id)
    }
}

#[async_trait]
impl JobSource for JobsClient {
    /// GET /jobs/{id}
    async fn fetch_status(&self, job_id: &str) -> Result<JobRecord, FetchError> {
        let response = self.client.get(self.job_url(job_id)).send().await?;
        let record: JobRecord = decode(response).await?;
        debug!(job_id, status = record.status.as_str(), "job status received");
        Ok(record)
    }

    /// GET /jobs/{id}/result
    async fn fetch_result(&self, job_id: &str) -> Result<ResultDocument, FetchError> {
        let response = self
            .client
            .get(format!("{}/result", self.job_url(job_id)))
            .send()
            .await?;
        let value: Value = decode(response).await?;
        Ok(ResultDocument::from_value(value))
    }
}

/// Reads a response body as `T`, mapping non-2xx and unparsable bodies to `FetchError::Protocol`.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, FetchError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(FetchError::from_error_body(status.as_u16(), &body));
    }

    serde_json::from_str(&body).map_err(|e| FetchError::Protocol {
        status: status.as_u16(),
        message: format!("unparsable response body: {e}"),
    })
}
