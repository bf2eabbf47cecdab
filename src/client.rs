use thiserror::Error;

use crate::{
    models::report::{ReportDraft, ReportListQuery, ReportResponse, ReportStatusRequest},
    routes::ApiEnvelope,
};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Api(String),
}

/// Thin wrapper over the report API; callers handle every error themselves.
/// No retry, no caching, no request deduplication.
pub struct ReportsClient {
    http: reqwest::Client,
    base_url: String,
}

impl ReportsClient {
    pub fn new(base_url: impl Into<String>) -> ReportsClient {
        ReportsClient {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_env() -> ReportsClient {
        let base_url = std::env::var("API_BASE_URL")
            .unwrap_or_else(|_| String::from("http://localhost:5555/api"));
        ReportsClient::new(base_url)
    }

    pub async fn fetch_reports(
        &self,
        query: &ReportListQuery,
    ) -> Result<Vec<ReportResponse>, ClientError> {
        let envelope = self
            .http
            .get(format!("{}/reports", self.base_url))
            .query(query)
            .send()
            .await?
            .json()
            .await?;

        unwrap_envelope(envelope)
    }

    pub async fn create_report(&self, report: &ReportDraft) -> Result<ReportResponse, ClientError> {
        let envelope = self
            .http
            .post(format!("{}/report", self.base_url))
            .json(report)
            .send()
            .await?
            .json()
            .await?;

        unwrap_envelope(envelope)
    }

    pub async fn get_report(&self, report_id: &str) -> Result<ReportResponse, ClientError> {
        let envelope = self
            .http
            .get(format!("{}/report/{report_id}", self.base_url))
            .send()
            .await?
            .json()
            .await?;

        unwrap_envelope(envelope)
    }

    pub async fn update_report_status(
        &self,
        report_id: &str,
        status: &str,
    ) -> Result<ReportResponse, ClientError> {
        let envelope = self
            .http
            .put(format!("{}/report/{report_id}", self.base_url))
            .json(&ReportStatusRequest {
                status: Some(status.to_string()),
            })
            .send()
            .await?
            .json()
            .await?;

        unwrap_envelope(envelope)
    }
}

fn unwrap_envelope<T>(envelope: ApiEnvelope<T>) -> Result<T, ClientError> {
    if !envelope.success {
        let message = envelope
            .message
            .or(envelope.error)
            .unwrap_or_else(|| String::from("Request failed"));
        return Err(ClientError::Api(message));
    }

    envelope
        .data
        .ok_or_else(|| ClientError::Api(String::from("Response has no data")))
}
