use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{SubmissionResult, SurveyPayload};

use crate::{
    config::{validate_endpoint_url, Settings},
    Transport,
};

/// JSON POST transport for the submission endpoint. The server reports
/// application-level rejection in the response body, so a non-2xx
/// status with a well-formed body is still a `SubmissionResult`.
pub struct HttpTransport {
    http: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.into();
        validate_endpoint_url(&endpoint)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self { http, endpoint })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(settings.endpoint_url.clone(), settings.request_timeout())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, payload: &SurveyPayload) -> Result<SubmissionResult> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .with_context(|| format!("failed to reach survey endpoint '{}'", self.endpoint))?;
        response
            .json::<SubmissionResult>()
            .await
            .context("survey endpoint returned a malformed response body")
    }
}
