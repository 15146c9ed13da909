use crate::domain::model::RawRecord;
use crate::domain::ports::{ConfigProvider, RecordSource};
use crate::utils::error::{DashboardError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct FetchRequest {
    env: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Talks to the release dashboard API: one POST per cluster selection.
#[derive(Debug, Clone)]
pub struct RemoteSource {
    endpoint: String,
    client: Client,
}

impl RemoteSource {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::build(endpoint.into(), None, HeaderMap::new())
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let endpoint = config
            .api_endpoint()
            .ok_or_else(|| DashboardError::MissingConfigError {
                field: "source.endpoint".to_string(),
            })?;

        let mut headers = HeaderMap::new();
        for (name, value) in config.extra_headers() {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                DashboardError::InvalidConfigValueError {
                    field: "source.headers".to_string(),
                    value: name.clone(),
                    reason: e.to_string(),
                }
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                DashboardError::InvalidConfigValueError {
                    field: "source.headers".to_string(),
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
            headers.insert(name, value);
        }

        Self::build(endpoint.to_string(), config.request_timeout(), headers)
    }

    fn build(endpoint: String, timeout: Option<Duration>, headers: HeaderMap) -> Result<Self> {
        // The API authenticates through cookies, so keep whatever it sets.
        let mut builder = Client::builder().cookie_store(true).default_headers(headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { endpoint, client })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RecordSource for RemoteSource {
    async fn fetch(&self, cluster: &str) -> Result<Vec<RawRecord>> {
        let body = FetchRequest {
            env: cluster.to_lowercase(),
        };
        tracing::debug!("POST {} with env={}", self.endpoint, body.env);

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
            return Err(DashboardError::FetchFailed {
                status: Some(status.as_u16()),
                message,
            });
        }

        let bytes = response.bytes().await?;
        parse_records(&bytes)
    }
}

/// Decodes a response body that must be a JSON array of records.
pub fn parse_records(body: &[u8]) -> Result<Vec<RawRecord>> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| DashboardError::MalformedResponse {
            message: format!("body is not valid JSON: {}", e),
        })?;

    match value {
        serde_json::Value::Array(items) => Ok(items.into_iter().map(RawRecord::from_value).collect()),
        other => Err(DashboardError::MalformedResponse {
            message: format!("expected a JSON array, got {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
