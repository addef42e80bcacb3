//! Multipart HTTP transport built on reqwest

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use super::adapter::TransportAdapter;
use super::error::{TransportError, TransportResult};
use super::types::TransferRequest;

const MAX_ERROR_BODY: usize = 512;

#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// Base for relative endpoints
    pub base_url: Option<Url>,
    pub bearer_token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            bearer_token: None,
            timeout: Duration::from_secs(300),
            user_agent: concat!("adaptive-upload/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

pub struct HttpTransport {
    client: reqwest::Client,
    config: HttpTransportConfig,
}

impl HttpTransport {
    pub fn new(config: HttpTransportConfig) -> TransportResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Resolve an endpoint, joining relative paths onto the base URL
    pub fn resolve(&self, endpoint: &str) -> TransportResult<Url> {
        match Url::parse(endpoint) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let base = self.config.base_url.as_ref().ok_or_else(|| {
                    TransportError::InvalidEndpoint(format!("{endpoint}: no base URL configured"))
                })?;
                base.join(endpoint)
                    .map_err(|e| TransportError::InvalidEndpoint(format!("{endpoint}: {e}")))
            }
            Err(e) => Err(TransportError::InvalidEndpoint(format!("{endpoint}: {e}"))),
        }
    }

    fn build_form(request: TransferRequest) -> TransportResult<Form> {
        let mut form = Form::new();
        for (key, value) in request.fields.iter() {
            form = form.text(key.clone(), value.to_wire());
        }

        let payload = request.payload;
        let length = payload.data.len() as u64;
        let part = Part::stream_with_length(reqwest::Body::from(payload.data), length)
            .file_name(payload.file_name)
            .mime_str(&payload.mime_type)
            .map_err(|e| TransportError::Request(format!("invalid mime type: {e}")))?;

        Ok(form.part(request.file_field_name, part))
    }
}

/// Map an HTTP status and body to a result. Successful bodies that are not
/// JSON come back as a JSON string; empty bodies as null.
pub(crate) fn classify_response(status: u16, body: &str) -> TransportResult<Value> {
    match status {
        200..=299 => {
            if body.trim().is_empty() {
                Ok(Value::Null)
            } else {
                Ok(serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string())))
            }
        }
        401 | 403 => Err(TransportError::Unauthorized(status)),
        _ => Err(TransportError::Status {
            status,
            body: body.chars().take(MAX_ERROR_BODY).collect(),
        }),
    }
}

#[async_trait]
impl TransportAdapter for HttpTransport {
    async fn send(&self, request: TransferRequest) -> TransportResult<Value> {
        let url = self.resolve(&request.endpoint)?;
        let file_name = request.payload.file_name.clone();
        let form = Self::build_form(request)?;

        let mut builder = self.client.post(url.clone()).multipart(form);
        if let Some(token) = &self.config.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!(%url, status, file_name = %file_name, "Upload request finished");
        classify_response(status, &body)
    }
}
