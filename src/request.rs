//! Thin asynchronous request helper
//!
//! Sends a JSON request, then reports either a success body (JSON when it
//! parses, raw text otherwise) or a status/reason pair. Transport failures
//! are reported as status `0`. There is no retry.

use crate::error::UiResult;
use reqwest::{header::CONTENT_TYPE, Client, Method, StatusCode};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Status reported when no HTTP response was received
pub const NETWORK_ERROR_STATUS: u16 = 0;
pub const NETWORK_ERROR_TEXT: &str = "Network error";

type SuccessHook = Box<dyn FnOnce(&ResponseBody) + Send>;
type ErrorHook = Box<dyn FnOnce(u16, &str) + Send>;

/// Body of a successful response
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(serde_json::Value),
    Text(String),
}

impl ResponseBody {
    /// Decode as JSON, keeping the raw text when that fails
    pub fn from_text(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum RequestOutcome {
    Success { body: ResponseBody },
    Failure { status: u16, status_text: String },
}

impl RequestOutcome {
    fn network_error() -> Self {
        Self::Failure {
            status: NETWORK_ERROR_STATUS,
            status_text: NETWORK_ERROR_TEXT.to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Per-request options
pub struct RequestOptions {
    pub method: Method,
    pub data: Option<serde_json::Value>,
    on_success: Option<SuccessHook>,
    on_error: Option<ErrorHook>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            data: None,
            on_success: None,
            on_error: None,
        }
    }
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn on_success(mut self, hook: impl FnOnce(&ResponseBody) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(hook));
        self
    }

    pub fn on_error(mut self, hook: impl FnOnce(u16, &str) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(hook));
        self
    }
}

#[derive(Debug, Clone)]
pub struct Requester {
    client: Client,
}

impl Requester {
    pub fn new(timeout: Duration) -> UiResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Send a request and run whichever hook matches the outcome
    pub async fn send(&self, url: &str, options: RequestOptions) -> RequestOutcome {
        let RequestOptions {
            method,
            data,
            on_success,
            on_error,
        } = options;

        debug!("{} {}", method, url);
        let mut request = self
            .client
            .request(method.clone(), url)
            .header("X-Requested-With", "XMLHttpRequest")
            .header(CONTENT_TYPE, "application/json");
        // GET and HEAD requests carry no body, as with XMLHttpRequest
        if let Some(data) = data.filter(|_| !discards_body(&method)) {
            request = request.body(data.to_string());
        }

        let outcome = match request.send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    match response.text().await {
                        Ok(text) => RequestOutcome::Success {
                            body: ResponseBody::from_text(text),
                        },
                        Err(e) => {
                            warn!("Failed to read response body from {}: {}", url, e);
                            RequestOutcome::network_error()
                        }
                    }
                } else {
                    RequestOutcome::Failure {
                        status: status.as_u16(),
                        status_text: status_text(status),
                    }
                }
            }
            Err(e) => {
                warn!("Request to {} failed: {}", url, e);
                RequestOutcome::network_error()
            }
        };

        match &outcome {
            RequestOutcome::Success { body } => {
                if let Some(hook) = on_success {
                    hook(body);
                }
            }
            RequestOutcome::Failure {
                status,
                status_text,
            } => {
                if let Some(hook) = on_error {
                    hook(*status, status_text.as_str());
                }
            }
        }

        outcome
    }
}

fn discards_body(method: &Method) -> bool {
    *method == Method::GET || *method == Method::HEAD
}

/// Reason phrase for a status, or the bare code when it has none
fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => reason.to_string(),
        None => status.as_u16().to_string(),
    }
}
