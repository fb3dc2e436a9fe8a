//! Transport client for the classification backend.
//!
//! Every call goes to one fixed base origin with a JSON content type. There
//! is no retry, no timeout and no caching here: a failure is surfaced once,
//! verbatim, to whichever controller issued the call.

use bottrainer_core::ConsoleError;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// A failed backend call.
///
/// `status` is `None` when the backend could not be reached at all.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub status: Option<u16>,
    pub message: String,
}

impl TransportError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl From<TransportError> for ConsoleError {
    fn from(err: TransportError) -> Self {
        ConsoleError::transport(err.status, err.message)
    }
}

/// Thin JSON-over-HTTP client bound to one base origin.
#[derive(Clone)]
pub struct TransportClient {
    client: Client,
    base_url: String,
}

impl TransportClient {
    /// Creates a client for `base_url` (trailing slashes are ignored).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a backend path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Issues one request and returns the decoded JSON body.
    ///
    /// An empty 2xx body decodes to `Value::Null`.
    pub async fn call<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value, TransportError>
    where
        B: Serialize + ?Sized + Sync,
    {
        let url = self.url(path);
        tracing::debug!(method = %method, url = %url, "backend call");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header("content-type", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|err| {
            tracing::warn!(method = %method, url = %url, error = %err, "backend unreachable");
            TransportError::new(None, format!("Request to {url} failed: {err}"))
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|err| {
            TransportError::new(
                Some(status.as_u16()),
                format!("Failed to read response from {url}: {err}"),
            )
        })?;

        if !status.is_success() {
            tracing::warn!(method = %method, url = %url, status = status.as_u16(), "backend returned error");
            return Err(map_http_error(status, &text));
        }

        decode_body(&text)
    }

    /// `GET path`, decoded into `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let value = self.call::<Value>(Method::GET, path, None).await?;
        decode(value)
    }

    /// `POST path` with a JSON body, decoded into `T`.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, TransportError>
    where
        B: Serialize + ?Sized + Sync,
        T: DeserializeOwned,
    {
        let value = self.call(Method::POST, path, Some(body)).await?;
        decode(value)
    }

    /// `DELETE path`; any response body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), TransportError> {
        self.call::<Value>(Method::DELETE, path, None).await?;
        Ok(())
    }
}

fn decode_body(text: &str) -> Result<Value, TransportError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text)
        .map_err(|err| TransportError::new(None, format!("Failed to parse backend response: {err}")))
}

fn decode<T: DeserializeOwned>(value: Value) -> Result<T, TransportError> {
    serde_json::from_value(value)
        .map_err(|err| TransportError::new(None, format!("Unexpected backend response: {err}")))
}

/// Builds a human-readable error from a non-2xx response.
///
/// Prefers the `detail` field the backend puts on its errors, then the raw
/// body, then the status line.
pub fn map_http_error(status: StatusCode, body: &str) -> TransportError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("detail").cloned())
        .map(|detail| match detail {
            Value::String(message) => message,
            other => other.to_string(),
        });

    let message = match detail {
        Some(message) if !message.trim().is_empty() => message,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => match status.canonical_reason() {
            Some(reason) => format!("HTTP {} {}", status.as_u16(), reason),
            None => format!("HTTP {}", status.as_u16()),
        },
    };

    TransportError::new(Some(status.as_u16()), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slashes() {
        let client = TransportClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/analyze"), "http://localhost:8000/analyze");
        assert_eq!(client.url("history"), "http://localhost:8000/history");
    }

    #[test]
    fn http_error_prefers_detail() {
        let err = map_http_error(
            StatusCode::BAD_REQUEST,
            r#"{"detail":"Invalid Gemini API Key"}"#,
        );
        assert_eq!(err.status, Some(400));
        assert_eq!(err.message, "Invalid Gemini API Key");
    }

    #[test]
    fn http_error_stringifies_structured_detail() {
        let err = map_http_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail":[{"loc":["body","message"],"msg":"field required"}]}"#,
        );
        assert!(err.message.contains("field required"));
    }

    #[test]
    fn http_error_falls_back_to_body_then_status() {
        let err = map_http_error(StatusCode::BAD_GATEWAY, "upstream down\n");
        assert_eq!(err.message, "upstream down");

        let err = map_http_error(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(err.message, "HTTP 500 Internal Server Error");
    }

    #[test]
    fn empty_body_decodes_to_null() {
        assert_eq!(decode_body("  ").unwrap(), Value::Null);
        assert!(decode_body("{not json").is_err());
    }

    #[test]
    fn transport_error_converts_verbatim() {
        let err: ConsoleError = TransportError::new(Some(503), "busy").into();
        assert_eq!(err.to_string(), "busy");
        assert_eq!(err.status(), Some(503));
    }
}
