//! Request and error shapes shared by the gateway and its transports.

use reqwest::{
    Method, StatusCode,
    header::{HeaderMap, HeaderName},
};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Message used when the transport produced no response at all.
pub const NETWORK_ERROR_MESSAGE: &str = "Network Error";

pub type ApiResult<T> = Result<T, ApiError>;

/// A request relative to the configured API base.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Relative to the API base, e.g. `media/movie/popular`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: HeaderMap::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn with_query(
        mut self,
        key: impl Into<String>,
        value: impl ToString,
    ) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn header(&self, name: HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// Status and raw body of a response the transport did receive.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: StatusCode, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }
}

/// Error body contract of the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(default)]
    pub status: Option<u16>,
}

/// Normalized gateway failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// No response was received.
    #[error("Network Error")]
    Network,
    /// Non-2xx response, carried verbatim.
    #[error("{message}")]
    Server { message: String, status: u16 },
    /// Response with the unauthorized status; the session token has been
    /// purged by the time callers see this.
    #[error("{message}")]
    Unauthorized { message: String, status: u16 },
    /// 2xx response whose body does not have the expected shape.
    #[error("Invalid response payload: {0}")]
    InvalidPayload(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. }
            | ApiError::Unauthorized { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network)
    }

    /// Builds the error for a non-2xx response.
    ///
    /// The unauthorized class is decided by the HTTP status; the reported
    /// status prefers the one in the body when the server sends it.
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let (message, reported) =
            match serde_json::from_slice::<ErrorBody>(body) {
                Ok(parsed) => (parsed.message, parsed.status),
                Err(_) => (fallback_message(status, body), None),
            };
        let status_code = reported.unwrap_or(status.as_u16());

        if status == StatusCode::UNAUTHORIZED {
            ApiError::Unauthorized {
                message,
                status: status_code,
            }
        } else {
            ApiError::Server {
                message,
                status: status_code,
            }
        }
    }
}

fn fallback_message(status: StatusCode, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() {
        return text.to_string();
    }
    status
        .canonical_reason()
        .unwrap_or("Request failed")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_body_is_carried_verbatim() {
        let err = ApiError::from_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{ "message": "db down", "status": 503 }"#,
        );
        assert_eq!(
            err,
            ApiError::Server {
                message: "db down".into(),
                status: 503
            }
        );
        assert_eq!(err.message(), "db down");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn unauthorized_follows_http_status() {
        let err = ApiError::from_response(
            StatusCode::UNAUTHORIZED,
            br#"{ "message": "jwt expired" }"#,
        );
        assert!(err.is_unauthorized());
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn unstructured_bodies_fall_back_to_text_or_reason() {
        let err =
            ApiError::from_response(StatusCode::BAD_GATEWAY, b"upstream gone");
        assert_eq!(err.message(), "upstream gone");

        let err = ApiError::from_response(StatusCode::NOT_FOUND, b"");
        assert_eq!(err.message(), "Not Found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn network_error_has_fixed_message_and_no_status() {
        assert_eq!(ApiError::Network.message(), NETWORK_ERROR_MESSAGE);
        assert_eq!(ApiError::Network.status(), None);
    }

    #[test]
    fn request_builder_collects_query_pairs() {
        let request = ApiRequest::get("media/tv/top_rated").with_query("page", 3);
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.query, vec![("page".into(), "3".into())]);
    }
}
