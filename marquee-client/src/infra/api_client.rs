use std::fmt;
use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::broadcast;

use super::api_types::{ApiError, ApiRequest, ApiResult, TransportResponse};
use super::transport::{Transport, TransportError};
use crate::domains::auth::storage::SessionStore;

const SESSION_EVENT_CAPACITY: usize = 16;

/// Side effects the gateway performed on the session slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// An unauthorized response removed the stored token.
    TokenPurged,
}

/// Single chokepoint for calls to the remote service.
///
/// Each call runs through the same ordered stages:
/// `attach_auth` → `dispatch` → `normalize` → `purge_on_unauthorized`.
/// Callers get either the decoded payload or one [`ApiError`], never a
/// transport envelope.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Arc<dyn SessionStore>,
    events: broadcast::Sender<SessionEvent>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("transport", &self.transport)
            .field("session", &self.session)
            .field("event_subscribers", &self.events.receiver_count())
            .finish()
    }
}

impl ApiClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        session: Arc<dyn SessionStore>,
    ) -> Self {
        let (events, _receiver) = broadcast::channel(SESSION_EVENT_CAPACITY);
        Self {
            transport,
            session,
            events,
        }
    }

    pub fn subscribe_session_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Runs the pipeline and returns the raw JSON payload. An empty 2xx body
    /// yields `Value::Null`.
    pub async fn execute(&self, request: ApiRequest) -> ApiResult<Value> {
        let request = self.attach_auth(request).await?;
        let result = self.dispatch(request).await.and_then(Self::normalize);
        self.purge_on_unauthorized(result).await
    }

    pub async fn send<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> ApiResult<T> {
        let path = request.path.clone();
        let payload = self.execute(request).await?;
        serde_json::from_value(payload).map_err(|err| {
            log::warn!("[ApiClient] Unexpected payload from {}: {}", path, err);
            ApiError::InvalidPayload(err.to_string())
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(ApiRequest::get(path)).await
    }

    /// Reads the slot at call time; the bearer header is present exactly
    /// when a token is.
    async fn attach_auth(&self, mut request: ApiRequest) -> ApiResult<ApiRequest> {
        request
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let token = match self.session.token().await {
            Ok(token) => token,
            Err(err) => {
                log::warn!(
                    "[ApiClient] Could not read session token, sending anonymously: {}",
                    err
                );
                None
            }
        };

        match token {
            Some(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|_| {
                        ApiError::InvalidRequest(
                            "stored session token is not a valid header value"
                                .to_string(),
                        )
                    })?;
                value.set_sensitive(true);
                request.headers.insert(AUTHORIZATION, value);
            }
            None => {
                request.headers.remove(AUTHORIZATION);
            }
        }

        Ok(request)
    }

    async fn dispatch(
        &self,
        request: ApiRequest,
    ) -> ApiResult<TransportResponse> {
        log::debug!(
            "[ApiClient] {} {} (auth: {})",
            request.method,
            request.path,
            request.headers.contains_key(AUTHORIZATION)
        );

        self.transport
            .dispatch(request)
            .await
            .map_err(|err| match err {
                TransportError::NoResponse(reason) => {
                    log::warn!("[ApiClient] No response received: {}", reason);
                    ApiError::Network
                }
                TransportError::InvalidRequest(reason) => {
                    ApiError::InvalidRequest(reason)
                }
            })
    }

    fn normalize(response: TransportResponse) -> ApiResult<Value> {
        if !response.status.is_success() {
            return Err(ApiError::from_response(response.status, &response.body));
        }

        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&response.body)
            .map_err(|err| ApiError::InvalidPayload(err.to_string()))
    }

    async fn purge_on_unauthorized(
        &self,
        result: ApiResult<Value>,
    ) -> ApiResult<Value> {
        if let Err(err) = &result
            && err.is_unauthorized()
        {
            log::info!("[ApiClient] Unauthorized response, clearing session token");
            if let Err(clear_err) = self.session.clear().await {
                log::error!(
                    "[ApiClient] Failed to clear session token: {}",
                    clear_err
                );
            }
            let _ = self.events.send(SessionEvent::TokenPurged);
        }
        result
    }
}
