//! The dispatch seam between the gateway pipeline and the network.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use super::api_types::{ApiRequest, TransportResponse};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Nothing came back: refused connection, DNS failure, timeout, reset.
    #[error("no response received: {0}")]
    NoResponse(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Sends one request and reports whatever response arrived, whatever its
/// status.
#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn dispatch(
        &self,
        request: ApiRequest,
    ) -> Result<TransportResponse, TransportError>;
}

/// HTTP transport with a base URL fixed at construction.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// `timeout` of `None` keeps reqwest's default (no overall timeout).
    pub fn new(
        mut base_url: Url,
        timeout: Option<Duration>,
    ) -> reqwest::Result<Self> {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn resolve(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| {
                TransportError::InvalidRequest(format!("{path}: {err}"))
            })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn dispatch(
        &self,
        request: ApiRequest,
    ) -> Result<TransportResponse, TransportError> {
        let url = self.resolve(&request.path)?;

        let mut builder = self
            .client
            .request(request.method, url)
            .headers(request.headers);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        let response = builder
            .send()
            .await
            .map_err(|err| TransportError::NoResponse(err.to_string()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| TransportError::NoResponse(err.to_string()))?;

        Ok(TransportResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_join_beneath_the_base() {
        let base = Url::parse("http://127.0.0.1:5050/api/v1").unwrap();
        let transport = ReqwestTransport::new(base, None).unwrap();

        assert_eq!(
            transport.base_url().as_str(),
            "http://127.0.0.1:5050/api/v1/"
        );

        assert_eq!(
            transport.resolve("genre/movie").unwrap().as_str(),
            "http://127.0.0.1:5050/api/v1/genre/movie"
        );
        assert_eq!(
            transport.resolve("/user/info").unwrap().as_str(),
            "http://127.0.0.1:5050/api/v1/user/info"
        );
    }
}
