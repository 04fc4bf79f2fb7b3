//! In-process transport for exercising the gateway and everything above it.

use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::StatusCode;
use serde_json::Value;
use tokio::sync::oneshot;

use super::api_types::{ApiRequest, TransportResponse};
use super::transport::{Transport, TransportError};

#[derive(Debug)]
enum Scripted {
    Respond(TransportResponse),
    NoResponse,
}

/// Answers each path from a queue of scripted responses and records every
/// request it sees. Unscripted paths behave like an unreachable host.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&self, path: &str, scripted: Scripted) {
        self.routes
            .lock()
            .entry(path.to_string())
            .or_default()
            .push_back(scripted);
    }

    pub(crate) fn respond(&self, path: &str, status: StatusCode, body: &str) {
        self.push(
            path,
            Scripted::Respond(TransportResponse::new(status, body)),
        );
    }

    pub(crate) fn respond_json(&self, path: &str, status: StatusCode, body: Value) {
        self.push(
            path,
            Scripted::Respond(TransportResponse::json(status, &body)),
        );
    }

    pub(crate) fn fail_connection(&self, path: &str) {
        self.push(path, Scripted::NoResponse);
    }

    /// Holds the next request to `path` in flight until the returned sender
    /// fires or is dropped.
    pub(crate) fn hold(&self, path: &str) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.gates.lock().insert(path.to_string(), gate);
        release
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }

    pub(crate) fn calls_to(&self, path: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|request| request.path == path)
            .count()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn dispatch(
        &self,
        request: ApiRequest,
    ) -> Result<TransportResponse, TransportError> {
        let path = request.path.clone();
        self.requests.lock().push(request);

        let gate = self.gates.lock().remove(&path);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        let next = self
            .routes
            .lock()
            .get_mut(&path)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::NoResponse) | None => Err(
                TransportError::NoResponse(format!("connection refused: {path}")),
            ),
        }
    }
}
