pub mod api_client;
pub mod api_types;
pub mod routes;
pub mod services;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use api_client::{ApiClient, SessionEvent};
pub use api_types::{ApiError, ApiRequest, ApiResult, TransportResponse};
pub use transport::{ReqwestTransport, Transport, TransportError};
