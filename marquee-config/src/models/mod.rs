use std::path::PathBuf;
use std::time::Duration;

use url::Url;

pub mod sources;

/// Fully resolved client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub images: ImageConfig,
    pub metadata: ConfigMetadata,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Always ends with `/`.
    pub base_url: Url,
    /// `None` leaves the transport default in place.
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub token_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ImageConfig {
    pub base_url: Url,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
