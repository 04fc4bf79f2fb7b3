use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{
    API_URL_VAR, CONFIG_PATH_VAR, IMAGE_BASE_URL_VAR, REQUEST_TIMEOUT_VAR,
    TOKEN_PATH_VAR,
};
use crate::util::non_empty;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub api: FileApiConfig,
    #[serde(default)]
    pub session: FileSessionConfig,
    #[serde(default)]
    pub images: FileImageConfig,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileApiConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileSessionConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_path: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileImageConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Values picked up from the process environment. Blank variables count as
/// unset.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub api_url: Option<String>,
    pub request_timeout: Option<String>,
    pub token_path: Option<PathBuf>,
    pub image_base_url: Option<String>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the env layer from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).and_then(non_empty);

        Self {
            config_path: var(CONFIG_PATH_VAR).map(PathBuf::from),
            api_url: var(API_URL_VAR),
            request_timeout: var(REQUEST_TIMEOUT_VAR),
            token_path: var(TOKEN_PATH_VAR).map(PathBuf::from),
            image_base_url: var(IMAGE_BASE_URL_VAR),
        }
    }
}
