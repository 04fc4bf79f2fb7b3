use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use url::Url;

pub mod error;

pub use error::ConfigLoadError;

use crate::constants::{
    APP_NAME, APP_ORGANIZATION, DEFAULT_API_URL, DEFAULT_CONFIG_LOCATIONS,
    DEFAULT_IMAGE_BASE_URL, TOKEN_SLOT,
};
use crate::models::{
    ApiConfig, Config, ConfigMetadata, ImageConfig, SessionConfig,
    sources::{EnvConfig, FileConfig},
};
use crate::util::{ensure_trailing_slash, parse_duration};
use crate::validation::{self, ConfigWarnings};

#[derive(Debug, Default, Clone)]
struct ConfigLoaderOptions {
    config_path: Option<PathBuf>,
    env_file: Option<PathBuf>,
    skip_env_file: bool,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    pub fn without_env_file(mut self) -> Self {
        self.options.skip_env_file = true;
        self
    }

    /// Loads `.env` (if any), reads the process environment and composes the
    /// final config.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = self.load_env_file()?;
        let mut load = self.load_with_env(EnvConfig::gather())?;
        load.config.metadata.env_file_loaded = env_file_loaded;
        Ok(load)
    }

    /// Composes the config from an already gathered env layer.
    pub fn load_with_env(
        &self,
        env: EnvConfig,
    ) -> Result<ConfigLoad, ConfigLoadError> {
        let (file_config, config_path) = self.load_file_config(&env)?;
        let (config, warnings) =
            self.compose_config(file_config, env, config_path)?;
        Ok(ConfigLoad { config, warnings })
    }

    fn load_env_file(&self) -> Result<bool, ConfigLoadError> {
        if self.options.skip_env_file {
            return Ok(false);
        }

        let result = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path),
            None => dotenvy::dotenv().map(|_| ()),
        };

        match result {
            Ok(()) => Ok(true),
            Err(dotenvy::Error::Io(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn load_file_config(
        &self,
        env: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let mut source = ConfigPathSource::default();

        if let Some(explicit) = &self.options.config_path {
            source.explicit = Some(explicit.clone());
        } else if let Some(from_env) = &env.config_path {
            source.env = Some(from_env.clone());
        } else {
            source.default = DEFAULT_CONFIG_LOCATIONS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists());
        }

        let Some((path, provenance)) = source.resolved_path() else {
            return Ok((None, None));
        };

        if !path.exists() {
            if provenance.is_explicit() {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let contents =
            fs::read_to_string(&path).map_err(|source| ConfigLoadError::Io {
                path: path.clone(),
                source,
            })?;
        let file_config: FileConfig =
            toml::from_str(&contents).map_err(|source| {
                ConfigLoadError::Parse {
                    path: path.clone(),
                    source,
                }
            })?;

        log::debug!("[Config] loaded {}", path.display());
        Ok((Some(file_config), Some(path)))
    }

    fn compose_config(
        &self,
        file_config: Option<FileConfig>,
        env: EnvConfig,
        config_path: Option<PathBuf>,
    ) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
        let mut warnings = ConfigWarnings::default();

        if file_config.is_none() {
            warnings.push_with_hint(
                "No marquee.toml detected; using environment variables and defaults",
                "Create marquee.toml or set MARQUEE_CONFIG to point at one",
            );
        }

        let FileConfig {
            api: file_api,
            session: file_session,
            images: file_images,
        } = file_config.unwrap_or_default();

        let raw_api_url = env
            .api_url
            .or(file_api.base_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api = ApiConfig {
            base_url: parse_base_url("API base URL", &raw_api_url)?,
            request_timeout: env
                .request_timeout
                .or(file_api.request_timeout)
                .map(|raw| parse_timeout(&raw))
                .transpose()?,
        };

        let token_path = match env.token_path.or(file_session.token_path) {
            Some(path) => path,
            None => default_token_path(&mut warnings),
        };
        let session = SessionConfig { token_path };

        let raw_image_url = env
            .image_base_url
            .or(file_images.base_url)
            .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string());
        let images = ImageConfig {
            base_url: parse_base_url("image base URL", &raw_image_url)?,
        };

        let config = Config {
            api,
            session,
            images,
            metadata: ConfigMetadata {
                config_path,
                env_file_loaded: false,
            },
        };

        warnings.extend(validation::review(&config));

        Ok((config, warnings))
    }
}

fn parse_base_url(
    field: &'static str,
    raw: &str,
) -> Result<Url, ConfigLoadError> {
    let mut url =
        Url::parse(raw.trim()).map_err(|source| ConfigLoadError::InvalidUrl {
            field,
            value: raw.to_string(),
            source,
        })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigLoadError::UnsupportedScheme {
            field,
            scheme: url.scheme().to_string(),
        });
    }

    ensure_trailing_slash(&mut url);
    Ok(url)
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigLoadError> {
    let timeout = parse_duration(raw).map_err(|source| {
        ConfigLoadError::InvalidTimeout {
            value: raw.to_string(),
            source,
        }
    })?;
    if timeout.is_zero() {
        return Err(ConfigLoadError::ZeroTimeout);
    }
    Ok(timeout)
}

fn default_token_path(warnings: &mut ConfigWarnings) -> PathBuf {
    match ProjectDirs::from("", APP_ORGANIZATION, APP_NAME) {
        Some(dirs) => dirs.data_dir().join(TOKEN_SLOT),
        None => {
            warnings.push_with_hint(
                "No platform data directory available; storing the session token in the working directory",
                "Set MARQUEE_TOKEN_PATH to choose a location",
            );
            Path::new(".").join(TOKEN_SLOT)
        }
    }
}

#[derive(Debug, Default)]
struct ConfigPathSource {
    explicit: Option<PathBuf>,
    env: Option<PathBuf>,
    default: Option<PathBuf>,
}

impl ConfigPathSource {
    fn resolved_path(&self) -> Option<(PathBuf, ConfigPathProvenance)> {
        if let Some(path) = &self.explicit {
            return Some((path.clone(), ConfigPathProvenance::Explicit));
        }
        if let Some(path) = &self.env {
            return Some((path.clone(), ConfigPathProvenance::Env));
        }
        if let Some(path) = &self.default {
            return Some((path.clone(), ConfigPathProvenance::Default));
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigPathProvenance {
    Explicit,
    Env,
    Default,
}

impl ConfigPathProvenance {
    fn is_explicit(self) -> bool {
        matches!(
            self,
            ConfigPathProvenance::Explicit | ConfigPathProvenance::Env
        )
    }
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}
