//! Environment variable names and built-in defaults.

pub const CONFIG_PATH_VAR: &str = "MARQUEE_CONFIG";
pub const API_URL_VAR: &str = "MARQUEE_API_URL";
pub const REQUEST_TIMEOUT_VAR: &str = "MARQUEE_REQUEST_TIMEOUT";
pub const TOKEN_PATH_VAR: &str = "MARQUEE_TOKEN_PATH";
pub const IMAGE_BASE_URL_VAR: &str = "MARQUEE_IMAGE_BASE_URL";

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5050/api/v1/";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/";

/// Name of the on-disk slot holding the session token.
pub const TOKEN_SLOT: &str = "actkn";

pub const APP_ORGANIZATION: &str = "marquee";
pub const APP_NAME: &str = "marquee";

pub const DEFAULT_CONFIG_LOCATIONS: [&str; 2] =
    ["marquee.toml", "config/marquee.toml"];
