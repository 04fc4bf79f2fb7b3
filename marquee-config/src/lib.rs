//! Configuration library for the Marquee client.
//!
//! Settings are layered the same way everywhere: environment variables (plus
//! an optional `.env` file) override the TOML config file, which overrides
//! built-in defaults. Loading never touches the network; it only resolves and
//! validates values so the client can be wired once at startup.

pub mod constants;
pub mod loader;
pub mod models;
pub mod util;
pub mod validation;

pub use loader::{ConfigLoad, ConfigLoader, error::ConfigLoadError};
pub use models::sources::{EnvConfig, FileConfig};
pub use models::{
    ApiConfig, Config, ConfigMetadata, ImageConfig, SessionConfig,
};
pub use validation::{ConfigWarning, ConfigWarnings};
