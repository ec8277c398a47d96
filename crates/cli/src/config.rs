//! CLI configuration utilities

use anyhow::Result;
use catalog_frontend_common::FrontendConfig;
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

/// Prefix of environment overrides, e.g. `CATALOG_API__BASE_URL`
pub const ENV_PREFIX: &str = "CATALOG";

/// File the session token is persisted in, relative to the data directory
pub const SESSION_FILE: &str = "session.json";

/// Resolve the data directory: `CATALOG_STATE_DIR`, then the system data dir
pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CATALOG_STATE_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("catalog")
    }
}

/// Load frontend configuration.
///
/// Defaults are overridden by `path` (TOML or YAML, picked by extension),
/// which in turn is overridden by `CATALOG_*` environment variables. Nested
/// keys use a double underscore: `CATALOG_API__TIMEOUT_SECS=10`.
pub fn load_config(path: Option<&Path>) -> Result<FrontendConfig> {
    let mut builder = Config::builder().add_source(Config::try_from(&FrontendConfig::default())?);

    if let Some(path) = path {
        builder = builder.add_source(File::from(path));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    Ok(builder.build()?.try_deserialize()?)
}
