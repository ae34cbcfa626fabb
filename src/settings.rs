use std::path::PathBuf;

use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::session::DEFAULT_MAX_AGE_MINUTES;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Settings {
    pub backend_base_url: Url,
    pub debug: bool,
    pub enable_swagger: bool,
    pub port: u16,
    /// Built-in seed catalog when unset.
    pub catalog_path: Option<PathBuf>,
    /// Any origin when unset.
    pub cors_origin: Option<String>,
    pub session_max_age_minutes: i64,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // APP_BACKEND_BASE_URL, APP_PORT, ...
            .add_source(Environment::with_prefix("APP"))
            .set_default("backend_base_url", "http://localhost:5000/api")?
            .set_default("debug", false)?
            .set_default("enable_swagger", true)?
            .set_default("port", 8080)?
            .set_default("session_max_age_minutes", DEFAULT_MAX_AGE_MINUTES)?
            .build()?;

        config.try_deserialize()
    }
}
