use anyhow::Result;
use serde::Deserialize;

use crate::session::SessionConfig;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct StorageConfig {
    /// JSON document holding history and preferences
    pub path: String,
}

impl Config {
    /// Load `path` (any format the `config` crate knows, extension optional)
    /// over built-in defaults, then apply `POLYTALK__SECTION__KEY`
    /// environment overrides. The file may be absent.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "polytalk")?
            .set_default("service.http.bind", "127.0.0.1")?
            .set_default("service.http.port", 8080)?
            .set_default("storage.path", "data/polytalk.json")?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("POLYTALK").separator("__"))
            .build()?;

        Ok(settings.try_deserialize()?)
    }
}
