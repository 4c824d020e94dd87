//! Configuration for Shop API

use axum_helpers::JwtConfig;
use core_config::{AppInfo, FromEnv, app_info, env_or_default, server::ServerConfig};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub jwt: JwtConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub media_root: String,
    pub media_base_url: String,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?;
        let jwt = JwtConfig::from_env()?;
        let server = ServerConfig::from_env()?;

        let media_root = env_or_default("MEDIA_ROOT", "media");
        let media_base_url = env_or_default("MEDIA_BASE_URL", "/media");

        Ok(Self {
            app: app_info!(),
            database,
            jwt,
            server,
            environment,
            media_root,
            media_base_url,
        })
    }
}
