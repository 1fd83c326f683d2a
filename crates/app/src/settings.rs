//! Handles settings for the application.
//!
//! Values are read from an optional `settings.toml` next to the binary, then
//! from the environment (after `.env` has been loaded), the latter winning.
//! Keys are the lowercase form of the environment variables, e.g.
//! `JWT_SECRET_KEY` is `jwt_secret_key`.
use chrono::Duration;
use config::{Config, ConfigError, Environment, File, builder::DefaultState};
use engine::{
    EngineError, PasswordHasher, TokenConfig,
    auth::{DEFAULT_HASH_ITERATIONS, DEFAULT_HASH_MEMORY_KIB, DEFAULT_TOKEN_TTL_HOURS},
};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_BIND: &str = "0.0.0.0";
const DEFAULT_DATABASE_URL: &str = "sqlite:./subtrack.db?mode=rwc";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Everything but RFC 3986 unreserved characters is escaped in userinfo.
const USERINFO: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Deserialize)]
pub struct Settings {
    port: Option<u16>,
    server_port: Option<u16>,
    bind: Option<String>,

    database_url: Option<String>,
    db_host: Option<String>,
    db_port: Option<u16>,
    db_user: Option<String>,
    db_password: Option<String>,
    db_name: Option<String>,
    db_ssl_mode: Option<String>,

    jwt_secret_key: String,
    jwt_expiration_hours: Option<i64>,

    password_hash_memory_kib: Option<u32>,
    password_hash_iterations: Option<u32>,

    log_level: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("settings").required(false))
                .add_source(Environment::default()),
        )
    }

    fn from_builder(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder.build()?.try_deserialize()
    }

    /// `bind:port` to listen on. `PORT` wins over `SERVER_PORT`.
    pub fn address(&self) -> String {
        let bind = self.bind.as_deref().unwrap_or(DEFAULT_BIND);
        let port = self.port.or(self.server_port).unwrap_or(DEFAULT_PORT);
        format!("{bind}:{port}")
    }

    /// An explicit `DATABASE_URL`, else a Postgres URL when `DB_HOST` is set,
    /// else a local SQLite file.
    pub fn database_url(&self) -> String {
        if let Some(url) = &self.database_url {
            return url.clone();
        }
        let Some(host) = &self.db_host else {
            return DEFAULT_DATABASE_URL.to_string();
        };
        format!(
            "postgres://{user}:{password}@{host}:{port}/{name}?sslmode={ssl}",
            user = utf8_percent_encode(
                self.db_user.as_deref().unwrap_or("postgres"),
                USERINFO
            ),
            password = utf8_percent_encode(
                self.db_password.as_deref().unwrap_or_default(),
                USERINFO
            ),
            port = self.db_port.unwrap_or(5432),
            name = self.db_name.as_deref().unwrap_or("subtrack"),
            ssl = self.db_ssl_mode.as_deref().unwrap_or("disable"),
        )
    }

    pub fn token_config(&self) -> Result<TokenConfig, ConfigError> {
        let hours = self.jwt_expiration_hours.unwrap_or(DEFAULT_TOKEN_TTL_HOURS);
        if hours <= 0 {
            return Err(ConfigError::Message(
                "jwt_expiration_hours must be positive".to_string(),
            ));
        }
        let ttl = Duration::try_hours(hours).ok_or_else(|| {
            ConfigError::Message("jwt_expiration_hours is too large".to_string())
        })?;
        Ok(TokenConfig::new(self.jwt_secret_key.clone(), ttl))
    }

    pub fn password_hasher(&self) -> Result<PasswordHasher, EngineError> {
        PasswordHasher::new(
            self.password_hash_memory_kib
                .unwrap_or(DEFAULT_HASH_MEMORY_KIB),
            self.password_hash_iterations
                .unwrap_or(DEFAULT_HASH_ITERATIONS),
        )
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}
