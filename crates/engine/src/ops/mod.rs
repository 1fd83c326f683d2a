use sea_orm::DatabaseConnection;

use crate::{EngineError, PasswordHasher, ResultEngine, TokenConfig, TokenIssuer};

mod access;
mod auth;
mod billing_cycles;
mod categories;
mod currencies;
mod payment_methods;
mod subscriptions;

pub use auth::Session;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    tokens: TokenIssuer,
    hasher: PasswordHasher,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Checks that the database still answers.
    pub async fn ping(&self) -> ResultEngine<()> {
        self.database.ping().await?;
        Ok(())
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::validation(
            "name",
            format!("{label} name must not be empty"),
        ));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    token_config: TokenConfig,
    hasher: PasswordHasher,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Pass the token signing secret and lifetime. The secret is required.
    pub fn token_config(mut self, config: TokenConfig) -> EngineBuilder {
        self.token_config = config;
        self
    }

    /// Override the default argon2 cost.
    pub fn password_hasher(mut self, hasher: PasswordHasher) -> EngineBuilder {
        self.hasher = hasher;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let tokens = TokenIssuer::new(&self.token_config)?;
        Ok(Engine {
            database: self.database,
            tokens,
            hasher: self.hasher,
        })
    }
}
