use sea_orm::TransactionTrait;
use ulid::Ulid;

use crate::{EngineError, ResultEngine, User, repository};

use super::{Engine, normalize_required_name, with_tx};

const MIN_PASSWORD_LEN: usize = 6;
const INVALID_CREDENTIALS: &str = "invalid credentials";

/// A user together with a freshly signed token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

fn normalize_email(value: &str) -> ResultEngine<String> {
    let email = value.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(EngineError::validation("email", "invalid email address"));
    }
    Ok(email)
}

impl Engine {
    /// Creates an account and signs the user in.
    ///
    /// Emails are unique case-insensitively; a taken email is a
    /// [`EngineError::Duplicate`].
    pub async fn register(&self, name: &str, email: &str, password: &str) -> ResultEngine<Session> {
        let name = normalize_required_name(name, "user")?;
        let email = normalize_email(email)?;
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(EngineError::validation(
                "password",
                format!("password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }
        let password_hash = self.hasher.hash(password)?;

        let user = with_tx!(self, |db_tx| {
            if repository::users::email_exists(&db_tx, &email).await? {
                return Err(EngineError::Duplicate(
                    "email already registered".to_string(),
                ));
            }
            let model = repository::users::insert(&db_tx, &name, &email, &password_hash).await?;
            User::try_from(model)
        })?;
        tracing::info!(user_id = %user.id, "user registered");

        let token = self.tokens.generate(&user)?;
        Ok(Session { token, user })
    }

    /// Checks the credentials and signs the user in.
    ///
    /// Unknown email and wrong password fail the same way.
    pub async fn login(&self, email: &str, password: &str) -> ResultEngine<Session> {
        let email = email.trim().to_lowercase();
        let Some(model) = repository::users::find_by_email(&self.database, &email).await? else {
            return Err(EngineError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };
        if !self.hasher.verify(&model.password_hash, password) {
            return Err(EngineError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let user = User::try_from(model)?;
        let token = self.tokens.generate(&user)?;
        Ok(Session { token, user })
    }

    /// Resolves a bearer token to its user.
    ///
    /// The error message tells an expired token apart from any other failure.
    pub async fn authenticate(&self, token: &str) -> ResultEngine<User> {
        let claims = self
            .tokens
            .validate(token)
            .map_err(|err| EngineError::Unauthorized(err.to_string()))?;
        let user_id = claims
            .user_id()
            .map_err(|err| EngineError::Unauthorized(err.to_string()))?;
        let model = repository::users::find_by_id(&self.database, &user_id.to_string())
            .await?
            .ok_or_else(|| EngineError::Unauthorized("user no longer exists".to_string()))?;
        User::try_from(model)
    }

    /// Return a user by id.
    pub async fn user(&self, user_id: Ulid) -> ResultEngine<User> {
        let model = repository::users::find_by_id(&self.database, &user_id.to_string())
            .await?
            .ok_or_else(|| EngineError::NotFound("user".to_string()))?;
        User::try_from(model)
    }
}
