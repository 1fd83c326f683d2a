//! Password hashing and bearer tokens.
//!
//! Passwords are hashed with argon2id and a random salt; tokens are HS256 JWTs
//! signed with a process-wide secret carried by [`TokenConfig`].

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ulid::Ulid;

use crate::{EngineError, ResultEngine, User};

/// Default token lifetime.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;
/// Default argon2 memory cost, in KiB.
pub const DEFAULT_HASH_MEMORY_KIB: u32 = Params::DEFAULT_M_COST;
/// Default argon2 number of passes.
pub const DEFAULT_HASH_ITERATIONS: u32 = Params::DEFAULT_T_COST;

/// Argon2id hasher with a configurable cost.
#[derive(Clone, Debug)]
pub struct PasswordHasher {
    params: Params,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl PasswordHasher {
    /// Builds a hasher with the given memory cost (KiB) and number of passes.
    pub fn new(memory_kib: u32, iterations: u32) -> ResultEngine<Self> {
        let params = Params::new(memory_kib, iterations, Params::DEFAULT_P_COST, None)
            .map_err(|err| EngineError::Internal(format!("invalid argon2 parameters: {err}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes `plain` into a PHC string.
    pub fn hash(&self, plain: &str) -> ResultEngine<String> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| EngineError::Internal(format!("failed to hash password: {err}")))
    }

    /// Checks `plain` against a stored PHC string. The parameters are read from
    /// the hash itself, so hashes made with another cost still verify.
    pub fn verify(&self, hash: &str, plain: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            tracing::warn!("stored password hash is not a valid PHC string");
            return false;
        };
        self.argon2()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Claims embedded in every token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub email: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    /// Parses the user id claim.
    pub fn user_id(&self) -> Result<Ulid, TokenError> {
        Ulid::from_string(&self.user_id).map_err(|_| TokenError::Invalid)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token has expired")]
    Expired,
    #[error("Invalid token")]
    Invalid,
}

/// Signing secret and lifetime of issued tokens.
#[derive(Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: impl Into<String>, ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            ttl,
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            ttl: Duration::hours(DEFAULT_TOKEN_TTL_HOURS),
        }
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Issues and validates tokens.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer").field("ttl", &self.ttl).finish()
    }
}

impl TokenIssuer {
    pub fn new(config: &TokenConfig) -> ResultEngine<Self> {
        if config.secret.is_empty() {
            return Err(EngineError::Internal(
                "token signing secret must not be empty".to_string(),
            ));
        }
        let secret = config.secret.as_bytes();
        let mut validation = Validation::default();
        validation.leeway = 0;
        validation.validate_nbf = true;
        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: config.ttl,
        })
    }

    /// Signs a token for `user`, valid from now for the configured lifetime.
    pub fn generate(&self, user: &User) -> ResultEngine<String> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| EngineError::Internal("token lifetime out of range".to_string()))?;
        let claims = Claims {
            user_id: user.id.to_string(),
            email: user.email.clone(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: exp.timestamp(),
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|err| EngineError::Internal(format!("failed to sign token: {err}")))
    }

    /// Verifies signature and expiry.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::new_id;

    fn user() -> User {
        let now = Utc::now();
        User {
            id: new_id(),
            email: "ada@example.com".to_string(),
            name: "Ada".to_string(),
            password_hash: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    fn cheap_hasher() -> PasswordHasher {
        PasswordHasher::new(1024, 1).unwrap()
    }

    #[test]
    fn hash_then_verify() {
        let hasher = cheap_hasher();
        let hash = hasher.hash("hunter22").unwrap();
        assert_ne!(hash, "hunter22");
        assert!(hasher.verify(&hash, "hunter22"));
        assert!(!hasher.verify(&hash, "hunter23"));
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = cheap_hasher();
        assert_ne!(hasher.hash("same").unwrap(), hasher.hash("same").unwrap());
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(!cheap_hasher().verify("not-a-phc-string", "whatever"));
    }

    #[test]
    fn fresh_token_validates() {
        let issuer = TokenIssuer::new(&TokenConfig::new("secret", Duration::hours(1))).unwrap();
        let user = user();
        let token = issuer.generate(&user).unwrap();
        let claims = issuer.validate(&token).unwrap();
        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.email, user.email);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_past_lifetime_is_expired() {
        let issuer =
            TokenIssuer::new(&TokenConfig::new("secret", Duration::seconds(-5))).unwrap();
        let token = issuer.generate(&user()).unwrap();
        assert_eq!(issuer.validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn token_signed_with_other_secret_is_invalid() {
        let issuer = TokenIssuer::new(&TokenConfig::new("secret", Duration::hours(1))).unwrap();
        let other = TokenIssuer::new(&TokenConfig::new("other", Duration::hours(1))).unwrap();
        let token = other.generate(&user()).unwrap();
        assert_eq!(issuer.validate(&token), Err(TokenError::Invalid));
        assert_eq!(issuer.validate("not.a.token"), Err(TokenError::Invalid));
    }

    #[test]
    fn lifetime_out_of_range_is_an_error() {
        let issuer = TokenIssuer::new(&TokenConfig::new("secret", Duration::MAX)).unwrap();
        assert!(matches!(
            issuer.generate(&user()),
            Err(EngineError::Internal(_))
        ));
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(TokenIssuer::new(&TokenConfig::default()).is_err());
    }
}
