//! Request extractors that reject with the JSON envelope.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use engine::User;
use serde::de::DeserializeOwned;
use ulid::Ulid;
use validator::Validate;

use crate::ServerError;

/// The authenticated user, placed in the request extensions by the auth
/// middleware.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> Ulid {
        self.0.id
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ServerError::Unauthorized("User not found in context".to_string()))
    }
}

/// JSON body that has passed its `validator` rules.
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ServerError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
            })?;
        value
            .validate()
            .map_err(|errors| ServerError::BadRequest(format!("Validation failed: {errors}")))?;
        Ok(Self(value))
    }
}

/// The single id segment of a path such as `/categories/{id}`.
pub struct PathId(pub Ulid);

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ServerError::BadRequest(rejection.body_text()))?;
        let id = engine::parse_id(&raw, "id")?;
        Ok(Self(id))
    }
}
