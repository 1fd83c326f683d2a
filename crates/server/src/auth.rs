//! Registration, login and the current user.

use api_types::{
    Envelope,
    auth::{AuthResponse, LoginRequest, RegisterRequest, UserView},
};
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    ServerError,
    extract::{CurrentUser, ValidJson},
    server::ServerState,
};

pub(crate) fn map_user(user: engine::User) -> UserView {
    UserView {
        id: user.id,
        email: user.email,
        name: user.name,
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

fn map_session(session: engine::Session) -> AuthResponse {
    AuthResponse {
        token: session.token,
        user: map_user(session.user),
    }
}

pub async fn register(
    State(state): State<ServerState>,
    ValidJson(payload): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<Envelope<AuthResponse>>), ServerError> {
    let session = state
        .engine
        .register(&payload.name, &payload.email, &payload.password)
        .await?;
    Ok((StatusCode::CREATED, Json(Envelope::data(map_session(session)))))
}

pub async fn login(
    State(state): State<ServerState>,
    ValidJson(payload): ValidJson<LoginRequest>,
) -> Result<Json<Envelope<AuthResponse>>, ServerError> {
    let session = state.engine.login(&payload.email, &payload.password).await?;
    Ok(Json(Envelope::data(map_session(session))))
}

pub async fn me(user: CurrentUser) -> Json<Envelope<UserView>> {
    Json(Envelope::data(map_user(user.0)))
}
