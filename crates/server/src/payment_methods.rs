//! Payment methods API endpoints.

use api_types::{
    Envelope,
    payment_method::{PaymentMethodCreate, PaymentMethodType, PaymentMethodUpdate, PaymentMethodView},
};
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    ServerError,
    extract::{CurrentUser, PathId, ValidJson},
    server::ServerState,
};

fn to_engine_kind(kind: PaymentMethodType) -> engine::PaymentMethodType {
    match kind {
        PaymentMethodType::CreditCard => engine::PaymentMethodType::CreditCard,
        PaymentMethodType::DebitCard => engine::PaymentMethodType::DebitCard,
        PaymentMethodType::BankAccount => engine::PaymentMethodType::BankAccount,
        PaymentMethodType::DigitalWallet => engine::PaymentMethodType::DigitalWallet,
        PaymentMethodType::Other => engine::PaymentMethodType::Other,
    }
}

fn from_engine_kind(kind: engine::PaymentMethodType) -> PaymentMethodType {
    match kind {
        engine::PaymentMethodType::CreditCard => PaymentMethodType::CreditCard,
        engine::PaymentMethodType::DebitCard => PaymentMethodType::DebitCard,
        engine::PaymentMethodType::BankAccount => PaymentMethodType::BankAccount,
        engine::PaymentMethodType::DigitalWallet => PaymentMethodType::DigitalWallet,
        engine::PaymentMethodType::Other => PaymentMethodType::Other,
    }
}

fn map_payment_method(method: engine::PaymentMethod) -> PaymentMethodView {
    PaymentMethodView {
        id: method.id,
        user_id: method.user_id,
        name: method.name,
        kind: from_engine_kind(method.kind),
        last_four: method.last_four,
        created_at: method.created_at,
        updated_at: method.updated_at,
    }
}

pub async fn list(
    user: CurrentUser,
    State(state): State<ServerState>,
) -> Result<Json<Envelope<Vec<PaymentMethodView>>>, ServerError> {
    let methods = state
        .engine
        .payment_methods(user.id())
        .await?
        .into_iter()
        .map(map_payment_method)
        .collect();
    Ok(Json(Envelope::data(methods)))
}

pub async fn get(
    user: CurrentUser,
    State(state): State<ServerState>,
    PathId(id): PathId,
) -> Result<Json<Envelope<PaymentMethodView>>, ServerError> {
    let method = state.engine.payment_method(id, user.id()).await?;
    Ok(Json(Envelope::data(map_payment_method(method))))
}

pub async fn create(
    user: CurrentUser,
    State(state): State<ServerState>,
    ValidJson(payload): ValidJson<PaymentMethodCreate>,
) -> Result<(StatusCode, Json<Envelope<PaymentMethodView>>), ServerError> {
    let method = state
        .engine
        .new_payment_method(
            &payload.name,
            to_engine_kind(payload.kind),
            payload.last_four.as_deref(),
            user.id(),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(map_payment_method(method))),
    ))
}

pub async fn update(
    user: CurrentUser,
    State(state): State<ServerState>,
    PathId(id): PathId,
    ValidJson(payload): ValidJson<PaymentMethodUpdate>,
) -> Result<Json<Envelope<PaymentMethodView>>, ServerError> {
    let method = state
        .engine
        .update_payment_method(
            id,
            &payload.name,
            to_engine_kind(payload.kind),
            &payload.last_four,
            user.id(),
        )
        .await?;
    Ok(Json(Envelope::data(map_payment_method(method))))
}

pub async fn delete(
    user: CurrentUser,
    State(state): State<ServerState>,
    PathId(id): PathId,
) -> Result<Json<Envelope<()>>, ServerError> {
    state.engine.delete_payment_method(id, user.id()).await?;
    Ok(Json(Envelope::message("Payment method deleted successfully")))
}
