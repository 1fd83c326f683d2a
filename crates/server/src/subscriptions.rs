//! Subscriptions API endpoints.

use api_types::{
    Envelope,
    subscription::{SubscriptionCreate, SubscriptionUpdate, SubscriptionView},
};
use axum::{Json, extract::State, http::StatusCode};
use engine::{Amount, SubscriptionFilter, SubscriptionInput};

use crate::{
    ServerError,
    extract::{CurrentUser, PathId, ValidJson},
    server::ServerState,
};

fn map_subscription(subscription: engine::Subscription) -> SubscriptionView {
    SubscriptionView {
        id: subscription.id,
        user_id: subscription.user_id,
        name: subscription.name,
        description: subscription.description,
        amount: subscription.amount.as_major(),
        category_id: subscription.category_id,
        currency_id: subscription.currency_id,
        billing_cycle_id: subscription.billing_cycle_id,
        payment_method_id: subscription.payment_method_id,
        next_billing_date: subscription.next_billing_date,
        reminder_days: subscription.reminder_days,
        active: subscription.active,
        created_at: subscription.created_at,
        updated_at: subscription.updated_at,
    }
}

fn create_input(payload: SubscriptionCreate) -> Result<SubscriptionInput, ServerError> {
    Ok(SubscriptionInput {
        name: payload.name,
        description: payload.description,
        amount: Amount::from_major(payload.amount)?,
        category_id: payload.category_id,
        currency_id: payload.currency_id,
        billing_cycle_id: payload.billing_cycle_id,
        payment_method_id: payload.payment_method_id,
        next_billing_date: payload.next_billing_date,
        reminder_days: payload.reminder_days,
        active: true,
    })
}

/// Updates restate every field, `active` included.
fn update_input(payload: SubscriptionUpdate) -> Result<SubscriptionInput, ServerError> {
    Ok(SubscriptionInput {
        name: payload.name,
        description: payload.description,
        amount: Amount::from_major(payload.amount)?,
        category_id: payload.category_id,
        currency_id: payload.currency_id,
        billing_cycle_id: payload.billing_cycle_id,
        payment_method_id: payload.payment_method_id,
        next_billing_date: payload.next_billing_date,
        reminder_days: payload.reminder_days,
        active: payload.active,
    })
}

async fn list_filtered(
    state: &ServerState,
    user: &CurrentUser,
    filter: SubscriptionFilter,
) -> Result<Json<Envelope<Vec<SubscriptionView>>>, ServerError> {
    let subscriptions = state
        .engine
        .subscriptions(filter, user.id())
        .await?
        .into_iter()
        .map(map_subscription)
        .collect();
    Ok(Json(Envelope::data(subscriptions)))
}

pub async fn create(
    user: CurrentUser,
    State(state): State<ServerState>,
    ValidJson(payload): ValidJson<SubscriptionCreate>,
) -> Result<(StatusCode, Json<Envelope<SubscriptionView>>), ServerError> {
    let input = create_input(payload)?;
    let subscription = state.engine.new_subscription(input, user.id()).await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(map_subscription(subscription))),
    ))
}

pub async fn list(
    user: CurrentUser,
    State(state): State<ServerState>,
) -> Result<Json<Envelope<Vec<SubscriptionView>>>, ServerError> {
    list_filtered(&state, &user, SubscriptionFilter::All).await
}

pub async fn list_by_category(
    user: CurrentUser,
    State(state): State<ServerState>,
    PathId(id): PathId,
) -> Result<Json<Envelope<Vec<SubscriptionView>>>, ServerError> {
    list_filtered(&state, &user, SubscriptionFilter::Category(id)).await
}

pub async fn list_by_billing_cycle(
    user: CurrentUser,
    State(state): State<ServerState>,
    PathId(id): PathId,
) -> Result<Json<Envelope<Vec<SubscriptionView>>>, ServerError> {
    list_filtered(&state, &user, SubscriptionFilter::BillingCycle(id)).await
}

pub async fn list_by_payment_method(
    user: CurrentUser,
    State(state): State<ServerState>,
    PathId(id): PathId,
) -> Result<Json<Envelope<Vec<SubscriptionView>>>, ServerError> {
    list_filtered(&state, &user, SubscriptionFilter::PaymentMethod(id)).await
}

pub async fn get(
    user: CurrentUser,
    State(state): State<ServerState>,
    PathId(id): PathId,
) -> Result<Json<Envelope<SubscriptionView>>, ServerError> {
    let subscription = state.engine.subscription(id, user.id()).await?;
    Ok(Json(Envelope::data(map_subscription(subscription))))
}

pub async fn update(
    user: CurrentUser,
    State(state): State<ServerState>,
    PathId(id): PathId,
    ValidJson(payload): ValidJson<SubscriptionUpdate>,
) -> Result<Json<Envelope<SubscriptionView>>, ServerError> {
    let input = update_input(payload)?;
    let subscription = state.engine.update_subscription(id, input, user.id()).await?;
    Ok(Json(Envelope::data(map_subscription(subscription))))
}

pub async fn delete(
    user: CurrentUser,
    State(state): State<ServerState>,
    PathId(id): PathId,
) -> Result<Json<Envelope<()>>, ServerError> {
    state.engine.delete_subscription(id, user.id()).await?;
    Ok(Json(Envelope::message("Subscription deleted successfully")))
}
