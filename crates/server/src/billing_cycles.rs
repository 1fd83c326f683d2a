//! Billing cycles API endpoints.

use api_types::{
    Envelope,
    billing_cycle::{
        BillingCycleCreate, BillingCycleUpdate, BillingCycleView, NextBillingDateQuery,
        NextBillingDateView,
    },
};
use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use chrono::Utc;

use crate::{
    ServerError,
    extract::{CurrentUser, PathId, ValidJson},
    server::ServerState,
};

fn map_billing_cycle(cycle: engine::BillingCycle) -> BillingCycleView {
    BillingCycleView {
        id: cycle.id,
        name: cycle.name,
        days: cycle.days,
        system_defined: cycle.system_defined,
        user_id: cycle.user_id,
        created_at: cycle.created_at,
        updated_at: cycle.updated_at,
    }
}

pub async fn list(
    user: CurrentUser,
    State(state): State<ServerState>,
) -> Result<Json<Envelope<Vec<BillingCycleView>>>, ServerError> {
    let cycles = state
        .engine
        .billing_cycles(user.id())
        .await?
        .into_iter()
        .map(map_billing_cycle)
        .collect();
    Ok(Json(Envelope::data(cycles)))
}

pub async fn get(
    user: CurrentUser,
    State(state): State<ServerState>,
    PathId(id): PathId,
) -> Result<Json<Envelope<BillingCycleView>>, ServerError> {
    let cycle = state.engine.billing_cycle(id, user.id()).await?;
    Ok(Json(Envelope::data(map_billing_cycle(cycle))))
}

pub async fn create(
    user: CurrentUser,
    State(state): State<ServerState>,
    ValidJson(payload): ValidJson<BillingCycleCreate>,
) -> Result<(StatusCode, Json<Envelope<BillingCycleView>>), ServerError> {
    let cycle = state
        .engine
        .new_billing_cycle(&payload.name, payload.days, user.id())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::data(map_billing_cycle(cycle))),
    ))
}

pub async fn update(
    user: CurrentUser,
    State(state): State<ServerState>,
    PathId(id): PathId,
    ValidJson(payload): ValidJson<BillingCycleUpdate>,
) -> Result<Json<Envelope<BillingCycleView>>, ServerError> {
    let cycle = state
        .engine
        .update_billing_cycle(id, &payload.name, payload.days, user.id())
        .await?;
    Ok(Json(Envelope::data(map_billing_cycle(cycle))))
}

pub async fn delete(
    user: CurrentUser,
    State(state): State<ServerState>,
    PathId(id): PathId,
) -> Result<Json<Envelope<()>>, ServerError> {
    state.engine.delete_billing_cycle(id, user.id()).await?;
    Ok(Json(Envelope::message("Billing cycle deleted successfully")))
}

/// `GET /billing-cycles/{id}/next-billing-date?from=<rfc3339>`
pub async fn next_billing_date(
    user: CurrentUser,
    State(state): State<ServerState>,
    PathId(id): PathId,
    query: Result<Query<NextBillingDateQuery>, QueryRejection>,
) -> Result<Json<Envelope<NextBillingDateView>>, ServerError> {
    let Query(query) = query.map_err(|rejection| ServerError::BadRequest(rejection.body_text()))?;
    let from = query.from.unwrap_or_else(Utc::now);
    let next_billing_date = state.engine.next_billing_date(id, from, user.id()).await?;
    Ok(Json(Envelope::data(NextBillingDateView {
        billing_cycle_id: id,
        from,
        next_billing_date,
    })))
}
