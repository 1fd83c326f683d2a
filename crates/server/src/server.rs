use std::{sync::Arc, time::Instant};

use api_types::Envelope;
use axum::{
    Json, Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use tower_http::normalize_path::NormalizePath;

use crate::{
    ServerError, auth, billing_cycles, categories, currencies, extract::CurrentUser,
    payment_methods, subscriptions,
};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Resolves the bearer token into a [`CurrentUser`] for the protected routes.
async fn require_user(
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let TypedHeader(Authorization(bearer)) = bearer.map_err(|rejection| {
        if rejection.is_missing() {
            ServerError::Unauthorized("Authorization header is required".to_string())
        } else {
            ServerError::Unauthorized("Invalid authorization header format".to_string())
        }
    })?;

    let user = state.engine.authenticate(bearer.token()).await?;
    request.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(request).await)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %method,
        %path,
        status = response.status().as_u16(),
        latency = ?started.elapsed(),
        "request served"
    );
    response
}

async fn health(State(state): State<ServerState>) -> Result<Json<Envelope<()>>, ServerError> {
    state.engine.ping().await?;
    Ok(Json(Envelope::message("ok")))
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(Envelope::<()>::error("route not found")),
    )
}

/// Builds the whole HTTP surface around `engine`.
///
/// A trailing slash is trimmed before routing, so `/api/v1/categories/` and
/// `/api/v1/categories` reach the same handler.
pub fn router(engine: Arc<Engine>) -> Router {
    let state = ServerState { engine };

    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/currencies", get(currencies::list));

    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            get(categories::get)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route(
            "/billing-cycles",
            get(billing_cycles::list).post(billing_cycles::create),
        )
        .route(
            "/billing-cycles/{id}",
            get(billing_cycles::get)
                .put(billing_cycles::update)
                .delete(billing_cycles::delete),
        )
        .route(
            "/billing-cycles/{id}/next-billing-date",
            get(billing_cycles::next_billing_date),
        )
        .route(
            "/payment-methods",
            get(payment_methods::list).post(payment_methods::create),
        )
        .route(
            "/payment-methods/{id}",
            get(payment_methods::get)
                .put(payment_methods::update)
                .delete(payment_methods::delete),
        )
        .route(
            "/subscriptions",
            get(subscriptions::list).post(subscriptions::create),
        )
        .route(
            "/subscriptions/{id}",
            get(subscriptions::get)
                .put(subscriptions::update)
                .delete(subscriptions::delete),
        )
        .route(
            "/subscriptions/category/{id}",
            get(subscriptions::list_by_category),
        )
        .route(
            "/subscriptions/billing-cycle/{id}",
            get(subscriptions::list_by_billing_cycle),
        )
        .route(
            "/subscriptions/payment-method/{id}",
            get(subscriptions::list_by_payment_method),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    let api = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", public.merge(protected))
        .fallback(not_found)
        .with_state(state);

    Router::new()
        .fallback_service(NormalizePath::trim_trailing_slash(api))
        .layer(middleware::from_fn(log_request))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Serves on `listener` until Ctrl-C.
pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(engine)))
        .with_graceful_shutdown(shutdown_signal())
        .await
}
