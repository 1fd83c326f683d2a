//! Categories API endpoints.

use api_types::{
    Envelope,
    category::{CategoryCreate, CategoryUpdate, CategoryView},
};
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    ServerError,
    extract::{CurrentUser, PathId, ValidJson},
    server::ServerState,
};

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        system_defined: category.system_defined,
        user_id: category.user_id,
        created_at: category.created_at,
        updated_at: category.updated_at,
    }
}

pub async fn list(
    user: CurrentUser,
    State(state): State<ServerState>,
) -> Result<Json<Envelope<Vec<CategoryView>>>, ServerError> {
    let categories = state
        .engine
        .categories(user.id())
        .await?
        .into_iter()
        .map(map_category)
        .collect();
    Ok(Json(Envelope::data(categories)))
}

pub async fn get(
    user: CurrentUser,
    State(state): State<ServerState>,
    PathId(id): PathId,
) -> Result<Json<Envelope<CategoryView>>, ServerError> {
    let category = state.engine.category(id, user.id()).await?;
    Ok(Json(Envelope::data(map_category(category))))
}

pub async fn create(
    user: CurrentUser,
    State(state): State<ServerState>,
    ValidJson(payload): ValidJson<CategoryCreate>,
) -> Result<(StatusCode, Json<Envelope<CategoryView>>), ServerError> {
    let category = state.engine.new_category(&payload.name, user.id()).await?;
    Ok((StatusCode::CREATED, Json(Envelope::data(map_category(category)))))
}

pub async fn update(
    user: CurrentUser,
    State(state): State<ServerState>,
    PathId(id): PathId,
    ValidJson(payload): ValidJson<CategoryUpdate>,
) -> Result<Json<Envelope<CategoryView>>, ServerError> {
    let category = state
        .engine
        .rename_category(id, &payload.name, user.id())
        .await?;
    Ok(Json(Envelope::data(map_category(category))))
}

pub async fn delete(
    user: CurrentUser,
    State(state): State<ServerState>,
    PathId(id): PathId,
) -> Result<Json<Envelope<()>>, ServerError> {
    state.engine.delete_category(id, user.id()).await?;
    Ok(Json(Envelope::message("Category deleted successfully")))
}
