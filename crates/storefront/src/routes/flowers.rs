//! Catalog route handlers.
//!
//! Reads are public; writes need an admin session.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use tracing::instrument;

use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::models::{Flower, FlowerInput, FlowerQuery};
use crate::services::CatalogService;
use crate::state::AppState;

/// `GET /flowers?occasion=&q=&inStock=`
#[instrument(skip(state, query))]
pub async fn index(
    State(state): State<AppState>,
    query: std::result::Result<Query<FlowerQuery>, QueryRejection>,
) -> Result<Json<Vec<Flower>>> {
    let Query(query) = query?;
    let flowers = CatalogService::new(state.store()).list(query).await?;
    Ok(Json(flowers))
}

/// `GET /flowers/{id}`
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Flower>> {
    let flower = CatalogService::new(state.store()).get(&id).await?;
    Ok(Json(flower))
}

/// `POST /flowers`
#[instrument(skip(state, admin, body), fields(admin = %admin.0.sub))]
pub async fn create(
    State(state): State<AppState>,
    admin: RequireAdmin,
    body: std::result::Result<Json<FlowerInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Flower>)> {
    let Json(input) = body?;
    let flower = CatalogService::new(state.store()).create(input).await?;
    Ok((StatusCode::CREATED, Json(flower)))
}

/// `PATCH /flowers/{id}`
#[instrument(skip(state, admin, body), fields(admin = %admin.0.sub))]
pub async fn update(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<String>,
    body: std::result::Result<Json<FlowerInput>, JsonRejection>,
) -> Result<Json<Flower>> {
    let Json(input) = body?;
    let flower = CatalogService::new(state.store()).update(&id, input).await?;
    Ok(Json(flower))
}

/// `DELETE /flowers/{id}`; responds with the removed flower.
#[instrument(skip(state, admin), fields(admin = %admin.0.sub))]
pub async fn destroy(
    State(state): State<AppState>,
    admin: RequireAdmin,
    Path(id): Path<String>,
) -> Result<Json<Flower>> {
    let flower = CatalogService::new(state.store()).delete(&id).await?;
    Ok(Json(flower))
}
