//! Library year and subscription endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::AppResult,
    models::{
        catalog::SubscribedItem, library_year::EnsureLibraryYear, CatalogFamily, CatalogKind,
        LibraryYear,
    },
    AppState,
};

use super::AuthenticatedUser;

#[derive(Debug, Deserialize, ToSchema)]
pub struct SubscribeRequest {
    pub item_id: i32,
}

async fn subscriptions<F: CatalogFamily>(state: &AppState, library_year_id: i32) -> AppResult<Vec<SubscribedItem>> {
    state.services.catalog.subscriptions::<F>(library_year_id).await
}

async fn subscribe<F: CatalogFamily>(state: &AppState, library_year: &LibraryYear, item_id: i32) -> AppResult<bool> {
    state.services.catalog.subscribe::<F>(library_year, item_id).await
}

async fn unsubscribe<F: CatalogFamily>(state: &AppState, library_year_id: i32, item_id: i32) -> AppResult<()> {
    state.services.catalog.unsubscribe::<F>(library_year_id, item_id).await
}

/// Find or create the submission period of a library for a year
#[utoipa::path(
    post,
    path = "/library-years",
    tag = "library-years",
    security(("bearer_auth" = [])),
    request_body = EnsureLibraryYear,
    responses(
        (status = 200, description = "Library year", body = LibraryYear),
        (status = 404, description = "Library not found")
    )
)]
pub async fn ensure_library_year(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(data): Json<EnsureLibraryYear>,
) -> AppResult<Json<LibraryYear>> {
    data.validate()?;
    claims.require_library(data.library_id)?;
    let library_year = state
        .services
        .catalog
        .ensure_library_year(data.library_id, data.year)
        .await?;
    Ok(Json(library_year))
}

/// List the items a library year subscribes to.
///
/// Global items the library has forked are reported once, through their fork.
#[utoipa::path(
    get,
    path = "/library-years/{id}/{kind}",
    tag = "library-years",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Library year ID"),
        ("kind" = CatalogKind, Path, description = "Catalog family")
    ),
    responses(
        (status = 200, description = "Subscribed items", body = Vec<SubscribedItem>)
    )
)]
pub async fn list_subscriptions(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, kind)): Path<(i32, CatalogKind)>,
) -> AppResult<Json<Vec<SubscribedItem>>> {
    let library_year = state.services.catalog.library_year(id).await?;
    claims.require_library(library_year.library_id)?;
    let items = for_family!(kind, subscriptions(&state, library_year.id))?;
    Ok(Json(items))
}

/// Subscribe a library year to an item
#[utoipa::path(
    post,
    path = "/library-years/{id}/{kind}",
    tag = "library-years",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Library year ID"),
        ("kind" = CatalogKind, Path, description = "Catalog family")
    ),
    request_body = SubscribeRequest,
    responses(
        (status = 201, description = "Subscription created"),
        (status = 200, description = "Already subscribed")
    )
)]
pub async fn create_subscription(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, kind)): Path<(i32, CatalogKind)>,
    Json(data): Json<SubscribeRequest>,
) -> AppResult<StatusCode> {
    let library_year = state.services.catalog.library_year(id).await?;
    claims.require_library(library_year.library_id)?;
    let created = for_family!(kind, subscribe(&state, &library_year, data.item_id))?;
    Ok(if created { StatusCode::CREATED } else { StatusCode::OK })
}

/// Remove a subscription (e.g. the global item superseded by a fork)
#[utoipa::path(
    delete,
    path = "/library-years/{id}/{kind}/{item_id}",
    tag = "library-years",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Library year ID"),
        ("kind" = CatalogKind, Path, description = "Catalog family"),
        ("item_id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 204, description = "Subscription removed"),
        (status = 404, description = "No such subscription")
    )
)]
pub async fn delete_subscription(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((id, kind, item_id)): Path<(i32, CatalogKind, i32)>,
) -> AppResult<StatusCode> {
    let library_year = state.services.catalog.library_year(id).await?;
    claims.require_library(library_year.library_id)?;
    for_family!(kind, unsubscribe(&state, library_year.id, item_id))?;
    Ok(StatusCode::NO_CONTENT)
}
