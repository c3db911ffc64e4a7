//! Catalog endpoints (E-Books, E-Journals, Audio-visual titles)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{CatalogEdit, CatalogFamily, CatalogKind, EditOutcome, UserClaims},
    AppState,
};

use super::{validate_year, AuthenticatedUser};

/// Edit submitted by a library for one year
#[derive(Debug, Deserialize)]
#[serde(bound = "")]
pub struct EditRequest<F: CatalogFamily> {
    pub library_id: i32,
    pub year: i32,
    pub fields: F::Fields,
    #[serde(default)]
    pub counts: F::Counts,
    /// Complete replacement set of language ids
    #[serde(default)]
    pub language_ids: Vec<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct CreatedResponse {
    pub id: i32,
}

fn parse_body<T: serde::de::DeserializeOwned>(body: serde_json::Value) -> AppResult<T> {
    serde_json::from_value(body).map_err(|e| AppError::BadRequest(e.to_string()))
}

fn validate_edit<F: CatalogFamily>(year: i32, fields: &F::Fields, counts: &F::Counts) -> AppResult<()> {
    validate_year(year)?;
    fields.validate()?;
    counts.validate()?;
    Ok(())
}

async fn get_detail<F: CatalogFamily>(
    state: &AppState,
    claims: &UserClaims,
    id: i32,
) -> AppResult<serde_json::Value> {
    let detail = state.services.catalog.get_item::<F>(id).await?;
    claims.require_visible(&detail.item.ownership)?;
    serde_json::to_value(detail).map_err(|e| AppError::Internal(e.to_string()))
}

async fn edit_item<F: CatalogFamily>(
    state: &AppState,
    claims: &UserClaims,
    id: i32,
    body: serde_json::Value,
) -> AppResult<EditOutcome> {
    let request: EditRequest<F> = parse_body(body)?;
    claims.require_library(request.library_id)?;
    validate_edit::<F>(request.year, &request.fields, &request.counts)?;

    state
        .services
        .subscriptions
        .apply_edit::<F>(
            id,
            request.library_id,
            request.year,
            request.fields,
            request.counts,
            request.language_ids,
        )
        .await
}

async fn create_global<F: CatalogFamily>(state: &AppState, body: serde_json::Value) -> AppResult<i32> {
    let edit: CatalogEdit<F> = parse_body(body)?;
    validate_edit::<F>(edit.year, &edit.fields, &edit.counts)?;
    state.services.catalog.create_global::<F>(edit).await
}

/// Get a catalog item with its yearly counts and languages
#[utoipa::path(
    get,
    path = "/catalog/{kind}/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(
        ("kind" = CatalogKind, Path, description = "Catalog family"),
        ("id" = i32, Path, description = "Item ID")
    ),
    responses(
        (status = 200, description = "Item details", body = Object),
        (status = 403, description = "Private item of another library"),
        (status = 404, description = "Item not found")
    )
)]
pub async fn get_item(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((kind, id)): Path<(CatalogKind, i32)>,
) -> AppResult<Json<serde_json::Value>> {
    let detail = for_family!(kind, get_detail(&state, &claims, id))?;
    Ok(Json(detail))
}

/// Edit a catalog item on behalf of a library.
///
/// Editing a global item creates a private copy owned by the library
/// (`is_new_record = true`); editing a private item updates it in place.
#[utoipa::path(
    put,
    path = "/catalog/{kind}/{id}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(
        ("kind" = CatalogKind, Path, description = "Catalog family"),
        ("id" = i32, Path, description = "Item ID")
    ),
    request_body(content = Object, description = "library_id, year, fields, counts, language_ids"),
    responses(
        (status = 200, description = "Edit applied", body = EditOutcome),
        (status = 403, description = "Item or library belongs to someone else"),
        (status = 404, description = "Item or library not found"),
        (status = 422, description = "Library year closed for editing")
    )
)]
pub async fn update_item(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path((kind, id)): Path<(CatalogKind, i32)>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<Json<EditOutcome>> {
    let outcome = for_family!(kind, edit_item(&state, &claims, id, body))?;
    Ok(Json(outcome))
}

/// Create a global catalog item (administrators only)
#[utoipa::path(
    post,
    path = "/catalog/{kind}",
    tag = "catalog",
    security(("bearer_auth" = [])),
    params(("kind" = CatalogKind, Path, description = "Catalog family")),
    request_body(content = Object, description = "year, fields, counts, language_ids"),
    responses(
        (status = 201, description = "Item created", body = CreatedResponse),
        (status = 403, description = "Not an administrator")
    )
)]
pub async fn create_item(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(kind): Path<CatalogKind>,
    Json(body): Json<serde_json::Value>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    claims.require_admin()?;
    let id = for_family!(kind, create_global(&state, body))?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}
