//! Language reference endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, models::Language};

use super::AuthenticatedUser;

/// List languages usable as item tags
#[utoipa::path(
    get,
    path = "/languages",
    tag = "catalog",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Languages", body = Vec<Language>)
    )
)]
pub async fn list_languages(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<Language>>> {
    let languages = state.services.catalog.languages().await?;
    Ok(Json(languages))
}
