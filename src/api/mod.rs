//! API handlers for the REST endpoints

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{error::AppError, models::UserClaims, AppState};

/// Run a family-generic handler helper for the family selected by a `CatalogKind`
macro_rules! for_family {
    ($kind:expr, $helper:ident ( $($arg:expr),* $(,)? )) => {
        match $kind {
            $crate::models::CatalogKind::EBook => {
                $helper::<$crate::models::EBook>($($arg),*).await
            }
            $crate::models::CatalogKind::EJournal => {
                $helper::<$crate::models::EJournal>($($arg),*).await
            }
            $crate::models::CatalogKind::AudioVisual => {
                $helper::<$crate::models::AudioVisual>($($arg),*).await
            }
        }
    };
}

pub mod catalog;
pub mod health;
pub mod languages;
pub mod library_years;
pub mod openapi;

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Submission years accepted by the API
pub(crate) fn validate_year(year: i32) -> Result<(), AppError> {
    if (1900..=2100).contains(&year) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Year {} out of range", year)))
    }
}
