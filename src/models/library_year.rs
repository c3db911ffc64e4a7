//! Library year model (one institution's submission for one year)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LibraryYear {
    pub id: i32,
    pub library_id: i32,
    pub year: i32,
    pub is_open_for_editing: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// Find-or-create request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EnsureLibraryYear {
    #[validate(range(min = 1, message = "Invalid library id"))]
    pub library_id: i32,
    #[validate(range(min = 1900, max = 2100, message = "Year out of range"))]
    pub year: i32,
}
