//! E-Book catalog family

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::catalog::{CatalogFamily, CatalogKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EBook;

/// Descriptive fields of an E-Book title or package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct EBookFields {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub publisher: Option<String>,
    pub isbn: Option<String>,
    /// Hosting platform or vendor
    pub platform: Option<String>,
    pub subject: Option<String>,
    pub notes: Option<String>,
}

/// Yearly counts reported for an E-Book
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct EBookCounts {
    #[validate(range(min = 0, message = "Titles must not be negative"))]
    pub titles: i64,
    #[validate(range(min = 0, message = "Volumes must not be negative"))]
    pub volumes: i64,
}

impl CatalogFamily for EBook {
    const KIND: CatalogKind = CatalogKind::EBook;
    type Fields = EBookFields;
    type Counts = EBookCounts;

    fn title(fields: &EBookFields) -> &str {
        &fields.title
    }
}
