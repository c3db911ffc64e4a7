//! E-Journal catalog family

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::catalog::{CatalogFamily, CatalogKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EJournal;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct EJournalFields {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub publisher: Option<String>,
    pub issn: Option<String>,
    pub platform: Option<String>,
    /// Database or package the journals are bundled in
    pub package: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct EJournalCounts {
    #[validate(range(min = 0, message = "Titles must not be negative"))]
    pub titles: i64,
    /// Paid subscriptions among `titles`
    #[validate(range(min = 0, message = "Subscriptions must not be negative"))]
    pub subscriptions: i64,
}

impl CatalogFamily for EJournal {
    const KIND: CatalogKind = CatalogKind::EJournal;
    type Fields = EJournalFields;
    type Counts = EJournalCounts;

    fn title(fields: &EJournalFields) -> &str {
        &fields.title
    }
}
