//! Audio-visual catalog family

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::catalog::{CatalogFamily, CatalogKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AudioVisual;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct AudioVisualFields {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub publisher: Option<String>,
    /// Carrier (DVD, streaming, CD, ...)
    pub media_type: Option<String>,
    pub platform: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct AudioVisualCounts {
    #[validate(range(min = 0, message = "Titles must not be negative"))]
    pub titles: i64,
    #[validate(range(min = 0, message = "Units must not be negative"))]
    pub units: i64,
    #[validate(range(min = 0, message = "Running time must not be negative"))]
    pub running_minutes: i64,
}

impl CatalogFamily for AudioVisual {
    const KIND: CatalogKind = CatalogKind::AudioVisual;
    type Fields = AudioVisualFields;
    type Counts = AudioVisualCounts;

    fn title(fields: &AudioVisualFields) -> &str {
        &fields.title
    }
}
