//! Catalog items shared between libraries, and the ownership rules around them.
//!
//! Every catalog family (E-Book, E-Journal, Audio-Visual) stores rows of the same
//! shape: a title, family-specific descriptive fields, yearly counts and a set of
//! language tags. Family differences are described by a [`CatalogFamily`] adapter
//! so that the fork-on-write logic is written once.

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::{AppError, AppResult};

use super::library_year::LibraryYear;

/// Catalog family, as used in URLs (`/catalog/ebooks/...`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum CatalogKind {
    #[serde(rename = "ebooks")]
    EBook,
    #[serde(rename = "ejournals")]
    EJournal,
    #[serde(rename = "audiovisuals")]
    AudioVisual,
}

impl CatalogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::EBook => "ebooks",
            CatalogKind::EJournal => "ejournals",
            CatalogKind::AudioVisual => "audiovisuals",
        }
    }

    /// Table holding the catalog items themselves
    pub fn items_table(&self) -> &'static str {
        self.as_str()
    }

    /// Table holding one counts row per (item, year)
    pub fn counts_table(&self) -> &'static str {
        match self {
            CatalogKind::EBook => "ebook_counts",
            CatalogKind::EJournal => "ejournal_counts",
            CatalogKind::AudioVisual => "audiovisual_counts",
        }
    }

    /// Junction table item -> language
    pub fn languages_table(&self) -> &'static str {
        match self {
            CatalogKind::EBook => "ebook_languages",
            CatalogKind::EJournal => "ejournal_languages",
            CatalogKind::AudioVisual => "audiovisual_languages",
        }
    }

    /// Junction table library_year -> item
    pub fn subscriptions_table(&self) -> &'static str {
        match self {
            CatalogKind::EBook => "ebook_subscriptions",
            CatalogKind::EJournal => "ejournal_subscriptions",
            CatalogKind::AudioVisual => "audiovisual_subscriptions",
        }
    }

    /// Human readable label for log and error messages
    pub fn label(&self) -> &'static str {
        match self {
            CatalogKind::EBook => "E-Book",
            CatalogKind::EJournal => "E-Journal",
            CatalogKind::AudioVisual => "Audio-visual title",
        }
    }
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Adapter describing one catalog family.
///
/// Implemented by zero-sized marker types ([`super::EBook`], [`super::EJournal`],
/// [`super::AudioVisual`]).
pub trait CatalogFamily: Debug + Clone + Copy + PartialEq + Send + Sync + 'static {
    const KIND: CatalogKind;

    /// Descriptive attributes submitted with every edit (title included)
    type Fields: Serialize + DeserializeOwned + Validate + Debug + Clone + PartialEq + Send + Sync + 'static;

    /// Numeric counts reported for one year
    type Counts: Serialize
        + DeserializeOwned
        + Validate
        + Debug
        + Clone
        + PartialEq
        + Default
        + Send
        + Sync
        + 'static;

    fn title(fields: &Self::Fields) -> &str;
}

/// Owner of a private (forked) catalog item.
///
/// There is no public constructor: a value is either decoded from a persisted row
/// through [`Ownership::from_columns`] or produced by forking a global item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PrivateOwner {
    library_year_id: i32,
    library_id: i32,
}

impl PrivateOwner {
    /// Owner for a fork created by `library_year`
    pub(crate) fn fork_for(library_year: &LibraryYear) -> Self {
        Self {
            library_year_id: library_year.id,
            library_id: library_year.library_id,
        }
    }

    pub fn library_year_id(&self) -> i32 {
        self.library_year_id
    }

    pub fn library_id(&self) -> i32 {
        self.library_id
    }
}

/// Whether a catalog item is shared by the whole consortium or owned by one library
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Ownership {
    Global,
    Private(PrivateOwner),
}

impl Ownership {
    /// Decode the persisted `is_global` / owner columns.
    ///
    /// `owner_library_id` comes from the owning library_years row.
    pub fn from_columns(
        is_global: bool,
        owner_library_year_id: Option<i32>,
        owner_library_id: Option<i32>,
    ) -> AppResult<Self> {
        match (is_global, owner_library_year_id, owner_library_id) {
            (true, None, _) => Ok(Ownership::Global),
            (false, Some(library_year_id), Some(library_id)) => Ok(Ownership::Private(PrivateOwner {
                library_year_id,
                library_id,
            })),
            (true, Some(id), _) => Err(AppError::Internal(format!(
                "Global catalog item has an owner library year ({})",
                id
            ))),
            (false, _, _) => Err(AppError::Internal(
                "Private catalog item has no owner library year".to_string(),
            )),
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Ownership::Global)
    }

    pub fn owner(&self) -> Option<&PrivateOwner> {
        match self {
            Ownership::Global => None,
            Ownership::Private(owner) => Some(owner),
        }
    }
}

/// A catalog item of family `F`
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "")]
pub struct CatalogItem<F: CatalogFamily> {
    pub id: i32,
    pub ownership: Ownership,
    /// Global item this one was forked from
    pub source_item_id: Option<i32>,
    pub fields: F::Fields,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl<F: CatalogFamily> CatalogItem<F> {
    pub fn title(&self) -> &str {
        F::title(&self.fields)
    }
}

/// Counts of one item for one year
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(bound = "")]
pub struct YearCounts<F: CatalogFamily> {
    pub year: i32,
    pub counts: F::Counts,
}

/// Catalog item with its yearly counts and language tags
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "")]
pub struct CatalogItemDetail<F: CatalogFamily> {
    #[serde(flatten)]
    pub item: CatalogItem<F>,
    pub counts: Vec<YearCounts<F>>,
    pub language_ids: Vec<i32>,
}

/// Full replacement of the editable state of an item for one year
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound = "")]
pub struct CatalogEdit<F: CatalogFamily> {
    pub year: i32,
    pub fields: F::Fields,
    #[serde(default)]
    pub counts: F::Counts,
    /// Complete language set (replace semantics)
    #[serde(default)]
    pub language_ids: Vec<i32>,
}

impl<F: CatalogFamily> CatalogEdit<F> {
    /// Sort and de-duplicate the language set
    pub fn normalized(mut self) -> Self {
        self.language_ids.sort_unstable();
        self.language_ids.dedup();
        self
    }
}

/// Writes decided for one edit; executed by a store in a single transaction
#[derive(Debug, Clone, PartialEq)]
pub enum EditPlan<F: CatalogFamily> {
    /// Create a private copy of a global item, owned by `owner`, and subscribe
    /// the owner's library year to it. The global item is left untouched.
    Fork {
        source_id: i32,
        owner: PrivateOwner,
        edit: CatalogEdit<F>,
    },
    /// Overwrite a private item
    InPlace { item_id: i32, edit: CatalogEdit<F> },
}

/// Result of an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct EditOutcome {
    pub id: i32,
    pub is_new_record: bool,
}

/// Entry of a library year's subscription list
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct SubscribedItem {
    pub id: i32,
    pub title: String,
    pub is_global: bool,
    pub source_item_id: Option<i32>,
}
