//! Data models

pub mod audiovisual;
pub mod catalog;
pub mod ebook;
pub mod ejournal;
pub mod language;
pub mod library_year;
pub mod user;

// Re-export commonly used types
pub use audiovisual::AudioVisual;
pub use catalog::{
    CatalogEdit, CatalogFamily, CatalogItem, CatalogItemDetail, CatalogKind, EditOutcome,
    EditPlan, Ownership, PrivateOwner,
};
pub use ebook::EBook;
pub use ejournal::EJournal;
pub use language::Language;
pub use library_year::LibraryYear;
pub use user::{Role, UserClaims};
