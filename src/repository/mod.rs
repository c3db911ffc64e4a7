//! Repository layer for database operations

pub mod catalog;
pub mod languages;
pub mod library_years;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{CatalogFamily, CatalogItem, EditPlan, LibraryYear},
};

/// Find-or-create access to library years
#[async_trait]
pub trait LibraryYearStore: Send + Sync {
    /// Return the (library, year) row, creating it open for editing when absent.
    ///
    /// Fails with `NotFound` when the library does not exist.
    async fn ensure_library_year(&self, library_id: i32, year: i32) -> AppResult<LibraryYear>;
}

/// Language lookups
#[async_trait]
pub trait LanguageStore: Send + Sync {
    /// Ids from `ids` with no matching language, in ascending order
    async fn unknown_languages(&self, ids: &[i32]) -> AppResult<Vec<i32>>;
}

/// Catalog persistence needed by the subscription resolver for family `F`
#[async_trait]
pub trait CatalogStore<F: CatalogFamily>: Send + Sync {
    async fn find_item(&self, id: i32) -> AppResult<Option<CatalogItem<F>>>;

    /// Apply every write of `plan` atomically and return the id of the item
    /// that now holds the edited data.
    async fn execute(&self, plan: EditPlan<F>) -> AppResult<i32>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Round-trip to the database (readiness probe)
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
