//! Catalog browsing and subscription management

use crate::{
    error::{AppError, AppResult},
    models::{
        catalog::SubscribedItem, CatalogEdit, CatalogFamily, CatalogItemDetail, Language,
        LibraryYear, Ownership,
    },
    repository::{CatalogStore, LibraryYearStore, Repository},
};

use super::subscriptions::check_languages;

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn languages(&self) -> AppResult<Vec<Language>> {
        self.repository.languages_list().await
    }

    /// Find or create the submission period of a library
    pub async fn ensure_library_year(&self, library_id: i32, year: i32) -> AppResult<LibraryYear> {
        self.repository.ensure_library_year(library_id, year).await
    }

    pub async fn library_year(&self, id: i32) -> AppResult<LibraryYear> {
        self.repository.library_years_get_by_id(id).await
    }

    /// Get item with counts and languages
    pub async fn get_item<F: CatalogFamily>(&self, id: i32) -> AppResult<CatalogItemDetail<F>> {
        self.repository.catalog_get_detail::<F>(id).await
    }

    /// Create a global item (consortium seed data)
    pub async fn create_global<F: CatalogFamily>(&self, edit: CatalogEdit<F>) -> AppResult<i32> {
        let edit = edit.normalized();
        check_languages(&self.repository, &edit.language_ids).await?;
        let id = self.repository.catalog_create_global::<F>(&edit).await?;
        tracing::info!(kind = %F::KIND, id, "Created global catalog item");
        Ok(id)
    }

    pub async fn subscriptions<F: CatalogFamily>(&self, library_year_id: i32) -> AppResult<Vec<SubscribedItem>> {
        self.repository.catalog_subscriptions::<F>(library_year_id).await
    }

    /// Subscribe a library year to a global item, or to one of its library's own items
    pub async fn subscribe<F: CatalogFamily>(&self, library_year: &LibraryYear, item_id: i32) -> AppResult<bool> {
        let item = <Repository as CatalogStore<F>>::find_item(&self.repository, item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", F::KIND.label(), item_id)))?;

        if let Ownership::Private(owner) = item.ownership {
            if owner.library_id() != library_year.library_id {
                return Err(AppError::Authorization(format!(
                    "{} {} belongs to library {}",
                    F::KIND.label(),
                    item_id,
                    owner.library_id()
                )));
            }
        }

        self.repository
            .catalog_subscribe::<F>(library_year.id, item_id)
            .await
    }

    pub async fn unsubscribe<F: CatalogFamily>(&self, library_year_id: i32, item_id: i32) -> AppResult<()> {
        self.repository
            .catalog_unsubscribe::<F>(library_year_id, item_id)
            .await?;
        tracing::info!(kind = %F::KIND, library_year_id, item_id, "Removed subscription");
        Ok(())
    }
}
