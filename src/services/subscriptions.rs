//! Subscription record resolver: copy-on-write editing of shared catalog items.
//!
//! A library editing a global item gets its own private copy (a fork) and the
//! global item stays untouched for every other subscriber. A library editing its
//! own private copy updates it in place.

use crate::{
    error::{AppError, AppResult},
    models::{
        CatalogEdit, CatalogFamily, CatalogItem, EditOutcome, EditPlan, LibraryYear, Ownership,
        PrivateOwner,
    },
    repository::{CatalogStore, LanguageStore, LibraryYearStore},
};

/// Reject language ids that do not exist.
pub(crate) async fn check_languages<S: LanguageStore + ?Sized>(store: &S, ids: &[i32]) -> AppResult<()> {
    let unknown = store.unknown_languages(ids).await?;
    if unknown.is_empty() {
        return Ok(());
    }

    let list = unknown
        .iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    Err(AppError::Validation(format!("Unknown language ids: {}", list)))
}

/// Decide which writes an edit of `item` by `library_year` needs.
///
/// Pure: reads nothing and writes nothing.
pub fn plan_edit<F: CatalogFamily>(
    item: &CatalogItem<F>,
    library_year: &LibraryYear,
    edit: CatalogEdit<F>,
) -> AppResult<EditPlan<F>> {
    let edit = edit.normalized();

    match item.ownership {
        Ownership::Global => Ok(EditPlan::Fork {
            source_id: item.id,
            owner: PrivateOwner::fork_for(library_year),
            edit,
        }),
        Ownership::Private(owner) if owner.library_id() == library_year.library_id => {
            Ok(EditPlan::InPlace {
                item_id: item.id,
                edit,
            })
        }
        Ownership::Private(owner) => Err(AppError::Authorization(format!(
            "{} {} belongs to library {}",
            F::KIND.label(),
            item.id,
            owner.library_id()
        ))),
    }
}

/// Applies edits against catalog items a library subscribes to
#[derive(Clone)]
pub struct SubscriptionRecordResolver<S> {
    store: S,
}

impl<S> SubscriptionRecordResolver<S>
where
    S: LibraryYearStore + LanguageStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Edit item `item_id` on behalf of (`library_id`, `year`).
    ///
    /// A global item is forked into a new private item owned by the library year
    /// (`is_new_record = true`); a private item is updated in place. All writes
    /// happen in one transaction.
    pub async fn apply_edit<F>(
        &self,
        item_id: i32,
        library_id: i32,
        year: i32,
        fields: F::Fields,
        counts: F::Counts,
        language_ids: Vec<i32>,
    ) -> AppResult<EditOutcome>
    where
        F: CatalogFamily,
        S: CatalogStore<F>,
    {
        // Missing item is reported before anything is written
        let item = self
            .store
            .find_item(item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", F::KIND.label(), item_id)))?;
        check_languages(&self.store, &language_ids).await?;

        let library_year = self.store.ensure_library_year(library_id, year).await?;
        if !library_year.is_open_for_editing {
            return Err(AppError::BusinessRule(format!(
                "Submissions of library {} for {} are closed",
                library_id, year
            )));
        }

        let edit = CatalogEdit {
            year,
            fields,
            counts,
            language_ids,
        };

        let plan = plan_edit(&item, &library_year, edit)?;
        let is_new_record = matches!(plan, EditPlan::Fork { .. });

        let id = self.store.execute(plan).await?;

        if is_new_record {
            tracing::info!(
                kind = %F::KIND,
                source_id = item_id,
                fork_id = id,
                library_id,
                year,
                "Forked global catalog item"
            );
        } else {
            tracing::info!(kind = %F::KIND, item_id, library_id, year, "Updated private catalog item");
        }

        Ok(EditOutcome { id, is_new_record })
    }
}
