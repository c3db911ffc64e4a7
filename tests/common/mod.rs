//! In-memory store used by the resolver tests.
//!
//! `execute` works on a copy of the tables and swaps it in only when every write
//! succeeded, so a failing step leaves the previous state visible.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use libstats_server::{
    error::{AppError, AppResult},
    models::{CatalogEdit, CatalogFamily, CatalogItem, CatalogKind, EditPlan, LibraryYear, Ownership},
    repository::{CatalogStore, LanguageStore, LibraryYearStore},
};

/// Write step that should fail on the next `execute`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Counts,
    Languages,
    Subscription,
}

#[derive(Debug, Clone)]
struct ItemRow {
    is_global: bool,
    owner_library_year_id: Option<i32>,
    source_item_id: Option<i32>,
    details: serde_json::Value,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    libraries: HashSet<i32>,
    library_years: Vec<LibraryYear>,
    items: HashMap<(CatalogKind, i32), ItemRow>,
    counts: HashMap<(CatalogKind, i32, i32), serde_json::Value>,
    languages: HashSet<(CatalogKind, i32, i32)>,
    subscriptions: HashSet<(CatalogKind, i32, i32)>,
    next_item_id: i32,
}

impl Tables {
    fn check(&self, fail: Option<FailPoint>, step: FailPoint) -> AppResult<()> {
        if fail == Some(step) {
            return Err(AppError::Database(sqlx::Error::Protocol(format!(
                "injected failure at {:?}",
                step
            ))));
        }
        Ok(())
    }

    fn write_edit<F: CatalogFamily>(
        &mut self,
        item_id: i32,
        edit: &CatalogEdit<F>,
        fail: Option<FailPoint>,
    ) -> AppResult<()> {
        let kind = F::KIND;
        self.check(fail, FailPoint::Counts)?;
        self.counts.insert((kind, item_id, edit.year), to_json(&edit.counts));

        self.check(fail, FailPoint::Languages)?;
        self.languages.retain(|(k, id, _)| !(*k == kind && *id == item_id));
        for language_id in &edit.language_ids {
            self.languages.insert((kind, item_id, *language_id));
        }
        Ok(())
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> serde_json::Value {
    serde_json::to_value(value).expect("serializable")
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail: Arc<Mutex<Option<FailPoint>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let store = Self::default();
        store.tables.lock().unwrap().next_item_id = 1;
        store
    }

    pub fn add_library(&self, library_id: i32) {
        self.tables.lock().unwrap().libraries.insert(library_id);
    }

    /// Make the next `execute` fail at `step`
    pub fn fail_next(&self, step: FailPoint) {
        *self.fail.lock().unwrap() = Some(step);
    }

    pub fn close_library_year(&self, library_id: i32, year: i32) {
        let mut tables = self.tables.lock().unwrap();
        for row in tables.library_years.iter_mut() {
            if row.library_id == library_id && row.year == year {
                row.is_open_for_editing = false;
            }
        }
    }

    /// Insert a global item with a fixed id
    pub fn seed_global<F: CatalogFamily>(&self, id: i32, edit: CatalogEdit<F>) {
        let mut tables = self.tables.lock().unwrap();
        tables.items.insert(
            (F::KIND, id),
            ItemRow {
                is_global: true,
                owner_library_year_id: None,
                source_item_id: None,
                details: to_json(&edit.fields),
            },
        );
        tables
            .write_edit::<F>(id, &edit, None)
            .expect("seeding cannot fail");
        tables.next_item_id = tables.next_item_id.max(id + 1);
    }

    pub fn subscribe(&self, kind: CatalogKind, library_year_id: i32, item_id: i32) {
        self.tables
            .lock()
            .unwrap()
            .subscriptions
            .insert((kind, library_year_id, item_id));
    }

    pub fn item_count(&self, kind: CatalogKind) -> usize {
        self.tables
            .lock()
            .unwrap()
            .items
            .keys()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    pub fn language_ids(&self, kind: CatalogKind, item_id: i32) -> Vec<i32> {
        let tables = self.tables.lock().unwrap();
        let mut ids: Vec<i32> = tables
            .languages
            .iter()
            .filter(|(k, id, _)| *k == kind && *id == item_id)
            .map(|(_, _, language_id)| *language_id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn counts<F: CatalogFamily>(&self, item_id: i32, year: i32) -> Option<F::Counts> {
        let tables = self.tables.lock().unwrap();
        tables
            .counts
            .get(&(F::KIND, item_id, year))
            .map(|value| serde_json::from_value(value.clone()).expect("valid counts"))
    }

    pub fn count_years(&self, kind: CatalogKind, item_id: i32) -> Vec<i32> {
        let tables = self.tables.lock().unwrap();
        let mut years: Vec<i32> = tables
            .counts
            .keys()
            .filter(|(k, id, _)| *k == kind && *id == item_id)
            .map(|(_, _, year)| *year)
            .collect();
        years.sort_unstable();
        years
    }

    /// Item ids a library year subscribes to
    pub fn subscriptions(&self, kind: CatalogKind, library_year_id: i32) -> Vec<i32> {
        let tables = self.tables.lock().unwrap();
        let mut ids: Vec<i32> = tables
            .subscriptions
            .iter()
            .filter(|(k, ly, _)| *k == kind && *ly == library_year_id)
            .map(|(_, _, item_id)| *item_id)
            .collect();
        ids.sort_unstable();
        ids
    }

    pub fn library_year(&self, library_id: i32, year: i32) -> Option<LibraryYear> {
        self.tables
            .lock()
            .unwrap()
            .library_years
            .iter()
            .find(|row| row.library_id == library_id && row.year == year)
            .cloned()
    }
}

#[async_trait]
impl LibraryYearStore for MemoryStore {
    async fn ensure_library_year(&self, library_id: i32, year: i32) -> AppResult<LibraryYear> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.libraries.contains(&library_id) {
            return Err(AppError::NotFound(format!("Library {} not found", library_id)));
        }

        if let Some(row) = tables
            .library_years
            .iter()
            .find(|row| row.library_id == library_id && row.year == year)
        {
            return Ok(row.clone());
        }

        let row = LibraryYear {
            id: tables.library_years.len() as i32 + 1,
            library_id,
            year,
            is_open_for_editing: true,
            created_at: Some(chrono::Utc::now()),
        };
        tables.library_years.push(row.clone());
        Ok(row)
    }
}

/// Ids of the languages shipped with the initial migration
const KNOWN_LANGUAGES: std::ops::RangeInclusive<i32> = 1..=6;

#[async_trait]
impl LanguageStore for MemoryStore {
    async fn unknown_languages(&self, ids: &[i32]) -> AppResult<Vec<i32>> {
        let mut unknown: Vec<i32> = ids
            .iter()
            .copied()
            .filter(|id| !KNOWN_LANGUAGES.contains(id))
            .collect();
        unknown.sort_unstable();
        unknown.dedup();
        Ok(unknown)
    }
}

#[async_trait]
impl<F: CatalogFamily> CatalogStore<F> for MemoryStore {
    async fn find_item(&self, id: i32) -> AppResult<Option<CatalogItem<F>>> {
        let tables = self.tables.lock().unwrap();
        let Some(row) = tables.items.get(&(F::KIND, id)) else {
            return Ok(None);
        };

        let owner_library_id = row.owner_library_year_id.and_then(|ly| {
            tables
                .library_years
                .iter()
                .find(|r| r.id == ly)
                .map(|r| r.library_id)
        });

        Ok(Some(CatalogItem {
            id,
            ownership: Ownership::from_columns(row.is_global, row.owner_library_year_id, owner_library_id)?,
            source_item_id: row.source_item_id,
            fields: serde_json::from_value(row.details.clone())
                .map_err(|e| AppError::Internal(e.to_string()))?,
            created_at: None,
            updated_at: None,
        }))
    }

    async fn execute(&self, plan: EditPlan<F>) -> AppResult<i32> {
        let fail = self.fail.lock().unwrap().take();
        let mut tables = self.tables.lock().unwrap();
        let mut working = tables.clone();
        let kind = F::KIND;

        let item_id = match &plan {
            EditPlan::Fork { source_id, owner, edit } => {
                let id = working.next_item_id;
                working.next_item_id += 1;
                working.items.insert(
                    (kind, id),
                    ItemRow {
                        is_global: false,
                        owner_library_year_id: Some(owner.library_year_id()),
                        source_item_id: Some(*source_id),
                        details: to_json(&edit.fields),
                    },
                );
                working.write_edit::<F>(id, edit, fail)?;
                working.check(fail, FailPoint::Subscription)?;
                working
                    .subscriptions
                    .insert((kind, owner.library_year_id(), id));
                id
            }
            EditPlan::InPlace { item_id, edit } => {
                match working.items.get_mut(&(kind, *item_id)) {
                    Some(row) if !row.is_global => row.details = to_json(&edit.fields),
                    _ => return Err(AppError::NotFound(format!("Private item {} not found", item_id))),
                }
                working.write_edit::<F>(*item_id, edit, fail)?;
                *item_id
            }
        };

        *tables = working;
        Ok(item_id)
    }
}
