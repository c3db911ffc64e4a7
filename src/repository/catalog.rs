//! Catalog repository (E-Books, E-Journals, Audio-visual titles).
//!
//! All three families share one table layout, so every query is built from the
//! table names of `F::KIND`. Family-specific fields and counts live in JSONB columns.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, types::Json, PgConnection, Row};

use super::{CatalogStore, Repository};
use crate::{
    error::{AppError, AppResult},
    models::{
        catalog::{SubscribedItem, YearCounts},
        CatalogEdit, CatalogFamily, CatalogItem, CatalogItemDetail, EditPlan, Ownership,
    },
};

fn item_from_row<F: CatalogFamily>(row: &PgRow) -> AppResult<CatalogItem<F>> {
    let Json(fields): Json<F::Fields> = row.try_get("details")?;
    let ownership = Ownership::from_columns(
        row.try_get("is_global")?,
        row.try_get("owner_library_year_id")?,
        row.try_get("owner_library_id")?,
    )?;

    Ok(CatalogItem {
        id: row.try_get("id")?,
        ownership,
        source_item_id: row.try_get("source_item_id")?,
        fields,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Insert or overwrite the counts row of (item, year)
async fn upsert_counts<F: CatalogFamily>(
    conn: &mut PgConnection,
    item_id: i32,
    year: i32,
    counts: &F::Counts,
) -> AppResult<()> {
    let query = format!(
        r#"
        INSERT INTO {} (item_id, year, counts, updated_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (item_id, year) DO UPDATE
            SET counts = EXCLUDED.counts, updated_at = EXCLUDED.updated_at
        "#,
        F::KIND.counts_table()
    );

    sqlx::query(&query)
        .bind(item_id)
        .bind(year)
        .bind(Json(counts))
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Replace all language tags of an item: delete existing rows then insert the new set.
async fn replace_languages<F: CatalogFamily>(
    conn: &mut PgConnection,
    item_id: i32,
    language_ids: &[i32],
) -> AppResult<()> {
    let table = F::KIND.languages_table();

    sqlx::query(&format!("DELETE FROM {} WHERE item_id = $1", table))
        .bind(item_id)
        .execute(&mut *conn)
        .await?;

    if language_ids.is_empty() {
        return Ok(());
    }

    sqlx::query(&format!(
        "INSERT INTO {} (item_id, language_id) SELECT $1, UNNEST($2::int4[]) ON CONFLICT DO NOTHING",
        table
    ))
    .bind(item_id)
    .bind(language_ids)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Writes of one edit plan, on an open transaction
async fn write_plan<F: CatalogFamily>(conn: &mut PgConnection, plan: EditPlan<F>) -> AppResult<i32> {
    let kind = F::KIND;
    let now = Utc::now();

    let (item_id, edit) = match plan {
        EditPlan::Fork { source_id, owner, edit } => {
            let id = sqlx::query_scalar::<_, i32>(&format!(
                r#"
                INSERT INTO {} (
                    title, details, is_global, owner_library_year_id, source_item_id,
                    created_at, updated_at
                ) VALUES ($1, $2, FALSE, $3, $4, $5, $5)
                RETURNING id
                "#,
                kind.items_table()
            ))
            .bind(F::title(&edit.fields))
            .bind(Json(&edit.fields))
            .bind(owner.library_year_id())
            .bind(source_id)
            .bind(now)
            .fetch_one(&mut *conn)
            .await?;

            sqlx::query(&format!(
                r#"
                INSERT INTO {} (library_year_id, item_id, created_at)
                VALUES ($1, $2, $3)
                ON CONFLICT DO NOTHING
                "#,
                kind.subscriptions_table()
            ))
            .bind(owner.library_year_id())
            .bind(id)
            .bind(now)
            .execute(&mut *conn)
            .await?;

            (id, edit)
        }
        EditPlan::InPlace { item_id, edit } => {
            // Global rows are never written by an edit
            let result = sqlx::query(&format!(
                r#"
                UPDATE {} SET title = $1, details = $2, updated_at = $3
                WHERE id = $4 AND is_global = FALSE
                "#,
                kind.items_table()
            ))
            .bind(F::title(&edit.fields))
            .bind(Json(&edit.fields))
            .bind(now)
            .bind(item_id)
            .execute(&mut *conn)
            .await?;

            if result.rows_affected() == 0 {
                return Err(AppError::NotFound(format!(
                    "Private {} {} not found",
                    kind.label(),
                    item_id
                )));
            }

            (item_id, edit)
        }
    };

    upsert_counts::<F>(conn, item_id, edit.year, &edit.counts).await?;
    replace_languages::<F>(conn, item_id, &edit.language_ids).await?;

    Ok(item_id)
}

#[async_trait]
impl<F: CatalogFamily> CatalogStore<F> for Repository {
    async fn find_item(&self, id: i32) -> AppResult<Option<CatalogItem<F>>> {
        let query = format!(
            r#"
            SELECT i.id, i.details, i.is_global, i.owner_library_year_id,
                   ly.library_id AS owner_library_id, i.source_item_id,
                   i.created_at, i.updated_at
            FROM {} i
            LEFT JOIN library_years ly ON ly.id = i.owner_library_year_id
            WHERE i.id = $1
            "#,
            F::KIND.items_table()
        );

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(item_from_row::<F>).transpose()
    }

    async fn execute(&self, plan: EditPlan<F>) -> AppResult<i32> {
        let mut tx = self.pool.begin().await?;

        match write_plan::<F>(&mut tx, plan).await {
            Ok(item_id) => {
                tx.commit().await?;
                Ok(item_id)
            }
            Err(e) => {
                tracing::warn!(kind = %F::KIND, "Rolling back catalog edit: {}", e);
                tx.rollback().await?;
                Err(e)
            }
        }
    }
}

impl Repository {
    /// Get a catalog item with its yearly counts and language tags
    pub async fn catalog_get_detail<F: CatalogFamily>(&self, id: i32) -> AppResult<CatalogItemDetail<F>> {
        let item = <Self as CatalogStore<F>>::find_item(self, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", F::KIND.label(), id)))?;

        let rows = sqlx::query(&format!(
            "SELECT year, counts FROM {} WHERE item_id = $1 ORDER BY year",
            F::KIND.counts_table()
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let counts = rows
            .iter()
            .map(|r| -> AppResult<YearCounts<F>> {
                let Json(counts): Json<F::Counts> = r.try_get("counts")?;
                Ok(YearCounts {
                    year: r.try_get("year")?,
                    counts,
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        let language_ids: Vec<i32> = sqlx::query_scalar(&format!(
            "SELECT language_id FROM {} WHERE item_id = $1 ORDER BY language_id",
            F::KIND.languages_table()
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(CatalogItemDetail {
            item,
            counts,
            language_ids,
        })
    }

    /// Create a global (consortium-wide) item with its initial counts and languages
    pub async fn catalog_create_global<F: CatalogFamily>(&self, edit: &CatalogEdit<F>) -> AppResult<i32> {
        let mut tx = self.pool.begin().await?;
        let now = Utc::now();

        let id = sqlx::query_scalar::<_, i32>(&format!(
            r#"
            INSERT INTO {} (title, details, is_global, created_at, updated_at)
            VALUES ($1, $2, TRUE, $3, $3)
            RETURNING id
            "#,
            F::KIND.items_table()
        ))
        .bind(F::title(&edit.fields))
        .bind(Json(&edit.fields))
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        upsert_counts::<F>(&mut tx, id, edit.year, &edit.counts).await?;
        replace_languages::<F>(&mut tx, id, &edit.language_ids).await?;

        tx.commit().await?;
        Ok(id)
    }

    /// Subscriptions of a library year.
    ///
    /// A global item shadowed by a fork the same library year subscribes to is left
    /// out, so each title is reported once.
    pub async fn catalog_subscriptions<F: CatalogFamily>(
        &self,
        library_year_id: i32,
    ) -> AppResult<Vec<SubscribedItem>> {
        let query = format!(
            r#"
            SELECT i.id, i.title, i.is_global, i.source_item_id
            FROM {subs} s
            JOIN {items} i ON i.id = s.item_id
            WHERE s.library_year_id = $1
              AND NOT (i.is_global AND EXISTS (
                  SELECT 1 FROM {subs} s2
                  JOIN {items} f ON f.id = s2.item_id
                  WHERE s2.library_year_id = s.library_year_id
                    AND f.source_item_id = i.id
              ))
            ORDER BY i.title, i.id
            "#,
            subs = F::KIND.subscriptions_table(),
            items = F::KIND.items_table()
        );

        let rows = sqlx::query_as::<_, SubscribedItem>(&query)
            .bind(library_year_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    /// Subscribe a library year to an item. Returns false if already subscribed.
    pub async fn catalog_subscribe<F: CatalogFamily>(
        &self,
        library_year_id: i32,
        item_id: i32,
    ) -> AppResult<bool> {
        let result = sqlx::query(&format!(
            r#"
            INSERT INTO {} (library_year_id, item_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            "#,
            F::KIND.subscriptions_table()
        ))
        .bind(library_year_id)
        .bind(item_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove a subscription
    pub async fn catalog_unsubscribe<F: CatalogFamily>(
        &self,
        library_year_id: i32,
        item_id: i32,
    ) -> AppResult<()> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE library_year_id = $1 AND item_id = $2",
            F::KIND.subscriptions_table()
        ))
        .bind(library_year_id)
        .bind(item_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Library year {} is not subscribed to {} {}",
                library_year_id,
                F::KIND.label(),
                item_id
            )));
        }
        Ok(())
    }
}
