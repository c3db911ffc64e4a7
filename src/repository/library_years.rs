//! Library years repository

use async_trait::async_trait;

use super::{LibraryYearStore, Repository};
use crate::{
    error::{AppError, AppResult},
    models::LibraryYear,
};

#[async_trait]
impl LibraryYearStore for Repository {
    async fn ensure_library_year(&self, library_id: i32, year: i32) -> AppResult<LibraryYear> {
        let library_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM libraries WHERE id = $1)")
                .bind(library_id)
                .fetch_one(&self.pool)
                .await?;

        if !library_exists {
            return Err(AppError::NotFound(format!("Library {} not found", library_id)));
        }

        // Concurrent requests for the same pair collapse on the unique constraint
        let created = sqlx::query(
            r#"
            INSERT INTO library_years (library_id, year, is_open_for_editing)
            VALUES ($1, $2, TRUE)
            ON CONFLICT (library_id, year) DO NOTHING
            "#,
        )
        .bind(library_id)
        .bind(year)
        .execute(&self.pool)
        .await?;

        if created.rows_affected() > 0 {
            tracing::info!(library_id, year, "Created library year");
        }

        let row = sqlx::query_as::<_, LibraryYear>(
            r#"
            SELECT id, library_id, year, is_open_for_editing, created_at
            FROM library_years
            WHERE library_id = $1 AND year = $2
            "#,
        )
        .bind(library_id)
        .bind(year)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }
}

impl Repository {
    /// Get a library year by ID
    pub async fn library_years_get_by_id(&self, id: i32) -> AppResult<LibraryYear> {
        sqlx::query_as::<_, LibraryYear>(
            "SELECT id, library_id, year, is_open_for_editing, created_at FROM library_years WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Library year {} not found", id)))
    }
}
