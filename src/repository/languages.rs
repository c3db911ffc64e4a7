//! Languages repository

use async_trait::async_trait;

use super::{LanguageStore, Repository};
use crate::{error::AppResult, models::Language};

impl Repository {
    /// List all languages
    pub async fn languages_list(&self) -> AppResult<Vec<Language>> {
        let rows = sqlx::query_as::<_, Language>("SELECT id, code, name FROM languages ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl LanguageStore for Repository {
    async fn unknown_languages(&self, ids: &[i32]) -> AppResult<Vec<i32>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let unknown = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT DISTINCT t.id
            FROM UNNEST($1::int4[]) AS t(id)
            WHERE NOT EXISTS (SELECT 1 FROM languages l WHERE l.id = t.id)
            ORDER BY t.id
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(unknown)
    }
}
