//! Repository for the `series` table.

use sqlx::types::Json;
use sqlx::PgPool;
use storyloom_core::types::{DbId, UserId};

use crate::models::series::{CreateSeries, Series};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, premise, genre, summary, characters, \
    episode_outlines, plot_threads, created_at, updated_at";

/// Provides CRUD operations for series.
pub struct SeriesRepo;

impl SeriesRepo {
    /// Insert a new series, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateSeries) -> Result<Series, sqlx::Error> {
        let query = format!(
            "INSERT INTO series
                (user_id, title, premise, genre, summary, characters, episode_outlines, plot_threads)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Series>(&query)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.premise)
            .bind(&input.genre)
            .bind(&input.summary)
            .bind(Json(&input.characters))
            .bind(Json(&input.episode_outlines))
            .bind(Json(&input.plot_threads))
            .fetch_one(pool)
            .await
    }

    /// Find a series owned by `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<Option<Series>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM series WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Series>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's series, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Series>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM series
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Series>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Delete a series owned by `user_id`. Episodes and their scenes cascade.
    pub async fn delete_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM series WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
