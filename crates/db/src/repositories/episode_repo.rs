//! Repository for the `episodes` table.
//!
//! Episodes carry no `user_id`; ownership is checked through the parent
//! series.

use sqlx::PgPool;
use storyloom_core::types::{DbId, UserId};

use crate::models::episode::{CreateEpisode, Episode};
use crate::models::scene::{CreateScene, Scene, SceneOwner};
use crate::repositories::SceneRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, series_id, episode_number, title, synopsis, content, \
    created_at, updated_at";

/// Same columns qualified with the `e` alias for joins against `series`.
const JOINED_COLUMNS: &str = "e.id, e.series_id, e.episode_number, e.title, e.synopsis, \
    e.content, e.created_at, e.updated_at";

/// Provides CRUD operations for episodes.
pub struct EpisodeRepo;

impl EpisodeRepo {
    /// Insert an episode and its scenes in a single transaction.
    ///
    /// Fails with a unique violation on `uq_episodes_series_number` if the
    /// episode number already exists in the series.
    pub async fn create_with_scenes(
        pool: &PgPool,
        input: &CreateEpisode,
        scenes: &[CreateScene],
    ) -> Result<(Episode, Vec<Scene>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO episodes (series_id, episode_number, title, synopsis, content)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let episode = sqlx::query_as::<_, Episode>(&query)
            .bind(input.series_id)
            .bind(input.episode_number)
            .bind(&input.title)
            .bind(&input.synopsis)
            .bind(&input.content)
            .fetch_one(&mut *tx)
            .await?;

        let scenes =
            SceneRepo::insert_many(&mut *tx, SceneOwner::Episode(episode.id), scenes).await?;

        tx.commit().await?;
        Ok((episode, scenes))
    }

    /// Find an episode whose series is owned by `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<Option<Episode>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM episodes e
             JOIN series s ON s.id = e.series_id
             WHERE e.id = $1 AND s.user_id = $2"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an episode of a series by its number.
    pub async fn find_by_number(
        pool: &PgPool,
        series_id: DbId,
        episode_number: i32,
    ) -> Result<Option<Episode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM episodes WHERE series_id = $1 AND episode_number = $2"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(series_id)
            .bind(episode_number)
            .fetch_optional(pool)
            .await
    }

    /// List all episodes of a series in episode order.
    pub async fn list_for_series(
        pool: &PgPool,
        series_id: DbId,
    ) -> Result<Vec<Episode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM episodes
             WHERE series_id = $1
             ORDER BY episode_number ASC"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(series_id)
            .fetch_all(pool)
            .await
    }

    /// Delete an episode whose series is owned by `user_id`. Scenes cascade.
    pub async fn delete_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM episodes e
             USING series s
             WHERE e.id = $1 AND s.id = e.series_id AND s.user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
