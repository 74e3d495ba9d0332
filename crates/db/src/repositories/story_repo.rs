//! Repository for the `stories` table.

use sqlx::types::Json;
use sqlx::PgPool;
use storyloom_core::types::{DbId, UserId};

use crate::models::scene::{CreateScene, Scene, SceneOwner};
use crate::models::story::{CreateStory, Story};
use crate::repositories::SceneRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, summary, genre, tone, image_style, content, \
    characters, created_at, updated_at";

/// Provides CRUD operations for stories.
pub struct StoryRepo;

impl StoryRepo {
    /// Insert a story and its scenes in a single transaction.
    pub async fn create_with_scenes(
        pool: &PgPool,
        input: &CreateStory,
        scenes: &[CreateScene],
    ) -> Result<(Story, Vec<Scene>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO stories
                (user_id, title, summary, genre, tone, image_style, content, characters)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let story = sqlx::query_as::<_, Story>(&query)
            .bind(input.user_id)
            .bind(&input.title)
            .bind(&input.summary)
            .bind(&input.genre)
            .bind(&input.tone)
            .bind(&input.image_style)
            .bind(&input.content)
            .bind(Json(&input.characters))
            .fetch_one(&mut *tx)
            .await?;

        let scenes = SceneRepo::insert_many(&mut *tx, SceneOwner::Story(story.id), scenes).await?;

        tx.commit().await?;
        Ok((story, scenes))
    }

    /// Find a story owned by `user_id`.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<Option<Story>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM stories WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Story>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's stories, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: UserId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Story>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM stories
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Story>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Replace a story's scene image prompts and record the style they were
    /// written for, in a single transaction.
    ///
    /// Returns the number of scene rows updated. A missing story yields
    /// `RowNotFound` and nothing is written.
    pub async fn update_image_prompts(
        pool: &PgPool,
        id: DbId,
        prompts: &[(DbId, String)],
        image_style: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query("UPDATE stories SET image_style = $2 WHERE id = $1")
            .bind(id)
            .bind(image_style)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        let updated = SceneRepo::set_image_prompts(&mut *tx, prompts).await?;

        tx.commit().await?;
        Ok(updated)
    }

    /// Delete a story owned by `user_id`. Scenes cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: UserId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM stories WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
