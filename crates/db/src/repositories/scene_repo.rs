//! Repository for the `scenes` table.

use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};
use storyloom_core::types::DbId;

use crate::models::scene::{CreateScene, Scene, SceneOwner};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, story_id, episode_id, position, title, description, content, \
    characters, image_prompt, created_at, updated_at";

/// Provides insert, list and image-prompt operations for scenes.
pub struct SceneRepo;

impl SceneRepo {
    /// Insert scenes for one owner on an existing connection.
    ///
    /// Called inside the owner's creation transaction so a story or episode
    /// is never persisted without its scenes.
    pub async fn insert_many(
        conn: &mut PgConnection,
        owner: SceneOwner,
        scenes: &[CreateScene],
    ) -> Result<Vec<Scene>, sqlx::Error> {
        let (story_id, episode_id) = match owner {
            SceneOwner::Story(id) => (Some(id), None),
            SceneOwner::Episode(id) => (None, Some(id)),
        };
        let query = format!(
            "INSERT INTO scenes
                (story_id, episode_id, position, title, description, content, characters, image_prompt)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );

        let mut created = Vec::with_capacity(scenes.len());
        for scene in scenes {
            let row = sqlx::query_as::<_, Scene>(&query)
                .bind(story_id)
                .bind(episode_id)
                .bind(scene.position)
                .bind(&scene.title)
                .bind(&scene.description)
                .bind(&scene.content)
                .bind(Json(&scene.characters))
                .bind(&scene.image_prompt)
                .fetch_one(&mut *conn)
                .await?;
            created.push(row);
        }
        Ok(created)
    }

    /// List the scenes of a story in position order.
    pub async fn list_for_story(pool: &PgPool, story_id: DbId) -> Result<Vec<Scene>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scenes WHERE story_id = $1 ORDER BY position ASC"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(story_id)
            .fetch_all(pool)
            .await
    }

    /// List the scenes of an episode in position order.
    pub async fn list_for_episode(
        pool: &PgPool,
        episode_id: DbId,
    ) -> Result<Vec<Scene>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM scenes WHERE episode_id = $1 ORDER BY position ASC"
        );
        sqlx::query_as::<_, Scene>(&query)
            .bind(episode_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the image prompts of the given scenes on an existing connection.
    ///
    /// Returns the number of rows updated.
    pub async fn set_image_prompts(
        conn: &mut PgConnection,
        prompts: &[(DbId, String)],
    ) -> Result<u64, sqlx::Error> {
        let mut updated = 0;
        for (scene_id, prompt) in prompts {
            let result = sqlx::query("UPDATE scenes SET image_prompt = $2 WHERE id = $1")
                .bind(scene_id)
                .bind(prompt)
                .execute(&mut *conn)
                .await?;
            updated += result.rows_affected();
        }
        Ok(updated)
    }
}
