//! Resource repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use campus_core::defaults::MAX_TAG_LEN;
use campus_core::{
    CreateResourceRequest, Error, Resource, ResourceCategory, ResourceRepository, Result,
};

/// Validate a tag before it touches the tag set.
///
/// Rules:
/// - Length between 1-100 characters after trimming
/// - Must contain at least one non-whitespace character
///
/// Returns Ok(()) if valid, Err with message if invalid.
pub fn validate_tag(tag: &str) -> std::result::Result<(), String> {
    let trimmed = tag.trim();
    if trimmed.is_empty() {
        return Err("Tag cannot be empty".to_string());
    }
    if trimmed.len() > MAX_TAG_LEN {
        return Err(format!("Tag must be {} characters or less", MAX_TAG_LEN));
    }
    Ok(())
}

/// Trim, validate, and dedupe an incoming tag list, keeping the first
/// occurrence's position. The stored column has set semantics, so the
/// upload path must not write duplicates the guarded `add_tag` would
/// never produce.
pub(crate) fn normalize_tags(tags: &[String]) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        validate_tag(tag).map_err(Error::InvalidInput)?;
        let trimmed = tag.trim();
        if !out.iter().any(|t| t == trimmed) {
            out.push(trimmed.to_string());
        }
    }
    Ok(out)
}

fn resource_from_row(row: &PgRow) -> Result<Resource> {
    let category: String = row.get("category");
    Ok(Resource {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        category: category.parse::<ResourceCategory>()?,
        file_url: row.get("file_url"),
        thumbnail_url: row.get("thumbnail_url"),
        tags: row.get::<Option<Vec<String>>, _>("tags").unwrap_or_default(),
        downloads: row.get("downloads"),
        created_by: row.get("created_by"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

const RESOURCE_COLUMNS: &str = "id, title, description, category, file_url, thumbnail_url, \
     tags, downloads, created_by, created_at, updated_at";

/// PostgreSQL implementation of ResourceRepository.
pub struct PgResourceRepository {
    pool: Pool<Postgres>,
}

impl PgResourceRepository {
    /// Create a new PgResourceRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceRepository for PgResourceRepository {
    async fn insert(&self, created_by: Uuid, req: CreateResourceRequest) -> Result<Resource> {
        let tags = normalize_tags(&req.tags)?;
        let now = Utc::now();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO resources
                (id, title, description, category, file_url, thumbnail_url,
                 tags, downloads, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 0, $8, $9, $9)
            RETURNING {}
            "#,
            RESOURCE_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&req.title)
        .bind(&req.description)
        .bind(req.category.to_string())
        .bind(&req.file_url)
        .bind(&req.thumbnail_url)
        .bind(&tags)
        .bind(created_by)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        resource_from_row(&row)
    }

    async fn fetch(&self, id: Uuid) -> Result<Resource> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM resources WHERE id = $1",
            RESOURCE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::ResourceNotFound(id))?;

        resource_from_row(&row)
    }

    async fn list(&self) -> Result<Vec<Resource>> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM resources ORDER BY created_at DESC",
            RESOURCE_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(resource_from_row).collect()
    }

    async fn add_tag(&self, id: Uuid, tag: &str) -> Result<()> {
        validate_tag(tag).map_err(Error::InvalidInput)?;
        let tag = tag.trim();

        // The NOT guard keeps the append idempotent. COALESCE keeps a
        // NULL column from turning both the guard and the append into
        // silent no-ops.
        let result = sqlx::query(
            r#"
            UPDATE resources
            SET tags = array_append(COALESCE(tags, '{}'), $2), updated_at = $3
            WHERE id = $1 AND NOT ($2 = ANY(COALESCE(tags, '{}')))
            "#,
        )
        .bind(id)
        .bind(tag)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            // Either the tag was already present or the resource is gone;
            // only the latter is an error.
            let exists = sqlx::query("SELECT 1 FROM resources WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(Error::Database)?;
            if exists.is_none() {
                return Err(Error::ResourceNotFound(id));
            }
        }
        Ok(())
    }

    async fn remove_tag(&self, id: Uuid, tag: &str) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE resources
            SET tags = array_remove(tags, $2), updated_at = $3
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(tag.trim())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::ResourceNotFound(id));
        }
        Ok(())
    }

    async fn record_download(&self, id: Uuid) -> Result<i64> {
        let row = sqlx::query(
            r#"
            UPDATE resources
            SET downloads = downloads + 1, updated_at = $2
            WHERE id = $1
            RETURNING downloads
            "#,
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::ResourceNotFound(id))?;

        Ok(row.get("downloads"))
    }

    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let exists = sqlx::query("SELECT 1 FROM resources WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(Error::Database)?;
        if exists.is_none() {
            return Err(Error::ResourceNotFound(id));
        }

        let deleted = sqlx::query(
            "DELETE FROM resource_likes WHERE resource_id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        let liked = if deleted.rows_affected() == 0 {
            sqlx::query(
                "INSERT INTO resource_likes (resource_id, user_id, created_at) VALUES ($1, $2, $3)",
            )
            .bind(id)
            .bind(user_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
            true
        } else {
            false
        };

        tx.commit().await.map_err(Error::Database)?;
        Ok(liked)
    }
}
