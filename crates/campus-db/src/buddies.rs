//! Study-buddy repository implementation.
//!
//! One standing request per member (upsert keyed on user_id); matches
//! are persisted with the score computed at match time.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use campus_core::{
    Error, Result, StudyBuddyRepository, StudyBuddyRequest, StudyMatch, UpsertStudyBuddyRequest,
};

fn request_from_row(row: &PgRow) -> StudyBuddyRequest {
    StudyBuddyRequest {
        id: row.get("id"),
        user_id: row.get("user_id"),
        subjects: row.get::<Option<Vec<String>>, _>("subjects").unwrap_or_default(),
        availability: row.get("availability"),
        description: row.get("description"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn match_from_row(row: &PgRow) -> StudyMatch {
    StudyMatch {
        id: row.get("id"),
        user1_id: row.get("user1_id"),
        user2_id: row.get("user2_id"),
        match_score: row.get("match_score"),
        subjects: row.get::<Option<Vec<String>>, _>("subjects").unwrap_or_default(),
        status: row.get("status"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const REQUEST_COLUMNS: &str =
    "id, user_id, subjects, availability, description, is_active, created_at, updated_at";

const MATCH_COLUMNS: &str =
    "id, user1_id, user2_id, match_score, subjects, status, created_at, updated_at";

/// PostgreSQL implementation of StudyBuddyRepository.
pub struct PgStudyBuddyRepository {
    pool: Pool<Postgres>,
}

impl PgStudyBuddyRepository {
    /// Create a new PgStudyBuddyRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudyBuddyRepository for PgStudyBuddyRepository {
    async fn upsert_request(
        &self,
        user_id: Uuid,
        req: UpsertStudyBuddyRequest,
    ) -> Result<StudyBuddyRequest> {
        if req.subjects.is_empty() {
            return Err(Error::InvalidInput(
                "A study-buddy request needs at least one subject".to_string(),
            ));
        }

        let now = Utc::now();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO study_buddy_requests
                (id, user_id, subjects, availability, description, is_active,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            ON CONFLICT (user_id) DO UPDATE SET
                subjects = EXCLUDED.subjects,
                availability = EXCLUDED.availability,
                description = EXCLUDED.description,
                is_active = EXCLUDED.is_active,
                updated_at = EXCLUDED.updated_at
            RETURNING {}
            "#,
            REQUEST_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&req.subjects)
        .bind(&req.availability)
        .bind(&req.description)
        .bind(req.is_active)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(request_from_row(&row))
    }

    async fn request_for(&self, user_id: Uuid) -> Result<Option<StudyBuddyRequest>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM study_buddy_requests WHERE user_id = $1",
            REQUEST_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| request_from_row(&r)))
    }

    async fn active_requests(&self, exclude_user: Uuid) -> Result<Vec<StudyBuddyRequest>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM study_buddy_requests
            WHERE is_active = true AND user_id <> $1
            ORDER BY created_at DESC
            "#,
            REQUEST_COLUMNS
        ))
        .bind(exclude_user)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(request_from_row).collect())
    }

    async fn record_match(
        &self,
        user1_id: Uuid,
        user2_id: Uuid,
        match_score: i32,
        subjects: Vec<String>,
    ) -> Result<StudyMatch> {
        let now = Utc::now();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO study_matches
                (id, user1_id, user2_id, match_score, subjects, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, 'pending', $6, $6)
            RETURNING {}
            "#,
            MATCH_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(user1_id)
        .bind(user2_id)
        .bind(match_score)
        .bind(&subjects)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(match_from_row(&row))
    }

    async fn matches_for(&self, user_id: Uuid) -> Result<Vec<StudyMatch>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM study_matches
            WHERE user1_id = $1 OR user2_id = $1
            ORDER BY created_at DESC
            "#,
            MATCH_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(match_from_row).collect())
    }
}
