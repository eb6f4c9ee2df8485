//! AI chat transcript repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use campus_core::{ChatHistoryRepository, ChatTurn, Error, Result};

/// PostgreSQL implementation of ChatHistoryRepository.
pub struct PgChatHistoryRepository {
    pool: Pool<Postgres>,
}

impl PgChatHistoryRepository {
    /// Create a new PgChatHistoryRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatHistoryRepository for PgChatHistoryRepository {
    async fn append(&self, user_id: Uuid, content: &str, is_assistant: bool) -> Result<ChatTurn> {
        let row = sqlx::query(
            r#"
            INSERT INTO ai_chat_messages (id, user_id, content, is_assistant, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, content, is_assistant, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(content)
        .bind(is_assistant)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(ChatTurn {
            id: row.get("id"),
            content: row.get("content"),
            is_assistant: row.get("is_assistant"),
            created_at: row.get("created_at"),
        })
    }

    async fn history_for(&self, user_id: Uuid) -> Result<Vec<ChatTurn>> {
        let rows = sqlx::query(
            r#"
            SELECT id, content, is_assistant, created_at
            FROM ai_chat_messages
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| ChatTurn {
                id: row.get("id"),
                content: row.get("content"),
                is_assistant: row.get("is_assistant"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}
