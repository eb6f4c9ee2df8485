//! Conversation and message repository implementation.
//!
//! Membership checks gate every read and write: a member who is not in
//! a conversation's participant list can neither read nor append.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use campus_core::{ConversationSummary, Error, Message, MessageRepository, Result};

fn message_from_row(row: &PgRow) -> Message {
    Message {
        id: row.get("id"),
        conversation_id: row.get("conversation_id"),
        sender_id: row.get("sender_id"),
        content: row.get("content"),
        read: row.get("read"),
        created_at: row.get("created_at"),
    }
}

/// PostgreSQL implementation of MessageRepository.
pub struct PgMessageRepository {
    pool: Pool<Postgres>,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    async fn is_participant(&self, conversation_id: Uuid, user_id: Uuid) -> Result<bool> {
        let row = sqlx::query(
            "SELECT 1 FROM conversation_participants WHERE conversation_id = $1 AND user_id = $2",
        )
        .bind(conversation_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(row.is_some())
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn create_conversation(&self, participants: &[Uuid]) -> Result<Uuid> {
        if participants.len() < 2 {
            return Err(Error::InvalidInput(
                "A conversation needs at least two participants".to_string(),
            ));
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        sqlx::query("INSERT INTO conversations (id, created_at, updated_at) VALUES ($1, $2, $2)")
            .bind(id)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        for participant in participants {
            sqlx::query(
                r#"
                INSERT INTO conversation_participants (conversation_id, user_id, created_at)
                VALUES ($1, $2, $3)
                ON CONFLICT (conversation_id, user_id) DO NOTHING
                "#,
            )
            .bind(id)
            .bind(participant)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;
        }

        tx.commit().await.map_err(Error::Database)?;
        Ok(id)
    }

    async fn conversations_for(&self, user_id: Uuid) -> Result<Vec<ConversationSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.created_at, c.updated_at
            FROM conversations c
            JOIN conversation_participants cp ON cp.conversation_id = c.id
            WHERE cp.user_id = $1
            ORDER BY c.updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let mut summaries = Vec::with_capacity(rows.len());
        for row in rows {
            let id: Uuid = row.get("id");

            let participants: Vec<Uuid> = sqlx::query(
                "SELECT user_id FROM conversation_participants WHERE conversation_id = $1",
            )
            .bind(id)
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?
            .into_iter()
            .map(|r| r.get("user_id"))
            .collect();

            let last_message = sqlx::query(
                r#"
                SELECT id, conversation_id, sender_id, content, read, created_at
                FROM messages
                WHERE conversation_id = $1
                ORDER BY created_at DESC
                LIMIT 1
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .map(|r| message_from_row(&r));

            summaries.push(ConversationSummary {
                id,
                participants,
                last_message,
                created_at: row.get("created_at"),
                updated_at: row.get("updated_at"),
            });
        }

        Ok(summaries)
    }

    async fn messages(&self, conversation_id: Uuid, reader_id: Uuid) -> Result<Vec<Message>> {
        if !self.is_participant(conversation_id, reader_id).await? {
            return Err(Error::Forbidden(
                "Not a participant in this conversation".to_string(),
            ));
        }

        let rows = sqlx::query(
            r#"
            SELECT id, conversation_id, sender_id, content, read, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(message_from_row).collect())
    }

    async fn send(&self, conversation_id: Uuid, sender_id: Uuid, content: &str) -> Result<Message> {
        if content.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Message content cannot be empty".to_string(),
            ));
        }

        let exists = sqlx::query("SELECT 1 FROM conversations WHERE id = $1")
            .bind(conversation_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;
        if exists.is_none() {
            return Err(Error::ConversationNotFound(conversation_id));
        }

        if !self.is_participant(conversation_id, sender_id).await? {
            return Err(Error::Forbidden(
                "Not a participant in this conversation".to_string(),
            ));
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        let row = sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, content, read, created_at)
            VALUES ($1, $2, $3, $4, false, $5)
            RETURNING id, conversation_id, sender_id, content, read, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(conversation_id)
        .bind(sender_id)
        .bind(content)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(Error::Database)?;

        // Conversation ordering in list views follows the last message.
        sqlx::query("UPDATE conversations SET updated_at = $2 WHERE id = $1")
            .bind(conversation_id)
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;
        Ok(message_from_row(&row))
    }

    async fn mark_read(&self, conversation_id: Uuid, reader_id: Uuid) -> Result<()> {
        if !self.is_participant(conversation_id, reader_id).await? {
            return Err(Error::Forbidden(
                "Not a participant in this conversation".to_string(),
            ));
        }

        sqlx::query(
            r#"
            UPDATE messages
            SET read = true
            WHERE conversation_id = $1 AND sender_id <> $2 AND read = false
            "#,
        )
        .bind(conversation_id)
        .bind(reader_id)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }
}
