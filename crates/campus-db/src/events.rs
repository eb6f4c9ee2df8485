//! Event repository implementation.
//!
//! Participant caps are enforced inside a transaction so two racing
//! joins cannot both land in the last slot.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use campus_core::{CreateEventRequest, Error, Event, EventRepository, Result};

fn event_from_row(row: &PgRow) -> Event {
    Event {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        category: row.get("category"),
        location: row.get("location"),
        start_time: row.get("start_time"),
        end_time: row.get("end_time"),
        max_participants: row.get("max_participants"),
        organizer_id: row.get("organizer_id"),
        participant_count: row.get("participant_count"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const EVENT_QUERY: &str = r#"
    SELECT e.id, e.title, e.description, e.category, e.location,
           e.start_time, e.end_time, e.max_participants, e.organizer_id,
           e.created_at, e.updated_at,
           COUNT(ep.user_id) AS participant_count
    FROM events e
    LEFT JOIN event_participants ep ON ep.event_id = e.id
"#;

/// PostgreSQL implementation of EventRepository.
pub struct PgEventRepository {
    pool: Pool<Postgres>,
}

impl PgEventRepository {
    /// Create a new PgEventRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn insert(&self, organizer_id: Uuid, req: CreateEventRequest) -> Result<Event> {
        if req.end_time < req.start_time {
            return Err(Error::InvalidInput(
                "Event end time cannot precede its start time".to_string(),
            ));
        }

        let now = Utc::now();
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO events
                (id, title, description, category, location, start_time, end_time,
                 max_participants, organizer_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            "#,
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.category)
        .bind(&req.location)
        .bind(req.start_time)
        .bind(req.end_time)
        .bind(req.max_participants)
        .bind(organizer_id)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        self.fetch(id).await
    }

    async fn fetch(&self, id: Uuid) -> Result<Event> {
        let row = sqlx::query(&format!("{} WHERE e.id = $1 GROUP BY e.id", EVENT_QUERY))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::EventNotFound(id))?;

        Ok(event_from_row(&row))
    }

    async fn list_upcoming(&self) -> Result<Vec<Event>> {
        let rows = sqlx::query(&format!(
            "{} WHERE e.end_time >= $1 GROUP BY e.id ORDER BY e.start_time ASC",
            EVENT_QUERY
        ))
        .bind(Utc::now())
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(event_from_row).collect())
    }

    async fn join(&self, event_id: Uuid, user_id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // Lock the event row so the cap check and the insert are atomic.
        let event = sqlx::query(
            "SELECT max_participants FROM events WHERE id = $1 FOR UPDATE",
        )
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(Error::Database)?
        .ok_or(Error::EventNotFound(event_id))?;

        // An already-registered member re-joins as a no-op; their own
        // row must not count against the cap.
        let already = sqlx::query(
            "SELECT 1 FROM event_participants WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(Error::Database)?;
        if already.is_some() {
            return Ok(());
        }

        if let Some(cap) = event.get::<Option<i32>, _>("max_participants") {
            let count: i64 = sqlx::query(
                "SELECT COUNT(*) AS n FROM event_participants WHERE event_id = $1",
            )
            .bind(event_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(Error::Database)?
            .get("n");

            if count >= cap as i64 {
                return Err(Error::InvalidInput("Event is full".to_string()));
            }
        }

        sqlx::query(
            r#"
            INSERT INTO event_participants (event_id, user_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (event_id, user_id) DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }

    async fn leave(&self, event_id: Uuid, user_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM event_participants WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }
}
