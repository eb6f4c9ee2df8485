//! Connection repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use campus_core::{Connection, ConnectionRepository, ConnectionStatus, Error, Result};

fn connection_from_row(row: &PgRow) -> Result<Connection> {
    let status: String = row.get("status");
    Ok(Connection {
        id: row.get("id"),
        requester_id: row.get("requester_id"),
        addressee_id: row.get("addressee_id"),
        status: status.parse::<ConnectionStatus>()?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

const CONNECTION_COLUMNS: &str =
    "id, requester_id, addressee_id, status::text AS status, created_at, updated_at";

/// PostgreSQL implementation of ConnectionRepository.
pub struct PgConnectionRepository {
    pool: Pool<Postgres>,
}

impl PgConnectionRepository {
    /// Create a new PgConnectionRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConnectionRepository for PgConnectionRepository {
    async fn request(&self, requester_id: Uuid, addressee_id: Uuid) -> Result<Connection> {
        if requester_id == addressee_id {
            return Err(Error::InvalidInput(
                "Cannot request a connection with yourself".to_string(),
            ));
        }

        let now = Utc::now();
        // The unique index on (requester_id, addressee_id) surfaces
        // duplicate requests as a database error mapped to 409 upstream.
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO connections (id, requester_id, addressee_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, 'pending'::connection_status, $4, $4)
            RETURNING {}
            "#,
            CONNECTION_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(requester_id)
        .bind(addressee_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        connection_from_row(&row)
    }

    async fn respond(&self, id: Uuid, addressee_id: Uuid, accept: bool) -> Result<Connection> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM connections WHERE id = $1",
            CONNECTION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?
        .ok_or_else(|| Error::NotFound(format!("Connection {} not found", id)))?;

        let connection = connection_from_row(&row)?;
        if connection.addressee_id != addressee_id {
            return Err(Error::Forbidden(
                "Only the addressee may respond to a connection request".to_string(),
            ));
        }
        if connection.status != ConnectionStatus::Pending {
            return Err(Error::InvalidInput(
                "Connection request has already been resolved".to_string(),
            ));
        }

        let status = if accept {
            ConnectionStatus::Accepted
        } else {
            ConnectionStatus::Rejected
        };

        let row = sqlx::query(&format!(
            r#"
            UPDATE connections
            SET status = $2::connection_status, updated_at = $3
            WHERE id = $1
            RETURNING {}
            "#,
            CONNECTION_COLUMNS
        ))
        .bind(id)
        .bind(status.to_string())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        connection_from_row(&row)
    }

    async fn list_for(&self, user_id: Uuid) -> Result<Vec<Connection>> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {} FROM connections
            WHERE requester_id = $1 OR addressee_id = $1
            ORDER BY created_at DESC
            "#,
            CONNECTION_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(connection_from_row).collect()
    }
}
