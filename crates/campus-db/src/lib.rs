//! # campus-db
//!
//! PostgreSQL persistence layer for campuslink.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for all core entities
//! - An in-memory store implementing the same repository traits,
//!   used by handler tests and local development
//!
//! ## Example
//!
//! ```rust,ignore
//! use campus_db::Database;
//! use campus_core::{CreateResourceRequest, ResourceCategory, ResourceRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/campuslink").await?;
//!
//!     let resource = db.resources.insert(owner_id, CreateResourceRequest {
//!         title: "Linear Algebra Notes".to_string(),
//!         description: None,
//!         category: ResourceCategory::Note,
//!         file_url: "https://files.example/la.pdf".to_string(),
//!         thumbnail_url: None,
//!         tags: vec!["algebra".to_string()],
//!     }).await?;
//!
//!     println!("Uploaded resource: {}", resource.id);
//!     Ok(())
//! }
//! ```

pub mod buddies;
pub mod chat_history;
pub mod connections;
pub mod events;
pub mod memory;
pub mod messaging;
pub mod pool;
pub mod profiles;
pub mod resources;

// Re-export core types
pub use campus_core::*;

pub use buddies::PgStudyBuddyRepository;
pub use chat_history::PgChatHistoryRepository;
pub use connections::PgConnectionRepository;
pub use events::PgEventRepository;
pub use memory::MemoryStore;
pub use messaging::PgMessageRepository;
pub use pool::{create_pool_with_config, PoolConfig};
pub use profiles::PgProfileRepository;
pub use resources::{validate_tag, PgResourceRepository};

/// Combined database context with all repositories.
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Profile repository for member data and the alumni directory.
    pub profiles: PgProfileRepository,
    /// Resource repository for shared study materials.
    pub resources: PgResourceRepository,
    /// Event repository for campus events and registrations.
    pub events: PgEventRepository,
    /// Conversation and message repository.
    pub messaging: PgMessageRepository,
    /// Connection request repository.
    pub connections: PgConnectionRepository,
    /// Study-buddy request and match repository.
    pub buddies: PgStudyBuddyRepository,
    /// AI assistant transcript repository.
    pub chat_history: PgChatHistoryRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            profiles: PgProfileRepository::new(pool.clone()),
            resources: PgResourceRepository::new(pool.clone()),
            events: PgEventRepository::new(pool.clone()),
            messaging: PgMessageRepository::new(pool.clone()),
            connections: PgConnectionRepository::new(pool.clone()),
            buddies: PgStudyBuddyRepository::new(pool.clone()),
            chat_history: PgChatHistoryRepository::new(pool.clone()),
            pool,
        }
    }

    /// Create a new Database instance by connecting to the given URL.
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_config(url, PoolConfig::default()).await
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
