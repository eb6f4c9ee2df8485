//! Application state shared across handlers.

use std::sync::Arc;

use campus_assist::Assistant;
use campus_core::{
    ChatHistoryRepository, ConnectionRepository, EventRepository, MessageRepository,
    ProfileRepository, ResourceRepository, StudyBuddyRepository,
};
use campus_db::{Database, MemoryStore};

/// Handler state. Repositories are held as trait objects so the same
/// router runs against Postgres in production and the in-memory store
/// in tests.
#[derive(Clone)]
pub struct AppState {
    pub profiles: Arc<dyn ProfileRepository>,
    pub resources: Arc<dyn ResourceRepository>,
    pub events: Arc<dyn EventRepository>,
    pub messaging: Arc<dyn MessageRepository>,
    pub connections: Arc<dyn ConnectionRepository>,
    pub buddies: Arc<dyn StudyBuddyRepository>,
    pub chat_history: Arc<dyn ChatHistoryRepository>,
    pub assistant: Arc<Assistant>,
}

impl AppState {
    /// Build state over the Postgres repositories.
    pub fn from_database(db: Database, assistant: Arc<Assistant>) -> Self {
        Self {
            profiles: Arc::new(db.profiles),
            resources: Arc::new(db.resources),
            events: Arc::new(db.events),
            messaging: Arc::new(db.messaging),
            connections: Arc::new(db.connections),
            buddies: Arc::new(db.buddies),
            chat_history: Arc::new(db.chat_history),
            assistant,
        }
    }

    /// Build state over a shared in-memory store.
    pub fn from_memory(store: MemoryStore, assistant: Arc<Assistant>) -> Self {
        Self {
            profiles: Arc::new(store.clone()),
            resources: Arc::new(store.clone()),
            events: Arc::new(store.clone()),
            messaging: Arc::new(store.clone()),
            connections: Arc::new(store.clone()),
            buddies: Arc::new(store.clone()),
            chat_history: Arc::new(store),
            assistant,
        }
    }
}
