//! Core traits for campuslink abstractions.
//!
//! These traits define the interfaces that concrete implementations
//! must satisfy. The hosted Postgres store and the in-memory test double
//! implement the same repository contracts, so handlers never care which
//! one they are talking to.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// PROFILE REPOSITORY
// =============================================================================

/// Repository for member profiles.
///
/// Profiles are provisioned by the external auth layer; this codebase
/// only reads them and applies owner edits.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch a profile by id.
    async fn fetch(&self, id: Uuid) -> Result<Profile>;

    /// Fetch several profiles at once. Missing ids are skipped.
    async fn fetch_many(&self, ids: &[Uuid]) -> Result<Vec<Profile>>;

    /// Apply an owner edit. `None` fields are left untouched.
    async fn update(&self, id: Uuid, req: UpdateProfileRequest) -> Result<Profile>;

    /// List all profiles with the alumni role.
    async fn list_alumni(&self) -> Result<Vec<Profile>>;

    /// Publications attributed to a member, newest first.
    async fn publications_for(&self, user_id: Uuid) -> Result<Vec<Publication>>;

    /// Names of the research areas a member declared interest in.
    async fn research_interest_names(&self, user_id: Uuid) -> Result<Vec<String>>;
}

// =============================================================================
// RESOURCE REPOSITORY
// =============================================================================

/// Repository for shared study resources.
#[async_trait]
pub trait ResourceRepository: Send + Sync {
    /// Insert a new resource with a zeroed download counter.
    async fn insert(&self, created_by: Uuid, req: CreateResourceRequest) -> Result<Resource>;

    /// Fetch a resource by id.
    async fn fetch(&self, id: Uuid) -> Result<Resource>;

    /// List all resources, newest first.
    async fn list(&self) -> Result<Vec<Resource>>;

    /// Add a tag to the resource's tag set. Adding a tag that is already
    /// present leaves the set unchanged.
    async fn add_tag(&self, id: Uuid, tag: &str) -> Result<()>;

    /// Remove a tag from the resource's tag set. Removing an absent tag
    /// leaves the set unchanged.
    async fn remove_tag(&self, id: Uuid, tag: &str) -> Result<()>;

    /// Atomically increment the download counter; returns the new count.
    async fn record_download(&self, id: Uuid) -> Result<i64>;

    /// Toggle a member's like on a resource; returns true when the like
    /// now exists.
    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<bool>;
}

// =============================================================================
// EVENT REPOSITORY
// =============================================================================

/// Repository for campus events and their participant lists.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Create a new event on behalf of its organizer.
    async fn insert(&self, organizer_id: Uuid, req: CreateEventRequest) -> Result<Event>;

    /// Fetch an event by id.
    async fn fetch(&self, id: Uuid) -> Result<Event>;

    /// List events that have not yet ended, soonest first.
    async fn list_upcoming(&self) -> Result<Vec<Event>>;

    /// Register a member for an event, enforcing the participant cap.
    async fn join(&self, event_id: Uuid, user_id: Uuid) -> Result<()>;

    /// Withdraw a member's registration.
    async fn leave(&self, event_id: Uuid, user_id: Uuid) -> Result<()>;
}

// =============================================================================
// MESSAGING REPOSITORY
// =============================================================================

/// Repository for conversations and their messages.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Create a conversation grouping the given participants.
    async fn create_conversation(&self, participants: &[Uuid]) -> Result<Uuid>;

    /// List a member's conversations, most recently active first.
    async fn conversations_for(&self, user_id: Uuid) -> Result<Vec<ConversationSummary>>;

    /// Messages of a conversation, oldest first. Fails when the reader
    /// is not a participant.
    async fn messages(&self, conversation_id: Uuid, reader_id: Uuid) -> Result<Vec<Message>>;

    /// Append a message. Fails when the conversation does not exist or
    /// the sender is not a participant.
    async fn send(&self, conversation_id: Uuid, sender_id: Uuid, content: &str) -> Result<Message>;

    /// Mark all messages in a conversation as read for one participant.
    async fn mark_read(&self, conversation_id: Uuid, reader_id: Uuid) -> Result<()>;
}

// =============================================================================
// CONNECTION REPOSITORY
// =============================================================================

/// Repository for member-to-member connection requests.
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// File a connection request.
    async fn request(&self, requester_id: Uuid, addressee_id: Uuid) -> Result<Connection>;

    /// Accept or reject a pending request. Only the addressee may respond.
    async fn respond(&self, id: Uuid, addressee_id: Uuid, accept: bool) -> Result<Connection>;

    /// All connections a member is part of, either side.
    async fn list_for(&self, user_id: Uuid) -> Result<Vec<Connection>>;
}

// =============================================================================
// STUDY BUDDY REPOSITORY
// =============================================================================

/// Repository for study-buddy requests and recorded matches.
#[async_trait]
pub trait StudyBuddyRepository: Send + Sync {
    /// Create or replace a member's standing match request.
    async fn upsert_request(
        &self,
        user_id: Uuid,
        req: UpsertStudyBuddyRequest,
    ) -> Result<StudyBuddyRequest>;

    /// A member's own request, if any.
    async fn request_for(&self, user_id: Uuid) -> Result<Option<StudyBuddyRequest>>;

    /// All active requests except the given member's own.
    async fn active_requests(&self, exclude_user: Uuid) -> Result<Vec<StudyBuddyRequest>>;

    /// Persist a match with the score computed at match time.
    async fn record_match(
        &self,
        user1_id: Uuid,
        user2_id: Uuid,
        match_score: i32,
        subjects: Vec<String>,
    ) -> Result<StudyMatch>;

    /// Recorded matches involving a member.
    async fn matches_for(&self, user_id: Uuid) -> Result<Vec<StudyMatch>>;
}

// =============================================================================
// CHAT HISTORY REPOSITORY
// =============================================================================

/// Repository for AI assistant transcripts.
///
/// Appends are fire-and-forget relative to the chat flow: callers log
/// failures and keep going.
#[async_trait]
pub trait ChatHistoryRepository: Send + Sync {
    /// Append one turn to a member's transcript.
    async fn append(&self, user_id: Uuid, content: &str, is_assistant: bool) -> Result<ChatTurn>;

    /// A member's persisted transcript, oldest first.
    async fn history_for(&self, user_id: Uuid) -> Result<Vec<ChatTurn>>;
}

// =============================================================================
// COMPLETION BACKEND
// =============================================================================

/// A hosted text-completion endpoint.
///
/// One request per call; no retry, no backoff, no streaming.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Send a fixed system instruction plus the user's text and return
    /// the first completion's content verbatim.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;

    /// Model identifier sent with each request.
    fn model_name(&self) -> &str;
}
