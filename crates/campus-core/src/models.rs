//! Core data models for campuslink.
//!
//! These types are shared across all campuslink crates and represent
//! the core domain entities. Row shapes mirror the hosted schema:
//! every persisted entity carries a generated `id` plus
//! `created_at`/`updated_at` timestamps.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

// =============================================================================
// PROFILE TYPES
// =============================================================================

/// Academic role of a platform member.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    Student,
    Professor,
    Researcher,
    Faculty,
    Alumni,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Student => write!(f, "student"),
            Self::Professor => write!(f, "professor"),
            Self::Researcher => write!(f, "researcher"),
            Self::Faculty => write!(f, "faculty"),
            Self::Alumni => write!(f, "alumni"),
        }
    }
}

impl FromStr for UserRole {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Self::Student),
            "professor" => Ok(Self::Professor),
            "researcher" => Ok(Self::Researcher),
            "faculty" => Ok(Self::Faculty),
            "alumni" => Ok(Self::Alumni),
            other => Err(Error::InvalidInput(format!("Unknown role: {}", other))),
        }
    }
}

/// A member profile. Created at account provisioning; mutated only by
/// the owning user; never deleted by this codebase.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub major: Option<String>,
    pub department: Option<String>,
    pub institution: Option<String>,
    pub year_of_study: Option<String>,
    pub academic_goals: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub subjects_of_interest: Vec<String>,
    pub skills: Vec<String>,
    pub achievements: Vec<String>,
    pub research_interests: Vec<String>,
    /// Structured calendar-like availability value, stored as JSON.
    pub availability: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner-initiated profile update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub major: Option<String>,
    pub department: Option<String>,
    pub institution: Option<String>,
    pub year_of_study: Option<String>,
    pub academic_goals: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
    pub subjects_of_interest: Option<Vec<String>>,
    pub skills: Option<Vec<String>>,
    pub achievements: Option<Vec<String>>,
    pub research_interests: Option<Vec<String>>,
    pub availability: Option<JsonValue>,
}

/// A publication attributed to a member, shown on the alumni/profile surface.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Publication {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub abstract_text: Option<String>,
    pub doi: Option<String>,
    pub url: Option<String>,
    pub keywords: Vec<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// RESOURCE TYPES
// =============================================================================

/// Closed category enumeration for shared resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    Book,
    Article,
    Note,
    Paper,
    Video,
    Other,
}

impl std::fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Book => write!(f, "book"),
            Self::Article => write!(f, "article"),
            Self::Note => write!(f, "note"),
            Self::Paper => write!(f, "paper"),
            Self::Video => write!(f, "video"),
            Self::Other => write!(f, "other"),
        }
    }
}

impl FromStr for ResourceCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "book" => Ok(Self::Book),
            "article" => Ok(Self::Article),
            "note" => Ok(Self::Note),
            "paper" => Ok(Self::Paper),
            "video" => Ok(Self::Video),
            "other" => Ok(Self::Other),
            other => Err(Error::InvalidInput(format!("Unknown category: {}", other))),
        }
    }
}

/// A shared study resource. Ownership is immutable; only counters and
/// owner edits mutate a row after upload.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Resource {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: ResourceCategory,
    pub file_url: Option<String>,
    pub thumbnail_url: Option<String>,
    /// Unordered, duplicate-free tag set.
    pub tags: Vec<String>,
    pub downloads: i64,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request for uploading a new resource. `downloads` always starts at 0.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateResourceRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: ResourceCategory,
    pub file_url: String,
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Ordering for resource list views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ResourceSort {
    /// Newest first (creation timestamp descending).
    #[default]
    Recent,
    /// Most downloaded first.
    Popular,
}

// =============================================================================
// EVENT TYPES
// =============================================================================

/// A campus event. Created by its organizer; readable by everyone.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_participants: Option<i32>,
    pub organizer_id: Uuid,
    pub participant_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request for creating a new event.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_participants: Option<i32>,
}

// =============================================================================
// MESSAGING TYPES
// =============================================================================

/// A single direct message. Belongs to exactly one conversation;
/// append-only from the client's perspective.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// A conversation as listed for one participant.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ConversationSummary {
    pub id: Uuid,
    pub participants: Vec<Uuid>,
    pub last_message: Option<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// CONNECTION TYPES
// =============================================================================

/// Lifecycle state of a connection request between two members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Rejected,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Accepted => write!(f, "accepted"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for ConnectionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            other => Err(Error::InvalidInput(format!("Unknown status: {}", other))),
        }
    }
}

/// A connection between two members.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Connection {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub addressee_id: Uuid,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// STUDY BUDDY TYPES
// =============================================================================

/// A member's standing request to be matched with study partners.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StudyBuddyRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subjects: Vec<String>,
    pub availability: Option<JsonValue>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Upsert payload for a study-buddy request.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct UpsertStudyBuddyRequest {
    pub subjects: Vec<String>,
    pub availability: Option<JsonValue>,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// A candidate study partner, derived per request and never persisted.
///
/// Invariants: `match_score` is in `[0, 100]` and `shared_interests` is a
/// subset of both the requester's and the candidate's subject sets.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StudyBuddyCandidate {
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: UserRole,
    pub major: Option<String>,
    pub year_of_study: Option<String>,
    pub subjects: Vec<String>,
    pub match_score: u8,
    pub shared_interests: Vec<String>,
    pub availability: Vec<String>,
}

/// A recorded match between two members, persisted with the score that
/// was computed at match time.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct StudyMatch {
    pub id: Uuid,
    pub user1_id: Uuid,
    pub user2_id: Uuid,
    pub match_score: i32,
    pub subjects: Vec<String>,
    pub status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// ASSISTANT TYPES
// =============================================================================

/// One turn in an AI assistant transcript.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ChatTurn {
    pub id: Uuid,
    pub content: String,
    /// True for assistant-authored turns, false for user turns.
    pub is_assistant: bool,
    pub created_at: DateTime<Utc>,
}

impl ChatTurn {
    /// Build a fresh turn with a generated id and the current time.
    pub fn new(content: impl Into<String>, is_assistant: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            is_assistant,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [
            UserRole::Student,
            UserRole::Professor,
            UserRole::Researcher,
            UserRole::Faculty,
            UserRole::Alumni,
        ] {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
        }
    }

    #[test]
    fn test_role_rejects_unknown() {
        assert!("dean".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_category_round_trip() {
        for cat in [
            ResourceCategory::Book,
            ResourceCategory::Article,
            ResourceCategory::Note,
            ResourceCategory::Paper,
            ResourceCategory::Video,
            ResourceCategory::Other,
        ] {
            assert_eq!(cat.to_string().parse::<ResourceCategory>().unwrap(), cat);
        }
    }

    #[test]
    fn test_category_serde_lowercase() {
        let json = serde_json::to_string(&ResourceCategory::Paper).unwrap();
        assert_eq!(json, "\"paper\"");
        let back: ResourceCategory = serde_json::from_str("\"video\"").unwrap();
        assert_eq!(back, ResourceCategory::Video);
    }

    #[test]
    fn test_resource_sort_default_is_recent() {
        assert_eq!(ResourceSort::default(), ResourceSort::Recent);
    }

    #[test]
    fn test_connection_status_round_trip() {
        for status in [
            ConnectionStatus::Pending,
            ConnectionStatus::Accepted,
            ConnectionStatus::Rejected,
        ] {
            assert_eq!(
                status.to_string().parse::<ConnectionStatus>().unwrap(),
                status
            );
        }
    }

    #[test]
    fn test_chat_turn_new() {
        let turn = ChatTurn::new("hello", false);
        assert_eq!(turn.content, "hello");
        assert!(!turn.is_assistant);
    }

    #[test]
    fn test_upsert_request_defaults_active() {
        let req: UpsertStudyBuddyRequest =
            serde_json::from_str(r#"{"subjects": ["Physics"]}"#).unwrap();
        assert!(req.is_active);
        assert_eq!(req.subjects, vec!["Physics"]);
    }
}
