//! In-memory implementation of the repository traits.
//!
//! Shares the Postgres repositories' contracts so handlers and tests
//! can run without a database. Clones share state through the inner
//! `Arc`, so one store can back several trait objects at once.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use campus_core::{
    ChatHistoryRepository, ChatTurn, Connection, ConnectionRepository, ConnectionStatus,
    ConversationSummary, CreateEventRequest, CreateResourceRequest, Error, Event, EventRepository,
    Message, MessageRepository, Profile, ProfileRepository, Publication, Resource,
    ResourceRepository, Result, StudyBuddyRepository, StudyBuddyRequest, StudyMatch,
    UpdateProfileRequest, UpsertStudyBuddyRequest,
};

use crate::resources::{normalize_tags, validate_tag};

struct ConversationRecord {
    participants: Vec<Uuid>,
    created_at: chrono::DateTime<Utc>,
    updated_at: chrono::DateTime<Utc>,
}

#[derive(Default)]
struct Inner {
    profiles: HashMap<Uuid, Profile>,
    publications: Vec<Publication>,
    research_interests: HashMap<Uuid, Vec<String>>,
    resources: HashMap<Uuid, Resource>,
    resource_likes: HashSet<(Uuid, Uuid)>,
    events: HashMap<Uuid, Event>,
    event_participants: HashMap<Uuid, HashSet<Uuid>>,
    conversations: HashMap<Uuid, ConversationRecord>,
    messages: Vec<Message>,
    connections: HashMap<Uuid, Connection>,
    buddy_requests: HashMap<Uuid, StudyBuddyRequest>,
    matches: Vec<StudyMatch>,
    chat: HashMap<Uuid, Vec<ChatTurn>>,
}

/// In-memory store implementing every repository trait.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a profile. Profiles have no repository insert because they
    /// are provisioned by the auth layer in production.
    pub async fn seed_profile(&self, profile: Profile) {
        self.inner.write().await.profiles.insert(profile.id, profile);
    }

    /// Seed a publication for the alumni surface.
    pub async fn seed_publication(&self, publication: Publication) {
        self.inner.write().await.publications.push(publication);
    }

    /// Seed declared research-area names for a member.
    pub async fn seed_research_interests(&self, user_id: Uuid, names: Vec<String>) {
        self.inner.write().await.research_interests.insert(user_id, names);
    }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
    async fn fetch(&self, id: Uuid) -> Result<Profile> {
        self.inner
            .read()
            .await
            .profiles
            .get(&id)
            .cloned()
            .ok_or(Error::ProfileNotFound(id))
    }

    async fn fetch_many(&self, ids: &[Uuid]) -> Result<Vec<Profile>> {
        let inner = self.inner.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| inner.profiles.get(id).cloned())
            .collect())
    }

    async fn update(&self, id: Uuid, req: UpdateProfileRequest) -> Result<Profile> {
        let mut inner = self.inner.write().await;
        let profile = inner
            .profiles
            .get_mut(&id)
            .ok_or(Error::ProfileNotFound(id))?;

        macro_rules! apply {
            ($field:ident) => {
                if let Some(value) = req.$field {
                    profile.$field = Some(value);
                }
            };
        }
        apply!(full_name);
        apply!(avatar_url);
        apply!(major);
        apply!(department);
        apply!(institution);
        apply!(year_of_study);
        apply!(academic_goals);
        apply!(bio);
        apply!(website);
        apply!(availability);
        if let Some(v) = req.subjects_of_interest {
            profile.subjects_of_interest = v;
        }
        if let Some(v) = req.skills {
            profile.skills = v;
        }
        if let Some(v) = req.achievements {
            profile.achievements = v;
        }
        if let Some(v) = req.research_interests {
            profile.research_interests = v;
        }
        profile.updated_at = Utc::now();
        Ok(profile.clone())
    }

    async fn list_alumni(&self) -> Result<Vec<Profile>> {
        let inner = self.inner.read().await;
        let mut alumni: Vec<Profile> = inner
            .profiles
            .values()
            .filter(|p| p.role == campus_core::UserRole::Alumni)
            .cloned()
            .collect();
        alumni.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(alumni)
    }

    async fn publications_for(&self, user_id: Uuid) -> Result<Vec<Publication>> {
        let inner = self.inner.read().await;
        let mut pubs: Vec<Publication> = inner
            .publications
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        pubs.sort_by(|a, b| b.published_date.cmp(&a.published_date));
        Ok(pubs)
    }

    async fn research_interest_names(&self, user_id: Uuid) -> Result<Vec<String>> {
        Ok(self
            .inner
            .read()
            .await
            .research_interests
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ResourceRepository for MemoryStore {
    async fn insert(&self, created_by: Uuid, req: CreateResourceRequest) -> Result<Resource> {
        let tags = normalize_tags(&req.tags)?;
        let now = Utc::now();
        let resource = Resource {
            id: Uuid::new_v4(),
            title: req.title,
            description: req.description,
            category: req.category,
            file_url: Some(req.file_url),
            thumbnail_url: req.thumbnail_url,
            tags,
            downloads: 0,
            created_by,
            created_at: now,
            updated_at: now,
        };
        self.inner
            .write()
            .await
            .resources
            .insert(resource.id, resource.clone());
        Ok(resource)
    }

    async fn fetch(&self, id: Uuid) -> Result<Resource> {
        self.inner
            .read()
            .await
            .resources
            .get(&id)
            .cloned()
            .ok_or(Error::ResourceNotFound(id))
    }

    async fn list(&self) -> Result<Vec<Resource>> {
        let inner = self.inner.read().await;
        let mut all: Vec<Resource> = inner.resources.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn add_tag(&self, id: Uuid, tag: &str) -> Result<()> {
        validate_tag(tag).map_err(Error::InvalidInput)?;
        let tag = tag.trim();
        let mut inner = self.inner.write().await;
        let resource = inner
            .resources
            .get_mut(&id)
            .ok_or(Error::ResourceNotFound(id))?;
        if !resource.tags.iter().any(|t| t == tag) {
            resource.tags.push(tag.to_string());
            resource.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn remove_tag(&self, id: Uuid, tag: &str) -> Result<()> {
        let tag = tag.trim();
        let mut inner = self.inner.write().await;
        let resource = inner
            .resources
            .get_mut(&id)
            .ok_or(Error::ResourceNotFound(id))?;
        resource.tags.retain(|t| t != tag);
        Ok(())
    }

    async fn record_download(&self, id: Uuid) -> Result<i64> {
        let mut inner = self.inner.write().await;
        let resource = inner
            .resources
            .get_mut(&id)
            .ok_or(Error::ResourceNotFound(id))?;
        resource.downloads += 1;
        resource.updated_at = Utc::now();
        Ok(resource.downloads)
    }

    async fn toggle_like(&self, id: Uuid, user_id: Uuid) -> Result<bool> {
        let mut inner = self.inner.write().await;
        if !inner.resources.contains_key(&id) {
            return Err(Error::ResourceNotFound(id));
        }
        let key = (id, user_id);
        if inner.resource_likes.remove(&key) {
            Ok(false)
        } else {
            inner.resource_likes.insert(key);
            Ok(true)
        }
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn insert(&self, organizer_id: Uuid, req: CreateEventRequest) -> Result<Event> {
        if req.end_time < req.start_time {
            return Err(Error::InvalidInput(
                "Event end time cannot precede its start time".to_string(),
            ));
        }
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            title: req.title,
            description: req.description,
            category: req.category,
            location: req.location,
            start_time: req.start_time,
            end_time: req.end_time,
            max_participants: req.max_participants,
            organizer_id,
            participant_count: 0,
            created_at: now,
            updated_at: now,
        };
        self.inner.write().await.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn fetch(&self, id: Uuid) -> Result<Event> {
        let inner = self.inner.read().await;
        let mut event = inner
            .events
            .get(&id)
            .cloned()
            .ok_or(Error::EventNotFound(id))?;
        event.participant_count = inner
            .event_participants
            .get(&id)
            .map(|p| p.len() as i64)
            .unwrap_or(0);
        Ok(event)
    }

    async fn list_upcoming(&self) -> Result<Vec<Event>> {
        let inner = self.inner.read().await;
        let now = Utc::now();
        let mut upcoming: Vec<Event> = inner
            .events
            .values()
            .filter(|e| e.end_time >= now)
            .cloned()
            .map(|mut e| {
                e.participant_count = inner
                    .event_participants
                    .get(&e.id)
                    .map(|p| p.len() as i64)
                    .unwrap_or(0);
                e
            })
            .collect();
        upcoming.sort_by(|a, b| a.start_time.cmp(&b.start_time));
        Ok(upcoming)
    }

    async fn join(&self, event_id: Uuid, user_id: Uuid) -> Result<()> {
        let mut inner = self.inner.write().await;
        let cap = inner
            .events
            .get(&event_id)
            .ok_or(Error::EventNotFound(event_id))?
            .max_participants;

        let participants = inner.event_participants.entry(event_id).or_default();
        if participants.contains(&user_id) {
            return Ok(());
        }
        if let Some(cap) = cap {
            if participants.len() as i64 >= cap as i64 {
                return Err(Error::InvalidInput("Event is full".to_string()));
            }
        }
        participants.insert(user_id);
        Ok(())
    }

    async fn leave(&self, event_id: Uuid, user_id: Uuid) -> Result<()> {
        let mut inner = self.inner.write().await;
        if let Some(participants) = inner.event_participants.get_mut(&event_id) {
            participants.remove(&user_id);
        }
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for MemoryStore {
    async fn create_conversation(&self, participants: &[Uuid]) -> Result<Uuid> {
        if participants.len() < 2 {
            return Err(Error::InvalidInput(
                "A conversation needs at least two participants".to_string(),
            ));
        }
        let now = Utc::now();
        let id = Uuid::new_v4();
        let mut unique = Vec::new();
        for p in participants {
            if !unique.contains(p) {
                unique.push(*p);
            }
        }
        self.inner.write().await.conversations.insert(
            id,
            ConversationRecord {
                participants: unique,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(id)
    }

    async fn conversations_for(&self, user_id: Uuid) -> Result<Vec<ConversationSummary>> {
        let inner = self.inner.read().await;
        let mut summaries: Vec<ConversationSummary> = inner
            .conversations
            .iter()
            .filter(|(_, record)| record.participants.contains(&user_id))
            .map(|(id, record)| ConversationSummary {
                id: *id,
                participants: record.participants.clone(),
                last_message: inner
                    .messages
                    .iter()
                    .filter(|m| m.conversation_id == *id)
                    .max_by_key(|m| m.created_at)
                    .cloned(),
                created_at: record.created_at,
                updated_at: record.updated_at,
            })
            .collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    async fn messages(&self, conversation_id: Uuid, reader_id: Uuid) -> Result<Vec<Message>> {
        let inner = self.inner.read().await;
        let record = inner
            .conversations
            .get(&conversation_id)
            .ok_or(Error::ConversationNotFound(conversation_id))?;
        if !record.participants.contains(&reader_id) {
            return Err(Error::Forbidden(
                "Not a participant in this conversation".to_string(),
            ));
        }
        let mut messages: Vec<Message> = inner
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(messages)
    }

    async fn send(&self, conversation_id: Uuid, sender_id: Uuid, content: &str) -> Result<Message> {
        if content.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Message content cannot be empty".to_string(),
            ));
        }
        let mut inner = self.inner.write().await;
        let record = inner
            .conversations
            .get_mut(&conversation_id)
            .ok_or(Error::ConversationNotFound(conversation_id))?;
        if !record.participants.contains(&sender_id) {
            return Err(Error::Forbidden(
                "Not a participant in this conversation".to_string(),
            ));
        }
        let now = Utc::now();
        record.updated_at = now;
        let message = Message {
            id: Uuid::new_v4(),
            conversation_id,
            sender_id,
            content: content.to_string(),
            read: false,
            created_at: now,
        };
        inner.messages.push(message.clone());
        Ok(message)
    }

    async fn mark_read(&self, conversation_id: Uuid, reader_id: Uuid) -> Result<()> {
        let mut inner = self.inner.write().await;
        let record = inner
            .conversations
            .get(&conversation_id)
            .ok_or(Error::ConversationNotFound(conversation_id))?;
        if !record.participants.contains(&reader_id) {
            return Err(Error::Forbidden(
                "Not a participant in this conversation".to_string(),
            ));
        }
        for message in inner.messages.iter_mut() {
            if message.conversation_id == conversation_id && message.sender_id != reader_id {
                message.read = true;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl ConnectionRepository for MemoryStore {
    async fn request(&self, requester_id: Uuid, addressee_id: Uuid) -> Result<Connection> {
        if requester_id == addressee_id {
            return Err(Error::InvalidInput(
                "Cannot request a connection with yourself".to_string(),
            ));
        }
        let mut inner = self.inner.write().await;
        let duplicate = inner.connections.values().any(|c| {
            c.requester_id == requester_id && c.addressee_id == addressee_id
        });
        if duplicate {
            // Mirrors the unique-index violation the Postgres store raises.
            return Err(Error::Database(sqlx::Error::Protocol(
                "duplicate key value violates unique constraint".to_string(),
            )));
        }
        let now = Utc::now();
        let connection = Connection {
            id: Uuid::new_v4(),
            requester_id,
            addressee_id,
            status: ConnectionStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        inner.connections.insert(connection.id, connection.clone());
        Ok(connection)
    }

    async fn respond(&self, id: Uuid, addressee_id: Uuid, accept: bool) -> Result<Connection> {
        let mut inner = self.inner.write().await;
        let connection = inner
            .connections
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("Connection {} not found", id)))?;
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
        connection.status = if accept {
            ConnectionStatus::Accepted
        } else {
            ConnectionStatus::Rejected
        };
        connection.updated_at = Utc::now();
        Ok(connection.clone())
    }

    async fn list_for(&self, user_id: Uuid) -> Result<Vec<Connection>> {
        let inner = self.inner.read().await;
        let mut connections: Vec<Connection> = inner
            .connections
            .values()
            .filter(|c| c.requester_id == user_id || c.addressee_id == user_id)
            .cloned()
            .collect();
        connections.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(connections)
    }
}

#[async_trait]
impl StudyBuddyRepository for MemoryStore {
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
        let mut inner = self.inner.write().await;
        let now = Utc::now();
        let request = match inner.buddy_requests.get(&user_id) {
            Some(existing) => StudyBuddyRequest {
                id: existing.id,
                user_id,
                subjects: req.subjects,
                availability: req.availability,
                description: req.description,
                is_active: req.is_active,
                created_at: existing.created_at,
                updated_at: now,
            },
            None => StudyBuddyRequest {
                id: Uuid::new_v4(),
                user_id,
                subjects: req.subjects,
                availability: req.availability,
                description: req.description,
                is_active: req.is_active,
                created_at: now,
                updated_at: now,
            },
        };
        inner.buddy_requests.insert(user_id, request.clone());
        Ok(request)
    }

    async fn request_for(&self, user_id: Uuid) -> Result<Option<StudyBuddyRequest>> {
        Ok(self.inner.read().await.buddy_requests.get(&user_id).cloned())
    }

    async fn active_requests(&self, exclude_user: Uuid) -> Result<Vec<StudyBuddyRequest>> {
        let inner = self.inner.read().await;
        let mut requests: Vec<StudyBuddyRequest> = inner
            .buddy_requests
            .values()
            .filter(|r| r.is_active && r.user_id != exclude_user)
            .cloned()
            .collect();
        requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(requests)
    }

    async fn record_match(
        &self,
        user1_id: Uuid,
        user2_id: Uuid,
        match_score: i32,
        subjects: Vec<String>,
    ) -> Result<StudyMatch> {
        let now = Utc::now();
        let record = StudyMatch {
            id: Uuid::new_v4(),
            user1_id,
            user2_id,
            match_score,
            subjects,
            status: Some("pending".to_string()),
            created_at: now,
            updated_at: now,
        };
        self.inner.write().await.matches.push(record.clone());
        Ok(record)
    }

    async fn matches_for(&self, user_id: Uuid) -> Result<Vec<StudyMatch>> {
        let inner = self.inner.read().await;
        let mut matches: Vec<StudyMatch> = inner
            .matches
            .iter()
            .filter(|m| m.user1_id == user_id || m.user2_id == user_id)
            .cloned()
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }
}

#[async_trait]
impl ChatHistoryRepository for MemoryStore {
    async fn append(&self, user_id: Uuid, content: &str, is_assistant: bool) -> Result<ChatTurn> {
        let turn = ChatTurn::new(content, is_assistant);
        self.inner
            .write()
            .await
            .chat
            .entry(user_id)
            .or_default()
            .push(turn.clone());
        Ok(turn)
    }

    async fn history_for(&self, user_id: Uuid) -> Result<Vec<ChatTurn>> {
        Ok(self
            .inner
            .read()
            .await
            .chat
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}
