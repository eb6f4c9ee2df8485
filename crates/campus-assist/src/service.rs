//! The assistant service.
//!
//! Routes each question to the completion backend when a credential is
//! available for the asking member, and to the canned-response fallback
//! otherwise. History appends and backend failures never surface to the
//! caller; the reply path is total.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

use campus_core::defaults::{
    ASSISTANT_APOLOGY, ASSISTANT_GREETING, ASSISTANT_SYSTEM_INSTRUCTION,
};
use campus_core::{ChatHistoryRepository, ChatTurn, CompletionBackend};

use crate::config::AssistConfig;
use crate::fallback::fallback_reply;
use crate::openai::OpenAiClient;

/// The AI study assistant.
///
/// Holds per-member credentials alongside an optional server-wide
/// backend. A member's own credential takes precedence; with neither,
/// replies come from the keyword fallback.
pub struct Assistant {
    config: AssistConfig,
    default_backend: Option<OpenAiClient>,
    credentials: RwLock<HashMap<Uuid, String>>,
    history: Arc<dyn ChatHistoryRepository>,
}

impl Assistant {
    /// Build an assistant from configuration. A server-wide backend is
    /// created only when the config carries a credential.
    pub fn new(config: AssistConfig, history: Arc<dyn ChatHistoryRepository>) -> Self {
        let default_backend = if config.api_key.is_some() {
            OpenAiClient::new(config.clone()).ok()
        } else {
            None
        };

        Self {
            config,
            default_backend,
            credentials: RwLock::new(HashMap::new()),
            history,
        }
    }

    /// Store a member's completion-service credential. The credential
    /// is held in memory only and is never validated against the
    /// service.
    pub async fn set_credential(&self, user_id: Uuid, api_key: impl Into<String>) {
        let key = api_key.into();
        if key.is_empty() {
            self.credentials.write().await.remove(&user_id);
        } else {
            self.credentials.write().await.insert(user_id, key);
        }
    }

    /// Whether a completion backend would be used for this member.
    pub async fn credential_configured(&self, user_id: Option<Uuid>) -> bool {
        if self.default_backend.is_some() {
            return true;
        }
        match user_id {
            Some(id) => self.credentials.read().await.contains_key(&id),
            None => false,
        }
    }

    async fn backend_for(&self, user_id: Option<Uuid>) -> Option<OpenAiClient> {
        if let Some(id) = user_id {
            if let Some(key) = self.credentials.read().await.get(&id) {
                return OpenAiClient::new(self.config.with_api_key(key.clone())).ok();
            }
        }
        match &self.default_backend {
            Some(_) => OpenAiClient::new(self.config.clone()).ok(),
            None => None,
        }
    }

    /// Answer a question. Always returns a non-empty reply.
    ///
    /// Both turns are appended to the member's transcript when a member
    /// id is known; append failures are logged and swallowed.
    pub async fn reply(&self, user_id: Option<Uuid>, question: &str) -> String {
        if let Some(id) = user_id {
            if let Err(e) = self.history.append(id, question, false).await {
                warn!(
                    subsystem = "assist",
                    component = "history",
                    error_msg = %e,
                    "Failed to persist user turn"
                );
            }
        }

        let answer = match self.backend_for(user_id).await {
            Some(backend) => {
                match backend
                    .complete(ASSISTANT_SYSTEM_INSTRUCTION, question)
                    .await
                {
                    Ok(content) if !content.is_empty() => content,
                    Ok(_) => {
                        warn!(
                            subsystem = "assist",
                            component = "completion",
                            "Completion service returned empty content"
                        );
                        ASSISTANT_APOLOGY.to_string()
                    }
                    Err(e) => {
                        warn!(
                            subsystem = "assist",
                            component = "completion",
                            error_msg = %e,
                            "Completion request failed"
                        );
                        ASSISTANT_APOLOGY.to_string()
                    }
                }
            }
            None => {
                debug!(
                    subsystem = "assist",
                    component = "fallback",
                    fallback = true,
                    "No credential configured; answering from canned responses"
                );
                fallback_reply(question).to_string()
            }
        };

        if let Some(id) = user_id {
            if let Err(e) = self.history.append(id, &answer, true).await {
                warn!(
                    subsystem = "assist",
                    component = "history",
                    error_msg = %e,
                    "Failed to persist assistant turn"
                );
            }
        }

        answer
    }

    /// A member's transcript, opened by the synthetic greeting.
    ///
    /// The greeting is prepended on every load and never persisted.
    /// A history-store failure degrades to the greeting alone.
    pub async fn transcript(&self, user_id: Uuid) -> Vec<ChatTurn> {
        let mut turns = vec![ChatTurn::new(ASSISTANT_GREETING, true)];
        match self.history.history_for(user_id).await {
            Ok(stored) => turns.extend(stored),
            Err(e) => {
                warn!(
                    subsystem = "assist",
                    component = "history",
                    error_msg = %e,
                    "Failed to load transcript"
                );
            }
        }
        turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use campus_core::Result;
    use std::sync::Mutex;

    /// In-memory history that can be switched into a failing mode.
    struct TestHistory {
        turns: Mutex<Vec<(Uuid, ChatTurn)>>,
        fail: bool,
    }

    impl TestHistory {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                turns: Mutex::new(Vec::new()),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                turns: Mutex::new(Vec::new()),
                fail: true,
            })
        }
    }

    #[async_trait]
    impl ChatHistoryRepository for TestHistory {
        async fn append(&self, user_id: Uuid, content: &str, is_assistant: bool) -> Result<ChatTurn> {
            if self.fail {
                return Err(campus_core::Error::Internal("history down".to_string()));
            }
            let turn = ChatTurn::new(content, is_assistant);
            self.turns.lock().unwrap().push((user_id, turn.clone()));
            Ok(turn)
        }

        async fn history_for(&self, user_id: Uuid) -> Result<Vec<ChatTurn>> {
            if self.fail {
                return Err(campus_core::Error::Internal("history down".to_string()));
            }
            Ok(self
                .turns
                .lock()
                .unwrap()
                .iter()
                .filter(|(id, _)| *id == user_id)
                .map(|(_, t)| t.clone())
                .collect())
        }
    }

    fn assistant_without_backend(history: Arc<TestHistory>) -> Assistant {
        Assistant::new(AssistConfig::default(), history)
    }

    #[tokio::test]
    async fn test_reply_without_credential_uses_fallback() {
        let assistant = assistant_without_backend(TestHistory::new());
        let reply = assistant.reply(None, "help me with calculus").await;
        assert!(reply.contains("Mathematics"));
    }

    #[tokio::test]
    async fn test_reply_is_never_empty() {
        let assistant = assistant_without_backend(TestHistory::new());
        for question in ["", "calculus", "zzz"] {
            assert!(!assistant.reply(None, question).await.is_empty());
        }
    }

    #[tokio::test]
    async fn test_reply_persists_both_turns() {
        let history = TestHistory::new();
        let assistant = assistant_without_backend(history.clone());
        let user = Uuid::new_v4();

        assistant.reply(Some(user), "what is physics").await;

        let turns = history.turns.lock().unwrap();
        assert_eq!(turns.len(), 2);
        assert!(!turns[0].1.is_assistant);
        assert_eq!(turns[0].1.content, "what is physics");
        assert!(turns[1].1.is_assistant);
    }

    #[tokio::test]
    async fn test_anonymous_reply_persists_nothing() {
        let history = TestHistory::new();
        let assistant = assistant_without_backend(history.clone());

        assistant.reply(None, "what is physics").await;

        assert!(history.turns.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_history_failure_does_not_block_reply() {
        let assistant = assistant_without_backend(TestHistory::failing());
        let reply = assistant.reply(Some(Uuid::new_v4()), "calculus").await;
        assert!(reply.contains("Mathematics"));
    }

    #[tokio::test]
    async fn test_transcript_opens_with_greeting() {
        let history = TestHistory::new();
        let assistant = assistant_without_backend(history.clone());
        let user = Uuid::new_v4();

        assistant.reply(Some(user), "hello physics").await;
        let transcript = assistant.transcript(user).await;

        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[0].content, ASSISTANT_GREETING);
        assert!(transcript[0].is_assistant);
    }

    #[tokio::test]
    async fn test_transcript_greeting_is_not_persisted() {
        let history = TestHistory::new();
        let assistant = assistant_without_backend(history.clone());
        let user = Uuid::new_v4();

        // Two loads must not accumulate greetings.
        assistant.transcript(user).await;
        let transcript = assistant.transcript(user).await;

        assert_eq!(transcript.len(), 1);
        assert!(history.turns.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transcript_degrades_to_greeting_on_store_failure() {
        let assistant = assistant_without_backend(TestHistory::failing());
        let transcript = assistant.transcript(Uuid::new_v4()).await;
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript[0].content, ASSISTANT_GREETING);
    }

    #[tokio::test]
    async fn test_credential_round_trip() {
        let assistant = assistant_without_backend(TestHistory::new());
        let user = Uuid::new_v4();

        assert!(!assistant.credential_configured(Some(user)).await);
        assistant.set_credential(user, "sk-test").await;
        assert!(assistant.credential_configured(Some(user)).await);

        // Empty string clears the stored credential.
        assistant.set_credential(user, "").await;
        assert!(!assistant.credential_configured(Some(user)).await);
    }
}
