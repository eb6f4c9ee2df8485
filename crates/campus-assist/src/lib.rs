//! # campus-assist
//!
//! The AI study assistant. Two answer paths share one entry point:
//! a pass-through to a hosted chat-completion endpoint when a credential
//! is configured, and a keyword-routed canned-response fallback when it
//! is not. The reply path is total: the assistant always answers, even
//! when the completion service fails.

pub mod config;
pub mod fallback;
pub mod openai;
pub mod service;

pub use config::AssistConfig;
pub use fallback::{fallback_reply, topic_reply};
pub use openai::OpenAiClient;
pub use service::Assistant;
