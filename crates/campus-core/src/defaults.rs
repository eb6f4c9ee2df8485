//! Platform-wide default values and fixed strings.

/// Greeting that opens every assistant session. Synthetic: it is shown
/// to the user but never written to the chat history store.
pub const ASSISTANT_GREETING: &str =
    "Hi there! I'm your AI study assistant. How can I help you with your academic needs today?";

/// System instruction sent with every completion request.
pub const ASSISTANT_SYSTEM_INSTRUCTION: &str = "You are a helpful academic assistant that \
     provides concise, accurate responses to student questions.";

/// Fixed reply substituted when the completion service fails. The
/// conversation always continues; this string is never empty.
pub const ASSISTANT_APOLOGY: &str =
    "I'm sorry, I couldn't process your request at the moment. Please try again later.";

/// Default completion model identifier.
pub const DEFAULT_COMPLETION_MODEL: &str = "gpt-3.5-turbo";

/// Sampling temperature for completion requests.
pub const DEFAULT_COMPLETION_TEMPERATURE: f32 = 0.7;

/// Token budget for completion responses.
pub const DEFAULT_COMPLETION_MAX_TOKENS: u32 = 500;

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Hard ceiling for client-supplied page sizes.
pub const MAX_PAGE_SIZE: i64 = 200;

/// Maximum accepted tag length in characters.
pub const MAX_TAG_LEN: usize = 100;
