//! Structured logging schema and field name constants for campuslink.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized names across every
//! subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration, high-volume data (filter hits) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID propagated across a request and its sub-calls.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "api", "db", "match", "assist"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "pool", "fallback", "completion", "resources"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "list", "insert", "send", "reply"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Profile UUID being operated on.
pub const PROFILE_ID: &str = "profile_id";

/// Resource UUID being operated on.
pub const RESOURCE_ID: &str = "resource_id";

/// Event UUID being operated on.
pub const EVENT_ID: &str = "event_id";

/// Conversation UUID being operated on.
pub const CONVERSATION_ID: &str = "conversation_id";

/// Free-text query evaluated by a filter.
pub const QUERY: &str = "query";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of results returned by a list or filter.
pub const RESULT_COUNT: &str = "result_count";

/// Byte length of a prompt sent to the completion service.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a completion response.
pub const RESPONSE_LEN: &str = "response_len";

// ─── Database fields ───────────────────────────────────────────────────────

/// Number of active connections in the pool.
pub const POOL_SIZE: &str = "pool_size";

/// Number of idle connections in the pool.
pub const POOL_IDLE: &str = "pool_idle";

/// Database table or entity affected.
pub const DB_TABLE: &str = "db_table";

// ─── Assistant fields ──────────────────────────────────────────────────────

/// Model name used for a completion request.
pub const MODEL: &str = "model";

/// Whether the canned-response fallback answered instead of the service.
pub const FALLBACK: &str = "fallback";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";
