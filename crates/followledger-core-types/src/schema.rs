//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_RUN_ID: &str = "run_id";

// Entity identifiers
pub const FIELD_USERNAME: &str = "username";
pub const FIELD_TIME_POINT: &str = "time_point";

// Collection sizes
pub const FIELD_SNAPSHOT_COUNT: &str = "snapshot_count";
pub const FIELD_ENTRY_COUNT: &str = "entry_count";
pub const FIELD_USER_COUNT: &str = "user_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
pub const EVENT_CONFLICT: &str = "membership_conflict";
pub const EVENT_TIMESTAMP_FALLBACK: &str = "timestamp_fallback";
pub const EVENT_TIME_POINT_MERGED: &str = "time_point_merged";
pub const EVENT_COLUMN_SKIPPED: &str = "column_skipped";
