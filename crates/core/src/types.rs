//! Shared aliases for database-backed values.

/// Primary-key type. Every table uses `BIGSERIAL` keys.
pub type DbId = i64;

/// Timestamp type matching the `TIMESTAMPTZ` columns.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
