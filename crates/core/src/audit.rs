//! Audit trail constants and helpers.
//!
//! The audit log is append-only and carries no business meaning beyond
//! traceability. This module lives in `core` so both the persistence layer
//! and the application service can use the same action vocabulary.

/// Known action types for audit log entries.
pub mod action_types {
    pub const LOGIN: &str = "login";
    pub const LOGIN_FAILED: &str = "login_failed";
    pub const FORM_CREATE: &str = "form_create";
    pub const FORM_APPROVE: &str = "form_approve";
    pub const FORM_REJECT: &str = "form_reject";
    pub const USER_CREATE: &str = "user_create";
    pub const ACCESS_DENIED: &str = "access_denied";
    pub const SYSTEM: &str = "system";
}

/// Fields that must never appear in audit log details.
pub const SENSITIVE_FIELDS: &[&str] = &["password", "password_hash", "token", "secret", "credential"];

/// Redact sensitive fields from a JSON value before it is stored as audit
/// details. Replaces the value of any key containing one of
/// [`SENSITIVE_FIELDS`] with `"[REDACTED]"`, recursing into nested objects
/// and arrays.
pub fn redact_sensitive_fields(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Object(map) => {
            let mut redacted = serde_json::Map::new();
            for (key, val) in map {
                let lower_key = key.to_lowercase();
                if SENSITIVE_FIELDS.iter().any(|f| lower_key.contains(f)) {
                    redacted.insert(
                        key.clone(),
                        serde_json::Value::String("[REDACTED]".to_string()),
                    );
                } else {
                    redacted.insert(key.clone(), redact_sensitive_fields(val));
                }
            }
            serde_json::Value::Object(redacted)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(redact_sensitive_fields).collect())
        }
        other => other.clone(),
    }
}
