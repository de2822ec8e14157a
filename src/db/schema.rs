//! SQL DDL for initializing the session storage.

/// SQLite schema with:
/// - `key` TEXT PRIMARY KEY (one row per persisted value, e.g. `access_token`)
/// - `value` TEXT
/// - `updated_at` TEXT, RFC3339
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS session_kv (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL -- RFC3339
);
"#;
