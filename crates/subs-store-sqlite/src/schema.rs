//! SQL schema for the subscription SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- AUTOINCREMENT keeps ids from being reused after a delete.
CREATE TABLE IF NOT EXISTS subs (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    service_name TEXT    NOT NULL,
    price        INTEGER NOT NULL,
    user_id      TEXT    NOT NULL,
    start_date   TEXT    NOT NULL,   -- RFC 3339, 1st of month, midnight UTC
    end_date     TEXT    NOT NULL    -- RFC 3339, 1st of month, midnight UTC
);

CREATE INDEX IF NOT EXISTS subs_user_idx   ON subs(user_id);
CREATE INDEX IF NOT EXISTS subs_filter_idx ON subs(service_name, user_id, start_date);

PRAGMA user_version = 1;
";
