//! SQL schema for the SQLite entity store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Object references in `relations` and `hierarchies` are soft: there are no
/// foreign keys, and deleting an object leaves them in place. Id lists are
/// JSON arrays so membership queries can use `json_each`. Listing order is
/// `rowid` order, which an `UPDATE` never changes.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS objects (
    id            TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    description   TEXT NOT NULL,
    kind          TEXT NOT NULL,            -- 'Item' | 'Document'
    attributes    TEXT NOT NULL DEFAULT '{}',
    tables_json   TEXT NOT NULL DEFAULT '[]',
    created_date  TEXT NOT NULL,            -- RFC 3339 UTC
    modified_date TEXT NOT NULL,            -- RFC 3339 UTC
    revision      INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS relations (
    id                   TEXT PRIMARY KEY,
    primary_object_id    TEXT NOT NULL,
    secondary_object_ids TEXT NOT NULL DEFAULT '[]',
    relation_type        TEXT NOT NULL,
    description          TEXT
);

CREATE TABLE IF NOT EXISTS hierarchies (
    id               TEXT PRIMARY KEY,
    parent_object_id TEXT,
    child_object_ids TEXT NOT NULL DEFAULT '[]',
    level            INTEGER NOT NULL DEFAULT 0,
    properties       TEXT NOT NULL DEFAULT '{}'
);

CREATE TABLE IF NOT EXISTS chat_sessions (
    id           TEXT PRIMARY KEY,
    messages     TEXT NOT NULL DEFAULT '[]',
    created_date TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS relations_primary_idx  ON relations(primary_object_id);
CREATE INDEX IF NOT EXISTS hierarchies_parent_idx ON hierarchies(parent_object_id);

PRAGMA user_version = 1;
";
