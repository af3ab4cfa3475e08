//! SQL schema for the catalog SQLite store.
//!
//! Executed once at connection startup. There are no foreign keys between
//! the tables: parents reference children only through the JSON id lists.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Every subject column except the key and `last_updated` has a default so
/// that the like upsert can create a bare document.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS faculties (
    faculty_id  TEXT PRIMARY KEY,       -- 24-char lowercase hex
    name        TEXT NOT NULL,
    image       BLOB NOT NULL DEFAULT x'',
    major_ids   TEXT NOT NULL DEFAULT '[]'   -- JSON array of hex ids
);

CREATE TABLE IF NOT EXISTS majors (
    major_id    TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    subject_ids TEXT NOT NULL DEFAULT '[]'
);

CREATE TABLE IF NOT EXISTS subjects (
    subject_id         TEXT PRIMARY KEY,
    code               TEXT NOT NULL DEFAULT '',
    name               TEXT NOT NULL DEFAULT '',
    description        TEXT NOT NULL DEFAULT '',
    campus             TEXT NOT NULL DEFAULT '',
    credit             INTEGER NOT NULL DEFAULT 0,
    prerequisites      TEXT NOT NULL DEFAULT '[]',   -- JSON array of strings
    corequisites       TEXT NOT NULL DEFAULT '[]',
    status             TEXT NOT NULL DEFAULT 'AVAILABLE',
    likes              INTEGER NOT NULL DEFAULT 0,
    like_list          TEXT NOT NULL DEFAULT '[]',   -- JSON array of emails
    last_updated       TEXT NOT NULL,                -- RFC 3339 UTC
    available_duration INTEGER NOT NULL DEFAULT 0
);

PRAGMA user_version = 1;
";
