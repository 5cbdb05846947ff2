//! SQL schema for the Lineage SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Edge tables carry no foreign keys: deleting a person leaves its edges in
/// place and the tree builder drops them.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS persons (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name    TEXT NOT NULL,
    last_name     TEXT NOT NULL,
    gender        TEXT,            -- 'MALE' | 'FEMALE' | 'NON_BINARY' | 'UNKNOWN'
    date_of_birth TEXT,            -- YYYY-MM-DD
    date_of_death TEXT,            -- YYYY-MM-DD
    notes         TEXT,
    photo_url     TEXT,
    created_at    TEXT NOT NULL    -- RFC 3339 UTC; store-assigned
);

-- Partner edges; person1_id / person2_id are an unordered pair.
CREATE TABLE IF NOT EXISTS relationships (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    person1_id  INTEGER NOT NULL,
    person2_id  INTEGER NOT NULL,
    kind        TEXT NOT NULL,     -- 'MARRIED' | 'DIVORCED' | ...
    start_year  INTEGER,
    end_year    INTEGER,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS parent_child (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    parent_id   INTEGER NOT NULL,
    child_id    INTEGER NOT NULL,
    kind        TEXT NOT NULL DEFAULT 'BIOLOGICAL',
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS relationships_p1_idx ON relationships(person1_id);
CREATE INDEX IF NOT EXISTS relationships_p2_idx ON relationships(person2_id);
CREATE INDEX IF NOT EXISTS parent_child_parent_idx ON parent_child(parent_id);
CREATE INDEX IF NOT EXISTS parent_child_child_idx  ON parent_child(child_id);

PRAGMA user_version = 1;
";
