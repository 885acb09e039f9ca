//! SQL schema for the attestation SQLite store.
//!
//! Executed once at connection startup. `PRAGMA user_version` records the
//! schema revision; future migrations will be gated on it.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Records are write-once. Rows are only ever inserted or deleted.
CREATE TABLE IF NOT EXISTS attestations (
    attestation_id TEXT PRIMARY KEY,
    created_at     TEXT NOT NULL,   -- RFC 3339 UTC
    first_name     TEXT NOT NULL,
    last_name      TEXT NOT NULL,
    birth_date     TEXT NOT NULL,   -- ISO 8601 calendar date
    birth_place    TEXT NOT NULL,
    address        TEXT NOT NULL,
    city           TEXT NOT NULL,
    postal_code    TEXT NOT NULL,
    trip_at        TEXT NOT NULL,   -- RFC 3339 UTC
    reason         TEXT NOT NULL    -- reason identifier, possibly legacy
);

CREATE INDEX IF NOT EXISTS attestations_trip_idx ON attestations(trip_at);

-- At most one remembered profile; the CHECK pins the single row.
CREATE TABLE IF NOT EXISTS profile (
    slot         INTEGER PRIMARY KEY CHECK (slot = 0),
    profile_json TEXT NOT NULL,     -- versioned JSON envelope
    saved_at     TEXT NOT NULL
);

PRAGMA user_version = 1;
";
