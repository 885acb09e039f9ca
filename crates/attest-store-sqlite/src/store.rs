//! [`SqliteStore`] — the SQLite implementation of [`AttestationStore`] and
//! [`ProfileStore`].

use std::path::Path;

use attest_core::{
  profile::PersonalProfile,
  record::AttestationRecord,
  store::{AttestationStore, ProfileStore},
};
use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use crate::{
  Result,
  encode::{ATTESTATION_COLUMNS, RawAttestation, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An attestation store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "opening attestation store");
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── AttestationStore impl ───────────────────────────────────────────────────

impl AttestationStore for SqliteStore {
  type Error = crate::Error;

  async fn insert(&self, record: AttestationRecord) -> Result<AttestationRecord> {
    let raw = RawAttestation::from_record(&record);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO attestations (
             attestation_id, created_at, first_name, last_name, birth_date,
             birth_place, address, city, postal_code, trip_at, reason
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            raw.attestation_id,
            raw.created_at,
            raw.first_name,
            raw.last_name,
            raw.birth_date,
            raw.birth_place,
            raw.address,
            raw.city,
            raw.postal_code,
            raw.trip_at,
            raw.reason,
          ],
        )?;
        Ok(())
      })
      .await?;

    tracing::debug!(id = %record.id, "inserted attestation");
    Ok(record)
  }

  async fn get(&self, id: Uuid) -> Result<Option<AttestationRecord>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawAttestation> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ATTESTATION_COLUMNS} FROM attestations \
                 WHERE attestation_id = ?1"
              ),
              rusqlite::params![id_str],
              RawAttestation::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAttestation::into_record).transpose()
  }

  async fn list(&self) -> Result<Vec<AttestationRecord>> {
    let raws: Vec<RawAttestation> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ATTESTATION_COLUMNS} FROM attestations
           ORDER BY trip_at DESC, created_at DESC"
        ))?;
        let rows = stmt
          .query_map([], RawAttestation::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAttestation::into_record).collect()
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM attestations WHERE attestation_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn delete_many(&self, ids: Vec<Uuid>) -> Result<usize> {
    let id_strs: Vec<String> = ids.into_iter().map(encode_uuid).collect();

    let deleted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut deleted = 0;
        {
          let mut stmt =
            tx.prepare("DELETE FROM attestations WHERE attestation_id = ?1")?;
          for id in &id_strs {
            deleted += stmt.execute(rusqlite::params![id])?;
          }
        }
        tx.commit()?;
        Ok(deleted)
      })
      .await?;

    tracing::debug!(deleted, "bulk-deleted attestations");
    Ok(deleted)
  }
}

// ─── ProfileStore impl ───────────────────────────────────────────────────────

impl ProfileStore for SqliteStore {
  type Error = crate::Error;

  async fn load(&self) -> Result<Option<PersonalProfile>> {
    let json: Option<String> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row("SELECT profile_json FROM profile WHERE slot = 0", [], |r| {
              r.get(0)
            })
            .optional()?,
        )
      })
      .await?;

    Ok(
      json
        .as_deref()
        .map(PersonalProfile::from_versioned_json)
        .transpose()?,
    )
  }

  async fn save(&self, profile: PersonalProfile) -> Result<()> {
    let json = profile.to_versioned_json()?;
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profile (slot, profile_json, saved_at) VALUES (0, ?1, ?2)
           ON CONFLICT (slot) DO UPDATE
             SET profile_json = excluded.profile_json,
                 saved_at     = excluded.saved_at",
          rusqlite::params![json, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn clear(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute("DELETE FROM profile", [])?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
