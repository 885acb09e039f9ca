//! Collaborator traits: record persistence, profile memory and barcode
//! rendering.
//!
//! Storage traits are implemented by backends such as `attest-store-sqlite`.
//! Their errors are opaque to the core and surface as
//! [`Error::Storage`](crate::Error::Storage).

use std::future::Future;

use uuid::Uuid;

use crate::{profile::PersonalProfile, record::AttestationRecord};

// ─── Records ─────────────────────────────────────────────────────────────────

/// Persistence for committed attestation records.
///
/// Records are write-once: there is no update operation.
pub trait AttestationStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist a freshly constructed record.
  fn insert(
    &self,
    record: AttestationRecord,
  ) -> impl Future<Output = Result<AttestationRecord, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<AttestationRecord>, Self::Error>> + Send + '_;

  /// All records, most recent trip first.
  fn list(
    &self,
  ) -> impl Future<Output = Result<Vec<AttestationRecord>, Self::Error>> + Send + '_;

  /// Delete one record. Returns `false` if it did not exist.
  fn delete(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete several records at once; all or nothing. Returns how many
  /// existed.
  fn delete_many(
    &self,
    ids: Vec<Uuid>,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;
}

// ─── Profile memory ──────────────────────────────────────────────────────────

/// Storage for the single remembered [`PersonalProfile`].
pub trait ProfileStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn load(
    &self,
  ) -> impl Future<Output = Result<Option<PersonalProfile>, Self::Error>> + Send + '_;

  /// Replace whatever profile was remembered before.
  fn save(
    &self,
    profile: PersonalProfile,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn clear(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── Barcode ─────────────────────────────────────────────────────────────────

/// Turns a payload string into a scannable code.
///
/// Scale, error-correction level and output format belong to the
/// implementation.
pub trait BarcodeEncoder {
  type Output;
  type Error: std::error::Error + Send + Sync + 'static;

  fn encode(&self, payload: &str) -> Result<Self::Output, Self::Error>;
}
