//! [`AttestationService`] — the "generate" flow and record housekeeping on
//! top of any store backend.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  clock::{Clock, SystemClock},
  profile::PersonalProfile,
  reason::ReasonKind,
  record::{AttestationForm, AttestationRecord, current_record},
  store::{AttestationStore, ProfileStore},
};

/// Ties a store backend to a clock.
///
/// `S` provides both record persistence and profile memory; the SQLite
/// backend implements both on one connection.
#[derive(Debug, Clone)]
pub struct AttestationService<S, C = SystemClock> {
  store: S,
  clock: C,
}

impl<S> AttestationService<S, SystemClock> {
  pub fn new(store: S) -> Self { Self { store, clock: SystemClock } }
}

impl<S, C> AttestationService<S, C>
where
  S: AttestationStore + ProfileStore,
  C: Clock,
{
  pub fn with_clock(store: S, clock: C) -> Self { Self { store, clock } }

  pub fn store(&self) -> &S { &self.store }

  pub fn now(&self) -> DateTime<Utc> { self.clock.now() }

  /// Validate `form`, commit it as a record and persist it.
  ///
  /// The reason is stored as the current catalog identifier it resolves to,
  /// so legacy aliases and unknown values never reach the payload.
  ///
  /// Afterwards the personal data is remembered when `remember` is set and
  /// forgotten otherwise. The record is already stored at that point, so a
  /// failure to update the profile is logged rather than returned.
  pub async fn generate(
    &self,
    form: &AttestationForm,
    remember: bool,
  ) -> Result<AttestationRecord> {
    let validated = canonical_reason(form).validate()?;
    let profile = validated.profile();

    let record = validated.construct(self.clock.now());
    let record = self
      .store
      .insert(record)
      .await
      .map_err(Error::storage)?;
    info!(id = %record.id, reason = %record.reason, "attestation generated");

    let outcome = if remember {
      self.store.save(profile).await
    } else {
      self.store.clear().await
    };
    if let Err(e) = outcome {
      warn!(error = %e, remember, "failed to update remembered profile");
    }

    Ok(record)
  }

  /// All records, most recent trip first.
  pub async fn records(&self) -> Result<Vec<AttestationRecord>> {
    AttestationStore::list(&self.store)
      .await
      .map_err(Error::storage)
  }

  pub async fn record(&self, id: Uuid) -> Result<Option<AttestationRecord>> {
    AttestationStore::get(&self.store, id)
      .await
      .map_err(Error::storage)
  }

  /// The record to surface right now, if any is still active.
  pub async fn current(&self) -> Result<Option<AttestationRecord>> {
    let records = self.records().await?;
    Ok(current_record(&records, self.clock.now()).cloned())
  }

  pub async fn delete(&self, id: Uuid) -> Result<bool> {
    let deleted = self.store.delete(id).await.map_err(Error::storage)?;
    debug!(%id, deleted, "delete attestation");
    Ok(deleted)
  }

  pub async fn delete_many(&self, ids: Vec<Uuid>) -> Result<usize> {
    let requested = ids.len();
    let deleted = self
      .store
      .delete_many(ids)
      .await
      .map_err(Error::storage)?;
    debug!(requested, deleted, "bulk delete attestations");
    Ok(deleted)
  }

  pub async fn remembered_profile(&self) -> Result<Option<PersonalProfile>> {
    self.store.load().await.map_err(Error::storage)
  }

  pub async fn forget_profile(&self) -> Result<()> {
    self.store.clear().await.map_err(Error::storage)
  }

  /// A form pre-filled from the remembered profile, leaving the trip at the
  /// current time. `None` when nothing is remembered.
  pub async fn draft(&self, reason: ReasonKind) -> Result<Option<AttestationForm>> {
    Ok(
      self
        .remembered_profile()
        .await?
        .map(|p| AttestationForm::from_profile(&p, self.clock.now(), reason)),
    )
  }
}

fn canonical_reason(form: &AttestationForm) -> AttestationForm {
  let mut form = form.clone();
  if form.reason.is_empty() {
    return form;
  }
  let kind = ReasonKind::resolve(&form.reason);
  if ReasonKind::lookup(&form.reason).is_none() {
    warn!(reason = %form.reason, fallback = %kind, "unrecognised reason identifier");
  }
  form.reason = kind.identifier().to_owned();
  form
}
