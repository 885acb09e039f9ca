//! Attestation records and the draft form they are committed from.
//!
//! A record exists in exactly two states. While the user is filling in the
//! form it is an [`AttestationForm`] held by the caller; once validated and
//! constructed it becomes an [`AttestationRecord`], which is never edited
//! again. Deletion is the store's business.

use std::cmp::Reverse;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result, profile::PersonalProfile, reason::ReasonKind};

// ─── Fields ──────────────────────────────────────────────────────────────────

/// The required text fields of a form, reported by
/// [`Error::IncompleteForm`].
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FormField {
  FirstName,
  LastName,
  BirthPlace,
  Address,
  City,
  PostalCode,
  Reason,
}

impl FormField {
  pub(crate) fn join(fields: &[FormField]) -> String {
    fields
      .iter()
      .map(ToString::to_string)
      .collect::<Vec<_>>()
      .join(", ")
  }
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// Raw form input. Nothing here is checked until [`Self::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationForm {
  pub first_name:  String,
  pub last_name:   String,
  pub birth_date:  NaiveDate,
  pub birth_place: String,
  pub address:     String,
  pub city:        String,
  pub postal_code: String,
  pub trip_at:     DateTime<Utc>,
  /// Reason wire identifier, as picked by the user.
  pub reason:      String,
}

impl AttestationForm {
  /// A form pre-filled with remembered personal data.
  pub fn from_profile(
    profile: &PersonalProfile,
    trip_at: DateTime<Utc>,
    reason: ReasonKind,
  ) -> Self {
    Self {
      first_name: profile.first_name.clone(),
      last_name: profile.last_name.clone(),
      birth_date: profile.birth_date,
      birth_place: profile.birth_place.clone(),
      address: profile.address.clone(),
      city: profile.city.clone(),
      postal_code: profile.postal_code.clone(),
      trip_at,
      reason: reason.identifier().to_owned(),
    }
  }

  /// Every required field that is empty, in form order.
  pub fn missing_fields(&self) -> Vec<FormField> {
    [
      (FormField::FirstName, &self.first_name),
      (FormField::LastName, &self.last_name),
      (FormField::BirthPlace, &self.birth_place),
      (FormField::Address, &self.address),
      (FormField::City, &self.city),
      (FormField::PostalCode, &self.postal_code),
      (FormField::Reason, &self.reason),
    ]
    .into_iter()
    .filter(|(_, value)| value.is_empty())
    .map(|(field, _)| field)
    .collect()
  }

  /// Check that every required field is filled in.
  ///
  /// Only emptiness is checked; values are not trimmed or normalised.
  pub fn validate(&self) -> Result<ValidatedForm> {
    let missing = self.missing_fields();
    if missing.is_empty() {
      Ok(ValidatedForm(self.clone()))
    } else {
      Err(Error::IncompleteForm { missing })
    }
  }
}

/// A form that passed [`AttestationForm::validate`]. The only way to build
/// an [`AttestationRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm(AttestationForm);

impl ValidatedForm {
  pub fn form(&self) -> &AttestationForm { &self.0 }

  /// The personal part of the form, for the "remember me" store.
  pub fn profile(&self) -> PersonalProfile {
    let f = &self.0;
    PersonalProfile {
      first_name:  f.first_name.clone(),
      last_name:   f.last_name.clone(),
      birth_date:  f.birth_date,
      birth_place: f.birth_place.clone(),
      address:     f.address.clone(),
      city:        f.city.clone(),
      postal_code: f.postal_code.clone(),
    }
  }

  /// Commit the form. `created_at` is `now`; everything else is copied as-is.
  pub fn construct(self, now: DateTime<Utc>) -> AttestationRecord {
    let f = self.0;
    AttestationRecord {
      id:          Uuid::new_v4(),
      created_at:  now,
      first_name:  f.first_name,
      last_name:   f.last_name,
      birth_date:  f.birth_date,
      birth_place: f.birth_place,
      address:     f.address,
      city:        f.city,
      postal_code: f.postal_code,
      trip_at:     f.trip_at,
      reason:      f.reason,
    }
  }
}

// ─── Record ──────────────────────────────────────────────────────────────────

/// A committed attestation. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationRecord {
  pub id:          Uuid,
  /// Set once by [`ValidatedForm::construct`].
  pub created_at:  DateTime<Utc>,
  pub first_name:  String,
  pub last_name:   String,
  pub birth_date:  NaiveDate,
  pub birth_place: String,
  pub address:     String,
  pub city:        String,
  pub postal_code: String,
  pub trip_at:     DateTime<Utc>,
  /// Reason identifier exactly as submitted; may be a legacy alias.
  pub reason:      String,
}

impl AttestationRecord {
  /// The catalog entry this record cites.
  pub fn reason_kind(&self) -> ReasonKind { ReasonKind::resolve(&self.reason) }

  /// Whether this record is the one to surface at `now`.
  ///
  /// A trip still in the future is always active. Once the trip time has
  /// passed, the record stays active only for the reason's validity window,
  /// `[trip_at, trip_at + duration)`; reasons without a duration expire at
  /// the trip time.
  pub fn is_currently_active(&self, now: DateTime<Utc>) -> bool {
    if self.trip_at > now {
      return true;
    }
    match self.reason_kind().validity_duration() {
      Some(window) => now < self.trip_at + window,
      None => false,
    }
  }
}

/// Sort records for display: most recent trip first.
pub fn sort_for_display(records: &mut [AttestationRecord]) {
  records.sort_by(|a, b| b.trip_at.cmp(&a.trip_at));
}

/// The first active record in display order, if any. `records` may be in
/// any order; on equal trip times the earlier element wins, as with a stable
/// [`sort_for_display`].
pub fn current_record(
  records: &[AttestationRecord],
  now: DateTime<Utc>,
) -> Option<&AttestationRecord> {
  records
    .iter()
    .filter(|r| r.is_currently_active(now))
    .min_by_key(|r| Reverse(r.trip_at))
}
