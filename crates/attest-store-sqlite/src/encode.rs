//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings so that
//! lexicographic order in SQL matches chronological order. Calendar dates
//! are ISO 8601. UUIDs are hyphenated lowercase strings.

use attest_core::record::AttestationRecord;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── NaiveDate ────────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list shared by every `SELECT` on `attestations`, in
/// [`RawAttestation`] field order.
pub const ATTESTATION_COLUMNS: &str = "attestation_id, created_at, first_name, \
  last_name, birth_date, birth_place, address, city, postal_code, trip_at, \
  reason";

/// Raw strings read directly from an `attestations` row.
pub struct RawAttestation {
  pub attestation_id: String,
  pub created_at:     String,
  pub first_name:     String,
  pub last_name:      String,
  pub birth_date:     String,
  pub birth_place:    String,
  pub address:        String,
  pub city:           String,
  pub postal_code:    String,
  pub trip_at:        String,
  pub reason:         String,
}

impl RawAttestation {
  /// Read a row selected with [`ATTESTATION_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      attestation_id: row.get(0)?,
      created_at:     row.get(1)?,
      first_name:     row.get(2)?,
      last_name:      row.get(3)?,
      birth_date:     row.get(4)?,
      birth_place:    row.get(5)?,
      address:        row.get(6)?,
      city:           row.get(7)?,
      postal_code:    row.get(8)?,
      trip_at:        row.get(9)?,
      reason:         row.get(10)?,
    })
  }

  pub fn from_record(record: &AttestationRecord) -> Self {
    Self {
      attestation_id: encode_uuid(record.id),
      created_at:     encode_dt(record.created_at),
      first_name:     record.first_name.clone(),
      last_name:      record.last_name.clone(),
      birth_date:     encode_date(record.birth_date),
      birth_place:    record.birth_place.clone(),
      address:        record.address.clone(),
      city:           record.city.clone(),
      postal_code:    record.postal_code.clone(),
      trip_at:        encode_dt(record.trip_at),
      reason:         record.reason.clone(),
    }
  }

  pub fn into_record(self) -> Result<AttestationRecord> {
    Ok(AttestationRecord {
      id:          decode_uuid(&self.attestation_id)?,
      created_at:  decode_dt(&self.created_at)?,
      first_name:  self.first_name,
      last_name:   self.last_name,
      birth_date:  decode_date(&self.birth_date)?,
      birth_place: self.birth_place,
      address:     self.address,
      city:        self.city,
      postal_code: self.postal_code,
      trip_at:     decode_dt(&self.trip_at)?,
      reason:      self.reason,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn encoded_timestamps_sort_chronologically() {
    let earlier = Utc.with_ymd_and_hms(2020, 11, 2, 9, 0, 0).unwrap();
    let later = earlier + chrono::Duration::milliseconds(1500);
    assert!(encode_dt(earlier) < encode_dt(later));
    assert_eq!(encode_dt(earlier), "2020-11-02T09:00:00.000000000Z");
  }

  #[test]
  fn timestamp_and_date_decode() {
    let at = Utc.with_ymd_and_hms(2020, 10, 30, 10, 25, 7).unwrap();
    assert_eq!(decode_dt(&encode_dt(at)).unwrap(), at);

    let d = NaiveDate::from_ymd_opt(1991, 7, 29).unwrap();
    assert_eq!(encode_date(d), "1991-07-29");
    assert_eq!(decode_date("1991-07-29").unwrap(), d);
  }

  #[test]
  fn malformed_values_are_date_parse_errors() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
    assert!(matches!(decode_date("29/07/1991"), Err(Error::DateParse(_))));
  }
}
