//! The human-readable payload encoded into an attestation's scannable code.
//!
//! Field order, labels and date formats are fixed so an inspecting official
//! reads the same text regardless of the device that produced it: dates are
//! day/month/year and times use the 24-hour clock, rendered in a fixed UTC
//! offset rather than the host's zone.

use chrono::{DateTime, FixedOffset, Offset, Utc};

use crate::record::AttestationRecord;

const DATE_FORMAT: &str = "%d/%m/%Y";
const TIME_FORMAT: &str = "%Hh%M";

/// Rendering settings for [`format_payload_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayloadFormat {
  /// Offset timestamps are shown in.
  pub offset: FixedOffset,
}

impl Default for PayloadFormat {
  fn default() -> Self {
    Self { offset: Utc.fix() }
  }
}

impl PayloadFormat {
  /// `None` if `minutes` is outside ±24h.
  pub fn with_offset_minutes(minutes: i32) -> Option<Self> {
    FixedOffset::east_opt(minutes.checked_mul(60)?).map(|offset| Self { offset })
  }

  fn timestamp(&self, at: DateTime<Utc>) -> String {
    let local = at.with_timezone(&self.offset);
    format!("{} a {}", local.format(DATE_FORMAT), local.format(TIME_FORMAT))
  }
}

/// Build the payload in UTC.
pub fn format_payload(record: &AttestationRecord) -> String {
  format_payload_with(record, &PayloadFormat::default())
}

/// Build the payload with explicit rendering settings.
///
/// The reason is written as the current catalog identifier it resolves to,
/// always the last thing in the output, so the scanned text names the same
/// reason as the certificate.
pub fn format_payload_with(
  record: &AttestationRecord,
  format: &PayloadFormat,
) -> String {
  [
    format!("Cree le: {};", format.timestamp(record.created_at)),
    format!("Nom: {};", record.last_name),
    format!("Prenom: {};", record.first_name),
    format!(
      "Naissance: {} a {};",
      record.birth_date.format(DATE_FORMAT),
      record.birth_place
    ),
    format!(
      "Adresse: {} {} {};",
      record.address, record.postal_code, record.city
    ),
    format!("Sortie: {};", format.timestamp(record.trip_at)),
    format!("Motifs: {}", record.reason_kind().identifier()),
  ]
  .join("\n")
}
