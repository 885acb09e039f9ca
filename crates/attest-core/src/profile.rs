//! Remembered personal data, reused to pre-fill new attestations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Current version written by [`PersonalProfile::to_versioned_json`].
pub const PROFILE_VERSION: u32 = 1;

/// Personal fields the user asked to remember between attestations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalProfile {
  pub first_name:  String,
  pub last_name:   String,
  pub birth_date:  NaiveDate,
  pub birth_place: String,
  pub address:     String,
  pub city:        String,
  pub postal_code: String,
}

#[derive(Serialize, Deserialize)]
struct Envelope<P> {
  version: u32,
  profile: P,
}

impl PersonalProfile {
  /// Encode as `{"version": 1, "profile": {...}}`.
  pub fn to_versioned_json(&self) -> Result<String> {
    Ok(serde_json::to_string(&Envelope {
      version: PROFILE_VERSION,
      profile: self,
    })?)
  }

  /// Decode an envelope written by any supported version.
  pub fn from_versioned_json(s: &str) -> Result<Self> {
    let envelope: Envelope<serde_json::Value> = serde_json::from_str(s)?;
    match envelope.version {
      PROFILE_VERSION => Ok(serde_json::from_value(envelope.profile)?),
      other => Err(Error::UnsupportedProfileVersion(other)),
    }
  }
}
