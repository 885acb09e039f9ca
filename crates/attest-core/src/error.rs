//! Error types for `attest-core`.

use thiserror::Error;

use crate::record::FormField;

#[derive(Debug, Error)]
pub enum Error {
  /// One or more required fields were empty; the form is not submitted.
  #[error("incomplete form, missing: {}", FormField::join(.missing))]
  IncompleteForm { missing: Vec<FormField> },

  /// Opaque failure reported by a persistence collaborator.
  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("unsupported profile encoding version: {0}")]
  UnsupportedProfileVersion(u32),
}

impl Error {
  /// Wrap a collaborator error without inspecting it.
  pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Storage(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
