//! Core types for the travel attestation generator.
//!
//! The reason catalog, the attestation record model (validation,
//! construction, payload formatting, activity checks) and the traits that
//! storage and barcode backends implement. No database or rendering
//! dependencies live here.

pub mod clock;
pub mod error;
pub mod payload;
pub mod profile;
pub mod reason;
pub mod record;
pub mod service;
pub mod store;

pub use error::{Error, Result};
