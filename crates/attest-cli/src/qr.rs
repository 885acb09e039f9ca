//! Terminal QR rendering for attestation payloads.

use attest_core::store::BarcodeEncoder;
use qrcode::{EcLevel, QrCode, render::unicode};

#[derive(Debug, thiserror::Error)]
#[error("cannot encode payload as QR code: {0}")]
pub struct QrError(String);

/// Renders payloads as half-block characters, light modules on dark so the
/// code scans from a dark terminal.
#[derive(Debug, Clone, Copy)]
pub struct TerminalQr {
  pub ec_level: EcLevel,
}

impl Default for TerminalQr {
  fn default() -> Self { Self { ec_level: EcLevel::M } }
}

impl BarcodeEncoder for TerminalQr {
  type Output = String;
  type Error = QrError;

  fn encode(&self, payload: &str) -> Result<String, QrError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), self.ec_level)
      .map_err(|e| QrError(e.to_string()))?;
    Ok(
      code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn renders_a_square_block() {
    let out = TerminalQr::default().encode("Motifs: travail").unwrap();
    let lines: Vec<_> = out.lines().collect();
    assert!(lines.len() > 5);
    let width = lines[0].chars().count();
    assert!(lines.iter().all(|l| l.chars().count() == width));
  }

  #[test]
  fn oversized_payload_fails() {
    let huge = "x".repeat(10_000);
    assert!(TerminalQr::default().encode(&huge).is_err());
  }
}
