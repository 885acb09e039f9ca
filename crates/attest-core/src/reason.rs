//! The reason catalog — every travel justification an attestation can cite.
//!
//! Each [`ReasonKind`] variant owns one row of a fixed attribute table. Wire
//! identifiers are stable across catalog revisions: identifiers retired by an
//! older revision live in a separate alias table and resolve to the variant
//! that replaced them, so records persisted by older versions always decode.

use std::{convert::Infallible, fmt, str::FromStr};

use chrono::Duration;
use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, IntoEnumIterator};

// ─── Variants ────────────────────────────────────────────────────────────────

/// A travel-justification category.
///
/// Serialises as its wire identifier and deserialises through
/// [`ReasonKind::resolve`], so decoding never fails.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  EnumIter,
  EnumCount,
  Serialize,
  Deserialize,
)]
#[serde(into = "String", from = "String")]
pub enum ReasonKind {
  Travail,
  Achats,
  Sante,
  Famille,
  Handicap,
  SportAnimaux,
  Convocation,
  Missions,
  Enfants,
}

/// Display color attached to a reason.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColorTag {
  Blue,
  Purple,
  Red,
  Orange,
  Pink,
  Yellow,
  Green,
  /// An explicit color in the Display P3 space, components in `0.0..=1.0`.
  DisplayP3 { red: f32, green: f32, blue: f32 },
}

// ─── Attribute table ─────────────────────────────────────────────────────────

struct ReasonInfo {
  kind:             ReasonKind,
  identifier:       &'static str,
  short:            &'static str,
  super_short:      &'static str,
  long:             &'static str,
  icon:             &'static str,
  color:            ColorTag,
  validity_minutes: Option<i64>,
}

/// One row per variant, in declaration order.
static CATALOG: [ReasonInfo; ReasonKind::COUNT] = [
  ReasonInfo {
    kind:             ReasonKind::Travail,
    identifier:       "travail",
    short:            "Travail",
    super_short:      "Travail",
    long:             "Déplacements entre le domicile et le lieu d’exercice de \
                       l’activité professionnelle ou un établissement \
                       d’enseignement ou de formation, déplacements \
                       professionnels ne pouvant être différés, déplacements \
                       pour un concours ou un examen.",
    icon:             "briefcase.fill",
    color:            ColorTag::Blue,
    validity_minutes: None,
  },
  ReasonInfo {
    kind:             ReasonKind::Achats,
    identifier:       "achats_culturel_cultuel",
    short:            "Achats, culture & culte",
    super_short:      "Achats",
    long:             "Déplacements pour effectuer des achats de biens, pour \
                       des services dont la fourniture est autorisée, pour les \
                       retraits de commandes et les livraisons à domicile, \
                       pour se rendre dans un établissement culturel autorisé \
                       ou un lieu de culte.",
    icon:             "cart.fill",
    color:            ColorTag::Purple,
    validity_minutes: None,
  },
  ReasonInfo {
    kind:             ReasonKind::Sante,
    identifier:       "sante",
    short:            "Santé",
    super_short:      "Santé",
    long:             "Consultations, examens et soins ne pouvant être assurés \
                       à distance et l’achat de médicaments.",
    icon:             "staroflife.circle.fill",
    color:            ColorTag::Red,
    validity_minutes: None,
  },
  ReasonInfo {
    kind:             ReasonKind::Famille,
    identifier:       "famille",
    short:            "Famille",
    super_short:      "Famille",
    long:             "Déplacements pour motif familial impérieux, pour \
                       l'assistance aux personnes vulnérables et précaires ou \
                       la garde d'enfants.",
    icon:             "person.2.square.stack",
    color:            ColorTag::DisplayP3 { red: 0.37, green: 0.32, blue: 0.87 },
    validity_minutes: None,
  },
  ReasonInfo {
    kind:             ReasonKind::Handicap,
    identifier:       "handicap",
    short:            "Assistance",
    super_short:      "Handicap",
    long:             "Déplacement des personnes en situation de handicap et \
                       leur accompagnant.",
    icon:             "heart.circle.fill",
    color:            ColorTag::Orange,
    validity_minutes: None,
  },
  ReasonInfo {
    kind:             ReasonKind::SportAnimaux,
    identifier:       "sport_animaux",
    short:            "Promenade & sport",
    super_short:      "Sport",
    long:             "Déplacements en plein air ou vers un lieu de plein air, \
                       sans changement du lieu de résidence, dans la limite de \
                       trois heures quotidiennes et dans un rayon maximal de \
                       vingt kilomètres autour du domicile, liés soit à \
                       l'activité physique ou aux loisirs individuels, à \
                       l'exclusion de toute pratique sportive collective et de \
                       toute proximité avec d'autres personnes, soit à la \
                       promenade avec les seules personnes regroupées dans un \
                       même domicile, soit aux besoins des animaux de \
                       compagnie.",
    icon:             "figure.walk",
    color:            ColorTag::DisplayP3 { red: 1.0, green: 0.56, blue: 0.0 },
    validity_minutes: Some(3 * 60),
  },
  ReasonInfo {
    kind:             ReasonKind::Convocation,
    identifier:       "convocation",
    short:            "Convocation",
    super_short:      "Convoc.",
    long:             "Convocation judiciaire ou administrative et pour se \
                       rendre dans un service public.",
    icon:             "scroll.fill",
    color:            ColorTag::Pink,
    validity_minutes: None,
  },
  ReasonInfo {
    kind:             ReasonKind::Missions,
    identifier:       "missions",
    short:            "Missions",
    super_short:      "Missions",
    long:             "Participation à des missions d'intérêt général sur \
                       demande de l'autorité administrative.",
    icon:             "star.square.fill",
    color:            ColorTag::Yellow,
    validity_minutes: None,
  },
  ReasonInfo {
    kind:             ReasonKind::Enfants,
    identifier:       "enfants",
    short:            "École",
    super_short:      "École",
    long:             "Déplacement pour chercher les enfants à l’école et à \
                       l’occasion de leurs activités périscolaires.",
    icon:             "book.fill",
    color:            ColorTag::Green,
    validity_minutes: None,
  },
];

/// Identifiers used by earlier catalog revisions.
///
/// Kept apart from [`CATALOG`] so renaming or merging a category only ever
/// adds rows here.
static ALIASES: &[(&str, ReasonKind)] = &[
  // first generation
  ("sport", ReasonKind::SportAnimaux),
  ("judiciaire", ReasonKind::Convocation),
  // second generation, before the shopping category absorbed culture/worship
  ("achats", ReasonKind::Achats),
  // display-name spellings that leaked into early stored records
  ("promenade", ReasonKind::SportAnimaux),
  ("courses", ReasonKind::Achats),
  ("assistance", ReasonKind::Handicap),
  ("ecole", ReasonKind::Enfants),
];

/// Quick-pick shortcuts, in presentation order.
static ACTIVE_CATALOG: [ReasonKind; 4] = [
  ReasonKind::SportAnimaux,
  ReasonKind::Achats,
  ReasonKind::Travail,
  ReasonKind::Enfants,
];

// ─── Lookups ─────────────────────────────────────────────────────────────────

impl ReasonKind {
  /// Variant that unknown identifiers resolve to.
  pub const FALLBACK: ReasonKind = ReasonKind::Travail;

  fn info(self) -> &'static ReasonInfo { &CATALOG[self as usize] }

  /// Strict lookup: canonical identifiers and documented aliases only.
  pub fn lookup(identifier: &str) -> Option<Self> {
    CATALOG
      .iter()
      .find(|info| info.identifier == identifier)
      .map(|info| info.kind)
      .or_else(|| {
        ALIASES
          .iter()
          .find(|(alias, _)| *alias == identifier)
          .map(|(_, kind)| *kind)
      })
  }

  /// Total lookup; anything unrecognised becomes [`Self::FALLBACK`].
  pub fn resolve(identifier: &str) -> Self {
    Self::lookup(identifier).unwrap_or(Self::FALLBACK)
  }

  /// Every variant, in catalog order — the full picker.
  pub fn all() -> impl Iterator<Item = Self> { Self::iter() }

  /// The quick-pick subset.
  pub fn active_catalog() -> &'static [Self] { &ACTIVE_CATALOG }

  /// Stable wire identifier, written to storage and to the payload.
  pub fn identifier(self) -> &'static str { self.info().identifier }

  pub fn short_description(self) -> &'static str { self.info().short }

  pub fn super_short_description(self) -> &'static str {
    self.info().super_short
  }

  /// The legal wording of the reason, as printed on the certificate.
  pub fn long_description(self) -> &'static str { self.info().long }

  /// Symbol name of the icon shown next to the reason.
  pub fn icon_tag(self) -> &'static str { self.info().icon }

  pub fn color_tag(self) -> ColorTag { self.info().color }

  /// How long after the trip time a record citing this reason stays active.
  /// `None` means the reason is not time-boxed.
  pub fn validity_duration(self) -> Option<Duration> {
    self.info().validity_minutes.map(Duration::minutes)
  }
}

impl fmt::Display for ReasonKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.identifier())
  }
}

impl FromStr for ReasonKind {
  type Err = Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(Self::resolve(s)) }
}

impl From<ReasonKind> for String {
  fn from(kind: ReasonKind) -> Self { kind.identifier().to_owned() }
}

impl From<String> for ReasonKind {
  fn from(identifier: String) -> Self { Self::resolve(&identifier) }
}
