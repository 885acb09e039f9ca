//! Plain-text views of records and the reason catalog.

use attest_core::{
  payload::PayloadFormat,
  reason::{ColorTag, ReasonKind},
  record::AttestationRecord,
};
use chrono::{DateTime, Datelike, NaiveDate, Utc, Weekday};

const MONTHS: [&str; 12] = [
  "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août",
  "septembre", "octobre", "novembre", "décembre",
];

fn weekday(d: Weekday) -> &'static str {
  match d {
    Weekday::Mon => "lundi",
    Weekday::Tue => "mardi",
    Weekday::Wed => "mercredi",
    Weekday::Thu => "jeudi",
    Weekday::Fri => "vendredi",
    Weekday::Sat => "samedi",
    Weekday::Sun => "dimanche",
  }
}

/// `29 juillet 1991`
pub fn long_date(d: NaiveDate) -> String {
  format!("{} {} {}", d.day(), MONTHS[d.month0() as usize], d.year())
}

/// `lundi 2 novembre 2020 à 09:00`, in the configured offset.
pub fn full_datetime(at: DateTime<Utc>, format: &PayloadFormat) -> String {
  let local = at.with_timezone(&format.offset);
  format!(
    "{} {} à {}",
    weekday(local.weekday()),
    long_date(local.date_naive()),
    local.format("%H:%M")
  )
}

/// ANSI foreground escape approximating a catalog color.
fn ansi(color: ColorTag) -> String {
  let (r, g, b) = match color {
    ColorTag::Blue => (0, 122, 255),
    ColorTag::Purple => (175, 82, 222),
    ColorTag::Red => (255, 59, 48),
    ColorTag::Orange => (255, 149, 0),
    ColorTag::Pink => (255, 45, 85),
    ColorTag::Yellow => (255, 204, 0),
    ColorTag::Green => (52, 199, 89),
    ColorTag::DisplayP3 { red, green, blue } => {
      let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
      (c(red), c(green), c(blue))
    }
  };
  format!("\x1b[38;2;{r};{g};{b}m")
}

const RESET: &str = "\x1b[0m";

/// One line per record: activity marker, id, trip time and reason.
pub fn list_line(
  record: &AttestationRecord,
  now: DateTime<Utc>,
  format: &PayloadFormat,
) -> String {
  let kind = record.reason_kind();
  let marker = if record.is_currently_active(now) { "●" } else { " " };
  format!(
    "{marker} {}  {}  {}●{RESET} {}",
    record.id,
    full_datetime(record.trip_at, format),
    ansi(kind.color_tag()),
    kind.short_description()
  )
}

/// The certificate as it would be shown to an inspecting official.
pub fn certificate(record: &AttestationRecord, format: &PayloadFormat) -> String {
  let kind = record.reason_kind();
  format!(
    "ATTESTATION DE DÉPLACEMENT DÉROGATOIRE\n\n\
     Je soussigné·e,\n  {first} {last}\n\
     né·e le\n  {born}\n  à {birth_place}\n\
     demeurant\n  {address}\n  {postal_code} {city}\n\
     certifie que mon déplacement est lié au motif suivant :\n  \
     {color}●{RESET} {short}\n  {long}\n\
     Fait à\n  {city}\nle\n  {trip}",
    first = record.first_name,
    last = record.last_name,
    born = long_date(record.birth_date),
    birth_place = record.birth_place,
    address = record.address,
    postal_code = record.postal_code,
    city = record.city,
    color = ansi(kind.color_tag()),
    short = kind.short_description(),
    long = kind.long_description(),
    trip = full_datetime(record.trip_at, format),
  )
}

/// The catalog, one reason per line.
pub fn reason_line(kind: ReasonKind) -> String {
  let validity = kind
    .validity_duration()
    .map(|d| format!(" (valable {}h)", d.num_hours()))
    .unwrap_or_default();
  format!(
    "{}●{RESET} {:<24} {:<26} {}{validity}",
    ansi(kind.color_tag()),
    kind.identifier(),
    kind.short_description(),
    kind.icon_tag(),
  )
}
