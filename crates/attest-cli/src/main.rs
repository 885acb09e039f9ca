//! `attest` — generate and manage travel attestations from the terminal.
//!
//! # Usage
//!
//! ```text
//! attest new --first-name Valérie --last-name Diaz --birth-date 1991-07-29 \
//!   --birth-place Delahaye --address "90 avenue Michel Pons" \
//!   --city Delahaye --postal-code 77141 --reason travail --remember
//! attest new --reason sport_animaux          # reuses the remembered profile
//! attest list
//! attest show <ID>
//! attest delete <ID>...
//! ```

mod qr;
mod render;
mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use attest_core::{
  payload::{PayloadFormat, format_payload_with},
  reason::ReasonKind,
  record::{AttestationForm, AttestationRecord},
  service::AttestationService,
  store::BarcodeEncoder,
};
use attest_store_sqlite::SqliteStore;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use qr::TerminalQr;
use settings::Settings;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "attest", version, about = "Travel attestation generator")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "attest.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Generate a new attestation.
  New(NewArgs),
  /// List attestations, most recent trip first.
  List,
  /// Show an attestation with its QR code.
  Show { id: Uuid },
  /// Show the attestation active right now, if any.
  Current,
  /// Delete one or more attestations.
  Delete {
    #[arg(required_unless_present = "all")]
    ids: Vec<Uuid>,
    /// Delete every attestation.
    #[arg(long, conflicts_with = "ids")]
    all: bool,
  },
  /// List travel reasons.
  Reasons {
    /// Only the quick-pick shortcuts.
    #[arg(long)]
    quick: bool,
  },
  /// Inspect or forget the remembered personal data.
  #[command(subcommand)]
  Profile(ProfileCommand),
}

#[derive(Subcommand, Debug)]
enum ProfileCommand {
  Show,
  Forget,
}

#[derive(clap::Args, Debug)]
struct NewArgs {
  #[arg(long)]
  first_name:  Option<String>,
  #[arg(long)]
  last_name:   Option<String>,
  /// YYYY-MM-DD
  #[arg(long)]
  birth_date:  Option<NaiveDate>,
  #[arg(long)]
  birth_place: Option<String>,
  #[arg(long)]
  address:     Option<String>,
  #[arg(long)]
  city:        Option<String>,
  #[arg(long)]
  postal_code: Option<String>,
  /// Trip time as `YYYY-MM-DD HH:MM` in the configured offset; default now.
  #[arg(long)]
  trip:        Option<String>,
  /// Reason identifier (see `attest reasons`).
  #[arg(long)]
  reason:      String,
  /// Remember the personal data for next time.
  #[arg(long, conflicts_with = "forget")]
  remember:    bool,
  /// Forget any remembered personal data.
  #[arg(long)]
  forget:      bool,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;
  let format = settings.payload_format()?;

  let store_path = settings.store_path();
  if let Some(parent) = store_path.parent() {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let service = AttestationService::new(store);

  match cli.command {
    Command::New(args) => new(&service, args, &format).await,
    Command::List => list(&service, &format).await,
    Command::Show { id } => {
      let record = service
        .record(id)
        .await?
        .with_context(|| format!("no attestation with id {id}"))?;
      show(&record, &format)
    }
    Command::Current => match service.current().await? {
      Some(record) => show(&record, &format),
      None => {
        println!("No active attestation.");
        Ok(())
      }
    },
    Command::Delete { ids, all } => delete(&service, ids, all).await,
    Command::Reasons { quick } => {
      let kinds: Vec<ReasonKind> = if quick {
        ReasonKind::active_catalog().to_vec()
      } else {
        ReasonKind::all().collect()
      };
      for kind in kinds {
        println!("{}", render::reason_line(kind));
      }
      Ok(())
    }
    Command::Profile(ProfileCommand::Show) => {
      match service.remembered_profile().await? {
        Some(p) => println!(
          "{} {}, né·e le {} à {}\n{} {} {}",
          p.first_name,
          p.last_name,
          render::long_date(p.birth_date),
          p.birth_place,
          p.address,
          p.postal_code,
          p.city
        ),
        None => println!("No personal data remembered."),
      }
      Ok(())
    }
    Command::Profile(ProfileCommand::Forget) => {
      service.forget_profile().await?;
      println!("Personal data forgotten.");
      Ok(())
    }
  }
}

// ─── Commands ─────────────────────────────────────────────────────────────────

type Service = AttestationService<SqliteStore>;

async fn new(service: &Service, args: NewArgs, format: &PayloadFormat) -> Result<()> {
  let trip_at = match &args.trip {
    Some(s) => parse_trip(s, format)?,
    None => service.now(),
  };

  let reason = parse_reason(&args.reason)?;
  let remembered = service.draft(reason).await?;
  let used_profile = remembered.is_some();

  let mut form = match remembered {
    Some(form) => form,
    None => AttestationForm {
      first_name: String::new(),
      last_name: String::new(),
      birth_date: args
        .birth_date
        .context("--birth-date is required when no personal data is remembered")?,
      birth_place: String::new(),
      address: String::new(),
      city: String::new(),
      postal_code: String::new(),
      trip_at,
      reason: String::new(),
    },
  };

  form.trip_at = trip_at;
  form.reason = reason.identifier().to_owned();
  let overrides = [
    (&mut form.first_name, args.first_name),
    (&mut form.last_name, args.last_name),
    (&mut form.birth_place, args.birth_place),
    (&mut form.address, args.address),
    (&mut form.city, args.city),
    (&mut form.postal_code, args.postal_code),
  ];
  for (field, value) in overrides {
    if let Some(value) = value {
      *field = value;
    }
  }
  if let Some(d) = args.birth_date {
    form.birth_date = d;
  }

  // Remembered data stays remembered unless told otherwise.
  let remember = !args.forget && (args.remember || used_profile);

  let record = match service.generate(&form, remember).await {
    Ok(record) => record,
    Err(e @ attest_core::Error::IncompleteForm { .. }) => {
      bail!("all fields are required; {e}")
    }
    Err(e) => {
      return Err(anyhow::Error::new(e).context("could not save the attestation"));
    }
  };

  show(&record, format)
}

async fn list(service: &Service, format: &PayloadFormat) -> Result<()> {
  let records = service.records().await?;
  if records.is_empty() {
    println!("No attestations.");
    return Ok(());
  }
  let now = service.now();
  for record in &records {
    println!("{}", render::list_line(record, now, format));
  }
  Ok(())
}

async fn delete(service: &Service, ids: Vec<Uuid>, all: bool) -> Result<()> {
  let ids = if all {
    service.records().await?.into_iter().map(|r| r.id).collect()
  } else {
    ids
  };

  let deleted = match ids.as_slice() {
    [] => 0,
    [id] => usize::from(service.delete(*id).await?),
    _ => service.delete_many(ids).await?,
  };
  println!("Deleted {deleted} attestation(s).");
  Ok(())
}

fn show(record: &AttestationRecord, format: &PayloadFormat) -> Result<()> {
  let payload = format_payload_with(record, format);
  let code = TerminalQr::default()
    .encode(&payload)
    .context("rendering QR code")?;

  println!("{}\n", render::certificate(record, format));
  println!("{code}");
  println!("{payload}");
  println!("\nid: {}", record.id);
  Ok(())
}

/// Accept a catalog identifier or a documented legacy alias, nothing else.
fn parse_reason(s: &str) -> Result<ReasonKind> {
  ReasonKind::lookup(s).with_context(|| {
    format!("unknown reason {s:?}; run `attest reasons` for the list")
  })
}

/// Parse `YYYY-MM-DD HH:MM` (or with a `T` separator) as wall-clock time in
/// the configured offset.
fn parse_trip(s: &str, format: &PayloadFormat) -> Result<DateTime<Utc>> {
  let naive = ["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"]
    .iter()
    .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok());
  let Some(naive) = naive else {
    bail!("invalid trip time {s:?}, expected YYYY-MM-DD HH:MM");
  };
  let local = format
    .offset
    .from_local_datetime(&naive)
    .single()
    .with_context(|| format!("ambiguous trip time {s:?}"))?;
  Ok(local.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn trip_is_read_in_configured_offset() {
    let paris = PayloadFormat::with_offset_minutes(60).unwrap();
    let at = parse_trip("2020-11-02 09:00", &paris).unwrap();
    assert_eq!(at, Utc.with_ymd_and_hms(2020, 11, 2, 8, 0, 0).unwrap());
    assert_eq!(parse_trip("2020-11-02T09:00", &paris).unwrap(), at);
  }

  #[test]
  fn malformed_trip_is_rejected() {
    assert!(parse_trip("02/11/2020 9h", &PayloadFormat::default()).is_err());
  }

  #[test]
  fn reason_must_be_in_the_catalog() {
    assert_eq!(parse_reason("sport_animaux").unwrap(), ReasonKind::SportAnimaux);
    assert_eq!(parse_reason("judiciaire").unwrap(), ReasonKind::Convocation);
    assert!(parse_reason("couvre_feu").is_err());
    assert!(parse_reason("").is_err());
  }

  #[test]
  fn cli_parses_new_with_remembered_profile() {
    let cli = Cli::try_parse_from(["attest", "new", "--reason", "sport"]).unwrap();
    match cli.command {
      Command::New(args) => {
        assert_eq!(args.reason, "sport");
        assert!(args.first_name.is_none());
        assert!(!args.remember);
      }
      other => panic!("unexpected command {other:?}"),
    }
  }

  #[test]
  fn delete_requires_ids_or_all() {
    assert!(Cli::try_parse_from(["attest", "delete"]).is_err());
    assert!(Cli::try_parse_from(["attest", "delete", "--all"]).is_ok());
  }

  #[test]
  fn clap_definition_is_consistent() {
    use clap::CommandFactory;
    Cli::command().debug_assert();
  }
}
