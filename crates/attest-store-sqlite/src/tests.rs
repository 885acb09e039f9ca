//! Integration tests for `SqliteStore` against an in-memory database.

use attest_core::{
  profile::PersonalProfile,
  reason::ReasonKind,
  record::{AttestationForm, AttestationRecord},
  store::{AttestationStore, ProfileStore},
};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn base_time() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2020, 11, 2, 9, 0, 0).unwrap()
}

fn profile() -> PersonalProfile {
  PersonalProfile {
    first_name:  "Valérie".into(),
    last_name:   "Diaz".into(),
    birth_date:  NaiveDate::from_ymd_opt(1991, 7, 29).unwrap(),
    birth_place: "Delahaye".into(),
    address:     "90 avenue Michel Pons".into(),
    city:        "Delahaye".into(),
    postal_code: "77141".into(),
  }
}

fn record(trip_at: DateTime<Utc>, reason: ReasonKind) -> AttestationRecord {
  AttestationForm::from_profile(&profile(), trip_at, reason)
    .validate()
    .unwrap()
    .construct(base_time())
}

// ─── Records ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn insert_and_get_record() {
  let s = store().await;
  let r = record(base_time(), ReasonKind::Travail);

  let inserted = s.insert(r.clone()).await.unwrap();
  assert_eq!(inserted, r);

  let fetched = s.get(r.id).await.unwrap();
  assert_eq!(fetched, Some(r));
}

#[tokio::test]
async fn get_missing_returns_none() {
  let s = store().await;
  assert!(s.get(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn fields_survive_storage_verbatim() {
  let s = store().await;
  let mut r = record(base_time() + Duration::milliseconds(250), ReasonKind::Sante);
  r.address = "  12 rue de l'Église, bât. B ".into();
  r.reason = "sport".into();

  s.insert(r.clone()).await.unwrap();
  let fetched = s.get(r.id).await.unwrap().unwrap();

  assert_eq!(fetched.address, r.address);
  assert_eq!(fetched.trip_at, r.trip_at);
  assert_eq!(fetched.reason, "sport");
  assert_eq!(fetched.reason_kind(), ReasonKind::SportAnimaux);
}

#[tokio::test]
async fn list_is_trip_descending() {
  let s = store().await;
  let old = record(base_time() - Duration::days(3), ReasonKind::Achats);
  let new = record(base_time() + Duration::hours(2), ReasonKind::Travail);
  let mid = record(base_time(), ReasonKind::SportAnimaux);

  for r in [&old, &new, &mid] {
    s.insert(r.clone()).await.unwrap();
  }

  let ids: Vec<Uuid> = s.list().await.unwrap().into_iter().map(|r| r.id).collect();
  assert_eq!(ids, vec![new.id, mid.id, old.id]);
}

#[tokio::test]
async fn list_empty_store() {
  let s = store().await;
  assert!(s.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_id_is_rejected() {
  let s = store().await;
  let r = record(base_time(), ReasonKind::Travail);
  s.insert(r.clone()).await.unwrap();

  let err = s.insert(r).await.unwrap_err();
  assert!(matches!(err, crate::Error::Database(_)));
}

#[tokio::test]
async fn delete_single_record() {
  let s = store().await;
  let keep = record(base_time(), ReasonKind::Travail);
  let gone = record(base_time(), ReasonKind::Famille);
  s.insert(keep.clone()).await.unwrap();
  s.insert(gone.clone()).await.unwrap();

  assert!(s.delete(gone.id).await.unwrap());
  assert!(!s.delete(gone.id).await.unwrap());

  let remaining = s.list().await.unwrap();
  assert_eq!(remaining, vec![keep]);
}

#[tokio::test]
async fn delete_many_counts_existing_only() {
  let s = store().await;
  let a = record(base_time(), ReasonKind::Travail);
  let b = record(base_time() - Duration::hours(1), ReasonKind::Travail);
  let c = record(base_time() - Duration::hours(2), ReasonKind::Travail);
  for r in [&a, &b, &c] {
    s.insert(r.clone()).await.unwrap();
  }

  let deleted = s.delete_many(vec![a.id, c.id, Uuid::new_v4()]).await.unwrap();
  assert_eq!(deleted, 2);

  let remaining: Vec<Uuid> = s.list().await.unwrap().iter().map(|r| r.id).collect();
  assert_eq!(remaining, vec![b.id]);
}

#[tokio::test]
async fn delete_many_with_no_ids() {
  let s = store().await;
  s.insert(record(base_time(), ReasonKind::Travail)).await.unwrap();
  assert_eq!(s.delete_many(Vec::new()).await.unwrap(), 0);
  assert_eq!(s.list().await.unwrap().len(), 1);
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn profile_absent_by_default() {
  let s = store().await;
  assert!(s.load().await.unwrap().is_none());
}

#[tokio::test]
async fn profile_save_overwrites_and_clear_removes() {
  let s = store().await;

  s.save(profile()).await.unwrap();
  assert_eq!(s.load().await.unwrap(), Some(profile()));

  let mut moved = profile();
  moved.city = "Lyon".into();
  moved.postal_code = "69001".into();
  s.save(moved.clone()).await.unwrap();
  assert_eq!(s.load().await.unwrap(), Some(moved));

  s.clear().await.unwrap();
  assert!(s.load().await.unwrap().is_none());

  // clearing twice is harmless
  s.clear().await.unwrap();
}

#[tokio::test]
async fn profile_and_records_are_independent() {
  let s = store().await;
  let r = record(base_time(), ReasonKind::Travail);
  s.insert(r.clone()).await.unwrap();
  s.save(profile()).await.unwrap();

  s.clear().await.unwrap();
  assert_eq!(s.list().await.unwrap(), vec![r.clone()]);

  s.save(profile()).await.unwrap();
  s.delete(r.id).await.unwrap();
  assert!(s.load().await.unwrap().is_some());
}

// ─── File-backed ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_a_file_keeps_data() {
  let dir = std::env::temp_dir().join(format!("attest-store-{}", Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("attestations.db");

  let r = record(base_time(), ReasonKind::Enfants);
  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.insert(r.clone()).await.unwrap();
    s.save(profile()).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.list().await.unwrap(), vec![r]);
  assert_eq!(s.load().await.unwrap(), Some(profile()));

  drop(s);
  std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn unreadable_profile_surfaces_as_core_error() {
  let dir = std::env::temp_dir().join(format!("attest-store-{}", Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("attestations.db");

  drop(SqliteStore::open(&path).await.unwrap());
  rusqlite::Connection::open(&path)
    .unwrap()
    .execute(
      "INSERT INTO profile (slot, profile_json, saved_at) VALUES (0, 'not json', '')",
      [],
    )
    .unwrap();

  let s = SqliteStore::open(&path).await.unwrap();
  let err = s.load().await.unwrap_err();
  assert!(
    matches!(err, crate::Error::Core(attest_core::Error::Serialization(_))),
    "{err:?}"
  );

  drop(s);
  std::fs::remove_dir_all(&dir).ok();
}
