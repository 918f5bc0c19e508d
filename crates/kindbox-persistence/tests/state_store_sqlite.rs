use fsm::{ActorContext, DataPatch, FlowNamespace, FsmError, StateStore, StateTag};
use kindbox_persistence::Database;
use serde_json::json;
use std::path::PathBuf;
use uuid::Uuid;

// Base SQLite temporaria en archivo: evita problemas de URIs de memoria
// compartida entre conexiones del pool.
fn temp_db() -> (PathBuf, Database) {
  let tmp_path = std::env::temp_dir().join(format!("kindbox_state_{}.db", Uuid::new_v4()));
  let db = Database::open(tmp_path.to_str().unwrap()).expect("open db");
  (tmp_path, db)
}

#[test]
fn sqlite_state_store_defaults_and_roundtrip() {
  let (path, db) = temp_db();
  let store = db.state_store();
  let ctx = ActorContext::user(100);

  assert_eq!(store.get_state(&ctx).unwrap(), StateTag::NO_STATE);
  assert!(store.get_data(&ctx).unwrap().is_empty());

  store.set_state(&ctx, StateTag::from_static("registration.set_municipality")).unwrap();
  store.merge_data(&ctx, DataPatch::new().set("donor_name", "Мария Иванова")).unwrap();
  store.merge_data(&ctx, DataPatch::new().set("municipality_name", "Самара").set("organization_name", json!(null)))
       .unwrap();

  assert_eq!(store.get_state(&ctx).unwrap(), StateTag::new("registration.set_municipality"));
  let data = store.get_data(&ctx).unwrap();
  assert_eq!(data.get_str("donor_name"), Some("Мария Иванова"));
  assert_eq!(data.get_str("municipality_name"), Some("Самара"));
  assert!(!data.contains_key("organization_name"));
  let _ = std::fs::remove_file(path);
}

#[test]
fn sqlite_merge_before_set_state_creates_no_state_record() {
  let (path, db) = temp_db();
  let store = db.state_store();
  let ctx = ActorContext::user(7);
  store.merge_data(&ctx, DataPatch::new().set("k", 1)).unwrap();
  assert_eq!(store.get_state(&ctx).unwrap(), StateTag::NO_STATE);
  store.set_state(&ctx, StateTag::new("home.home")).unwrap();
  assert_eq!(store.get_data(&ctx).unwrap().get("k"), Some(&json!(1)));
  let _ = std::fs::remove_file(path);
}

#[test]
fn sqlite_state_survives_reopen() {
  let (path, db) = temp_db();
  let ctx = ActorContext::user(55);
  db.state_store().set_state(&ctx, StateTag::new("registration.set_phone_number")).unwrap();
  db.state_store().merge_data(&ctx, DataPatch::new().set("phone_number", "+79991234567")).unwrap();
  drop(db);

  let reopened = Database::open(path.to_str().unwrap()).expect("reopen");
  let store = reopened.state_store();
  assert_eq!(store.get_state(&ctx).unwrap(), StateTag::new("registration.set_phone_number"));
  assert_eq!(store.get_data(&ctx).unwrap().get_str("phone_number"), Some("+79991234567"));
  let _ = std::fs::remove_file(path);
}

#[test]
fn sqlite_contexts_are_isolated() {
  let (path, db) = temp_db();
  let store = db.state_store();
  let user = ActorContext::user(1);
  let admin = ActorContext::new(1, FlowNamespace::ADMIN);
  let other = ActorContext::user(2);
  store.set_state(&user, StateTag::new("home.home")).unwrap();
  store.merge_data(&user, DataPatch::new().set("x", "y")).unwrap();
  assert_eq!(store.get_state(&admin).unwrap(), StateTag::NO_STATE);
  assert_eq!(store.get_state(&other).unwrap(), StateTag::NO_STATE);
  assert!(store.get_data(&admin).unwrap().is_empty());
  let _ = std::fs::remove_file(path);
}

#[test]
fn sqlite_corrupt_data_surfaces_as_storage_error() {
  use diesel::{Connection, RunQueryDsl, SqliteConnection};
  let (path, db) = temp_db();
  let ctx = ActorContext::user(9);
  db.state_store().set_state(&ctx, StateTag::new("home.home")).unwrap();

  let mut raw = SqliteConnection::establish(path.to_str().unwrap()).expect("raw conn");
  diesel::sql_query("UPDATE conversation_states SET data = 'no es json' WHERE actor_id = 9").execute(&mut raw)
                                                                                               .unwrap();
  drop(raw);

  match db.state_store().get_data(&ctx) {
    Err(FsmError::Storage(msg)) => assert!(msg.starts_with("json:"), "{}", msg),
    other => panic!("expected storage error, got {:?}", other),
  }
  let _ = std::fs::remove_file(path);
}
