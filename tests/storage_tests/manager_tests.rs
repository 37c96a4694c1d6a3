//! Tests for FileStorage
//!
//! These tests verify:
//! - Reload of a missing, empty, or populated backing file
//! - Lookup, insertion and deletion by kind/id
//! - Whole-table persistence and byte-stable rewrites
//! - Creation order surviving a restart
//! - Skipping of unreadable entries during reload

use std::fs;
use std::path::PathBuf;

use hbnb::registry::Kind;
use hbnb::storage::FileStorage;
use hbnb::{HbnbError, Record, Value};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_file() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("file.json");
    (temp_dir, path)
}

fn read_json(path: &PathBuf) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

// =============================================================================
// Open / Reload Tests
// =============================================================================

#[test]
fn test_open_missing_file_is_empty() {
    let (_temp, path) = setup_temp_file();

    let (storage, report) = FileStorage::open(&path).unwrap();

    assert!(storage.is_empty());
    assert!(!report.file_found);
    assert_eq!(report.records_loaded, 0);
    assert!(!path.exists());
}

#[test]
fn test_persist_writes_to_configured_path() {
    let (_temp, path) = setup_temp_file();
    let mut storage = FileStorage::new(&path);

    storage.create(Kind::Amenity).unwrap();

    assert_eq!(storage.path(), path.as_path());
    assert!(storage.path().exists());
}

#[test]
fn test_empty_table_persists_as_empty_object() {
    let (_temp, path) = setup_temp_file();
    let storage = FileStorage::new(&path);

    storage.persist().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
}

#[test]
fn test_reload_empty_object() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, "{}").unwrap();

    let (storage, report) = FileStorage::open(&path).unwrap();

    assert!(storage.is_empty());
    assert!(report.file_found);
}

#[test]
fn test_reload_rejects_truncated_file() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, r#"{"State.1": {"id": "1""#).unwrap();

    let result = FileStorage::open(&path);

    assert!(matches!(result, Err(HbnbError::Serialization(_))));
}

#[test]
fn test_reload_rejects_non_object() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, "[]").unwrap();

    let result = FileStorage::open(&path);

    assert!(matches!(result, Err(HbnbError::Format(_))));
}

// =============================================================================
// Table Operation Tests
// =============================================================================

#[test]
fn test_insert_and_get() {
    let (_temp, path) = setup_temp_file();
    let mut storage = FileStorage::new(&path);
    let record = Record::new(Kind::User);
    let id = record.id().to_string();

    storage.insert(record);

    assert_eq!(storage.get(Kind::User, &id).unwrap().id(), id);
    // Same id under another kind is a different key
    assert!(matches!(
        storage.get(Kind::City, &id),
        Err(HbnbError::NotFound(key)) if key == format!("City.{}", id)
    ));
}

#[test]
fn test_insert_overwrites_silently() {
    let (_temp, path) = setup_temp_file();
    let mut storage = FileStorage::new(&path);
    let mut record = Record::new(Kind::State);
    storage.insert(record.clone());

    record.set("name", Value::String("Utah".into()));
    storage.insert(record.clone());

    assert_eq!(storage.len(), 1);
    assert_eq!(
        storage.get(Kind::State, record.id()).unwrap().get("name"),
        Some(&Value::String("Utah".into()))
    );
}

#[test]
fn test_delete_does_not_persist() {
    let (_temp, path) = setup_temp_file();
    let mut storage = FileStorage::new(&path);
    let id = storage.create(Kind::Amenity).unwrap().id().to_string();

    storage.delete(Kind::Amenity, &id).unwrap();

    assert!(storage.get(Kind::Amenity, &id).is_err());
    // File still has the record until persist() is called
    assert!(read_json(&path).get(format!("Amenity.{}", id)).is_some());

    storage.persist().unwrap();
    assert!(read_json(&path).get(format!("Amenity.{}", id)).is_none());
}

#[test]
fn test_delete_missing() {
    let (_temp, path) = setup_temp_file();
    let mut storage = FileStorage::new(&path);

    assert!(matches!(
        storage.delete(Kind::Amenity, "nope"),
        Err(HbnbError::NotFound(_))
    ));
}

#[test]
fn test_all_with_filter() {
    let (_temp, path) = setup_temp_file();
    let mut storage = FileStorage::new(&path);
    let c1 = storage.create(Kind::City).unwrap().id().to_string();
    storage.create(Kind::State).unwrap();
    let c2 = storage.create(Kind::City).unwrap().id().to_string();

    let all = storage.all(None);
    let cities: Vec<&str> = storage.all(Some(Kind::City)).into_iter().map(Record::id).collect();

    assert_eq!(all.len(), 3);
    assert_eq!(cities, vec![c1.as_str(), c2.as_str()]);
    assert_eq!(storage.count(Some(Kind::City)), 2);
    assert_eq!(storage.count(Some(Kind::Review)), 0);
    assert_eq!(storage.count(None), 3);
}

// =============================================================================
// Mutation Tests
// =============================================================================

#[test]
fn test_create_persists_immediately() {
    let (_temp, path) = setup_temp_file();
    let mut storage = FileStorage::new(&path);

    let id = storage.create(Kind::State).unwrap().id().to_string();

    let json = read_json(&path);
    let entry = &json[format!("State.{}", id)];
    assert_eq!(entry["id"], serde_json::json!(id));
    assert_eq!(entry["__class__"], serde_json::json!("State"));
    assert_eq!(entry["name"], serde_json::json!(""));
}

#[test]
fn test_update_coerces_declared_type() {
    let (_temp, path) = setup_temp_file();
    let mut storage = FileStorage::new(&path);
    let id = storage.create(Kind::Place).unwrap().id().to_string();
    let before = storage.get(Kind::Place, &id).unwrap().updated_at();

    storage.update(Kind::Place, &id, "number_rooms", "4").unwrap();
    storage.update(Kind::Place, &id, "latitude", "37").unwrap();
    storage.update(Kind::Place, &id, "name", "123").unwrap();

    let record = storage.get(Kind::Place, &id).unwrap();
    assert_eq!(record.get("number_rooms"), Some(&Value::Integer(4)));
    assert_eq!(record.get("latitude"), Some(&Value::Float(37.0)));
    assert_eq!(record.get("name"), Some(&Value::String("123".into())));
    assert!(record.updated_at() > before);

    let json = read_json(&path);
    assert_eq!(json[format!("Place.{}", id)]["number_rooms"], serde_json::json!(4));
}

#[test]
fn test_update_unknown_attribute_leaves_record_untouched() {
    let (_temp, path) = setup_temp_file();
    let mut storage = FileStorage::new(&path);
    let id = storage.create(Kind::User).unwrap().id().to_string();
    let before = storage.get(Kind::User, &id).unwrap().clone();

    let result = storage.update(Kind::User, &id, "nickname", "bo");

    assert!(matches!(result, Err(HbnbError::UnknownAttribute { .. })));
    assert_eq!(storage.get(Kind::User, &id).unwrap(), &before);
}

#[test]
fn test_update_invalid_value_leaves_record_untouched() {
    let (_temp, path) = setup_temp_file();
    let mut storage = FileStorage::new(&path);
    let id = storage.create(Kind::Place).unwrap().id().to_string();
    let before = storage.get(Kind::Place, &id).unwrap().clone();

    let result = storage.update(Kind::Place, &id, "max_guest", "several");

    assert!(matches!(
        result,
        Err(HbnbError::InvalidValue { attribute, .. }) if attribute == "max_guest"
    ));
    assert_eq!(storage.get(Kind::Place, &id).unwrap(), &before);
}

#[test]
fn test_update_missing_instance() {
    let (_temp, path) = setup_temp_file();
    let mut storage = FileStorage::new(&path);

    assert!(matches!(
        storage.update(Kind::City, "ghost", "name", "x"),
        Err(HbnbError::NotFound(_))
    ));
    assert!(!path.exists());
}

#[test]
fn test_save_refreshes_updated_at() {
    let (_temp, path) = setup_temp_file();
    let mut storage = FileStorage::new(&path);
    let id = storage.create(Kind::Review).unwrap().id().to_string();
    let before = storage.get(Kind::Review, &id).unwrap().updated_at();

    storage.save(Kind::Review, &id).unwrap();

    let record = storage.get(Kind::Review, &id).unwrap();
    assert!(record.updated_at() > before);
    assert!(record.created_at() < record.updated_at());
}

#[test]
fn test_destroy_persists() {
    let (_temp, path) = setup_temp_file();
    let mut storage = FileStorage::new(&path);
    let id = storage.create(Kind::City).unwrap().id().to_string();

    storage.destroy(Kind::City, &id).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_persist_twice_is_byte_identical() {
    let (_temp, path) = setup_temp_file();
    let mut storage = FileStorage::new(&path);
    for kind in Kind::ALL {
        storage.create(kind).unwrap();
    }

    storage.persist().unwrap();
    let first = fs::read(&path).unwrap();
    storage.persist().unwrap();
    let second = fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_restart_preserves_records_and_order() {
    let (_temp, path) = setup_temp_file();
    let mut originals = Vec::new();
    {
        let mut storage = FileStorage::new(&path);
        for kind in [Kind::User, Kind::Place, Kind::City, Kind::User, Kind::Review] {
            let id = storage.create(kind).unwrap().id().to_string();
            storage.update(kind, &id, "user_id", "u-1").ok();
            originals.push(storage.get(kind, &id).unwrap().clone());
        }
    }

    let (storage, report) = FileStorage::open(&path).unwrap();

    assert_eq!(report.records_loaded, 5);
    assert!(report.skipped.is_empty());
    let restored: Vec<Record> = storage.all(None).into_iter().cloned().collect();
    assert_eq!(restored, originals);
}

#[test]
fn test_reload_then_persist_round_trips_file() {
    let (_temp, path) = setup_temp_file();
    {
        let mut storage = FileStorage::new(&path);
        let id = storage.create(Kind::Place).unwrap().id().to_string();
        storage.update(Kind::Place, &id, "amenity_ids", r#"["a1", "a2"]"#).unwrap();
        storage.update(Kind::Place, &id, "longitude", "-122.5").unwrap();
        storage.create(Kind::State).unwrap();
    }
    let written = fs::read_to_string(&path).unwrap();

    let (storage, _) = FileStorage::open(&path).unwrap();
    storage.persist().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), written);
}

#[test]
fn test_reload_skips_unreadable_entries() {
    let (_temp, path) = setup_temp_file();
    fs::write(
        &path,
        r#"{
            "State.good": {"id": "good", "created_at": "2024-01-01T00:00:00.000000",
                           "updated_at": "2024-01-01T00:00:00.000000", "name": "Ohio",
                           "__class__": "State"},
            "State.bad": {"id": "bad", "created_at": "not a time", "__class__": "State"},
            "Spaceship.x": {"id": "x", "__class__": "Spaceship"},
            "City.noid": {"__class__": "City"},
            "City.scalar": 42
        }"#,
    )
    .unwrap();

    let (storage, report) = FileStorage::open(&path).unwrap();

    assert_eq!(report.records_loaded, 1);
    let skipped: Vec<&str> = report.skipped.iter().map(|s| s.key.as_str()).collect();
    assert_eq!(skipped, vec!["State.bad", "Spaceship.x", "City.noid", "City.scalar"]);
    assert_eq!(
        storage.get(Kind::State, "good").unwrap().get("name"),
        Some(&Value::String("Ohio".into()))
    );
}

#[test]
fn test_reload_uses_key_prefix_without_kind_tag() {
    let (_temp, path) = setup_temp_file();
    fs::write(&path, r#"{"Amenity.a1": {"id": "a1", "name": "Pool"}}"#).unwrap();

    let (storage, report) = FileStorage::open(&path).unwrap();

    assert_eq!(report.records_loaded, 1);
    assert_eq!(storage.get(Kind::Amenity, "a1").unwrap().kind(), Kind::Amenity);
}

#[test]
fn test_reload_unreadable_path_is_error() {
    let temp_dir = TempDir::new().unwrap();

    // A directory cannot be read as a file
    let result = FileStorage::open(temp_dir.path());

    assert!(matches!(result, Err(HbnbError::Io(_))));
}
