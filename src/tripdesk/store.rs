//! The record store: the in-memory authoritative collection with
//! disk-backed persistence.
//!
//! The store owns a `Vec` of raw record mappings, assigns ids, and persists
//! the whole collection through the codec after every mutation. On open it
//! re-validates everything the lenient codec produced through the strict
//! model layer, so one corrupt record never invalidates the rest of the
//! file.
//!
//! Only [`RecordStore::create_record`] with an unrecognized kind (or an
//! actual disk-write failure) raises; lookups report absence through
//! sentinel returns.

use crate::codec::{self, RawRecord};
use crate::error::Result;
use crate::model::{Record, RecordType};
use log::{info, warn};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Default file name for the record collection.
pub const RECORDS_FILE: &str = "records.json";

pub struct RecordStore {
    path: PathBuf,
    records: Vec<RawRecord>,
}

impl RecordStore {
    /// Open (or initialize) the store backed by `path`.
    ///
    /// Creates the parent directory and an empty-array file when missing.
    /// Records that fail model validation are dropped with a diagnostic;
    /// a malformed file degrades to an empty collection. Startup only fails
    /// on filesystem errors while creating the backing file.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(dir) = path.parent() {
            if !dir.exists() {
                info!("creating data directory {}", dir.display());
                fs::create_dir_all(dir)?;
            }
        }
        if !path.exists() {
            info!("creating records file {}", path.display());
            fs::write(&path, "[]")?;
        }

        let mut records = Vec::new();
        for raw in codec::load(&path) {
            // Re-serializing the validated record normalizes field order
            // and value types.
            match Record::from_map(raw).and_then(|record| record.to_map()) {
                Ok(map) => records.push(map),
                Err(e) => warn!("dropping record from {}: {}", path.display(), e),
            }
        }

        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a record of the given kind, assign it the next id, and
    /// persist.
    ///
    /// `data` is overlaid onto the variant's declared fields; keys outside
    /// that set are ignored, and `id`/`type` cannot be overridden by the
    /// payload. Fails with `UnknownType` when `kind` is not one of
    /// client/airline/flight.
    pub fn create_record(&mut self, kind: &str, data: RawRecord) -> Result<Record> {
        let kind: RecordType = kind.parse()?;

        let mut map = Record::new(kind, self.next_id()).to_map()?;
        for (key, value) in data {
            if key == "id" || key == "type" {
                continue;
            }
            if let Some(slot) = map.get_mut(&key) {
                *slot = value;
            }
        }
        codec::coerce_id_fields(&mut map);

        let record = Record::from_map(map)?;
        self.records.push(record.to_map()?);
        self.save()?;
        Ok(record)
    }

    /// Remove every record with the given id and persist, whether or not
    /// anything matched.
    pub fn delete_record(&mut self, id: i64) -> Result<()> {
        self.records.retain(|record| stored_id(record) != Some(id));
        self.save()
    }

    /// Shallow-merge `data` into the record with the given id and persist.
    ///
    /// The stored `type` (and `id`) survive regardless of what the payload
    /// carries. Returns `Ok(false)` without touching the file when no record
    /// has that id.
    pub fn update_record(&mut self, id: i64, mut data: RawRecord) -> Result<bool> {
        let Some(pos) = self
            .records
            .iter()
            .position(|record| stored_id(record) == Some(id))
        else {
            return Ok(false);
        };

        codec::coerce_id_fields(&mut data);
        let record = &mut self.records[pos];
        for (key, value) in data {
            if key == "id" || key == "type" {
                continue;
            }
            if let Some(slot) = record.get_mut(&key) {
                *slot = value;
            }
        }

        self.save()?;
        Ok(true)
    }

    /// Look up a record by id given as raw (form) input. Non-numeric input
    /// is simply "not found".
    pub fn search_record(&self, raw_id: &str) -> Option<&RawRecord> {
        let id: i64 = raw_id.trim().parse().ok()?;
        self.records
            .iter()
            .find(|record| stored_id(record) == Some(id))
    }

    /// All records, or only those of the given kind.
    pub fn get_all_records(&self, filter: Option<RecordType>) -> Vec<&RawRecord> {
        self.records
            .iter()
            .filter(|record| match filter {
                Some(kind) => {
                    record.get("type").and_then(Value::as_str) == Some(kind.as_str())
                }
                None => true,
            })
            .collect()
    }

    /// One greater than the current maximum id, or 1 for an empty
    /// collection. A linear max-scan is plenty at this scale.
    fn next_id(&self) -> i64 {
        self.records
            .iter()
            .filter_map(stored_id)
            .max()
            .map_or(1, |max| max + 1)
    }

    fn save(&mut self) -> Result<()> {
        codec::save(&mut self.records, &self.path)
    }
}

fn stored_id(record: &RawRecord) -> Option<i64> {
    match record.get("id")? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TripdeskError;
    use serde_json::json;
    use tempfile::TempDir;

    fn open_store(temp: &TempDir) -> RecordStore {
        RecordStore::open(temp.path().join("data").join(RECORDS_FILE)).unwrap()
    }

    fn fields(value: Value) -> RawRecord {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn open_creates_directory_and_file() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);
        assert!(store.path().exists());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "[]");
    }

    #[test]
    fn ids_are_assigned_sequentially_from_one() {
        let temp = TempDir::new().unwrap();
        let mut store = open_store(&temp);

        let a = store.create_record("client", RawRecord::new()).unwrap();
        let b = store.create_record("airline", RawRecord::new()).unwrap();
        let c = store.create_record("flight", RawRecord::new()).unwrap();
        assert_eq!((a.id(), b.id(), c.id()), (1, 2, 3));
    }

    #[test]
    fn deleting_a_non_max_id_does_not_free_it() {
        let temp = TempDir::new().unwrap();
        let mut store = open_store(&temp);

        for _ in 0..3 {
            store.create_record("airline", RawRecord::new()).unwrap();
        }
        store.delete_record(1).unwrap();

        let next = store.create_record("airline", RawRecord::new()).unwrap();
        assert_eq!(next.id(), 4);
    }

    #[test]
    fn create_rejects_unknown_kind() {
        let temp = TempDir::new().unwrap();
        let mut store = open_store(&temp);
        let err = store.create_record("hotel", RawRecord::new()).unwrap_err();
        assert!(matches!(err, TripdeskError::UnknownType(kind) if kind == "hotel"));
    }

    #[test]
    fn create_and_search_client() {
        let temp = TempDir::new().unwrap();
        let mut store = open_store(&temp);

        let record = store
            .create_record(
                "client",
                fields(json!({
                    "name": "John Doe",
                    "address_line1": "123 Main St",
                    "city": "New York",
                    "state": "NY",
                    "zip_code": "10001",
                    "country": "USA",
                    "phone_number": "555-0123"
                })),
            )
            .unwrap();
        assert_eq!(record.id(), 1);

        let found = store.search_record("1").unwrap();
        assert_eq!(found["type"], json!("client"));
        assert_eq!(found["name"], json!("John Doe"));
        assert_eq!(found["address_line1"], json!("123 Main St"));
        assert_eq!(found["city"], json!("New York"));
        assert_eq!(found["state"], json!("NY"));
        assert_eq!(found["zip_code"], json!("10001"));
        assert_eq!(found["country"], json!("USA"));
        assert_eq!(found["phone_number"], json!("555-0123"));

        assert!(store.search_record("2").is_none());
    }

    #[test]
    fn search_with_non_numeric_id_is_not_found() {
        let temp = TempDir::new().unwrap();
        let mut store = open_store(&temp);
        store.create_record("airline", RawRecord::new()).unwrap();

        assert!(store.search_record("first").is_none());
        assert!(store.search_record("").is_none());
        assert!(store.search_record(" 1 ").is_some());
    }

    #[test]
    fn list_filters_by_kind() {
        let temp = TempDir::new().unwrap();
        let mut store = open_store(&temp);

        store
            .create_record("client", fields(json!({"name": "John Doe"})))
            .unwrap();
        let airline = store
            .create_record("airline", fields(json!({"company_name": "Test Airlines"})))
            .unwrap();
        store.create_record("flight", RawRecord::new()).unwrap();

        let airlines = store.get_all_records(Some(RecordType::Airline));
        assert_eq!(airlines.len(), 1);
        assert_eq!(airlines[0]["id"], json!(airline.id()));
        assert_eq!(airlines[0]["company_name"], json!("Test Airlines"));

        assert_eq!(store.get_all_records(None).len(), 3);
    }

    #[test]
    fn flight_gets_a_date_and_updates_in_place() {
        let temp = TempDir::new().unwrap();
        let mut store = open_store(&temp);

        let flight = store
            .create_record(
                "flight",
                fields(json!({
                    "client_id": 1,
                    "airline_id": 1,
                    "start_city": "New York",
                    "end_city": "Los Angeles"
                })),
            )
            .unwrap();
        let id = flight.id();

        let stored = store.search_record(&id.to_string()).unwrap();
        assert!(stored["date"].as_str().is_some_and(|d| !d.is_empty()));

        let updated = store
            .update_record(id, fields(json!({"end_city": "Dubai"})))
            .unwrap();
        assert!(updated);

        let stored = store.search_record(&id.to_string()).unwrap();
        assert_eq!(stored["end_city"], json!("Dubai"));
        assert_eq!(stored["type"], json!("flight"));
    }

    #[test]
    fn update_never_changes_type() {
        let temp = TempDir::new().unwrap();
        let mut store = open_store(&temp);

        let record = store
            .create_record("airline", fields(json!({"company_name": "A"})))
            .unwrap();

        let updated = store
            .update_record(
                record.id(),
                fields(json!({"type": "client", "company_name": "B"})),
            )
            .unwrap();
        assert!(updated);

        let stored = store.search_record(&record.id().to_string()).unwrap();
        assert_eq!(stored["type"], json!("airline"));
        assert_eq!(stored["company_name"], json!("B"));
    }

    #[test]
    fn update_missing_id_leaves_everything_untouched() {
        let temp = TempDir::new().unwrap();
        let mut store = open_store(&temp);
        store
            .create_record("airline", fields(json!({"company_name": "A"})))
            .unwrap();

        let before = fs::read_to_string(store.path()).unwrap();
        let updated = store
            .update_record(99, fields(json!({"company_name": "B"})))
            .unwrap();

        assert!(!updated);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
        assert_eq!(store.get_all_records(None).len(), 1);
    }

    #[test]
    fn delete_removes_matching_record() {
        let temp = TempDir::new().unwrap();
        let mut store = open_store(&temp);

        let record = store.create_record("client", RawRecord::new()).unwrap();
        store.delete_record(record.id()).unwrap();

        assert!(store.search_record(&record.id().to_string()).is_none());
        assert!(store.get_all_records(None).is_empty());
    }

    #[test]
    fn delete_with_no_match_still_persists() {
        let temp = TempDir::new().unwrap();
        let mut store = open_store(&temp);

        store.delete_record(999).unwrap();
        assert_eq!(
            fs::read_to_string(store.path()).unwrap().trim(),
            "[]"
        );
    }

    #[test]
    fn create_ignores_unknown_fields_and_protects_id() {
        let temp = TempDir::new().unwrap();
        let mut store = open_store(&temp);

        let record = store
            .create_record(
                "airline",
                fields(json!({
                    "id": 40,
                    "type": "client",
                    "company_name": "Test Airlines",
                    "fleet_size": 42
                })),
            )
            .unwrap();

        assert_eq!(record.id(), 1);
        assert_eq!(record.record_type(), RecordType::Airline);
        let stored = store.search_record("1").unwrap();
        assert!(!stored.contains_key("fleet_size"));
    }

    #[test]
    fn create_coerces_string_reference_ids() {
        let temp = TempDir::new().unwrap();
        let mut store = open_store(&temp);

        let record = store
            .create_record(
                "flight",
                fields(json!({"client_id": "7", "airline_id": "3"})),
            )
            .unwrap();

        let stored = store.search_record(&record.id().to_string()).unwrap();
        assert_eq!(stored["client_id"], json!(7));
        assert_eq!(stored["airline_id"], json!(3));
    }

    #[test]
    fn open_drops_only_the_invalid_record() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(RECORDS_FILE);
        fs::write(
            &path,
            json!([
                {"id": 1, "type": "airline", "company_name": "Keep Me"},
                {"id": 2, "type": "client", "name": "Missing the rest"},
                {"id": 3, "type": "spaceship"}
            ])
            .to_string(),
        )
        .unwrap();

        let store = RecordStore::open(&path).unwrap();
        let all = store.get_all_records(None);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0]["company_name"], json!("Keep Me"));
    }

    #[test]
    fn open_on_corrupted_file_starts_empty() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(RECORDS_FILE);
        fs::write(&path, "{{ not json").unwrap();

        let store = RecordStore::open(&path).unwrap();
        assert!(store.get_all_records(None).is_empty());
    }
}
