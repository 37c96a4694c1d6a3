//! Storage Manager
//!
//! Owns the object table and its JSON backing file.
//!
//! ## Responsibilities
//! - Rehydrate records from the backing file on startup
//! - Lookup, insertion and removal by kind/id
//! - Rewrite the whole backing file after every mutation
//!
//! ## Durability
//! `persist()` truncates and rewrites the file in one `fs::write`. A crash
//! between truncation and the end of the write leaves a short or empty file;
//! the next `reload()` reports that as a serialization error instead of
//! guessing at the lost contents.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Map;
use tracing::{debug, warn};

use crate::error::{HbnbError, Result};
use crate::record::{composite_key, Record, KIND_TAG};
use crate::registry::{self, Kind};

use super::ObjectTable;

/// An entry of the backing file that could not be rehydrated
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedEntry {
    /// Key as found in the file
    pub key: String,

    /// Why it was skipped
    pub reason: String,
}

/// Result of a reload
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReloadReport {
    /// Number of records inserted into the table
    pub records_loaded: usize,

    /// Entries left out of the table
    pub skipped: Vec<SkippedEntry>,

    /// Whether a backing file existed at all
    pub file_found: bool,
}

/// The storage engine: an in-memory table mirrored to a single JSON file
#[derive(Debug)]
pub struct FileStorage {
    /// Backing file, rewritten in full by `persist()`
    path: PathBuf,

    /// Live records in creation order
    table: ObjectTable,
}

impl FileStorage {
    /// Create an empty engine over `path` without touching the filesystem
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: ObjectTable::new(),
        }
    }

    /// Create an engine over `path` and load whatever the file holds
    pub fn open(path: impl Into<PathBuf>) -> Result<(Self, ReloadReport)> {
        let mut storage = Self::new(path);
        let report = storage.reload()?;
        Ok((storage, report))
    }

    // =========================================================================
    // Table access
    // =========================================================================

    /// Every record (or every record of `kind`) in creation order
    pub fn all(&self, kind: Option<Kind>) -> Vec<&Record> {
        self.table.iter(kind).collect()
    }

    /// Number of records (or records of `kind`)
    pub fn count(&self, kind: Option<Kind>) -> usize {
        match kind {
            None => self.table.len(),
            Some(_) => self.table.iter(kind).count(),
        }
    }

    /// Look up a record by kind and id
    pub fn get(&self, kind: Kind, id: &str) -> Result<&Record> {
        let key = composite_key(kind, id);
        self.table.get(&key).ok_or(HbnbError::NotFound(key))
    }

    /// Add a record, silently replacing any record under the same key
    pub fn insert(&mut self, record: Record) {
        if let Some(previous) = self.table.insert(record) {
            debug!(key = %previous.key(), "replaced existing record");
        }
    }

    /// Remove a record. The caller is responsible for calling `persist()`.
    pub fn delete(&mut self, kind: Kind, id: &str) -> Result<Record> {
        let key = composite_key(kind, id);
        self.table.remove(&key).ok_or(HbnbError::NotFound(key))
    }

    // =========================================================================
    // Mutating operations (persist on success)
    // =========================================================================

    /// Construct a record of `kind` with its defaults, insert it and persist
    pub fn create(&mut self, kind: Kind) -> Result<&Record> {
        let record = registry::construct(kind.as_str())?;
        let key = record.key();
        self.table.insert(record);
        self.persist()?;
        self.table.get(&key).ok_or(HbnbError::NotFound(key))
    }

    /// Set `attribute` on a record from a raw console literal and persist.
    ///
    /// The attribute must be declared in the kind's schema; the literal is
    /// coerced to the declared type. Nothing changes if either check fails.
    pub fn update(&mut self, kind: Kind, id: &str, attribute: &str, raw: &str) -> Result<()> {
        let key = composite_key(kind, id);
        if self.table.get(&key).is_none() {
            return Err(HbnbError::NotFound(key));
        }

        let ty = registry::field_type(kind, attribute)?;
        let value = ty.coerce(raw).map_err(|reason| HbnbError::InvalidValue {
            attribute: attribute.to_string(),
            reason,
        })?;

        if let Some(record) = self.table.get_mut(&key) {
            record.set(attribute, value);
            record.touch();
        }
        self.persist()
    }

    /// Refresh a record's `updated_at` and persist the table
    pub fn save(&mut self, kind: Kind, id: &str) -> Result<()> {
        let key = composite_key(kind, id);
        match self.table.get_mut(&key) {
            Some(record) => record.touch(),
            None => return Err(HbnbError::NotFound(key)),
        }
        self.persist()
    }

    /// Remove a record and persist the table
    pub fn destroy(&mut self, kind: Kind, id: &str) -> Result<Record> {
        let removed = self.delete(kind, id)?;
        self.persist()?;
        Ok(removed)
    }

    // =========================================================================
    // File boundary
    // =========================================================================

    /// Overwrite the backing file with every record in the table
    pub fn persist(&self) -> Result<()> {
        let mut objects = Map::new();
        for record in self.table.iter(None) {
            objects.insert(record.key(), serde_json::Value::Object(record.serialize()));
        }

        let json = serde_json::to_string(&serde_json::Value::Object(objects))?;
        fs::write(&self.path, json)?;

        debug!(path = %self.path.display(), records = self.table.len(), "persisted table");
        Ok(())
    }

    /// Load every record from the backing file into the table
    ///
    /// A missing file leaves the table untouched. Entries naming an unknown
    /// kind or failing to rehydrate are skipped and listed in the report.
    pub fn reload(&mut self) -> Result<ReloadReport> {
        let mut report = ReloadReport::default();

        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no backing file, starting empty");
                return Ok(report);
            }
            Err(e) => return Err(e.into()),
        };
        report.file_found = true;

        let parsed: serde_json::Value = serde_json::from_str(&contents)?;
        let objects = match parsed {
            serde_json::Value::Object(objects) => objects,
            other => {
                return Err(HbnbError::Format(format!(
                    "{} does not hold a JSON object (found {})",
                    self.path.display(),
                    json_type_name(&other)
                )))
            }
        };

        for (key, entry) in objects {
            match Self::rehydrate(&key, &entry) {
                Ok(record) => {
                    if record.key() != key {
                        warn!(file_key = %key, key = %record.key(), "key does not match record, re-keyed");
                    }
                    self.table.insert(record);
                    report.records_loaded += 1;
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "skipping unreadable entry");
                    report.skipped.push(SkippedEntry {
                        key,
                        reason: e.to_string(),
                    });
                }
            }
        }

        debug!(
            path = %self.path.display(),
            loaded = report.records_loaded,
            skipped = report.skipped.len(),
            "reloaded table"
        );
        Ok(report)
    }

    /// Rebuild one file entry, resolving its kind through the registry
    fn rehydrate(key: &str, entry: &serde_json::Value) -> Result<Record> {
        let map = entry.as_object().ok_or_else(|| {
            HbnbError::Format(format!("expected an object, found {}", json_type_name(entry)))
        })?;

        // Older files may lack the tag; fall back to the key prefix
        let kind_name = match map.get(KIND_TAG) {
            Some(serde_json::Value::String(name)) => name.as_str(),
            Some(other) => {
                return Err(HbnbError::Format(format!("{} is not a string: {}", KIND_TAG, other)))
            }
            None => key.split('.').next().unwrap_or_default(),
        };

        let kind: Kind = kind_name.parse()?;
        Record::from_serialized(kind, map)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
