//! Record Module
//!
//! The single record type shared by every kind.
//!
//! ## Lifecycle
//! - Fresh: [`Record::new`] assigns a random UUID and sets both timestamps to now
//! - Rehydrated: [`Record::from_serialized`] parses id and timestamps from the file
//! - Mutated: [`Record::set`] + [`Record::touch`] (the storage engine persists)
//!
//! ## Serialized Form
//! ```text
//! {
//!   "id": "9b2c...",
//!   "created_at": "2026-10-19T08:15:02.123456",
//!   "updated_at": "2026-10-19T08:15:02.123456",
//!   "name": "California",
//!   "__class__": "State"
//! }
//! ```

mod value;

pub use value::{infer_literal, FieldType, Value};

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Duration, NaiveDateTime, SubsecRound, Utc};
use serde_json::Map;
use uuid::Uuid;

use crate::error::{HbnbError, Result};
use crate::registry::Kind;

/// Timestamp layout written to the backing file
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Accepted on read; the fractional part may be omitted
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Key carrying the kind name in the serialized map
pub const KIND_TAG: &str = "__class__";

/// Keys managed by the record itself, never stored in `fields`
pub const RESERVED_KEYS: [&str; 4] = ["id", "created_at", "updated_at", KIND_TAG];

/// A persisted object of one of the registered kinds
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    id: String,
    kind: Kind,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
    fields: BTreeMap<String, Value>,
}

impl Record {
    /// Create a fresh record with no attributes
    pub fn new(kind: Kind) -> Self {
        Self::with_fields(kind, BTreeMap::new())
    }

    /// Create a fresh record carrying `fields`
    pub fn with_fields(kind: Kind, fields: BTreeMap<String, Value>) -> Self {
        let now = now();
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            created_at: now,
            updated_at: now,
            fields,
        }
    }

    /// Rebuild a record from its serialized map
    ///
    /// Fails with [`HbnbError::Format`] when `id` is missing, a timestamp is
    /// present but unparsable, the kind tag disagrees with `kind`, or a field
    /// holds something other than a string, number or list of strings.
    pub fn from_serialized(kind: Kind, map: &Map<String, serde_json::Value>) -> Result<Self> {
        let id = match map.get("id") {
            Some(serde_json::Value::String(id)) if id.is_empty() => {
                return Err(HbnbError::Format("id is empty".to_string()))
            }
            Some(serde_json::Value::String(id)) => id.clone(),
            Some(other) => {
                return Err(HbnbError::Format(format!("id is not a string: {}", other)))
            }
            None => return Err(HbnbError::Format("missing id".to_string())),
        };

        if let Some(tag) = map.get(KIND_TAG) {
            if tag.as_str() != Some(kind.as_str()) {
                return Err(HbnbError::Format(format!(
                    "{} tag {} does not match kind {}",
                    KIND_TAG, tag, kind
                )));
            }
        }

        let created_at = parse_optional_timestamp(map, "created_at")?;
        let updated_at = parse_optional_timestamp(map, "updated_at")?;
        let (created_at, updated_at) = match (created_at, updated_at) {
            (Some(c), Some(u)) => (c, u),
            (Some(c), None) => (c, c),
            (None, Some(u)) => (u, u),
            (None, None) => {
                let now = now();
                (now, now)
            }
        };
        if updated_at < created_at {
            return Err(HbnbError::Format(format!(
                "record {}: updated_at precedes created_at",
                id
            )));
        }

        let mut fields = BTreeMap::new();
        for (name, raw) in map {
            if RESERVED_KEYS.contains(&name.as_str()) {
                continue;
            }
            let value: Value = serde_json::from_value(raw.clone()).map_err(|_| {
                HbnbError::Format(format!("field '{}' has unsupported value {}", name, raw))
            })?;
            fields.insert(name.clone(), normalize(kind, name, value)?);
        }

        Ok(Self {
            id,
            kind,
            created_at,
            updated_at,
            fields,
        })
    }

    /// Serialize to the map stored in the backing file
    pub fn serialize(&self) -> Map<String, serde_json::Value> {
        let mut map = Map::new();
        map.insert("id".to_string(), self.id.clone().into());
        map.insert(
            "created_at".to_string(),
            format_timestamp(&self.created_at).into(),
        );
        map.insert(
            "updated_at".to_string(),
            format_timestamp(&self.updated_at).into(),
        );
        for (name, value) in &self.fields {
            map.insert(name.clone(), value.into());
        }
        map.insert(KIND_TAG.to_string(), self.kind.as_str().into());
        map
    }

    /// Canonical display form: `[<kind>] (<id>) {<attributes>}`
    pub fn describe(&self) -> String {
        self.to_string()
    }

    /// Refresh `updated_at`, keeping it strictly increasing
    pub fn touch(&mut self) {
        let now = now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }

    /// Set an attribute (does not touch timestamps)
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Get an attribute
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Composite storage key `<kind>.<id>`
    pub fn key(&self) -> String {
        composite_key(self.kind, &self.id)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> NaiveDateTime {
        self.updated_at
    }

    pub fn fields(&self) -> &BTreeMap<String, Value> {
        &self.fields
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] ({}) {{'id': ", self.kind, self.id)?;
        value::write_quoted(f, &self.id)?;
        write!(
            f,
            ", 'created_at': '{}', 'updated_at': '{}'",
            format_timestamp(&self.created_at),
            format_timestamp(&self.updated_at)
        )?;
        for (name, value) in &self.fields {
            f.write_str(", ")?;
            value::write_quoted(f, name)?;
            write!(f, ": {}", value)?;
        }
        f.write_str("}")
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Composite storage key for a kind/id pair
pub fn composite_key(kind: Kind, id: &str) -> String {
    format!("{}.{}", kind, id)
}

/// Render a timestamp in the persisted layout
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a persisted timestamp
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_PARSE_FORMAT)
        .map(|ts| ts.trunc_subsecs(6))
        .map_err(|e| HbnbError::Format(format!("bad timestamp '{}': {}", raw, e)))
}

/// Current time at the precision the file can hold
fn now() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(6)
}

fn parse_optional_timestamp(
    map: &Map<String, serde_json::Value>,
    key: &str,
) -> Result<Option<NaiveDateTime>> {
    match map.get(key) {
        None => Ok(None),
        Some(serde_json::Value::String(raw)) => parse_timestamp(raw).map(Some),
        Some(other) => Err(HbnbError::Format(format!(
            "{} is not a timestamp string: {}",
            key, other
        ))),
    }
}

/// Widen integers stored for float attributes; reject other mismatches
fn normalize(kind: Kind, name: &str, value: Value) -> Result<Value> {
    match (kind.field_type(name), value) {
        (Some(FieldType::Float), Value::Integer(i)) => Ok(Value::Float(i as f64)),
        (Some(ty), value) if !ty.accepts(&value) => Err(HbnbError::Format(format!(
            "field '{}' of {} should be {:?}, found {}",
            name, kind, ty, value
        ))),
        (_, value) => Ok(value),
    }
}
