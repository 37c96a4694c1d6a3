//! Object table implementation
//!
//! Keyed map that remembers insertion order.

use std::collections::HashMap;

use crate::record::Record;
use crate::registry::Kind;

/// In-memory table of live records keyed by `<kind>.<id>`
#[derive(Debug, Default)]
pub struct ObjectTable {
    /// Composite keys in insertion order
    order: Vec<String>,

    /// Records by composite key
    records: HashMap<String, Record>,
}

impl ObjectTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert under the record's composite key.
    ///
    /// An existing entry is replaced in place and keeps its position.
    /// Returns the previous record, if any.
    pub fn insert(&mut self, record: Record) -> Option<Record> {
        let key = record.key();
        let previous = self.records.insert(key.clone(), record);
        if previous.is_none() {
            self.order.push(key);
        }
        previous
    }

    pub fn get(&self, key: &str) -> Option<&Record> {
        self.records.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Record> {
        self.records.get_mut(key)
    }

    /// Remove by composite key
    pub fn remove(&mut self, key: &str) -> Option<Record> {
        let removed = self.records.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    /// Records in insertion order, optionally restricted to one kind
    pub fn iter(&self, kind: Option<Kind>) -> impl Iterator<Item = &Record> + '_ {
        self.order
            .iter()
            .filter_map(move |key| self.records.get(key))
            .filter(move |record| kind.map_or(true, |k| record.kind() == k))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
