//! Storage Module
//!
//! The storage engine: an insertion-ordered object table mirrored to a
//! single JSON file.
//!
//! ## Responsibilities
//! - Own every live record, keyed by `<Kind>.<id>`
//! - Serialize the whole table on every mutating command
//! - Rehydrate records through the type registry at startup
//!
//! ## File Format
//! ```text
//! {
//!   "State.9b2c...": { "id": "9b2c...", "created_at": "...", "updated_at": "...",
//!                      "name": "California", "__class__": "State" },
//!   "City.41fe...":  { ... }
//! }
//! ```
//! Keys appear in creation order. An empty table is written as `{}`.

mod table;
mod manager;

pub use table::ObjectTable;
pub use manager::{FileStorage, ReloadReport, SkippedEntry};
