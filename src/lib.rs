//! # HBNB
//!
//! A single-user object store with:
//! - Six fixed record kinds (User, State, City, Amenity, Place, Review)
//! - An insertion-ordered in-memory table keyed by `<Kind>.<id>`
//! - Whole-table JSON persistence on every mutation, reload at startup
//! - A line-oriented command console
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Console (REPL / pipe)                       │
//! │     tokenize → validate → dispatch → print result/error      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Registry   │◀─────────│ FileStorage │
//!   │ (6 schemas) │          │ (ordered    │
//!   └─────────────┘          │  table)     │
//!                            └──────┬──────┘
//!                                   │ persist / reload
//!                                   ▼
//!                            ┌─────────────┐
//!                            │  file.json  │
//!                            └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod registry;
pub mod storage;
pub mod console;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CommandError, HbnbError, Result};
pub use config::Config;
pub use console::{Console, ConsoleState};
pub use record::{Record, Value};
pub use registry::Kind;
pub use storage::FileStorage;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
