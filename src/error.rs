//! Error types for the HBNB object store
//!
//! Two layers:
//! - [`HbnbError`]: library-level failures (I/O, JSON, malformed records, lookups)
//! - [`CommandError`]: console-level failures whose `Display` is the exact
//!   message printed to the user

use thiserror::Error;

/// Result type alias using HbnbError
pub type Result<T> = std::result::Result<T, HbnbError>;

/// Unified error type for store operations
#[derive(Debug, Error)]
pub enum HbnbError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A persisted record could not be rebuilt (bad timestamp, missing id, bad field)
    #[error("Format error: {0}")]
    Format(String),

    // -------------------------------------------------------------------------
    // Lookup Errors
    // -------------------------------------------------------------------------
    #[error("Unknown kind: {0}")]
    UnknownKind(String),

    #[error("Instance not found: {0}")]
    NotFound(String),

    #[error("Unknown attribute '{attribute}' for kind {kind}")]
    UnknownAttribute { kind: String, attribute: String },

    #[error("Invalid value for '{attribute}': {reason}")]
    InvalidValue { attribute: String, reason: String },

    // -------------------------------------------------------------------------
    // Console Errors
    // -------------------------------------------------------------------------
    #[error("Line editor error: {0}")]
    Editor(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors reported back to the console user
///
/// These never terminate the session; the dispatcher prints them and moves
/// on to the next line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("** class name missing **")]
    MissingKind,

    #[error("** instance id missing **")]
    MissingId,

    #[error("** attribute name missing **")]
    MissingAttribute,

    #[error("** value missing **")]
    MissingValue,

    #[error("** class doesn't exist **")]
    UnknownKind,

    #[error("** no instance found **")]
    InstanceNotFound,

    #[error("** attribute doesn't exist **")]
    UnknownAttribute,

    #[error("** invalid value for {0} **")]
    InvalidValue(String),

    #[error("*** Unknown syntax: {0}")]
    UnknownSyntax(String),
}

impl CommandError {
    /// Map a store lookup failure onto the message the user sees.
    ///
    /// Returns `None` for failures that are not recoverable at the console
    /// (I/O and serialization), which must propagate instead.
    pub fn from_store(err: &HbnbError) -> Option<Self> {
        match err {
            HbnbError::UnknownKind(_) => Some(CommandError::UnknownKind),
            HbnbError::NotFound(_) => Some(CommandError::InstanceNotFound),
            HbnbError::UnknownAttribute { .. } => Some(CommandError::UnknownAttribute),
            HbnbError::InvalidValue { attribute, .. } => {
                Some(CommandError::InvalidValue(attribute.clone()))
            }
            _ => None,
        }
    }
}
