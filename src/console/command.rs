//! Command definitions
//!
//! Represents one parsed console line.

use crate::registry::Kind;

/// A parsed command with every required argument present
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// End the session (`quit` or `EOF`)
    Quit,

    /// Print usage for one command, or all of them
    Help { topic: Option<String> },

    /// Create a record with default fields and print its id
    Create { kind: Kind },

    /// Print a record's display form
    Show { kind: Kind, id: String },

    /// Remove a record
    Destroy { kind: Kind, id: String },

    /// List records, optionally of one kind
    All { kind: Option<Kind> },

    /// Count records, optionally of one kind
    Count { kind: Option<Kind> },

    /// Set one attribute from a raw literal
    Update {
        kind: Kind,
        id: String,
        attribute: String,
        value: String,
    },
}

impl Command {
    /// Whether the command changes the table (and therefore persists)
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Create { .. } | Command::Destroy { .. } | Command::Update { .. }
        )
    }
}

/// Usage lines, in the order `help` prints them
pub const USAGE: &[(&str, &str)] = &[
    ("create", "create <class>  -- create an instance, save it, print its id"),
    ("show", "show <class> <id>  -- print an instance"),
    ("destroy", "destroy <class> <id>  -- delete an instance"),
    ("all", "all [<class>]  -- print all instances, optionally of one class"),
    ("count", "count [<class>]  -- print the number of instances"),
    (
        "update",
        "update <class> <id> <attribute> \"<value>\"  -- set an attribute",
    ),
    ("help", "help [<command>]  -- show this help"),
    ("quit", "quit  -- exit the console (also EOF)"),
];

/// Usage line for a single command
pub fn usage(command: &str) -> Option<&'static str> {
    USAGE
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, line)| *line)
}
