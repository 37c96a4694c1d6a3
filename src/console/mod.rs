//! Console Module
//!
//! The command dispatcher that sits between the user and the storage engine.
//!
//! ## Responsibilities
//! - Tokenize and validate each line (see [`parse`])
//! - Resolve class, id and attribute arguments against the registry and storage
//! - Execute create/show/destroy/all/count/update, persisting after mutations
//! - Print results and user-facing errors to the output stream
//!
//! ## State Machine
//! ```text
//!   ┌─────────┐  any line except quit/EOF   ┌─────────┐
//!   │ Running │ ──────────────────────────▶ │ Running │
//!   └────┬────┘                             └─────────┘
//!        │ quit / EOF / end of input
//!        ▼
//!   ┌─────────┐
//!   │ Stopped │
//!   └─────────┘
//! ```
//!
//! User errors ([`CommandError`]) are printed and never end the session.
//! Storage I/O failures are returned to the caller, which ends the run.

mod command;
mod parse;
mod repl;

pub use command::{usage, Command, USAGE};
pub use parse::{parse_line, tokenize};
pub use repl::{run_interactive, run_pipe};

use std::io::{BufRead, Write};

use tracing::debug;

use crate::error::{CommandError, Result};
use crate::record::Record;
use crate::storage::FileStorage;

/// Dispatcher state after a line has been processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleState {
    Running,
    Stopped,
}

/// Line-oriented command dispatcher over a storage engine
pub struct Console {
    storage: FileStorage,
}

impl Console {
    /// Create a dispatcher that owns `storage` for the session
    pub fn new(storage: FileStorage) -> Self {
        Self { storage }
    }

    /// Process one line, writing any output to `out`
    ///
    /// Errors are reserved for failures that must end the session
    /// (storage I/O, unwritable output).
    pub fn execute_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<ConsoleState> {
        let command = match parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(ConsoleState::Running),
            Err(e) => {
                writeln!(out, "{}", e)?;
                return Ok(ConsoleState::Running);
            }
        };

        debug!(?command, mutating = command.is_mutating(), "dispatching");
        match self.execute(command, out) {
            Ok(state) => Ok(state),
            Err(e) => match CommandError::from_store(&e) {
                Some(user_error) => {
                    writeln!(out, "{}", user_error)?;
                    Ok(ConsoleState::Running)
                }
                None => Err(e),
            },
        }
    }

    /// Feed every line of `input` through the dispatcher until quit or end of input
    ///
    /// Bytes that are not UTF-8 are replaced rather than ending the session;
    /// the damaged line is then reported like any other bad input.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, out: &mut W) -> Result<()> {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);
            if self.execute_line(line, out)? == ConsoleState::Stopped {
                break;
            }
            out.flush()?;
        }
        out.flush()?;
        Ok(())
    }

    /// Execute a parsed command
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<ConsoleState> {
        match command {
            Command::Quit => return Ok(ConsoleState::Stopped),
            Command::Help { topic } => self.help(topic.as_deref(), out)?,
            Command::Create { kind } => {
                let record = self.storage.create(kind)?;
                writeln!(out, "{}", record.id())?;
            }
            Command::Show { kind, id } => {
                let record = self.storage.get(kind, &id)?;
                writeln!(out, "{}", record)?;
            }
            Command::Destroy { kind, id } => {
                self.storage.destroy(kind, &id)?;
            }
            Command::All { kind } => {
                writeln!(out, "{}", format_list(&self.storage.all(kind)))?;
            }
            Command::Count { kind } => {
                writeln!(out, "{}", self.storage.count(kind))?;
            }
            Command::Update {
                kind,
                id,
                attribute,
                value,
            } => {
                self.storage.update(kind, &id, &attribute, &value)?;
            }
        }
        Ok(ConsoleState::Running)
    }

    fn help<W: Write>(&self, topic: Option<&str>, out: &mut W) -> Result<()> {
        match topic {
            Some(name) => match usage(name) {
                Some(line) => writeln!(out, "{}", line)?,
                None => writeln!(out, "*** No help on {}", name)?,
            },
            None => {
                for (_, line) in USAGE {
                    writeln!(out, "{}", line)?;
                }
            }
        }
        Ok(())
    }

    /// Get the storage engine
    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }
}

/// Render records as a list of double-quoted display strings: `["[City] (...) {...}", ...]`
pub fn format_list(records: &[&Record]) -> String {
    let items: Vec<String> = records
        .iter()
        .map(|record| {
            let shown = record.to_string().replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{}\"", shown)
        })
        .collect();
    format!("[{}]", items.join(", "))
}
