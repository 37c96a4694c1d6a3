//! REPL loop with rustyline.
//!
//! Interactive mode: prompt, history, Ctrl-C clears the line, Ctrl-D quits.
//! Pipe mode: read lines from stdin, execute each, no prompt.

use std::io::{self, Write};

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{HbnbError, Result};

use super::{Console, ConsoleState};

/// Run the interactive console until quit or Ctrl-D
pub fn run_interactive(console: &mut Console, config: &Config) -> Result<()> {
    let mut rl = DefaultEditor::new().map_err(|e| HbnbError::Editor(e.to_string()))?;

    if let Some(path) = &config.history_file {
        if let Err(e) = rl.load_history(path) {
            debug!(path = %path.display(), error = %e, "no history loaded");
        }
    }

    let stdout = io::stdout();
    let result = loop {
        match rl.readline(&config.prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.trim());
                }
                let mut out = stdout.lock();
                match console.execute_line(&line, &mut out) {
                    Ok(ConsoleState::Running) => {
                        out.flush()?;
                    }
                    Ok(ConsoleState::Stopped) => break Ok(()),
                    Err(e) => break Err(e),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => {
                // Leave the terminal on a fresh line
                println!();
                break Ok(());
            }
            Err(e) => break Err(HbnbError::Editor(e.to_string())),
        }
    };

    if let Some(path) = &config.history_file {
        if let Err(e) = rl.save_history(path) {
            warn!(path = %path.display(), error = %e, "failed to save history");
        }
    }

    result
}

/// Run the console over stdin/stdout without a prompt
pub fn run_pipe(console: &mut Console) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    console.run(stdin.lock(), &mut out)
}
