//! Line → Command conversion.
//!
//! Tokenization only understands quotes: `"San Francisco"` is one argument,
//! the quotes are dropped and `\"` becomes `"`. Every other character,
//! including `#` and a lone `\`, is kept as typed.
//!
//! Missing arguments are reported strictly left to right (class, id,
//! attribute, value) before the class name is checked against the registry.

use crate::error::CommandError;
use crate::registry::Kind;

use super::Command;

/// Split a line into arguments, respecting quotes
///
/// Inside double quotes `\"` and `\\` are unescaped; single quotes are
/// literal. An unclosed quote is an [`CommandError::UnknownSyntax`].
pub fn tokenize(line: &str) -> Result<Vec<String>, CommandError> {
    let unclosed = || CommandError::UnknownSyntax(line.trim().to_string());

    let mut tokens = Vec::new();
    let mut current = String::new();
    // Distinguishes `""` (an empty argument) from no argument at all
    let mut in_token = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') if matches!(chars.peek(), Some('"' | '\\')) => {
                            current.extend(chars.next());
                        }
                        Some(c) => current.push(c),
                        None => return Err(unclosed()),
                    }
                }
            }
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(unclosed()),
                    }
                }
            }
            '\\' if chars.peek() == Some(&'"') => {
                in_token = true;
                current.extend(chars.next());
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Parse one console line.
///
/// Returns `Ok(None)` for a blank line.
pub fn parse_line(line: &str) -> Result<Option<Command>, CommandError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let tokens = tokenize(trimmed)?;
    let Some((name, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match name.as_str() {
        "quit" | "EOF" => Command::Quit,
        "help" => Command::Help {
            topic: args.first().cloned(),
        },
        "create" => {
            let [kind] = required(args, [CommandError::MissingKind])?;
            Command::Create { kind: kind_of(kind)? }
        }
        "show" => {
            let [kind, id] = required(args, [CommandError::MissingKind, CommandError::MissingId])?;
            Command::Show {
                kind: kind_of(kind)?,
                id: id.to_string(),
            }
        }
        "destroy" => {
            let [kind, id] = required(args, [CommandError::MissingKind, CommandError::MissingId])?;
            Command::Destroy {
                kind: kind_of(kind)?,
                id: id.to_string(),
            }
        }
        "all" => Command::All {
            kind: args.first().map(|k| kind_of(k)).transpose()?,
        },
        "count" => Command::Count {
            kind: args.first().map(|k| kind_of(k)).transpose()?,
        },
        "update" => {
            let [kind, id, attribute, value] = required(
                args,
                [
                    CommandError::MissingKind,
                    CommandError::MissingId,
                    CommandError::MissingAttribute,
                    CommandError::MissingValue,
                ],
            )?;
            Command::Update {
                kind: kind_of(kind)?,
                id: id.to_string(),
                attribute: attribute.to_string(),
                value: value.to_string(),
            }
        }
        _ => return Err(CommandError::UnknownSyntax(trimmed.to_string())),
    };

    Ok(Some(command))
}

/// Take the first `N` arguments, reporting the first missing one.
///
/// Arguments past `N` are ignored.
fn required<const N: usize>(
    args: &[String],
    missing: [CommandError; N],
) -> Result<[&str; N], CommandError> {
    let mut taken = [""; N];
    for (i, error) in missing.into_iter().enumerate() {
        match args.get(i) {
            Some(arg) => taken[i] = arg.as_str(),
            None => return Err(error),
        }
    }
    Ok(taken)
}

fn kind_of(name: &str) -> Result<Kind, CommandError> {
    name.parse().map_err(|_| CommandError::UnknownKind)
}
