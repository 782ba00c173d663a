//! Shell command parser
//!
//! ## Line Format
//! ```text
//! <verb | menu-number> [arg ...]
//! ```
//! Arguments are separated by whitespace; double quotes group words into one
//! argument. A trailing name argument (`borrow`, `return`, `add-borrower`,
//! `loans`) may also be given unquoted across several words.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Result, ShelfError};
use super::{Command, CommandType};

/// Parse one shell line into a command
pub fn parse_command(line: &str) -> Result<Command> {
    let tokens = tokenize(line)?;
    let (verb, args) = tokens
        .split_first()
        .ok_or_else(|| ShelfError::InvalidInput("empty command".to_string()))?;

    let command_type = resolve_verb(verb)?;

    match command_type {
        CommandType::ShowBooks => {
            expect_args(command_type, args, 0)?;
            Ok(Command::ShowBooks)
        }
        CommandType::Search => Ok(Command::Search {
            query: args.join(" "),
        }),
        CommandType::Borrow => {
            let (book_id, borrower) = id_and_name(command_type, args, "book id")?;
            Ok(Command::Borrow { book_id, borrower })
        }
        CommandType::Return => {
            let (book_id, borrower) = id_and_name(command_type, args, "book id")?;
            Ok(Command::Return { book_id, borrower })
        }
        CommandType::AddBook => {
            expect_args(command_type, args, 3)?;
            Ok(Command::AddBook {
                title: args[0].clone(),
                author: args[1].clone(),
                year: args[2].clone(),
            })
        }
        CommandType::RemoveBook => {
            expect_args(command_type, args, 1)?;
            Ok(Command::RemoveBook {
                book_id: parse_id(&args[0], "book id")?,
            })
        }
        CommandType::AddBorrower => {
            let (id, name) = id_and_name(command_type, args, "borrower id")?;
            Ok(Command::AddBorrower { id, name })
        }
        CommandType::RemoveBorrower => {
            expect_args(command_type, args, 1)?;
            Ok(Command::RemoveBorrower {
                id: parse_id(&args[0], "borrower id")?,
            })
        }
        CommandType::Loans => {
            if args.is_empty() {
                return Err(usage_error(command_type));
            }
            Ok(Command::Loans {
                borrower: args.join(" "),
            })
        }
        CommandType::Export => match args {
            [] => Ok(Command::Export { dir: None }),
            [dir] => Ok(Command::Export {
                dir: Some(PathBuf::from(dir)),
            }),
            _ => Err(usage_error(command_type)),
        },
        CommandType::Quit => Ok(Command::Quit),
    }
}

/// Split a line into arguments, honouring double quotes
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    tokens.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err(ShelfError::InvalidInput("unterminated quote".to_string()));
    }
    if has_token {
        tokens.push(current);
    }

    Ok(tokens)
}

/// Parse a numeric identifier
pub fn parse_id<T: FromStr>(token: &str, what: &str) -> Result<T> {
    token.trim().parse().map_err(|_| {
        ShelfError::InvalidInput(format!("{} must be a number, got '{}'", what, token))
    })
}

fn resolve_verb(verb: &str) -> Result<CommandType> {
    if let Ok(number) = verb.parse::<u8>() {
        return CommandType::from_menu(number).ok_or_else(|| {
            ShelfError::InvalidInput(format!(
                "invalid choice {}; enter a number between 1 and {}",
                number,
                CommandType::ALL.len()
            ))
        });
    }

    CommandType::from_verb(&verb.to_lowercase())
        .ok_or_else(|| ShelfError::InvalidInput(format!("unknown command '{}'", verb)))
}

fn id_and_name<T: FromStr>(
    command_type: CommandType,
    args: &[String],
    what: &str,
) -> Result<(T, String)> {
    if args.len() < 2 {
        return Err(usage_error(command_type));
    }
    Ok((parse_id(&args[0], what)?, args[1..].join(" ")))
}

fn expect_args(command_type: CommandType, args: &[String], count: usize) -> Result<()> {
    if args.len() != count {
        return Err(usage_error(command_type));
    }
    Ok(())
}

fn usage_error(command_type: CommandType) -> ShelfError {
    ShelfError::InvalidInput(format!("usage: {}", command_type.usage()))
}
