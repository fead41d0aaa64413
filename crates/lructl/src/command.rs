//! Command line parser using nom
//!
//! One command per line, verbs are case-insensitive:
//! ```text
//! ADD <key> <value...>
//! UPSERT <key> <value...>
//! GET <key>
//! PEEK <key>
//! DEL <key>
//! OLDEST
//! LEN
//! CLEAR
//! ITER [limit]
//! STATS
//! ```
//! Everything after the key is the value, spaces included. Blank lines and
//! lines starting with `#` are skipped.

use nom::{
    bytes::complete::take_till1,
    character::complete::{alpha1, digit1, space1},
    combinator::{map_res, opt, rest},
    sequence::{pair, preceded},
    IResult,
};

use crate::error::{Error, Result};

/// A parsed shell command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Insert without overwriting
    Add { key: String, value: String },
    /// Insert or overwrite
    Upsert { key: String, value: String },
    /// Lookup with promotion
    Get(String),
    /// Lookup without promotion
    Peek(String),
    /// Remove by key
    Del(String),
    /// Evict the least recently used entry
    Oldest,
    /// Number of entries
    Len,
    /// Drop everything
    Clear,
    /// List entries, most recent first, optionally capped
    Iter(Option<usize>),
    /// Counter report
    Stats,
}

fn verb(input: &str) -> IResult<&str, &str> {
    alpha1(input)
}

fn token(input: &str) -> IResult<&str, &str> {
    preceded(space1, take_till1(|c: char| c.is_whitespace()))(input)
}

fn value(input: &str) -> IResult<&str, &str> {
    preceded(space1, rest)(input)
}

fn limit(input: &str) -> IResult<&str, usize> {
    preceded(space1, map_res(digit1, |digits: &str| digits.parse::<usize>()))(input)
}

/// Parse one line of input
///
/// Returns `Ok(None)` for blank and comment lines.
pub fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (args, name) =
        verb(line).map_err(|_| Error::Parse(format!("expected a command, got '{}'", line)))?;
    let name = name.to_ascii_uppercase();

    let command = match name.as_str() {
        "ADD" => {
            let (key, value) = finish(pair(token, value)(args), &name)?;
            Command::Add {
                key: key.to_string(),
                value: value.to_string(),
            }
        }
        "UPSERT" => {
            let (key, value) = finish(pair(token, value)(args), &name)?;
            Command::Upsert {
                key: key.to_string(),
                value: value.to_string(),
            }
        }
        "GET" => Command::Get(finish(token(args), &name)?.to_string()),
        "PEEK" => Command::Peek(finish(token(args), &name)?.to_string()),
        "DEL" => Command::Del(finish(token(args), &name)?.to_string()),
        "OLDEST" => no_args(args, &name, Command::Oldest)?,
        "LEN" => no_args(args, &name, Command::Len)?,
        "CLEAR" => no_args(args, &name, Command::Clear)?,
        "STATS" => no_args(args, &name, Command::Stats)?,
        "ITER" => Command::Iter(finish(opt(limit)(args), &name)?),
        _ => return Err(Error::Parse(format!("unknown command '{}'", name))),
    };

    Ok(Some(command))
}

fn finish<'a, O>(result: IResult<&'a str, O>, name: &str) -> Result<O> {
    match result {
        Ok(("", output)) => Ok(output),
        Ok((extra, _)) => Err(Error::Parse(format!(
            "unexpected input after '{}' arguments: '{}'",
            name.to_lowercase(),
            extra.trim()
        ))),
        Err(_) => Err(wrong_arity(name)),
    }
}

fn no_args(args: &str, name: &str, command: Command) -> Result<Command> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(wrong_arity(name))
    }
}

fn wrong_arity(name: &str) -> Error {
    Error::Parse(format!(
        "wrong number of arguments for '{}' command",
        name.to_lowercase()
    ))
}
