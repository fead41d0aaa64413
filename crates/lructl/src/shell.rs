//! Command execution against a shared cache

use std::io::{BufRead, Write};

use lrucache::SharedLru;
use serde::Serialize;
use tracing::{debug, warn};

use crate::command::{parse_command, Command};
use crate::error::Result;

const NIL: &str = "(nil)";

/// Counter report printed by `STATS`
#[derive(Debug, Serialize)]
struct StatsReport {
    len: usize,
    hits: u64,
    misses: u64,
    inserts: u64,
    removals: u64,
    evictions: u64,
    hit_ratio: f64,
}

/// Line-oriented shell over a string cache
pub struct Shell {
    cache: SharedLru<String, String>,
    echo: bool,
}

impl Shell {
    /// Create a shell around `cache`; `echo` prints each command before its
    /// output
    pub fn new(cache: SharedLru<String, String>, echo: bool) -> Self {
        Self { cache, echo }
    }

    /// The cache this shell operates on
    pub fn cache(&self) -> &SharedLru<String, String> {
        &self.cache
    }

    /// Execute one command and return its response lines
    pub fn execute(&self, command: Command) -> Result<Vec<String>> {
        let lines = match command {
            Command::Add { key, value } => {
                self.cache.add(key, value);
                vec!["OK".to_string()]
            }
            Command::Upsert { key, value } => {
                vec![self.cache.upsert(key, value).unwrap_or_else(nil)]
            }
            Command::Get(key) => vec![self.cache.get(key.as_str()).unwrap_or_else(nil)],
            Command::Peek(key) => vec![self.cache.peek(key.as_str()).unwrap_or_else(nil)],
            Command::Del(key) => {
                let removed = self.cache.remove(key.as_str());
                vec![if removed { "1" } else { "0" }.to_string()]
            }
            Command::Oldest => match self.cache.remove_oldest() {
                Some((key, value)) => vec![format!("{} {}", key, value)],
                None => vec![nil()],
            },
            Command::Len => vec![self.cache.len().to_string()],
            Command::Clear => {
                self.cache.clear();
                vec!["OK".to_string()]
            }
            Command::Iter(limit) => {
                let limit = limit.unwrap_or(usize::MAX);
                let mut lines = Vec::new();
                self.cache.iterate(|key, value| {
                    if lines.len() >= limit {
                        return true;
                    }
                    lines.push(format!("{} {}", key, value));
                    false
                });
                if self.cache.is_empty() {
                    lines.push("(empty)".to_string());
                }
                lines
            }
            Command::Stats => {
                let snap = self.cache.stats().snapshot();
                let report = StatsReport {
                    len: self.cache.len(),
                    hits: snap.hits,
                    misses: snap.misses,
                    inserts: snap.inserts,
                    removals: snap.removals,
                    evictions: snap.evictions,
                    hit_ratio: snap.hit_ratio,
                };
                vec![serde_json::to_string(&report)?]
            }
        };

        Ok(lines)
    }

    /// Read commands from `input` until EOF, writing responses to `out`
    ///
    /// Malformed lines produce an `ERR` response and do not stop the session.
    /// Returns the number of commands executed.
    pub fn run<R: BufRead, W: Write>(&self, input: R, out: &mut W) -> Result<usize> {
        let mut executed = 0;

        for (lineno, line) in input.lines().enumerate() {
            let line = line?;

            let command = match parse_command(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    warn!(line = lineno + 1, "{}", e);
                    writeln!(out, "ERR {}", e)?;
                    continue;
                }
            };

            debug!(line = lineno + 1, ?command, "executing");
            if self.echo {
                writeln!(out, "> {}", line.trim())?;
            }

            for response in self.execute(command)? {
                writeln!(out, "{}", response)?;
            }
            executed += 1;
        }

        out.flush()?;
        Ok(executed)
    }
}

fn nil() -> String {
    NIL.to_string()
}
