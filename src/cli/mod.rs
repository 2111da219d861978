//! Line-oriented command shell over an [`Inspector`]
//!
//! Every input line is parsed as a multicall command line: the first word
//! names the command. Parsing and execution are kept apart from stdin
//! handling so the shell can be driven from tests.

use crate::clock::Clock;
use crate::core::types::{format_address, Address, Comparison, MemoryError, MemoryResult, ValueType};
use crate::inspector::Inspector;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use serde_json::json;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(multicall = true, disable_help_subcommand = true)]
struct Shell {
    #[command(subcommand)]
    command: Command,
}

/// Location named by a `watch` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchTarget {
    Address(Address),
    /// `#<index>` into the current scan results
    Result(usize),
}

impl FromStr for WatchTarget {
    type Err = MemoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.strip_prefix('#') {
            Some(index) => index
                .parse()
                .map(WatchTarget::Result)
                .map_err(|_| MemoryError::InvalidAddress(s.to_string())),
            None => s.parse().map(WatchTarget::Address),
        }
    }
}

/// A parsed shell command
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// First scan over the whole memory
    Scan {
        /// Value to compare against, `-` for none
        #[arg(allow_hyphen_values = true, value_parser = literal_arg)]
        literal: String,
        /// i8 u8 i16 u16 i32 u32 f32 f64 [default: type of the last scan]
        value_type: Option<ValueType>,
        /// equal notEqual greater less changed unchanged
        #[arg(default_value_t = Comparison::Equal)]
        comparison: Comparison,
    },
    /// Narrow the current results
    Next {
        #[arg(allow_hyphen_values = true, value_parser = literal_arg)]
        literal: String,
        #[arg(default_value_t = Comparison::Equal)]
        comparison: Comparison,
    },
    /// Clear results and history
    Reset,
    /// Show results up to the display limit
    Results,
    /// Read one value
    Read {
        address: Address,
        value_type: Option<ValueType>,
    },
    /// Write one value
    Write {
        address: Address,
        #[arg(allow_hyphen_values = true)]
        literal: String,
        value_type: Option<ValueType>,
    },
    /// Watch an address, or a result with `#<index>`
    Watch {
        target: WatchTarget,
        #[arg(short = 't', long = "type")]
        value_type: Option<ValueType>,
        description: Vec<String>,
    },
    /// Remove a watch
    Unwatch { address: Address },
    /// List watches with current values
    Watches,
    /// Write through a watch's type
    Edit {
        address: Address,
        #[arg(allow_hyphen_values = true)]
        literal: String,
    },
    /// Set the virtual clock rate
    Speed {
        #[arg(allow_hyphen_values = true)]
        rate: f64,
    },
    /// Freeze the virtual clock
    Pause,
    /// Restore the last non-zero rate
    Resume,
    /// Pause the clock while a command runs (on/off)
    Autopause {
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        enabled: bool,
    },
    /// Show virtual time
    Now,
    /// Grow the memory by whole pages
    Grow { pages: u32 },
    /// Show the connection status
    Status,
    /// Dump status, results, history and watches as JSON
    Json,
    /// List commands
    #[command(alias = "?")]
    Help,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// What the shell should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Print(Vec<String>),
    Quit,
}

fn literal_arg(arg: &str) -> MemoryResult<String> {
    Ok(if arg == "-" { String::new() } else { arg.to_string() })
}

fn help_lines() -> Vec<String> {
    let shell = Shell::command();
    let mut lines = vec!["commands (`<command> --help` for arguments):".to_string()];
    lines.extend(shell.get_subcommands().map(|command| {
        let about = command.get_about().map(ToString::to_string).unwrap_or_default();
        format!("  {:<10} {}", command.get_name(), about)
    }));
    lines
}

/// Parses one input line; blank lines yield `None`
pub fn parse_command(line: &str) -> MemoryResult<Option<Command>> {
    let words: Vec<&str> = line.split_whitespace().collect();
    if words.is_empty() {
        return Ok(None);
    }
    Shell::try_parse_from(words)
        .map(|shell| Some(shell.command))
        .map_err(|e| MemoryError::InvalidCommand(e.to_string().trim_end().to_string()))
}

/// Runs a command against the inspector
pub fn execute<C: Clock>(inspector: &mut Inspector<C>, command: Command) -> MemoryResult<Outcome> {
    let default_type = inspector.session().value_type();
    let lines = match command {
        Command::Scan {
            literal,
            value_type,
            comparison,
        } => {
            let report = inspector.scan(&literal, value_type.unwrap_or(default_type), comparison)?;
            let mut lines = vec![format!("Found {} results", report.results)];
            if report.capped {
                lines.push("(result limit reached, narrow the search)".to_string());
            }
            if report.cancelled {
                lines.push("(interrupted, results are partial)".to_string());
            }
            lines
        }
        Command::Next {
            literal,
            comparison,
        } => {
            let report = inspector.narrow(&literal, comparison)?;
            let mut lines = vec![format!("Found {} results", report.results)];
            if report.cancelled {
                lines.push("(interrupted, remaining results were dropped)".to_string());
            }
            lines
        }
        Command::Reset => {
            inspector.reset();
            vec!["Results cleared".to_string()]
        }
        Command::Results => {
            let total = inspector.candidates().len();
            let mut lines: Vec<String> = inspector
                .preview()
                .iter()
                .enumerate()
                .map(|(i, c)| {
                    format!("#{:<4} {}  {:<4} {}", i, format_address(c.address), c.value_type, c.value)
                })
                .collect();
            if lines.len() < total {
                lines.push(format!("... showing {} of {}", lines.len(), total));
            }
            if lines.is_empty() {
                lines.push("No results".to_string());
            }
            lines
        }
        Command::Read {
            address,
            value_type,
        } => {
            let value_type = value_type.unwrap_or(default_type);
            let value = inspector.read(address, value_type)?;
            vec![format!("{} {} = {}", format_address(address), value_type, value)]
        }
        Command::Write {
            address,
            literal,
            value_type,
        } => {
            let value_type = value_type.unwrap_or(default_type);
            let stored = inspector.write_literal(address, &literal, value_type)?;
            vec![format!("{} {} <- {}", format_address(address), value_type, stored)]
        }
        Command::Watch {
            target,
            value_type,
            description,
        } => {
            let description = description.join(" ");
            let watch = match target {
                WatchTarget::Address(address) => {
                    let description = if description.is_empty() {
                        format!("Value at {}", format_address(address))
                    } else {
                        description
                    };
                    inspector.add_watch(address, description, value_type.unwrap_or(default_type))
                }
                WatchTarget::Result(index) => {
                    let description = if description.is_empty() {
                        format!("Result #{}", index)
                    } else {
                        description
                    };
                    inspector.watch_candidate(index, description)?
                }
            };
            vec![format!("Watching {} '{}'", format_address(watch.address), watch.description)]
        }
        Command::Unwatch { address } => match inspector.remove_watch(address) {
            Some(_) => vec![format!("Removed watch at {}", format_address(address))],
            None => vec![format!("No watch at {}", format_address(address))],
        },
        Command::Watches => {
            let watches = inspector.watches().list_sorted(inspector.view());
            if watches.is_empty() {
                vec!["No watches".to_string()]
            } else {
                watches
                    .iter()
                    .map(|w| {
                        let value = w
                            .value
                            .map(|v| v.to_string())
                            .unwrap_or_else(|| "??".to_string());
                        format!(
                            "{}  {:<4} {:<12} {}",
                            format_address(w.address),
                            w.value_type,
                            value,
                            w.description
                        )
                    })
                    .collect()
            }
        }
        Command::Edit { address, literal } => {
            let stored = inspector.edit_watch(address, &literal)?;
            vec![format!("{} <- {}", format_address(address), stored)]
        }
        Command::Speed { rate } => {
            inspector.set_rate(rate)?;
            vec![format!("Speed set to {}x", rate)]
        }
        Command::Pause => {
            inspector.pause();
            vec!["Clock paused".to_string()]
        }
        Command::Resume => {
            inspector.resume();
            vec![format!("Clock running at {}x", inspector.rate())]
        }
        Command::Autopause { enabled } => {
            inspector.set_autopause(enabled);
            vec![format!("Auto-pause {}", if enabled { "on" } else { "off" })]
        }
        Command::Now => vec![format!(
            "{:.3} ms (rate {}x)",
            inspector.now().as_secs_f64() * 1000.0,
            inspector.rate()
        )],
        Command::Grow { pages } => {
            let previous = inspector.grow(pages)?;
            vec![format!("Grew from {} page(s); {}", previous, inspector.status())]
        }
        Command::Status => vec![inspector.status()],
        Command::Json => {
            let snapshot = json!({
                "status": inspector.status(),
                "rate": inspector.rate(),
                "results": inspector.preview(),
                "history": inspector.session().history(),
                "watches": inspector.watches().list_sorted(inspector.view()),
            });
            vec![serde_json::to_string_pretty(&snapshot)?]
        }
        Command::Help => help_lines(),
        Command::Quit => return Ok(Outcome::Quit),
    };
    Ok(Outcome::Print(lines))
}
