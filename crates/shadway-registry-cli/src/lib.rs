// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]

mod commands;

use clap::{error::ErrorKind, ArgAction, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use shadway_registry_api::{ApiError, ApiErrorCode};
use shadway_registry_store::{StoreError, StoreErrorCode};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::process::ExitCode as ProcessExitCode;
use tracing_subscriber::EnvFilter;

pub const CRATE_NAME: &str = "shadway-registry-cli";

#[derive(Parser)]
#[command(name = "shadway-registry", version)]
#[command(about = "Publish and inspect components in a shadway registry root")]
#[command(after_help = "Environment:\n  RUST_LOG   Log filter override (logs go to stderr)")]
struct Cli {
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(long, global = true, default_value_t = false)]
    quiet: bool,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a component's source, descriptor and index entry.
    Publish {
        #[arg(long)]
        root: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        code_file: PathBuf,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Print a published descriptor.
    Show {
        #[arg(long)]
        root: PathBuf,
        name: String,
    },
    /// Print the maintained index, or rebuild it from descriptors with `--rescan`.
    Index {
        #[arg(long)]
        root: PathBuf,
        #[arg(long, default_value_t = false)]
        rescan: bool,
    },
}

/// Process exit codes. Stable: scripts branch on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    Usage = 2,
    Validation = 3,
    NotFound = 4,
    Internal = 10,
}

impl ExitCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Usage => "usage",
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Internal => "internal",
        }
    }
}

/// Structured error printed on stderr when `--json` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineError {
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
}

impl MachineError {
    #[must_use]
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_detail(mut self, key: &str, value: &str) -> Self {
        self.details.insert(key.to_string(), value.to_string());
        self
    }
}

impl fmt::Display for MachineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

#[derive(Debug)]
struct CliError {
    exit_code: ExitCode,
    machine: MachineError,
}

impl CliError {
    fn usage(message: &str) -> Self {
        Self {
            exit_code: ExitCode::Usage,
            machine: MachineError::new("usage_error", message),
        }
    }

    fn validation(message: &str) -> Self {
        Self {
            exit_code: ExitCode::Validation,
            machine: MachineError::new("validation_error", message),
        }
    }

    fn not_found(message: &str) -> Self {
        Self {
            exit_code: ExitCode::NotFound,
            machine: MachineError::new("not_found", message),
        }
    }

    fn internal(message: &str) -> Self {
        Self {
            exit_code: ExitCode::Internal,
            machine: MachineError::new("internal_error", message),
        }
    }

    /// The operator owns the store root, so store messages (paths included)
    /// are shown as-is.
    fn from_store(err: &StoreError) -> Self {
        match err.code {
            StoreErrorCode::NotFound => Self::not_found(&err.message),
            StoreErrorCode::Validation => Self::validation(&err.message),
            _ => Self::internal(&err.to_string()),
        }
    }

    fn from_api(err: &ApiError) -> Self {
        let base = match err.code {
            ApiErrorCode::InvalidRequest => Self::validation(&err.message),
            ApiErrorCode::NotFound => Self::not_found(&err.message),
            _ => Self::internal(&err.message),
        };
        if err.details.is_null() || err.details == serde_json::json!({}) {
            base
        } else {
            Self {
                machine: base
                    .machine
                    .with_detail("details", &err.details.to_string()),
                ..base
            }
        }
    }
}

#[derive(Clone, Copy)]
struct OutputMode {
    json: bool,
}

#[derive(Clone, Copy)]
struct LogFlags {
    quiet: bool,
    verbose: u8,
}

pub fn main_entry() -> ProcessExitCode {
    let wants_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::from(ExitCode::Success as u8),
        Err(err) => {
            emit_error(&err, wants_json);
            ProcessExitCode::from(err.exit_code as u8)
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                print!("{err}");
                return Ok(());
            }
            _ => {
                return Err(CliError {
                    machine: MachineError::new("usage_error", "invalid command line arguments")
                        .with_detail("error", &err.to_string()),
                    exit_code: ExitCode::Usage,
                });
            }
        },
    };
    init_logging(LogFlags {
        quiet: cli.quiet,
        verbose: cli.verbose,
    });
    let output_mode = OutputMode { json: cli.json };

    let command = cli
        .command
        .ok_or_else(|| CliError::usage("missing command; see --help"))?;
    match command {
        Commands::Publish {
            root,
            name,
            code_file,
            category,
            title,
            description,
        } => commands::run_publish(
            commands::PublishArgs {
                root,
                name,
                code_file,
                category,
                title,
                description,
            },
            output_mode,
        ),
        Commands::Show { root, name } => commands::run_show(&root, &name, output_mode),
        Commands::Index { root, rescan } => commands::run_index(&root, rescan, output_mode),
    }
}

fn log_filter(flags: LogFlags) -> &'static str {
    if flags.quiet {
        return "error";
    }
    match flags.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Logs always go to stderr; stdout carries command output only.
fn init_logging(flags: LogFlags) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(flags)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn emit_ok<T: Serialize>(output_mode: OutputMode, payload: &T) -> Result<(), CliError> {
    let text = if output_mode.json {
        serde_json::to_string(payload)
    } else {
        serde_json::to_string_pretty(payload)
    }
    .map_err(|e| CliError::internal(&e.to_string()))?;
    println!("{text}");
    Ok(())
}

fn emit_error(error: &CliError, machine_json: bool) {
    if machine_json {
        match serde_json::to_string(&error.machine) {
            Ok(payload) => eprintln!("{payload}"),
            Err(_) => eprintln!(
                "{{\"code\":\"internal_error\",\"message\":\"failed to encode structured error\",\"details\":{{}}}}"
            ),
        }
    } else {
        eprintln!("{}", error.machine);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn verbosity_maps_to_filters() {
        let flags = |quiet, verbose| LogFlags { quiet, verbose };
        assert_eq!(log_filter(flags(false, 0)), "warn");
        assert_eq!(log_filter(flags(false, 1)), "info");
        assert_eq!(log_filter(flags(false, 5)), "trace");
        assert_eq!(log_filter(flags(true, 3)), "error");
    }

    #[test]
    fn store_errors_pick_exit_codes() {
        let nf = CliError::from_store(&StoreError::new(StoreErrorCode::NotFound, "gone"));
        assert_eq!(nf.exit_code, ExitCode::NotFound);
        let parse = CliError::from_store(&StoreError::new(StoreErrorCode::Parse, "bad"));
        assert_eq!(parse.exit_code, ExitCode::Internal);
        assert_eq!(parse.machine.message, "parse_error: bad");
    }

    #[test]
    fn api_validation_errors_keep_field_details() {
        let err = ApiError::invalid_request(
            "name and code are required",
            serde_json::json!([{"field": "code", "reason": "required"}]),
        );
        let cli = CliError::from_api(&err);
        assert_eq!(cli.exit_code, ExitCode::Validation);
        assert!(cli.machine.details["details"].contains("\"code\""));
    }
}
