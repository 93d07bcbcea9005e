// crates/clusterview-cli/src/main.rs
// ============================================================================
// Module: Clusterview CLI Entry Point
// Description: Command dispatcher for cluster bridge operations.
// Purpose: Expose node, constraint and option operations as JSON commands.
// Dependencies: clap, clusterview-config, clusterview-core, serde, thiserror.
// ============================================================================

//! ## Overview
//! The `clusterview` binary loads `clusterview.toml`, builds a cluster bridge
//! over child processes and runs one operation. Every successful command
//! prints a single JSON document on stdout; failures print a message on
//! stderr and exit with a failure status.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use clusterview_config::ClusterviewConfig;
use clusterview_core::ClusterBridge;
use clusterview_core::CommandRunner;
use clusterview_core::GENERAL_PAGE;
use clusterview_core::Node;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "clusterview", version, disable_help_subcommand = true)]
struct Cli {
    /// Config file path (overrides `CLUSTERVIEW_CONFIG`).
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Commands {
    /// List online and offline nodes.
    Nodes,
    /// Show resources allowed and not allowed to run on a node.
    Constraints {
        /// Node identifier.
        node: String,
    },
    /// Resolve and render the options of a schema page.
    Options {
        /// Schema page name.
        #[arg(long, default_value = GENERAL_PAGE)]
        page: String,
    },
    /// Set a cluster property; an empty value removes it.
    Set {
        /// Property name.
        key: String,
        /// New value.
        value: String,
    },
    /// List schema page names.
    Pages,
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// Output of the `nodes` command.
#[derive(Debug, Serialize)]
struct NodesReport {
    /// Online node identifiers.
    online: Vec<String>,
    /// Offline node identifiers.
    offline: Vec<String>,
    /// Node records, online first.
    nodes: Vec<Node>,
}

/// Output of the `set` command.
#[derive(Debug, Serialize)]
struct UpdateReport {
    /// Property name.
    config_key: String,
    /// Whether the property was set or removed.
    action: &'static str,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Loads configuration, runs the selected command and prints its output.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let config = ClusterviewConfig::load(cli.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    let bridge = config
        .build_bridge()
        .map_err(|err| CliError::new(format!("failed to initialize bridge: {err}")))?;
    let output = execute(&bridge, cli.command)?;
    write_json(&output)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Dispatch
// ============================================================================

/// Runs one command against the bridge and returns its JSON output.
fn execute<R: CommandRunner>(bridge: &ClusterBridge<R>, command: Commands) -> CliResult<Value> {
    match command {
        Commands::Nodes => {
            let status = bridge.list_nodes();
            let nodes = status.nodes();
            to_json(&NodesReport {
                online: status.online,
                offline: status.offline,
                nodes,
            })
        }
        Commands::Constraints {
            node,
        } => to_json(&bridge.location_dependencies(&node)),
        Commands::Options {
            page,
        } => {
            if bridge.schema().page(&page).is_none() {
                return Err(CliError::new(format!("unknown page: {page}")));
            }
            let rendered = bridge
                .load_page(&page)
                .map_err(|err| CliError::new(format!("failed to render page {page}: {err}")))?;
            to_json(&rendered)
        }
        Commands::Set {
            key,
            value,
        } => {
            bridge
                .update_value(&key, &value)
                .map_err(|err| CliError::new(format!("failed to update {key}: {err}")))?;
            to_json(&UpdateReport {
                action: if value.is_empty() { "deleted" } else { "updated" },
                config_key: key,
            })
        }
        Commands::Pages => to_json(&bridge.schema().page_names().collect::<Vec<_>>()),
    }
}

// ============================================================================
// SECTION: Output
// ============================================================================

/// Serializes a report into a JSON value.
fn to_json<T: Serialize>(value: &T) -> CliResult<Value> {
    serde_json::to_value(value)
        .map_err(|err| CliError::new(format!("failed to serialize output: {err}")))
}

/// Writes a JSON document followed by a newline to stdout.
fn write_json(value: &Value) -> CliResult<()> {
    let mut bytes = serde_json::to_vec_pretty(value)
        .map_err(|err| CliError::new(format!("failed to serialize output: {err}")))?;
    bytes.push(b'\n');
    let mut stdout = std::io::stdout();
    stdout.write_all(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
