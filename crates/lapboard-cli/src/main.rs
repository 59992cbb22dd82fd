// crates/lapboard-cli/src/main.rs
// ============================================================================
// Module: Lapboard CLI Entry Point
// Description: Command dispatcher for the leaderboard server and config tools.
// Purpose: Start the HTTP service and validate configuration from the shell.
// Dependencies: clap, lapboard-config, lapboard-server, thiserror, tokio.
// ============================================================================

//! ## Overview
//! The `lapboard` binary loads `lapboard.toml`, applies the port override from
//! `--port` or `PORT`, and serves the leaderboard. The `config` subcommands
//! validate a file or print the canonical example.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use lapboard_config::LapboardConfig;
use lapboard_config::config_toml_example;
use lapboard_server::LapboardServer;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "lapboard", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the leaderboard HTTP server.
    Serve(ServeCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Configuration for the `serve` command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to lapboard.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Port override for the configured bind address.
    #[arg(long, env = "PORT", value_name = "PORT")]
    port: Option<u16>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a configuration file.
    Validate(ConfigValidateCommand),
    /// Print the canonical example configuration.
    Example,
}

/// Configuration for the `config validate` command.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to lapboard.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// CLI error wrapper for user-facing messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
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
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        write_stdout_line(&format!("lapboard {version}"))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    match command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Config {
            command,
        } => command_config(command),
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let mut config = LapboardConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    if let Some(port) = command.port {
        config
            .apply_port_override(port)
            .map_err(|err| CliError::new(format!("failed to apply port override: {err}")))?;
    }
    let bind = config.server.bind.clone();
    let store_type = config.store.store_type.as_str();

    let server = tokio::task::spawn_blocking(move || LapboardServer::from_config(config))
        .await
        .map_err(|err| CliError::new(format!("server init failed: init join failed: {err}")))?
        .map_err(|err| CliError::new(format!("server init failed: {err}")))?;
    write_stderr_line(&format!("lapboard serving on {bind} ({store_type} store)"))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;

    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(&command),
        ConfigCommand::Example => command_config_example(),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = LapboardConfig::load(command.config.as_deref())
        .map_err(|err| CliError::new(format!("failed to load config: {err}")))?;
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the canonical example configuration.
fn command_config_example() -> CliResult<ExitCode> {
    let example = config_toml_example();
    write_stdout_line(example.trim_end())
        .map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
