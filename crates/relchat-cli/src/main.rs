//! relchat CLI: Terminal client for the Release Dashboard AI Assistant

use clap::{Parser, Subcommand};
use relchat_engine::config::{DEFAULT_CONFIG_PATH, SERVER_ENV_VAR};
use relchat_engine::{chat_outcome, ApiClient, ChatBackend, Config};
use relchat_tui::controller::CLEAR_FAILED;
use relchat_tui::ConnectionStatus;
use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Chat with the Release Dashboard AI Assistant from the terminal
#[derive(Parser)]
#[command(name = "relchat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Backend base URL (overrides the config file)
    #[arg(long, global = true, env = SERVER_ENV_VAR)]
    server: Option<String>,

    /// Path to the configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Append logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat TUI (default when no command specified)
    Tui,

    /// Check whether the backend and its model are up
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send one message and print the reply
    Ask {
        /// The message to send
        message: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clear the conversation history on the backend
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },

    /// Print the effective configuration
    Config {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, None | Some(Commands::Tui));

    if let Err(e) = init_logging(cli.log_file.as_deref(), cli.debug, interactive) {
        fail(format!("cannot open log file: {e}"));
    }

    let config = match load_config(&cli.config, cli.server.as_deref()) {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    match cli.command {
        None | Some(Commands::Tui) => cmd_tui(&config),
        Some(Commands::Status { json }) => cmd_status(&config, json),
        Some(Commands::Ask { message, json }) => cmd_ask(&config, &message, json),
        Some(Commands::Clear { yes }) => cmd_clear(&config, yes),
        Some(Commands::Config { json }) => cmd_config(&config, json),
    }
}

/// Print `Error: <message>` and exit with status 1.
fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {message}");
    std::process::exit(1);
}

/// Install the global subscriber.
///
/// The TUI owns the terminal, so it only logs when a log file is given.
fn init_logging(log_file: Option<&Path>, debug: bool, interactive: bool) -> io::Result<()> {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Arc::new(file)),
            )
        }
        None => None,
    };

    let stderr_layer = (file_layer.is_none() && !interactive).then(|| {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_writer(io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();
    Ok(())
}

/// Load the config file, apply the server override and validate the result.
fn load_config(path: &Path, server: Option<&str>) -> Result<Config, String> {
    let config = Config::load_or_default(path)
        .map_err(|e| format!("{}: {e}", path.display()))?
        .with_server_override(server);
    config.validate().map_err(|e| e.to_string())?;
    tracing::debug!(server = %config.server_url, "configuration loaded");
    Ok(config)
}

fn runtime() -> Runtime {
    match Runtime::new() {
        Ok(rt) => rt,
        Err(e) => fail(format!("failed to start async runtime: {e}")),
    }
}

fn client(config: &Config) -> ApiClient {
    match ApiClient::from_config(config) {
        Ok(client) => client,
        Err(e) => fail(e),
    }
}

fn cmd_tui(config: &Config) {
    let backend: Arc<dyn ChatBackend> = Arc::new(client(config));
    let rt = runtime();
    if let Err(e) = rt.block_on(relchat_tui::run_tui(config, backend)) {
        fail(e);
    }
}

fn cmd_status(config: &Config, json: bool) {
    let client = client(config);
    let response = match runtime().block_on(client.status()) {
        Ok(response) => response,
        Err(e) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "connected": false, "error": e.to_string() })
                );
                std::process::exit(1);
            }
            let status = ConnectionStatus::Disconnected;
            println!("{} {}", status.dot(), status.text());
            fail(e);
        }
    };

    let status = if response.is_connected() {
        ConnectionStatus::Connected
    } else {
        ConnectionStatus::Disconnected
    };

    if json {
        let output = serde_json::json!({
            "connected": status.is_connected(),
            "server": config.server_url,
            "model_label": response.model_label(),
            "status": response,
        });
        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{text}"),
            Err(e) => fail(e),
        }
    } else {
        println!("{} {}", status.dot(), status.text());
        println!("Server: {}", config.server_url);
        if let Some(label) = response.model_label() {
            println!("{label}");
        }
        if let Some(error) = response.error.as_deref().filter(|e| !e.is_empty()) {
            println!("Backend error: {error}");
        }
    }

    if !status.is_connected() {
        std::process::exit(1);
    }
}

fn cmd_ask(config: &Config, message: &str, json: bool) {
    let message = message.trim();
    if message.is_empty() {
        fail("message is empty");
    }

    let client = client(config);
    let outcome = chat_outcome(runtime().block_on(client.chat(message)));

    if json {
        let output = match &outcome {
            Ok(reply) => serde_json::json!({
                "success": true,
                "response": reply.content,
                "model": reply.model,
            }),
            Err(text) => serde_json::json!({ "success": false, "error": text }),
        };
        match serde_json::to_string_pretty(&output) {
            Ok(text) => println!("{text}"),
            Err(e) => fail(e),
        }
        if outcome.is_err() {
            std::process::exit(1);
        }
        return;
    }

    match outcome {
        Ok(reply) => println!("{}", reply.content),
        Err(text) => {
            eprintln!("{text}");
            std::process::exit(1);
        }
    }
}

fn cmd_clear(config: &Config, yes: bool) {
    if !yes {
        let confirmed = match confirm_clear(&mut io::stdout(), &mut io::stdin().lock()) {
            Ok(confirmed) => confirmed,
            Err(e) => fail(e),
        };
        if !confirmed {
            println!("Cancelled");
            return;
        }
    }

    let client = client(config);
    match runtime().block_on(client.clear()) {
        Ok(response) if response.success => {
            println!(
                "{}",
                response
                    .message
                    .as_deref()
                    .unwrap_or("Conversation history cleared")
            );
        }
        Ok(response) => {
            tracing::warn!(error = ?response.error, "clear history reported failure");
            fail(CLEAR_FAILED);
        }
        Err(e) => {
            tracing::warn!(error = %e, "clear history request failed");
            fail(CLEAR_FAILED);
        }
    }
}

/// Show the clear prompt on `out` and read the answer from `input`.
fn confirm_clear(out: &mut impl Write, input: &mut impl BufRead) -> io::Result<bool> {
    write!(out, "Clear all chat history? [y/N] ")?;
    out.flush()?;
    read_confirmation(input)
}

/// Read one line and decide whether it says yes. End of input means no.
fn read_confirmation(input: &mut impl BufRead) -> io::Result<bool> {
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

fn cmd_config(config: &Config, json: bool) {
    if json {
        match serde_json::to_string_pretty(config) {
            Ok(text) => println!("{text}"),
            Err(e) => fail(e),
        }
        return;
    }

    println!("server_url:              {}", config.server_url);
    println!("request_timeout_seconds: {}", config.request_timeout_seconds);
    println!("ui.typewriter_interval_ms: {}", config.ui.typewriter_interval_ms);
    println!("ui.typing_rotation_ms:     {}", config.ui.typing_rotation_ms);
    println!("ui.fade_ms:                {}", config.ui.fade_ms);
    println!("ui.tick_rate_ms:           {}", config.ui.tick_rate_ms);
    println!("ui.max_input_lines:        {}", config.ui.max_input_lines);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Cursor;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command_opens_tui() {
        let cli = Cli::try_parse_from(["relchat"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(!cli.debug);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "relchat",
            "status",
            "--json",
            "--server",
            "http://dash.internal:5002",
            "--debug",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Status { json: true })));
        assert_eq!(cli.server.as_deref(), Some("http://dash.internal:5002"));
        assert!(cli.debug);
    }

    #[test]
    fn test_ask_takes_message() {
        let cli = Cli::try_parse_from(["relchat", "ask", "When is 4.2 released?"]).unwrap();
        match cli.command {
            Some(Commands::Ask { message, json }) => {
                assert_eq!(message, "When is 4.2 released?");
                assert!(!json);
            }
            _ => panic!("expected ask"),
        }

        assert!(Cli::try_parse_from(["relchat", "ask"]).is_err());
    }

    #[test]
    fn test_clear_yes_flag() {
        let cli = Cli::try_parse_from(["relchat", "clear", "-y"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Clear { yes: true })));
    }

    #[test]
    fn test_read_confirmation() {
        assert!(read_confirmation(&mut Cursor::new("y\n")).unwrap());
        assert!(read_confirmation(&mut Cursor::new("YES\n")).unwrap());
        assert!(!read_confirmation(&mut Cursor::new("n\n")).unwrap());
        assert!(!read_confirmation(&mut Cursor::new("\n")).unwrap());
        assert!(!read_confirmation(&mut Cursor::new("")).unwrap());
    }

    /// Accepts writes but cannot flush, like a closed stdout.
    struct BrokenStdout;

    impl Write for BrokenStdout {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test]
    fn test_confirm_clear_prompts_then_reads() {
        let mut out = Vec::new();
        assert!(confirm_clear(&mut out, &mut Cursor::new("y\n")).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "Clear all chat history? [y/N] ");
    }

    #[test]
    fn test_confirm_clear_reports_flush_failure() {
        let err = confirm_clear(&mut BrokenStdout, &mut Cursor::new("y\n")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_load_config_applies_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let config = load_config(&path, Some("http://10.0.0.5:5002")).unwrap();
        assert_eq!(config.server_url, "http://10.0.0.5:5002");

        let err = load_config(&path, Some("not a url")).unwrap_err();
        assert!(err.contains("Invalid server URL"));
    }

    #[test]
    fn test_load_config_reads_file_before_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"server_url": "http://dash.internal:5002", "ui": {"fade_ms": 150}}"#,
        )
        .unwrap();

        let config = load_config(&path, None).unwrap();
        assert_eq!(config.server_url, "http://dash.internal:5002");
        assert_eq!(config.ui.fade_ms, 150);

        let config = load_config(&path, Some("  ")).unwrap();
        assert_eq!(config.server_url, "http://dash.internal:5002");
    }
}
