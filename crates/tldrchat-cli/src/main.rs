//! tldrchat CLI: chat with the reply service from the terminal

mod logging;

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tldrchat_engine::{
    run_send, ChatSession, Config, HttpReplyClient, LifecycleObserver, Message, SendOutcome,
    DEFAULT_CONFIG_PATH,
};
use tracing::{error, info};

/// Chat client with a typewriter reveal of every reply
#[derive(Parser, Debug)]
#[command(name = "tldrchat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the reply service URL
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Override the request timeout, in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Open the chat TUI (default when no command specified)
    Tui,

    /// Send one message and print the reply
    Ask {
        /// The message to send, exactly as given
        message: String,

        /// Print the reply at once instead of revealing it
        #[arg(long)]
        no_animate: bool,

        /// Print the resulting conversation as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Load the config file and apply command-line overrides.
    fn load_config(&self) -> Result<Config, tldrchat_engine::ConfigError> {
        let mut config = Config::load_or_default(&self.config)?;
        if let Some(endpoint) = &self.endpoint {
            config.endpoint.clone_from(endpoint);
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = Some(timeout);
        }
        Ok(config)
    }

    /// Directory that holds the config file; exports go here too.
    fn data_dir(&self) -> PathBuf {
        match self.config.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match &cli.command {
        None | Some(Commands::Tui) => cmd_tui(&cli, &config),
        Some(Commands::Ask {
            message,
            no_animate,
            json,
        }) => cmd_ask(&config, message, *no_animate, *json),
        Some(Commands::Init { force }) => cmd_init(&cli.config, &config, *force),
    }
}

fn runtime() -> io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread().enable_all().build()
}

fn cmd_tui(cli: &Cli, config: &Config) -> ExitCode {
    let _log_guard = match logging::init_file(&config.log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: file logging disabled: {e}");
            None
        }
    };

    let service = match HttpReplyClient::from_config(config) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let rt = match runtime() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = rt.block_on(tldrchat_tui::run_tui(config, service, cli.data_dir())) {
        error!(error = %e, "tui exited with an error");
        eprintln!("Error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn cmd_ask(config: &Config, message: &str, no_animate: bool, json: bool) -> ExitCode {
    logging::init_stderr();

    let client = match HttpReplyClient::from_config(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let rt = match runtime() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create tokio runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut session = ChatSession::new();
    let mut input = message.to_string();
    let stdout = io::stdout();
    // JSON output replaces the live reveal.
    let mut printer = ReplyPrinter::new(stdout.lock(), !no_animate && !json);

    let outcome = rt.block_on(run_send(
        &mut session,
        &client,
        &mut input,
        config.reveal_interval(),
        &mut printer,
    ));

    let code = match outcome {
        SendOutcome::Ignored => {
            eprintln!("Nothing to send: message is empty");
            return ExitCode::FAILURE;
        }
        // A fresh session never has a send in flight.
        SendOutcome::Busy => ExitCode::FAILURE,
        SendOutcome::Replied => ExitCode::SUCCESS,
        SendOutcome::Failed(e) => {
            error!(error = %e, endpoint = %config.endpoint, "reply request failed");
            ExitCode::FAILURE
        }
    };

    if json {
        match serde_json::to_string_pretty(session.store()) {
            Ok(text) => println!("{text}"),
            Err(e) => {
                eprintln!("Failed to serialize conversation: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else if let Err(e) = printer.finish() {
        eprintln!("Failed to write output: {e}");
        return ExitCode::FAILURE;
    }

    code
}

fn cmd_init(config_path: &Path, config: &Config, force: bool) -> ExitCode {
    if config_path.exists() && !force {
        println!("Config already exists at {}", config_path.display());
        return ExitCode::SUCCESS;
    }

    if let Err(e) = config.save(config_path) {
        eprintln!("Failed to write {}: {e}", config_path.display());
        return ExitCode::FAILURE;
    }

    info!(path = %config_path.display(), "config written");
    println!("Wrote config to {}", config_path.display());
    println!("  Endpoint: {}", config.endpoint);
    println!("  Reveal interval: {}ms", config.reveal_interval_ms);
    ExitCode::SUCCESS
}

/// Prints the bot turn of a headless send.
///
/// When animating, each frame only adds its new suffix to what is already
/// on screen. Otherwise the committed text is printed once.
struct ReplyPrinter<W: Write> {
    out: W,
    animate: bool,
    shown: usize,
    committed: Option<Message>,
    error: Option<io::Error>,
}

impl<W: Write> ReplyPrinter<W> {
    fn new(out: W, animate: bool) -> Self {
        Self {
            out,
            animate,
            shown: 0,
            committed: None,
            error: None,
        }
    }

    fn write_now(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        let result = self
            .out
            .write_all(text.as_bytes())
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            self.error = Some(e);
        }
    }

    /// Print whatever was not shown yet and end the line.
    fn finish(mut self) -> io::Result<()> {
        if let Some(message) = self.committed.take() {
            let rest = message.text().get(self.shown..).unwrap_or_default().to_string();
            self.write_now(&rest);
            self.write_now("\n");
        }
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl<W: Write> LifecycleObserver for ReplyPrinter<W> {
    fn on_frame(&mut self, prefix: &str) {
        if !self.animate {
            return;
        }
        if let Some(suffix) = prefix.get(self.shown..) {
            let suffix = suffix.to_string();
            self.write_now(&suffix);
            self.shown = prefix.len();
        }
    }

    fn on_committed(&mut self, message: &Message) {
        self.committed = Some(message.clone());
    }
}
