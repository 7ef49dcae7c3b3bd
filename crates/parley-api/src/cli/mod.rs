//! CLI command definitions for the `parley` binary.
//!
//! Uses clap derive macros for argument parsing. Provider settings given on
//! the command line or in the environment override `config.toml`.

pub mod history;
pub mod send;

use clap::{Parser, Subcommand};
use parley_observe::tracing_setup::LogFormat;

/// Single-conversation chat service with a durable transcript.
#[derive(Parser)]
#[command(name = "parley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format on stderr: `text` or `json`.
    #[arg(long, env = "PARLEY_LOG_FORMAT", global = true, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Also export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    /// Keep the transcript in memory only; nothing is written to disk.
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Credential for the completion provider.
    #[arg(long, env = "OPENAI_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Model override.
    #[arg(long, env = "PARLEY_MODEL", global = true)]
    pub model: Option<String>,

    /// Base URL of an OpenAI-compatible API (e.g. a local proxy).
    #[arg(long, env = "PARLEY_PROVIDER_BASE_URL", global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve {
        /// Port to listen on.
        #[arg(long, env = "PORT", default_value_t = 5000)]
        port: u16,

        /// Host address to bind to.
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },

    /// Print the stored conversation.
    #[command(alias = "log")]
    History,

    /// Send one message and print the reply.
    Send {
        /// Message text.
        text: String,
    },
}

impl Cli {
    /// Default log filter for the chosen verbosity; `RUST_LOG` takes precedence.
    pub fn log_filter(&self) -> &'static str {
        let serving = matches!(self.command, Commands::Serve { .. });
        match self.verbose {
            0 if self.quiet => "error",
            0 if serving => "info",
            0 => "warn",
            1 => "info,parley=debug",
            _ => "trace",
        }
    }
}
