//! Parley CLI and REST API entry point.
//!
//! Binary name: `parley`
//!
//! Loads `.env`, parses CLI arguments, initializes tracing and services, then
//! dispatches to the command handler or starts the REST API server.

mod cli;
mod env_loader;
mod http;
mod state;

use clap::Parser;
use secrecy::SecretString;

use cli::{Cli, Commands};
use parley_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};
use state::{AppState, StartupOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before parsing so `.env` values feed clap's `env` fallbacks
    let dotenv = env_loader::load_dotenv();
    let cli = Cli::parse();

    init_tracing(
        &TracingOptions::new(cli.log_filter())
            .format(cli.log_format)
            .otel(cli.otel),
    )?;
    dotenv.log();

    let options = StartupOptions {
        api_key: cli
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .map(SecretString::from),
        model: cli.model.clone(),
        base_url: cli.base_url.clone(),
        ephemeral: cli.ephemeral,
    };
    let state = AppState::init(options).await?;

    let result = run(cli, state).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli, state: AppState) -> anyhow::Result<()> {
    match cli.command {
        Commands::History => {
            cli::history::show_history(&state, cli.json).await?;
        }

        Commands::Send { text } => {
            cli::send::send_message(&state, &text, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            tracing::info!(
                %addr,
                provider = state.chat_service.provider_name(),
                model = state.chat_service.model(),
                store = %state.chat_service.store().describe(),
                credential = state.has_credential,
                "Parley API listening"
            );
            if !state.has_credential {
                tracing::warn!("OPENAI_API_KEY is not set; every reply will be a fallback");
            }

            if !cli.quiet {
                println!(
                    "  {} Parley API listening on {}",
                    console::style("⚡").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!(
                    "  {}",
                    console::style(format!("Data directory: {}", state.data_dir.display())).dim()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let web_dir = http::router::web_dir_from_env();
            let router = http::router::build_router(state, web_dir.as_deref());
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            tracing::info!("Server stopped");
        }
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// If a handler cannot be installed, that signal source is ignored.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, finishing in-flight requests");
}
