//! chatfolio CLI and web server entry point.
//!
//! Binary name: `chatfolio`
//!
//! Parses CLI arguments, loads configuration, initializes database and
//! services, then dispatches to the appropriate command handler or starts
//! the web server.

mod cli;
mod http;
mod state;
#[cfg(test)]
mod testing;

use clap::Parser;
use clap_complete::generate;
use tracing_subscriber::EnvFilter;

use chatfolio_infra::config::{load_server_config, resolve_data_dir};
use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity; RUST_LOG wins when set
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,chatfolio=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "chatfolio", &mut std::io::stdout());
        return Ok(());
    }

    let data_dir = cli.data_dir.clone().unwrap_or_else(resolve_data_dir);
    let mut config = load_server_config(&data_dir).await;
    cli.apply_overrides(&mut config);

    // The backend check needs no database
    if let Commands::Check = &cli.command {
        return cli::project::check_provider(&config.completion, cli.json).await;
    }

    let state = AppState::init(&config, data_dir).await?;

    match cli.command {
        Commands::Projects => {
            cli::project::list_projects(&state, cli.json).await?;
        }

        Commands::Create { name } => {
            cli::project::create_project(&state, &name, cli.json).await?;
        }

        Commands::History { project_id } => {
            cli::project::show_history(&state, project_id, cli.json).await?;
        }

        Commands::Tokens { text } => {
            cli::project::count_tokens(&state, &text, cli.json).await?;
        }

        Commands::Serve { .. } => {
            let addr = format!("{}:{}", config.server.host, config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;

            if !cli.quiet {
                println!();
                println!(
                    "  {} chatfolio listening on {}",
                    console::style("▶").green().bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!(
                    "  {} model {} ({} page mode)",
                    console::style("•").dim(),
                    state.chat_service.completion().model(),
                    state.page_mode
                );
                println!();
            }
            tracing::info!(%addr, data_dir = %state.data_dir.display(), "Server starting");

            let db_pool = state.db_pool.clone();
            let router = http::router::build_router(state);
            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
            db_pool.close().await;

            println!("\n  Server stopped.");
        }

        Commands::Check | Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
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
                tracing::error!("Failed to install SIGTERM handler: {e}");
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
    tracing::info!("Shutdown signal received");
}
