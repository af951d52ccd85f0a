//! CLI command definitions for the `chatfolio` binary.
//!
//! Uses clap derive macros for argument parsing. Global flags select output
//! style and override values from `config.toml`; environment variables are
//! read through clap's `env` support.

pub mod project;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use secrecy::SecretString;

use chatfolio_types::config::ServerConfig;
use chatfolio_types::llm::CompletionMode;

/// Project-scoped chat with a language model.
#[derive(Parser)]
#[command(name = "chatfolio", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Data directory holding config.toml and the default database.
    #[arg(long, global = true, env = "CHATFOLIO_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// SQLite connection URL (overrides config.toml).
    #[arg(long, global = true, env = "CHATFOLIO_DATABASE_URL")]
    pub database_url: Option<String>,

    /// API key for the completion backend.
    #[arg(long, global = true, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of an OpenAI-compatible completion API.
    #[arg(long, global = true, env = "OPENAI_BASE_URL")]
    pub openai_base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server.
    Serve {
        /// Address to bind.
        #[arg(long, env = "CHATFOLIO_HOST")]
        host: Option<String>,

        /// Port to listen on.
        #[arg(short, long, env = "CHATFOLIO_PORT")]
        port: Option<u16>,

        /// How form submissions consume completions: blocking or streaming.
        #[arg(long)]
        page_mode: Option<CompletionMode>,
    },

    /// List projects.
    #[command(alias = "ls")]
    Projects,

    /// Create a new project.
    Create {
        /// Project name (at most 100 characters).
        name: String,
    },

    /// Print a project's conversation history.
    History {
        /// Project id.
        project_id: i64,
    },

    /// Estimate the tokens a message would use.
    Tokens {
        /// Message text.
        text: String,
    },

    /// Check the completion backend with a tiny request.
    Check,

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

impl Cli {
    /// Apply global and `serve` overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut ServerConfig) {
        if let Some(url) = &self.database_url {
            config.database_url = Some(url.clone());
        }
        if let Some(key) = &self.openai_api_key {
            config.completion.api_key = Some(SecretString::from(key.clone()));
        }
        if let Some(base_url) = &self.openai_base_url {
            config.completion.base_url = base_url.clone();
        }
        if let Commands::Serve {
            host,
            port,
            page_mode,
        } = &self.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(mode) = page_mode {
                config.completion.page_mode = *mode;
            }
        }
    }
}
