use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use afn::afn_config::{AfnConfig, LogFormat};

mod cmd;

#[derive(Parser)]
#[command(name = "afn")]
#[command(version, about = "Moderate add-forge-now requests from the terminal")]
pub struct Cli {
    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to afn.toml (defaults to $AFN_CONFIG, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Archive base URL, overrides config and $AFN_BASE_URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Print machine-readable JSON instead of formatted text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show a request with its history and possible decisions
    Show { id: i64 },
    /// Change the status of a request
    Moderate {
        id: i64,
        /// New status (e.g. ACCEPTED); prompts when omitted
        #[arg(short, long)]
        status: Option<String>,
        /// Comment stored in the request history
        #[arg(short, long)]
        comment: Option<String>,
    },
    /// Submit a new add-forge request
    Create {
        /// Forge type (gitlab, gitea, ...)
        #[arg(long = "type")]
        forge_type: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        contact_name: String,
        #[arg(long)]
        contact_email: String,
        #[arg(long)]
        comment: Option<String>,
        /// Forward your username to the forge administrators
        #[arg(long)]
        forward_username: bool,
    },
    /// List requests, one page at a time
    List {
        /// Moderator listing with contact and moderation columns
        #[arg(long)]
        moderation: bool,
        /// Only your own requests
        #[arg(long)]
        mine: bool,
        #[arg(short, long)]
        search: Option<String>,
        /// 1-based page number
        #[arg(short, long, default_value = "1")]
        page: u64,
        #[arg(long)]
        page_size: Option<u32>,
        /// Oldest submissions first
        #[arg(long)]
        oldest_first: bool,
    },
    /// Print the status transition table
    Transitions {
        /// Only print the entry of this status
        #[arg(short, long)]
        status: Option<String>,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default afn.toml file
    Init,
}

fn init_tracing(config: &AfnConfig) {
    let filter = if config.verbose {
        EnvFilter::new(config.log_level())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level()))
    };
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format() {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config =
        AfnConfig::load(cli.config.as_deref())?.with_cli_args(cli.base_url.clone(), cli.verbose);
    init_tracing(&config);

    match &cli.command {
        Commands::Show { id } => cmd::cmd_show(&config, *id, cli.json).await?,
        Commands::Moderate {
            id,
            status,
            comment,
        } => {
            cmd::cmd_moderate(
                &config,
                *id,
                status.as_deref(),
                comment.as_deref(),
                cli.json,
            )
            .await?
        }
        Commands::Create {
            forge_type,
            url,
            contact_name,
            contact_email,
            comment,
            forward_username,
        } => {
            let request = afn::NewForgeRequest {
                forge_type: forge_type.clone(),
                forge_url: url.clone(),
                forge_contact_name: contact_name.clone(),
                forge_contact_email: contact_email.clone(),
                forge_contact_comment: comment.clone(),
                submitter_forward_username: *forward_username,
            };
            cmd::cmd_create(&config, &request, cli.json).await?
        }
        Commands::List {
            moderation,
            mine,
            search,
            page,
            page_size,
            oldest_first,
        } => {
            let options = cmd::ListOptions {
                moderation: *moderation,
                mine: *mine,
                search: search.clone(),
                page: *page,
                page_size: *page_size,
                oldest_first: *oldest_first,
            };
            cmd::cmd_list(&config, &options, cli.json).await?
        }
        Commands::Transitions { status } => {
            cmd::cmd_transitions(status.as_deref(), cli.json)?
        }
        Commands::Config { command } => cmd::cmd_config(&config, command.clone())?,
    }

    Ok(())
}
