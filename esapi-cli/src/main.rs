mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use esapi::{Client, ClientConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "esapi")]
#[command(about = "esapi - call Elasticsearch REST API actions")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.esapi/config.toml)
    #[arg(long, global = true, env = "ESAPI_CONFIG")]
    config: Option<PathBuf>,

    /// Cluster URL, overrides the config file
    #[arg(long, global = true, env = "ESAPI_URL")]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List known actions
    Actions {
        /// Only actions in this namespace (e.g. indices)
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Show method, paths and parameters of an action
    Describe {
        /// Action name, e.g. indices.flush
        action: String,
    },

    /// Run an action
    Call {
        /// Action name, e.g. indices.flush
        action: String,

        /// Argument as KEY=VALUE; VALUE is parsed as JSON when possible.
        /// Repeating a key builds a list.
        #[arg(short = 'a', long = "arg", value_name = "KEY=VALUE")]
        args: Vec<String>,

        /// JSON body file, or - for stdin
        #[arg(short, long)]
        body: Option<String>,

        /// Extra header as NAME:VALUE
        #[arg(short = 'H', long = "header", value_name = "NAME:VALUE")]
        headers: Vec<String>,

        /// Print the composed request instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => ClientConfig::load().context("Failed to load default config")?,
    };
    if let Some(url) = &cli.url {
        config.url = url.clone();
        config.validate().context("Invalid --url")?;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = Client::from_config(&config).context("Failed to create client")?;

    match cli.command {
        Commands::Actions { namespace } => {
            commands::run_actions(client.registry(), namespace.as_deref());
        }
        Commands::Describe { action } => {
            commands::run_describe(client.registry(), &action)?;
        }
        Commands::Call {
            action,
            args,
            body,
            headers,
            dry_run,
        } => {
            tracing::debug!("Calling {} against {}", action, config.url);
            commands::run_call(&client, &action, &args, body.as_deref(), &headers, dry_run).await?;
        }
    }

    Ok(())
}
