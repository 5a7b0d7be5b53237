//! dd-pagerduty - manage the Datadog PagerDuty integration declaratively.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use datadog_pagerduty::config::DEFAULT_HOST;
use datadog_pagerduty::{
    resource_schema, DatadogClient, DatadogConfig, IntegrationConfig, IntegrationReconciler,
    ResourceId,
};

/// dd-pagerduty - Reconcile the Datadog PagerDuty integration.
#[derive(Parser)]
#[command(name = "dd-pagerduty")]
#[command(about = "Create, read, update, delete and import the Datadog PagerDuty integration")]
struct Cli {
    #[command(flatten)]
    datadog: DatadogArgs,

    /// Enable verbose logging.
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Datadog connection flags.
#[derive(clap::Args)]
struct DatadogArgs {
    /// Datadog API key (or set `DATADOG_API_KEY` env var).
    #[arg(long, env = "DATADOG_API_KEY", default_value = "", hide_env_values = true)]
    api_key: String,

    /// Datadog application key (or set `DATADOG_APP_KEY` env var).
    #[arg(long, env = "DATADOG_APP_KEY", default_value = "", hide_env_values = true)]
    app_key: String,

    /// Datadog API host.
    #[arg(long, env = "DATADOG_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Request timeout in seconds (at least 1).
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resource schema as JSON.
    Schema,

    /// Check whether the integration exists.
    Exists {
        /// Resource id (subdomain).
        #[arg(long)]
        id: String,
    },

    /// Create the integration from a JSON or YAML config file.
    Create {
        /// Path to the config file.
        #[arg(long)]
        config: PathBuf,
    },

    /// Print the current remote state.
    Read {
        /// Resource id (subdomain).
        #[arg(long)]
        id: String,
    },

    /// Overwrite the integration with a config file.
    Update {
        /// Resource id (subdomain).
        #[arg(long)]
        id: String,

        /// Path to the config file.
        #[arg(long)]
        config: PathBuf,
    },

    /// Delete the integration.
    Delete {
        /// Resource id (subdomain).
        #[arg(long)]
        id: String,

        /// Skip confirmation prompt.
        #[arg(long, short = 'y', default_value = "false")]
        yes: bool,
    },

    /// Import an existing integration and print its state.
    Import {
        /// Resource id (subdomain).
        #[arg(long)]
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    run(&cli.datadog, cli.command).await
}

/// Build a reconciler talking to the Datadog API.
fn connect(args: &DatadogArgs) -> Result<IntegrationReconciler> {
    let config = DatadogConfig::new(&args.api_key, &args.app_key)
        .context("Datadog credentials are missing. Provide --api-key/--app-key or set the environment")?
        .with_host(&args.host)?
        .with_timeout(Duration::from_secs(args.timeout));

    let client = DatadogClient::new(config).context("Failed to create Datadog client")?;
    Ok(IntegrationReconciler::new(Arc::new(client)))
}

/// Execute one subcommand. Only commands that talk to Datadog need
/// credentials.
async fn run(args: &DatadogArgs, command: Commands) -> Result<()> {
    match command {
        Commands::Schema => print_schema()?,

        Commands::Exists { id } => {
            let exists = connect(args)?.exists(&resource_id(&id)?).await?;
            println!("{exists}");
        }

        Commands::Create { config } => {
            let desired = load_config(&config)?;
            let id = connect(args)?.create(&desired).await?;
            println!("\n✅ Integration created");
            println!("   ID: {id}");
        }

        Commands::Read { id } => {
            let state = connect(args)?.read(&resource_id(&id)?).await?;
            println!("{}", serde_json::to_string_pretty(&state)?);
        }

        Commands::Update { id, config } => {
            let desired = load_config(&config)?;
            let id = resource_id(&id)?;
            connect(args)?.update(&id, &desired).await?;
            println!("\n✅ Integration {id} updated");
        }

        Commands::Delete { id, yes } => {
            let id = resource_id(&id)?;
            if !yes {
                println!("⚠️  Are you sure you want to delete PagerDuty integration {id}?");
                println!("   This action cannot be undone.");
                println!("   Use --yes to skip this prompt.");
                return Ok(());
            }

            connect(args)?.delete(&id).await?;
            println!("\n✅ Integration {id} deleted");
        }

        Commands::Import { id } => {
            let id = resource_id(&id)?;
            let state = connect(args)?.import(&id).await?;
            info!(id = %id, "Imported integration");
            println!("{}", serde_json::to_string_pretty(&state)?);
        }
    }

    Ok(())
}

fn print_schema() -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&resource_schema())?);
    Ok(())
}

fn resource_id(raw: &str) -> Result<ResourceId> {
    ResourceId::new(raw).context("--id must not be blank")
}

/// Load a desired-state file. `.yaml`/`.yml` are parsed as YAML, anything
/// else as JSON.
fn load_config(path: &Path) -> Result<IntegrationConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let value: serde_json::Value = if is_yaml {
        serde_yaml::from_str(&raw).with_context(|| format!("Invalid YAML in {}", path.display()))?
    } else {
        serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))?
    };

    IntegrationConfig::from_value(value)
        .with_context(|| format!("Invalid configuration in {}", path.display()))
}
