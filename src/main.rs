use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pvctl::command;
use pvctl::config::Config;
use pvctl::manifest::{KindRegistry, UnknownKindPolicy};
use pvctl::Provisioner;

#[derive(Parser)]
#[command(name = "pvctl")]
#[command(about = "Command line interface to the Provision API")]
struct Cli {
    /// Config file (default is $HOME/.pvctl.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Location of the Provision service
    #[arg(long, global = true)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply Provision Account, User and Asset objects from YAML files
    Apply {
        /// Source directory or yaml file to read from (repeatable)
        #[arg(short = 'f', long = "file", required = true)]
        files: Vec<PathBuf>,

        /// Fail on manifests with an unknown kind instead of skipping them
        #[arg(long)]
        strict: bool,
    },
}

/// Logs go to stderr; stdout only carries the command summary.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "pvctl=info".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = Config::resolve(cli.config.as_deref(), cli.backend)?;

    match cli.command {
        Commands::Apply { files, strict } => apply(&config, &files, strict).await,
    }
}

async fn apply(config: &Config, files: &[PathBuf], strict: bool) -> anyhow::Result<()> {
    let policy = if strict {
        UnknownKindPolicy::Reject
    } else {
        UnknownKindPolicy::Ignore
    };
    let provisioner = Provisioner::new(KindRegistry::default().with_unknown_policy(policy))?;

    command::apply(&provisioner, &config.backend, files, &mut std::io::stdout()).await?;
    Ok(())
}
