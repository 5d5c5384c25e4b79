use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use edgeai::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "edgeai=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            model,
        } => {
            edgeai::cli::serve(config, host, port, model).await?;
        }
        Commands::Run { model, input } => {
            edgeai::cli::run(model, input).await?;
        }
        Commands::Info { model } => {
            edgeai::cli::info(model).await?;
        }
        Commands::List { verbose } => {
            edgeai::cli::list(verbose).await?;
        }
    }

    Ok(())
}
