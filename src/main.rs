use clap::Parser;
use givepool::cli::{self, Cli, Commands};
use givepool::config::AppConfig;
use givepool::error::{GivepoolError, Result};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { config_dir, json } => {
            let (config, fallback) = match AppConfig::load_from(&config_dir) {
                Ok(config) => (config, false),
                Err(_) => (AppConfig::default_config(), true),
            };
            init_logging(&config);
            if fallback {
                warn!("no configuration found in {config_dir}, using demo defaults");
            }
            if let Err(errors) = config.validate() {
                return Err(GivepoolError::Validation(errors.join("; ")));
            }
            cli::run_simulate(&config, json).await?;
        }
        Commands::Encode {
            vault,
            withdraw,
            amount,
        } => {
            init_logging_simple();
            cli::run_encode(vault, withdraw, amount)?;
        }
    }

    Ok(())
}

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    if config.logging.json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn init_logging_simple() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
