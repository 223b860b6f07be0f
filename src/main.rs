//! Coaweb main entry point

use anyhow::Context;
use clap::Parser;
use coaweb_api::{start_server, AppState};
use coaweb_config::{Config, ConfigError};
use coaweb_core::Directory;
use coaweb_store::FileAccountStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "coaweb")]
#[command(version = "0.1.0")]
#[command(about = "A chart-of-accounts directory with folder browsing and tree search", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let loaded = Config::load(&args.config);
    let level = loaded
        .as_ref()
        .map(|c| c.logging.level.clone())
        .unwrap_or_else(|_| "info".to_string());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = match loaded {
        Ok(config) => config,
        Err(ConfigError::FileNotFound { path }) => {
            log::warn!("Config file {} not found, using defaults", path);
            Config::default()
        }
        Err(e) => {
            let details = e.to_details();
            return Err(anyhow::anyhow!("{}", details)).context("Failed to load configuration");
        }
    };

    let rt = Runtime::new()?;
    rt.block_on(async {
        let accounts_path = config.accounts_path();
        log::info!("Account store: {}", accounts_path.display());

        let store = Arc::new(
            FileAccountStore::open(&accounts_path, config.data.seed_default_chart)
                .await
                .with_context(|| format!("Failed to open account store {}", accounts_path.display()))?,
        );

        let mut directory = Directory::new(&config.directory);
        directory
            .refresh(store.as_ref(), store.as_ref())
            .await
            .context("Failed to load accounts")?;
        log::info!(
            "Loaded {} accounts ({} top level)",
            directory.forest().len(),
            directory.forest().roots().len()
        );

        let state = AppState::new(config, directory, store.clone(), store);
        start_server(state).await
    })
}
