mod cli;

use anyhow::Context;
use clap::Parser;
use fg_core::init_logging;
use tracing::info;

use crate::cli::{handle_command, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logger = init_logging();
    let cli = Cli::parse();
    let config = cli.sampler_config()?;

    let store = fg_storage::create_storage(cli.storage.as_str(), cli.db.as_deref())
        .await
        .with_context(|| format!("Failed to initialize {} storage", cli.storage))?;
    info!("💾 Storage ready ({} events)", store.count_events().await?);

    handle_command(cli.command, store, config, &logger).await
}
