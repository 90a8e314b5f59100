use clap::Parser;
use mimalloc::MiMalloc;
use tracing::info;

use recount::cli::{Cli, dispatch};
use recount::config::Config;
use recount::utils::logging::init_tracing;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

// Lookups run strictly one at a time.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = Config::load(cli.config.as_deref())?;
    init_tracing(&cfg.basic.loglevel);

    info!(
        archive_path = %cfg.basic.archive_path.display(),
        loglevel = %cfg.basic.loglevel,
        fetch_timeout_secs = cfg.fetch.timeout_secs,
        fetch_max_attempts = cfg.fetch.max_attempts,
        fetch_proxy = %cfg.fetch.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        fetch_enable_multiplexing = cfg.fetch.enable_multiplexing,
        "Configuration loaded"
    );

    dispatch(cli, &cfg).await?;
    Ok(())
}
