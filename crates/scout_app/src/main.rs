use anyhow::Result;
use clap::Parser;
use scout_app::config::{Cli, ClientConfig};
use scout_logging::scout_info;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = ClientConfig::load(cli.config.as_deref())?.with_overrides(&cli);

    scout_logging::initialize(&config.log.destination(), config.log.level()?);
    let download_dir = config.download_dir_for(chrono::Local::now());
    scout_info!(
        "Starting scout against {} (downloads in {})",
        config.server,
        download_dir.display()
    );

    scout_app::app::run(&config, download_dir)
}
