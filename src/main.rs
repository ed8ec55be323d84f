use clap::Parser;
use waymark::cli::{run_cli, Cli};
use waymark::logging::{init_logging_with_config, LogConfig};

fn main() -> anyhow::Result<()> {
    init_logging_with_config(&LogConfig::from_env())?;
    run_cli(Cli::parse())
}
