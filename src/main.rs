use anyhow::Context;
use clap::Parser;
use synoptic_processor::cli::{run, Cli};
use synoptic_processor::utils::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_file.as_deref()).context("failed to initialise logging")?;

    run(cli).await?;
    Ok(())
}
