use anyhow::Context;
use clap::Parser;
use detonation_explorer::cli::{init_logging, run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref()).context("Could not start logging")?;
    run(cli)?;
    Ok(())
}
