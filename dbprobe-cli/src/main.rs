//! Binary entry point for the `dbprobe` command.

use clap::Parser;
use dbprobe_cli::{Cli, init_logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet)?;

    let output = cli.execute().await?;
    println!("{output}");
    Ok(())
}
