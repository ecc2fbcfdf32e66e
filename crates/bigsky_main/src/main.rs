use anyhow::Result;
use bigsky_main::{Cli, init_tracing, run};
use clap::Parser;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_format);

    let summary = run(cli).await?;
    if !summary.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
