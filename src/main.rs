use clap::Parser;
use coala_lib::cli::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    coala_lib::run(Cli::parse()).await
}
