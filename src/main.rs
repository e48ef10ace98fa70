use clap::Parser;
use edge_dashboard::cli::{run, Cli};
use edge_dashboard::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
