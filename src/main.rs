use anyhow::Result;
use concierge::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
