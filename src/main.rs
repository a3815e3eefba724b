use anyhow::Result;
use tutor_schedule::cli;

#[tokio::main]
async fn main() -> Result<()> {
    cli::run().await
}
