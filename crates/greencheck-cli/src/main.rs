//! greencheck - green hosting checks from the command line

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    greencheck_cli::run().await
}
