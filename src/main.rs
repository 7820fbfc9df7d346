use clap::Parser;
use ndvi_importer::cli::{run, Cli};
use ndvi_importer::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
