use std::sync::Arc;

use clap::Parser;
use content::ContentDb;
use content::server::{CliArgs, ContentServer, ContentServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = CliArgs::parse();
    let config = args.to_content_config();
    tracing::info!(data = ?config.data, uploads = ?config.uploads, "opening content store");

    let db = Arc::new(ContentDb::open(config).await?);
    let server = ContentServer::new(db, ContentServerConfig::from(&args));
    server.run().await?;
    Ok(())
}
