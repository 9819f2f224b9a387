use clap::Parser;
use tracing_subscriber::EnvFilter;

use pos_listmonk_sync::{run, Cli};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(_) => std::process::exit(1),
    }
}
