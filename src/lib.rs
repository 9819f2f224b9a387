pub mod config;
pub mod contract;
pub mod listmonk;
pub mod load_config;
pub mod normalise;
pub mod pos;
pub mod synchronise;

use anyhow::Result;
use clap::{Parser, Subcommand};

use listmonk::ListmonkClient;
use load_config::load_config;
use pos::EdgeservClient;
use synchronise::synchronise;

/// CLI for pos-listmonk-sync: reconcile a POS customer roster into a
/// listmonk subscriber list.
#[derive(Parser)]
#[clap(
    name = "pos-listmonk-sync",
    version,
    about = "Synchronise POS customer records into a listmonk subscriber list"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one full synchronisation pass using configuration from the environment
    Sync,
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Sync => {
            let config = load_config()?;
            let pos = EdgeservClient::new(config.pos);
            let mailing_list = ListmonkClient::new(&config.listmonk);

            println!("Synchronise starting...");
            match synchronise(&pos, &mailing_list).await {
                Ok(report) => {
                    println!("Synchronise complete.\nReport:");
                    println!("{:#?}", report);
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] Synchronisation failed: {}", e);
                    Err(anyhow::Error::msg(e))
                }
            }
        }
    }
}
