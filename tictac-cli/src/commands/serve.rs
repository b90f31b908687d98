//! `tictac serve` - run the coordination server

use anyhow::Result;
use clap::Args;
use tictac_server::{ServerConfig, TictacServer};

#[derive(Args)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = 3000)]
    port: u16,
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let config = ServerConfig::new(args.host, args.port);
    tracing::info!("starting tictac server on {}", config.addr());

    TictacServer::new(config).run().await?;
    Ok(())
}
