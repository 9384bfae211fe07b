use std::net::SocketAddr;

use clap::Parser;
use log::info;

use library_batch::web;

/// Serves the exposition routes.
#[derive(Parser)]
#[command(name = "serve", version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    info!("Listening on {}", args.bind);

    axum::serve(listener, web::router()).await?;

    Ok(())
}
