use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use site_server::{router, SiteState};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Static host for the Banjir Bali story")]
struct Args {
    /// Built site (index.html, pkg/, locales/)
    #[arg(long, env = "SITE_ROOT", default_value = "site")]
    root: PathBuf,

    /// Directory holding the GeoJSON datasets served under /data
    #[arg(long, env = "SITE_DATA_ROOT", default_value = "data")]
    data_root: PathBuf,

    #[arg(long, env = "SITE_ADDR", default_value = "127.0.0.1:8080")]
    addr: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let app = router(SiteState {
        site_root: args.root.clone(),
        data_root: args.data_root.clone(),
    });

    info!(
        "site server listening on http://{} (site {:?}, data {:?})",
        args.addr, args.root, args.data_root
    );
    let listener = tokio::net::TcpListener::bind(args.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
