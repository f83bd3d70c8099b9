//! TCP server for the vote broadcaster.

use tracing::info;
use tracing_subscriber::EnvFilter;
use vote_server::config::Config;
use vote_server::server;

const DEFAULT_LOG_FILTER: &str = "vote_server=info,vote_core=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.json_logs);

    info!(
        addr = %config.socket_addr_string(),
        max_clients = config.max_clients,
        identity = %config.identity_mode,
        "vote-server v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    server::run(config).await
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
