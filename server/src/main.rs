use anyhow::Context;
use tokio::net::TcpListener;
use todo_server::{logging, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init().context("failed to initialize logging")?;

    let config = Config::from_env().context("invalid configuration")?;
    let addr = config.listen_addr();
    if config.cors.is_wildcard() {
        tracing::info!("CORS allows any origin");
    } else {
        tracing::info!(origins = config.cors.origins().len(), "CORS allow-list loaded");
    }

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    todo_server::run(listener, config.cors)
        .await
        .context("server error")
}
