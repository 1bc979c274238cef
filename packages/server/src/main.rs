use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use server::config::AppConfig;
use server::database::init_db;
use server::sandbox::{RuntimeMap, SandboxClient};
use server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = init_db(&config.database.url)
        .await
        .context("Failed to initialize database")?;

    let runtimes = RuntimeMap::new(config.sandbox.languages.clone());
    let sandbox = SandboxClient::new(
        config.sandbox.url.clone(),
        Duration::from_secs(config.sandbox.request_timeout_secs),
        runtimes.clone(),
    )
    .context("Failed to build sandbox client")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState {
        db,
        config: Arc::new(config),
        runtimes,
        sandbox: Arc::new(sandbox),
    };

    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
