use std::net::SocketAddr;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use spotlight_server::config::AppConfig;
use spotlight_server::state::AppState;
use spotlight_server::{build_router, database, seed};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,tower_http=info")),
        )
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    let db = database::init_db(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    seed::seed_role_permissions(&db)
        .await
        .context("Failed to seed roles")?;
    seed::ensure_indexes(&db)
        .await
        .context("Failed to create indexes")?;
    if seed::bootstrap_admin(&db, &config.bootstrap).await? {
        info!("Administrator account created from bootstrap configuration");
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server.host/server.port")?;

    let app = build_router(AppState { db, config });

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    info!("API docs at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
