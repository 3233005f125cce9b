use anyhow::Context;
use authgate::{config::AppConfig, db, routes, AppState};
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("authgate=info,tower_http=info")),
        )
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;

    // Establish database connection pool
    let pool = db::establish_connection_pool(&config.database_url, config.database_tls)?;
    db::check_connection(&pool)
        .await
        .context("could not connect to the database")?;

    let state = AppState::new(
        Arc::new(db::PgUserStore::new(pool)),
        config.hasher,
        config.auth.clone(),
    );

    let app = routes::build_router(state)
        .layer(routes::build_cors_layer(config.cors_allowed_origins.as_deref()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
