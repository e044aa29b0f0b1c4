//! Server bootstrap: env config, pool, table DDL, routes.

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use storefront::store::{ensure_tables, PgStore};
use storefront::{api_routes, common_routes_with_ready, AppState};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("storefront=info")),
        )
        .init();

    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "postgres://localhost/storefront".into());
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;
    ensure_tables(&pool).await?;

    let session_ttl_secs: i64 = std::env::var("SESSION_TTL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3600);

    let store = Arc::new(PgStore::new(pool.clone()));
    let state = AppState::new(
        store.clone(),
        store,
        chrono::Duration::seconds(session_ttl_secs),
    );

    let app = Router::new()
        .merge(common_routes_with_ready(pool))
        .nest("/api", api_routes(state))
        .layer(CorsLayer::permissive());

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into());
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
