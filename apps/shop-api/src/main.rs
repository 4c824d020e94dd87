//! Shop API - e-commerce REST server

use axum_helpers::JwtAuth;
use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db =
        database::postgres::connect_from_config_with_retry(config.database.clone(), None).await?;
    info!("Connected to PostgreSQL");

    database::postgres::run_migrations::<migration::Migrator>(&db, "shop-api").await?;

    let jwt = JwtAuth::new(&config.jwt);

    let state = AppState {
        config: config.clone(),
        db,
        jwt,
    };

    let api_routes = api::routes(&state);
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router.merge(health_router(state.config.app.clone()));

    info!("Starting Shop API on port {}", state.config.server.port);

    create_production_app(app, &state.config.server, Duration::from_secs(30), async {
        info!("Shutting down: closing database connections");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Shop API shutdown complete");
    Ok(())
}
