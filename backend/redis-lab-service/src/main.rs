/// Redis Lab Service - HTTP Server
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use redis_lab_service::db::{self, PgProductRepository};
use redis_lab_service::logging::init_tracing;
use redis_lab_service::middleware::RequestLogging;
use redis_lab_service::{routes, Config, DataStructureStore, ProductService, RedisStore};
use std::sync::Arc;
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before reading configuration
    let _ = dotenvy::dotenv();

    let config = Config::from_env();
    init_tracing(&config.logging);

    info!(
        env = %config.app.env,
        redis = ?config.cache,
        "Starting redis-lab-service"
    );

    config.database.pool.log_config();
    let pool = db_pool::create_pool(&config.database.pool)
        .await
        .context("failed to create PostgreSQL pool")?;

    if config.database.run_migrations {
        db::run_migrations(&pool)
            .await
            .context("failed to run database migrations")?;
        info!("Database migrations applied");
    }

    let redis = redis_utils::connect(&config.cache).await?;
    info!("Connected to Redis");

    let store: Arc<dyn DataStructureStore> = Arc::new(RedisStore::new(redis));
    let store = web::Data::from(store);
    let products = web::Data::new(ProductService::new(Arc::new(PgProductRepository::new(
        pool.clone(),
    ))));
    let pool = web::Data::new(pool);

    let bind_address = config.bind_address();
    info!("HTTP server listening on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(store.clone())
            .app_data(products.clone())
            .app_data(pool.clone())
            .wrap(RequestLogging)
            .configure(routes::configure)
    })
    .shutdown_timeout(30)
    .bind(&bind_address)
    .with_context(|| format!("failed to bind {bind_address}"))?
    .run()
    .await
    .context("HTTP server terminated with an error")?;

    info!("redis-lab-service shut down");
    Ok(())
}
