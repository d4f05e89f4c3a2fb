use std::sync::Arc;

use anyhow::Result;
use common::{cache::RedisPool, database::Database};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use devflow_api::{
    MIGRATOR,
    config::AppConfig,
    invalidation::{NoopRevalidator, RedisRevalidator, Revalidator},
    routes,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting DevFlow API service");

    let config = AppConfig::from_env()?;

    // The handle connects lazily; the health check forces the first connection
    let db = Database::new(config.database.clone());
    if db.health_check().await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    db.migrate(&MIGRATOR).await?;

    let revalidator: Arc<dyn Revalidator> = match &config.redis {
        Some(redis_config) => {
            let redis = RedisPool::new(redis_config)?;
            if !redis.health_check().await.unwrap_or(false) {
                warn!("Redis is not reachable yet; revalidation signals may be lost");
            }
            Arc::new(RedisRevalidator::new(redis, config.revalidate_channel.clone()))
        }
        None => {
            warn!("REDIS_URL not set; revalidation signals are dropped");
            Arc::new(NoopRevalidator)
        }
    };

    let app_state = AppState::new(
        db,
        revalidator,
        config.badge_criteria.clone(),
        config.views_source,
    );

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("DevFlow API service listening on {}", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
