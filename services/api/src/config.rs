//! Service configuration

use std::{env, path::PathBuf};

use anyhow::{Context, Result};
use common::{cache::RedisConfig, database::DatabaseConfig};

use crate::{badges::BadgeCriteria, repositories::stats::ViewsSource};

/// Everything the service needs at startup
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Socket address to listen on
    pub bind_address: String,
    pub database: DatabaseConfig,
    /// Redis settings; `None` disables cross-process revalidation
    pub redis: Option<RedisConfig>,
    /// Channel on which stale paths are published
    pub revalidate_channel: String,
    pub badge_criteria: BadgeCriteria,
    pub views_source: ViewsSource,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `BIND_ADDRESS`: listen address (default: "0.0.0.0:3001")
    /// - `DATABASE_*`: see [`DatabaseConfig::from_env`]
    /// - `REDIS_URL`: enables Redis revalidation when set
    /// - `REVALIDATE_CHANNEL`: pub/sub channel (default: "devflow:revalidate")
    /// - `BADGE_CRITERIA_FILE`: optional threshold file
    /// - `STATS_VIEWS_SOURCE`: "questions" or "answers" (default: "questions")
    pub fn from_env() -> Result<Self> {
        let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3001".to_string());

        let database = DatabaseConfig::from_env()?;

        let redis = match env::var("REDIS_URL") {
            Ok(_) => Some(RedisConfig::from_env()?),
            Err(_) => None,
        };

        let revalidate_channel =
            env::var("REVALIDATE_CHANNEL").unwrap_or_else(|_| "devflow:revalidate".to_string());

        let criteria_file = env::var("BADGE_CRITERIA_FILE").ok().map(PathBuf::from);
        let badge_criteria = BadgeCriteria::load(criteria_file.as_deref())
            .context("Failed to load badge criteria")?;

        let views_source = match env::var("STATS_VIEWS_SOURCE") {
            Ok(value) => value.parse().map_err(anyhow::Error::msg)?,
            Err(_) => ViewsSource::default(),
        };

        Ok(AppConfig {
            bind_address,
            database,
            redis,
            revalidate_channel,
            badge_criteria,
            views_source,
        })
    }
}
