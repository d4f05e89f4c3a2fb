//! Common library for the DevFlow application
//!
//! This crate provides the infrastructure shared by the services: the lazily
//! connected database handle, the Redis client used for cache invalidation,
//! and the infrastructure error type.
//!
//! ```rust,no_run
//! use common::database::{Database, DatabaseConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::new(DatabaseConfig::from_env()?);
//!     let is_healthy = db.health_check().await?;
//!     println!("Database health check: {}", is_healthy);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod database;
pub mod error;
