//! DevFlow API service
//!
//! Data access for the question-and-answer community: user records, saved
//! questions, per-user listings and the contribution statistics behind
//! profile badges, served over HTTP.

pub mod badges;
pub mod config;
pub mod error;
pub mod invalidation;
pub mod models;
pub mod pagination;
pub mod repositories;
pub mod routes;
pub mod search;
pub mod state;
pub mod validation;

/// Embedded schema migrations
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
