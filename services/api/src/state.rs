//! Application state shared across handlers

use std::sync::Arc;

use common::database::Database;

use crate::{
    badges::BadgeCriteria,
    invalidation::Revalidator,
    repositories::{
        ContentRepository, SavedQuestionRepository, StatsRepository, UserRepository,
        stats::ViewsSource,
    },
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub user_repository: UserRepository,
    pub saved_repository: SavedQuestionRepository,
    pub stats_repository: StatsRepository,
    pub content_repository: ContentRepository,
}

impl AppState {
    /// Wire every repository to the same store handle and revalidator
    pub fn new(
        db: Database,
        revalidator: Arc<dyn Revalidator>,
        criteria: BadgeCriteria,
        views_source: ViewsSource,
    ) -> Self {
        Self {
            user_repository: UserRepository::new(db.clone(), revalidator.clone()),
            saved_repository: SavedQuestionRepository::new(db.clone(), revalidator),
            stats_repository: StatsRepository::new(db.clone(), criteria, views_source),
            content_repository: ContentRepository::new(db.clone()),
            db,
        }
    }
}
