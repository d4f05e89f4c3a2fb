//! Contribution totals and badge tallies

use std::str::FromStr;

use common::database::Database;
use tracing::debug;
use uuid::Uuid;

use crate::{
    badges::BadgeCriteria,
    error::{LogFailure, RepositoryError, RepositoryResult},
    models::user::{ContributionTotals, UserStats},
    repositories::user::fetch_by_clerk_id,
};

/// Collection whose view counters feed the `TOTAL_VIEWS` criterion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewsSource {
    /// Views on the user's questions
    #[default]
    Questions,
    /// Views summed over the user's answers. Answers carry no view
    /// counter, so this always totals zero.
    Answers,
}

impl FromStr for ViewsSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "questions" => Ok(ViewsSource::Questions),
            "answers" => Ok(ViewsSource::Answers),
            other => Err(format!("unknown views source: {}", other)),
        }
    }
}

/// Stats repository
#[derive(Clone)]
pub struct StatsRepository {
    db: Database,
    criteria: BadgeCriteria,
    views_source: ViewsSource,
}

impl StatsRepository {
    pub fn new(db: Database, criteria: BadgeCriteria, views_source: ViewsSource) -> Self {
        Self {
            db,
            criteria,
            views_source,
        }
    }

    /// Profile statistics and badge tally for a user
    pub async fn user_stats(&self, clerk_id: &str) -> RepositoryResult<UserStats> {
        async {
            let pool = self.db.pool().await?;
            let user = fetch_by_clerk_id(pool, clerk_id)
                .await?
                .ok_or_else(|| RepositoryError::not_found("user", clerk_id))?;

            let mut totals = sqlx::query_as::<_, ContributionTotals>(
                r#"
                SELECT
                    (SELECT COUNT(*) FROM questions WHERE author_id = $1) AS question_count,
                    (SELECT COUNT(*) FROM answers WHERE author_id = $1) AS answer_count,
                    (SELECT COALESCE(SUM(cardinality(upvotes)), 0)::BIGINT
                       FROM questions WHERE author_id = $1) AS question_upvotes,
                    (SELECT COALESCE(SUM(cardinality(upvotes)), 0)::BIGINT
                       FROM answers WHERE author_id = $1) AS answer_upvotes,
                    0::BIGINT AS total_views
                "#,
            )
            .bind(user.id)
            .fetch_one(pool)
            .await?;

            totals.total_views = self.total_views(pool, user.id).await?;
            debug!("Contribution totals for {}: {:?}", clerk_id, totals);

            Ok::<_, RepositoryError>(UserStats {
                total_questions: totals.question_count,
                total_answers: totals.answer_count,
                badge_counts: totals.badges(&self.criteria),
                reputation: user.reputation,
                contributions: totals,
                user,
            })
        }
        .await
        .log_failure("compute user stats")
    }

    async fn total_views(&self, pool: &sqlx::PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        match self.views_source {
            ViewsSource::Questions => {
                sqlx::query_scalar(
                    "SELECT COALESCE(SUM(views), 0)::BIGINT FROM questions WHERE author_id = $1",
                )
                .bind(user_id)
                .fetch_one(pool)
                .await
            }
            ViewsSource::Answers => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_views_source_from_str() {
        assert_eq!("questions".parse(), Ok(ViewsSource::Questions));
        assert_eq!("Answers".parse(), Ok(ViewsSource::Answers));
        assert!("tags".parse::<ViewsSource>().is_err());
        assert_eq!(ViewsSource::default(), ViewsSource::Questions);
    }
}
