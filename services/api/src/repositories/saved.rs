//! Saved-question collection of a user

use std::sync::Arc;

use common::database::Database;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{LogFailure, RepositoryError, RepositoryResult},
    invalidation::Revalidator,
    models::{
        content::{QuestionRow, QuestionSummary},
        user::User,
    },
    pagination::{PageRequest, Paginated},
    repositories::{QUESTION_COLUMNS, attach_tags, user::USER_COLUMNS, user::fetch_by_clerk_id},
    search::{SavedFilter, literal_pattern},
};

/// Query for a user's saved questions
#[derive(Debug, Clone)]
pub struct SavedQuestionsQuery {
    pub clerk_id: String,
    pub search: Option<String>,
    pub filter: SavedFilter,
    pub page: PageRequest,
}

/// Saved-question repository
#[derive(Clone)]
pub struct SavedQuestionRepository {
    db: Database,
    revalidator: Arc<dyn Revalidator>,
}

impl SavedQuestionRepository {
    pub fn new(db: Database, revalidator: Arc<dyn Revalidator>) -> Self {
        Self { db, revalidator }
    }

    /// Add the question to the user's saved set, or remove it if present.
    ///
    /// The membership test and the write happen in a single `UPDATE`, so
    /// concurrent toggles never leave a duplicate behind. Adding requires the
    /// question to exist; removing does not, so ids of deleted questions can
    /// still be dropped.
    pub async fn toggle_saved(
        &self,
        user_id: Uuid,
        question_id: Uuid,
        path: &str,
    ) -> RepositoryResult<User> {
        async {
            let pool = self.db.pool().await?;
            let updated = sqlx::query_as::<_, User>(&format!(
                r#"
                UPDATE users SET saved = CASE
                    WHEN $2 = ANY(saved) THEN array_remove(saved, $2)
                    ELSE array_append(saved, $2)
                END
                WHERE id = $1
                  AND ($2 = ANY(saved) OR EXISTS (SELECT 1 FROM questions WHERE id = $2))
                RETURNING {}
                "#,
                USER_COLUMNS
            ))
            .bind(user_id)
            .bind(question_id)
            .fetch_optional(pool)
            .await?;

            let user = match updated {
                Some(user) => user,
                None => {
                    let user_exists: bool =
                        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
                            .bind(user_id)
                            .fetch_one(pool)
                            .await?;
                    return Err(if user_exists {
                        RepositoryError::not_found("question", question_id)
                    } else {
                        RepositoryError::not_found("user", user_id)
                    });
                }
            };

            let saved = user.saved.contains(&question_id);
            info!(
                "Question {} {} saved set of user {}",
                question_id,
                if saved { "added to" } else { "removed from" },
                user_id
            );

            self.revalidator.revalidate(path);
            Ok::<_, RepositoryError>(user)
        }
        .await
        .log_failure("toggle saved question")
    }

    /// List the user's saved questions with search, sort and pagination.
    ///
    /// Saved ids whose question no longer exists are silently skipped.
    pub async fn list_saved(
        &self,
        query: &SavedQuestionsQuery,
    ) -> RepositoryResult<Paginated<QuestionSummary>> {
        async {
            let pool = self.db.pool().await?;
            let user = fetch_by_clerk_id(pool, &query.clerk_id)
                .await?
                .ok_or_else(|| RepositoryError::not_found("user", &query.clerk_id))?;

            if user.saved.is_empty() {
                return Ok(Paginated {
                    items: Vec::new(),
                    has_more: false,
                });
            }

            let pattern = literal_pattern(query.search.as_deref());
            let rows = sqlx::query_as::<_, QuestionRow>(&format!(
                r#"
                SELECT {}
                FROM questions q
                JOIN users u ON u.id = q.author_id
                WHERE q.id = ANY($1)
                  AND ($2::TEXT IS NULL OR q.title ~* $2)
                ORDER BY {}
                LIMIT $3 OFFSET $4
                "#,
                QUESTION_COLUMNS,
                query.filter.order_by()
            ))
            .bind(&user.saved)
            .bind(&pattern)
            .bind(query.page.lookahead_limit())
            .bind(query.page.skip())
            .fetch_all(pool)
            .await?;

            let (rows, has_more) = query.page.split_lookahead(rows);
            let items = attach_tags(pool, rows).await?;

            Ok::<_, RepositoryError>(Paginated { items, has_more })
        }
        .await
        .log_failure("list saved questions")
    }
}
