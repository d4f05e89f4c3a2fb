//! Questions and answers authored by one user

use common::database::Database;
use uuid::Uuid;

use crate::{
    error::{LogFailure, RepositoryError, RepositoryResult},
    models::content::{AnswerRow, AnswerSummary, QuestionRow, QuestionSummary},
    pagination::{PageRequest, Paginated},
    repositories::{QUESTION_COLUMNS, attach_tags},
};

/// Content repository
#[derive(Clone)]
pub struct ContentRepository {
    db: Database,
}

impl ContentRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Questions by `user_id`, newest first, then most viewed, then most upvoted
    pub async fn user_questions(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> RepositoryResult<Paginated<QuestionSummary>> {
        async {
            let pool = self.db.pool().await?;

            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions WHERE author_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

            let rows = sqlx::query_as::<_, QuestionRow>(&format!(
                r#"
                SELECT {}
                FROM questions q
                JOIN users u ON u.id = q.author_id
                WHERE q.author_id = $1
                ORDER BY q.created_at DESC, q.views DESC, cardinality(q.upvotes) DESC, q.id
                LIMIT $2 OFFSET $3
                "#,
                QUESTION_COLUMNS
            ))
            .bind(user_id)
            .bind(page.limit())
            .bind(page.skip())
            .fetch_all(pool)
            .await?;

            let items = attach_tags(pool, rows).await?;
            Ok::<_, RepositoryError>(Paginated {
                items,
                has_more: page.has_more(total),
            })
        }
        .await
        .log_failure("list user questions")
    }

    /// Answers by `user_id`, most upvoted first
    pub async fn user_answers(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> RepositoryResult<Paginated<AnswerSummary>> {
        async {
            let pool = self.db.pool().await?;

            let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM answers WHERE author_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;

            let rows = sqlx::query_as::<_, AnswerRow>(
                r#"
                SELECT
                    a.id, a.content,
                    cardinality(a.upvotes)::BIGINT AS upvotes,
                    a.created_at,
                    u.id AS author_id, u.name AS author_name,
                    u.clerk_id AS author_clerk_id, u.picture AS author_picture,
                    q.id AS question_id, q.title AS question_title
                FROM answers a
                JOIN users u ON u.id = a.author_id
                JOIN questions q ON q.id = a.question_id
                WHERE a.author_id = $1
                ORDER BY cardinality(a.upvotes) DESC, a.created_at DESC, a.id
                LIMIT $2 OFFSET $3
                "#,
            )
            .bind(user_id)
            .bind(page.limit())
            .bind(page.skip())
            .fetch_all(pool)
            .await?;

            Ok::<_, RepositoryError>(Paginated {
                items: rows.into_iter().map(AnswerSummary::from).collect(),
                has_more: page.has_more(total),
            })
        }
        .await
        .log_failure("list user answers")
    }
}
