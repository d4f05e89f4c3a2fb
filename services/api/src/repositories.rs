//! Repositories for database operations

use std::collections::HashMap;

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::content::{QuestionRow, QuestionSummary, TagRef};

pub mod content;
pub mod saved;
pub mod stats;
pub mod user;

pub use content::ContentRepository;
pub use saved::SavedQuestionRepository;
pub use stats::StatsRepository;
pub use user::UserRepository;

/// Columns selected for a question listing. The query must alias
/// `questions` as `q` and join the author as `u`.
pub(crate) const QUESTION_COLUMNS: &str = r#"
    q.id, q.title, q.content, q.tags, q.views,
    cardinality(q.upvotes)::BIGINT AS upvotes,
    (SELECT COUNT(*) FROM answers a WHERE a.question_id = q.id) AS answers,
    q.created_at,
    u.id AS author_id, u.name AS author_name,
    u.clerk_id AS author_clerk_id, u.picture AS author_picture
"#;

/// Expand the tag references of a page of questions.
///
/// Tags that no longer exist are skipped.
pub(crate) async fn attach_tags(
    pool: &PgPool,
    rows: Vec<QuestionRow>,
) -> Result<Vec<QuestionSummary>, sqlx::Error> {
    let mut tag_ids: Vec<Uuid> = rows.iter().flat_map(|r| r.tags.iter().copied()).collect();
    tag_ids.sort_unstable();
    tag_ids.dedup();

    let tags: HashMap<Uuid, TagRef> = if tag_ids.is_empty() {
        HashMap::new()
    } else {
        sqlx::query_as::<_, TagRef>("SELECT id, name FROM tags WHERE id = ANY($1)")
            .bind(&tag_ids)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(|tag| (tag.id, tag))
            .collect()
    };

    Ok(rows
        .into_iter()
        .map(|row| {
            let expanded = row
                .tags
                .iter()
                .filter_map(|id| tags.get(id).cloned())
                .collect();
            row.into_summary(expanded)
        })
        .collect())
}
