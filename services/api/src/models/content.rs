//! Question and answer projections returned by the listing queries

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Author fields expanded into a listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorRef {
    pub id: Uuid,
    pub name: String,
    pub clerk_id: String,
    pub picture: String,
}

/// Tag fields expanded into a listing
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct TagRef {
    pub id: Uuid,
    pub name: String,
}

/// Parent question of an answer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionRef {
    pub id: Uuid,
    pub title: String,
}

/// A question with its author and tags expanded
#[derive(Debug, Clone, Serialize)]
pub struct QuestionSummary {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub author: AuthorRef,
    pub tags: Vec<TagRef>,
    pub views: i32,
    pub upvotes: i64,
    pub answers: i64,
    pub created_at: DateTime<Utc>,
}

/// An answer with its author and parent question expanded
#[derive(Debug, Clone, Serialize)]
pub struct AnswerSummary {
    pub id: Uuid,
    pub content: String,
    pub author: AuthorRef,
    pub question: QuestionRef,
    pub upvotes: i64,
    pub created_at: DateTime<Utc>,
}

/// Flat question row as selected by the listing queries
#[derive(Debug, FromRow)]
pub(crate) struct QuestionRow {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<Uuid>,
    pub views: i32,
    pub upvotes: i64,
    pub answers: i64,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_clerk_id: String,
    pub author_picture: String,
}

impl QuestionRow {
    pub(crate) fn into_summary(self, tags: Vec<TagRef>) -> QuestionSummary {
        QuestionSummary {
            id: self.id,
            title: self.title,
            content: self.content,
            author: AuthorRef {
                id: self.author_id,
                name: self.author_name,
                clerk_id: self.author_clerk_id,
                picture: self.author_picture,
            },
            tags,
            views: self.views,
            upvotes: self.upvotes,
            answers: self.answers,
            created_at: self.created_at,
        }
    }
}

/// Flat answer row as selected by the listing queries
#[derive(Debug, FromRow)]
pub(crate) struct AnswerRow {
    pub id: Uuid,
    pub content: String,
    pub upvotes: i64,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_name: String,
    pub author_clerk_id: String,
    pub author_picture: String,
    pub question_id: Uuid,
    pub question_title: String,
}

impl From<AnswerRow> for AnswerSummary {
    fn from(row: AnswerRow) -> Self {
        AnswerSummary {
            id: row.id,
            content: row.content,
            author: AuthorRef {
                id: row.author_id,
                name: row.author_name,
                clerk_id: row.author_clerk_id,
                picture: row.author_picture,
            },
            question: QuestionRef {
                id: row.question_id,
                title: row.question_title,
            },
            upvotes: row.upvotes,
            created_at: row.created_at,
        }
    }
}
