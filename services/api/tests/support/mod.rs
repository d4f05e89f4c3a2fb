//! Fixtures shared by the database-backed tests

#![allow(dead_code)]

use std::sync::Arc;

use common::database::Database;
use devflow_api::{
    badges::BadgeCriteria,
    invalidation::{BroadcastRevalidator, Revalidator},
    models::user::NewUser,
    repositories::stats::ViewsSource,
    state::AppState,
};
use sqlx::PgPool;
use uuid::Uuid;

pub fn app_state(pool: PgPool) -> (AppState, BroadcastRevalidator) {
    let revalidator = BroadcastRevalidator::new(16);
    let shared: Arc<dyn Revalidator> = Arc::new(revalidator.clone());
    let state = AppState::new(
        Database::from_pool(pool),
        shared,
        BadgeCriteria::default(),
        ViewsSource::default(),
    );
    (state, revalidator)
}

pub fn new_user(handle: &str) -> NewUser {
    NewUser {
        clerk_id: format!("user_{}", handle),
        name: handle.to_string(),
        username: handle.to_string(),
        email: format!("{}@example.com", handle),
        picture: format!("https://img.example.com/{}.png", handle),
        bio: None,
        location: None,
        portfolio_website: None,
    }
}

pub async fn insert_tag(pool: &PgPool, name: &str) -> sqlx::Result<Uuid> {
    sqlx::query_scalar("INSERT INTO tags (name) VALUES ($1) RETURNING id")
        .bind(name)
        .fetch_one(pool)
        .await
}

/// Insert a question with `upvotes` distinct voters
pub async fn insert_question(
    pool: &PgPool,
    author_id: Uuid,
    title: &str,
    views: i32,
    upvotes: usize,
    tags: &[Uuid],
) -> sqlx::Result<Uuid> {
    let voters: Vec<Uuid> = (0..upvotes).map(|_| Uuid::new_v4()).collect();
    sqlx::query_scalar(
        r#"
        INSERT INTO questions (title, content, author_id, views, upvotes, tags)
        VALUES ($1, 'body', $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(title)
    .bind(author_id)
    .bind(views)
    .bind(&voters)
    .bind(tags)
    .fetch_one(pool)
    .await
}

/// Insert an answer with `upvotes` distinct voters
pub async fn insert_answer(
    pool: &PgPool,
    author_id: Uuid,
    question_id: Uuid,
    upvotes: usize,
) -> sqlx::Result<Uuid> {
    let voters: Vec<Uuid> = (0..upvotes).map(|_| Uuid::new_v4()).collect();
    sqlx::query_scalar(
        r#"
        INSERT INTO answers (content, author_id, question_id, upvotes)
        VALUES ('answer', $1, $2, $3)
        RETURNING id
        "#,
    )
    .bind(author_id)
    .bind(question_id)
    .bind(&voters)
    .fetch_one(pool)
    .await
}
