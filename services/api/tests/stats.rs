//! Contribution statistics and per-user listings against a live PostgreSQL.
//!
//! Run with `DATABASE_URL=... cargo test -- --ignored`.

mod support;

use devflow_api::{badges::BadgeCounts, error::RepositoryError, pagination::PageRequest};
use sqlx::PgPool;

use support::{app_state, insert_answer, insert_question, insert_tag, new_user};

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_stats_for_new_user_are_zero(pool: PgPool) -> anyhow::Result<()> {
    let (state, _) = app_state(pool);
    state.user_repository.create(&new_user("alice")).await?;

    let stats = state.stats_repository.user_stats("user_alice").await?;
    assert_eq!(stats.total_questions, 0);
    assert_eq!(stats.total_answers, 0);
    assert_eq!(stats.contributions.question_upvotes, 0);
    assert_eq!(stats.contributions.answer_upvotes, 0);
    assert_eq!(stats.contributions.total_views, 0);
    assert_eq!(stats.badge_counts, BadgeCounts::default());
    assert_eq!(stats.reputation, 0);
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_stats_sum_upvotes_per_collection(pool: PgPool) -> anyhow::Result<()> {
    let (state, _) = app_state(pool.clone());
    let alice = state.user_repository.create(&new_user("alice")).await?;
    let bob = state.user_repository.create(&new_user("bob")).await?;

    insert_question(&pool, alice, "First", 10, 2, &[]).await?;
    insert_question(&pool, alice, "Second", 20, 0, &[]).await?;
    insert_question(&pool, alice, "Third", 30, 1, &[]).await?;
    let bobs = insert_question(&pool, bob, "Bob's", 1_000, 9, &[]).await?;
    insert_answer(&pool, alice, bobs, 5).await?;

    let stats = state.stats_repository.user_stats("user_alice").await?;
    assert_eq!(stats.total_questions, 3);
    assert_eq!(stats.total_answers, 1);
    assert_eq!(stats.contributions.question_upvotes, 3);
    assert_eq!(stats.contributions.answer_upvotes, 5);
    assert_eq!(stats.contributions.total_views, 60);
    assert_eq!(stats.badge_counts, BadgeCounts::default());
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_stats_for_unknown_user_fail(pool: PgPool) -> anyhow::Result<()> {
    let (state, _) = app_state(pool);
    let err = state
        .stats_repository
        .user_stats("user_ghost")
        .await
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
    Ok(())
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires a running PostgreSQL instance"]
async fn test_user_questions_and_answers(pool: PgPool) -> anyhow::Result<()> {
    let (state, _) = app_state(pool.clone());
    let alice = state.user_repository.create(&new_user("alice")).await?;
    let bob = state.user_repository.create(&new_user("bob")).await?;
    let tag = insert_tag(&pool, "async").await?;

    let older = insert_question(&pool, alice, "Older", 5, 0, &[tag]).await?;
    sqlx::query("UPDATE questions SET created_at = now() - interval '1 day' WHERE id = $1")
        .bind(older)
        .execute(&pool)
        .await?;
    let newer = insert_question(&pool, alice, "Newer", 1, 0, &[]).await?;

    let page = state
        .content_repository
        .user_questions(alice, PageRequest::new(Some(1), Some(1), 10))
        .await?;
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].id, newer);
    assert!(page.has_more);

    let page = state
        .content_repository
        .user_questions(alice, PageRequest::new(Some(2), Some(1), 10))
        .await?;
    assert_eq!(page.items[0].id, older);
    assert_eq!(page.items[0].tags[0].name, "async");
    assert!(!page.has_more);

    let bobs = insert_question(&pool, bob, "Bob's question", 0, 0, &[]).await?;
    insert_answer(&pool, alice, bobs, 1).await?;
    let best = insert_answer(&pool, alice, bobs, 4).await?;

    let answers = state
        .content_repository
        .user_answers(alice, PageRequest::new(None, None, 10))
        .await?;
    assert_eq!(answers.items.len(), 2);
    assert_eq!(answers.items[0].id, best);
    assert_eq!(answers.items[0].upvotes, 4);
    assert_eq!(answers.items[0].question.title, "Bob's question");
    assert!(!answers.has_more);
    Ok(())
}
