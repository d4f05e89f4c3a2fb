//! User repository for database operations

use std::sync::Arc;

use common::database::Database;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::{LogFailure, RepositoryError, RepositoryResult},
    invalidation::Revalidator,
    models::user::{NewUser, UpdateUser, User},
    pagination::{PageRequest, Paginated},
    search::{UserFilter, literal_pattern},
    validation,
};

pub(crate) const USER_COLUMNS: &str = r#"
    id, clerk_id, name, username, email, bio, picture, location,
    portfolio_website, reputation, saved, joined_at
"#;

/// Query for the user directory
#[derive(Debug, Clone)]
pub struct UserListQuery {
    pub search: Option<String>,
    pub filter: UserFilter,
    pub page: PageRequest,
}

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    db: Database,
    revalidator: Arc<dyn Revalidator>,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(db: Database, revalidator: Arc<dyn Revalidator>) -> Self {
        Self { db, revalidator }
    }

    /// Find a user by the identity provider's id
    pub async fn find_by_clerk_id(&self, clerk_id: &str) -> RepositoryResult<Option<User>> {
        async {
            let pool = self.db.pool().await?;
            Ok::<_, RepositoryError>(fetch_by_clerk_id(pool, clerk_id).await?)
        }
        .await
        .log_failure("find user by clerk id")
    }

    /// Find a user by local id
    pub async fn find_by_id(&self, id: Uuid) -> RepositoryResult<Option<User>> {
        async {
            let pool = self.db.pool().await?;
            let user = sqlx::query_as::<_, User>(&format!(
                "SELECT {} FROM users WHERE id = $1",
                USER_COLUMNS
            ))
            .bind(id)
            .fetch_optional(pool)
            .await?;
            Ok::<_, RepositoryError>(user)
        }
        .await
        .log_failure("find user by id")
    }

    /// Create a new user, returning its local id
    pub async fn create(&self, new_user: &NewUser) -> RepositoryResult<Uuid> {
        async {
            validation::validate_new_user(new_user)?;
            info!("Creating new user: {}", new_user.username);

            let pool = self.db.pool().await?;
            let id: Uuid = sqlx::query_scalar(
                r#"
                INSERT INTO users (clerk_id, name, username, email, picture, bio, location, portfolio_website)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING id
                "#,
            )
            .bind(&new_user.clerk_id)
            .bind(&new_user.name)
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&new_user.picture)
            .bind(&new_user.bio)
            .bind(&new_user.location)
            .bind(&new_user.portfolio_website)
            .fetch_one(pool)
            .await?;

            Ok::<_, RepositoryError>(id)
        }
        .await
        .log_failure("create user")
    }

    /// Apply a partial update and revalidate `path`.
    ///
    /// Updating a user that does not exist is a no-op.
    pub async fn update(
        &self,
        clerk_id: &str,
        update: &UpdateUser,
        path: &str,
    ) -> RepositoryResult<()> {
        async {
            validation::validate_update(update)?;

            let pool = self.db.pool().await?;
            let result = sqlx::query(
                r#"
                UPDATE users SET
                    name = COALESCE($2, name),
                    username = COALESCE($3, username),
                    email = COALESCE($4, email),
                    bio = COALESCE($5, bio),
                    picture = COALESCE($6, picture),
                    location = COALESCE($7, location),
                    portfolio_website = COALESCE($8, portfolio_website)
                WHERE clerk_id = $1
                "#,
            )
            .bind(clerk_id)
            .bind(&update.name)
            .bind(&update.username)
            .bind(&update.email)
            .bind(&update.bio)
            .bind(&update.picture)
            .bind(&update.location)
            .bind(&update.portfolio_website)
            .execute(pool)
            .await?;

            if result.rows_affected() == 0 {
                warn!("Update matched no user for clerk id {}", clerk_id);
            }

            self.revalidator.revalidate(path);
            Ok::<_, RepositoryError>(())
        }
        .await
        .log_failure("update user")
    }

    /// Delete a user and everything they authored, returning the local id.
    ///
    /// Runs in one transaction: the user's answers, the user's questions
    /// (answers on them cascade) and the user row go together or not at all.
    pub async fn delete(&self, clerk_id: &str) -> RepositoryResult<Uuid> {
        async {
            let pool = self.db.pool().await?;
            let mut tx = pool.begin().await?;

            let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE clerk_id = $1 FOR UPDATE")
                .bind(clerk_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| RepositoryError::not_found("user", clerk_id))?;

            let answers = sqlx::query("DELETE FROM answers WHERE author_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

            let questions = sqlx::query("DELETE FROM questions WHERE author_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?
                .rows_affected();

            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            tx.commit().await?;

            info!(
                "Deleted user {} with {} questions and {} answers",
                clerk_id, questions, answers
            );
            Ok::<_, RepositoryError>(id)
        }
        .await
        .log_failure("delete user")
    }

    /// List users with search, sort and offset pagination
    pub async fn list(&self, query: &UserListQuery) -> RepositoryResult<Paginated<User>> {
        async {
            let pool = self.db.pool().await?;
            let pattern = literal_pattern(query.search.as_deref());

            let search_clause = r#"
                ($1::TEXT IS NULL
                 OR name ~* $1 OR username ~* $1 OR email ~* $1 OR bio ~* $1)
            "#;

            let users = sqlx::query_as::<_, User>(&format!(
                "SELECT {} FROM users WHERE {} ORDER BY {} LIMIT $2 OFFSET $3",
                USER_COLUMNS,
                search_clause,
                query.filter.order_by()
            ))
            .bind(&pattern)
            .bind(query.page.limit())
            .bind(query.page.skip())
            .fetch_all(pool)
            .await?;

            let total: i64 =
                sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users WHERE {}", search_clause))
                    .bind(&pattern)
                    .fetch_one(pool)
                    .await?;

            Ok::<_, RepositoryError>(Paginated {
                items: users,
                has_more: query.page.has_more(total),
            })
        }
        .await
        .log_failure("list users")
    }
}

pub(crate) async fn fetch_by_clerk_id(
    pool: &PgPool,
    clerk_id: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE clerk_id = $1",
        USER_COLUMNS
    ))
    .bind(clerk_id)
    .fetch_optional(pool)
    .await
}

