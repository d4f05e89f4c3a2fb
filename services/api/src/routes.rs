//! API service routes

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::{ApiError, ApiResult},
    models::{
        identity::IdentityEvent,
        user::{NewUser, UpdateUser},
    },
    pagination::PageRequest,
    repositories::{saved::SavedQuestionsQuery, user::UserListQuery},
    search::{SavedFilter, UserFilter},
    state::AppState,
};

const USERS_PAGE_SIZE: u32 = 20;
const SAVED_PAGE_SIZE: u32 = 20;
const CONTENT_PAGE_SIZE: u32 = 10;

/// Query parameters shared by the listing endpoints
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub filter: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Body of an update request
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(flatten)]
    pub fields: UpdateUser,
    /// Page to revalidate once the update is stored
    pub path: Option<String>,
}

/// Body of a save/unsave request
#[derive(Debug, Deserialize)]
pub struct ToggleSavedRequest {
    pub question_id: Uuid,
    pub path: Option<String>,
}

/// Create the router for the API service
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:clerk_id",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/users/:clerk_id/stats", get(get_user_stats))
        .route("/users/:clerk_id/saved", get(list_saved))
        .route("/users/by-id/:id/saved", post(toggle_saved))
        .route("/users/by-id/:id/questions", get(list_user_questions))
        .route("/users/by-id/:id/answers", get(list_user_answers))
        .route("/webhooks/identity", post(identity_webhook))
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "devflow-api"
    }))
}

fn profile_path(clerk_id: &str) -> String {
    format!("/profile/{}", clerk_id)
}

/// List users
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<impl IntoResponse> {
    let query = UserListQuery {
        search: params.q,
        filter: UserFilter::from_param(params.filter.as_deref()),
        page: PageRequest::new(params.page, params.page_size, USERS_PAGE_SIZE),
    };

    let users = state.user_repository.list(&query).await?;
    Ok(Json(users))
}

/// Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<NewUser>,
) -> ApiResult<impl IntoResponse> {
    let id = state.user_repository.create(&payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

/// Get a user by identity-provider id
pub async fn get_user(
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let user = state
        .user_repository
        .find_by_clerk_id(&clerk_id)
        .await?
        .ok_or_else(|| crate::error::RepositoryError::not_found("user", &clerk_id))?;

    Ok(Json(user))
}

/// Update a user's profile
pub async fn update_user(
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    if payload.fields.is_empty() {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    let path = payload.path.unwrap_or_else(|| profile_path(&clerk_id));
    state
        .user_repository
        .update(&clerk_id, &payload.fields, &path)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Delete a user and their content
pub async fn delete_user(
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = state.user_repository.delete(&clerk_id).await?;
    Ok(Json(json!({ "id": id })))
}

/// Profile statistics and badges
pub async fn get_user_stats(
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let stats = state.stats_repository.user_stats(&clerk_id).await?;
    Ok(Json(stats))
}

/// List a user's saved questions
pub async fn list_saved(
    State(state): State<AppState>,
    Path(clerk_id): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<impl IntoResponse> {
    let query = SavedQuestionsQuery {
        clerk_id,
        search: params.q,
        filter: SavedFilter::from_param(params.filter.as_deref()),
        page: PageRequest::new(params.page, params.page_size, SAVED_PAGE_SIZE),
    };

    let saved = state.saved_repository.list_saved(&query).await?;
    Ok(Json(saved))
}

/// Save or unsave a question
pub async fn toggle_saved(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ToggleSavedRequest>,
) -> ApiResult<impl IntoResponse> {
    let path = payload.path.as_deref().unwrap_or("/collection");
    let user = state
        .saved_repository
        .toggle_saved(id, payload.question_id, path)
        .await?;

    Ok(Json(json!({
        "saved": user.saved.contains(&payload.question_id),
        "user": user,
    })))
}

/// Questions authored by a user
pub async fn list_user_questions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> ApiResult<impl IntoResponse> {
    let page = PageRequest::new(params.page, params.page_size, CONTENT_PAGE_SIZE);
    let questions = state.content_repository.user_questions(id, page).await?;
    Ok(Json(questions))
}

/// Answers authored by a user
pub async fn list_user_answers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> ApiResult<impl IntoResponse> {
    let page = PageRequest::new(params.page, params.page_size, CONTENT_PAGE_SIZE);
    let answers = state.content_repository.user_answers(id, page).await?;
    Ok(Json(answers))
}

/// Apply a user lifecycle event from the identity provider
pub async fn identity_webhook(
    State(state): State<AppState>,
    Json(event): Json<IdentityEvent>,
) -> ApiResult<impl IntoResponse> {
    match event {
        IdentityEvent::UserCreated(user) => {
            let id = state.user_repository.create(&user.to_new_user()).await?;
            info!("Identity {} registered as user {}", user.id, id);
            Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
        }
        IdentityEvent::UserUpdated(user) => {
            state
                .user_repository
                .update(&user.id, &user.to_update(), &profile_path(&user.id))
                .await?;
            Ok((StatusCode::OK, Json(json!({ "clerk_id": user.id }))))
        }
        IdentityEvent::UserDeleted(deleted) => {
            let id = state.user_repository.delete(&deleted.id).await?;
            Ok((StatusCode::OK, Json(json!({ "id": id }))))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        badges::BadgeCriteria, invalidation::NoopRevalidator, repositories::stats::ViewsSource,
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use common::database::{Database, DatabaseConfig};
    use std::sync::Arc;
    use tower::ServiceExt;

    /// Router whose store can never be reached
    fn app() -> Router {
        let db = Database::new(DatabaseConfig {
            database_url: "not a url".to_string(),
            max_connections: 1,
            min_connections: 0,
            connection_timeout: 1,
        });
        let state = AppState::new(
            db,
            Arc::new(NoopRevalidator),
            BadgeCriteria::default(),
            ViewsSource::default(),
        );
        create_router(state)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unreachable_store_is_service_unavailable() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/users/user_1/stats")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_invalid_user_is_rejected_before_the_store() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/users")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"clerk_id": "user_1", "name": "Ann", "username": "ann",
                            "email": "not-an-email", "picture": "https://img/ann.png"}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_update_is_bad_request() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/users/user_1")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"path": "/profile/user_1"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_profile_path() {
        assert_eq!(profile_path("user_1"), "/profile/user_1");
    }
}
