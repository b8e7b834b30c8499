// SPDX-License-Identifier: MIT

//! Post routes: thin CRUD plus the like/dislike toggle.
//!
//! All routes here sit behind the access-token middleware; handlers read the
//! verified identity from [`AuthUser`].

use crate::error::{AppError, AppJson, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{PostRow, TargetKind};
use crate::services::engagement::{self, Reaction};
use crate::AppState;
use axum::{
    extract::State,
    routing::{delete, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/post", post(create_post).get(list_posts))
        .route("/post/postUpdate", put(update_post))
        .route("/post/postDelete", delete(delete_post))
        .route("/post/likesanddislike", post(toggle_reaction))
}

/// Treat empty strings from form-style clients as NULL.
fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// ─── Create / Update / Delete ────────────────────────────────

#[derive(Deserialize)]
pub struct CreatePostRequest {
    question: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

#[derive(Serialize)]
struct PostResponse {
    message: String,
    post: PostRow,
}

async fn create_post(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<CreatePostRequest>,
) -> Result<Json<PostResponse>> {
    if payload.question.is_empty() {
        return Err(AppError::BadRequest("Question is required".to_string()));
    }

    let post = state
        .db
        .insert_post(
            user.id,
            &payload.question,
            none_if_empty(payload.description).as_deref(),
            none_if_empty(payload.category).as_deref(),
            none_if_empty(payload.image).as_deref(),
        )
        .await?;

    Ok(Json(PostResponse {
        message: "Post created successfully".to_string(),
        post,
    }))
}

#[derive(Deserialize)]
pub struct UpdatePostRequest {
    post_id: i64,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

async fn update_post(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthUser>,
    AppJson(payload): AppJson<UpdatePostRequest>,
) -> Result<Json<PostResponse>> {
    let post = state
        .db
        .update_post(
            payload.post_id,
            none_if_empty(payload.question).as_deref(),
            none_if_empty(payload.description).as_deref(),
            none_if_empty(payload.category).as_deref(),
            none_if_empty(payload.image).as_deref(),
        )
        .await?
        .ok_or_else(|| AppError::BadRequest("Failed to update post".to_string()))?;

    Ok(Json(PostResponse {
        message: "Post updated successfully".to_string(),
        post,
    }))
}

#[derive(Deserialize)]
pub struct DeletePostRequest {
    #[serde(default)]
    id: Option<i64>,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

async fn delete_post(
    State(state): State<Arc<AppState>>,
    Extension(_user): Extension<AuthUser>,
    AppJson(payload): AppJson<DeletePostRequest>,
) -> Result<Json<MessageResponse>> {
    let id = payload
        .id
        .ok_or_else(|| AppError::BadRequest("Post ID is required".to_string()))?;

    state.db.delete_post(id).await?;

    Ok(Json(MessageResponse {
        message: "Post deleted successfully".to_string(),
    }))
}

// ─── Listing ─────────────────────────────────────────────────

/// Post as seen by one requester: counts derived from the lists, plus the
/// requester's own membership.
#[derive(Serialize)]
pub struct PostView {
    pub id: i64,
    pub owner_id: i64,
    pub question: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub post_datetime: DateTime<Utc>,
    pub edit_datetime: Option<DateTime<Utc>>,
    pub like_count: usize,
    pub dislike_count: usize,
    pub liked: bool,
    pub disliked: bool,
}

impl PostView {
    fn for_requester(post: PostRow, requester_id: i64) -> Self {
        Self {
            liked: post.like_list.contains(&requester_id),
            disliked: post.dislike_list.contains(&requester_id),
            like_count: post.like_list.len(),
            dislike_count: post.dislike_list.len(),
            id: post.id,
            owner_id: post.owner_id,
            question: post.question,
            description: post.description,
            category: post.category,
            image: post.image,
            post_datetime: post.post_datetime,
            edit_datetime: post.edit_datetime,
        }
    }
}

#[derive(Serialize)]
struct PostListResponse {
    message: String,
    posts: Vec<PostView>,
}

/// `GET /post` — the requester's own posts, newest first, with engagement
/// state derived for them.
async fn list_posts(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<PostListResponse>> {
    let rows = state.db.list_posts_for_owner(user.id).await?;

    if rows.is_empty() {
        return Err(AppError::NotFound(
            "No posts found for this user".to_string(),
        ));
    }

    let posts = rows
        .into_iter()
        .map(|row| PostView::for_requester(row, user.id))
        .collect();

    Ok(Json(PostListResponse {
        message: "Posts retrieved successfully".to_string(),
        posts,
    }))
}

// ─── Like / Dislike ──────────────────────────────────────────

#[derive(Deserialize)]
pub struct ToggleRequest {
    #[serde(rename = "Post_id")]
    post_id: i64,
    which: Reaction,
    #[serde(default)]
    like: bool,
    #[serde(default)]
    dislike: bool,
}

/// `POST /post/likesanddislike` — set or clear the requester's membership in
/// one of the post's reaction sets.
async fn toggle_reaction(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<ToggleRequest>,
) -> Result<Json<MessageResponse>> {
    let desired = match payload.which {
        Reaction::Like => payload.like,
        Reaction::Dislike => payload.dislike,
    };

    engagement::toggle(
        &state.db,
        TargetKind::Post,
        payload.post_id,
        user.id,
        payload.which,
        desired,
    )
    .await?;

    Ok(Json(MessageResponse {
        message: "Like/Dislike updated successfully".to_string(),
    }))
}
