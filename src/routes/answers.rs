// SPDX-License-Identifier: MIT

//! Answer routes: listing with owner display data, creation, and the same
//! like/dislike toggle the posts use.

use crate::error::{AppError, AppJson, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{AnswerRow, Role, TargetKind};
use crate::services::engagement::{self, Reaction};
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/answers", get(list_answers).post(create_answer))
        .route("/answers/likesanddislike", post(toggle_reaction))
}

/// Answer as seen by one requester, with the owner's display data resolved
/// from whichever role table the owner lives in.
#[derive(Serialize)]
pub struct AnswerView {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    #[serde(rename = "profileImg")]
    pub profile_img: Option<String>,
    pub answer: String,
    pub liked: bool,
    pub disliked: bool,
    pub like_count: usize,
    pub dislike_count: usize,
}

impl AnswerView {
    fn for_requester(
        row: AnswerRow,
        requester_id: i64,
        name: String,
        profile_img: Option<String>,
    ) -> Self {
        Self {
            liked: row.like_list.contains(&requester_id),
            disliked: row.dislike_list.contains(&requester_id),
            like_count: row.like_list.len(),
            dislike_count: row.dislike_list.len(),
            id: row.id,
            owner_id: row.owner_id,
            name,
            profile_img,
            answer: row.answer,
        }
    }
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(rename = "Postid")]
    post_id: i64,
}

#[derive(Serialize)]
#[serde(untagged)]
enum ListResponse {
    Empty { message: String },
    Answers { answers: Vec<AnswerView> },
}

/// `GET /answers?Postid=` — answers for one post. Owner ids can point at
/// either role table, so display data is gathered from both and joined in
/// memory.
async fn list_answers(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>> {
    let rows = state.db.list_answers_for_post(query.post_id).await?;

    if rows.is_empty() {
        return Ok(Json(ListResponse::Empty {
            message: "No answers found".to_string(),
        }));
    }

    let owner_ids: Vec<i64> = rows.iter().map(|a| a.owner_id).collect();

    let mut display: HashMap<i64, (String, Option<String>)> = HashMap::new();
    for role in [Role::Mentor, Role::Mentee] {
        for owner in state.db.owner_display(role, &owner_ids).await? {
            display.insert(owner.id, (owner.display_name(), owner.profile_image.clone()));
        }
    }

    let answers = rows
        .into_iter()
        .map(|row| {
            let (name, profile_img) = display
                .get(&row.owner_id)
                .cloned()
                .unwrap_or_else(|| ("Unknown".to_string(), None));
            AnswerView::for_requester(row, user.id, name, profile_img)
        })
        .collect();

    Ok(Json(ListResponse::Answers { answers }))
}

#[derive(Deserialize)]
pub struct CreateAnswerRequest {
    post_id: i64,
    answer: String,
}

#[derive(Serialize)]
struct CreateAnswerResponse {
    message: String,
    answer: AnswerView,
}

/// `POST /answers` — attach an answer to a post. The fresh answer is echoed
/// back already shaped like a list entry, using the author's own display data.
async fn create_answer(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    AppJson(payload): AppJson<CreateAnswerRequest>,
) -> Result<Json<CreateAnswerResponse>> {
    if payload.answer.is_empty() {
        return Err(AppError::BadRequest("Invalid input".to_string()));
    }

    let row = state
        .db
        .insert_answer(user.id, payload.post_id, &payload.answer)
        .await?;

    let owner = state
        .db
        .owner_display(user.role, &[user.id])
        .await?
        .into_iter()
        .next();

    let (name, profile_img) = owner
        .map(|o| (o.display_name(), o.profile_image))
        .unwrap_or_else(|| ("Unknown".to_string(), None));

    Ok(Json(CreateAnswerResponse {
        message: "Answer added successfully".to_string(),
        answer: AnswerView::for_requester(row, user.id, name, profile_img),
    }))
}

#[derive(Deserialize)]
pub struct ToggleRequest {
    answer_id: i64,
    which: Reaction,
    #[serde(default)]
    like: bool,
    #[serde(default)]
    dislike: bool,
}

#[derive(Serialize)]
struct MessageResponse {
    message: String,
}

/// `POST /answers/likesanddislike` — same toggle protocol as posts, aimed at
/// the answers table.
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
        TargetKind::Answer,
        payload.answer_id,
        user.id,
        payload.which,
        desired,
    )
    .await?;

    Ok(Json(MessageResponse {
        message: "Like/Dislike updated successfully".to_string(),
    }))
}
