// SPDX-License-Identifier: MIT

//! Engagement targets: posts and answers.
//!
//! Both carry a like-list and a dislike-list of user ids plus redundantly
//! persisted counts. The counts must equal the list lengths after every
//! mutation; the toggle path recomputes them from the lists on each write.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which table a like/dislike toggle operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    Post,
    Answer,
}

/// A post row (Q&A question).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PostRow {
    pub id: i64,
    pub owner_id: i64,
    pub question: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub post_datetime: DateTime<Utc>,
    pub edit_datetime: Option<DateTime<Utc>>,
    pub like_list: Vec<i64>,
    pub dislike_list: Vec<i64>,
    pub like_count: i32,
    pub dislike_count: i32,
}

/// An answer row attached to a post.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AnswerRow {
    pub id: i64,
    pub owner_id: i64,
    pub post_id: i64,
    pub answer: String,
    pub like_list: Vec<i64>,
    pub dislike_list: Vec<i64>,
    pub like_count: i32,
    pub dislike_count: i32,
}

/// Owner display data resolved from a role table for answer listings.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OwnerDisplay {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image: Option<String>,
}

impl OwnerDisplay {
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.first_name.as_deref().unwrap_or(""),
            self.last_name.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }
}
