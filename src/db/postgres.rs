// SPDX-License-Identifier: MIT

//! PostgreSQL client wrapper with typed operations.
//!
//! Role dispatch: the `mentor` and `mentee` tables are disjoint, so every
//! per-role operation matches on [`Role`] to pick a fixed SQL string. No
//! request-derived value is ever spliced into a query.
//!
//! Provides high-level operations for:
//! - Users (credential lookup, registration, OAuth provisioning)
//! - Posts and answers (thin CRUD)
//! - Engagement (like/dislike lists plus persisted counts)

use crate::error::AppError;
use crate::models::engagement::OwnerDisplay;
use crate::models::{AnswerRow, PostRow, Role, TargetKind, User};
use crate::services::EngagementSets;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Database client. `pool` is `None` in offline mock mode, where every
/// operation fails with a database error.
#[derive(Clone)]
pub struct Database {
    pool: Option<PgPool>,
}

impl Database {
    /// Connect to PostgreSQL and build the process-wide pool.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to PostgreSQL: {e}")))?;

        tracing::info!("Connected to PostgreSQL");

        Ok(Self { pool: Some(pool) })
    }

    /// Create a mock client for testing (offline mode).
    pub fn new_mock() -> Self {
        Self { pool: None }
    }

    /// Apply pending migrations.
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(self.pool()?)
            .await
            .map_err(|e| AppError::Database(format!("Migration failed: {e}")))
    }

    /// Drain the pool during graceful shutdown.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }

    fn pool(&self) -> Result<&PgPool, AppError> {
        self.pool
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Look up a user by email in one role's table.
    pub async fn find_user_by_email(
        &self,
        role: Role,
        email: &str,
    ) -> Result<Option<User>, AppError> {
        let query = match role {
            Role::Mentor => "SELECT * FROM mentor WHERE email = $1",
            Role::Mentee => "SELECT * FROM mentee WHERE email = $1",
        };

        sqlx::query_as::<_, User>(query)
            .bind(email)
            .fetch_optional(self.pool()?)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Look up a user by email across both role tables (mentor first,
    /// matching the provisioning order of the OAuth callback).
    pub async fn find_user_any_role(&self, email: &str) -> Result<Option<(Role, User)>, AppError> {
        if let Some(user) = self.find_user_by_email(Role::Mentor, email).await? {
            return Ok(Some((Role::Mentor, user)));
        }
        if let Some(user) = self.find_user_by_email(Role::Mentee, email).await? {
            return Ok(Some((Role::Mentee, user)));
        }
        Ok(None)
    }

    /// True if the email is registered in either role table. Registration
    /// enforces cross-role uniqueness even though the tables are disjoint.
    pub async fn email_taken(&self, email: &str) -> Result<bool, AppError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM mentor WHERE email = $1)
                 OR EXISTS(SELECT 1 FROM mentee WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(self.pool()?)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a locally registered user (profile fields start out NULL).
    pub async fn insert_local_user(
        &self,
        role: Role,
        first_name: &str,
        last_name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, AppError> {
        let query = match role {
            Role::Mentor => {
                "INSERT INTO mentor (first_name, last_name, email, password)
                 VALUES ($1, $2, $3, $4) RETURNING *"
            }
            Role::Mentee => {
                "INSERT INTO mentee (first_name, last_name, email, password)
                 VALUES ($1, $2, $3, $4) RETURNING *"
            }
        };

        sqlx::query_as::<_, User>(query)
            .bind(first_name)
            .bind(last_name)
            .bind(email)
            .bind(password_hash)
            .fetch_one(self.pool()?)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Auto-provision a user on first OAuth login. `password_hash` is the
    /// hashed provider subject id; profile fields beyond the provider's
    /// name/picture stay NULL, leaving the profile incomplete.
    pub async fn insert_oauth_user(
        &self,
        role: Role,
        email: &str,
        password_hash: &str,
        first_name: Option<&str>,
        last_name: Option<&str>,
        profile_image: Option<&str>,
    ) -> Result<User, AppError> {
        let query = match role {
            Role::Mentor => {
                "INSERT INTO mentor (email, password, first_name, last_name, profile_image)
                 VALUES ($1, $2, $3, $4, $5) RETURNING *"
            }
            Role::Mentee => {
                "INSERT INTO mentee (email, password, first_name, last_name, profile_image)
                 VALUES ($1, $2, $3, $4, $5) RETURNING *"
            }
        };

        sqlx::query_as::<_, User>(query)
            .bind(email)
            .bind(password_hash)
            .bind(first_name)
            .bind(last_name)
            .bind(profile_image)
            .fetch_one(self.pool()?)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Fetch owner display data for a set of user ids from one role table.
    pub async fn owner_display(
        &self,
        role: Role,
        ids: &[i64],
    ) -> Result<Vec<OwnerDisplay>, AppError> {
        let query = match role {
            Role::Mentor => {
                "SELECT id, first_name, last_name, profile_image FROM mentor WHERE id = ANY($1)"
            }
            Role::Mentee => {
                "SELECT id, first_name, last_name, profile_image FROM mentee WHERE id = ANY($1)"
            }
        };

        sqlx::query_as::<_, OwnerDisplay>(query)
            .bind(ids)
            .fetch_all(self.pool()?)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Post Operations ─────────────────────────────────────────

    pub async fn insert_post(
        &self,
        owner_id: i64,
        question: &str,
        description: Option<&str>,
        category: Option<&str>,
        image: Option<&str>,
    ) -> Result<PostRow, AppError> {
        sqlx::query_as::<_, PostRow>(
            "INSERT INTO post (question, description, category, image, owner_id, post_datetime)
             VALUES ($1, $2, $3, $4, $5, NOW()) RETURNING *",
        )
        .bind(question)
        .bind(description)
        .bind(category)
        .bind(image)
        .bind(owner_id)
        .fetch_one(self.pool()?)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List a user's own posts, newest first.
    pub async fn list_posts_for_owner(&self, owner_id: i64) -> Result<Vec<PostRow>, AppError> {
        sqlx::query_as::<_, PostRow>(
            "SELECT * FROM post WHERE owner_id = $1 ORDER BY post_datetime DESC",
        )
        .bind(owner_id)
        .fetch_all(self.pool()?)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn update_post(
        &self,
        post_id: i64,
        question: Option<&str>,
        description: Option<&str>,
        category: Option<&str>,
        image: Option<&str>,
    ) -> Result<Option<PostRow>, AppError> {
        sqlx::query_as::<_, PostRow>(
            "UPDATE post
             SET question = COALESCE($1, question),
                 description = $2,
                 category = $3,
                 image = $4,
                 edit_datetime = NOW()
             WHERE id = $5 RETURNING *",
        )
        .bind(question)
        .bind(description)
        .bind(category)
        .bind(image)
        .bind(post_id)
        .fetch_optional(self.pool()?)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn delete_post(&self, post_id: i64) -> Result<(), AppError> {
        sqlx::query("DELETE FROM post WHERE id = $1")
            .bind(post_id)
            .execute(self.pool()?)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Answer Operations ───────────────────────────────────────

    pub async fn insert_answer(
        &self,
        owner_id: i64,
        post_id: i64,
        answer: &str,
    ) -> Result<AnswerRow, AppError> {
        sqlx::query_as::<_, AnswerRow>(
            "INSERT INTO answers
                 (owner_id, answer, post_id, like_count, dislike_count, like_list, dislike_list)
             VALUES ($1, $2, $3, 0, 0, '{}', '{}') RETURNING *",
        )
        .bind(owner_id)
        .bind(answer)
        .bind(post_id)
        .fetch_one(self.pool()?)
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn list_answers_for_post(&self, post_id: i64) -> Result<Vec<AnswerRow>, AppError> {
        sqlx::query_as::<_, AnswerRow>("SELECT * FROM answers WHERE post_id = $1 ORDER BY id")
            .bind(post_id)
            .fetch_all(self.pool()?)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Engagement Operations ───────────────────────────────────

    /// Load both reaction lists for a target, or `None` if the row is gone.
    pub async fn load_engagement(
        &self,
        kind: TargetKind,
        target_id: i64,
    ) -> Result<Option<EngagementSets>, AppError> {
        let query = match kind {
            TargetKind::Post => "SELECT like_list, dislike_list FROM post WHERE id = $1",
            TargetKind::Answer => "SELECT like_list, dislike_list FROM answers WHERE id = $1",
        };

        let row = sqlx::query_as::<_, (Vec<i64>, Vec<i64>)>(query)
            .bind(target_id)
            .fetch_optional(self.pool()?)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map(|(likes, dislikes)| EngagementSets::new(likes, dislikes)))
    }

    /// Persist both lists and their recomputed counts in one statement.
    /// Atomic for this single target only; no cross-target transaction.
    pub async fn store_engagement(
        &self,
        kind: TargetKind,
        target_id: i64,
        sets: &EngagementSets,
    ) -> Result<(), AppError> {
        let query = match kind {
            TargetKind::Post => {
                "UPDATE post
                 SET like_list = $1, dislike_list = $2, like_count = $3, dislike_count = $4
                 WHERE id = $5"
            }
            TargetKind::Answer => {
                "UPDATE answers
                 SET like_list = $1, dislike_list = $2, like_count = $3, dislike_count = $4
                 WHERE id = $5"
            }
        };

        sqlx::query(query)
            .bind(&sets.likes)
            .bind(&sets.dislikes)
            .bind(sets.like_count())
            .bind(sets.dislike_count())
            .bind(target_id)
            .execute(self.pool()?)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }
}
