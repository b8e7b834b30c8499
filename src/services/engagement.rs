// SPDX-License-Identifier: MIT

//! Engagement ledger: the like/dislike set-membership toggle shared by posts
//! and answers.
//!
//! Semantics:
//! - Adding a membership that already exists is a no-op (idempotent).
//! - The like-set and dislike-set mutate independently; a user may sit in
//!   both for one target. See DESIGN.md for why exclusivity is not enforced.
//! - Persisted counts are recomputed from the sets on every write, so
//!   `like_count == |like_list|` always holds after a toggle.
//!
//! The toggle is a read-modify-write over two array columns with no locking;
//! concurrent toggles on the same target can lose updates (last-write-wins on
//! the whole list). Accepted weakness, not a guarantee.

use crate::db::Database;
use crate::error::{AppError, Result};
use crate::models::TargetKind;
use serde::Deserialize;

/// Which set a toggle operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    Like,
    Dislike,
}

/// In-memory view of a target's like and dislike sets.
///
/// Backed by ordered `bigint[]` columns; membership is checked on insert so
/// the vectors stay duplicate-free.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngagementSets {
    pub likes: Vec<i64>,
    pub dislikes: Vec<i64>,
}

impl EngagementSets {
    pub fn new(likes: Vec<i64>, dislikes: Vec<i64>) -> Self {
        Self { likes, dislikes }
    }

    /// Set or clear `user_id`'s membership in the set picked by `reaction`.
    /// The other set is never touched.
    pub fn apply(&mut self, user_id: i64, reaction: Reaction, desired: bool) {
        let set = match reaction {
            Reaction::Like => &mut self.likes,
            Reaction::Dislike => &mut self.dislikes,
        };

        if desired {
            if !set.contains(&user_id) {
                set.push(user_id);
            }
        } else {
            set.retain(|&id| id != user_id);
        }
    }

    pub fn like_count(&self) -> i32 {
        self.likes.len() as i32
    }

    pub fn dislike_count(&self) -> i32 {
        self.dislikes.len() as i32
    }

    pub fn liked_by(&self, user_id: i64) -> bool {
        self.likes.contains(&user_id)
    }

    pub fn disliked_by(&self, user_id: i64) -> bool {
        self.dislikes.contains(&user_id)
    }
}

/// Toggle `user_id`'s like/dislike membership on one target and persist both
/// sets plus their recomputed counts in a single UPDATE.
pub async fn toggle(
    db: &Database,
    kind: TargetKind,
    target_id: i64,
    user_id: i64,
    reaction: Reaction,
    desired: bool,
) -> Result<()> {
    let mut sets = db.load_engagement(kind, target_id).await?.ok_or_else(|| {
        let what = match kind {
            TargetKind::Post => "Post",
            TargetKind::Answer => "Answer",
        };
        AppError::NotFound(format!("{what} {target_id} not found"))
    })?;

    sets.apply(user_id, reaction, desired);
    db.store_engagement(kind, target_id, &sets).await?;

    tracing::debug!(
        ?kind,
        target_id,
        user_id,
        ?reaction,
        desired,
        like_count = sets.like_count(),
        dislike_count = sets.dislike_count(),
        "Engagement updated"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_is_idempotent() {
        let mut sets = EngagementSets::new(vec![], vec![]);
        sets.apply(42, Reaction::Like, true);
        sets.apply(42, Reaction::Like, true);

        assert_eq!(sets.likes, vec![42]);
        assert_eq!(sets.like_count(), 1);
    }

    #[test]
    fn test_like_then_unlike_restores_original_set() {
        let mut sets = EngagementSets::new(vec![1, 2], vec![]);
        let original = sets.clone();

        sets.apply(42, Reaction::Like, true);
        sets.apply(42, Reaction::Like, false);

        assert_eq!(sets, original);
    }

    #[test]
    fn test_unlike_when_absent_is_noop() {
        let mut sets = EngagementSets::new(vec![1], vec![2]);
        sets.apply(42, Reaction::Like, false);
        sets.apply(42, Reaction::Dislike, false);

        assert_eq!(sets.likes, vec![1]);
        assert_eq!(sets.dislikes, vec![2]);
    }

    #[test]
    fn test_sets_mutate_independently() {
        // Liking never removes an existing dislike membership.
        let mut sets = EngagementSets::new(vec![], vec![42]);
        sets.apply(42, Reaction::Like, true);

        assert!(sets.liked_by(42));
        assert!(sets.disliked_by(42));
    }

    #[test]
    fn test_counts_track_cardinality() {
        let mut sets = EngagementSets::new(vec![], vec![]);
        for user in [1, 2, 3] {
            sets.apply(user, Reaction::Like, true);
        }
        sets.apply(2, Reaction::Like, false);
        sets.apply(9, Reaction::Dislike, true);

        assert_eq!(sets.like_count() as usize, sets.likes.len());
        assert_eq!(sets.dislike_count() as usize, sets.dislikes.len());
        assert_eq!(sets.like_count(), 2);
        assert_eq!(sets.dislike_count(), 1);
    }

    #[test]
    fn test_membership_view_per_requester() {
        let mut sets = EngagementSets::new(vec![], vec![]);
        sets.apply(2, Reaction::Like, true);

        // Requester 2 (who liked) vs requester 1 (the owner).
        assert!(sets.liked_by(2));
        assert!(!sets.liked_by(1));
        assert_eq!(sets.like_count(), 1);
    }
}
