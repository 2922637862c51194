//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use crate::models::{LikeState, Skill};

/// A local like toggle flips `has_liked` and moves `likes` by one in the same direction
pub fn assert_toggle_transition(before: LikeState, after: LikeState) {
    debug_assert!(
        before.has_liked != after.has_liked,
        "Toggle did not flip has_liked: {:?} -> {:?}",
        before,
        after
    );

    let expected = if before.has_liked {
        before.likes.saturating_sub(1)
    } else {
        before.likes.saturating_add(1)
    };
    debug_assert!(
        after.likes == expected,
        "Toggle moved likes {} -> {}, expected {}",
        before.likes,
        after.likes,
        expected
    );
}

/// Search results must be ordered by likes, most first
pub fn assert_sorted_by_likes(skills: &[Skill]) {
    debug_assert!(
        skills.windows(2).all(|w| w[0].likes >= w[1].likes),
        "Skills are not sorted by likes descending"
    );
}

/// A response can only belong to a generation that was already issued
pub fn assert_generation_issued(generation: u64, latest: u64) {
    debug_assert!(
        generation <= latest,
        "Response generation {} is newer than latest issued {}",
        generation,
        latest
    );
}

/// Ids are required before a skill enters a collection
pub fn assert_skill_id_valid(skill: &Skill, context: &str) {
    debug_assert!(
        !skill.id.is_empty(),
        "Empty skill id in context: {}",
        context
    );
}
