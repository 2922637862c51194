//! Skill model

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{Error, Result};
use crate::media::Upload;

/// A skill post as shown in the feed, search results, and profiles
#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tool: Option<String>,
    /// Renderable `data:` URI, absent when the post has no image
    pub image: Option<String>,
    /// Renderable `data:` URI or the default placeholder
    pub profile_image: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub likes: u32,
    pub has_liked: bool,
    /// Derived from the id, see [`created_at_from_id`]
    pub created_at: Option<DateTime<Utc>>,
}

impl Skill {
    pub fn like_state(&self) -> LikeState {
        LikeState {
            likes: self.likes,
            has_liked: self.has_liked,
        }
    }

    pub fn set_like_state(&mut self, state: LikeState) {
        self.likes = state.likes;
        self.has_liked = state.has_liked;
    }
}

/// The per-viewer like counters of a skill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub likes: u32,
    pub has_liked: bool,
}

impl LikeState {
    pub fn new(likes: u32, has_liked: bool) -> Self {
        Self { likes, has_liked }
    }

    /// The state after the viewer flips their like
    pub fn toggled(self) -> Self {
        if self.has_liked {
            Self {
                likes: self.likes.saturating_sub(1),
                has_liked: false,
            }
        } else {
            Self {
                likes: self.likes.saturating_add(1),
                has_liked: true,
            }
        }
    }
}

/// Creation time encoded in the first 8 hex digits of an id (seconds since epoch)
pub fn created_at_from_id(id: &str) -> Option<DateTime<Utc>> {
    let prefix = id.get(..8)?;
    let secs = u32::from_str_radix(prefix, 16).ok()?;
    Utc.timestamp_opt(i64::from(secs), 0).single()
}

/// Input for creating or updating a skill.
///
/// A draft without an id creates a new skill; a draft with an id updates it.
#[derive(Debug, Clone, Default)]
pub struct SkillDraft {
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub tool: Option<String>,
    pub image: Option<Upload>,
}

impl SkillDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Default::default()
        }
    }

    pub fn for_update(id: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::new(title, description)
        }
    }

    pub fn is_update(&self) -> bool {
        self.id.is_some()
    }

    /// Title and description must be present before anything is sent
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::validation("title is required"));
        }
        if self.description.trim().is_empty() {
            return Err(Error::validation("description is required"));
        }
        Ok(())
    }

    /// Prefill a draft from an existing skill (for the editor)
    pub fn from_skill(skill: &Skill) -> Self {
        Self {
            id: Some(skill.id.clone()),
            title: skill.title.clone(),
            description: skill.description.clone(),
            tool: skill.tool.clone(),
            image: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_up_and_down() {
        let state = LikeState::new(4, false);
        assert_eq!(state.toggled(), LikeState::new(5, true));
        assert_eq!(state.toggled().toggled(), state);
    }

    #[test]
    fn test_toggle_never_goes_negative() {
        let state = LikeState::new(0, true);
        assert_eq!(state.toggled(), LikeState::new(0, false));
    }

    #[test]
    fn test_created_at_from_object_id() {
        // 0x65a1b2c3 = 1705095875
        let created = created_at_from_id("65a1b2c3f1e2d3c4b5a69788").unwrap();
        assert_eq!(created.timestamp(), 1_705_095_875);
    }

    #[test]
    fn test_created_at_rejects_non_hex() {
        assert!(created_at_from_id("not-an-id").is_none());
        assert!(created_at_from_id("abc").is_none());
    }

    #[test]
    fn test_draft_validation() {
        assert!(SkillDraft::new("Rust", "Systems programming").validate().is_ok());
        assert!(matches!(
            SkillDraft::new("  ", "desc").validate(),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            SkillDraft::new("Rust", "").validate(),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_draft_mode() {
        assert!(!SkillDraft::new("a", "b").is_update());
        assert!(SkillDraft::for_update("id1", "a", "b").is_update());
    }
}
