//! Admin-curated top skills

use crate::error::{Error, Result};

/// Shown in the admin panel when the list cannot be loaded
pub const DEFAULT_TOP_SKILLS: [&str; 6] = [
    "Video Editing",
    "Image Editing",
    "Poster Design",
    "Competitive Programming",
    "UI/UX Design",
    "Web Development",
];

/// A globally shared top skill entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopSkill {
    pub name: String,
}

impl TopSkill {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn defaults() -> Vec<TopSkill> {
        DEFAULT_TOP_SKILLS.iter().map(|name| TopSkill::new(*name)).collect()
    }
}

/// Trim a top skill name, rejecting blanks
pub fn normalize_top_skill_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("skill name is required"));
    }
    Ok(trimmed.to_string())
}
