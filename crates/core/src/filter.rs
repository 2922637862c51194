//! Local search and ordering over fetched collections
//!
//! Everything here is pure: no requests, no shared state.

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::{Skill, TopSkill, UserSummary};

/// Field a local search matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchCategory {
    #[default]
    Skill,
    Tool,
}

impl SearchCategory {
    pub fn label(&self) -> &'static str {
        match self {
            SearchCategory::Skill => "skill",
            SearchCategory::Tool => "tool",
        }
    }
}

impl fmt::Display for SearchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SearchCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skill" => Ok(SearchCategory::Skill),
            "tool" => Ok(SearchCategory::Tool),
            other => Err(Error::validation(format!("unknown search category: {}", other))),
        }
    }
}

/// Lowercased, trimmed needle; `None` means "match everything"
fn needle(term: &str) -> Option<String> {
    let trimmed = term.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Keep the items whose field contains `term`, case-insensitively.
///
/// A blank term returns the collection unchanged.
pub fn filter_by<T, F>(items: &[T], term: &str, field: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> Option<&str>,
{
    let Some(needle) = needle(term) else {
        return items.to_vec();
    };

    items
        .iter()
        .filter(|item| field(item).is_some_and(|value| contains(value, &needle)))
        .cloned()
        .collect()
}

/// Filter skills by title or by tool
pub fn filter_skills(skills: &[Skill], term: &str, category: SearchCategory) -> Vec<Skill> {
    match category {
        SearchCategory::Skill => filter_by(skills, term, |s| Some(s.title.as_str())),
        SearchCategory::Tool => filter_by(skills, term, |s| s.tool.as_deref()),
    }
}

/// Filter users by any of their skill titles or tool names
pub fn filter_users(users: &[UserSummary], term: &str, category: SearchCategory) -> Vec<UserSummary> {
    let Some(needle) = needle(term) else {
        return users.to_vec();
    };

    users
        .iter()
        .filter(|user| {
            let labels = match category {
                SearchCategory::Skill => &user.skills,
                SearchCategory::Tool => &user.tools,
            };
            labels.iter().any(|label| contains(label, &needle))
        })
        .cloned()
        .collect()
}

/// Filter the admin top-skill list by name
pub fn filter_top_skills(skills: &[TopSkill], term: &str) -> Vec<TopSkill> {
    filter_by(skills, term, |s| Some(s.name.as_str()))
}

/// Most liked first; equal counts keep their arrival order
pub fn sort_by_likes(skills: &mut [Skill]) {
    skills.sort_by_key(|s| Reverse(s.likes));
}

/// Newest first by the id timestamp; undated skills go last in arrival order
pub fn sort_by_recency(skills: &mut [Skill]) {
    skills.sort_by_key(|s| Reverse(s.created_at));
}
