//! JSON shapes exchanged with the Skillzone API
//!
//! Field names follow the server (camelCase). Conversions into the core
//! models normalize images and clamp counters.

use serde::{Deserialize, Serialize};
use skillzone_core::media::{optional_image, profile_image};
use skillzone_core::{created_at_from_id, Experience, LikeState, Skill, TopSkill, UserProfile, UserSummary};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDto {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tool: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub likes: Option<i64>,
    #[serde(default)]
    pub has_liked: Option<bool>,
}

fn clamp_likes(likes: i64) -> u32 {
    u32::try_from(likes.max(0)).unwrap_or(u32::MAX)
}

impl From<SkillDto> for Skill {
    fn from(dto: SkillDto) -> Self {
        let created_at = created_at_from_id(&dto.id);
        Skill {
            image: optional_image(dto.image.as_deref()),
            profile_image: profile_image(dto.profile_image.as_deref()),
            likes: clamp_likes(dto.likes.unwrap_or(0)),
            has_liked: dto.has_liked.unwrap_or(false),
            tool: dto.tool.filter(|t| !t.trim().is_empty()),
            description: dto.description.unwrap_or_default(),
            id: dto.id,
            title: dto.title,
            username: dto.username,
            email: dto.email,
            created_at,
        }
    }
}

/// Server-confirmed like counters
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeDto {
    pub likes: i64,
    #[serde(default)]
    pub has_liked: bool,
}

impl From<LikeDto> for LikeState {
    fn from(dto: LikeDto) -> Self {
        LikeState::new(clamp_likes(dto.likes), dto.has_liked)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopSkillDto {
    pub skill_name: String,
}

impl From<TopSkillDto> for TopSkill {
    fn from(dto: TopSkillDto) -> Self {
        TopSkill::new(dto.skill_name)
    }
}

/// Skill and tool entries arrive either as bare strings or as objects
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LabelDto {
    Plain(String),
    Titled { title: String },
    Named { name: String },
    Other(serde_json::Value),
}

impl LabelDto {
    fn into_label(self) -> Option<String> {
        match self {
            LabelDto::Plain(s) | LabelDto::Titled { title: s } | LabelDto::Named { name: s } => Some(s),
            LabelDto::Other(_) => None,
        }
    }
}

fn labels(entries: Option<Vec<LabelDto>>) -> Vec<String> {
    entries
        .unwrap_or_default()
        .into_iter()
        .filter_map(LabelDto::into_label)
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDto {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub skill: Option<Vec<LabelDto>>,
    #[serde(default)]
    pub tools: Option<Vec<LabelDto>>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub college_branch: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub profile_image: Option<String>,
}

impl UserDto {
    fn picture(&self) -> String {
        profile_image(self.image.as_deref().or(self.profile_image.as_deref()))
    }
}

impl From<UserDto> for UserSummary {
    fn from(dto: UserDto) -> Self {
        UserSummary {
            profile_image: dto.picture(),
            id: dto.id.unwrap_or_default(),
            name: dto.name,
            email: dto.email,
            skills: labels(dto.skill),
            tools: labels(dto.tools),
            bio: dto.bio,
            college_branch: dto.college_branch,
        }
    }
}

impl From<UserDto> for UserProfile {
    fn from(dto: UserDto) -> Self {
        UserProfile {
            profile_image: dto.picture(),
            id: dto.id,
            name: dto.name,
            email: dto.email,
            college_branch: dto.college_branch,
            bio: dto.bio,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExperienceDto {
    pub id: String,
    #[serde(default)]
    pub experience: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl From<ExperienceDto> for Experience {
    fn from(dto: ExperienceDto) -> Self {
        Experience {
            image: optional_image(dto.image.as_deref()),
            id: dto.id,
            text: dto.experience,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillzone_core::DEFAULT_PROFILE_IMAGE;

    #[test]
    fn test_skill_normalization() {
        let dto: SkillDto = serde_json::from_str(
            r#"{
                "id": "65a1b2c3f1e2d3c4b5a69788",
                "title": "Poster Design",
                "description": "Posters at www.example.com",
                "image": "aGVsbG8=",
                "likes": 4,
                "hasLiked": true,
                "username": "ada"
            }"#,
        )
        .unwrap();
        let skill = Skill::from(dto);

        assert_eq!(skill.image.as_deref(), Some("data:image/jpeg;base64,aGVsbG8="));
        assert_eq!(skill.profile_image, DEFAULT_PROFILE_IMAGE);
        assert_eq!(skill.like_state(), LikeState::new(4, true));
        assert_eq!(skill.created_at.map(|t| t.timestamp()), Some(1_705_095_875));
    }

    #[test]
    fn test_skill_defaults_and_clamping() {
        let dto: SkillDto =
            serde_json::from_str(r#"{"id": "x", "title": "T", "likes": -3, "tool": ""}"#).unwrap();
        let skill = Skill::from(dto);

        assert_eq!(skill.likes, 0);
        assert!(!skill.has_liked);
        assert!(skill.tool.is_none());
        assert!(skill.image.is_none());
        assert_eq!(skill.description, "");
    }

    #[test]
    fn test_user_labels_accept_mixed_shapes() {
        let dto: UserDto = serde_json::from_str(
            r#"{
                "id": "u1",
                "name": "Ada",
                "email": "ada@example.com",
                "skill": ["Video Editing", {"title": "Web Development"}, 7],
                "tools": [{"name": "Figma"}],
                "collegeBranch": "CSE"
            }"#,
        )
        .unwrap();
        let user = UserSummary::from(dto);

        assert_eq!(user.skills, vec!["Video Editing", "Web Development"]);
        assert_eq!(user.tools, vec!["Figma"]);
        assert_eq!(user.college_branch.as_deref(), Some("CSE"));
    }

    #[test]
    fn test_missing_lists_become_empty() {
        let dto: UserDto = serde_json::from_str(r#"{"name": "Bo", "skill": null}"#).unwrap();
        let user = UserSummary::from(dto);
        assert!(user.skills.is_empty());
        assert!(user.tools.is_empty());
    }
}
