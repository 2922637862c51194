//! The remote contract consumed by the application
//!
//! [`crate::HttpClient`] implements it over HTTP; view models only see the
//! trait so they can be driven by an in-memory backend in tests.

use async_trait::async_trait;
use skillzone_core::{
    Experience, ExperienceDraft, LikeState, ProfileUpdate, Session, SignupForm, Skill, SkillDraft,
    TopSkill, UserProfile, UserSummary,
};

use crate::error::Result;

#[async_trait]
pub trait SkillzoneApi: Send + Sync {
    // Public
    async fn signup(&self, form: &SignupForm) -> Result<()>;
    /// Returns the session for the accepted credentials
    async fn login(&self, email: &str, password: &str) -> Result<Session>;

    // Skills
    async fn list_skills(&self, session: &Session) -> Result<Vec<Skill>>;
    async fn list_own_skills(&self, session: &Session) -> Result<Vec<Skill>>;
    async fn get_skill(&self, session: &Session, id: &str) -> Result<Skill>;
    async fn search_skills(&self, session: &Session, query: &str) -> Result<Vec<Skill>>;
    async fn toggle_like(&self, session: &Session, id: &str) -> Result<LikeState>;
    /// Create when the draft has no id, update otherwise
    async fn save_skill(&self, session: &Session, draft: &SkillDraft) -> Result<()>;
    async fn delete_skill(&self, session: &Session, id: &str) -> Result<()>;

    // Top skills (admin-curated, unauthenticated)
    async fn list_top_skills(&self) -> Result<Vec<TopSkill>>;
    async fn create_top_skill(&self, name: &str) -> Result<()>;
    async fn delete_top_skill(&self, name: &str) -> Result<()>;

    // Users (admin)
    async fn list_users(&self) -> Result<Vec<UserSummary>>;
    async fn get_user_details(&self, name: &str) -> Result<UserSummary>;
    async fn delete_user(&self, id: &str) -> Result<()>;

    // Profiles
    async fn get_profile(&self, session: &Session) -> Result<UserProfile>;
    async fn get_user_profile(&self, session: &Session, username: &str) -> Result<UserProfile>;
    async fn update_profile(&self, session: &Session, update: &ProfileUpdate) -> Result<()>;

    // Experiences
    async fn list_experiences(&self, session: &Session) -> Result<Vec<Experience>>;
    async fn list_user_experiences(&self, session: &Session, email: &str) -> Result<Vec<Experience>>;
    async fn create_experience(&self, session: &Session, draft: &ExperienceDraft) -> Result<()>;
    async fn delete_experience(&self, session: &Session, id: &str) -> Result<()>;
}
