//! Own profile, own skills and experiences, plus other users' pages

use std::sync::Arc;

use skillzone_core::{
    Experience, ExperienceDraft, LikeState, ProfileUpdate, Skill, SkillDraft, UserProfile,
};
use skillzone_net::{Error, Result};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::collection::{SharedSkills, SkillSet};
use crate::confirm::Confirm;
use crate::events::SyncEvent;
use crate::mutation::{DeleteOutcome, MutationEngine};
use crate::state::AppState;

/// Another user's public page
#[derive(Debug, Clone, PartialEq)]
pub struct UserPage {
    pub profile: UserProfile,
    pub experiences: Vec<Experience>,
}

#[derive(Clone)]
pub struct ProfileViewModel {
    state: Arc<AppState>,
    engine: MutationEngine,
    profile: Arc<RwLock<Option<UserProfile>>>,
    skills: SharedSkills,
    experiences: Arc<RwLock<Vec<Experience>>>,
    /// Draft open in the skill editor
    editing: Arc<RwLock<Option<SkillDraft>>>,
}

impl ProfileViewModel {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            engine: MutationEngine::new(state.clone()),
            state,
            profile: Arc::new(RwLock::new(None)),
            skills: SkillSet::shared(),
            experiences: Arc::new(RwLock::new(Vec::new())),
            editing: Arc::new(RwLock::new(None)),
        }
    }

    /// Load the three sections independently; each degrades on its own
    pub async fn load(&self) {
        tokio::join!(
            self.refresh_profile(),
            self.refresh_skills(),
            self.refresh_experiences()
        );
    }

    pub async fn refresh_profile(&self) -> Option<UserProfile> {
        let fetched = match self.state.require_session() {
            Ok(session) => self.state.api().get_profile(&session).await.map(Some),
            Err(e) => Err(e),
        };
        let fetched = self.state.degrade_read("profile", fetched, None);

        *self.profile.write().await = fetched.clone();
        self.state.events().emit(SyncEvent::ProfileUpdated);
        fetched
    }

    pub async fn refresh_skills(&self) -> usize {
        let fetched = match self.state.require_session() {
            Ok(session) => self.state.api().list_own_skills(&session).await,
            Err(e) => Err(e),
        };
        let fetched = self.state.degrade_read("own skills", fetched, Vec::new());

        let mut skills = self.skills.write().await;
        skills.replace(fetched);
        skills.len()
    }

    pub async fn refresh_experiences(&self) -> usize {
        let fetched = match self.state.require_session() {
            Ok(session) => self.state.api().list_experiences(&session).await,
            Err(e) => Err(e),
        };
        let fetched = self.state.degrade_read("experiences", fetched, Vec::new());

        let count = fetched.len();
        *self.experiences.write().await = fetched;
        self.state
            .events()
            .emit(SyncEvent::ExperiencesUpdated { count });
        count
    }

    pub async fn profile(&self) -> Option<UserProfile> {
        self.profile.read().await.clone()
    }

    pub async fn skills(&self) -> Vec<Skill> {
        self.skills.read().await.items().to_vec()
    }

    pub async fn experiences(&self) -> Vec<Experience> {
        self.experiences.read().await.clone()
    }

    pub async fn editing(&self) -> Option<SkillDraft> {
        self.editing.read().await.clone()
    }

    /// Send the update form, then re-fetch the profile
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<()> {
        update
            .validate()
            .map_err(|e| self.state.report_mutation("update profile", e.into()))?;

        let session = self.state.require_session()?;
        self.engine
            .perform(
                "update profile",
                self.state.api().update_profile(&session, update),
            )
            .await?;
        info!("Profile updated");

        self.refresh_profile().await;
        Ok(())
    }

    /// Open an existing skill in the editor
    pub async fn edit_skill(&self, id: &str) -> Result<SkillDraft> {
        let session = self.state.require_session()?;
        let skill = self
            .state
            .api()
            .get_skill(&session, id)
            .await
            .map_err(|e| {
                warn!(error = %e, id, "Failed to load skill for editing");
                self.state.observe_failure(&e);
                e
            })?;

        let draft = SkillDraft::from_skill(&skill);
        *self.editing.write().await = Some(draft.clone());
        Ok(draft)
    }

    /// Create or update, then re-fetch own skills
    pub async fn save_skill(&self, draft: &SkillDraft) -> Result<()> {
        self.engine.upsert_skill(draft).await?;

        {
            let mut editing = self.editing.write().await;
            if draft.is_update() && editing.as_ref().map(|d| &d.id) == Some(&draft.id) {
                *editing = None;
            }
        }
        self.refresh_skills().await;
        Ok(())
    }

    pub async fn delete_skill(&self, confirm: &dyn Confirm, id: &str) -> Result<DeleteOutcome> {
        let session = self.state.require_session()?;
        let outcome = self
            .engine
            .delete(confirm, "Delete this skill?", "delete skill", || {
                self.state.api().delete_skill(&session, id)
            })
            .await?;

        if outcome == DeleteOutcome::Deleted {
            self.skills.write().await.remove(id);
            let mut editing = self.editing.write().await;
            if editing.as_ref().and_then(|d| d.id.as_deref()) == Some(id) {
                *editing = None;
            }
        }
        Ok(outcome)
    }

    pub async fn toggle_like(&self, id: &str) -> Result<LikeState> {
        self.engine.toggle_like(&self.skills, id).await
    }

    pub async fn add_experience(&self, draft: &ExperienceDraft) -> Result<()> {
        self.engine.create_experience(draft).await?;
        self.refresh_experiences().await;
        Ok(())
    }

    pub async fn delete_experience(&self, confirm: &dyn Confirm, id: &str) -> Result<DeleteOutcome> {
        let session = self.state.require_session()?;
        let outcome = self
            .engine
            .delete(
                confirm,
                "Delete this experience?",
                "delete experience",
                || self.state.api().delete_experience(&session, id),
            )
            .await?;

        if outcome == DeleteOutcome::Deleted {
            let count = {
                let mut experiences = self.experiences.write().await;
                experiences.retain(|e| e.id != id);
                experiences.len()
            };
            self.state
                .events()
                .emit(SyncEvent::ExperiencesUpdated { count });
        }
        Ok(outcome)
    }

    /// Another user's profile followed by their experiences
    pub async fn view_user(&self, username: &str) -> Result<UserPage> {
        let session = self.state.require_session()?;
        let profile = match self.state.api().get_user_profile(&session, username).await {
            Ok(profile) => profile,
            Err(e) if e.is_not_found() => {
                return Err(Error::Remote {
                    status: 404,
                    body: "User not found".to_string(),
                })
            }
            Err(e) => {
                warn!(error = %e, username, "Failed to fetch user profile");
                self.state.observe_failure(&e);
                return Err(e);
            }
        };

        let experiences = self
            .state
            .api()
            .list_user_experiences(&session, &profile.email)
            .await;
        let experiences = self
            .state
            .degrade_read("user experiences", experiences, Vec::new());

        Ok(UserPage {
            profile,
            experiences,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{drain, harness, skill, Answer, FakeApi};

    fn profile(name: &str, email: &str) -> UserProfile {
        UserProfile {
            name: name.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_sections_degrade_independently() {
        let api = FakeApi::new();
        *api.profile.lock().unwrap() = Some(profile("Ada", "ada@example.com"));
        api.own_skills.lock().unwrap().push(skill("s1", "Rust", 0, false));
        api.fail("list_experiences", 500);
        let (state, _rx) = harness(api);
        let vm = ProfileViewModel::new(state);

        vm.load().await;
        assert_eq!(vm.profile().await.unwrap().name, "Ada");
        assert_eq!(vm.skills().await.len(), 1);
        assert!(vm.experiences().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_profile_refetches() {
        let api = FakeApi::new();
        *api.profile.lock().unwrap() = Some(profile("Ada", "ada@example.com"));
        let (state, _rx) = harness(api.clone());
        let vm = ProfileViewModel::new(state);
        vm.refresh_profile().await;

        let mut update = ProfileUpdate::from_profile(&vm.profile().await.unwrap());
        update.name = "Ada L.".to_string();
        update.college_branch = "CSE".to_string();
        vm.update_profile(&update).await.unwrap();

        let current = vm.profile().await.unwrap();
        assert_eq!(current.name, "Ada L.");
        assert_eq!(current.college_branch.as_deref(), Some("CSE"));

        update.email.clear();
        assert!(matches!(
            vm.update_profile(&update).await,
            Err(Error::Validation(_))
        ));
        assert_eq!(api.count("update_profile"), 1);
    }

    #[tokio::test]
    async fn test_edit_and_save_skill() {
        let api = FakeApi::new();
        api.own_skills.lock().unwrap().push(skill("s1", "Rust", 0, false));
        let (state, _rx) = harness(api.clone());
        let vm = ProfileViewModel::new(state);

        let mut draft = vm.edit_skill("s1").await.unwrap();
        assert_eq!(draft.title, "Rust");
        assert!(vm.editing().await.is_some());

        draft.title = "Rust async".to_string();
        vm.save_skill(&draft).await.unwrap();
        assert!(vm.editing().await.is_none());
        assert_eq!(vm.skills().await[0].title, "Rust async");
        assert_eq!(api.count("list_own_skills"), 1);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_collection() {
        let api = FakeApi::new();
        api.own_skills.lock().unwrap().push(skill("s1", "Rust", 0, false));
        api.fail("save_skill", 500);
        let (state, mut rx) = harness(api.clone());
        let vm = ProfileViewModel::new(state);
        vm.refresh_skills().await;

        assert!(vm.save_skill(&SkillDraft::new("Go", "Gophers")).await.is_err());
        assert_eq!(vm.skills().await.len(), 1);
        assert!(drain(&mut rx)
            .iter()
            .any(|e| matches!(e, SyncEvent::Notice(msg) if msg.starts_with("Failed to create skill"))));
    }

    #[tokio::test]
    async fn test_delete_skill_behind_confirmation() {
        let api = FakeApi::new();
        api.own_skills.lock().unwrap().push(skill("s1", "Rust", 0, false));
        let (state, _rx) = harness(api.clone());
        let vm = ProfileViewModel::new(state);
        vm.refresh_skills().await;
        vm.edit_skill("s1").await.unwrap();

        let outcome = vm.delete_skill(&Answer(false), "s1").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Declined);
        assert_eq!(api.count("delete_skill"), 0);
        assert_eq!(vm.skills().await.len(), 1);

        let outcome = vm.delete_skill(&Answer(true), "s1").await.unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(vm.skills().await.is_empty());
        assert!(vm.editing().await.is_none());
    }

    #[tokio::test]
    async fn test_experiences() {
        let api = FakeApi::new();
        let (state, _rx) = harness(api.clone());
        let vm = ProfileViewModel::new(state);

        assert!(vm.add_experience(&ExperienceDraft::new(" ")).await.is_err());
        vm.add_experience(&ExperienceDraft::new("Interned at a startup"))
            .await
            .unwrap();
        let experiences = vm.experiences().await;
        assert_eq!(experiences.len(), 1);

        vm.delete_experience(&Answer(true), &experiences[0].id)
            .await
            .unwrap();
        assert!(vm.experiences().await.is_empty());
    }

    #[tokio::test]
    async fn test_view_user() {
        let api = FakeApi::new();
        api.profiles
            .lock()
            .unwrap()
            .insert("grace".to_string(), profile("grace", "grace@example.com"));
        let (state, _rx) = harness(api.clone());
        let vm = ProfileViewModel::new(state);

        let page = vm.view_user("grace").await.unwrap();
        assert_eq!(page.profile.email, "grace@example.com");
        assert!(api
            .calls()
            .contains(&"list_user_experiences:grace@example.com".to_string()));

        let err = vm.view_user("nobody").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Remote error 404: User not found");
    }
}
