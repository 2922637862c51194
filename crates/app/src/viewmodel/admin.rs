//! Admin panel: curated top skills and user management
//!
//! Every operation requires the admin role.

use std::sync::Arc;

use skillzone_core::filter::{filter_top_skills, filter_users};
use skillzone_core::{normalize_top_skill_name, SearchCategory, TopSkill, UserSummary};
use skillzone_net::Result;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::confirm::Confirm;
use crate::events::SyncEvent;
use crate::mutation::{DeleteOutcome, MutationEngine};
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    /// Blank or identical name
    Unchanged,
    Declined,
    Renamed,
}

#[derive(Clone)]
pub struct AdminViewModel {
    state: Arc<AppState>,
    engine: MutationEngine,
    top_skills: Arc<RwLock<Vec<TopSkill>>>,
    users: Arc<RwLock<Vec<UserSummary>>>,
    selected: Arc<RwLock<Option<UserSummary>>>,
}

impl AdminViewModel {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            engine: MutationEngine::new(state.clone()),
            state,
            top_skills: Arc::new(RwLock::new(Vec::new())),
            users: Arc::new(RwLock::new(Vec::new())),
            selected: Arc::new(RwLock::new(None)),
        }
    }

    fn guard(&self) -> Result<()> {
        self.state.require_admin().map(|_| ())
    }

    /// Fetch the curated list; a failed read shows the built-in defaults
    pub async fn load_top_skills(&self) -> Result<Vec<TopSkill>> {
        self.guard()?;
        let skills = match self.state.api().list_top_skills().await {
            Ok(skills) => skills,
            Err(e) => {
                warn!(error = %e, "Failed to fetch top skills, showing defaults");
                TopSkill::defaults()
            }
        };

        *self.top_skills.write().await = skills.clone();
        self.state
            .events()
            .emit(SyncEvent::TopSkillsUpdated(skills.clone()));
        Ok(skills)
    }

    pub async fn top_skills(&self) -> Vec<TopSkill> {
        self.top_skills.read().await.clone()
    }

    pub async fn filtered_top_skills(&self, term: &str) -> Vec<TopSkill> {
        filter_top_skills(&self.top_skills.read().await, term)
    }

    pub async fn add_top_skill(&self, name: &str) -> Result<()> {
        self.guard()?;
        let name = normalize_top_skill_name(name)
            .map_err(|e| self.state.report_mutation("add skill", e.into()))?;

        self.engine
            .perform("add skill", self.state.api().create_top_skill(&name))
            .await?;
        info!(name = %name, "Top skill added");
        self.load_top_skills().await?;
        Ok(())
    }

    pub async fn delete_top_skill(&self, confirm: &dyn Confirm, name: &str) -> Result<DeleteOutcome> {
        self.guard()?;
        let prompt = format!(
            "Are you sure you want to delete the skill \"{}\"? This action cannot be undone.",
            name
        );
        let outcome = self
            .engine
            .delete(confirm, &prompt, "delete skill", || {
                self.state.api().delete_top_skill(name)
            })
            .await?;

        if outcome == DeleteOutcome::Deleted {
            self.load_top_skills().await?;
        }
        Ok(outcome)
    }

    /// Replace `old` by `new`: the old entry is deleted, then the new one created
    pub async fn rename_top_skill(
        &self,
        confirm: &dyn Confirm,
        old: &str,
        new: &str,
    ) -> Result<RenameOutcome> {
        self.guard()?;
        let new = new.trim();
        if new.is_empty() || new == old {
            return Ok(RenameOutcome::Unchanged);
        }

        let prompt = format!("Are you sure you want to change \"{}\" to \"{}\"?", old, new);
        if !confirm.confirm(&prompt) {
            return Ok(RenameOutcome::Declined);
        }

        self.engine
            .perform("rename skill", self.state.api().delete_top_skill(old))
            .await?;
        let created = self
            .engine
            .perform("rename skill", self.state.api().create_top_skill(new))
            .await;
        if let Err(e) = created {
            // The old entry is already gone on the server
            self.load_top_skills().await?;
            return Err(e);
        }
        info!(old, new, "Top skill renamed");

        self.load_top_skills().await?;
        Ok(RenameOutcome::Renamed)
    }

    /// Fetch all users; a failed read leaves the list empty
    pub async fn load_users(&self) -> Result<usize> {
        self.guard()?;
        let fetched = self.state.api().list_users().await;
        let fetched = self.state.degrade_read("users", fetched, Vec::new());

        let count = fetched.len();
        *self.users.write().await = fetched;
        self.state.events().emit(SyncEvent::UsersUpdated { count });
        Ok(count)
    }

    pub async fn users(&self) -> Vec<UserSummary> {
        self.users.read().await.clone()
    }

    pub async fn filtered_users(&self, term: &str, category: SearchCategory) -> Vec<UserSummary> {
        filter_users(&self.users.read().await, term, category)
    }

    /// Open a user's details
    pub async fn select_user(&self, name: &str) -> Result<UserSummary> {
        self.guard()?;
        let details = self
            .state
            .api()
            .get_user_details(name)
            .await
            .map_err(|e| {
                warn!(error = %e, name, "Failed to fetch user details");
                e
            })?;

        *self.selected.write().await = Some(details.clone());
        Ok(details)
    }

    pub async fn selected(&self) -> Option<UserSummary> {
        self.selected.read().await.clone()
    }

    pub async fn delete_user(&self, confirm: &dyn Confirm, user: &UserSummary) -> Result<DeleteOutcome> {
        self.guard()?;
        let prompt = format!(
            "Are you sure you want to delete the user \"{}\"? This action cannot be undone.",
            user.name
        );
        let outcome = self
            .engine
            .delete(confirm, &prompt, "delete user", || {
                self.state.api().delete_user(&user.id)
            })
            .await?;

        if outcome == DeleteOutcome::Deleted {
            self.load_users().await?;
            let mut selected = self.selected.write().await;
            if selected.as_ref().is_some_and(|s| s.id == user.id) {
                *selected = None;
            }
        }
        Ok(outcome)
    }
}
