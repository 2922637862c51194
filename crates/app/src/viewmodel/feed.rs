//! Dashboard feed: every skill plus the top-skills sidebar

use std::sync::Arc;

use skillzone_core::filter::{filter_skills, sort_by_recency};
use skillzone_core::{LikeState, SearchCategory, Skill, TopSkill};
use skillzone_net::Result;
use tokio::sync::RwLock;
use tracing::debug;

use crate::collection::{SharedSkills, SkillSet};
use crate::events::SyncEvent;
use crate::mutation::MutationEngine;
use crate::state::AppState;

#[derive(Clone)]
pub struct FeedViewModel {
    state: Arc<AppState>,
    engine: MutationEngine,
    skills: SharedSkills,
    top_skills: Arc<RwLock<Vec<TopSkill>>>,
    /// Top skill the feed is narrowed to
    selected: Arc<RwLock<Option<String>>>,
}

impl FeedViewModel {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            engine: MutationEngine::new(state.clone()),
            state,
            skills: SkillSet::shared(),
            top_skills: Arc::new(RwLock::new(Vec::new())),
            selected: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn load(&self) {
        tokio::join!(self.refresh_skills(), self.refresh_top_skills());
    }

    /// Re-fetch the feed, newest first; skills with a toggle in flight keep their counters
    pub async fn refresh_skills(&self) -> usize {
        let fetched = match self.state.require_session() {
            Ok(session) => self.state.api().list_skills(&session).await,
            Err(e) => Err(e),
        };
        let mut fetched = self.state.degrade_read("skills", fetched, Vec::new());
        sort_by_recency(&mut fetched);

        let count = {
            let mut skills = self.skills.write().await;
            skills.replace(fetched);
            skills.len()
        };
        debug!(count, "Feed refreshed");
        self.state.events().emit(SyncEvent::FeedUpdated { count });
        count
    }

    pub async fn refresh_top_skills(&self) -> Vec<TopSkill> {
        let fetched = self.state.api().list_top_skills().await;
        let fetched = self.state.degrade_read("top skills", fetched, Vec::new());

        *self.top_skills.write().await = fetched.clone();
        self.state
            .events()
            .emit(SyncEvent::TopSkillsUpdated(fetched.clone()));
        fetched
    }

    pub async fn select_top_skill(&self, name: &str) {
        *self.selected.write().await = Some(name.to_string());
    }

    pub async fn reset_filter(&self) {
        *self.selected.write().await = None;
    }

    /// The feed as displayed: narrowed by title to the selected top skill, if any
    pub async fn visible(&self) -> Vec<Skill> {
        let selected = self.selected.read().await.clone();
        let skills = self.skills.read().await;
        match selected {
            Some(name) => filter_skills(skills.items(), &name, SearchCategory::Skill),
            None => skills.items().to_vec(),
        }
    }

    pub async fn top_skills(&self) -> Vec<TopSkill> {
        self.top_skills.read().await.clone()
    }

    pub async fn toggle_like(&self, id: &str) -> Result<LikeState> {
        self.engine.toggle_like(&self.skills, id).await
    }
}
