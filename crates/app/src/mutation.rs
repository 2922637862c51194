//! Optimistic mutation engine
//!
//! Toggles are applied to the local collection before the request goes out
//! and then settled with the server's answer or rolled back. Upserts are
//! validated locally and never guessed into a collection; the caller
//! re-fetches. Deletes pass a confirmation gate first.

use std::future::Future;
use std::sync::Arc;

use skillzone_core::invariants::assert_toggle_transition;
use skillzone_core::{ExperienceDraft, LikeState, SkillDraft};
use skillzone_net::{Error, Result};
use tracing::{debug, info};

use crate::collection::SharedSkills;
use crate::confirm::Confirm;
use crate::events::SyncEvent;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user said no; nothing was sent
    Declined,
    Deleted,
}

#[derive(Clone)]
pub struct MutationEngine {
    state: Arc<AppState>,
}

impl MutationEngine {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Flip the viewer's like on a skill held in `skills`.
    ///
    /// Returns the server-confirmed counters. On failure the collection is
    /// back at its pre-toggle state and the error is returned.
    pub async fn toggle_like(&self, skills: &SharedSkills, id: &str) -> Result<LikeState> {
        let session = self.state.require_session()?;

        let toggle = skills
            .write()
            .await
            .begin_toggle(id)
            .ok_or_else(|| Error::Validation(format!("skill {} is not loaded", id)))?;
        assert_toggle_transition(toggle.before, toggle.tentative);
        self.publish(id, toggle.tentative);

        let result = self.state.api().toggle_like(&session, id).await;

        let confirmed = result.as_ref().ok().copied();
        let held = skills.write().await.settle_toggle(&toggle, confirmed);
        if let Some(likes) = held {
            self.publish(id, likes);
        }

        match result {
            Ok(server) => {
                debug!(id, likes = server.likes, has_liked = server.has_liked, "Like confirmed");
                Ok(server)
            }
            Err(e) => Err(self.state.report_mutation("update like", e)),
        }
    }

    /// Create or update a skill; the owning collection must be re-fetched afterwards
    pub async fn upsert_skill(&self, draft: &SkillDraft) -> Result<()> {
        let what = if draft.is_update() { "update skill" } else { "create skill" };
        draft
            .validate()
            .map_err(|e| self.state.report_mutation(what, e.into()))?;

        let session = self.state.require_session()?;
        self.perform(what, self.state.api().save_skill(&session, draft))
            .await?;
        info!(title = %draft.title, "Skill saved");
        Ok(())
    }

    pub async fn create_experience(&self, draft: &ExperienceDraft) -> Result<()> {
        draft
            .validate()
            .map_err(|e| self.state.report_mutation("add experience", e.into()))?;

        let session = self.state.require_session()?;
        self.perform("add experience", self.state.api().create_experience(&session, draft))
            .await?;
        info!("Experience added");
        Ok(())
    }

    /// Run a delete behind the confirmation gate
    pub async fn delete<F, Fut>(
        &self,
        confirm: &dyn Confirm,
        prompt: &str,
        what: &str,
        request: F,
    ) -> Result<DeleteOutcome>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        if !confirm.confirm(prompt) {
            debug!("Declined: {}", what);
            return Ok(DeleteOutcome::Declined);
        }

        self.perform(what, request()).await?;
        info!("Done: {}", what);
        Ok(DeleteOutcome::Deleted)
    }

    /// Await a mutation request, reporting failures
    pub async fn perform<T, Fut>(&self, what: &str, request: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        request
            .await
            .map_err(|e| self.state.report_mutation(what, e))
    }

    fn publish(&self, id: &str, likes: LikeState) {
        self.state.events().emit(SyncEvent::SkillUpdated {
            id: id.to_string(),
            likes,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::SkillSet;
    use crate::testing::{drain, harness, skill, Answer, FakeApi, Gate};

    async fn loaded(skills: Vec<skillzone_core::Skill>) -> SharedSkills {
        let shared = SkillSet::shared();
        shared.write().await.replace(skills);
        shared
    }

    #[tokio::test]
    async fn test_toggle_is_visible_before_response() {
        let api = FakeApi::new();
        api.skills.lock().unwrap().push(skill("s1", "Rust", 4, false));
        let gate = Arc::new(Gate::default());
        *api.like_gate.lock().unwrap() = Some(gate.clone());
        let (state, mut rx) = harness(api.clone());
        let engine = MutationEngine::new(state);
        let skills = loaded(vec![skill("s1", "Rust", 4, false)]).await;

        let task = {
            let engine = engine.clone();
            let skills = skills.clone();
            tokio::spawn(async move { engine.toggle_like(&skills, "s1").await })
        };

        gate.entered.notified().await;
        assert_eq!(
            skills.read().await.get("s1").unwrap().like_state(),
            LikeState::new(5, true)
        );
        assert_eq!(
            drain(&mut rx),
            vec![SyncEvent::SkillUpdated {
                id: "s1".to_string(),
                likes: LikeState::new(5, true)
            }]
        );

        gate.release.notify_one();
        let confirmed = task.await.unwrap().unwrap();
        assert_eq!(confirmed, LikeState::new(5, true));
    }

    #[tokio::test]
    async fn test_toggle_rolls_back_on_failure() {
        let api = FakeApi::new();
        api.fail("toggle_like", 500);
        let (state, mut rx) = harness(api.clone());
        let engine = MutationEngine::new(state);
        let skills = loaded(vec![skill("s1", "Rust", 4, false)]).await;

        let err = engine.toggle_like(&skills, "s1").await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        assert_eq!(
            skills.read().await.get("s1").unwrap().like_state(),
            LikeState::new(4, false)
        );

        let events = drain(&mut rx);
        assert_eq!(
            events.last(),
            Some(&SyncEvent::Notice(
                "Failed to update like: Remote error 500: toggle_like failed".to_string()
            ))
        );
        assert!(events.contains(&SyncEvent::SkillUpdated {
            id: "s1".to_string(),
            likes: LikeState::new(4, false)
        }));
    }

    #[tokio::test]
    async fn test_server_state_replaces_tentative() {
        let api = FakeApi::new();
        *api.like_answer.lock().unwrap() = Some(LikeState::new(12, true));
        let (state, _rx) = harness(api);
        let engine = MutationEngine::new(state);
        let skills = loaded(vec![skill("s1", "Rust", 4, false)]).await;

        engine.toggle_like(&skills, "s1").await.unwrap();
        assert_eq!(
            skills.read().await.get("s1").unwrap().like_state(),
            LikeState::new(12, true)
        );
    }

    #[tokio::test]
    async fn test_unlike_never_goes_negative() {
        let api = FakeApi::new();
        api.fail("toggle_like", 503);
        let (state, mut rx) = harness(api);
        let engine = MutationEngine::new(state);
        let skills = loaded(vec![skill("s1", "Rust", 0, true)]).await;

        let _ = engine.toggle_like(&skills, "s1").await;
        assert_eq!(
            drain(&mut rx).first(),
            Some(&SyncEvent::SkillUpdated {
                id: "s1".to_string(),
                likes: LikeState::new(0, false)
            })
        );
        assert_eq!(
            skills.read().await.get("s1").unwrap().like_state(),
            LikeState::new(0, true)
        );
    }

    #[tokio::test]
    async fn test_expired_credential_clears_session() {
        let api = FakeApi::new();
        api.fail("toggle_like", 401);
        let (state, mut rx) = harness(api);
        let engine = MutationEngine::new(state.clone());
        let skills = loaded(vec![skill("s1", "Rust", 1, false)]).await;

        let err = engine.toggle_like(&skills, "s1").await.unwrap_err();
        assert!(err.is_unauthorized());
        assert!(state.session().get_session().is_none());
        assert!(drain(&mut rx).contains(&SyncEvent::SessionExpired));
    }

    #[tokio::test]
    async fn test_upsert_validates_before_sending() {
        let api = FakeApi::new();
        let (state, _rx) = harness(api.clone());
        let engine = MutationEngine::new(state);

        let err = engine
            .upsert_skill(&SkillDraft::new("   ", "body"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(api.count("save_skill"), 0);

        engine
            .upsert_skill(&SkillDraft::new("Rust", "Systems"))
            .await
            .unwrap();
        assert_eq!(api.calls(), vec!["save_skill:new".to_string()]);
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let api = FakeApi::new();
        let (state, _rx) = harness(api.clone());
        let engine = MutationEngine::new(state.clone());
        let session = state.require_session().unwrap();

        let outcome = engine
            .delete(&Answer(false), "Delete?", "delete skill", || {
                state.api().delete_skill(&session, "s1")
            })
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Declined);
        assert!(api.calls().is_empty());

        let outcome = engine
            .delete(&Answer(true), "Delete?", "delete skill", || {
                state.api().delete_skill(&session, "s1")
            })
            .await
            .unwrap();
        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert_eq!(api.calls(), vec!["delete_skill:s1".to_string()]);
    }
}
