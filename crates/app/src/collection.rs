//! Skill collections held by the view models
//!
//! A collection tracks which skills have a like toggle in flight so that a
//! refresh landing in the meantime keeps the tentative counters instead of
//! overwriting them with the server's pre-toggle view.

use std::collections::HashMap;
use std::sync::Arc;

use skillzone_core::invariants::assert_skill_id_valid;
use skillzone_core::{LikeState, Skill};
use tokio::sync::RwLock;

pub type SharedSkills = Arc<RwLock<SkillSet>>;

/// Handle for a toggle that has been applied locally but not settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingToggle {
    pub id: String,
    pub ticket: u64,
    pub before: LikeState,
    pub tentative: LikeState,
}

#[derive(Debug, Default)]
pub struct SkillSet {
    items: Vec<Skill>,
    /// Skill id -> ticket of its most recent unsettled toggle
    pending: HashMap<String, u64>,
    next_ticket: u64,
}

impl SkillSet {
    pub fn shared() -> SharedSkills {
        Arc::new(RwLock::new(Self::default()))
    }

    pub fn items(&self) -> &[Skill] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Skill> {
        self.items.iter().find(|s| s.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Skill> {
        self.items.iter_mut().find(|s| s.id == id)
    }

    pub fn has_pending(&self, id: &str) -> bool {
        self.pending.contains_key(id)
    }

    /// Install freshly fetched skills, keeping local counters of skills with a toggle in flight
    pub fn replace(&mut self, mut fetched: Vec<Skill>) {
        for skill in &mut fetched {
            assert_skill_id_valid(skill, "SkillSet::replace");
            if !self.pending.contains_key(&skill.id) {
                continue;
            }
            if let Some(local) = self.get(&skill.id) {
                skill.set_like_state(local.like_state());
            }
        }
        self.items = fetched;
    }

    pub fn remove(&mut self, id: &str) -> Option<Skill> {
        let index = self.items.iter().position(|s| s.id == id)?;
        self.pending.remove(id);
        Some(self.items.remove(index))
    }

    /// Apply the tentative flip of a like; `None` if the skill is not held
    pub fn begin_toggle(&mut self, id: &str) -> Option<PendingToggle> {
        let skill = self.get_mut(id)?;
        let before = skill.like_state();
        let tentative = before.toggled();
        skill.set_like_state(tentative);

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.pending.insert(id.to_string(), ticket);
        Some(PendingToggle {
            id: id.to_string(),
            ticket,
            before,
            tentative,
        })
    }

    /// Settle a toggle: `Some` installs the server's counters, `None` restores the pre-toggle state.
    ///
    /// Only the most recent toggle of a skill touches its counters; an older
    /// one settling late leaves whatever the newer toggle holds.
    /// Returns the counters now held, if the skill is still in the collection.
    pub fn settle_toggle(
        &mut self,
        toggle: &PendingToggle,
        confirmed: Option<LikeState>,
    ) -> Option<LikeState> {
        let latest = self.pending.get(&toggle.id) == Some(&toggle.ticket);
        if latest {
            self.pending.remove(&toggle.id);
        }

        let skill = self.get_mut(&toggle.id)?;
        if latest {
            skill.set_like_state(confirmed.unwrap_or(toggle.before));
        }
        Some(skill.like_state())
    }
}
