//! Events from the sync layer to the front end

use skillzone_core::{LikeState, Role, TopSkill};
use tokio::sync::mpsc;
use tracing::trace;

use crate::viewmodel::SearchStatus;

/// Something the front end should re-render or announce
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    SessionStarted(Role),
    SessionEnded,
    /// A 401 or a missing credential; the user has to sign in again
    SessionExpired,
    FeedUpdated { count: usize },
    /// Like counters changed (tentative, confirmed, or rolled back)
    SkillUpdated { id: String, likes: LikeState },
    TopSkillsUpdated(Vec<TopSkill>),
    SearchChanged(SearchStatus),
    ProfileUpdated,
    ExperiencesUpdated { count: usize },
    UsersUpdated { count: usize },
    /// Blocking notification for a failed mutation
    Notice(String),
}

/// Sender half handed to every view model
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: mpsc::UnboundedSender<SyncEvent>,
}

impl EventBus {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SyncEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: SyncEvent) {
        if self.tx.send(event).is_err() {
            trace!("No event listener");
        }
    }
}
