//! Remote skill search
//!
//! Every query bumps a generation counter. Under
//! [`StalePolicy::DiscardStale`] a response is only shown if no newer query
//! was issued while it was in flight; under
//! [`StalePolicy::LastArrivalWins`] whichever response lands last is shown.
//! In-flight requests are never cancelled.

use std::sync::Arc;

use skillzone_core::filter::sort_by_likes;
use skillzone_core::invariants::{assert_generation_issued, assert_sorted_by_likes};
use skillzone_core::{LikeState, Skill, StalePolicy};
use skillzone_net::Result;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::collection::{SharedSkills, SkillSet};
use crate::events::SyncEvent;
use crate::mutation::MutationEngine;
use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading {
        query: String,
    },
    Ready {
        query: String,
        count: usize,
    },
    Failed {
        query: String,
        message: String,
    },
}

/// What became of one search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The response was displayed and left the search in this state
    Shown(SearchStatus),
    /// A newer query superseded it
    Discarded,
}

#[derive(Debug, Default)]
struct Stream {
    generation: u64,
    status: SearchStatus,
}

#[derive(Clone)]
pub struct SearchViewModel {
    state: Arc<AppState>,
    engine: MutationEngine,
    policy: StalePolicy,
    results: SharedSkills,
    stream: Arc<RwLock<Stream>>,
}

impl SearchViewModel {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            engine: MutationEngine::new(state.clone()),
            policy: state.config().sync.search_policy,
            state,
            results: SkillSet::shared(),
            stream: Arc::new(RwLock::new(Stream::default())),
        }
    }

    /// Issue a query; a blank query clears the search
    pub async fn search(&self, query: &str) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            self.clear().await;
            return SearchOutcome::Shown(SearchStatus::Idle);
        }

        let generation = {
            let mut stream = self.stream.write().await;
            stream.generation += 1;
            stream.status = SearchStatus::Loading {
                query: query.to_string(),
            };
            stream.generation
        };
        self.announce(SearchStatus::Loading {
            query: query.to_string(),
        });

        let response = match self.state.require_session() {
            Ok(session) => self.state.api().search_skills(&session, query).await,
            Err(e) => Err(e),
        };

        // Held while the results are installed so a newer response cannot interleave
        let mut stream = self.stream.write().await;
        assert_generation_issued(generation, stream.generation);
        if self.policy == StalePolicy::DiscardStale && generation != stream.generation {
            debug!(query, generation, latest = stream.generation, "Discarding stale search response");
            return SearchOutcome::Discarded;
        }

        let status = match response {
            Ok(mut found) => {
                sort_by_likes(&mut found);
                assert_sorted_by_likes(&found);
                let count = found.len();
                self.results.write().await.replace(found);
                SearchStatus::Ready {
                    query: query.to_string(),
                    count,
                }
            }
            Err(e) => {
                warn!(error = %e, query, "Search failed");
                self.state.observe_failure(&e);
                self.results.write().await.replace(Vec::new());
                SearchStatus::Failed {
                    query: query.to_string(),
                    message: e.to_string(),
                }
            }
        };
        stream.status = status.clone();
        drop(stream);

        self.announce(status.clone());
        SearchOutcome::Shown(status)
    }

    /// Back to idle; responses still in flight are superseded
    pub async fn clear(&self) {
        let mut stream = self.stream.write().await;
        stream.generation += 1;
        stream.status = SearchStatus::Idle;
        self.results.write().await.replace(Vec::new());
        drop(stream);

        self.announce(SearchStatus::Idle);
    }

    pub async fn status(&self) -> SearchStatus {
        self.stream.read().await.status.clone()
    }

    pub async fn results(&self) -> Vec<Skill> {
        self.results.read().await.items().to_vec()
    }

    pub async fn toggle_like(&self, id: &str) -> Result<LikeState> {
        self.engine.toggle_like(&self.results, id).await
    }

    fn announce(&self, status: SearchStatus) {
        self.state.events().emit(SyncEvent::SearchChanged(status));
    }
}
