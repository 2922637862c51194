//! Background refresh of the top-skills sidebar

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::viewmodel::FeedViewModel;

/// Re-fetch the top skills every `period` until the handle is aborted.
///
/// The first refresh happens one period after spawning; callers load the
/// feed themselves beforehand.
pub fn spawn_top_skills_refresh(feed: FeedViewModel, period: Duration) -> JoinHandle<()> {
    info!(period_secs = period.as_secs(), "Starting top skills refresh task");

    tokio::spawn(async move {
        let mut tick = interval_at(Instant::now() + period, period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tick.tick().await;
            let skills = feed.refresh_top_skills().await;
            debug!(count = skills.len(), "Top skills refreshed");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{harness, FakeApi};
    use skillzone_core::TopSkill;

    #[tokio::test(start_paused = true)]
    async fn test_refreshes_every_period() {
        let api = FakeApi::new();
        api.top_skills.lock().unwrap().push(TopSkill::new("Rust"));
        let (state, _rx) = harness(api.clone());
        let feed = FeedViewModel::new(state);

        let handle = spawn_top_skills_refresh(feed.clone(), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert_eq!(api.count("list_top_skills"), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(api.count("list_top_skills"), 1);
        assert_eq!(feed.top_skills().await, vec![TopSkill::new("Rust")]);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(api.count("list_top_skills"), 2);

        handle.abort();
    }
}
