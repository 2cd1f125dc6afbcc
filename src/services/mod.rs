//! Contest sources.
//!
//! Every platform is served by a `ContestSource`:
//! - Live feeds (`CodeforcesSource`)
//! - Synthetic weekly schedules (`ScheduledSource`)
//!
//! A source's fallible `try_fetch` is always consumed through `fetch_at`,
//! which logs failures, returns an empty list instead and trims the result
//! to the look-ahead window.

mod codeforces;
mod schedule;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::error::Result;
use crate::models::{Config, Contest, Platform};

pub use codeforces::{CodeforcesSource, parse_contest_list};
pub use schedule::ScheduledSource;

/// Inclusive interval `[now, now + length]` admitting contests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookAhead {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl LookAhead {
    pub fn new(now: DateTime<Utc>, length: Duration) -> Self {
        Self {
            start: now,
            end: now + length,
        }
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

/// A producer of normalized contests for one platform.
#[async_trait]
pub trait ContestSource: Send + Sync {
    fn platform(&self) -> Platform;

    /// Human-readable source name for logs.
    fn name(&self) -> &str;

    /// Length of the admission window.
    fn look_ahead(&self) -> Duration {
        Duration::days(7)
    }

    /// Retrieve contests, failing on any retrieval or payload problem.
    async fn try_fetch(&self, now: DateTime<Utc>) -> Result<Vec<Contest>>;

    /// Retrieve contests starting within the window opened at `now`.
    ///
    /// Never fails: errors are logged and yield an empty list.
    async fn fetch_at(&self, now: DateTime<Utc>) -> Vec<Contest> {
        let window = LookAhead::new(now, self.look_ahead());
        match self.try_fetch(now).await {
            Ok(mut contests) => {
                contests.retain(|c| window.contains(c.start_time));
                log::debug!("{}: {} contests in window", self.name(), contests.len());
                contests
            }
            Err(e) => {
                log::warn!("Error fetching {} contests: {}", self.name(), e);
                Vec::new()
            }
        }
    }

    /// Retrieve contests starting within the next window from the current instant.
    async fn fetch(&self) -> Vec<Contest> {
        self.fetch_at(Utc::now()).await
    }
}

/// Build every configured source in registration order.
///
/// Codeforces comes first (when enabled), then schedules in config order.
pub fn build_sources(config: &Config, client: &reqwest::Client) -> Vec<Arc<dyn ContestSource>> {
    let look_ahead = config.fetch.look_ahead();
    let mut sources: Vec<Arc<dyn ContestSource>> = Vec::new();

    if config.codeforces.enabled {
        sources.push(Arc::new(CodeforcesSource::new(
            client.clone(),
            config.codeforces.clone(),
            look_ahead,
        )));
    }

    for schedule in &config.schedules {
        sources.push(Arc::new(ScheduledSource::new(schedule.clone(), look_ahead)));
    }

    sources
}
