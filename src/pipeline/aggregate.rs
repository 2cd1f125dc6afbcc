// src/pipeline/aggregate.rs

//! Contest aggregation.
//!
//! Runs every source concurrently, then merges their lists into one
//! start-time ordered list. A source that fails, hangs or panics
//! contributes nothing; the others are unaffected.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;

use crate::error::{AppError, Result};
use crate::models::{Config, Contest};
use crate::pipeline::dashboard::ContestFeed;
use crate::services::{ContestSource, build_sources};
use crate::utils::http::create_async_client;

/// Default upper bound on one source's fetch.
const DEFAULT_SOURCE_TIMEOUT: Duration = Duration::from_secs(15);

/// How a single source fared in one aggregation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceOutcome {
    /// Completed with this many contests (zero after an internal failure)
    Fetched(usize),
    TimedOut,
    Panicked,
}

impl fmt::Display for SourceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceOutcome::Fetched(count) => write!(f, "{count} contests"),
            SourceOutcome::TimedOut => f.write_str("timed out"),
            SourceOutcome::Panicked => f.write_str("panicked"),
        }
    }
}

/// Summary of an aggregation run.
#[derive(Debug, Default)]
pub struct AggregateOutcome {
    /// Merged contests, sorted by start time
    pub contests: Vec<Contest>,
    /// Per-source results in registration order
    pub sources: Vec<(String, SourceOutcome)>,
    /// Contests dropped because an earlier source already used their id
    pub duplicates: usize,
}

impl AggregateOutcome {
    fn log_summary(&self) {
        log::info!(
            "Aggregated {} contests from {} sources",
            self.contests.len(),
            self.sources.len()
        );
        for (name, outcome) in &self.sources {
            log::debug!("    {}: {}", name, outcome);
        }
        if self.duplicates > 0 {
            log::warn!("Dropped {} contests with duplicate ids", self.duplicates);
        }
    }
}

/// Fan-out/join over all registered sources.
pub struct Aggregator {
    sources: Vec<Arc<dyn ContestSource>>,
    source_timeout: Duration,
}

impl Aggregator {
    /// Create an aggregator over sources in registration order.
    pub fn new(sources: Vec<Arc<dyn ContestSource>>) -> Self {
        Self {
            sources,
            source_timeout: DEFAULT_SOURCE_TIMEOUT,
        }
    }

    /// Create an aggregator with every source the configuration enables.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = create_async_client(&config.fetch)?;
        let sources = build_sources(config, &client);
        Ok(Self::new(sources).with_timeout(Duration::from_secs(config.fetch.source_timeout_secs)))
    }

    /// Set the per-source timeout.
    pub fn with_timeout(mut self, source_timeout: Duration) -> Self {
        self.source_timeout = source_timeout;
        self
    }

    pub fn sources(&self) -> &[Arc<dyn ContestSource>] {
        &self.sources
    }

    /// Run all sources and merge their results.
    ///
    /// Every source is spawned before any is awaited. Contests are
    /// concatenated in registration order, ids already seen are dropped,
    /// and the result is stably sorted by start time so simultaneous
    /// contests keep source order.
    pub async fn run(&self) -> Result<AggregateOutcome> {
        let handles: Vec<_> = self
            .sources
            .iter()
            .map(|source| {
                let source = Arc::clone(source);
                let limit = self.source_timeout;
                tokio::spawn(async move { tokio::time::timeout(limit, source.fetch()).await })
            })
            .collect();

        let results = join_all(handles).await;

        let mut outcome = AggregateOutcome::default();
        let mut seen = HashSet::new();

        for (source, joined) in self.sources.iter().zip(results) {
            let status = match joined {
                Ok(Ok(contests)) => {
                    let count = contests.len();
                    for contest in contests {
                        if seen.insert(contest.id.clone()) {
                            outcome.contests.push(contest);
                        } else {
                            log::warn!(
                                "{}: dropping contest with duplicate id {}",
                                source.name(),
                                contest.id
                            );
                            outcome.duplicates += 1;
                        }
                    }
                    SourceOutcome::Fetched(count)
                }
                Ok(Err(_)) => {
                    log::warn!(
                        "Error fetching {} contests: timed out after {:?}",
                        source.name(),
                        self.source_timeout
                    );
                    SourceOutcome::TimedOut
                }
                Err(e) if e.is_panic() => {
                    log::error!("Error fetching {} contests: source panicked", source.name());
                    SourceOutcome::Panicked
                }
                Err(e) => {
                    return Err(AppError::aggregation(format!(
                        "{} task failed: {}",
                        source.name(),
                        e
                    )));
                }
            };
            outcome.sources.push((source.name().to_string(), status));
        }

        outcome.contests.sort_by_key(|c| c.start_time);
        Ok(outcome)
    }

    /// Fetch all contests, surfacing aggregation-level failures.
    pub async fn try_fetch_all(&self) -> Result<Vec<Contest>> {
        let outcome = self.run().await?;
        outcome.log_summary();
        Ok(outcome.contests)
    }

    /// Fetch all contests. Never fails: aggregation failures yield an empty list.
    pub async fn fetch_all(&self) -> Vec<Contest> {
        self.try_fetch_all().await.unwrap_or_else(|e| {
            log::error!("Error fetching contests: {}", e);
            Vec::new()
        })
    }
}

#[async_trait]
impl ContestFeed for Aggregator {
    async fn load(&self) -> Result<Vec<Contest>> {
        self.try_fetch_all().await
    }
}
