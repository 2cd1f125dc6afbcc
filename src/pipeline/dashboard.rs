// src/pipeline/dashboard.rs

//! Dashboard session: refresh lifecycle and derived views.
//!
//! ```text
//! Idle ──refresh──▶ Loading ──ok──▶ Loaded { error: None }
//!                      │
//!                      └──err──▶ Loaded { error: Some(..) }, contests cleared
//! ```
//!
//! Filter changes never reload; the visible list and counts are recomputed
//! from the last loaded contests after every mutation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Contest, Platform};
use crate::notify::{LogNotifier, Notification, Notifier, RETRY_LATER};
use crate::pipeline::filter::{
    ContestCounts, PlatformFilter, apply_filter, clear, count_by_platform, toggle,
};

/// Source of the full contest list for a dashboard.
#[async_trait]
pub trait ContestFeed: Send + Sync {
    async fn load(&self) -> Result<Vec<Contest>>;
}

/// Load lifecycle of a dashboard session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded { error: Option<String> },
}

/// Result of a `Dashboard::refresh` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Loaded this many contests
    Loaded(usize),
    /// Loading failed; contests were cleared
    Failed,
    /// Another refresh was already running
    Skipped,
}

/// Snapshot of what a dashboard currently shows.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub state: LoadState,
    /// Contests passing the current selection
    pub contests: Vec<Contest>,
    /// Counts over the full, unfiltered list
    pub counts: ContestCounts,
    pub selection: PlatformFilter,
    pub window_days: u32,
}

impl DashboardView {
    /// Text to show instead of an empty list.
    pub fn empty_message(&self) -> Option<String> {
        if !self.contests.is_empty() {
            return None;
        }
        let scope = if self.selection.is_empty() {
            ""
        } else {
            "for selected platforms "
        };
        Some(format!(
            "No upcoming contests found {}in the next {} days.",
            scope, self.window_days
        ))
    }
}

#[derive(Debug, Default)]
struct Session {
    state: LoadState,
    contests: Vec<Contest>,
    selection: PlatformFilter,
    visible: Vec<Contest>,
    counts: ContestCounts,
}

impl Session {
    fn recompute(&mut self) {
        self.visible = apply_filter(&self.contests, &self.selection);
        self.counts = count_by_platform(&self.contests);
    }
}

/// Clears the refresh flag when a refresh ends, however it ends.
struct RefreshGuard<'a>(&'a AtomicBool);

impl Drop for RefreshGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A single viewer's dashboard session.
pub struct Dashboard<F> {
    feed: F,
    notifier: Box<dyn Notifier>,
    refreshing: AtomicBool,
    session: Mutex<Session>,
    window_days: u32,
}

impl<F: ContestFeed> Dashboard<F> {
    pub fn new(feed: F) -> Self {
        Self {
            feed,
            notifier: Box::new(LogNotifier),
            refreshing: AtomicBool::new(false),
            session: Mutex::new(Session::default()),
            window_days: 7,
        }
    }

    /// Send notifications to `notifier` instead of the log.
    pub fn with_notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Box::new(notifier);
        self
    }

    /// Look-ahead length quoted in empty-list messages.
    pub fn with_window_days(mut self, window_days: u32) -> Self {
        self.window_days = window_days;
        self
    }

    pub fn feed(&self) -> &F {
        &self.feed
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }

    /// Load the contest list, for the initial load and manual refreshes.
    ///
    /// Returns `Skipped` without touching the feed when a refresh is
    /// already in flight.
    pub async fn refresh(&self) -> RefreshOutcome {
        if self
            .refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            log::debug!("Refresh already in progress, ignoring request");
            return RefreshOutcome::Skipped;
        }
        let _guard = RefreshGuard(&self.refreshing);

        self.lock().state = LoadState::Loading;

        let result = self.feed.load().await;

        let (outcome, notification) = {
            let mut session = self.lock();
            let outcome = match result {
                Ok(contests) => {
                    let count = contests.len();
                    session.contests = contests;
                    session.state = LoadState::Loaded { error: None };
                    (RefreshOutcome::Loaded(count), Notification::Loaded { count })
                }
                Err(e) => {
                    log::error!("Error loading contests: {}", e);
                    session.contests.clear();
                    session.state = LoadState::Loaded {
                        error: Some(e.to_string()),
                    };
                    (
                        RefreshOutcome::Failed,
                        Notification::Failed {
                            message: RETRY_LATER.to_string(),
                        },
                    )
                }
            };
            session.recompute();
            outcome
        };

        self.notifier.notify(&notification);
        outcome
    }

    /// Add or remove `platform` from the selection.
    pub fn toggle_platform(&self, platform: Platform) -> PlatformFilter {
        let mut session = self.lock();
        session.selection = toggle(&session.selection, platform);
        session.recompute();
        session.selection.clone()
    }

    /// Reset the selection so every contest is visible.
    pub fn clear_filters(&self) {
        let mut session = self.lock();
        session.selection = clear(&session.selection);
        session.recompute();
    }

    pub fn state(&self) -> LoadState {
        self.lock().state.clone()
    }

    /// Snapshot the visible contests, counts and selection.
    pub fn view(&self) -> DashboardView {
        let session = self.lock();
        DashboardView {
            state: session.state.clone(),
            contests: session.visible.clone(),
            counts: session.counts.clone(),
            selection: session.selection.clone(),
            window_days: self.window_days,
        }
    }
}
