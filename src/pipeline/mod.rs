//! Pipeline stages from sources to the dashboard.
//!
//! - `aggregate`: Run every source concurrently and merge the results
//! - `filter`: Derive visible contests and per-platform counts
//! - `dashboard`: Refresh lifecycle of a viewing session

pub mod aggregate;
pub mod dashboard;
pub mod filter;

pub use aggregate::{AggregateOutcome, Aggregator, SourceOutcome};
pub use dashboard::{ContestFeed, Dashboard, DashboardView, LoadState, RefreshOutcome};
pub use filter::{ContestCounts, PlatformFilter, apply_filter, clear, count_by_platform, toggle};
