// src/models/mod.rs

//! Domain models for the contest tracker.

mod config;
mod contest;

// Re-export all public types
pub use config::{
    CodeforcesConfig, Config, FetchConfig, LoggingConfig, MAX_INTERVAL_WEEKS, OutputConfig,
    ScheduleConfig, ScheduleEntry,
};
pub use contest::{Contest, ContestStatus, Platform, format_duration, time_until};
