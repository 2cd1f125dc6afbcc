//! Contest data structures.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A contest platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    Codeforces,
    CodeChef,
    LeetCode,
    AtCoder,
}

impl Platform {
    /// Every platform, in display order.
    pub const ALL: [Platform; 4] = [
        Platform::Codeforces,
        Platform::CodeChef,
        Platform::LeetCode,
        Platform::AtCoder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Codeforces => "Codeforces",
            Platform::CodeChef => "CodeChef",
            Platform::LeetCode => "LeetCode",
            Platform::AtCoder => "AtCoder",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::validation(format!("Unknown platform '{s}'")))
    }
}

/// Lifecycle of a contest. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContestStatus {
    Upcoming,
    Running,
    Finished,
}

impl fmt::Display for ContestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContestStatus::Upcoming => "upcoming",
            ContestStatus::Running => "running",
            ContestStatus::Finished => "finished",
        })
    }
}

/// A contest normalized from any source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Contest {
    /// Platform-prefixed identifier, unique across sources
    pub id: String,

    /// Display name
    pub name: String,

    /// Hosting platform
    pub platform: Platform,

    /// Start instant
    pub start_time: DateTime<Utc>,

    /// Length in minutes
    pub duration_minutes: u32,

    /// Registration or entry link
    pub url: String,

    pub status: ContestStatus,
}

impl Contest {
    /// Format the contest for display using a template.
    ///
    /// Supported placeholders:
    /// - `{id}`, `{name}`, `{platform}`, `{url}`, `{status}`
    /// - `{start}`: start time in the local timezone
    /// - `{duration}`: e.g. `1h 30m`
    /// - `{countdown}`: time left until start relative to `now`
    pub fn format(&self, template: &str, now: DateTime<Utc>) -> String {
        let start = self
            .start_time
            .with_timezone(&Local)
            .format("%a %b %d %H:%M %Z")
            .to_string();

        template
            .replace("{id}", &self.id)
            .replace("{name}", &self.name)
            .replace("{platform}", self.platform.as_str())
            .replace("{start}", &start)
            .replace("{duration}", &format_duration(self.duration_minutes))
            .replace("{countdown}", &time_until(self.start_time, now))
            .replace("{url}", &self.url)
            .replace("{status}", &self.status.to_string())
    }
}

/// Render a duration in minutes as `45m`, `2h` or `1h 30m`.
pub fn format_duration(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;

    match (hours, mins) {
        (0, m) => format!("{m}m"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

/// Describe how far away `start` is from `now`.
pub fn time_until(start: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = start - now;
    let days = diff.num_days();
    let hours = diff.num_hours() % 24;

    if days > 0 {
        format!("in {days}d {hours}h")
    } else if hours > 0 {
        format!("in {hours}h")
    } else {
        "starting soon".to_string()
    }
}
