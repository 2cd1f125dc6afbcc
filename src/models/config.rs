//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::Platform;

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP and fan-out behavior settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Live Codeforces feed
    #[serde(default)]
    pub codeforces: CodeforcesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Console rendering
    #[serde(default)]
    pub output: OutputConfig,

    /// Synthetic schedules for platforms without a public feed
    #[serde(default = "defaults::schedules")]
    pub schedules: Vec<ScheduleConfig>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.fetch.user_agent.trim().is_empty() {
            return Err(AppError::validation("fetch.user_agent is empty"));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(AppError::validation("fetch.timeout_secs must be > 0"));
        }
        if self.fetch.source_timeout_secs == 0 {
            return Err(AppError::validation(
                "fetch.source_timeout_secs must be > 0",
            ));
        }
        if self.fetch.window_days == 0 {
            return Err(AppError::validation("fetch.window_days must be > 0"));
        }
        if self.codeforces.enabled {
            url::Url::parse(&self.codeforces.api_url)?;
            url::Url::parse(&self.codeforces.contest_url_base)?;
        }

        // Ids are `<prefix>-...`, so distinct prefixes keep ids distinct across sources.
        let mut prefixes = HashSet::new();
        if self.codeforces.enabled {
            if self.codeforces.id_prefix.trim().is_empty() {
                return Err(AppError::validation("codeforces.id_prefix is empty"));
            }
            prefixes.insert(self.codeforces.id_prefix.as_str());
        }
        for schedule in &self.schedules {
            if schedule.id_prefix.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "{} schedule has an empty id_prefix",
                    schedule.platform
                )));
            }
            if !prefixes.insert(schedule.id_prefix.as_str()) {
                return Err(AppError::validation(format!(
                    "id_prefix '{}' is used by more than one source",
                    schedule.id_prefix
                )));
            }
            for entry in &schedule.entries {
                entry.validate()?;
            }
        }
        Ok(())
    }

    /// Prefix shared by every id a platform's sources emit, if configured.
    pub fn id_prefixes(&self) -> Vec<(Platform, &str)> {
        let mut out = Vec::new();
        if self.codeforces.enabled {
            out.push((Platform::Codeforces, self.codeforces.id_prefix.as_str()));
        }
        for schedule in &self.schedules {
            out.push((schedule.platform, schedule.id_prefix.as_str()));
        }
        out
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch: FetchConfig::default(),
            codeforces: CodeforcesConfig::default(),
            logging: LoggingConfig::default(),
            output: OutputConfig::default(),
            schedules: defaults::schedules(),
        }
    }
}

/// HTTP client and aggregation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Upper bound on a single source's fetch, in seconds
    #[serde(default = "defaults::source_timeout")]
    pub source_timeout_secs: u64,

    /// Look-ahead window in days
    #[serde(default = "defaults::window_days")]
    pub window_days: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            source_timeout_secs: defaults::source_timeout(),
            window_days: defaults::window_days(),
        }
    }
}

impl FetchConfig {
    pub fn look_ahead(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.window_days))
    }
}

/// Codeforces API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeforcesConfig {
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,

    /// Contest list endpoint
    #[serde(default = "defaults::codeforces_api_url")]
    pub api_url: String,

    /// Base for contest links; the contest id is appended
    #[serde(default = "defaults::codeforces_contest_url_base")]
    pub contest_url_base: String,

    #[serde(default = "defaults::codeforces_id_prefix")]
    pub id_prefix: String,
}

impl Default for CodeforcesConfig {
    fn default() -> Self {
        Self {
            enabled: defaults::enabled(),
            api_url: defaults::codeforces_api_url(),
            contest_url_base: defaults::codeforces_contest_url_base(),
            id_prefix: defaults::codeforces_id_prefix(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// One of `error`, `warn`, `info`, `debug`, `trace`
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

/// Console output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Per-contest line template, see `Contest::format`
    #[serde(default = "defaults::template")]
    pub template: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            template: defaults::template(),
        }
    }
}

/// Longest recurrence a schedule entry may use.
pub const MAX_INTERVAL_WEEKS: u32 = 52;

/// A synthetic weekly schedule for one platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub platform: Platform,

    /// Prefix for generated contest ids (e.g. `cc`)
    pub id_prefix: String,

    #[serde(default)]
    pub entries: Vec<ScheduleEntry>,
}

/// One recurring contest series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Short series key used in ids (e.g. `starters`)
    pub key: String,

    /// Display name; `{number}` is replaced by the running number
    pub name: String,

    pub weekday: Weekday,

    /// Local start hour (0-23)
    pub hour: u32,

    /// Local start minute (0-59)
    #[serde(default)]
    pub minute: u32,

    /// Offset of the series' local time from UTC, in minutes
    #[serde(default)]
    pub utc_offset_minutes: i32,

    pub duration_minutes: u32,

    /// Occurs every N weeks, counted from the schedule epoch
    #[serde(default = "defaults::interval_weeks")]
    pub interval_weeks: u32,

    /// Number of the series at the schedule epoch
    #[serde(default)]
    pub number_base: Option<i64>,

    pub url: String,
}

impl ScheduleEntry {
    fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(AppError::validation("schedule entry key is empty"));
        }
        if self.hour > 23 || self.minute > 59 {
            return Err(AppError::validation(format!(
                "schedule entry '{}' has invalid time {:02}:{:02}",
                self.key, self.hour, self.minute
            )));
        }
        if self.utc_offset_minutes.unsigned_abs() >= 24 * 60 {
            return Err(AppError::validation(format!(
                "schedule entry '{}' has invalid utc_offset_minutes {}",
                self.key, self.utc_offset_minutes
            )));
        }
        if self.interval_weeks == 0 || self.interval_weeks > MAX_INTERVAL_WEEKS {
            return Err(AppError::validation(format!(
                "schedule entry '{}': interval_weeks must be between 1 and {}",
                self.key, MAX_INTERVAL_WEEKS
            )));
        }
        Ok(())
    }
}

mod defaults {
    use chrono::Weekday;

    use super::{ScheduleConfig, ScheduleEntry};
    use crate::models::Platform;

    // Fetch defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; contest-tracker/0.1)".into()
    }
    pub fn timeout() -> u64 {
        10
    }
    pub fn source_timeout() -> u64 {
        15
    }
    pub fn window_days() -> u32 {
        7
    }

    // Codeforces defaults
    pub fn enabled() -> bool {
        true
    }
    pub fn codeforces_api_url() -> String {
        "https://codeforces.com/api/contest.list".into()
    }
    pub fn codeforces_contest_url_base() -> String {
        "https://codeforces.com/contest".into()
    }
    pub fn codeforces_id_prefix() -> String {
        "cf".into()
    }

    pub fn log_level() -> String {
        "info".into()
    }

    pub fn template() -> String {
        "{start}  [{platform}] {name} ({duration}, {countdown})\n    {url}".into()
    }

    pub fn interval_weeks() -> u32 {
        1
    }

    const IST: i32 = 330;
    const EST: i32 = -300;
    const JST: i32 = 540;

    #[allow(clippy::too_many_arguments)]
    fn entry(
        key: &str,
        name: &str,
        weekday: Weekday,
        hour: u32,
        minute: u32,
        utc_offset_minutes: i32,
        duration_minutes: u32,
        number_base: Option<i64>,
        url: &str,
    ) -> ScheduleEntry {
        ScheduleEntry {
            key: key.to_string(),
            name: name.to_string(),
            weekday,
            hour,
            minute,
            utc_offset_minutes,
            duration_minutes,
            interval_weeks: 1,
            number_base,
            url: url.to_string(),
        }
    }

    // Schedule defaults
    pub fn schedules() -> Vec<ScheduleConfig> {
        let codechef_url = "https://www.codechef.com/contests";
        let leetcode_url = "https://leetcode.com/contest/";

        vec![
            ScheduleConfig {
                platform: Platform::CodeChef,
                id_prefix: "cc".to_string(),
                entries: vec![
                    entry(
                        "starters",
                        "CodeChef Starters",
                        Weekday::Wed,
                        20,
                        0,
                        IST,
                        180,
                        None,
                        codechef_url,
                    ),
                    entry(
                        "cookoff",
                        "CodeChef Cook-Off",
                        Weekday::Sun,
                        21,
                        30,
                        IST,
                        150,
                        None,
                        codechef_url,
                    ),
                ],
            },
            ScheduleConfig {
                platform: Platform::LeetCode,
                id_prefix: "lc".to_string(),
                entries: vec![
                    entry(
                        "weekly",
                        "Weekly Contest {number}",
                        Weekday::Sun,
                        10,
                        30,
                        EST,
                        90,
                        Some(400),
                        leetcode_url,
                    ),
                    ScheduleEntry {
                        interval_weeks: 2,
                        ..entry(
                            "biweekly",
                            "Biweekly Contest {number}",
                            Weekday::Sat,
                            20,
                            0,
                            EST,
                            90,
                            Some(130),
                            leetcode_url,
                        )
                    },
                ],
            },
            ScheduleConfig {
                platform: Platform::AtCoder,
                id_prefix: "ac".to_string(),
                entries: vec![entry(
                    "abc",
                    "AtCoder Beginner Contest {number}",
                    Weekday::Sat,
                    21,
                    0,
                    JST,
                    100,
                    Some(340),
                    "https://atcoder.jp/contests/",
                )],
            },
        ]
    }
}
