// src/services/codeforces.rs

//! Codeforces contest source.
//!
//! Reads the public `contest.list` API and keeps contests that have not
//! started yet.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::{CodeforcesConfig, Contest, ContestStatus, Platform};
use crate::services::{ContestSource, LookAhead};
use crate::utils::http::fetch_text;

/// Phase of a contest that has not started.
const PHASE_BEFORE: &str = "BEFORE";

#[derive(Debug, Deserialize)]
struct ContestListResponse {
    status: String,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    result: Option<Vec<RawContest>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawContest {
    id: i64,
    name: String,
    phase: String,
    #[serde(default)]
    start_time_seconds: Option<i64>,
    duration_seconds: i64,
}

/// Live source backed by the Codeforces API.
pub struct CodeforcesSource {
    client: Client,
    config: CodeforcesConfig,
    look_ahead: Duration,
}

impl CodeforcesSource {
    pub fn new(client: Client, config: CodeforcesConfig, look_ahead: Duration) -> Self {
        Self {
            client,
            config,
            look_ahead,
        }
    }
}

#[async_trait]
impl ContestSource for CodeforcesSource {
    fn platform(&self) -> Platform {
        Platform::Codeforces
    }

    fn name(&self) -> &str {
        "Codeforces"
    }

    fn look_ahead(&self) -> Duration {
        self.look_ahead
    }

    async fn try_fetch(&self, now: DateTime<Utc>) -> Result<Vec<Contest>> {
        let body = fetch_text(&self.client, &self.config.api_url).await?;
        let window = LookAhead::new(now, self.look_ahead);
        parse_contest_list(&body, &self.config, window)
    }
}

/// Parse a `contest.list` response body into upcoming contests inside `window`.
pub fn parse_contest_list(
    body: &str,
    config: &CodeforcesConfig,
    window: LookAhead,
) -> Result<Vec<Contest>> {
    let response: ContestListResponse = serde_json::from_str(body)?;

    if response.status != "OK" {
        return Err(AppError::source(
            Platform::Codeforces,
            format!(
                "status {}: {}",
                response.status,
                response.comment.as_deref().unwrap_or("no comment")
            ),
        ));
    }

    let raw = response
        .result
        .ok_or_else(|| AppError::source(Platform::Codeforces, "response has no result"))?;

    let base = config.contest_url_base.trim_end_matches('/');
    let contests = raw
        .into_iter()
        .filter(|c| c.phase == PHASE_BEFORE)
        .filter_map(|c| {
            let start_time = DateTime::from_timestamp(c.start_time_seconds?, 0)?;
            if !window.contains(start_time) {
                return None;
            }
            Some(Contest {
                id: format!("{}-{}", config.id_prefix, c.id),
                name: c.name,
                platform: Platform::Codeforces,
                start_time,
                duration_minutes: u32::try_from(c.duration_seconds / 60).unwrap_or(0),
                url: format!("{}/{}", base, c.id),
                status: ContestStatus::Upcoming,
            })
        })
        .collect();

    Ok(contests)
}
