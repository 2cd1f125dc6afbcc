// src/services/schedule.rs

//! Schedule-based contest source.
//!
//! Platforms without a usable public feed publish contests in fixed weekly
//! slots. This source projects those slots onto the calendar.

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Utc};

use crate::error::{AppError, Result};
use crate::models::{
    Contest, ContestStatus, MAX_INTERVAL_WEEKS, Platform, ScheduleConfig, ScheduleEntry,
};
use crate::services::ContestSource;

/// Week numbering starts on Monday 2024-01-01.
const EPOCH: (i32, u32, u32) = (2024, 1, 1);

/// Synthetic source generating the next occurrence of each configured series.
pub struct ScheduledSource {
    schedule: ScheduleConfig,
    name: String,
    look_ahead: Duration,
}

impl ScheduledSource {
    pub fn new(schedule: ScheduleConfig, look_ahead: Duration) -> Self {
        let name = format!("{} (schedule)", schedule.platform);
        Self {
            schedule,
            name,
            look_ahead,
        }
    }

    fn build_contest(&self, entry: &ScheduleEntry, now: DateTime<Utc>) -> Result<Option<Contest>> {
        let Some((start_time, week)) = next_occurrence(entry, now)? else {
            return Ok(None);
        };

        let (id, name) = match entry.number_base {
            Some(base) => {
                let number = base + week / i64::from(entry.interval_weeks);
                (
                    format!("{}-{}-{}", self.schedule.id_prefix, entry.key, number),
                    entry.name.replace("{number}", &number.to_string()),
                )
            }
            None => (
                format!(
                    "{}-{}-{}",
                    self.schedule.id_prefix,
                    entry.key,
                    start_time.timestamp_millis()
                ),
                entry.name.clone(),
            ),
        };

        Ok(Some(Contest {
            id,
            name,
            platform: self.schedule.platform,
            start_time,
            duration_minutes: entry.duration_minutes,
            url: entry.url.clone(),
            status: ContestStatus::Upcoming,
        }))
    }
}

#[async_trait]
impl ContestSource for ScheduledSource {
    fn platform(&self) -> Platform {
        self.schedule.platform
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn look_ahead(&self) -> Duration {
        self.look_ahead
    }

    async fn try_fetch(&self, now: DateTime<Utc>) -> Result<Vec<Contest>> {
        let mut contests = Vec::with_capacity(self.schedule.entries.len());
        for entry in &self.schedule.entries {
            if let Some(contest) = self.build_contest(entry, now)? {
                contests.push(contest);
            }
        }
        Ok(contests)
    }
}

/// Find the first slot of `entry` starting at or after `now`.
///
/// Returns the start instant and the slot's week index since the epoch.
fn next_occurrence(
    entry: &ScheduleEntry,
    now: DateTime<Utc>,
) -> Result<Option<(DateTime<Utc>, i64)>> {
    let invalid =
        |what: &str| AppError::config(format!("schedule entry '{}': {}", entry.key, what));

    if entry.interval_weeks > MAX_INTERVAL_WEEKS {
        return Err(invalid("interval_weeks out of range"));
    }
    let offset = entry
        .utc_offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| invalid("utc offset out of range"))?;
    let epoch = NaiveDate::from_ymd_opt(EPOCH.0, EPOCH.1, EPOCH.2)
        .ok_or_else(|| invalid("bad epoch"))?;
    let interval = i64::from(entry.interval_weeks.max(1));
    let today = now.with_timezone(&offset).date_naive();

    for day in 0..=7 * interval {
        let date = today
            .checked_add_signed(Duration::days(day))
            .ok_or_else(|| invalid("date out of range"))?;
        if date.weekday() != entry.weekday {
            continue;
        }

        let week = (date - epoch).num_days().div_euclid(7);
        if week.rem_euclid(interval) != 0 {
            continue;
        }

        let local = date
            .and_hms_opt(entry.hour, entry.minute, 0)
            .ok_or_else(|| invalid("start time out of range"))?;
        let start = offset
            .from_local_datetime(&local)
            .single()
            .ok_or_else(|| invalid("ambiguous start time"))?
            .with_timezone(&Utc);

        if start >= now {
            return Ok(Some((start, week)));
        }
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::Weekday;

    use super::*;
    use crate::models::Config;
    use crate::services::LookAhead;

    /// Monday 2026-10-19 09:00 UTC, week 146 since the epoch.
    fn monday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
    }

    fn default_source(platform: Platform) -> ScheduledSource {
        let schedule = Config::default()
            .schedules
            .into_iter()
            .find(|s| s.platform == platform)
            .unwrap();
        ScheduledSource::new(schedule, Duration::days(7))
    }

    fn starters() -> ScheduleEntry {
        default_source(Platform::CodeChef).schedule.entries[0].clone()
    }

    #[tokio::test]
    async fn test_codechef_defaults() {
        let contests = default_source(Platform::CodeChef).fetch_at(monday()).await;
        assert_eq!(contests.len(), 2);

        let starters = &contests[0];
        assert_eq!(starters.name, "CodeChef Starters");
        assert_eq!(starters.start_time, Utc.with_ymd_and_hms(2026, 10, 21, 14, 30, 0).unwrap());
        assert_eq!(starters.duration_minutes, 180);
        assert_eq!(starters.id, format!("cc-starters-{}", starters.start_time.timestamp_millis()));

        let cookoff = &contests[1];
        assert_eq!(cookoff.start_time, Utc.with_ymd_and_hms(2026, 10, 25, 16, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_numbered_series() {
        let leetcode = default_source(Platform::LeetCode).fetch_at(monday()).await;
        let names: Vec<&str> = leetcode.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Weekly Contest 546", "Biweekly Contest 203"]);
        assert_eq!(leetcode[0].id, "lc-weekly-546");
        assert_eq!(leetcode[0].start_time, Utc.with_ymd_and_hms(2026, 10, 25, 15, 30, 0).unwrap());
        assert_eq!(leetcode[1].id, "lc-biweekly-203");
        assert_eq!(leetcode[1].start_time, Utc.with_ymd_and_hms(2026, 10, 25, 1, 0, 0).unwrap());

        let atcoder = default_source(Platform::AtCoder).fetch_at(monday()).await;
        assert_eq!(atcoder.len(), 1);
        assert_eq!(atcoder[0].name, "AtCoder Beginner Contest 486");
        assert_eq!(atcoder[0].start_time, Utc.with_ymd_and_hms(2026, 10, 24, 12, 0, 0).unwrap());
    }

    #[tokio::test]
    async fn test_off_week_biweekly_falls_outside_window() {
        // Monday of week 147: the next biweekly slot is in week 148.
        let now = monday() + Duration::days(7);
        let source = default_source(Platform::LeetCode);

        let raw = source.try_fetch(now).await.unwrap();
        let biweekly = raw.iter().find(|c| c.id.starts_with("lc-biweekly")).unwrap();
        assert_eq!(biweekly.start_time, Utc.with_ymd_and_hms(2026, 11, 8, 1, 0, 0).unwrap());

        let visible = source.fetch_at(now).await;
        assert_eq!(visible.len(), 1);
        assert!(visible[0].id.starts_with("lc-weekly"));
    }

    #[test]
    fn test_same_day_slot_still_ahead() {
        let wednesday = Utc.with_ymd_and_hms(2026, 10, 21, 14, 0, 0).unwrap();
        let (start, _) = next_occurrence(&starters(), wednesday).unwrap().unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 10, 21, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_same_day_slot_already_started() {
        let wednesday = Utc.with_ymd_and_hms(2026, 10, 21, 15, 0, 0).unwrap();
        let (start, _) = next_occurrence(&starters(), wednesday).unwrap().unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 10, 28, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_local_date_uses_entry_offset() {
        // 20:00 UTC Tuesday is already Wednesday 01:30 in IST.
        let tuesday_evening = Utc.with_ymd_and_hms(2026, 10, 20, 20, 0, 0).unwrap();
        let (start, _) = next_occurrence(&starters(), tuesday_evening).unwrap().unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 10, 21, 14, 30, 0).unwrap());
    }

    #[test]
    fn test_invalid_offset_is_error() {
        let entry = ScheduleEntry {
            utc_offset_minutes: 24 * 60,
            ..starters()
        };
        assert!(next_occurrence(&entry, monday()).is_err());
    }

    #[test]
    fn test_overflowing_offset_is_error() {
        for utc_offset_minutes in [40_000_000, i32::MIN, i32::MAX] {
            let entry = ScheduleEntry {
                utc_offset_minutes,
                ..starters()
            };
            assert!(next_occurrence(&entry, monday()).is_err());
        }
    }

    #[test]
    fn test_oversized_interval_is_error() {
        let entry = ScheduleEntry {
            interval_weeks: u32::MAX,
            ..starters()
        };
        let err = next_occurrence(&entry, monday()).unwrap_err();
        assert!(err.to_string().contains("interval_weeks"));

        let yearly = ScheduleEntry {
            interval_weeks: MAX_INTERVAL_WEEKS,
            ..starters()
        };
        assert!(next_occurrence(&yearly, monday()).unwrap().is_some());
    }

    #[test]
    fn test_date_overflow_is_error() {
        let last_day = NaiveDate::MAX;
        let end_of_time = Utc.from_utc_datetime(&last_day.and_hms_opt(0, 0, 0).unwrap());
        // The slot falls the day before the last date, so the scan runs past it.
        let entry = ScheduleEntry {
            weekday: last_day.weekday().pred(),
            utc_offset_minutes: 0,
            ..starters()
        };
        assert!(next_occurrence(&entry, end_of_time).is_err());
    }

    #[tokio::test]
    async fn test_out_of_range_entries_yield_empty_fetch() {
        let schedule = ScheduleConfig {
            platform: Platform::CodeChef,
            id_prefix: "cc".to_string(),
            entries: vec![
                ScheduleEntry {
                    utc_offset_minutes: 40_000_000,
                    ..starters()
                },
                ScheduleEntry {
                    interval_weeks: u32::MAX,
                    ..starters()
                },
            ],
        };
        let source = ScheduledSource::new(schedule, Duration::days(7));
        assert!(source.fetch_at(monday()).await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_entry_yields_empty_fetch() {
        let schedule = ScheduleConfig {
            platform: Platform::CodeChef,
            id_prefix: "cc".to_string(),
            entries: vec![ScheduleEntry {
                hour: 25,
                weekday: Weekday::Mon,
                ..starters()
            }],
        };
        let source = ScheduledSource::new(schedule, Duration::days(7));
        assert!(source.fetch_at(monday()).await.is_empty());
    }

    #[tokio::test]
    async fn test_every_hour_of_the_week_stays_in_window() {
        let platforms = [Platform::CodeChef, Platform::LeetCode, Platform::AtCoder];
        let sources: Vec<ScheduledSource> = platforms
            .into_iter()
            .map(default_source)
            .collect();

        for hour in 0..24 * 14 {
            let now = monday() + Duration::hours(hour);
            let window = LookAhead::new(now, Duration::days(7));
            let mut ids = HashSet::new();
            for source in &sources {
                let contests = source.fetch_at(now).await;
                assert!(!contests.is_empty(), "{} produced nothing", source.name());
                for contest in contests {
                    assert!(window.contains(contest.start_time), "{} outside window", contest.id);
                    assert!(ids.insert(contest.id));
                }
            }
        }
    }
}
