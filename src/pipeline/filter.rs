//! Platform filtering.
//!
//! Pure functions deriving the visible contest list and per-platform
//! counts from the full list and the viewer's platform selection.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::models::{Contest, Platform};

/// Platforms a viewer narrowed the list to. Empty means "show everything".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlatformFilter(BTreeSet<Platform>);

impl PlatformFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, platform: Platform) -> bool {
        self.0.contains(&platform)
    }

    /// Whether a contest passes this filter.
    pub fn matches(&self, contest: &Contest) -> bool {
        self.is_empty() || self.contains(contest.platform)
    }

    pub fn iter(&self) -> impl Iterator<Item = Platform> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Platform> for PlatformFilter {
    fn from_iter<I: IntoIterator<Item = Platform>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Number of contests per platform. Every platform is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContestCounts(BTreeMap<Platform, usize>);

impl ContestCounts {
    pub fn get(&self, platform: Platform) -> usize {
        self.0.get(&platform).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.values().sum()
    }

    /// Counts in `Platform::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Platform, usize)> + '_ {
        Platform::ALL.into_iter().map(|p| (p, self.get(p)))
    }
}

impl Default for ContestCounts {
    fn default() -> Self {
        Self(Platform::ALL.into_iter().map(|p| (p, 0)).collect())
    }
}

/// Contests visible under `selection`, in their original order.
pub fn apply_filter(contests: &[Contest], selection: &PlatformFilter) -> Vec<Contest> {
    if selection.is_empty() {
        return contests.to_vec();
    }
    contests
        .iter()
        .filter(|c| selection.matches(c))
        .cloned()
        .collect()
}

/// Count contests per platform.
pub fn count_by_platform(contests: &[Contest]) -> ContestCounts {
    let mut counts = ContestCounts::default();
    for contest in contests {
        *counts.0.entry(contest.platform).or_insert(0) += 1;
    }
    counts
}

/// Return `selection` with `platform` removed if present, added otherwise.
pub fn toggle(selection: &PlatformFilter, platform: Platform) -> PlatformFilter {
    let mut next = selection.clone();
    if !next.0.remove(&platform) {
        next.0.insert(platform);
    }
    next
}

/// Return an empty selection.
pub fn clear(_selection: &PlatformFilter) -> PlatformFilter {
    PlatformFilter::new()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::models::ContestStatus;

    fn contest(n: usize, platform: Platform) -> Contest {
        Contest {
            id: format!("{}-{}", platform.as_str().to_lowercase(), n),
            name: format!("Contest {n}"),
            platform,
            start_time: Utc.with_ymd_and_hms(2026, 10, 20, 0, 0, 0).unwrap()
                + Duration::hours(n as i64),
            duration_minutes: 120,
            url: "https://example.com".to_string(),
            status: ContestStatus::Upcoming,
        }
    }

    /// Ten contests: Codeforces 3, CodeChef 2, LeetCode 4, AtCoder 1.
    fn ten_contests() -> Vec<Contest> {
        use Platform::*;
        [
            Codeforces, LeetCode, CodeChef, LeetCode, AtCoder, Codeforces, LeetCode, CodeChef,
            Codeforces, LeetCode,
        ]
        .into_iter()
        .enumerate()
        .map(|(n, p)| contest(n, p))
        .collect()
    }

    #[test]
    fn test_empty_selection_is_identity() {
        let contests = ten_contests();
        assert_eq!(apply_filter(&contests, &PlatformFilter::new()), contests);
    }

    #[test]
    fn test_selection_keeps_members_in_order() {
        let contests = ten_contests();
        let selection: PlatformFilter =
            [Platform::Codeforces, Platform::LeetCode].into_iter().collect();

        let visible = apply_filter(&contests, &selection);
        assert_eq!(visible.len(), 7);
        assert!(visible.iter().all(|c| selection.contains(c.platform)));

        let expected: Vec<&Contest> = contests
            .iter()
            .filter(|c| selection.contains(c.platform))
            .collect();
        assert_eq!(visible.iter().collect::<Vec<_>>(), expected);

        let counts = count_by_platform(&contests);
        assert_eq!(counts.get(Platform::Codeforces), 3);
        assert_eq!(counts.get(Platform::CodeChef), 2);
        assert_eq!(counts.get(Platform::LeetCode), 4);
        assert_eq!(counts.get(Platform::AtCoder), 1);
        assert_eq!(counts.total(), 10);
    }

    #[test]
    fn test_counts_of_empty_list_are_zero() {
        let counts = count_by_platform(&[]);
        let all: Vec<(Platform, usize)> = counts.iter().collect();
        assert_eq!(all, Platform::ALL.iter().map(|p| (*p, 0)).collect::<Vec<_>>());
        assert_eq!(counts, ContestCounts::default());
    }

    #[test]
    fn test_toggle_is_its_own_inverse() {
        let start: PlatformFilter = [Platform::AtCoder].into_iter().collect();
        for platform in Platform::ALL {
            let once = toggle(&start, platform);
            assert_ne!(once, start);
            assert_eq!(toggle(&once, platform), start);
        }
    }

    #[test]
    fn test_toggle_does_not_mutate_input() {
        let start = PlatformFilter::new();
        let next = toggle(&start, Platform::CodeChef);
        assert!(start.is_empty());
        assert!(next.contains(Platform::CodeChef));
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn test_clear_then_filter_shows_everything() {
        let contests = ten_contests();
        let selection: PlatformFilter =
            [Platform::CodeChef, Platform::AtCoder].into_iter().collect();
        let cleared = clear(&selection);
        assert!(cleared.is_empty());
        assert_eq!(apply_filter(&contests, &cleared), contests);
    }

    #[test]
    fn test_selection_without_matches_is_empty() {
        let contests: Vec<Contest> = (0..3).map(|n| contest(n, Platform::Codeforces)).collect();
        let selection: PlatformFilter = [Platform::AtCoder].into_iter().collect();
        assert!(apply_filter(&contests, &selection).is_empty());
    }
}
