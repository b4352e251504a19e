//! Profile scoring: a fixed weighted formula over repository and follower
//! statistics, producing a 0-100 total and a discrete rating label.
//!
//! The component rules and caps are a stable contract; downstream ranking
//! depends on their exact values. All inputs are unsigned counts, so every
//! component is non-negative by construction and the total is bounded by the
//! sum of the caps (30 + 25 + 20 + 15 + 10 = 100).

use serde::Serialize;

use crate::github::{ProfileInfo, RepoSummary};

/// Per-component scores plus the capped total and its rating label.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub repositories: u32,
    pub stars: u32,
    pub language_diversity: u32,
    pub followers: u32,
    pub forks: u32,
    pub total: u32,
    pub rating: String,
}

/// Scores a profile from its attributes and aggregated repositories.
pub fn compute(profile: &ProfileInfo, repos: &RepoSummary) -> ScoreBreakdown {
    let repositories = repo_score(repos.total_repos);
    let stars = star_score(repos.total_stars);
    let language_diversity = language_score(repos.languages.len());
    let followers = follower_score(profile.followers);
    let forks = fork_score(repos.total_forks);
    let total = repositories + stars + language_diversity + followers + forks;

    ScoreBreakdown {
        repositories,
        stars,
        language_diversity,
        followers,
        forks,
        total,
        rating: rating(total).to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Component rules
// ────────────────────────────────────────────────────────────────────────────

/// 2 points per repository, capped at 30.
fn repo_score(count: usize) -> u32 {
    (count as u64 * 2).min(30) as u32
}

/// Tiered by total stars received, capped at 25. Below the lowest tier the
/// raw star count itself is the score.
fn star_score(stars: u64) -> u32 {
    if stars > 100 {
        25
    } else if stars > 50 {
        20
    } else if stars > 20 {
        15
    } else if stars > 5 {
        10
    } else {
        stars as u32
    }
}

/// 4 points per distinct primary language, capped at 20.
fn language_score(distinct: usize) -> u32 {
    (distinct as u64 * 4).min(20) as u32
}

/// Half a point per follower (integer division), capped at 15.
fn follower_score(followers: u32) -> u32 {
    (followers / 2).min(15)
}

/// Tiered by total forks, capped at 10.
fn fork_score(forks: u64) -> u32 {
    if forks > 20 {
        10
    } else if forks > 10 {
        7
    } else if forks > 5 {
        5
    } else {
        forks.min(5) as u32
    }
}

/// Rating label for a total score.
pub fn rating(total: u32) -> &'static str {
    if total >= 80 {
        "Exceptional"
    } else if total >= 60 {
        "Strong"
    } else if total >= 40 {
        "Good"
    } else if total >= 20 {
        "Moderate"
    } else {
        "Beginner"
    }
}
