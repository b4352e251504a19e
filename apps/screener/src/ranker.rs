//! Candidate ranking: blends resume skill counts with GitHub profile scores.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::batch::{BatchProcessor, ResumeStatus};
use crate::github::{GithubClient, ProfileAnalysis};
use crate::skills::SkillSet;

/// Weight of the resume-derived score in the blend.
const RESUME_WEIGHT: f64 = 0.4;
/// Weight of the GitHub-derived score in the blend.
const GITHUB_WEIGHT: f64 = 0.6;
/// Skill count at which the resume component saturates at 100.
const SKILLS_FOR_FULL_SCORE: f64 = 50.0;

/// One ranked candidate. Constructed during ranking and never mutated after
/// `combined_score` is computed.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub filename: String,
    pub resume_skills: SkillSet,
    pub total_skills: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_analysis: Option<ProfileAnalysis>,
    pub github_score: u32,
    pub combined_score: f64,
}

/// Ranks a directory of resumes, optionally enriched with GitHub profiles.
pub struct CandidateRanker {
    batch: BatchProcessor,
    github: GithubClient,
}

impl CandidateRanker {
    pub fn new(batch: BatchProcessor, github: GithubClient) -> Self {
        Self { batch, github }
    }

    /// Processes every resume in `resume_dir`, analyzes the GitHub profile of
    /// each candidate present in `usernames` (filename → username), and
    /// returns candidates sorted by combined score, best first. A missing or
    /// failed profile contributes a github_score of 0; it never drops the
    /// candidate.
    pub async fn rank(
        &self,
        resume_dir: &Path,
        usernames: &HashMap<String, String>,
    ) -> Vec<Candidate> {
        let results = self.batch.process_directory(resume_dir).await;

        let mut candidates = Vec::new();
        for resume in results {
            if resume.status != ResumeStatus::Success {
                continue;
            }

            let github_username = usernames.get(&resume.filename).cloned();
            let mut github_analysis = None;
            let mut github_score = 0;

            if let Some(username) = &github_username {
                info!("analyzing GitHub profile: {username}");
                if let Some(analysis) = self.github.analyze(username).await {
                    github_score = analysis.score.total;
                    github_analysis = Some(analysis);
                }
            }

            candidates.push(Candidate {
                combined_score: combined_score(resume.total_skills, github_score),
                filename: resume.filename,
                resume_skills: resume.skills,
                total_skills: resume.total_skills,
                github_username,
                github_analysis,
                github_score,
            });
        }

        sort_by_combined_score(&mut candidates);
        candidates
    }
}

/// Weighted blend of the two scores, rounded to one decimal. The resume
/// component normalizes the skill count against `SKILLS_FOR_FULL_SCORE` and
/// saturates at 100.
pub fn combined_score(total_skills: usize, github_score: u32) -> f64 {
    let resume_score = ((total_skills as f64 / SKILLS_FOR_FULL_SCORE) * 100.0).min(100.0);
    let combined = resume_score * RESUME_WEIGHT + f64::from(github_score) * GITHUB_WEIGHT;
    (combined * 10.0).round() / 10.0
}

/// Descending by combined score; the sort is stable, so equal scores keep
/// their input order.
fn sort_by_combined_score(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.combined_score
            .partial_cmp(&a.combined_score)
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(filename: &str, combined: f64) -> Candidate {
        Candidate {
            filename: filename.to_string(),
            resume_skills: SkillSet::default(),
            total_skills: 0,
            github_username: None,
            github_analysis: None,
            github_score: 0,
            combined_score: combined,
        }
    }

    #[test]
    fn test_combined_score_reference_case() {
        // 25 skills → resume 50; 0.4 × 50 + 0.6 × 80 = 68.0
        assert_eq!(combined_score(25, 80), 68.0);
    }

    #[test]
    fn test_combined_score_zero_inputs() {
        assert_eq!(combined_score(0, 0), 0.0);
    }

    #[test]
    fn test_resume_component_saturates_at_100() {
        // 100 skills would nominally be 200; capped at 100 → 0.4 × 100 = 40
        assert_eq!(combined_score(100, 0), 40.0);
        assert_eq!(combined_score(50, 0), 40.0);
    }

    #[test]
    fn test_github_only_candidate() {
        assert_eq!(combined_score(0, 100), 60.0);
    }

    #[test]
    fn test_combined_score_rounds_to_one_decimal() {
        // 3 skills → resume 6; 0.4 × 6 + 0.6 × 7 = 6.6
        assert_eq!(combined_score(3, 7), 6.6);
        // 1 skill → resume 2; 0.4 × 2 + 0.6 × 1 = 1.4
        assert_eq!(combined_score(1, 1), 1.4);
    }

    #[test]
    fn test_sort_is_descending() {
        let mut candidates = vec![
            candidate("mid.pdf", 68.0),
            candidate("top.pdf", 91.5),
            candidate("low.pdf", 40.0),
        ];
        sort_by_combined_score(&mut candidates);

        let scores: Vec<f64> = candidates.iter().map(|c| c.combined_score).collect();
        assert_eq!(scores, vec![91.5, 68.0, 40.0]);
    }

    #[test]
    fn test_equal_scores_keep_input_order() {
        let mut candidates = vec![
            candidate("first.pdf", 50.0),
            candidate("second.pdf", 50.0),
            candidate("third.pdf", 75.0),
            candidate("fourth.pdf", 50.0),
        ];
        sort_by_combined_score(&mut candidates);

        let names: Vec<&str> = candidates.iter().map(|c| c.filename.as_str()).collect();
        assert_eq!(
            names,
            vec!["third.pdf", "first.pdf", "second.pdf", "fourth.pdf"]
        );
    }
}
