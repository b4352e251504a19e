//! Batch resume processing.
//!
//! Walks the immediate children of a directory, runs extraction and skill
//! categorization on each supported file in turn, and aggregates the results.
//! A file that fails to extract becomes a `failed` result with zero skills
//! (the model is never called for it) and the batch always runs to completion.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::extract;
use crate::skills::{SkillCategorizer, SkillSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResumeStatus {
    Success,
    Failed,
}

/// Outcome of processing one resume file. Immutable once produced.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeResult {
    pub filename: String,
    pub status: ResumeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub text_length: usize,
    pub skills: SkillSet,
    pub total_skills: usize,
}

impl ResumeResult {
    fn failed(filename: String, error: String) -> Self {
        Self {
            filename,
            status: ResumeStatus::Failed,
            error: Some(error),
            text_length: 0,
            skills: SkillSet::default(),
            total_skills: 0,
        }
    }
}

/// Aggregate statistics over one batch run.
#[derive(Debug, Serialize)]
pub struct BatchSummary {
    pub total_resumes: usize,
    pub successful: usize,
    pub failed: usize,
    /// Per-category union of skills across all successful results,
    /// deduplicated and alphabetically sorted.
    pub unique_skills: SkillSet,
    pub total_unique_skills: usize,
}

#[derive(Debug, Serialize)]
struct BatchReport<'a> {
    timestamp: String,
    summary: BatchSummary,
    individual_results: &'a [ResumeResult],
}

/// Runs the extract → categorize pipeline over a directory of resumes,
/// one file at a time.
pub struct BatchProcessor {
    categorizer: SkillCategorizer,
}

impl BatchProcessor {
    pub fn new(categorizer: SkillCategorizer) -> Self {
        Self { categorizer }
    }

    /// Processes every supported file directly inside `dir`. A missing
    /// directory is reported and yields an empty result set, not an error.
    pub async fn process_directory(&self, dir: &Path) -> Vec<ResumeResult> {
        if !dir.is_dir() {
            error!("resume directory not found: {}", dir.display());
            return Vec::new();
        }

        let files = list_resume_files(dir);
        if files.is_empty() {
            warn!("no resume files found in {}", dir.display());
            return Vec::new();
        }

        info!("processing {} resumes from {}", files.len(), dir.display());

        let mut results = Vec::with_capacity(files.len());
        for (i, path) in files.iter().enumerate() {
            let filename = file_name_of(path);
            info!("[{}/{}] processing {filename}", i + 1, files.len());
            let result = self.process_file(path).await;
            info!("  extracted {} skills", result.total_skills);
            results.push(result);
        }
        results
    }

    async fn process_file(&self, path: &Path) -> ResumeResult {
        let filename = file_name_of(path);

        let text = match extract::extract_text(path) {
            Ok(text) => text,
            Err(e) => {
                warn!("extraction failed for {filename}: {e}");
                return ResumeResult::failed(filename, e.to_string());
            }
        };

        let skills = self.categorizer.categorize(&text).await;
        let total_skills = skills.total();

        ResumeResult {
            filename,
            status: ResumeStatus::Success,
            error: None,
            text_length: text.len(),
            skills,
            total_skills,
        }
    }
}

/// Supported files directly inside `dir`, in filename order. Directory
/// listing order is platform-arbitrary; sorting keeps runs reproducible.
pub fn list_resume_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && extract::is_supported(path))
        .collect();
    files.sort();
    files
}

/// Builds the cross-resume summary from a batch run's results.
pub fn summarize(results: &[ResumeResult]) -> BatchSummary {
    let successful = results
        .iter()
        .filter(|r| r.status == ResumeStatus::Success)
        .count();

    let mut unions: [BTreeSet<String>; 6] = Default::default();
    for result in results.iter().filter(|r| r.status == ResumeStatus::Success) {
        for (union, (_, skills)) in unions.iter_mut().zip(result.skills.categories()) {
            union.extend(skills.iter().cloned());
        }
    }

    let [languages, frameworks, tools, databases, cloud, other] =
        unions.map(|set| set.into_iter().collect::<Vec<String>>());
    let unique_skills = SkillSet {
        programming_languages: languages,
        frameworks,
        tools,
        databases,
        cloud_platforms: cloud,
        other_technical_skills: other,
    };

    BatchSummary {
        total_resumes: results.len(),
        successful,
        failed: results.len() - successful,
        total_unique_skills: unique_skills.total(),
        unique_skills,
    }
}

/// Persists `{timestamp, summary, individual_results}` as pretty JSON.
pub fn write_report(path: &Path, results: &[ResumeResult]) -> Result<()> {
    let report = BatchReport {
        timestamp: Utc::now().to_rfc3339(),
        summary: summarize(results),
        individual_results: results,
    };

    let json = serde_json::to_string_pretty(&report)
        .context("failed to serialize batch report")?;
    fs::write(path, json)
        .with_context(|| format!("failed to write report to {}", path.display()))?;

    info!("results saved to {}", path.display());
    Ok(())
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
