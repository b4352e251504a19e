mod batch;
mod config;
mod extract;
mod github;
mod llm_client;
mod ranker;
mod skills;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::batch::BatchProcessor;
use crate::config::Config;
use crate::github::{GithubClient, ProfileAnalysis};
use crate::llm_client::LlmClient;
use crate::ranker::{Candidate, CandidateRanker};
use crate::skills::{SkillCategorizer, SkillSet};

#[derive(Parser)]
#[command(
    name = "screener",
    version,
    about = "Resume skill extraction and candidate ranking"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract plain text from a single resume (PDF or DOCX)
    Extract { file: PathBuf },

    /// Extract and categorize skills from a single resume
    Skills { file: PathBuf },

    /// Analyze a GitHub profile and print its score breakdown
    Github { username: String },

    /// Process every resume in a directory
    Batch {
        dir: PathBuf,
        /// Write the full JSON report here
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Rank candidates by combining resume skills with GitHub profiles
    Rank {
        dir: PathBuf,
        /// JSON file mapping resume filename to GitHub username
        #[arg(long)]
        usernames: PathBuf,
        /// Write the full JSON report here
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Extract { file } => run_extract(&file),
        Command::Skills { file } => run_skills(&config, &file).await,
        Command::Github { username } => run_github(&config, &username).await,
        Command::Batch { dir, output } => run_batch(&config, &dir, output.as_deref()).await,
        Command::Rank {
            dir,
            usernames,
            output,
        } => run_rank(&config, &dir, &usernames, output.as_deref()).await,
    }
}

fn run_extract(file: &Path) -> Result<()> {
    let text = extract::extract_text(file)?;
    println!("Extracted {} characters from {}", text.len(), file.display());

    let preview: String = text.chars().take(500).collect();
    println!("\n{preview}");
    if text.chars().count() > 500 {
        println!("...");
    }
    Ok(())
}

async fn run_skills(config: &Config, file: &Path) -> Result<()> {
    let text = extract::extract_text(file)?;
    let categorizer = new_categorizer(config);
    let skills = categorizer.categorize(&text).await;
    print_skills(&skills);
    Ok(())
}

async fn run_github(config: &Config, username: &str) -> Result<()> {
    let client = GithubClient::new(config);
    match client.analyze(username).await {
        Some(analysis) => print_analysis(&analysis),
        None => println!("Could not analyze GitHub profile '{username}'"),
    }
    Ok(())
}

async fn run_batch(config: &Config, dir: &Path, output: Option<&Path>) -> Result<()> {
    let processor = BatchProcessor::new(new_categorizer(config));
    let results = processor.process_directory(dir).await;

    let summary = batch::summarize(&results);
    println!("\nResumes processed: {}", summary.total_resumes);
    println!("  successful: {}", summary.successful);
    println!("  failed:     {}", summary.failed);
    println!(
        "\nUnique skills across all candidates: {}",
        summary.total_unique_skills
    );
    for (category, skills) in summary.unique_skills.categories() {
        if !skills.is_empty() {
            println!("\n{} ({}):", title_case(category), skills.len());
            for skill in skills {
                println!("  - {skill}");
            }
        }
    }

    if let Some(path) = output {
        batch::write_report(path, &results)?;
    }
    Ok(())
}

async fn run_rank(
    config: &Config,
    dir: &Path,
    usernames_path: &Path,
    output: Option<&Path>,
) -> Result<()> {
    let usernames = load_username_map(usernames_path)?;
    let ranker = CandidateRanker::new(
        BatchProcessor::new(new_categorizer(config)),
        GithubClient::new(config),
    );

    let candidates = ranker.rank(dir, &usernames).await;
    print_rankings(&candidates);

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&candidates)
            .context("failed to serialize rankings")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write rankings to {}", path.display()))?;
    }
    Ok(())
}

fn new_categorizer(config: &Config) -> SkillCategorizer {
    SkillCategorizer::new(LlmClient::new(
        config.anthropic_api_key.clone(),
        config.request_timeout_secs,
    ))
}

/// Reads the resume-filename → GitHub-username map from a JSON file.
fn load_username_map(path: &Path) -> Result<HashMap<String, String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read username map {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("username map {} is not a JSON object", path.display()))
}

fn print_skills(skills: &SkillSet) {
    println!("\nExtracted skills ({} total):", skills.total());
    for (category, values) in skills.categories() {
        println!("\n{}:", title_case(category));
        if values.is_empty() {
            println!("  (none found)");
        } else {
            for skill in values {
                println!("  - {skill}");
            }
        }
    }
}

fn print_analysis(analysis: &ProfileAnalysis) {
    let profile = &analysis.profile;
    let repos = &analysis.repositories;
    let score = &analysis.score;

    println!("\nProfile: {}", profile.username);
    if let Some(name) = &profile.name {
        println!("  name:     {name}");
    }
    if let Some(company) = &profile.company {
        println!("  company:  {company}");
    }
    if let Some(location) = &profile.location {
        println!("  location: {location}");
    }

    println!("\nStatistics:");
    println!("  public repositories: {}", profile.public_repos);
    println!("  followers:           {}", profile.followers);
    println!("  total stars:         {}", repos.total_stars);
    println!("  total forks:         {}", repos.total_forks);

    println!("\nLanguages ({}):", repos.languages.len());
    let mut languages: Vec<(&String, &u32)> = repos.languages.iter().collect();
    languages.sort_by(|a, b| b.1.cmp(a.1));
    for (language, count) in languages {
        println!("  - {language}: {count} repos");
    }

    if !repos.top_repos.is_empty() {
        println!("\nTop repositories:");
        for repo in &repos.top_repos {
            println!("  {} ({} stars, {} forks)", repo.name, repo.stars, repo.forks);
            if let Some(description) = &repo.description {
                println!("    {description}");
            }
            println!("    {}", repo.url);
        }
    }

    println!("\nScore: {}/100 ({})", score.total, score.rating);
    println!("  repositories:       {}", score.repositories);
    println!("  stars:              {}", score.stars);
    println!("  language diversity: {}", score.language_diversity);
    println!("  followers:          {}", score.followers);
    println!("  forks:              {}", score.forks);
}

fn print_rankings(candidates: &[Candidate]) {
    println!("\nCandidate rankings ({} candidates):", candidates.len());

    for (rank, candidate) in candidates.iter().enumerate() {
        println!("\n#{} {}", rank + 1, candidate.filename);
        println!("  combined score: {}/100", candidate.combined_score);
        println!("  resume skills:  {}", candidate.total_skills);
        match &candidate.github_username {
            Some(username) => println!(
                "  github:         {username} ({}/100)",
                candidate.github_score
            ),
            None => println!("  github:         (not linked)"),
        }

        let top_skills: Vec<&str> = candidate
            .resume_skills
            .categories()
            .iter()
            .flat_map(|(_, skills)| skills.iter().take(3))
            .map(String::as_str)
            .take(6)
            .collect();
        if !top_skills.is_empty() {
            println!("  top skills:     {}", top_skills.join(", "));
        }
    }
}

/// "programming_languages" → "Programming Languages"
fn title_case(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
