//! Command handlers for CLI operations
//!
//! - interview: run a practice interview on stdin/stdout
//! - assessments: list stored reports
//! - show: parse or print one report
//! - secret set: store the provider API key in the OS keychain
//! - doctor: validate configuration and environment

use anyhow::{bail, Context, Result};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::assessment::{
    list_reports, parse_report_file, AssessmentRecord, ListingQuery, ReportStore, SortBy,
    SortOrder,
};
use crate::config::{expand_path, Config};
use crate::llm::openai::OpenAIProvider;
use crate::llm::LLMProvider;
use crate::secrets::SecretManager;
use crate::session::SessionRegistry;
use sdk::{BondsErrorExt, Category, EngineError, SubmitOutcome};

/// Keychain service holding the provider API key
pub const KEYRING_SERVICE: &str = "bonds";

/// Secret name of the OpenAI API key (env: `OPENAI_API_KEY`)
pub const OPENAI_KEY_NAME: &str = "openai_api_key";

/// Output format for command results
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

const INTERVIEW_HELP: &str = "Commands:
  /help   Show this help
  /info   Show interview progress
  /quit   Leave the interview";

fn build_provider(config: &Config) -> Result<OpenAIProvider> {
    let api_key = SecretManager::new(KEYRING_SERVICE)
        .get_secret(OPENAI_KEY_NAME)
        .context("OpenAI API key is required for interviews")?;
    Ok(OpenAIProvider::new(config.llm.openai.clone(), api_key))
}

fn print_turn(outcome: &SubmitOutcome, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!();
            println!("Interviewer: {}", outcome.response);
            println!();
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(outcome)?),
    }
    Ok(())
}

/// Health status line for doctor, plus an issue when unhealthy
async fn provider_health(provider: &dyn LLMProvider) -> (String, Option<String>) {
    if provider.check_health().await {
        ("Reachable".to_string(), None)
    } else {
        (
            "Unreachable".to_string(),
            Some(format!(
                "Provider '{}' did not accept the API key. Check the key and base_url",
                provider.name()
            )),
        )
    }
}

/// Trimmed key from one input line
fn parse_key_input(line: Option<String>) -> Result<String> {
    let key = line.unwrap_or_default().trim().to_string();
    if key.is_empty() {
        bail!("No API key entered");
    }
    Ok(key)
}

/// Store the OpenAI API key in the OS keychain, read from stdin
pub async fn handle_secret_set(format: OutputFormat) -> Result<()> {
    if let OutputFormat::Text = format {
        println!("Paste the OpenAI API key and press Enter:");
    }

    let line = BufReader::new(tokio::io::stdin()).lines().next_line().await?;
    let key = parse_key_input(line)?;

    SecretManager::new(KEYRING_SERVICE)
        .set_secret(OPENAI_KEY_NAME, &key)
        .map_err(|e| anyhow::anyhow!("{} ({})", e, e.user_hint()))?;
    tracing::info!(service = KEYRING_SERVICE, "API key stored");

    match format {
        OutputFormat::Text => println!("Stored in keychain."),
        OutputFormat::Json => println!("{}", json!({ "stored": true, "service": KEYRING_SERVICE })),
    }
    Ok(())
}

/// Run an interactive practice interview
pub async fn handle_interview(identity: String, config: &Config, format: OutputFormat) -> Result<()> {
    let provider = build_provider(config)?;
    let conversation = provider.conversation_params();
    let provider: Arc<dyn LLMProvider> = Arc::new(provider);
    let registry = SessionRegistry::from_config(config, provider, conversation);

    let greeting = registry.start_session(&identity).await?;
    match format {
        OutputFormat::Text => {
            println!("Bonds practice interview (type /help for commands)");
            println!();
            println!("Interviewer: {}", greeting);
            println!();
        }
        OutputFormat::Json => println!("{}", json!({ "greeting": greeting })),
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            "/quit" => break,
            "/help" => {
                println!("{}", INTERVIEW_HELP);
                continue;
            }
            "/info" => {
                let snapshot = registry.get_session(&identity).await?;
                match format {
                    OutputFormat::Text => {
                        println!("Candidate:  {}", snapshot.profile.name_or_default());
                        println!("Exchanges:  {}", snapshot.exchange_count);
                        println!("Session ID: {}", snapshot.session_id);
                    }
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string(&snapshot)?)
                    }
                }
                continue;
            }
            _ => {}
        }

        match registry.submit(&identity, &line).await {
            Ok(outcome) => {
                print_turn(&outcome, format)?;
                if outcome.is_complete {
                    if let (OutputFormat::Text, Some(profile)) = (format, &outcome.profile) {
                        println!(
                            "Interview complete: {} exchanges in {}",
                            profile.exchange_count, profile.duration
                        );
                    }
                    break;
                }
            }
            Err(e @ EngineError::EmptyInput) => eprintln!("{} ({})", e, e.user_hint()),
            Err(e) => return Err(e.into()),
        }
    }

    registry.end_session(&identity).await;
    Ok(())
}

/// List stored assessment reports
pub async fn handle_assessments(
    sort_by: SortBy,
    order: SortOrder,
    limit: Option<usize>,
    dir: Option<PathBuf>,
    config: &Config,
    format: OutputFormat,
) -> Result<()> {
    let dir = match dir {
        Some(dir) => expand_path(&dir)?,
        None => config.core.assessments_dir.clone(),
    };
    // 0 lifts the cap
    let recent = match limit.unwrap_or(config.listing.recent_limit) {
        0 => None,
        n => Some(n),
    };
    let query = ListingQuery {
        sort_by,
        order,
        recent,
    };

    let records = list_reports(&dir, &query).await?;

    match format {
        OutputFormat::Text => {
            if records.is_empty() {
                println!("No assessments found in {}", dir.display());
                return Ok(());
            }

            println!(
                "{:<24} {:<12} {:>9} {:>7}  {}",
                "Name", "Date", "Exchanges", "Score", "File"
            );
            println!("{}", "-".repeat(80));
            for r in &records {
                println!(
                    "{:<24} {:<12} {:>9} {:>7}  {}",
                    r.name, r.interview_date, r.exchange_count, r.final_score, r.file_name
                );
            }
            println!();
            println!("{} assessment(s)", records.len());
        }
        OutputFormat::Json => {
            let output = json!({
                "directory": dir,
                "assessments": records,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

/// Resolve a report argument, falling back to the assessments directory
fn resolve_report_path(file: &Path, config: &Config) -> Result<PathBuf> {
    let path = expand_path(file)?;
    if path.exists() {
        return Ok(path);
    }
    let in_dir = config.core.assessments_dir.join(file);
    if file.is_relative() && in_dir.exists() {
        return Ok(in_dir);
    }
    bail!("Assessment file not found: {}", file.display())
}

fn print_record(record: &AssessmentRecord) {
    println!("{}", record.name);
    println!("  Date:       {}", record.interview_date);
    println!("  Exchanges:  {}", record.exchange_count);
    if let Some(duration) = &record.session_duration {
        println!("  Duration:   {}", duration);
    }
    println!("  Final:      {}", record.final_score);

    for category in Category::ALL {
        println!();
        println!(
            "{} (avg {:.1})",
            category,
            record.scores.category_average(category)
        );
        for (metric, value) in record.scores.category_metrics(category) {
            println!("  {:<24} {:>3}", metric, value);
        }
    }

    for (title, items) in [
        ("Strengths", &record.insights.strengths),
        ("Areas for Improvement", &record.insights.weaknesses),
        ("Recommendations", &record.insights.recommendations),
    ] {
        if items.is_empty() {
            continue;
        }
        println!();
        println!("{}:", title);
        for item in items {
            println!("  - {}", item);
        }
    }
}

/// Show one report, parsed or raw
pub async fn handle_show(file: PathBuf, raw: bool, config: &Config, format: OutputFormat) -> Result<()> {
    let path = resolve_report_path(&file, config)?;

    if raw {
        let content = ReportStore::read_raw(&path)?;
        match format {
            OutputFormat::Text => print!("{}", content),
            OutputFormat::Json => {
                let output = json!({ "file": path, "content": content });
                println!("{}", serde_json::to_string_pretty(&output)?);
            }
        }
        return Ok(());
    }

    let parse_path = path.clone();
    let record = tokio::task::spawn_blocking(move || parse_report_file(&parse_path))
        .await?
        .with_context(|| format!("Cannot read assessment {}", path.display()))?;

    match format {
        OutputFormat::Text => print_record(&record),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
    }
    Ok(())
}

/// Validate configuration and check the environment
pub async fn handle_doctor(config: &Config, format: OutputFormat) -> Result<()> {
    let mut issues = Vec::new();
    let mut checks: Vec<(&str, String)> = Vec::new();

    // Check 1: Configuration validation
    match config.validate() {
        Ok(()) => checks.push(("Configuration", "Valid".to_string())),
        Err(e) => {
            checks.push(("Configuration", "Invalid".to_string()));
            issues.push(format!("{} ({})", e, e.user_hint()));
        }
    }

    // Check 2: Provider settings
    checks.push((
        "Provider",
        format!("{} ({})", config.llm.provider, config.llm.openai.model),
    ));

    // Check 3: API key and provider reachability
    match SecretManager::new(KEYRING_SERVICE).get_secret(OPENAI_KEY_NAME) {
        Ok(api_key) => {
            checks.push(("OpenAI API key", "Configured".to_string()));
            let provider = OpenAIProvider::new(config.llm.openai.clone(), api_key);
            let (status, issue) = provider_health(&provider).await;
            checks.push(("Provider health", status));
            issues.extend(issue);
        }
        Err(_) => {
            checks.push(("OpenAI API key", "Not configured".to_string()));
            issues.push(
                "OpenAI API key not found. Set OPENAI_API_KEY or run `bonds secret set`."
                    .to_string(),
            );
        }
    }

    // Check 4: Assessments directory
    let dir = &config.core.assessments_dir;
    if dir.is_dir() {
        let records = list_reports(dir, &ListingQuery::default()).await?;
        checks.push(("Assessments directory", "Exists".to_string()));
        checks.push(("Stored assessments", records.len().to_string()));
    } else {
        checks.push(("Assessments directory", "Missing".to_string()));
        issues.push(format!(
            "Assessments directory does not exist: {}",
            dir.display()
        ));
    }

    // Check 5: Interview thresholds
    checks.push((
        "Exchange limits",
        format!(
            "{} soft / {} hard",
            config.interview.soft_exchange_limit, config.interview.hard_exchange_limit
        ),
    ));

    match format {
        OutputFormat::Text => {
            println!("Bonds System Diagnostics");
            println!("========================");
            println!();

            println!("System Checks:");
            for (check, status) in &checks {
                println!("  {:<25} {}", format!("{}:", check), status);
            }

            println!();

            if issues.is_empty() {
                println!("✓ All checks passed!");
            } else {
                println!("⚠ Issues found:");
                println!();
                for (i, issue) in issues.iter().enumerate() {
                    println!("  {}. {}", i + 1, issue);
                }
            }
        }
        OutputFormat::Json => {
            let output = json!({
                "checks": checks.iter().map(|(name, status)| {
                    json!({
                        "name": name,
                        "status": status
                    })
                }).collect::<Vec<_>>(),
                "issues": issues,
                "healthy": issues.is_empty()
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
