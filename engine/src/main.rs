// Bonds interview engine
// Main entry point for the bonds binary

use bonds_engine::cli::{Cli, Command, SecretAction};
use bonds_engine::config::Config;
use bonds_engine::handlers::{
    handle_assessments, handle_doctor, handle_interview, handle_secret_set, handle_show,
    OutputFormat,
};
use bonds_engine::telemetry::init_telemetry_with_level;
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration (or use custom path if provided)
    let config = if let Some(config_path) = &cli.config {
        Config::load_from_path(config_path)?
    } else {
        Config::load_or_create()?
    };

    // --log wins over the config file; RUST_LOG wins over both
    init_telemetry_with_level(cli.log.as_deref().unwrap_or(&config.core.log_level));

    let version = env!("CARGO_PKG_VERSION");
    let commit = env!("GIT_COMMIT_HASH");
    let timestamp = env!("BUILD_TIMESTAMP");
    tracing::debug!("Bonds v{} ({} - {})", version, commit, timestamp);

    // Determine output format
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    match cli.command {
        Command::Interview { identity } => {
            tracing::info!(identity = %identity, "Starting interview");
            handle_interview(identity, &config, format).await
        }

        Command::Assessments {
            sort,
            order,
            limit,
            dir,
        } => handle_assessments(sort.into(), order.into(), limit, dir, &config, format).await,

        Command::Show { file, raw } => handle_show(file, raw, &config, format).await,

        Command::Secret {
            action: SecretAction::Set,
        } => handle_secret_set(format).await,

        Command::Doctor => {
            tracing::info!("Running diagnostics...");
            handle_doctor(&config, format).await
        }
    }
}
