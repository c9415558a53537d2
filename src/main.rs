// file: src/main.rs
// description: commandline application entry point
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use following_export::utils::logging::{format_step, format_success, format_warning};
use following_export::{Config, PipelineOrchestrator, PipelineStats};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "following_export")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Export followed accounts and avatars from a saved following page", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = following_export::config::DEFAULT_CONFIG_PATH
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    following_export::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    info!("Following Export");
    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using built-in defaults and environment",
            cli.config.display()
        );
        Config::load(None).context("Failed to load configuration")?
    };

    let orchestrator = PipelineOrchestrator::new(config)
        .context("Failed to initialize export pipeline")?
        .with_color(cli.color);

    let stats = orchestrator.run().await.context("Export failed")?;

    print_summary(orchestrator.config(), &stats);

    Ok(())
}

fn print_summary(config: &Config, stats: &PipelineStats) {
    let mut outputs = vec![
        config.output.html_path.display().to_string(),
        config.output.csv_path.display().to_string(),
    ];
    if let Some(json_path) = &config.output.json_path {
        outputs.push(json_path.display().to_string());
    }

    println!();
    println!(
        "{}",
        format_step(1, 3, &format!("Accounts found: {}", stats.accounts_found))
    );
    println!(
        "{}",
        format_step(
            2,
            3,
            &format!(
                "Avatars saved to {}: {}",
                config.download.avatar_dir.display(),
                stats.avatars_downloaded
            )
        )
    );
    println!(
        "{}",
        format_step(3, 3, &format!("Outputs: {}", outputs.join(", ")))
    );

    if stats.avatars_failed > 0 {
        println!(
            "{}",
            format_warning(&format!(
                "{} avatar downloads failed; those rows show no avatar",
                stats.avatars_failed
            ))
        );
    }

    println!("{}", format_success("Export complete"));
}
