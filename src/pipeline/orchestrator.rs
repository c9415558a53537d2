// file: src/pipeline/orchestrator.rs
// description: coordinates parsing, avatar downloads, and report generation
// reference: orchestrates the single-pass export workflow

use crate::config::Config;
use crate::downloader::AvatarDownloader;
use crate::error::{PipelineError, Result};
use crate::exporter::{CsvExporter, HtmlReportWriter, JsonExporter};
use crate::models::FollowedAccount;
use crate::parser::FollowingParser;
use crate::pipeline::progress::{PipelineStats, ProgressTracker};
use crate::utils::Validator;
use std::time::Instant;
use tracing::{error, info, warn};

pub struct PipelineOrchestrator {
    config: Config,
    parser: FollowingParser,
    downloader: AvatarDownloader,
    colored: bool,
}

impl PipelineOrchestrator {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let parser = FollowingParser::new(&config.selectors)?;
        let downloader = AvatarDownloader::new(&config.download)?;

        Ok(Self {
            config,
            parser,
            downloader,
            colored: true,
        })
    }

    /// Selects the colored or plain progress bar style.
    pub fn with_color(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    pub fn is_colored(&self) -> bool {
        self.colored
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub async fn run(&self) -> Result<PipelineStats> {
        let start = Instant::now();
        let input = &self.config.input.html_path;

        if let Err(e) = Validator::validate_input_file(input) {
            if matches!(e, PipelineError::InputNotFound { .. }) {
                error!("Error: {} not found!", input.display());
            }
            return Err(e);
        }

        let html = tokio::fs::read_to_string(input)
            .await
            .map_err(|e| PipelineError::file_operation(input, e))?;

        if Validator::validate_content_not_empty(&html).is_err() {
            warn!("{} is empty", input.display());
        }

        let mut accounts = self.extract(&html);
        info!("Found {} users in {}.", accounts.len(), input.display());

        Validator::validate_directory_target(self.downloader.avatar_dir())?;
        let progress = ProgressTracker::with_visibility(
            accounts.len(),
            self.config.download.show_progress,
            self.colored,
        );
        let downloads = self
            .downloader
            .download_all(&mut accounts, &progress)
            .await?;
        progress.finish();

        self.write_outputs(&accounts)?;

        let stats =
            PipelineStats::from_downloads(accounts.len(), &downloads, start.elapsed().as_secs());
        self.log_final_stats(&stats);

        Ok(stats)
    }

    pub fn extract(&self, html: &str) -> Vec<FollowedAccount> {
        self.parser.parse(html)
    }

    pub fn write_outputs(&self, accounts: &[FollowedAccount]) -> Result<()> {
        let output = &self.config.output;

        let html = HtmlReportWriter::new(&output.html_path, output.title.clone());
        html.write(accounts)?;
        info!("HTML table created: {}", html.output_path().display());

        let csv = CsvExporter::new(&output.csv_path);
        csv.write(accounts)?;
        info!("CSV file created: {}", csv.output_path().display());

        if let Some(json_path) = &output.json_path {
            let json = JsonExporter::new(json_path, output.pretty_json);
            json.write(accounts)?;
            info!("JSON file created: {}", json.output_path().display());
        }

        Ok(())
    }

    fn log_final_stats(&self, stats: &PipelineStats) {
        info!("=== Export Summary ===");
        info!("Duration: {} seconds", stats.duration_secs);
        info!("Accounts found: {}", stats.accounts_found);
        info!("Avatars downloaded: {}", stats.avatars_downloaded);
        info!("Avatars failed: {}", stats.avatars_failed);
        info!("Accounts without avatar URL: {}", stats.avatars_skipped);
        info!("Download success rate: {:.2}%", stats.success_rate());
        info!(
            "Downloaded: {:.2} KB ({:.2} KB/sec)",
            stats.bytes_downloaded as f64 / 1024.0,
            stats.bytes_per_second() / 1024.0
        );
        info!("======================");
    }
}
