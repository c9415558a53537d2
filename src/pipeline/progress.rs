// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for pipeline execution
// reference: uses indicatif for progress bars and tracks download metrics

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Outcome counts of one avatar download pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DownloadStats {
    pub downloaded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineStats {
    pub accounts_found: usize,
    pub avatars_downloaded: usize,
    pub avatars_failed: usize,
    pub avatars_skipped: usize,
    pub bytes_downloaded: u64,
    pub duration_secs: u64,
}

impl PipelineStats {
    pub fn from_downloads(accounts_found: usize, downloads: &DownloadStats, duration_secs: u64) -> Self {
        Self {
            accounts_found,
            avatars_downloaded: downloads.downloaded,
            avatars_failed: downloads.failed,
            avatars_skipped: downloads.skipped,
            bytes_downloaded: downloads.bytes,
            duration_secs,
        }
    }

    pub fn attempted(&self) -> usize {
        self.avatars_downloaded + self.avatars_failed
    }

    /// Share of attempted downloads that succeeded. Records without an
    /// avatar URL are not attempts.
    pub fn success_rate(&self) -> f64 {
        let total = self.attempted();
        if total == 0 {
            return 0.0;
        }
        (self.avatars_downloaded as f64 / total as f64) * 100.0
    }

    pub fn bytes_per_second(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        self.bytes_downloaded as f64 / self.duration_secs as f64
    }
}

pub struct ProgressTracker {
    bar: ProgressBar,
    downloaded: AtomicUsize,
    failed: AtomicUsize,
    skipped: AtomicUsize,
    bytes: AtomicU64,
}

impl ProgressTracker {
    pub fn with_visibility(total: usize, visible: bool, colored: bool) -> Self {
        let bar = create_progress_bar(total as u64, colored);
        if !visible {
            bar.set_draw_target(ProgressDrawTarget::hidden());
        }

        Self {
            bar,
            downloaded: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            skipped: AtomicUsize::new(0),
            bytes: AtomicU64::new(0),
        }
    }

    pub fn inc_downloaded(&self, bytes: u64) {
        self.downloaded.fetch_add(1, Ordering::SeqCst);
        self.bytes.fetch_add(bytes, Ordering::SeqCst);
        self.advance();
    }

    pub fn inc_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
        self.advance();
    }

    pub fn inc_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
        self.advance();
    }

    pub fn set_message(&self, message: String) {
        self.bar.set_message(message);
    }

    pub fn finish(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_with_message("Avatars complete");
        }
    }

    pub fn download_stats(&self) -> DownloadStats {
        DownloadStats {
            downloaded: self.downloaded.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            skipped: self.skipped.load(Ordering::SeqCst),
            bytes: self.bytes.load(Ordering::SeqCst),
        }
    }

    fn advance(&self) {
        self.bar.inc(1);
        let failed = self.failed.load(Ordering::SeqCst);
        if failed > 0 {
            self.bar.set_message(format!("Failed: {}", failed));
        }
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

const COLORED_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";
const PLAIN_TEMPLATE: &str = "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({eta}) {msg}";

fn bar_template(colored: bool) -> (&'static str, &'static str) {
    if colored {
        (COLORED_TEMPLATE, "█▓▒░")
    } else {
        (PLAIN_TEMPLATE, "=>-")
    }
}

fn create_progress_bar(total: u64, colored: bool) -> ProgressBar {
    let bar = ProgressBar::new(total);
    let (template, chars) = bar_template(colored);

    // Templates are constant; fall back to the stock style if one is rejected.
    let style = ProgressStyle::default_bar()
        .template(template)
        .map(|style| style.progress_chars(chars))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}
