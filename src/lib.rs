// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod downloader;
pub mod error;
pub mod exporter;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod utils;

pub use config::{Config, DownloadConfig, InputConfig, OutputConfig, SelectorConfig};
pub use downloader::AvatarDownloader;
pub use error::{PipelineError, Result};
pub use exporter::{CsvExporter, ExportManifest, HtmlReportWriter, JsonExporter};
pub use models::FollowedAccount;
pub use parser::FollowingParser;
pub use pipeline::{DownloadStats, PipelineOrchestrator, PipelineStats, ProgressTracker};
pub use utils::Validator;
