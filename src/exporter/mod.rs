// file: src/exporter/mod.rs
// description: report and data export module exports
// reference: internal module structure

pub mod csv;
pub mod html;
pub mod json;

pub use csv::CsvExporter;
pub use html::HtmlReportWriter;
pub use json::{ExportManifest, JsonExporter};
