// file: src/exporter/json.rs
// description: json export of followed accounts with an export manifest

use crate::error::{PipelineError, Result};
use crate::models::FollowedAccount;
use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone)]
pub struct JsonExporter {
    output_path: PathBuf,
    pretty: bool,
}

#[derive(Debug, Serialize)]
pub struct ExportManifest<'a> {
    pub exported_at: String,
    pub total_accounts: usize,
    pub avatars_saved: usize,
    pub accounts: &'a [FollowedAccount],
}

impl JsonExporter {
    pub fn new(output_path: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            output_path: output_path.into(),
            pretty,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn render(&self, accounts: &[FollowedAccount]) -> Result<String> {
        let manifest = ExportManifest {
            exported_at: Utc::now().to_rfc3339(),
            total_accounts: accounts.len(),
            avatars_saved: accounts.iter().filter(|a| a.has_local_avatar()).count(),
            accounts,
        };

        let rendered = if self.pretty {
            serde_json::to_string_pretty(&manifest)
        } else {
            serde_json::to_string(&manifest)
        };

        rendered.map_err(|e| PipelineError::Serialization(e.to_string()))
    }

    pub fn write(&self, accounts: &[FollowedAccount]) -> Result<()> {
        info!("Starting JSON export to {:?}", self.output_path);

        let json = self.render(accounts)?;

        if let Some(parent) = self.output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| PipelineError::file_operation(parent, e))?;
        }
        fs::write(&self.output_path, json)
            .map_err(|e| PipelineError::file_operation(&self.output_path, e))?;

        info!("Export complete: {} accounts exported", accounts.len());
        Ok(())
    }
}
