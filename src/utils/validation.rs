// file: src/utils/validation.rs
// description: data validation utilities and helpers
// reference: input validation patterns

use crate::error::{PipelineError, Result};
use std::path::Path;
use url::Url;

pub struct Validator;

impl Validator {
    pub fn validate_input_file(path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(PipelineError::InputNotFound {
                path: path.to_path_buf(),
            });
        }

        if !path.is_file() {
            return Err(PipelineError::Validation(format!(
                "Path is not a file: {}",
                path.display()
            )));
        }

        Ok(())
    }

    /// The target may be missing (it gets created) but must not be a file.
    pub fn validate_directory_target(path: &Path) -> Result<()> {
        if path.exists() && !path.is_dir() {
            return Err(PipelineError::Validation(format!(
                "Path exists and is not a directory: {}",
                path.display()
            )));
        }
        Ok(())
    }

    pub fn validate_content_not_empty(content: &str) -> Result<()> {
        if content.trim().is_empty() {
            return Err(PipelineError::Validation("Content is empty".to_string()));
        }
        Ok(())
    }

    /// Absolute http(s) URL with a host.
    pub fn validate_url(url: &str) -> Result<()> {
        let parsed = Url::parse(url).map_err(|e| {
            PipelineError::Validation(format!("Invalid URL format: {} ({})", url, e))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return Err(PipelineError::Validation(format!(
                "URL must be http(s) with a host: {}",
                url
            )));
        }
        Ok(())
    }

    pub fn sanitize_file_name(name: &str) -> String {
        name.replace(['/', '\\'], "_")
    }
}
