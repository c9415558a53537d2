// file: src/exporter/csv.rs
// description: csv export of followed accounts with rfc 4180 quoting
// reference: https://www.rfc-editor.org/rfc/rfc4180

use crate::error::{PipelineError, Result};
use crate::models::FollowedAccount;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const CSV_HEADER: [&str; 4] = [
    "Display Name",
    "User Handle",
    "Avatar URL",
    "Local Avatar Path",
];

const LINE_TERMINATOR: &str = "\r\n";

#[derive(Debug, Clone)]
pub struct CsvExporter {
    output_path: PathBuf,
}

impl CsvExporter {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn write(&self, accounts: &[FollowedAccount]) -> Result<()> {
        if let Some(parent) = self.output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| PipelineError::file_operation(parent, e))?;
        }

        let file = File::create(&self.output_path)
            .map_err(|e| PipelineError::file_operation(&self.output_path, e))?;
        let mut writer = BufWriter::new(file);

        write_records(&mut writer, accounts)
            .and_then(|_| writer.flush())
            .map_err(|e| PipelineError::file_operation(&self.output_path, e))?;

        info!(
            "Wrote {} CSV rows to {}",
            accounts.len(),
            self.output_path.display()
        );
        Ok(())
    }
}

pub fn write_records<W: Write>(writer: &mut W, accounts: &[FollowedAccount]) -> std::io::Result<()> {
    write_row(writer, &CSV_HEADER)?;

    for account in accounts {
        let local_path = account
            .local_avatar_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();

        write_row(
            writer,
            &[
                account.display_name.as_deref().unwrap_or(""),
                account.user_handle.as_deref().unwrap_or(""),
                account.avatar_url.as_deref().unwrap_or(""),
                local_path.as_str(),
            ],
        )?;
    }

    Ok(())
}

fn write_row<W: Write>(writer: &mut W, fields: &[&str]) -> std::io::Result<()> {
    let line = fields
        .iter()
        .map(|field| quote_field(field))
        .collect::<Vec<_>>()
        .join(",");
    writer.write_all(line.as_bytes())?;
    writer.write_all(LINE_TERMINATOR.as_bytes())
}

/// Quotes only when the field contains a delimiter, quote or line break.
pub fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
