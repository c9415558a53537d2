// file: src/exporter/html.rs
// description: html table report of followed accounts
// reference: string templating with escaped cell content

use crate::error::{PipelineError, Result};
use crate::models::FollowedAccount;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const STYLE: &str = "    table {
        border-collapse: collapse;
        width: 800px;
        margin: 20px auto;
        font-family: sans-serif;
    }
    th, td {
        border: 1px solid #ccc;
        padding: 8px 12px;
        text-align: left;
        vertical-align: middle;
    }
    thead {
        background-color: #f2f2f2;
    }
    img {
        max-width: 60px;
        max-height: 60px;
        border-radius: 50%;
        object-fit: cover;
    }
    tr:nth-child(even) {
        background-color: #fafafa;
    }
";

#[derive(Debug, Clone)]
pub struct HtmlReportWriter {
    output_path: PathBuf,
    title: String,
}

impl HtmlReportWriter {
    pub fn new(output_path: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            output_path: output_path.into(),
            title: title.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn render(&self, accounts: &[FollowedAccount]) -> String {
        let title = escape_html(&self.title);
        let mut html = String::new();

        // Writing into a String cannot fail.
        let _ = write!(
            html,
            "<!DOCTYPE html>
<html>
<head>
    <meta charset=\"UTF-8\">
    <title>{title}</title>
    <style>
{STYLE}    </style>
</head>
<body>
    <h2 style=\"text-align:center;\">{title}</h2>
    <table>
        <thead>
            <tr>
                <th>Avatar</th>
                <th>Display Name</th>
                <th>User Handle</th>
            </tr>
        </thead>
        <tbody>
"
        );

        let rows: Vec<String> = accounts.iter().map(render_row).collect();
        html.push_str(&rows.join("\n"));

        html.push_str(
            "        </tbody>
    </table>
</body>
</html>
",
        );

        html
    }

    pub fn write(&self, accounts: &[FollowedAccount]) -> Result<()> {
        let html = self.render(accounts);

        if let Some(parent) = self.output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| PipelineError::file_operation(parent, e))?;
        }

        fs::write(&self.output_path, html)
            .map_err(|e| PipelineError::file_operation(&self.output_path, e))?;

        info!(
            "Wrote HTML report with {} rows to {}",
            accounts.len(),
            self.output_path.display()
        );
        Ok(())
    }
}

fn render_row(account: &FollowedAccount) -> String {
    let avatar = match &account.local_avatar_path {
        Some(path) => format!(
            "<img src=\"{}\" alt=\"Avatar\">",
            escape_html(&path.to_string_lossy())
        ),
        None => "No Avatar".to_string(),
    };
    let display_name = escape_html(account.display_name.as_deref().unwrap_or(""));
    let user_handle = escape_html(account.user_handle.as_deref().unwrap_or(""));

    format!(
        "
            <tr>
                <td>{avatar}</td>
                <td>{display_name}</td>
                <td>{user_handle}</td>
            </tr>
        "
    )
}

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
