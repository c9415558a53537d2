// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use crate::utils::Validator;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "FOLLOWING_EXPORT";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub input: InputConfig,
    pub download: DownloadConfig,
    pub output: OutputConfig,
    pub selectors: SelectorConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub html_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DownloadConfig {
    pub avatar_dir: PathBuf,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Base used to resolve relative and protocol-relative avatar URLs.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    pub html_path: PathBuf,
    pub csv_path: PathBuf,
    #[serde(default)]
    pub json_path: Option<PathBuf>,
    #[serde(default)]
    pub pretty_json: bool,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SelectorConfig {
    pub container: String,
    pub display_name: String,
    pub user_handle: String,
    pub avatar: String,
}

fn default_true() -> bool {
    true
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            container: "li".to_string(),
            display_name: "span.css-k0d282-SpanNickname.es616eb6".to_string(),
            user_handle: "p.css-3gbgjv-PUniqueId.es616eb8".to_string(),
            avatar: "img.css-1zpj2q-ImgAvatar.e1e9er4e1".to_string(),
        }
    }
}

impl Config {
    /// Layers, lowest first: built-in defaults, the TOML file, then
    /// `FOLLOWING_EXPORT__<SECTION>__<KEY>` variables. An explicit path must
    /// exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        match path {
            Some(path) => Self::load_layered(path, true, Self::environment()),
            None => Self::load_layered(Path::new(DEFAULT_CONFIG_PATH), false, Self::environment()),
        }
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true)
    }

    fn load_layered(file: &Path, required: bool, environment: config::Environment) -> Result<Self> {
        let defaults = config::Config::try_from(&Self::default_config())
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::from(file).required(required))
            .add_source(environment)
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            input: InputConfig {
                html_path: PathBuf::from("following.html"),
            },
            download: DownloadConfig {
                avatar_dir: PathBuf::from("avatars"),
                timeout_secs: 10,
                user_agent: format!("following_export/{}", env!("CARGO_PKG_VERSION")),
                base_url: None,
                show_progress: true,
            },
            output: OutputConfig {
                html_path: PathBuf::from("following_table.html"),
                csv_path: PathBuf::from("following.csv"),
                json_path: None,
                pretty_json: false,
                title: "TikTok Following".to_string(),
            },
            selectors: SelectorConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.download.timeout_secs == 0 {
            return Err(PipelineError::Config(
                "download.timeout_secs must be greater than 0".to_string(),
            ));
        }

        let paths = [
            ("input.html_path", &self.input.html_path),
            ("download.avatar_dir", &self.download.avatar_dir),
            ("output.html_path", &self.output.html_path),
            ("output.csv_path", &self.output.csv_path),
        ];
        for (name, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(PipelineError::Config(format!("{} must not be empty", name)));
            }
        }

        let selectors = [
            ("selectors.container", &self.selectors.container),
            ("selectors.display_name", &self.selectors.display_name),
            ("selectors.user_handle", &self.selectors.user_handle),
            ("selectors.avatar", &self.selectors.avatar),
        ];
        for (name, selector) in selectors {
            if selector.trim().is_empty() {
                return Err(PipelineError::Config(format!("{} must not be empty", name)));
            }
        }

        if let Some(base_url) = &self.download.base_url
            && Validator::validate_url(base_url).is_err()
        {
            return Err(PipelineError::Config(format!(
                "download.base_url must be an http(s) URL: {}",
                base_url
            )));
        }

        Ok(())
    }
}
