//! Configuration management for the resume ranker

use crate::error::{RankerError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DRIVE_TOKEN_ENV: &str = "RESUME_RANKER_DRIVE_TOKEN";
pub const SMTP_PASSWORD_ENV: &str = "RESUME_RANKER_SMTP_PASSWORD";

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub drive: DriveConfig,
    pub email: EmailConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub default_embedding_model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    pub api_base_url: String,
    /// OAuth access token with the drive.readonly scope
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    pub mime_filter: Vec<String>,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub sender: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub receiver: String,
    pub subject: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Html,
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".resume-ranker")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                default_embedding_model: "potion-base-8M".to_string(),
            },
            drive: DriveConfig {
                api_base_url: "https://www.googleapis.com".to_string(),
                access_token: None,
                mime_filter: vec![MIME_PDF.to_string(), MIME_DOCX.to_string()],
                request_timeout_secs: 60,
            },
            email: EmailConfig {
                smtp_host: "smtp.gmail.com".to_string(),
                smtp_port: 587,
                sender: String::new(),
                password: None,
                receiver: String::new(),
                subject: "Resume Match Results".to_string(),
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from `config_path`, writing defaults there on first use
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            toml::from_str(&content)
                .map_err(|e| RankerError::Configuration(format!("Failed to parse config: {}", e)))?
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            config
        };
        Ok(config.with_env_overrides())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| RankerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-ranker")
            .join("config.toml")
    }

    /// Secrets from the environment win over the file
    fn with_env_overrides(mut self) -> Self {
        if let Ok(token) = std::env::var(DRIVE_TOKEN_ENV) {
            if !token.trim().is_empty() {
                self.drive.access_token = Some(token.trim().to_string());
            }
        }
        if let Ok(password) = std::env::var(SMTP_PASSWORD_ENV) {
            if !password.is_empty() {
                self.email.password = Some(password);
            }
        }
        self
    }

    pub fn get_models_dir(&self) -> PathBuf {
        self.models.models_dir.clone()
    }
}

impl DriveConfig {
    /// Per-request limit for Drive calls; never zero
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

impl EmailConfig {
    /// Check the fields the transport needs before attempting to send
    pub fn validate(&self) -> Result<()> {
        if self.sender.trim().is_empty() || self.receiver.trim().is_empty() {
            return Err(RankerError::Configuration(
                "email.sender and email.receiver must be set to send results".to_string(),
            ));
        }
        if self.password.as_deref().map_or(true, str::is_empty) {
            return Err(RankerError::Configuration(format!(
                "SMTP password missing: set email.password or {}",
                SMTP_PASSWORD_ENV
            )));
        }
        Ok(())
    }
}
