//! Configuration handling for the TUI

use crate::api::{UsersClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use crate::state::FormOptions;
use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "SIGNUP_API_URL";

/// User configuration for the TUI
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Users API base address
    pub api_base_url: Option<String>,
    /// Upper length bound for each hobby
    pub hobby_max_length: Option<usize>,
    /// Quiet period before the email uniqueness check is sent
    pub email_debounce_ms: Option<u64>,
    /// Per-request timeout
    pub request_timeout_secs: Option<u64>,
}

impl AppConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "signup", "signup-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Where the log file goes
    pub fn log_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().join("signup-tui.log"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: AppConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Base URL: environment, then config file, then the default
    pub fn base_url(&self) -> String {
        self.base_url_with(std::env::var(API_URL_ENV).ok())
    }

    fn base_url_with(&self, env_value: Option<String>) -> String {
        env_value
            .filter(|v| !v.is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// Users API client for this configuration
    pub fn users_client(&self) -> Result<UsersClient> {
        self.users_client_for(self.base_url())
    }

    fn users_client_for(&self, base_url: String) -> Result<UsersClient> {
        let client = UsersClient::new(&base_url, self.request_timeout())?;
        Ok(client)
    }

    /// Form tunables, falling back to the built-in defaults
    pub fn form_options(&self) -> FormOptions {
        let defaults = FormOptions::default();
        FormOptions {
            hobby_max_length: self.hobby_max_length.unwrap_or(defaults.hobby_max_length),
            email_debounce: self
                .email_debounce_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.email_debounce),
            ..defaults
        }
    }
}
