//! Configuration management for the discounts API
//!
//! Loads configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// File holding submitted customer feedback, relative to the data directory
pub const FEEDBACK_FILE: &str = "discount-feedback.json";

/// File holding loyalty programme signups, relative to the data directory
pub const LOYAL_USERS_FILE: &str = "discount-loyal-users.json";

/// File holding the published FAQs, relative to the data directory
pub const FAQS_FILE: &str = "discount-faqs.json";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server host
    pub api_host: String,

    /// API server port
    pub api_port: u16,

    /// Root of the catalog tree; also holds the ledger and FAQ files
    pub data_dir: PathBuf,

    /// Static front-end assets served for every unmatched route
    pub public_dir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenv::dotenv().ok();

        let config = Config {
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            api_port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .context("Invalid PORT")?,

            data_dir: env::var("DATA_DIR")
                .unwrap_or_else(|_| "base-dir/discounts".to_string())
                .into(),

            public_dir: env::var("PUBLIC_DIR")
                .unwrap_or_else(|_| "public".to_string())
                .into(),
        };

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.api_port == 0 {
            anyhow::bail!("PORT must be greater than 0");
        }

        Ok(())
    }

    /// Get the API server address
    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    pub fn feedback_path(&self) -> PathBuf {
        self.data_dir.join(FEEDBACK_FILE)
    }

    pub fn loyal_users_path(&self) -> PathBuf {
        self.data_dir.join(LOYAL_USERS_FILE)
    }

    pub fn faqs_path(&self) -> PathBuf {
        self.data_dir.join(FAQS_FILE)
    }

    /// Warn about missing directories; neither is fatal at startup
    pub fn check_directories(&self) {
        if !self.data_dir.is_dir() {
            tracing::warn!(
                "Data directory does not exist, catalog will be empty: {}",
                self.data_dir.display()
            );
        }

        if !self.public_dir.is_dir() {
            tracing::warn!(
                "Public directory does not exist, static assets disabled: {}",
                self.public_dir.display()
            );
        }
    }
}
