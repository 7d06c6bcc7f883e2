use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::layout::{FontFamily, PageSize};

/// Application configuration loaded from environment variables.
/// Every variable has a default; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory delivered documents are written to.
    pub export_dir: PathBuf,
    pub page_size: PageSize,
    pub margin_mm: f32,
    pub font_family: FontFamily,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let margin_mm = env_or("PAGE_MARGIN_MM", "20")
            .parse::<f32>()
            .context("PAGE_MARGIN_MM must be a number of millimetres")?;
        if !(margin_mm.is_finite() && margin_mm >= 0.0) {
            anyhow::bail!("PAGE_MARGIN_MM must be a non-negative number, got {margin_mm}");
        }

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            export_dir: PathBuf::from(env_or("EXPORT_DIR", "./exports")),
            page_size: env_or("PAGE_SIZE", "a4")
                .parse::<PageSize>()
                .map_err(anyhow::Error::msg)
                .context("PAGE_SIZE must be 'a4' or 'letter'")?,
            margin_mm,
            font_family: env_or("FONT_FAMILY", "helvetica")
                .parse::<FontFamily>()
                .map_err(anyhow::Error::msg)
                .context("FONT_FAMILY must be 'helvetica' or 'courier'")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
