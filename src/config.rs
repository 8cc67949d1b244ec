use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::coerce::NumericInput;
use crate::query::{PlainFields, QueryForm, StructuredFields};
use crate::rank::SortKey;

/// Environment variable carrying the production service origin.
pub const BASE_URL_ENV: &str = "SCOUT_API_BASE";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:4000".to_string()
}

/// Initial form values. Numeric fields are text, exactly as an operator
/// would type them; empty means unset.
#[derive(Debug, Deserialize, Clone)]
pub struct DefaultsConfig {
    #[serde(default = "default_query")]
    pub query: String,
    #[serde(default = "default_min_experience")]
    pub min_experience: String,
    #[serde(default = "default_max_experience")]
    pub max_experience: String,
    #[serde(default = "default_limit")]
    pub limit: String,
    #[serde(default = "default_text")]
    pub text: String,
    #[serde(default)]
    pub sort: SortKey,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            query: default_query(),
            min_experience: default_min_experience(),
            max_experience: default_max_experience(),
            limit: default_limit(),
            text: default_text(),
            sort: SortKey::default(),
        }
    }
}

fn default_query() -> String {
    "type:user MERN location:India repos:>3 followers:>5".to_string()
}
fn default_min_experience() -> String {
    "2".to_string()
}
fn default_max_experience() -> String {
    "8".to_string()
}
fn default_limit() -> String {
    "20".to_string()
}
fn default_text() -> String {
    "Looking for MERN stack devs in India with 2–8 years of experience".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplayConfig {
    #[serde(default = "default_max_languages")]
    pub max_languages: usize,
    #[serde(default = "default_bio_lines")]
    pub bio_lines: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_languages: default_max_languages(),
            bio_lines: default_bio_lines(),
        }
    }
}

fn default_max_languages() -> usize {
    6
}
fn default_bio_lines() -> usize {
    3
}

impl Config {
    /// Built-in defaults, used when no config file exists.
    pub fn minimal() -> Self {
        Self::default()
    }

    /// Service origin: explicit override, then `SCOUT_API_BASE`, then config.
    pub fn resolve_base_url(&self, cli_override: Option<&str>) -> String {
        if let Some(url) = cli_override.filter(|u| !u.is_empty()) {
            return url.to_string();
        }
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.is_empty() => url,
            _ => self.service.base_url.clone(),
        }
    }

    /// A fresh form seeded from `[defaults]`.
    pub fn initial_form(&self) -> QueryForm {
        let d = &self.defaults;
        QueryForm::new(
            StructuredFields {
                query: d.query.clone(),
                min_experience: NumericInput::new(&d.min_experience),
                max_experience: NumericInput::new(&d.max_experience),
                limit: NumericInput::new(&d.limit),
            },
            PlainFields {
                text: d.text.clone(),
            },
        )
    }
}

/// Reject origins that are not absolute HTTP(S) URLs.
pub fn check_base_url(url: &str) -> Result<()> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        anyhow::bail!("service base URL must start with http:// or https:// (got '{}')", url)
    }
}

fn is_numeric_or_empty(raw: &str) -> bool {
    let raw = raw.trim();
    raw.is_empty() || raw.parse::<f64>().map(|n| n.is_finite()).unwrap_or(false)
}

/// Parse and validate a config document.
pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content).with_context(|| "Failed to parse config file")?;

    check_base_url(&config.service.base_url).context("invalid service.base_url")?;

    if config.display.max_languages == 0 {
        anyhow::bail!("display.max_languages must be > 0");
    }
    if config.display.bio_lines == 0 {
        anyhow::bail!("display.bio_lines must be > 0");
    }

    let numeric = [
        ("defaults.min_experience", &config.defaults.min_experience),
        ("defaults.max_experience", &config.defaults.max_experience),
        ("defaults.limit", &config.defaults.limit),
    ];
    for (key, value) in numeric {
        if !is_numeric_or_empty(value) {
            anyhow::bail!("{} must be a number or empty (got '{}')", key, value);
        }
    }

    Ok(config)
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content)
}
