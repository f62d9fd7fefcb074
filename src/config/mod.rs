pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::adapters::default_base_url;
use crate::core::{ConfigProvider, MatchPolicy, SourceKind};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_at_least, validate_base_url, validate_css_selector, validate_non_empty_string,
    validate_output_dir, validate_range, validate_required_field, validate_threshold, Validate,
};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

/// 兩種設定來源共用的檢查
pub fn validate_settings<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_base_url("base_url", config.base_url())?;
    validate_at_least("max_pages", config.max_pages(), 1)?;
    validate_threshold("threshold", config.threshold())?;
    validate_at_least("request_timeout", config.request_timeout().as_secs() as usize, 1)?;
    validate_range("citation_year", config.citation_year(), 1900, 2100)?;

    match config.source_kind() {
        SourceKind::Letpub => validate_css_selector("table_selector", config.table_selector())?,
        SourceKind::Wos => {
            let key = config.api_key().map(str::to_string);
            let key = validate_required_field("api_key", &key)?;
            validate_non_empty_string("api_key", key)?;
        }
    }

    if let Some(path) = config.output_path() {
        validate_output_dir("output_path", path)?;
    }
    Ok(())
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "journal-scout")]
#[command(about = "Estimate journal impact ratios from a journal directory or citation index")]
pub struct CliConfig {
    /// Load settings from a TOML file instead of flags
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, value_enum, default_value_t = SourceKind::Letpub)]
    pub source: SourceKind,

    /// Defaults to the public endpoint of the selected source
    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long, default_value = ".table_yjfx")]
    pub table_selector: String,

    #[arg(long, value_enum, default_value_t = MatchPolicy::Substring)]
    pub match_policy: MatchPolicy,

    #[arg(long, default_value = "2023")]
    pub citation_year: i32,

    #[arg(long, default_value = "10")]
    pub max_pages: usize,

    #[arg(long, default_value = "10.0")]
    pub threshold: f64,

    #[arg(long, default_value = "1000")]
    pub listing_delay_ms: u64,

    #[arg(long, default_value = "500")]
    pub item_delay_ms: u64,

    #[arg(long, default_value = "30")]
    pub request_timeout_secs: u64,

    /// Directory for journal_report.zip; nothing is written when omitted
    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    /// Print the effective settings without contacting any service
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn source_kind(&self) -> SourceKind {
        self.source
    }

    fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| default_base_url(self.source))
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn table_selector(&self) -> &str {
        &self.table_selector
    }

    fn match_policy(&self) -> MatchPolicy {
        self.match_policy
    }

    fn citation_year(&self) -> i32 {
        self.citation_year
    }

    fn max_pages(&self) -> usize {
        self.max_pages
    }

    fn threshold(&self) -> f64 {
        self.threshold
    }

    fn listing_delay(&self) -> Duration {
        Duration::from_millis(self.listing_delay_ms)
    }

    fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_settings(self)
    }
}
