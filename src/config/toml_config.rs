use crate::adapters::default_base_url;
use crate::adapters::html::DEFAULT_TABLE_SELECTOR;
use crate::config::validate_settings;
use crate::core::{ConfigProvider, MatchPolicy, SourceKind};
use crate::utils::error::{Result, ScoutError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub run: RunSection,
    pub source: SourceSection,
    pub limits: LimitsSection,
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSection {
    pub source: SourceKind,
    pub threshold: f64,
    pub output_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSection {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub table_selector: String,
    pub match_policy: MatchPolicy,
    pub citation_year: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsSection {
    pub max_pages: usize,
    pub listing_delay_ms: u64,
    pub item_delay_ms: u64,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub verbose: bool,
    pub json: bool,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            source: SourceKind::Letpub,
            threshold: 10.0,
            output_path: None,
        }
    }
}

impl Default for SourceSection {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            table_selector: DEFAULT_TABLE_SELECTOR.to_string(),
            match_policy: MatchPolicy::Substring,
            citation_year: 2023,
        }
    }
}

impl Default for LimitsSection {
    fn default() -> Self {
        Self {
            max_pages: 10,
            listing_delay_ms: 1000,
            item_delay_ms: 500,
            request_timeout_seconds: 30,
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ScoutError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WOS_API_KEY})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| {
            ScoutError::ConfigError {
                message: format!("env substitution pattern: {}", e),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| {
                tracing::warn!("Environment variable {} is not set", var_name);
                format!("${{{}}}", var_name)
            })
        });

        Ok(result.into_owned())
    }
}

impl ConfigProvider for TomlConfig {
    fn source_kind(&self) -> SourceKind {
        self.run.source
    }

    fn base_url(&self) -> &str {
        self.source
            .base_url
            .as_deref()
            .unwrap_or_else(|| default_base_url(self.run.source))
    }

    fn api_key(&self) -> Option<&str> {
        // 未替換的 ${VAR} 視為沒有設定
        self.source
            .api_key
            .as_deref()
            .filter(|key| !key.starts_with("${"))
    }

    fn table_selector(&self) -> &str {
        &self.source.table_selector
    }

    fn match_policy(&self) -> MatchPolicy {
        self.source.match_policy
    }

    fn citation_year(&self) -> i32 {
        self.source.citation_year
    }

    fn max_pages(&self) -> usize {
        self.limits.max_pages
    }

    fn threshold(&self) -> f64 {
        self.run.threshold
    }

    fn listing_delay(&self) -> Duration {
        Duration::from_millis(self.limits.listing_delay_ms)
    }

    fn item_delay(&self) -> Duration {
        Duration::from_millis(self.limits.item_delay_ms)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.limits.request_timeout_seconds)
    }

    fn output_path(&self) -> Option<&str> {
        self.run.output_path.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_settings(self)
    }
}
