use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Request to {url} failed{}: {message}", status_suffix(.status))]
    FetchError {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("HTTP transport error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("Journal not found: {journal}")]
    NotFoundError { journal: String },

    #[error("invalid data for {journal}: {reason}")]
    InvalidMetricsError { journal: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScoutError {
    pub fn fetch(url: impl Into<String>, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::FetchError {
            url: url.into(),
            status,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
        }
    }

    pub fn not_found(journal: impl Into<String>) -> Self {
        Self::NotFoundError {
            journal: journal.into(),
        }
    }

    pub fn invalid_metrics(journal: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidMetricsError {
            journal: journal.into(),
            reason: reason.into(),
        }
    }

    /// 是否為網路層錯誤 (HTTP 狀態或傳輸失敗)
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::FetchError { .. } | Self::HttpError(_))
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FetchError { .. } | Self::HttpError(_) => ErrorCategory::Network,
            Self::ParseError { .. }
            | Self::NotFoundError { .. }
            | Self::InvalidMetricsError { .. } => ErrorCategory::Data,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => ErrorCategory::Configuration,
            Self::IoError(_)
            | Self::CsvError(_)
            | Self::ZipError(_)
            | Self::SerializationError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotFoundError { .. } | Self::InvalidMetricsError { .. } => ErrorSeverity::Low,
            Self::FetchError { .. } | Self::HttpError(_) => ErrorSeverity::Medium,
            Self::ParseError { .. }
            | Self::CsvError(_)
            | Self::ZipError(_)
            | Self::SerializationError(_) => ErrorSeverity::High,
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::FetchError { status: Some(status), .. } => {
                format!("The remote service answered with HTTP {}", status)
            }
            Self::FetchError { .. } | Self::HttpError(_) => {
                "Could not reach the remote service".to_string()
            }
            Self::ParseError { .. } => "The remote service returned an unexpected page".to_string(),
            Self::NotFoundError { journal } => format!("No listing row matches '{}'", journal),
            Self::InvalidMetricsError { journal, .. } => {
                format!("Citation data for '{}' is incomplete", journal)
            }
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => format!("Configuration problem: {}", self),
            Self::IoError(_)
            | Self::CsvError(_)
            | Self::ZipError(_)
            | Self::SerializationError(_) => format!("Failed to write the report: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => {
                "Check network connectivity and the base URL, or raise the request delays"
            }
            ErrorCategory::Data => {
                "Try a different match policy or verify the journal name on the listing site"
            }
            ErrorCategory::Configuration => {
                "Review the command line flags or the TOML configuration file"
            }
            ErrorCategory::Output => "Make sure the output directory exists and is writable",
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|s| format!(" with status {}", s))
        .unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, ScoutError>;
