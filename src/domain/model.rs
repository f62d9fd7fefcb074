use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 期刊名稱比對策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// 名稱欄位包含查詢字串 (不分大小寫)，第一個符合的列勝出
    #[default]
    Substring,
    CaseInsensitiveExact,
    Exact,
}

impl MatchPolicy {
    pub fn matches(&self, candidate: &str, query: &str) -> bool {
        match self {
            Self::Substring => candidate.to_lowercase().contains(&query.to_lowercase()),
            Self::CaseInsensitiveExact => candidate.to_lowercase() == query.to_lowercase(),
            Self::Exact => candidate == query,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// LetPub 風格的 HTML 期刊目錄
    #[default]
    Letpub,
    /// Web of Science 風格的 JSON API
    Wos,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Letpub => write!(f, "letpub"),
            Self::Wos => write!(f, "wos"),
        }
    }
}

/// 解析器回傳的原始計數，欄位缺失或無法解析時為 None
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct JournalMetrics {
    pub citations: Option<u64>,
    pub papers: Option<u64>,
}

/// 通過驗證的計數 (papers > 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricCounts {
    pub citations: u64,
    pub papers: u64,
}

impl JournalMetrics {
    pub fn new(citations: u64, papers: u64) -> Self {
        Self {
            citations: Some(citations),
            papers: Some(papers),
        }
    }

    /// Returns the reason the counts cannot produce a ratio.
    pub fn validate(&self) -> std::result::Result<MetricCounts, String> {
        match (self.citations, self.papers) {
            (None, _) => Err("citation count is missing".to_string()),
            (_, None) => Err("paper count is missing".to_string()),
            (Some(_), Some(0)) => Err("paper count is zero".to_string()),
            (Some(citations), Some(papers)) => Ok(MetricCounts { citations, papers }),
        }
    }
}

impl MetricCounts {
    pub fn ratio(&self) -> f64 {
        self.citations as f64 / self.papers as f64
    }
}

/// 列舉結果；complete 為 false 表示中途抓取失敗、名單被截斷
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Enumeration {
    pub names: Vec<String>,
    pub complete: bool,
    pub pages_fetched: usize,
}

impl Enumeration {
    pub fn is_truncated(&self) -> bool {
        !self.complete
    }

    /// Appends a name unless an identical one was already gathered.
    pub fn push_unique(&mut self, name: String) -> bool {
        if self.names.contains(&name) {
            return false;
        }
        self.names.push(name);
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PipelineEntry {
    Accepted {
        name: String,
        ratio: f64,
        metrics: MetricCounts,
    },
    Rejected {
        name: String,
        reason: String,
    },
}

impl PipelineEntry {
    pub fn name(&self) -> &str {
        match self {
            Self::Accepted { name, .. } | Self::Rejected { name, .. } => name,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

impl std::fmt::Display for PipelineEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accepted {
                name,
                ratio,
                metrics,
            } => write!(
                f,
                "{}: {:.2} (citations: {}, papers: {})",
                name, ratio, metrics.citations, metrics.papers
            ),
            Self::Rejected { name, reason } => write!(f, "{}: failed - {}", name, reason),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub source: SourceKind,
    pub threshold: f64,
    pub total: usize,
    pub enumeration_complete: bool,
    pub entries: Vec<PipelineEntry>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    pub fn accepted(&self) -> impl Iterator<Item = &PipelineEntry> {
        self.entries.iter().filter(|e| e.is_accepted())
    }

    pub fn rejected(&self) -> impl Iterator<Item = &PipelineEntry> {
        self.entries.iter().filter(|e| !e.is_accepted())
    }
}
