use crate::adapters::http::{PageFetcher, RateLimiter};
use crate::domain::model::{Enumeration, JournalMetrics, SourceKind};
use crate::domain::ports::JournalSource;
use crate::utils::error::{Result, ScoutError};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.clarivate.com/api/wos";
/// Sent as `X-APIKey`; header names are case-insensitive.
pub const API_KEY_HEADER: &str = "x-apikey";
const LISTING_PAGE_LIMIT: usize = 100;

#[derive(Debug, Clone)]
pub struct WosConfig {
    pub base_url: String,
    pub api_key: String,
    /// 統計引用的年份；文章數取前兩年
    pub citation_year: i32,
    pub max_pages: usize,
    pub listing_delay: Duration,
    pub item_delay: Duration,
    pub request_timeout: Duration,
}

impl WosConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            citation_year: 2023,
            max_pages: 10,
            listing_delay: Duration::from_millis(1000),
            item_delay: Duration::from_millis(500),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Citation-index JSON API source, authenticated with a static key header.
pub struct WosSource {
    config: WosConfig,
    fetcher: PageFetcher,
    listing_limiter: RateLimiter,
    item_limiter: RateLimiter,
    search_url: String,
}

impl WosSource {
    pub fn new(config: WosConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key).map_err(|e| {
            ScoutError::InvalidConfigValueError {
                field: "api_key".to_string(),
                value: "<redacted>".to_string(),
                reason: e.to_string(),
            }
        })?;
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Ok(Self {
            fetcher: PageFetcher::new(config.request_timeout, headers)?,
            listing_limiter: RateLimiter::new(config.listing_delay),
            item_limiter: RateLimiter::new(config.item_delay),
            search_url: format!("{}/search", config.base_url.trim_end_matches('/')),
            config,
        })
    }

    async fn search(&self, query: &[(&str, String)]) -> Result<Value> {
        let body = self.fetcher.fetch_ok(&self.search_url, query).await?;
        serde_json::from_str(&body).map_err(|e| {
            ScoutError::parse(format!("invalid JSON from {}: {e}", self.search_url))
        })
    }

    fn listing_query(&self, cursor: &str) -> Vec<(&'static str, String)> {
        vec![
            ("databaseId", "WOS".to_string()),
            ("q", format!("PY={}", self.config.citation_year)),
            ("limit", LISTING_PAGE_LIMIT.to_string()),
            ("cursor", cursor.to_string()),
            ("sortField", "PY+D".to_string()),
        ]
    }

    fn papers_query(&self, name: &str) -> Vec<(&'static str, String)> {
        let year = self.config.citation_year;
        vec![
            ("databaseId", "WOS".to_string()),
            (
                "q",
                format!(
                    "SO={} AND PY=({} OR {}) AND DT=(Article OR Review)",
                    name,
                    year - 2,
                    year - 1
                ),
            ),
            ("limit", "1".to_string()),
            ("fields", "static_data".to_string()),
        ]
    }

    fn citations_query(&self, name: &str) -> Vec<(&'static str, String)> {
        vec![
            ("databaseId", "WOS".to_string()),
            ("q", format!("SO={} AND PY={}", name, self.config.citation_year)),
            ("limit", "1".to_string()),
            ("fields", "static_data".to_string()),
        ]
    }
}

/// 從搜尋結果中取出 role 為 "source" 的期刊名稱
pub fn source_names(response: &Value) -> Option<Vec<String>> {
    let records = response.pointer("/Data/Records/records")?.as_array()?;
    let names = records
        .iter()
        .filter_map(|record| {
            record
                .pointer("/static_data/summary/names/name")?
                .as_array()?
                .iter()
                .find(|entry| entry.get("role").and_then(Value::as_str) == Some("source"))?
                .get("display_name")?
                .as_str()
                .map(str::to_string)
        })
        .filter(|name| !name.is_empty())
        .collect();
    Some(names)
}

pub fn next_cursor(response: &Value) -> Option<String> {
    response
        .get("CursorMark")
        .and_then(Value::as_str)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

pub fn records_found(response: &Value) -> Option<u64> {
    response.pointer("/QueryResult/RecordsFound")?.as_u64()
}

/// Sums `local_count` over the returned records; None when the records array is absent.
pub fn local_citation_total(response: &Value) -> Option<u64> {
    let records = response.pointer("/Data/Records/records")?.as_array()?;
    Some(
        records
            .iter()
            .filter_map(|r| {
                r.pointer("/dynamic_data/citation_related/tc_list/silo_tc/local_count")
                    .and_then(Value::as_u64)
            })
            .sum(),
    )
}

#[async_trait]
impl JournalSource for WosSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Wos
    }

    async fn enumerate(&self) -> Result<Enumeration> {
        let mut enumeration = Enumeration::default();
        let mut cursor = String::new();

        for page in 1..=self.config.max_pages {
            self.listing_limiter.wait().await;
            tracing::info!("📄 Requesting search page {}", page);

            let response = match self.search(&self.listing_query(&cursor)).await {
                Ok(response) => response,
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Search page {} failed, keeping {} names: {}",
                        page,
                        enumeration.names.len(),
                        e
                    );
                    return Ok(enumeration);
                }
            };
            enumeration.pages_fetched = page;

            let Some(names) = source_names(&response) else {
                tracing::info!("No records on page {}, stopping", page);
                break;
            };
            for name in names {
                enumeration.push_unique(name);
            }
            tracing::info!("Gathered {} journals so far", enumeration.names.len());

            match next_cursor(&response) {
                Some(next) => cursor = next,
                None => break,
            }
        }

        enumeration.complete = true;
        Ok(enumeration)
    }

    async fn resolve(&self, name: &str) -> Result<JournalMetrics> {
        self.item_limiter.wait().await;
        let papers_response = self.search(&self.papers_query(name)).await?;

        self.item_limiter.wait().await;
        let citations_response = self.search(&self.citations_query(name)).await?;

        let metrics = JournalMetrics {
            citations: local_citation_total(&citations_response),
            papers: records_found(&papers_response),
        };
        tracing::debug!("Journal {} metrics: {:?}", name, metrics);
        Ok(metrics)
    }
}
