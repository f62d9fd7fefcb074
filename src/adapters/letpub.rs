use crate::adapters::html::{ListingPage, TableExtractor, DEFAULT_TABLE_SELECTOR};
use crate::adapters::http::{PageFetcher, RateLimiter};
use crate::domain::model::{Enumeration, JournalMetrics, MatchPolicy, SourceKind};
use crate::domain::ports::JournalSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://www.letpub.com.cn/index.php";

/// Rows per listing page on the site; not enforced when parsing.
pub const PAGE_SIZE: usize = 50;

/// 列表查詢固定帶的空白篩選條件
const EMPTY_FILTERS: [&str; 11] = [
    "searchname",
    "searchissn",
    "searchfield",
    "searchimpactlow",
    "searchimpacthigh",
    "searchcountry",
    "searchissnexact",
    "searchcategory1",
    "searchcategory2",
    "searchjcrkind",
    "searchjcr",
];

#[derive(Debug, Clone)]
pub struct LetPubConfig {
    pub base_url: String,
    pub table_selector: String,
    pub match_policy: MatchPolicy,
    pub max_pages: usize,
    pub listing_delay: Duration,
    pub item_delay: Duration,
    pub request_timeout: Duration,
}

impl Default for LetPubConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            table_selector: DEFAULT_TABLE_SELECTOR.to_string(),
            match_policy: MatchPolicy::Substring,
            max_pages: 10,
            listing_delay: Duration::from_millis(1000),
            item_delay: Duration::from_millis(500),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// LetPub 期刊目錄 (HTML 表格) 資料來源
pub struct LetPubSource {
    config: LetPubConfig,
    fetcher: PageFetcher,
    extractor: TableExtractor,
    listing_limiter: RateLimiter,
    item_limiter: RateLimiter,
}

impl LetPubSource {
    pub fn new(config: LetPubConfig) -> Result<Self> {
        Ok(Self {
            fetcher: PageFetcher::new(config.request_timeout, HeaderMap::new())?,
            extractor: TableExtractor::new(&config.table_selector)?,
            listing_limiter: RateLimiter::new(config.listing_delay),
            item_limiter: RateLimiter::new(config.item_delay),
            config,
        })
    }

    fn listing_query(page: usize) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("page", "journalapp".to_string()),
            ("view", "search".to_string()),
        ];
        query.extend(EMPTY_FILTERS.iter().map(|key| (*key, String::new())));
        query.push(("searchsort", "if_2022".to_string()));
        query.push(("currentpage", page.to_string()));
        query
    }

    fn journal_query(name: &str) -> Vec<(&'static str, String)> {
        vec![
            ("page", "journalapp".to_string()),
            ("view", "search".to_string()),
            ("searchname", name.to_string()),
        ]
    }
}

#[async_trait]
impl JournalSource for LetPubSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Letpub
    }

    async fn enumerate(&self) -> Result<Enumeration> {
        let mut enumeration = Enumeration::default();

        for page in 1..=self.config.max_pages {
            self.listing_limiter.wait().await;
            tracing::info!("📄 Requesting listing page {}", page);

            let body = match self
                .fetcher
                .fetch_ok(&self.config.base_url, &Self::listing_query(page))
                .await
            {
                Ok(body) => body,
                Err(e) if page == 1 => return Err(e),
                Err(e) => {
                    tracing::warn!(
                        "⚠️ Listing page {} failed, keeping {} names: {}",
                        page,
                        enumeration.names.len(),
                        e
                    );
                    return Ok(enumeration);
                }
            };
            enumeration.pages_fetched = page;

            let names = match self.extractor.extract_names(&body) {
                ListingPage::MissingTable => {
                    tracing::info!("No journal table on page {}, stopping", page);
                    break;
                }
                ListingPage::Rows(names) if names.is_empty() => {
                    tracing::info!("Page {} has no data rows, stopping", page);
                    break;
                }
                ListingPage::Rows(names) => names,
                ListingPage::Unusable { rows } => {
                    tracing::warn!(
                        "⚠️ Page {} has {} rows without a name column, skipping",
                        page,
                        rows
                    );
                    continue;
                }
            };

            tracing::debug!("Page {} returned {} rows", page, names.len());
            for name in names {
                enumeration.push_unique(name);
            }
        }

        enumeration.complete = true;
        tracing::info!(
            "✅ Enumerated {} journals from {} pages",
            enumeration.names.len(),
            enumeration.pages_fetched
        );
        Ok(enumeration)
    }

    async fn resolve(&self, name: &str) -> Result<JournalMetrics> {
        self.item_limiter.wait().await;
        tracing::debug!("Requesting journal: {}", name);

        let body = self
            .fetcher
            .fetch_ok(&self.config.base_url, &Self::journal_query(name))
            .await?;
        self.extractor
            .extract_metrics(&body, name, self.config.match_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_query_shape() {
        let query = LetPubSource::listing_query(3);
        assert_eq!(query.first(), Some(&("page", "journalapp".to_string())));
        assert!(query.contains(&("searchname", String::new())));
        assert!(query.contains(&("searchsort", "if_2022".to_string())));
        assert_eq!(query.last(), Some(&("currentpage", "3".to_string())));
    }

    #[test]
    fn test_journal_query_carries_name() {
        let query = LetPubSource::journal_query("Cell Reports");
        assert!(query.contains(&("searchname", "Cell Reports".to_string())));
        assert!(!query.iter().any(|(k, _)| *k == "currentpage"));
    }

    #[test]
    fn test_new_rejects_bad_selector() {
        let config = LetPubConfig {
            table_selector: "table[".to_string(),
            ..LetPubConfig::default()
        };
        assert!(LetPubSource::new(config).is_err());
    }
}
