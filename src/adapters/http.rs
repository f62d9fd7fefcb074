use crate::utils::error::{Result, ScoutError};
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

const USER_AGENT: &str = concat!("journal-scout/", env!("CARGO_PKG_VERSION"));

/// 兩次呼叫之間至少間隔 min_interval；第一次呼叫不等待
#[derive(Debug, Clone)]
pub struct RateLimiter {
    min_interval: Duration,
    last_call: Arc<Mutex<Option<Instant>>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Arc::new(Mutex::new(None)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.min_interval
    }

    pub async fn wait(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(t) = *last {
            let elapsed = t.elapsed();
            if elapsed < self.min_interval {
                let remaining = self.min_interval - elapsed;
                tracing::debug!("⏳ Rate limit: sleeping {:?}", remaining);
                sleep(remaining).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: StatusCode,
    pub body: String,
}

/// Thin wrapper over reqwest that applies a per-call timeout and default headers.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(timeout: Duration, default_headers: HeaderMap) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .default_headers(default_headers)
            .build()?;
        Ok(Self { client })
    }

    pub async fn fetch(&self, url: &str, query: &[(&str, String)]) -> Result<FetchedPage> {
        tracing::debug!("Making request to: {} ({} params)", url, query.len());
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);
        let body = response.text().await?;
        Ok(FetchedPage { status, body })
    }

    /// Like `fetch`, but a non-success status becomes a `FetchError`.
    pub async fn fetch_ok(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        let page = self.fetch(url, query).await?;
        if !page.status.is_success() {
            return Err(ScoutError::fetch(
                url,
                Some(page.status.as_u16()),
                truncate_body(&page.body),
            ));
        }
        Ok(page.body)
    }
}

fn truncate_body(body: &str) -> String {
    const LIMIT: usize = 200;
    let trimmed = body.trim();
    if trimmed.chars().count() <= LIMIT {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(LIMIT).collect();
    out.push('…');
    out
}
