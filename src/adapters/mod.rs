// Adapters layer: concrete implementations for external systems (http, html tables, data sources)

pub mod html;
pub mod http;
pub mod letpub;
pub mod wos;

use crate::domain::model::{Enumeration, JournalMetrics, SourceKind};
use crate::domain::ports::{ConfigProvider, JournalSource};
use crate::utils::error::{Result, ScoutError};
use async_trait::async_trait;

pub use letpub::{LetPubConfig, LetPubSource};
pub use wos::{WosConfig, WosSource};

/// 依設定建立對應的資料來源
pub fn source_from_config<C: ConfigProvider>(config: &C) -> Result<Box<dyn JournalSource>> {
    match config.source_kind() {
        SourceKind::Letpub => {
            let source = LetPubSource::new(LetPubConfig {
                base_url: config.base_url().to_string(),
                table_selector: config.table_selector().to_string(),
                match_policy: config.match_policy(),
                max_pages: config.max_pages(),
                listing_delay: config.listing_delay(),
                item_delay: config.item_delay(),
                request_timeout: config.request_timeout(),
            })?;
            Ok(Box::new(source))
        }
        SourceKind::Wos => {
            let api_key = config
                .api_key()
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| ScoutError::MissingConfigError {
                    field: "api_key".to_string(),
                })?;
            let source = WosSource::new(WosConfig {
                base_url: config.base_url().to_string(),
                api_key: api_key.to_string(),
                citation_year: config.citation_year(),
                max_pages: config.max_pages(),
                listing_delay: config.listing_delay(),
                item_delay: config.item_delay(),
                request_timeout: config.request_timeout(),
            })?;
            Ok(Box::new(source))
        }
    }
}

pub fn default_base_url(kind: SourceKind) -> &'static str {
    match kind {
        SourceKind::Letpub => letpub::DEFAULT_BASE_URL,
        SourceKind::Wos => wos::DEFAULT_BASE_URL,
    }
}

#[async_trait]
impl JournalSource for Box<dyn JournalSource> {
    fn kind(&self) -> SourceKind {
        (**self).kind()
    }

    async fn enumerate(&self) -> Result<Enumeration> {
        (**self).enumerate().await
    }

    async fn resolve(&self, name: &str) -> Result<JournalMetrics> {
        (**self).resolve(name).await
    }
}
